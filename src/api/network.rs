//! Chain metadata and liveness probes.

use crate::error::ApiResult;
use crate::http::ApiClient;
use crate::types::{NetworkHealth, NetworkInfo, NetworkStats};

pub async fn info(client: &ApiClient) -> ApiResult<NetworkInfo> {
    client.get_json("/api/network/info", &[]).await
}

pub async fn stats(client: &ApiClient) -> ApiResult<NetworkStats> {
    client.get_json("/api/network/stats", &[]).await
}

pub async fn health(client: &ApiClient) -> ApiResult<NetworkHealth> {
    client.get_json("/api/network/health", &[]).await
}
