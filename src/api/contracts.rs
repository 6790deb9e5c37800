//! Contract registry: paginated/filterable listing, per-contract detail
//! (including source), registry summary, and filter facets.

use crate::error::ApiResult;
use crate::http::ApiClient;
use crate::types::{ContractDetail, ContractMeta, Facet, Page, RegistrySummary, ResourceQuery};

pub async fn list(client: &ApiClient, query: &ResourceQuery) -> ApiResult<Page<ContractMeta>> {
    client.get_json("/api/contracts", &query.to_params()).await
}

pub async fn summary(client: &ApiClient) -> ApiResult<RegistrySummary> {
    client.get_json("/api/contracts/summary", &[]).await
}

pub async fn get(client: &ApiClient, id: &str) -> ApiResult<ContractDetail> {
    client.get_json(&format!("/api/contracts/{id}"), &[]).await
}

pub async fn categories(client: &ApiClient) -> ApiResult<Vec<Facet>> {
    client.get_json("/api/contracts/categories", &[]).await
}

pub async fn protocols(client: &ApiClient) -> ApiResult<Vec<Facet>> {
    client.get_json("/api/contracts/protocols", &[]).await
}
