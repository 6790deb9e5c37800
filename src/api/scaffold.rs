//! Starter-project scaffolding: template catalog, dry-run preview, and
//! archive generation.

use crate::error::ApiResult;
use crate::http::ApiClient;
use crate::types::{GeneratedScaffold, ScaffoldPreview, ScaffoldRequest, TemplateInfo};

pub async fn templates(client: &ApiClient) -> ApiResult<Vec<TemplateInfo>> {
    client.get_json("/api/scaffold/templates", &[]).await
}

pub async fn search(client: &ApiClient, q: &str) -> ApiResult<Vec<TemplateInfo>> {
    client
        .get_json("/api/scaffold/search", &[("q", Some(q.to_string()))])
        .await
}

/// Dry-run: list the files that would be generated, without producing an
/// archive.
pub async fn preview(client: &ApiClient, req: &ScaffoldRequest) -> ApiResult<ScaffoldPreview> {
    client.post_json("/api/scaffold/preview", req).await
}

pub async fn generate(client: &ApiClient, req: &ScaffoldRequest) -> ApiResult<GeneratedScaffold> {
    client.post_json("/api/scaffold/generate", req).await
}
