//! Deployment pipeline: template catalog, job submission, status polling
//! and recent-deployment history.

use serde::Deserialize;

use crate::error::ApiResult;
use crate::http::ApiClient;
use crate::types::{
    DeployJob, DeployableContract, DeploymentRecord, JobReceipt, SubmitDeployRequest,
};

pub async fn templates(client: &ApiClient) -> ApiResult<Vec<DeployableContract>> {
    client.get_json("/api/deploy/contracts", &[]).await
}

pub async fn search(client: &ApiClient, q: &str) -> ApiResult<Vec<DeployableContract>> {
    client
        .get_json("/api/deploy/search", &[("q", Some(q.to_string()))])
        .await
}

/// Queue a deployment job. POST, never retried by the HTTP layer.
pub async fn submit(client: &ApiClient, req: &SubmitDeployRequest) -> ApiResult<JobReceipt> {
    client.post_json("/api/deploy/submit", req).await
}

pub async fn status(client: &ApiClient, job_id: &str) -> ApiResult<DeployJob> {
    client
        .get_json(&format!("/api/deploy/status/{job_id}"), &[])
        .await
}

#[derive(Deserialize)]
struct HistoryResponse {
    #[serde(default)]
    deployments: Vec<DeploymentRecord>,
}

pub async fn history(client: &ApiClient) -> ApiResult<Vec<DeploymentRecord>> {
    let res: HistoryResponse = client.get_json("/api/deploy/history", &[]).await?;
    Ok(res.deployments)
}
