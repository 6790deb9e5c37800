use serde::{Deserialize, Serialize};

/// Filter/search/pagination parameters for the contract registry list.
///
/// Owned by a single consumer (one page, one query). The page-reset rule
/// (any non-page field change snaps `page` back to 1) is enforced by
/// `QueryController`, not here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceQuery {
    pub search: String,
    pub category: Option<String>,
    pub protocol: Option<String>,
    /// Contract type facet; serialized as `type` on the wire.
    pub kind: Option<String>,
    pub page: u32,
    pub limit: u32,
}

impl Default for ResourceQuery {
    fn default() -> Self {
        Self {
            search: String::new(),
            category: None,
            protocol: None,
            kind: None,
            page: 1,
            limit: 20,
        }
    }
}

impl ResourceQuery {
    /// Flatten into query-string pairs. `None` and empty-string values are
    /// dropped by the HTTP layer, so a blank search never reaches the wire.
    pub fn to_params(&self) -> Vec<(&'static str, Option<String>)> {
        vec![
            ("search", Some(self.search.clone())),
            ("category", self.category.clone()),
            ("protocol", self.protocol.clone()),
            ("type", self.kind.clone()),
            ("page", Some(self.page.to_string())),
            ("limit", Some(self.limit.to_string())),
        ]
    }
}

/// One page of a paginated listing, replaced wholesale on each fetch.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub limit: u32,
    pub total_pages: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractMeta {
    pub id: String,
    pub name: String,
    pub category: Option<String>,
    pub protocol: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractDetail {
    pub id: String,
    pub name: String,
    pub source: String,
    #[serde(default)]
    pub imports: Vec<String>,
    pub path: Option<String>,
    pub license: Option<String>,
}

/// Registry-wide counts from `/api/contracts/summary`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrySummary {
    pub total_contracts: u64,
    #[serde(default)]
    pub categories: Vec<Facet>,
    #[serde(default)]
    pub protocols: Vec<Facet>,
}

/// A filter facet (category or protocol) with its member count.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Facet {
    pub name: String,
    pub count: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeployableContract {
    pub name: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub constructor_params: Vec<ConstructorParam>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConstructorParam {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitDeployRequest {
    pub contract: String,
    #[serde(default)]
    pub constructor_args: Vec<serde_json::Value>,
}

/// Response to a deploy submit; the job itself is observed via polling.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobReceipt {
    pub job_id: String,
    pub status: JobStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Queued,
    Compiling,
    Deploying,
    Verifying,
    Complete,
    Failed,
}

impl JobStatus {
    /// Once terminal, a job never transitions again; watchers stop here.
    pub fn is_terminal(self) -> bool {
        matches!(self, JobStatus::Complete | JobStatus::Failed)
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            JobStatus::Queued => "queued",
            JobStatus::Compiling => "compiling",
            JobStatus::Deploying => "deploying",
            JobStatus::Verifying => "verifying",
            JobStatus::Complete => "complete",
            JobStatus::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// A deployment job as observed via `/api/deploy/status/:jobId`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeployJob {
    pub id: String,
    pub status: JobStatus,
    #[serde(default)]
    pub contract_address: Option<String>,
    #[serde(default)]
    pub tx_hash: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentRecord {
    pub job_id: String,
    pub contract: String,
    pub status: JobStatus,
    #[serde(default)]
    pub contract_address: Option<String>,
    #[serde(default)]
    pub tx_hash: Option<String>,
    #[serde(default)]
    pub submitted_at: Option<chrono::DateTime<chrono::Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateInfo {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScaffoldRequest {
    pub template: String,
    pub project_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScaffoldFile {
    pub path: String,
    pub size: u64,
}

/// Dry-run result of `/api/scaffold/preview`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScaffoldPreview {
    pub files: Vec<ScaffoldFile>,
    pub file_count: u64,
    pub total_size: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedScaffold {
    pub download_url: String,
    pub s3_key: String,
    #[serde(default)]
    pub files: Vec<ScaffoldFile>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcMethodInfo {
    pub method: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub params: Option<serde_json::Value>,
    #[serde(default)]
    pub example: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkInfo {
    pub chain_id: u64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub rpc_url: Option<String>,
    #[serde(default)]
    pub explorer_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkStats {
    pub block_height: u64,
    #[serde(default)]
    pub gas_price: Option<String>,
    #[serde(default)]
    pub tx_count: Option<u64>,
    #[serde(default)]
    pub peers: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkHealth {
    pub status: String,
    #[serde(default)]
    pub block_height: Option<u64>,
}

impl NetworkHealth {
    pub fn is_healthy(&self) -> bool {
        matches!(self.status.as_str(), "ok" | "healthy")
    }
}
