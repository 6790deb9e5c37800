//! End-to-end client behavior against a loopback fake portal backend:
//! query-parameter filtering, error-message extraction, auth header, and
//! typed decoding of the deploy and network resources.

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use portalx::api;
use portalx::types::{JobStatus, ResourceQuery};
use portalx::{ApiClient, ApiError};

#[derive(Clone, Default)]
struct Recorded {
    params: Arc<Mutex<Option<HashMap<String, String>>>>,
    auth: Arc<Mutex<Option<String>>>,
}

const REGISTRY: &[(&str, &str)] = &[
    ("c1", "TokenVault"),
    ("c2", "VaultFactory"),
    ("c3", "StakingPool"),
    ("c4", "RewardVault"),
    ("c5", "Oracle"),
];

async fn list_contracts(
    State(rec): State<Recorded>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Value> {
    *rec.params.lock().unwrap() = Some(params.clone());
    *rec.auth.lock().unwrap() = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string());

    let search = params.get("search").cloned().unwrap_or_default().to_lowercase();
    let items: Vec<Value> = REGISTRY
        .iter()
        .filter(|(_, name)| search.is_empty() || name.to_lowercase().contains(&search))
        .map(|(id, name)| {
            json!({"id": id, "name": name, "category": "defi", "protocol": "diamond"})
        })
        .collect();
    let total = items.len();
    Json(json!({
        "items": items,
        "total": total,
        "page": 1,
        "limit": 20,
        "totalPages": if total == 0 { 0 } else { 1 },
    }))
}

async fn contract_detail(Path(id): Path<String>) -> axum::response::Response {
    match id.as_str() {
        "bad" => (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "BadRequest", "message": "invalid id"})),
        )
            .into_response(),
        "missing" => (
            StatusCode::NOT_FOUND,
            Json(json!({"error": "NotFound"})),
        )
            .into_response(),
        "broken" => (StatusCode::BAD_REQUEST, String::new()).into_response(),
        _ => Json(json!({
            "id": id,
            "name": "TokenVault",
            "source": "contract TokenVault {}",
            "imports": ["IERC20.sol"],
            "path": "contracts/TokenVault.sol",
            "license": "MIT",
        }))
        .into_response(),
    }
}

async fn submit_deploy(Json(body): Json<Value>) -> Json<Value> {
    assert_eq!(body["contract"], "TokenVault");
    Json(json!({"jobId": "job-9", "status": "queued"}))
}

async fn job_status(Path(id): Path<String>) -> Json<Value> {
    Json(json!({
        "id": id,
        "status": "complete",
        "contractAddress": "0xdeadbeef",
        "txHash": "0xfeed",
    }))
}

async fn rpc_proxy(Json(envelope): Json<Value>) -> Json<Value> {
    assert_eq!(envelope["jsonrpc"], "2.0");
    match envelope["method"].as_str() {
        Some("eth_blockNumber") => Json(json!({
            "jsonrpc": "2.0", "id": envelope["id"], "result": "0x10"
        })),
        _ => Json(json!({
            "jsonrpc": "2.0", "id": envelope["id"],
            "error": {"code": -32601, "message": "method not allowed"}
        })),
    }
}

async fn network_stats() -> Json<Value> {
    Json(json!({
        "blockHeight": 123456,
        "gasPrice": "12 gwei",
        "txCount": 42,
        "peers": 8,
    }))
}

async fn spawn_portal(rec: Recorded) -> String {
    let app = Router::new()
        .route("/api/contracts", get(list_contracts))
        .route("/api/contracts/:id", get(contract_detail))
        .route("/api/deploy/submit", post(submit_deploy))
        .route("/api/deploy/status/:id", get(job_status))
        .route("/api/rpc", post(rpc_proxy))
        .route("/api/network/stats", get(network_stats))
        .with_state(rec);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

/// Backend that rate-limits the first hit on every route, counting hits.
#[derive(Clone, Default)]
struct RateLimited {
    get_hits: Arc<Mutex<u32>>,
    post_hits: Arc<Mutex<u32>>,
}

async fn flaky_summary(State(st): State<RateLimited>) -> axum::response::Response {
    let mut hits = st.get_hits.lock().unwrap();
    *hits += 1;
    if *hits == 1 {
        return (
            StatusCode::TOO_MANY_REQUESTS,
            Json(json!({"error": "RateLimited"})),
        )
            .into_response();
    }
    Json(json!({"totalContracts": 5, "categories": [], "protocols": []})).into_response()
}

async fn rate_limited_submit(State(st): State<RateLimited>) -> axum::response::Response {
    *st.post_hits.lock().unwrap() += 1;
    (
        StatusCode::TOO_MANY_REQUESTS,
        Json(json!({"error": "RateLimited", "message": "slow down"})),
    )
        .into_response()
}

async fn spawn_rate_limited(st: RateLimited) -> String {
    let app = Router::new()
        .route("/api/contracts/summary", get(flaky_summary))
        .route("/api/deploy/submit", post(rate_limited_submit))
        .with_state(st);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

fn client(base: &str, token: Option<&str>) -> ApiClient {
    ApiClient::new(
        base,
        Duration::from_secs(5),
        token.map(|s| s.to_string()),
        0,
    )
    .unwrap()
}

#[tokio::test]
async fn contract_search_scenario() {
    let base = spawn_portal(Recorded::default()).await;
    let client = client(&base, None);

    let query = ResourceQuery {
        search: "vault".into(),
        ..Default::default()
    };
    let page = api::contracts::list(&client, &query).await.unwrap();

    assert_eq!(page.total, 3);
    assert_eq!(page.items.len(), 3);
    assert_eq!(page.total_pages, 1);
    assert!(page.items.iter().all(|c| c.name.to_lowercase().contains("vault")));
}

#[tokio::test]
async fn empty_and_absent_params_are_omitted() {
    let rec = Recorded::default();
    let base = spawn_portal(rec.clone()).await;
    let client = client(&base, None);

    // default query: empty search, no facets
    api::contracts::list(&client, &ResourceQuery::default())
        .await
        .unwrap();

    let params = rec.params.lock().unwrap().clone().unwrap();
    assert!(!params.contains_key("search"), "empty search must be dropped");
    assert!(!params.contains_key("category"));
    assert!(!params.contains_key("type"));
    assert_eq!(params.get("page").map(String::as_str), Some("1"));
    assert_eq!(params.get("limit").map(String::as_str), Some("20"));
}

#[tokio::test]
async fn bearer_token_is_attached() {
    let rec = Recorded::default();
    let base = spawn_portal(rec.clone()).await;
    let client = client(&base, Some("secret-token"));

    api::contracts::list(&client, &ResourceQuery::default())
        .await
        .unwrap();

    assert_eq!(
        rec.auth.lock().unwrap().as_deref(),
        Some("Bearer secret-token")
    );
}

#[tokio::test]
async fn error_messages_follow_the_portal_convention() {
    let base = spawn_portal(Recorded::default()).await;
    let client = client(&base, None);

    let err = api::contracts::get(&client, "bad").await.unwrap_err();
    assert_eq!(err.to_string(), "BadRequest: invalid id");
    assert_eq!(err.status(), Some(400));

    let err = api::contracts::get(&client, "missing").await.unwrap_err();
    assert_eq!(err.to_string(), "NotFound");

    let err = api::contracts::get(&client, "broken").await.unwrap_err();
    assert_eq!(err.to_string(), "API error: 400");
}

#[tokio::test]
async fn deploy_submit_and_status_round_trip() {
    let base = spawn_portal(Recorded::default()).await;
    let client = client(&base, None);

    let receipt = api::deploy::submit(
        &client,
        &portalx::types::SubmitDeployRequest {
            contract: "TokenVault".into(),
            constructor_args: vec![json!("0x1"), json!(1000)],
        },
    )
    .await
    .unwrap();
    assert_eq!(receipt.job_id, "job-9");
    assert_eq!(receipt.status, JobStatus::Queued);

    let job = api::deploy::status(&client, &receipt.job_id).await.unwrap();
    assert_eq!(job.status, JobStatus::Complete);
    assert!(job.status.is_terminal());
    assert_eq!(job.contract_address.as_deref(), Some("0xdeadbeef"));
}

#[tokio::test]
async fn rpc_call_unwraps_result_and_errors() {
    let base = spawn_portal(Recorded::default()).await;
    let client = client(&base, None);

    let result = api::rpc::call(&client, "eth_blockNumber", json!([]))
        .await
        .unwrap();
    assert_eq!(result, json!("0x10"));

    let err = api::rpc::call(&client, "eth_sendRawTransaction", json!([]))
        .await
        .unwrap_err();
    match err {
        ApiError::Rpc { code, ref message } => {
            assert_eq!(code, -32601);
            assert_eq!(message.as_str(), "method not allowed");
        }
        other => panic!("expected rpc error, got {other:?}"),
    }
}

#[tokio::test]
async fn get_retries_past_a_rate_limit() {
    let st = RateLimited::default();
    let base = spawn_rate_limited(st.clone()).await;
    let client = ApiClient::new(&base, Duration::from_secs(5), None, 2).unwrap();

    // first hit is 429, the retry lands the 200
    let summary = api::contracts::summary(&client).await.unwrap();
    assert_eq!(summary.total_contracts, 5);
    assert_eq!(*st.get_hits.lock().unwrap(), 2);
}

#[tokio::test]
async fn get_gives_up_once_retries_are_exhausted() {
    let st = RateLimited::default();
    let base = spawn_rate_limited(st.clone()).await;
    let client = ApiClient::new(&base, Duration::from_secs(5), None, 0).unwrap();

    let err = api::contracts::summary(&client).await.unwrap_err();
    assert_eq!(err.status(), Some(429));
    assert_eq!(err.to_string(), "RateLimited");
    assert_eq!(*st.get_hits.lock().unwrap(), 1);
}

#[tokio::test]
async fn post_is_never_retried() {
    let st = RateLimited::default();
    let base = spawn_rate_limited(st.clone()).await;
    // retry budget present, but a submit must not be duplicated
    let client = ApiClient::new(&base, Duration::from_secs(5), None, 3).unwrap();

    let err = api::deploy::submit(
        &client,
        &portalx::types::SubmitDeployRequest {
            contract: "TokenVault".into(),
            constructor_args: vec![],
        },
    )
    .await
    .unwrap_err();

    assert_eq!(err.status(), Some(429));
    assert_eq!(err.to_string(), "RateLimited: slow down");
    assert_eq!(*st.post_hits.lock().unwrap(), 1, "exactly one submit hit");
}

#[tokio::test]
async fn typed_network_stats_decode() {
    let base = spawn_portal(Recorded::default()).await;
    let client = client(&base, None);

    let stats = api::network::stats(&client).await.unwrap();
    assert_eq!(stats.block_height, 123_456);
    assert_eq!(stats.gas_price.as_deref(), Some("12 gwei"));
    assert_eq!(stats.peers, Some(8));
}
