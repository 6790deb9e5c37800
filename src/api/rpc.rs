//! Allow-listed JSON-RPC proxy. The portal only forwards methods it knows;
//! the catalog endpoint lists them with descriptions and examples.

use serde_json::{json, Value};

use crate::error::{ApiError, ApiResult};
use crate::http::ApiClient;
use crate::types::RpcMethodInfo;

pub async fn methods(client: &ApiClient) -> ApiResult<Vec<RpcMethodInfo>> {
    client.get_json("/api/rpc/methods", &[]).await
}

/// Parse user-entered params text into a JSON-RPC `params` value.
///
/// Caught client-side: a malformed string yields a `Validation` error with
/// no network round trip. Empty input means "no params" (empty array).
pub fn parse_params(text: &str) -> ApiResult<Value> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(json!([]));
    }
    let value: Value = serde_json::from_str(trimmed)
        .map_err(|e| ApiError::Validation(format!("invalid JSON params: {e}")))?;
    if !(value.is_array() || value.is_object()) {
        return Err(ApiError::Validation(
            "params must be a JSON array or object".into(),
        ));
    }
    Ok(value)
}

/// Issue one proxied JSON-RPC call and unwrap the envelope: a JSON-RPC
/// `error` member becomes `ApiError::Rpc`, otherwise `result` is returned.
pub async fn call(client: &ApiClient, method: &str, params: Value) -> ApiResult<Value> {
    let envelope = json!({
        "jsonrpc": "2.0",
        "id": "portalx",
        "method": method,
        "params": params,
    });
    let v: Value = client.post_json("/api/rpc", &envelope).await?;
    if let Some(err) = v.get("error") {
        let code = err.get("code").and_then(|c| c.as_i64()).unwrap_or_default();
        let message = err
            .get("message")
            .and_then(|m| m.as_str())
            .unwrap_or("rpc error")
            .to_string();
        return Err(ApiError::Rpc { code, message });
    }
    Ok(v.get("result").cloned().unwrap_or(Value::Null))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_params_default_to_array() {
        assert_eq!(parse_params("").unwrap(), json!([]));
        assert_eq!(parse_params("   ").unwrap(), json!([]));
    }

    #[test]
    fn malformed_params_rejected_without_network() {
        let err = parse_params("{not json").unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
        assert!(err.to_string().contains("invalid JSON params"));
    }

    #[test]
    fn scalar_params_rejected() {
        let err = parse_params("42").unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[test]
    fn array_and_object_params_accepted() {
        assert!(parse_params(r#"["0x1", true]"#).unwrap().is_array());
        assert!(parse_params(r#"{"block":"latest"}"#).unwrap().is_object());
    }
}
