use serde::Deserialize;
use thiserror::Error;

pub type ApiResult<T> = Result<T, ApiError>;

/// Failure modes at the portal HTTP boundary.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Connection-level failure (DNS, refused, timeout) before any response
    /// existed, or a body that could not be read/decoded.
    #[error("transport: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-2xx response. The message follows the portal convention: a JSON
    /// body `{error, message}` yields "error: message", `{error}` alone
    /// yields the bare error, anything else falls back to the status code.
    #[error("{message}")]
    Api { status: u16, message: String },

    /// JSON-RPC proxy returned an error envelope inside a 200.
    #[error("rpc {code}: {message}")]
    Rpc { code: i64, message: String },

    /// Rejected client-side before any request was issued.
    #[error("{0}")]
    Validation(String),
}

#[derive(Deserialize)]
struct ErrorBody {
    error: Option<String>,
    message: Option<String>,
}

fn non_empty(s: Option<String>) -> Option<String> {
    s.filter(|s| !s.trim().is_empty())
}

impl ApiError {
    /// Build the `Api` variant from a raw response status and body text.
    pub fn from_response(status: u16, body: &str) -> Self {
        let parsed = serde_json::from_str::<ErrorBody>(body).ok();
        let message = parsed
            .and_then(|b| {
                match (non_empty(b.error), non_empty(b.message)) {
                    (Some(e), Some(m)) => Some(format!("{e}: {m}")),
                    (Some(e), None) => Some(e),
                    (None, Some(m)) => Some(m),
                    (None, None) => None,
                }
            })
            .unwrap_or_else(|| format!("API error: {status}"));
        ApiError::Api { status, message }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_combines_error_and_message() {
        let err = ApiError::from_response(400, r#"{"error":"BadRequest","message":"invalid id"}"#);
        assert_eq!(err.to_string(), "BadRequest: invalid id");
        assert_eq!(err.status(), Some(400));
    }

    #[test]
    fn message_falls_back_to_error_field() {
        let err = ApiError::from_response(404, r#"{"error":"NotFound"}"#);
        assert_eq!(err.to_string(), "NotFound");
    }

    #[test]
    fn unparseable_body_yields_generic_message() {
        assert_eq!(
            ApiError::from_response(400, "").to_string(),
            "API error: 400"
        );
        assert_eq!(
            ApiError::from_response(502, "<html>bad gateway</html>").to_string(),
            "API error: 502"
        );
    }

    #[test]
    fn empty_fields_are_ignored() {
        let err = ApiError::from_response(500, r#"{"error":"","message":"  "}"#);
        assert_eq!(err.to_string(), "API error: 500");
    }
}
