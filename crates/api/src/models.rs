//! API request/response models.

use lpfolio_domain::Chain;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body of `POST /api/get-positions`.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GetPositionsRequest {
    #[serde(default)]
    pub user_address: Option<Value>,
}

impl GetPositionsRequest {
    /// Parses a raw body; an empty or malformed body carries no address.
    #[must_use]
    pub fn from_body(body: &[u8]) -> Self {
        serde_json::from_slice(body).unwrap_or_default()
    }

    /// The address as given, or `None` when it is absent or falsy
    /// (`null`, `false`, `0`, `""`).
    ///
    /// Other non-string values are kept in their JSON form, so they reach
    /// address parsing and fail there.
    #[must_use]
    pub fn user_address(&self) -> Option<String> {
        match self.user_address.as_ref()? {
            Value::Null | Value::Bool(false) => None,
            Value::Number(n) if n.as_f64() == Some(0.0) => None,
            Value::String(s) if s.is_empty() => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }
}

/// Error body.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Health check response.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    /// Enabled chains in scan order.
    pub chains: Vec<Chain>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_from_body() {
        let req = GetPositionsRequest::from_body(br#"{"userAddress":"0xabc"}"#);
        assert_eq!(req.user_address().as_deref(), Some("0xabc"));

        assert!(GetPositionsRequest::from_body(b"").user_address().is_none());
        assert!(GetPositionsRequest::from_body(b"{}").user_address().is_none());
        assert!(GetPositionsRequest::from_body(b"not json").user_address().is_none());
    }

    #[test]
    fn test_falsy_address_is_missing() {
        for body in [
            r#"{"userAddress":null}"#,
            r#"{"userAddress":false}"#,
            r#"{"userAddress":0}"#,
            r#"{"userAddress":""}"#,
        ] {
            let req = GetPositionsRequest::from_body(body.as_bytes());
            assert_eq!(req.user_address(), None, "{body}");
        }
    }

    #[test]
    fn test_non_string_address_is_present() {
        let req = GetPositionsRequest::from_body(br#"{"userAddress":42}"#);
        assert_eq!(req.user_address().as_deref(), Some("42"));

        let req = GetPositionsRequest::from_body(br#"{"userAddress":true}"#);
        assert_eq!(req.user_address().as_deref(), Some("true"));

        let req = GetPositionsRequest::from_body(br#"{"userAddress":["0xabc"]}"#);
        assert_eq!(req.user_address().as_deref(), Some(r#"["0xabc"]"#));
    }
}
