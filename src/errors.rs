use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// One element of a 422 `detail` list as the backend emits it:
/// `{"loc": ["body", "cantidad"], "msg": "...", "type": "value_error"}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationDetail {
    pub loc: Vec<LocSegment>,
    pub msg: String,
    #[serde(rename = "type")]
    pub kind: String,
}

/// A `loc` path segment is either a field name or an array index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LocSegment {
    Field(String),
    Index(i64),
}

/// The full 422 response body, kept verbatim so forms can render
/// field-level messages.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationPayload {
    #[serde(default)]
    pub detail: Vec<ValidationDetail>,
}

impl ValidationPayload {
    /// Maps each detail entry to the last named field in its `loc` path,
    /// skipping the leading `body`/`query` segment.
    pub fn field_errors(&self) -> HashMap<String, Vec<String>> {
        let mut errors: HashMap<String, Vec<String>> = HashMap::new();
        for detail in &self.detail {
            let field = detail
                .loc
                .iter()
                .rev()
                .find_map(|segment| match segment {
                    LocSegment::Field(name) if name != "body" && name != "query" => {
                        Some(name.clone())
                    }
                    _ => None,
                })
                .unwrap_or_else(|| "_general".to_string());
            errors.entry(field).or_default().push(detail.msg.clone());
        }
        errors
    }

    pub fn first_message(&self) -> &str {
        self.detail
            .first()
            .map(|d| d.msg.as_str())
            .unwrap_or("invalid request")
    }
}

/// Client-side error taxonomy.
///
/// Every mutation surfaces one of these at the call site; nothing is
/// retried automatically. `Network` is the only variant a caller should
/// treat as retryable.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Transport-level failure (DNS, connect, timeout, broken body).
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// 401 from the backend. The session store has already been cleared
    /// by the time the caller sees this.
    #[error("unauthorized")]
    Unauthorized,

    /// 422 with the original `detail` payload preserved.
    #[error("validation failed: {}", .0.first_message())]
    Validation(ValidationPayload),

    /// Business-rule rejection (400/409), e.g. deleting a category that
    /// still has products. The backend's `detail` string is surfaced as-is.
    #[error("{0}")]
    BusinessRule(String),

    #[error("not found: {0}")]
    NotFound(String),

    /// Any other non-success status, body preserved for diagnostics.
    #[error("server error ({status}): {body}")]
    Server { status: StatusCode, body: String },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ApiError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, ApiError::Network(_))
    }

    /// Field-level messages for a validation failure, empty otherwise.
    pub fn field_errors(&self) -> HashMap<String, Vec<String>> {
        match self {
            ApiError::Validation(payload) => payload.field_errors(),
            _ => HashMap::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_fastapi_detail_payload() {
        let body = r#"{"detail":[{"loc":["body","cantidad"],"msg":"ensure this value is not zero","type":"value_error"}]}"#;
        let payload: ValidationPayload = serde_json::from_str(body).unwrap();
        assert_eq!(payload.detail.len(), 1);
        assert_eq!(payload.detail[0].msg, "ensure this value is not zero");
        assert_eq!(payload.detail[0].kind, "value_error");
        assert_eq!(
            payload.detail[0].loc,
            vec![
                LocSegment::Field("body".into()),
                LocSegment::Field("cantidad".into())
            ]
        );
    }

    #[test]
    fn field_errors_use_last_named_segment() {
        let body = r#"{"detail":[
            {"loc":["body","items",0,"cantidad_fisica"],"msg":"must be >= 0","type":"value_error"},
            {"loc":["body","motivo"],"msg":"field required","type":"missing"}
        ]}"#;
        let payload: ValidationPayload = serde_json::from_str(body).unwrap();
        let errors = payload.field_errors();
        assert_eq!(errors["cantidad_fisica"], vec!["must be >= 0"]);
        assert_eq!(errors["motivo"], vec!["field required"]);
    }

    #[test]
    fn field_errors_fall_back_when_loc_is_bare() {
        let payload = ValidationPayload {
            detail: vec![ValidationDetail {
                loc: vec![LocSegment::Field("body".into())],
                msg: "malformed".into(),
                kind: "value_error".into(),
            }],
        };
        let errors = payload.field_errors();
        assert_eq!(errors["_general"], vec!["malformed"]);
    }

    #[test]
    fn only_network_errors_are_retryable() {
        assert!(!ApiError::Unauthorized.is_retryable());
        assert!(!ApiError::BusinessRule("stock insuficiente".into()).is_retryable());
        assert!(!ApiError::Validation(ValidationPayload::default()).is_retryable());
    }
}
