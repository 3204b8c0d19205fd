//! Canonical error envelope
//!
//! Every failure this crate reports to a caller has this shape:
//! `{"type": "error", "error": {"type": <kind>, "message": ..., "code"?: ..., "details"?: [...]}}`.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Canonical error taxonomy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    AuthenticationError,
    PermissionError,
    InvalidRequestError,
    RateLimitError,
    ContentPolicyError,
    ApiError,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AuthenticationError => "authentication_error",
            Self::PermissionError => "permission_error",
            Self::InvalidRequestError => "invalid_request_error",
            Self::RateLimitError => "rate_limit_error",
            Self::ContentPolicyError => "content_policy_error",
            Self::ApiError => "api_error",
        }
    }

    /// Parse a canonical kind name
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "authentication_error" => Some(Self::AuthenticationError),
            "permission_error" => Some(Self::PermissionError),
            "invalid_request_error" => Some(Self::InvalidRequestError),
            "rate_limit_error" => Some(Self::RateLimitError),
            "content_policy_error" => Some(Self::ContentPolicyError),
            "api_error" => Some(Self::ApiError),
            _ => None,
        }
    }

    /// Whether a caller may reasonably retry after this kind of failure
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::RateLimitError | Self::ApiError)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Constant `type` tag of an error envelope
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnvelopeType {
    #[default]
    Error,
}

/// Inner error object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(rename = "type")]
    pub kind: ErrorKind,

    pub message: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,

    /// Provider diagnostics carried through verbatim
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<Value>>,
}

/// Canonical error envelope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    #[serde(rename = "type", default)]
    pub envelope_type: EnvelopeType,

    pub error: ErrorBody,
}

impl ErrorEnvelope {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            envelope_type: EnvelopeType::Error,
            error: ErrorBody {
                kind,
                message: message.into(),
                code: None,
                details: None,
            },
        }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.error.code = Some(code.into());
        self
    }

    pub fn with_details(mut self, details: Vec<Value>) -> Self {
        self.error.details = Some(details);
        self
    }

    pub fn kind(&self) -> ErrorKind {
        self.error.kind
    }

    pub fn message(&self) -> &str {
        &self.error.message
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_envelope_serialization() {
        let envelope = ErrorEnvelope::new(ErrorKind::RateLimitError, "slow down").with_code("429");
        assert_eq!(
            serde_json::to_value(&envelope).unwrap(),
            json!({
                "type": "error",
                "error": {"type": "rate_limit_error", "message": "slow down", "code": "429"}
            })
        );
    }

    #[test]
    fn test_kind_names_round_trip() {
        for kind in [
            ErrorKind::AuthenticationError,
            ErrorKind::PermissionError,
            ErrorKind::InvalidRequestError,
            ErrorKind::RateLimitError,
            ErrorKind::ContentPolicyError,
            ErrorKind::ApiError,
        ] {
            assert_eq!(ErrorKind::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(ErrorKind::parse("overloaded_error"), None);
    }
}
