//! Passthrough adapter
//!
//! Used when the upstream already speaks the canonical protocol. Requests,
//! responses and stream lines are returned as copies of the input. The
//! registry also resolves every unknown transformer name to this adapter.

use crate::config::{ConfigDiagnostics, ConfigValidator, ProviderConfig, ProviderDefaults};
use crate::protocol::{CanonicalRequest, CanonicalResponse, ErrorEnvelope, ErrorKind};
use crate::providers::adapter::{ProviderRequest, Transformer, UpstreamError};
use crate::providers::support::{
    fallback_error, generate_message_id, salvage_message, status_error_kind,
};
use serde_json::Value;

/// Registry name of the passthrough adapter
pub const PASSTHROUGH: &str = "passthrough";

/// Identity adapter
#[derive(Debug, Clone, Copy, Default)]
pub struct PassthroughTransformer;

impl PassthroughTransformer {
    pub fn new() -> Self {
        Self
    }
}

/// Error kinds the canonical upstream reports that are not canonical names
fn native_error_kind(kind: &str) -> Option<ErrorKind> {
    match kind {
        "not_found_error" | "request_too_large" => Some(ErrorKind::InvalidRequestError),
        "overloaded_error" => Some(ErrorKind::ApiError),
        other => ErrorKind::parse(other),
    }
}

impl Transformer for PassthroughTransformer {
    fn name(&self) -> &str {
        PASSTHROUGH
    }

    fn transform_request(&self, request: &CanonicalRequest, _provider: &ProviderConfig) -> ProviderRequest {
        ProviderRequest::Canonical(request.clone())
    }

    fn transform_response(&self, response: &Value, _provider: &ProviderConfig) -> CanonicalResponse {
        match CanonicalResponse::deserialize_from(response) {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!(adapter = PASSTHROUGH, error = %e, "upstream reply is not a canonical response");
                let model = response.get("model").and_then(Value::as_str).unwrap_or_default();
                CanonicalResponse::empty(generate_message_id(), model)
            }
        }
    }

    fn transform_error(&self, error: &UpstreamError, _provider: &ProviderConfig) -> ErrorEnvelope {
        let Some(body) = error.json_body() else {
            return fallback_error(error);
        };
        let Some(inner) = body.get("error").filter(|e| e.is_object()) else {
            return fallback_error(error);
        };

        let kind = inner
            .get("type")
            .and_then(Value::as_str)
            .and_then(native_error_kind)
            .or_else(|| error.status.map(status_error_kind))
            .unwrap_or(ErrorKind::ApiError);
        let message = inner
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| salvage_message(error));

        let envelope = ErrorEnvelope::new(kind, message);
        match inner.get("code").and_then(Value::as_str) {
            Some(code) => envelope.with_code(code),
            None => envelope,
        }
    }

    fn validate_config(&self, provider: &ProviderConfig) -> ConfigDiagnostics {
        ConfigValidator::new().check(provider)
    }

    fn default_config(&self) -> ProviderDefaults {
        ProviderDefaults {
            provider_type: Some("anthropic".to_string()),
            api_base_url: Some("https://api.anthropic.com/v1".to_string()),
            transformer: Some(PASSTHROUGH.to_string()),
            timeout: Some(60_000),
            max_retries: Some(3),
            retry_delay: Some(1_000),
            ..ProviderDefaults::default()
        }
    }
}
