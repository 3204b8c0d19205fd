//! Gemini adapter
//!
//! Gemini nests messages as `contents[].parts[]`, keeps sampling parameters
//! under `generationConfig`, puts the system prompt in `systemInstruction`
//! and reports errors as `google.rpc.Status` objects.

pub mod converter;
mod streaming;
pub mod types;

pub use converter::{GEMINI, GEMINI_MODELS};
pub use streaming::{reframe_chunk, CANDIDATES_MARKER};
pub use types::{Content, GenerateContentRequest, GenerationConfig, Part, SafetySetting};

use crate::config::{
    ConfigDiagnostics, ConfigValidator, ProviderConfig, ProviderConventions, ProviderDefaults,
};
use crate::protocol::{CanonicalRequest, CanonicalResponse, ErrorEnvelope};
use crate::providers::adapter::{ProviderRequest, Transformer, UpstreamError};
use crate::providers::support::fail_open;
use serde_json::Value;

const CONVENTIONS: ProviderConventions = ProviderConventions {
    url_marker: Some("generativelanguage.googleapis.com"),
    key_prefix: Some("AIza"),
};

/// Adapter for the Gemini `generateContent` API
#[derive(Debug, Clone, Copy, Default)]
pub struct GeminiTransformer;

impl GeminiTransformer {
    pub fn new() -> Self {
        Self
    }
}

impl Transformer for GeminiTransformer {
    fn name(&self) -> &str {
        GEMINI
    }

    fn transform_request(&self, request: &CanonicalRequest, provider: &ProviderConfig) -> ProviderRequest {
        ProviderRequest::Gemini(converter::to_generate_request(request, provider))
    }

    fn transform_response(&self, response: &Value, _provider: &ProviderConfig) -> CanonicalResponse {
        converter::from_generate_response(response)
    }

    fn transform_stream_chunk(&self, raw: &str, _provider: &ProviderConfig) -> Option<String> {
        match reframe_chunk(raw) {
            Ok(reframed) => reframed.into_output(raw),
            Err(e) => fail_open(GEMINI, raw, &e),
        }
    }

    fn transform_error(&self, error: &UpstreamError, _provider: &ProviderConfig) -> ErrorEnvelope {
        converter::to_error_envelope(error)
    }

    fn validate_config(&self, provider: &ProviderConfig) -> ConfigDiagnostics {
        ConfigValidator::with_conventions(CONVENTIONS).check(provider)
    }

    fn default_config(&self) -> ProviderDefaults {
        ProviderDefaults {
            provider_type: Some(GEMINI.to_string()),
            api_base_url: Some("https://generativelanguage.googleapis.com/v1beta".to_string()),
            transformer: Some(GEMINI.to_string()),
            timeout: Some(60_000),
            max_retries: Some(3),
            retry_delay: Some(1_000),
            ..ProviderDefaults::default()
        }
    }
}
