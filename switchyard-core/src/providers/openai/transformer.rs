//! The OpenAI-style adapter

use super::converter::{from_chat_response, to_chat_request, to_error_envelope};
use super::profile::{OpenAiProfile, DEEPSEEK_PROFILE, OPENAI_PROFILE};
use super::streaming::reframe_line;
use crate::config::{ConfigDiagnostics, ConfigValidator, ProviderConfig, ProviderDefaults};
use crate::protocol::{CanonicalRequest, CanonicalResponse, ErrorEnvelope};
use crate::providers::adapter::{ProviderRequest, Transformer, UpstreamError};
use crate::providers::support::fail_open;
use serde_json::Value;

/// Adapter for providers speaking the `/chat/completions` shape
#[derive(Debug, Clone, Copy)]
pub struct OpenAiCompatTransformer {
    profile: OpenAiProfile,
}

impl OpenAiCompatTransformer {
    pub fn new(profile: OpenAiProfile) -> Self {
        Self { profile }
    }

    /// Multimodal OpenAI adapter
    pub fn openai() -> Self {
        Self::new(OPENAI_PROFILE)
    }

    /// Text-only DeepSeek adapter
    pub fn deepseek() -> Self {
        Self::new(DEEPSEEK_PROFILE)
    }

    pub fn profile(&self) -> &OpenAiProfile {
        &self.profile
    }
}

impl Transformer for OpenAiCompatTransformer {
    fn name(&self) -> &str {
        self.profile.name
    }

    fn transform_request(&self, request: &CanonicalRequest, provider: &ProviderConfig) -> ProviderRequest {
        ProviderRequest::OpenAi(to_chat_request(request, provider, &self.profile))
    }

    fn transform_response(&self, response: &Value, _provider: &ProviderConfig) -> CanonicalResponse {
        from_chat_response(response, &self.profile)
    }

    fn transform_stream_chunk(&self, raw: &str, _provider: &ProviderConfig) -> Option<String> {
        match reframe_line(raw) {
            Ok(reframed) => reframed.into_output(raw),
            Err(e) => fail_open(self.profile.name, raw, &e),
        }
    }

    fn transform_error(&self, error: &UpstreamError, _provider: &ProviderConfig) -> ErrorEnvelope {
        to_error_envelope(error, &self.profile)
    }

    fn validate_config(&self, provider: &ProviderConfig) -> ConfigDiagnostics {
        ConfigValidator::with_conventions(self.profile.conventions).check(provider)
    }

    fn default_config(&self) -> ProviderDefaults {
        ProviderDefaults {
            provider_type: Some(self.profile.name.to_string()),
            api_base_url: Some(self.profile.default_base_url.to_string()),
            transformer: Some(self.profile.name.to_string()),
            timeout: Some(self.profile.default_timeout_ms),
            max_retries: Some(3),
            retry_delay: Some(1_000),
            ..ProviderDefaults::default()
        }
    }
}
