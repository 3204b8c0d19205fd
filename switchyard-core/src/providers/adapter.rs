//! Transformer contract
//!
//! Every adapter converts a canonical request into a provider wire request,
//! converts provider replies (whole or streamed) back, and normalizes provider
//! errors. All operations are pure: no I/O, no state kept between calls, and
//! inputs are only read, never mutated.

use crate::config::{ConfigDiagnostics, ProviderConfig, ProviderDefaults};
use crate::protocol::{CanonicalRequest, CanonicalResponse, ErrorEnvelope};
use crate::providers::gemini::GenerateContentRequest;
use crate::providers::openai::ChatCompletionRequest;
use serde::Serialize;
use serde_json::Value;
use std::fmt;

/// Core trait every provider adapter implements
pub trait Transformer: Send + Sync {
    /// Stable identifier used for registry lookup and diagnostics
    fn name(&self) -> &str;

    /// Convert a canonical request into the upstream wire request
    ///
    /// Unsupported fields are dropped, never rejected.
    fn transform_request(&self, request: &CanonicalRequest, provider: &ProviderConfig) -> ProviderRequest;

    /// Convert a whole upstream reply body into a canonical response
    ///
    /// Always returns a structurally valid response, even for an empty or
    /// unrecognised body.
    fn transform_response(&self, response: &Value, provider: &ProviderConfig) -> CanonicalResponse;

    /// Re-frame one unit of the upstream streaming protocol
    ///
    /// Returns the re-framed line, the input unchanged, or `None` to suppress
    /// the unit. On a parse failure the input is returned unchanged.
    fn transform_stream_chunk(&self, raw: &str, provider: &ProviderConfig) -> Option<String> {
        let _ = provider;
        Some(raw.to_string())
    }

    /// Normalize any upstream failure into the canonical error envelope
    fn transform_error(&self, error: &UpstreamError, provider: &ProviderConfig) -> ErrorEnvelope;

    /// Advisory configuration checks for a provider of this type
    fn validate_config(&self, provider: &ProviderConfig) -> ConfigDiagnostics;

    /// Seed values for a newly added provider of this type
    fn default_config(&self) -> ProviderDefaults;
}

impl fmt::Debug for dyn Transformer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transformer").field("name", &self.name()).finish()
    }
}

/// Request body in one of the upstream wire shapes
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ProviderRequest {
    /// Canonical protocol, sent verbatim
    Canonical(CanonicalRequest),
    /// OpenAI-style chat completion
    OpenAi(ChatCompletionRequest),
    /// Gemini `generateContent`
    Gemini(GenerateContentRequest),
}

impl ProviderRequest {
    /// Model the upstream should run
    ///
    /// For Gemini the model travels in the URL rather than the body, so the
    /// HTTP layer needs this to build the endpoint.
    pub fn upstream_model(&self) -> &str {
        match self {
            Self::Canonical(request) => &request.model,
            Self::OpenAi(request) => &request.model,
            Self::Gemini(request) => &request.model,
        }
    }

    /// Whether the client asked for a streamed reply
    pub fn is_stream(&self) -> bool {
        match self {
            Self::Canonical(request) => request.stream.unwrap_or(false),
            Self::OpenAi(request) => request.stream.unwrap_or(false),
            Self::Gemini(request) => request.stream,
        }
    }

    /// Serialize to the exact upstream JSON body
    pub fn to_json(&self) -> serde_json::Result<Value> {
        serde_json::to_value(self)
    }

    pub fn as_openai(&self) -> Option<&ChatCompletionRequest> {
        match self {
            Self::OpenAi(request) => Some(request),
            _ => None,
        }
    }

    pub fn as_gemini(&self) -> Option<&GenerateContentRequest> {
        match self {
            Self::Gemini(request) => Some(request),
            _ => None,
        }
    }

    pub fn as_canonical(&self) -> Option<&CanonicalRequest> {
        match self {
            Self::Canonical(request) => Some(request),
            _ => None,
        }
    }
}

/// An upstream failure as seen by the HTTP layer
///
/// Any combination of fields may be present: a non-2xx reply has a status and
/// usually a body, a transport failure only has a message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpstreamError {
    /// HTTP status, when a reply was received
    pub status: Option<u16>,
    /// Raw reply body
    pub body: Option<String>,
    /// Transport or client-side error text
    pub message: Option<String>,
}

impl UpstreamError {
    /// A non-2xx reply with its body
    pub fn from_response(status: u16, body: impl Into<String>) -> Self {
        Self {
            status: Some(status),
            body: Some(body.into()),
            message: None,
        }
    }

    /// A failure where only the status is known
    pub fn from_status(status: u16) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    /// A failure that never produced a reply (connect error, timeout, ...)
    pub fn transport(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            ..Self::default()
        }
    }

    /// Wrap any error value
    pub fn from_error(error: &dyn std::error::Error) -> Self {
        Self::transport(error.to_string())
    }

    /// The body parsed as JSON, if it is JSON
    pub fn json_body(&self) -> Option<Value> {
        self.body
            .as_deref()
            .and_then(|body| serde_json::from_str(body).ok())
    }
}

impl fmt::Display for UpstreamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.status, &self.message) {
            (Some(status), _) => write!(f, "upstream returned HTTP {}", status),
            (None, Some(message)) => write!(f, "upstream call failed: {}", message),
            (None, None) => write!(f, "upstream call failed"),
        }
    }
}
