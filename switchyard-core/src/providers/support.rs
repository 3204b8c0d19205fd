//! Helpers shared by the adapters
//!
//! Model name mapping, the HTTP status error table, data URIs, SSE framing,
//! and the generic error fallback.

use crate::config::ProviderConfig;
use crate::protocol::{ErrorEnvelope, ErrorKind};
use crate::providers::adapter::{Transformer, UpstreamError};
use crate::providers::error::TransformError;
use serde::Serialize;

/// Prefix of every SSE data line
pub const SSE_DATA_PREFIX: &str = "data: ";

/// Payload of the SSE termination line
pub const DONE_SENTINEL: &str = "[DONE]";

/// Canonical SSE termination frame
pub const DONE_FRAME: &str = "data: [DONE]\n\n";

/// Static canonical-to-upstream model table with a fallback
#[derive(Debug, Clone, Copy)]
pub struct ModelMap {
    entries: &'static [(&'static str, &'static str)],
    fallback: &'static str,
}

impl ModelMap {
    pub const fn new(entries: &'static [(&'static str, &'static str)], fallback: &'static str) -> Self {
        Self { entries, fallback }
    }

    /// Table entries as `(canonical, upstream)` pairs
    pub fn entries(&self) -> &'static [(&'static str, &'static str)] {
        self.entries
    }

    /// Model used when nothing else matches
    pub fn fallback(&self) -> &'static str {
        self.fallback
    }

    /// Look a canonical model up in the table only
    pub fn lookup(&self, requested: &str) -> Option<&'static str> {
        self.entries
            .iter()
            .find(|(canonical, _)| *canonical == requested)
            .map(|(_, upstream)| *upstream)
    }

    /// Pick the upstream model for a request
    ///
    /// A model the provider configuration lists explicitly is sent verbatim.
    /// Otherwise the table decides, and anything not in the table gets the
    /// fallback.
    pub fn resolve(&self, requested: &str, provider: &ProviderConfig) -> String {
        if provider.serves_model(requested) {
            return requested.to_string();
        }

        match self.lookup(requested) {
            Some(upstream) => upstream.to_string(),
            None => {
                tracing::debug!(
                    requested,
                    fallback = self.fallback,
                    provider = %provider.id,
                    "model not in mapping table, using fallback"
                );
                self.fallback.to_string()
            }
        }
    }
}

/// Map an HTTP status to a canonical error kind
pub fn status_error_kind(status: u16) -> ErrorKind {
    match status {
        401 => ErrorKind::AuthenticationError,
        403 => ErrorKind::PermissionError,
        404 => ErrorKind::InvalidRequestError,
        429 => ErrorKind::RateLimitError,
        _ => ErrorKind::ApiError,
    }
}

/// Best-effort human readable message for an upstream failure
pub fn salvage_message(error: &UpstreamError) -> String {
    if let Some(body) = error.body.as_deref().map(str::trim).filter(|b| !b.is_empty()) {
        return body.to_string();
    }
    if let Some(message) = error.message.as_deref().filter(|m| !m.is_empty()) {
        return message.to_string();
    }
    match error.status {
        Some(status) => format!("Upstream request failed with HTTP status {}", status),
        None => "Upstream request failed".to_string(),
    }
}

/// Error envelope for failures without a structured provider error body
///
/// Uses the status table when a status is known, `api_error` otherwise.
pub fn fallback_error(error: &UpstreamError) -> ErrorEnvelope {
    let kind = error.status.map(status_error_kind).unwrap_or(ErrorKind::ApiError);
    let envelope = ErrorEnvelope::new(kind, salvage_message(error));
    match error.status {
        Some(status) => envelope.with_code(status.to_string()),
        None => envelope,
    }
}

/// Split a `data:<mime>;base64,<payload>` URI into mime type and payload
pub fn parse_data_uri(uri: &str) -> Option<(String, String)> {
    let rest = uri.strip_prefix("data:")?;
    let (meta, payload) = rest.split_once(',')?;
    let mime = meta.strip_suffix(";base64")?;
    if mime.is_empty() || payload.is_empty() {
        return None;
    }
    Some((mime.to_string(), payload.to_string()))
}

/// Build a base64 data URI
pub fn to_data_uri(mime: &str, data: &str) -> String {
    format!("data:{};base64,{}", mime, data)
}

/// Frame a payload as `data: <json>\n\n`
pub fn sse_data<T: Serialize>(payload: &T) -> Result<String, TransformError> {
    Ok(format!("{}{}\n\n", SSE_DATA_PREFIX, serde_json::to_string(payload)?))
}

/// Outcome of re-framing one upstream stream unit
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reframed {
    /// Not a unit this adapter rewrites (comment, keep-alive, event name)
    Unchanged,
    /// Canonical frame to emit
    Frame(String),
    /// Nothing worth emitting
    Suppressed,
}

impl Reframed {
    /// Collapse into the `transform_stream_chunk` return value
    pub fn into_output(self, raw: &str) -> Option<String> {
        match self {
            Self::Frame(frame) => Some(frame),
            Self::Unchanged => Some(raw.to_string()),
            Self::Suppressed => None,
        }
    }
}

/// Log a streaming failure and hand back the untouched input
pub(crate) fn fail_open(adapter: &str, raw: &str, error: &TransformError) -> Option<String> {
    tracing::warn!(adapter, error = %error, "stream chunk transform failed, passing through unchanged");
    Some(raw.to_string())
}

/// Generate an id for replies that carry none
pub fn generate_message_id() -> String {
    format!("msg_{}", uuid::Uuid::new_v4().simple())
}

/// Run a whole upstream stream body through an adapter
///
/// The body is split into lines, blank separator lines are dropped, and the
/// frames the adapter emits are concatenated in order. Units passed through
/// without a terminator get a blank line appended.
pub fn transform_stream_body(
    transformer: &dyn Transformer,
    body: &str,
    provider: &ProviderConfig,
) -> String {
    let mut out = String::with_capacity(body.len());
    for line in body.lines().map(|line| line.trim_end_matches('\r')) {
        if line.trim().is_empty() {
            continue;
        }
        if let Some(frame) = transformer.transform_stream_chunk(line, provider) {
            out.push_str(&frame);
            if !frame.ends_with('\n') {
                out.push_str("\n\n");
            }
        }
    }
    out
}
