//! Conversion between the canonical protocol and Gemini `generateContent`

use super::types::*;
use crate::config::ProviderConfig;
use crate::protocol::{
    CanonicalMessage, CanonicalRequest, CanonicalResponse, ContentPart, ErrorEnvelope, ErrorKind,
    MessageContent, Role, StopReason, Usage,
};
use crate::providers::adapter::UpstreamError;
use crate::providers::support::{
    fallback_error, generate_message_id, salvage_message, status_error_kind, ModelMap,
};
use serde::Deserialize;
use serde_json::Value;

/// Registry name of the Gemini adapter
pub const GEMINI: &str = "gemini";

pub const GEMINI_MODELS: ModelMap = ModelMap::new(
    &[
        ("claude-3-5-sonnet-20241022", "gemini-1.5-pro"),
        ("claude-3-5-sonnet-latest", "gemini-1.5-pro"),
        ("claude-3-opus-20240229", "gemini-1.5-pro"),
        ("claude-3-7-sonnet-20250219", "gemini-2.0-flash"),
        ("claude-3-5-haiku-20241022", "gemini-1.5-flash"),
        ("claude-3-haiku-20240307", "gemini-1.5-flash"),
    ],
    "gemini-1.5-flash",
);

/// Map a Gemini `finishReason`
///
/// Unlike the OpenAI-style adapters, an unrecognised reason still counts as a
/// normal end of turn.
pub fn map_finish_reason(reason: &str) -> StopReason {
    match reason {
        "STOP" => StopReason::EndTurn,
        "MAX_TOKENS" => StopReason::MaxTokens,
        "SAFETY" | "RECITATION" => StopReason::StopSequence,
        _ => StopReason::EndTurn,
    }
}

/// Map a gRPC status name
pub fn map_rpc_status(status: &str) -> ErrorKind {
    match status {
        "INVALID_ARGUMENT" | "FAILED_PRECONDITION" | "NOT_FOUND" | "OUT_OF_RANGE" => {
            ErrorKind::InvalidRequestError
        }
        "UNAUTHENTICATED" => ErrorKind::AuthenticationError,
        "PERMISSION_DENIED" => ErrorKind::PermissionError,
        "RESOURCE_EXHAUSTED" => ErrorKind::RateLimitError,
        _ => ErrorKind::ApiError,
    }
}

// -- Outbound --

pub fn to_generate_request(request: &CanonicalRequest, provider: &ProviderConfig) -> GenerateContentRequest {
    let system_instruction = request.system_text().map(|text| Content {
        role: None,
        parts: vec![Part::text(text)],
    });

    GenerateContentRequest {
        model: GEMINI_MODELS.resolve(&request.model, provider),
        stream: request.stream.unwrap_or(false),
        contents: request.messages.iter().map(to_content).collect(),
        system_instruction,
        generation_config: Some(GenerationConfig {
            max_output_tokens: Some(request.max_tokens),
            temperature: request.temperature,
            top_p: request.top_p,
            top_k: request.top_k,
            stop_sequences: request.stop_sequences.clone(),
        }),
        safety_settings: permissive_safety_settings(),
    }
}

fn to_content(message: &CanonicalMessage) -> Content {
    let role = match message.role {
        Role::Assistant => "model",
        Role::User => "user",
    };

    let mut parts: Vec<Part> = match &message.content {
        MessageContent::Text(text) => vec![Part::text(text.clone())],
        MessageContent::Parts(parts) => parts.iter().filter_map(to_part).collect(),
    };
    // Gemini rejects a content object without parts
    if parts.is_empty() {
        parts.push(Part::text(String::new()));
    }

    Content {
        role: Some(role.to_string()),
        parts,
    }
}

fn to_part(part: &ContentPart) -> Option<Part> {
    if let Some(text) = part.as_text() {
        return Some(Part::text(text));
    }
    match part {
        ContentPart::Image { source } => Some(Part::inline_data(&source.media_type, &source.data)),
        ContentPart::ToolUse { name, input, .. } => Some(Part {
            function_call: Some(FunctionCall {
                name: name.clone(),
                args: input.clone(),
            }),
            ..Part::default()
        }),
        other => {
            tracing::debug!(adapter = GEMINI, kind = other.kind(), "dropping unsupported content part");
            None
        }
    }
}

// -- Inbound --

/// Read a whole reply into a canonical response; first candidate only
pub fn from_generate_response(body: &Value) -> CanonicalResponse {
    let reply = match GenerateContentResponse::deserialize(body) {
        Ok(reply) => reply,
        Err(e) => {
            tracing::warn!(adapter = GEMINI, error = %e, "unrecognised generateContent reply");
            GenerateContentResponse::default()
        }
    };

    let mut response = CanonicalResponse::empty(
        reply.response_id.unwrap_or_else(generate_message_id),
        reply.model_version.unwrap_or_default(),
    );

    if let Some(usage) = reply
        .usage_metadata
        .as_ref()
        .and_then(|usage| UsageMetadata::deserialize(usage).ok())
    {
        response.usage = Usage::new(usage.prompt_token_count, usage.candidates_token_count);
    }

    let Some(candidate) = reply.candidates.into_iter().next() else {
        return response;
    };

    response.stop_reason = candidate.finish_reason.as_deref().map(map_finish_reason);
    response.content = candidate
        .content
        .map(|content| content.parts.into_iter().filter_map(from_part).collect())
        .unwrap_or_default();

    response
}

fn from_part(part: Part) -> Option<ContentPart> {
    if let Some(text) = part.text {
        return Some(ContentPart::text(text));
    }
    if let Some(inline) = part.inline_data {
        return Some(ContentPart::image(inline.mime_type, inline.data));
    }
    if let Some(call) = part.function_call {
        return Some(ContentPart::ToolUse {
            id: None,
            name: call.name,
            input: call.args,
        });
    }
    tracing::debug!(adapter = GEMINI, keys = ?part.extra.keys().collect::<Vec<_>>(), "skipping reply part");
    None
}

// -- Errors --

/// Normalize an upstream failure
///
/// The streaming endpoint wraps its error body in a one-element array; both
/// forms are understood.
pub fn to_error_envelope(error: &UpstreamError) -> ErrorEnvelope {
    let parsed = error.json_body().and_then(|body| {
        let body = match body {
            Value::Array(mut items) if !items.is_empty() => items.swap_remove(0),
            other => other,
        };
        ErrorResponse::deserialize(&body).ok()
    });

    let Some(ErrorResponse { error: status }) = parsed else {
        return fallback_error(error);
    };

    let kind = if has_invalid_key_reason(status.details.as_deref()) {
        ErrorKind::AuthenticationError
    } else if let Some(name) = status.status.as_deref() {
        map_rpc_status(name)
    } else {
        status
            .code
            .or(error.status)
            .map(status_error_kind)
            .unwrap_or(ErrorKind::ApiError)
    };

    let message = status
        .message
        .clone()
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| salvage_message(error));

    let mut envelope = ErrorEnvelope::new(kind, message);
    if let Some(name) = status.status {
        envelope = envelope.with_code(name);
    }
    if let Some(details) = status.details {
        envelope = envelope.with_details(details);
    }
    envelope
}

/// Gemini reports a bad key as `INVALID_ARGUMENT` with this reason attached
fn has_invalid_key_reason(details: Option<&[Value]>) -> bool {
    details.unwrap_or_default().iter().any(|detail| {
        detail.get("reason").and_then(Value::as_str) == Some("API_KEY_INVALID")
    })
}
