//! Conversion between the canonical protocol and OpenAI-style chat completions

use super::profile::OpenAiProfile;
use super::types::*;
use crate::config::ProviderConfig;
use crate::protocol::{
    CanonicalMessage, CanonicalRequest, CanonicalResponse, ContentPart, ErrorEnvelope, ErrorKind,
    MessageContent, Role, StopReason, Usage,
};
use crate::providers::adapter::UpstreamError;
use crate::providers::support::{
    fallback_error, generate_message_id, parse_data_uri, salvage_message, to_data_uri,
};
use serde::Deserialize;
use serde_json::{json, Value};

/// Map an OpenAI-style `finish_reason`
///
/// Anything outside the known vocabulary has no canonical counterpart.
pub fn map_finish_reason(reason: &str) -> Option<StopReason> {
    match reason {
        "stop" => Some(StopReason::EndTurn),
        "length" => Some(StopReason::MaxTokens),
        "content_filter" => Some(StopReason::StopSequence),
        "tool_calls" | "function_call" => Some(StopReason::ToolUse),
        _ => None,
    }
}

/// Map a provider error `code` or `type`
pub fn map_error_code(code: &str) -> Option<ErrorKind> {
    match code {
        "invalid_api_key" | "invalid_authentication" | "authentication_error" => {
            Some(ErrorKind::AuthenticationError)
        }
        "permission_error" | "permission_denied" | "unsupported_country_region_territory" => {
            Some(ErrorKind::PermissionError)
        }
        "rate_limit_exceeded" | "rate_limit_error" | "insufficient_quota" => {
            Some(ErrorKind::RateLimitError)
        }
        "model_not_found" | "invalid_request_error" | "context_length_exceeded" => {
            Some(ErrorKind::InvalidRequestError)
        }
        "content_filter" | "content_policy_violation" => Some(ErrorKind::ContentPolicyError),
        "server_error" | "api_error" => Some(ErrorKind::ApiError),
        _ => None,
    }
}

/// Kinds that say little beyond "the request failed"
fn is_generic(kind: ErrorKind) -> bool {
    matches!(kind, ErrorKind::InvalidRequestError | ErrorKind::ApiError)
}

// -- Outbound: canonical request -> chat completion request --

/// Build the upstream request; the canonical request is only read
pub fn to_chat_request(
    request: &CanonicalRequest,
    provider: &ProviderConfig,
    profile: &OpenAiProfile,
) -> ChatCompletionRequest {
    let mut messages = Vec::with_capacity(request.messages.len() + 1);
    if let Some(system) = request.system_text() {
        messages.push(ChatMessage {
            role: "system".to_string(),
            content: ChatContent::Text(system),
        });
    }
    messages.extend(
        request
            .messages
            .iter()
            .map(|message| to_chat_message(message, profile)),
    );

    let mut extra = request.extra.clone();
    extra.retain(|key, _| !RESERVED_FIELDS.contains(&key.as_str()));
    if request.stream == Some(true) && !extra.contains_key("stream_options") {
        // Usage only arrives on the final chunk when asked for
        extra.insert("stream_options".to_string(), json!({"include_usage": true}));
    }

    ChatCompletionRequest {
        model: profile.models.resolve(&request.model, provider),
        messages,
        max_tokens: Some(profile.bound_max_tokens(request.max_tokens)),
        temperature: request.temperature.filter(|_| profile.forwards_temperature),
        top_p: request.top_p,
        stop: request.stop_sequences.clone(),
        stream: request.stream,
        extra,
    }
}

fn to_chat_message(message: &CanonicalMessage, profile: &OpenAiProfile) -> ChatMessage {
    let role = match message.role {
        Role::User => "user",
        Role::Assistant => "assistant",
    };

    let content = match &message.content {
        MessageContent::Text(text) => ChatContent::Text(text.clone()),
        MessageContent::Parts(parts) if !profile.multimodal => {
            let dropped = parts.iter().filter(|p| p.as_text().is_none()).count();
            if dropped > 0 {
                tracing::debug!(adapter = profile.name, dropped, "dropping non-text parts for text-only upstream");
            }
            ChatContent::Text(message.content.joined_text())
        }
        MessageContent::Parts(parts) => {
            ChatContent::Parts(parts.iter().filter_map(|part| to_chat_part(part, profile)).collect())
        }
    };

    ChatMessage {
        role: role.to_string(),
        content,
    }
}

fn to_chat_part(part: &ContentPart, profile: &OpenAiProfile) -> Option<ChatContentPart> {
    if let Some(text) = part.as_text() {
        return Some(ChatContentPart::Text { text: text.to_string() });
    }
    match part {
        ContentPart::Image { source } => Some(ChatContentPart::ImageUrl {
            image_url: ImageUrl {
                url: to_data_uri(&source.media_type, &source.data),
                detail: None,
            },
        }),
        ContentPart::Other(map) if part.kind() == "image_url" => {
            // OpenAI-shaped image parts sent by the client; data URIs are
            // normalized through the canonical image shape
            let url = map.get("image_url")?.get("url")?.as_str()?;
            let url = match parse_data_uri(url) {
                Some((mime, data)) => to_data_uri(&mime, &data),
                None => url.to_string(),
            };
            Some(ChatContentPart::ImageUrl {
                image_url: ImageUrl { url, detail: None },
            })
        }
        other => {
            tracing::debug!(adapter = profile.name, kind = other.kind(), "dropping unsupported content part");
            None
        }
    }
}

// -- Inbound: chat completion reply -> canonical response --

/// Read a whole reply body into a canonical response
///
/// Only the first choice is read. A body that does not match the wire shape
/// yields an empty response.
pub fn from_chat_response(body: &Value, profile: &OpenAiProfile) -> CanonicalResponse {
    let reply = match ChatCompletionResponse::deserialize(body) {
        Ok(reply) => reply,
        Err(e) => {
            tracing::warn!(adapter = profile.name, error = %e, "unrecognised chat completion reply");
            ChatCompletionResponse::default()
        }
    };

    let mut response = CanonicalResponse::empty(
        reply.id.unwrap_or_else(generate_message_id),
        reply.model.unwrap_or_default(),
    );

    if let Some(usage) = reply.usage {
        response.usage = Usage::new(usage.prompt_tokens, usage.completion_tokens);
    }

    let Some(choice) = reply.choices.into_iter().next() else {
        return response;
    };

    response.stop_reason = choice.finish_reason.as_deref().and_then(map_finish_reason);

    if let Some(message) = choice.message {
        match message.content {
            Some(ReplyContent::Text(text)) if !text.is_empty() => {
                response.content.push(ContentPart::text(text));
            }
            Some(ReplyContent::Parts(parts)) => {
                response
                    .content
                    .extend(parts.iter().filter_map(|part| from_reply_part(part, profile)));
            }
            _ => {}
        }

        for call in message.tool_calls.unwrap_or_default() {
            let input = if call.function.arguments.trim().is_empty() {
                json!({})
            } else {
                serde_json::from_str(&call.function.arguments)
                    .unwrap_or(Value::String(call.function.arguments))
            };
            response.content.push(ContentPart::ToolUse {
                id: call.id,
                name: call.function.name,
                input,
            });
        }
    }

    response
}

fn from_reply_part(part: &Value, profile: &OpenAiProfile) -> Option<ContentPart> {
    match part.get("type").and_then(Value::as_str) {
        Some("text") => part.get("text").and_then(Value::as_str).map(ContentPart::text),
        Some("image_url") if profile.multimodal => part
            .get("image_url")
            .and_then(|image| image.get("url"))
            .and_then(Value::as_str)
            .and_then(parse_data_uri)
            .map(|(mime, data)| ContentPart::image(mime, data)),
        kind => {
            tracing::debug!(adapter = profile.name, kind = kind.unwrap_or("<none>"), "skipping reply content part");
            None
        }
    }
}

// -- Errors --

/// Normalize an upstream failure
pub fn to_error_envelope(error: &UpstreamError, profile: &OpenAiProfile) -> ErrorEnvelope {
    let parsed = error
        .json_body()
        .and_then(|body| ErrorResponse::deserialize(&body).ok());

    let Some(ErrorResponse { error: api_error }) = parsed else {
        return fallback_error(error);
    };

    let code = api_error.code_text();
    let by_type = api_error.error_type.as_deref().and_then(map_error_code);
    let by_code = code.as_deref().and_then(map_error_code);
    let kind = match (by_type, by_code) {
        // The specific kind may sit in either field
        (Some(t), Some(c)) if is_generic(t) && !is_generic(c) => c,
        (Some(t), _) => t,
        (None, c) => c.unwrap_or(ErrorKind::ApiError),
    };
    let message = api_error
        .message
        .clone()
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| salvage_message(error));

    tracing::debug!(adapter = profile.name, kind = %kind, code = code.as_deref(), "normalized upstream error");

    let envelope = ErrorEnvelope::new(kind, message);
    match code {
        Some(code) => envelope.with_code(code),
        None => envelope,
    }
}
