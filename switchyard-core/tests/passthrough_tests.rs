//! Tests for the passthrough adapter

use serde_json::json;
use switchyard_core::config::ProviderConfig;
use switchyard_core::protocol::{CanonicalRequest, CanonicalResponse, ErrorKind, StopReason};
use switchyard_core::providers::{PassthroughTransformer, Transformer, UpstreamError};
use test_case::test_case;

fn provider() -> ProviderConfig {
    ProviderConfig::new("anthropic", "anthropic", "https://api.anthropic.com/v1", "sk-ant-0123456789")
}

#[test]
fn test_request_with_unknown_fields_is_unchanged() {
    let raw = json!({
        "model": "claude-3-5-sonnet-20241022",
        "max_tokens": 256,
        "system": [{"type": "text", "text": "be nice", "cache_control": {"type": "ephemeral"}}],
        "messages": [
            {"role": "user", "content": "hello"},
            {"role": "assistant", "content": [{"type": "thinking", "thinking": "hmm", "signature": "abc"}]}
        ],
        "metadata": {"user_id": "u-1"},
        "tool_choice": {"type": "auto"}
    });
    let request: CanonicalRequest = serde_json::from_value(raw.clone()).unwrap();

    let upstream = PassthroughTransformer.transform_request(&request, &provider());
    let body = upstream.to_json().unwrap();

    assert_eq!(body["metadata"], raw["metadata"]);
    assert_eq!(body["tool_choice"], raw["tool_choice"]);
    assert_eq!(body["messages"][1], raw["messages"][1]);
    assert_eq!(upstream.upstream_model(), "claude-3-5-sonnet-20241022");
}

#[test]
fn test_response_is_unchanged() {
    let raw = json!({
        "id": "msg_01",
        "type": "message",
        "role": "assistant",
        "content": [{"type": "text", "text": "Hi!"}],
        "model": "claude-3-5-sonnet-20241022",
        "stop_reason": "end_turn",
        "stop_sequence": null,
        "usage": {
            "input_tokens": 10,
            "output_tokens": 3,
            "cache_creation_input_tokens": 5,
            "cache_read_input_tokens": 7
        }
    });

    let response = PassthroughTransformer.transform_response(&raw, &provider());
    assert_eq!(response.stop_reason, Some(StopReason::EndTurn));
    assert_eq!(response.usage.extra["cache_read_input_tokens"], 7);
    assert_eq!(serde_json::to_value(&response).unwrap(), raw);
}

#[test]
fn test_unrecognised_stop_reason_keeps_reply() {
    let raw = json!({
        "id": "msg_02",
        "type": "message",
        "role": "assistant",
        "content": [{"type": "text", "text": "partial answer"}],
        "model": "claude-3-5-sonnet-20241022",
        "stop_reason": "refusal",
        "stop_sequence": null,
        "usage": {"input_tokens": 10, "output_tokens": 2}
    });

    let response = PassthroughTransformer.transform_response(&raw, &provider());
    assert_eq!(response.id, "msg_02");
    assert_eq!(response.text(), "partial answer");
    assert_eq!(response.stop_reason, None);
    assert_eq!(response.usage.input_tokens, 10);
    assert_eq!(response.usage.output_tokens, 2);
}

#[test]
fn test_stream_lines_are_unchanged() {
    for line in [
        "event: message_start",
        "data: {\"type\":\"content_block_delta\",\"delta\":{\"text\":\"Hi\"}}",
        "data: {not valid json",
        "data: [DONE]",
    ] {
        assert_eq!(PassthroughTransformer.transform_stream_chunk(line, &provider()).as_deref(), Some(line));
    }
}

#[test_case(401, ErrorKind::AuthenticationError)]
#[test_case(403, ErrorKind::PermissionError)]
#[test_case(404, ErrorKind::InvalidRequestError)]
#[test_case(429, ErrorKind::RateLimitError)]
#[test_case(500, ErrorKind::ApiError)]
fn test_status_only_errors(status: u16, expected: ErrorKind) {
    let envelope = PassthroughTransformer.transform_error(&UpstreamError::from_status(status), &provider());
    assert_eq!(envelope.kind(), expected);
    assert_eq!(envelope.error.code, Some(status.to_string()));
}

#[test]
fn test_native_not_found_error() {
    let body = json!({"type": "error", "error": {"type": "not_found_error", "message": "model: claude-9"}});
    let envelope = PassthroughTransformer.transform_error(&UpstreamError::from_response(404, body.to_string()), &provider());
    assert_eq!(envelope.kind(), ErrorKind::InvalidRequestError);
    assert_eq!(envelope.message(), "model: claude-9");
}

#[test]
fn test_arbitrary_failure_yields_envelope() {
    let io = std::io::Error::new(std::io::ErrorKind::TimedOut, "deadline elapsed");
    let envelope = PassthroughTransformer.transform_error(&UpstreamError::from_error(&io), &provider());
    assert_eq!(envelope.kind(), ErrorKind::ApiError);
    assert_eq!(envelope.message(), "deadline elapsed");

    let json = serde_json::to_value(&envelope).unwrap();
    assert_eq!(json["type"], "error");
    assert_eq!(json["error"]["type"], "api_error");
}

#[test]
fn test_round_trip_keeps_assistant_role() {
    let response: CanonicalResponse = PassthroughTransformer.transform_response(&json!({}), &provider());
    assert_eq!(serde_json::to_value(&response).unwrap()["role"], "assistant");
    assert_eq!(response.usage.input_tokens, 0);
}
