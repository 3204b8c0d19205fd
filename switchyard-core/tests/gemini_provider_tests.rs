//! Tests for the Gemini adapter

use serde_json::json;
use switchyard_core::config::ProviderConfig;
use switchyard_core::protocol::{
    CanonicalMessage, CanonicalRequest, ContentPart, ErrorKind, Role, StopReason,
};
use switchyard_core::providers::gemini::{GeminiTransformer, GEMINI_MODELS};
use switchyard_core::providers::{transform_stream_body, Transformer, UpstreamError};
use test_case::test_case;

fn provider() -> ProviderConfig {
    ProviderConfig::new(
        "gemini",
        "gemini",
        "https://generativelanguage.googleapis.com/v1beta",
        "AIzaSyTest0123456789",
    )
    .with_transformer("gemini")
}

#[test]
fn test_request_nesting() {
    let request = CanonicalRequest::new(
        "claude-3-5-sonnet-20241022",
        vec![
            CanonicalMessage::user(vec![
                ContentPart::text("Describe"),
                ContentPart::image("image/png", "iVBORw0KGgo"),
            ]),
            CanonicalMessage::assistant("A cat."),
        ],
        1024,
    )
    .with_system("You are terse.")
    .with_temperature(0.4)
    .with_top_p(0.8)
    .with_top_k(32)
    .with_stop_sequences(vec!["STOP".to_string()]);

    let upstream = GeminiTransformer.transform_request(&request, &provider());
    assert_eq!(upstream.upstream_model(), "gemini-1.5-pro");
    assert!(!upstream.is_stream());

    let body = upstream.to_json().unwrap();
    assert!(body.get("messages").is_none());
    assert!(body.get("model").is_none());
    assert_eq!(body["contents"][0]["role"], "user");
    assert_eq!(body["contents"][0]["parts"][0], json!({"text": "Describe"}));
    assert_eq!(
        body["contents"][0]["parts"][1],
        json!({"inlineData": {"mimeType": "image/png", "data": "iVBORw0KGgo"}})
    );
    assert_eq!(body["contents"][1]["role"], "model");
    assert_eq!(body["systemInstruction"]["parts"][0]["text"], "You are terse.");
    assert_eq!(
        body["generationConfig"],
        json!({
            "maxOutputTokens": 1024,
            "temperature": 0.4,
            "topP": 0.8,
            "topK": 32,
            "stopSequences": ["STOP"]
        })
    );

    let safety = body["safetySettings"].as_array().unwrap();
    assert_eq!(safety.len(), 4);
    assert!(safety.iter().all(|s| s["threshold"] == "BLOCK_NONE"));
}

#[test]
fn test_tool_use_becomes_function_call() {
    let request = CanonicalRequest::new(
        "claude-3-haiku-20240307",
        vec![CanonicalMessage::assistant(vec![ContentPart::ToolUse {
            id: Some("toolu_1".to_string()),
            name: "lookup".to_string(),
            input: json!({"q": "rust"}),
        }])],
        10,
    );

    let body = GeminiTransformer.transform_request(&request, &provider()).to_json().unwrap();
    assert_eq!(
        body["contents"][0]["parts"][0],
        json!({"functionCall": {"name": "lookup", "args": {"q": "rust"}}})
    );
}

#[test]
fn test_model_table_and_fallback() {
    for (canonical, upstream) in GEMINI_MODELS.entries() {
        assert!(!upstream.is_empty(), "{} has no upstream model", canonical);
    }
    let request = CanonicalRequest::new("claude-next", vec![CanonicalMessage::user("x")], 10);
    let upstream = GeminiTransformer.transform_request(&request, &provider());
    assert_eq!(upstream.upstream_model(), "gemini-1.5-flash");
}

#[test]
fn test_response_mapping() {
    let body = json!({
        "candidates": [
            {
                "content": {"role": "model", "parts": [
                    {"text": "Here: "},
                    {"inlineData": {"mimeType": "image/png", "data": "AAAA"}},
                    {"functionCall": {"name": "lookup", "args": {"q": "x"}}}
                ]},
                "finishReason": "STOP",
                "safetyRatings": []
            },
            {"content": {"role": "model", "parts": [{"text": "second"}]}, "finishReason": "STOP"}
        ],
        "usageMetadata": {"promptTokenCount": 5, "candidatesTokenCount": 7, "totalTokenCount": 12},
        "modelVersion": "gemini-1.5-pro-002"
    });

    let response = GeminiTransformer.transform_response(&body, &provider());
    assert_eq!(response.role, Role::Assistant);
    assert_eq!(response.model, "gemini-1.5-pro-002");
    assert_eq!(response.content.len(), 3);
    assert_eq!(response.content[0].as_text(), Some("Here: "));
    assert_eq!(response.content[1], ContentPart::image("image/png", "AAAA"));
    assert_eq!(response.content[2].kind(), "tool_use");
    assert_eq!(response.stop_reason, Some(StopReason::EndTurn));
    assert_eq!(response.usage.input_tokens, 5);
    assert_eq!(response.usage.output_tokens, 7);
}

#[test_case("MAX_TOKENS", StopReason::MaxTokens)]
#[test_case("SAFETY", StopReason::StopSequence)]
#[test_case("RECITATION", StopReason::StopSequence)]
#[test_case("BLOCKLIST", StopReason::EndTurn)]
fn test_unknown_reasons_end_the_turn(reason: &str, expected: StopReason) {
    let body = json!({"candidates": [{"content": {"parts": []}, "finishReason": reason}]});
    let response = GeminiTransformer.transform_response(&body, &provider());
    assert_eq!(response.stop_reason, Some(expected));
}

#[test]
fn test_missing_candidates() {
    let response = GeminiTransformer.transform_response(&json!({"promptFeedback": {"blockReason": "SAFETY"}}), &provider());
    assert!(response.content.is_empty());
    assert_eq!(response.stop_reason, None);
}

#[test_case("INVALID_ARGUMENT", ErrorKind::InvalidRequestError)]
#[test_case("NOT_FOUND", ErrorKind::InvalidRequestError)]
#[test_case("PERMISSION_DENIED", ErrorKind::PermissionError)]
#[test_case("UNAUTHENTICATED", ErrorKind::AuthenticationError)]
#[test_case("RESOURCE_EXHAUSTED", ErrorKind::RateLimitError)]
#[test_case("INTERNAL", ErrorKind::ApiError)]
#[test_case("SOMETHING_ELSE", ErrorKind::ApiError)]
fn test_rpc_status_table(status: &str, expected: ErrorKind) {
    let body = json!({"error": {
        "code": 400,
        "message": "failed",
        "status": status,
        "details": [{"@type": "type.googleapis.com/google.rpc.DebugInfo", "detail": "d"}]
    }});
    let envelope = GeminiTransformer.transform_error(&UpstreamError::from_response(400, body.to_string()), &provider());

    assert_eq!(envelope.kind(), expected);
    assert_eq!(envelope.message(), "failed");
    assert_eq!(envelope.error.code.as_deref(), Some(status));
    assert_eq!(
        envelope.error.details,
        Some(vec![json!({"@type": "type.googleapis.com/google.rpc.DebugInfo", "detail": "d"})])
    );
}

#[test_case(401, ErrorKind::AuthenticationError)]
#[test_case(403, ErrorKind::PermissionError)]
#[test_case(404, ErrorKind::InvalidRequestError)]
#[test_case(429, ErrorKind::RateLimitError)]
#[test_case(500, ErrorKind::ApiError)]
fn test_status_only_errors(status: u16, expected: ErrorKind) {
    let envelope = GeminiTransformer.transform_error(&UpstreamError::from_status(status), &provider());
    assert_eq!(envelope.kind(), expected);
    assert!(envelope.message().contains(&status.to_string()));
}

#[test]
fn test_stream_units() {
    let body = concat!(
        "data: {\"candidates\":[{\"content\":{\"role\":\"model\",\"parts\":[{\"text\":\"Hel\"}]}}]}\r\n",
        "\r\n",
        "data: {\"candidates\":[{\"content\":{\"role\":\"model\",\"parts\":[{\"text\":\"lo\"}]},\"finishReason\":\"MAX_TOKENS\"}],\"usageMetadata\":{\"promptTokenCount\":3,\"candidatesTokenCount\":2}}\r\n",
    );

    let out = transform_stream_body(&GeminiTransformer, body, &provider());
    let frames: Vec<&str> = out.split_inclusive("\n\n").collect();
    assert_eq!(frames.len(), 2);
    assert!(frames.iter().all(|f| f.starts_with("data: ")));
    assert!(frames[1].contains("\"finishReason\":\"max_tokens\""));

    let last: serde_json::Value =
        serde_json::from_str(frames[1].trim_start_matches("data: ").trim_end()).unwrap();
    assert_eq!(last["usageMetadata"], json!({"promptTokenCount": 3, "candidatesTokenCount": 2}));
}

#[test]
fn test_stream_fail_open() {
    let broken = r#"data: {"candidates": [{"content": "#;
    assert_eq!(GeminiTransformer.transform_stream_chunk(broken, &provider()).as_deref(), Some(broken));
    assert_eq!(
        GeminiTransformer.transform_stream_chunk("data: {not valid json", &provider()).as_deref(),
        Some("data: {not valid json")
    );
}

#[test]
fn test_validate_config() {
    assert!(GeminiTransformer.validate_config(&provider()).valid);

    let wrong = ProviderConfig::new("g", "gemini", "https://example.com", "sk-0123456789");
    let diagnostics = GeminiTransformer.validate_config(&wrong);
    assert!(!diagnostics.valid);
    assert!(diagnostics.errors.iter().any(|e| e.contains("AIza")));
}
