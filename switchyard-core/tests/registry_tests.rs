//! Tests for transformer resolution and runtime registration

use serde_json::Value;
use std::sync::Arc;
use switchyard_core::config::{ConfigDiagnostics, ProviderConfig, ProviderDefaults};
use switchyard_core::protocol::{CanonicalRequest, CanonicalResponse, ErrorEnvelope, ErrorKind};
use switchyard_core::providers::{
    PassthroughTransformer, ProviderRequest, Transformer, TransformerRegistry, UpstreamError,
    DEEPSEEK, GEMINI, OPENAI, PASSTHROUGH,
};

/// Adapter that rewrites nothing but the model name
struct PinnedModel(&'static str);

impl Transformer for PinnedModel {
    fn name(&self) -> &str {
        "pinned"
    }

    fn transform_request(&self, request: &CanonicalRequest, _provider: &ProviderConfig) -> ProviderRequest {
        let mut request = request.clone();
        request.model = self.0.to_string();
        ProviderRequest::Canonical(request)
    }

    fn transform_response(&self, response: &Value, provider: &ProviderConfig) -> CanonicalResponse {
        PassthroughTransformer.transform_response(response, provider)
    }

    fn transform_error(&self, _error: &UpstreamError, _provider: &ProviderConfig) -> ErrorEnvelope {
        ErrorEnvelope::new(ErrorKind::ApiError, "pinned")
    }

    fn validate_config(&self, _provider: &ProviderConfig) -> ConfigDiagnostics {
        ConfigDiagnostics::from_errors(Vec::new())
    }

    fn default_config(&self) -> ProviderDefaults {
        ProviderDefaults::default()
    }
}

fn provider(transformer: Option<&str>) -> ProviderConfig {
    let provider = ProviderConfig::new("p", "custom", "https://llm.example.com/v1", "key-0123456789");
    match transformer {
        Some(name) => provider.with_transformer(name),
        None => provider,
    }
}

#[test]
fn test_builtins_resolve_by_name() {
    let registry = TransformerRegistry::new();
    for name in [PASSTHROUGH, OPENAI, DEEPSEEK, GEMINI] {
        assert!(registry.contains(name));
        assert_eq!(registry.resolve(Some(name)).name(), name);
    }
}

#[test]
fn test_unknown_name_falls_back_to_passthrough() {
    let registry = TransformerRegistry::new();
    let transformer = registry.resolve_for(&provider(Some("does-not-exist")));
    assert_eq!(transformer.name(), PASSTHROUGH);

    let unset = registry.resolve_for(&provider(None));
    assert_eq!(unset.name(), PASSTHROUGH);
}

#[test]
fn test_register_custom_adapter() {
    let registry = TransformerRegistry::new();
    registry.register("pinned", Arc::new(PinnedModel("house-model")));

    assert!(registry.contains("pinned"));
    assert_eq!(registry.list_names(), vec!["deepseek", "gemini", "openai", "passthrough", "pinned"]);

    let request = CanonicalRequest::new("claude-3-5-sonnet-20241022", vec![], 10);
    let provider = provider(Some("pinned"));
    let upstream = registry.resolve_for(&provider).transform_request(&request, &provider);
    assert_eq!(upstream.upstream_model(), "house-model");
}

#[test]
fn test_register_replaces_existing() {
    let registry = TransformerRegistry::new();
    registry.register(GEMINI, Arc::new(PinnedModel("x")));
    assert_eq!(registry.resolve(Some(GEMINI)).name(), "pinned");
    assert_eq!(registry.list_names().len(), 4);
}

#[tokio::test]
async fn test_concurrent_resolution_and_registration() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();

    let registry = Arc::new(TransformerRegistry::new());
    let mut handles = Vec::new();

    for i in 0..16 {
        let registry = Arc::clone(&registry);
        handles.push(tokio::spawn(async move {
            if i % 4 == 0 {
                registry.register(format!("custom-{}", i), Arc::new(PinnedModel("m")));
            }
            let name = [OPENAI, DEEPSEEK, GEMINI, "missing"][i % 4];
            let resolved = registry.resolve(Some(name));
            (name, resolved.name().to_string())
        }));
    }

    for handle in handles {
        let (requested, resolved) = handle.await.unwrap();
        let expected = if requested == "missing" { PASSTHROUGH } else { requested };
        assert_eq!(resolved, expected);
    }

    assert_eq!(registry.list_names().len(), 8);
}
