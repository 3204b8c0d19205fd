//! Integration tests for provider file loading and validation

use std::env;
use std::fs;
use std::path::PathBuf;
use switchyard_core::config::{
    load_from_json, load_from_yaml, ConfigError, ProviderConfig, SafeLogging, ValidationErrorKind,
};
use switchyard_core::providers::{Transformer, TransformerRegistry};
use tempfile::TempDir;

/// Helper to create a test config file
fn create_test_file(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_load_valid_yaml_config() {
    env::set_var("SWITCHYARD_TEST_DEEPSEEK_KEY", "sk-from-env-0123456789");

    let yaml = r#"
providers:
  - id: deepseek
    name: DeepSeek
    type: deepseek
    apiBaseUrl: https://api.deepseek.com/v1
    apiKey: ${SWITCHYARD_TEST_DEEPSEEK_KEY}
    transformer: deepseek
    timeout: 120000
    maxRetries: 2
  - id: local
    name: Local gateway
    type: anthropic
    apiBaseUrl: http://localhost:8080/v1
    models:
      - claude-3-5-sonnet-20241022
"#;

    let dir = TempDir::new().unwrap();
    let path = create_test_file(&dir, "providers.yaml", yaml);

    let file = load_from_yaml(path).unwrap();
    assert_eq!(file.providers.len(), 2);

    let deepseek = file.get("deepseek").unwrap();
    assert_eq!(deepseek.api_key.expose_secret(), "sk-from-env-0123456789");
    assert_eq!(deepseek.timeout, Some(120_000));
    assert_eq!(deepseek.max_retries, Some(2));

    let local = file.get("local").unwrap();
    assert!(local.api_key.is_empty());
    assert!(local.transformer.is_none());
}

#[test]
fn test_load_valid_json_config() {
    let json = r#"{
        "providers": [{
            "id": "gemini",
            "name": "Gemini",
            "type": "gemini",
            "apiBaseUrl": "https://generativelanguage.googleapis.com/v1beta",
            "apiKey": "AIzaSyExample012345",
            "transformer": "gemini",
            "retryDelay": 500
        }]
    }"#;

    let dir = TempDir::new().unwrap();
    let path = create_test_file(&dir, "providers.json", json);

    let file = load_from_json(path).unwrap();
    assert_eq!(file.providers[0].retry_delay, Some(500));
}

#[test]
fn test_missing_env_var() {
    let yaml = r#"
providers:
  - id: openai
    name: OpenAI
    type: openai
    apiBaseUrl: https://api.openai.com/v1
    apiKey: ${SWITCHYARD_TEST_DEFINITELY_UNSET}
"#;

    let dir = TempDir::new().unwrap();
    let path = create_test_file(&dir, "providers.yaml", yaml);

    match load_from_yaml(path) {
        Err(ConfigError::EnvVarNotFound { var }) => assert_eq!(var, "SWITCHYARD_TEST_DEFINITELY_UNSET"),
        other => panic!("expected EnvVarNotFound, got {:?}", other),
    }
}

#[test]
fn test_duplicate_provider_ids_rejected() {
    let yaml = r#"
providers:
  - id: same
    name: One
    type: openai
    apiBaseUrl: https://api.openai.com/v1
  - id: same
    name: Two
    type: openai
    apiBaseUrl: https://api.openai.com/v1
"#;

    let dir = TempDir::new().unwrap();
    let path = create_test_file(&dir, "providers.yaml", yaml);

    match load_from_yaml(path) {
        Err(ConfigError::ValidationError(e)) => {
            assert_eq!(e.field_path, "providers[1].id");
            assert!(matches!(e.kind, ValidationErrorKind::DuplicateValue { .. }));
        }
        other => panic!("expected a validation error, got {:?}", other),
    }
}

#[test]
fn test_bad_url_rejected() {
    let yaml = r#"
providers:
  - id: broken
    name: Broken
    type: openai
    apiBaseUrl: ftp://files.example.com
"#;

    let dir = TempDir::new().unwrap();
    let path = create_test_file(&dir, "providers.yaml", yaml);

    let err = load_from_yaml(path).unwrap_err();
    assert!(err.to_string().contains("providers[0].apiBaseUrl"));
}

#[test]
fn test_parse_error_has_location() {
    let dir = TempDir::new().unwrap();
    let path = create_test_file(&dir, "providers.json", "{\"providers\": [ }");

    match load_from_json(path) {
        Err(ConfigError::ParseError { line, column, .. }) => {
            assert_eq!(line, Some(1));
            assert!(column.is_some());
        }
        other => panic!("expected a parse error, got {:?}", other),
    }
}

#[test]
fn test_missing_file() {
    let dir = TempDir::new().unwrap();
    let err = load_from_yaml(dir.path().join("absent.yaml")).unwrap_err();
    assert!(matches!(err, ConfigError::IoError { .. }));
}

#[test]
fn test_defaults_seed_a_new_provider() {
    let registry = TransformerRegistry::new();
    let gemini = registry.resolve(Some("gemini"));

    let mut provider = ProviderConfig::new("g", "gemini", "", "AIzaSyExample012345");
    provider.apply_defaults(&gemini.default_config());

    assert_eq!(provider.api_base_url, "https://generativelanguage.googleapis.com/v1beta");
    assert_eq!(provider.transformer.as_deref(), Some("gemini"));
    assert_eq!(provider.max_retries, Some(3));
    assert!(gemini.validate_config(&provider).valid);
}

#[test]
fn test_keys_never_logged() {
    let provider = ProviderConfig::new("o", "openai", "https://api.openai.com/v1", "sk-live-abcdefghijklmnop");
    let debug = format!("{:?}", provider);
    let summary = provider.safe_for_logging();

    assert!(!debug.contains("abcdefghijklmnop"));
    assert!(!summary.contains("abcdefghijklmnop"));
    assert!(summary.contains("sk-...mnop"));
}
