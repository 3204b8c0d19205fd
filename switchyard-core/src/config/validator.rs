//! Advisory provider diagnostics
//!
//! Unlike [`ProviderConfig::validate`](super::ProviderConfig::validate), which
//! rejects a configuration file at load time, the checks here only produce
//! messages for a configuration UI. A provider that fails them is still usable.

use super::env::ENV_VAR_PATTERN;
use super::error::ValidationError;
use super::schema::ProviderConfig;
use serde::{Deserialize, Serialize};

/// Result of a provider configuration check
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigDiagnostics {
    pub valid: bool,
    pub errors: Vec<String>,
}

impl ConfigDiagnostics {
    /// Build diagnostics from collected validation errors
    pub fn from_errors(errors: Vec<ValidationError>) -> Self {
        Self {
            valid: errors.is_empty(),
            errors: errors.iter().map(ToString::to_string).collect(),
        }
    }
}

/// Provider-specific conventions an adapter wants checked
#[derive(Debug, Clone, Copy, Default)]
pub struct ProviderConventions {
    /// Substring the base URL is expected to contain
    pub url_marker: Option<&'static str>,
    /// Prefix API keys of this provider start with
    pub key_prefix: Option<&'static str>,
}

/// Collects advisory diagnostics for a provider configuration
#[derive(Debug, Clone, Copy, Default)]
pub struct ConfigValidator {
    conventions: ProviderConventions,
}

impl ConfigValidator {
    /// Create a validator that only runs the generic checks
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a validator that also checks an adapter's conventions
    pub fn with_conventions(conventions: ProviderConventions) -> Self {
        Self { conventions }
    }

    /// Run every check and collect the failures
    pub fn check(&self, provider: &ProviderConfig) -> ConfigDiagnostics {
        let mut errors = Vec::new();

        if let Err(e) = provider.validate("provider") {
            errors.push(e);
        }

        let api_key = provider.api_key.expose_secret();
        if api_key.is_empty() {
            errors.push(ValidationError::required("provider.apiKey"));
        } else if ENV_VAR_PATTERN.is_match(api_key) {
            errors.push(
                ValidationError::invalid_format(
                    "provider.apiKey",
                    "environment variable placeholder was never resolved",
                ),
            );
        } else if let Some(prefix) = self.conventions.key_prefix {
            if !provider.api_key.has_prefix(prefix) {
                errors.push(
                    ValidationError::invalid_format(
                        "provider.apiKey",
                        format!("API key should start with '{}'", prefix),
                    )
                    .with_context(format!("got {}", provider.api_key.partial_redact())),
                );
            }
        }

        if let Some(marker) = self.conventions.url_marker {
            if !provider.api_base_url.is_empty() && !provider.api_base_url.contains(marker) {
                errors.push(ValidationError::mismatch(
                    "provider.apiBaseUrl",
                    format!("a URL containing '{}'", marker),
                    provider.api_base_url.as_str(),
                ));
            }
        }

        ConfigDiagnostics::from_errors(errors)
    }
}
