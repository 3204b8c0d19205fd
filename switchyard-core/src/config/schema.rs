//! Provider configuration schema
//!
//! These structures are owned by the surrounding configuration store. The
//! transformer layer only reads them.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use super::error::ValidationError;
use super::secrets::{SafeLogging, SecretString};

/// Configuration of one upstream provider
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderConfig {
    /// Unique provider id
    pub id: String,

    /// Display name
    pub name: String,

    /// Provider family, e.g. `openai`, `gemini`
    #[serde(rename = "type")]
    pub provider_type: String,

    /// Base URL for the provider API
    pub api_base_url: String,

    /// API key (supports environment variable interpolation when loaded from a file)
    #[serde(default)]
    pub api_key: SecretString,

    /// Upstream models this provider is known to serve
    #[serde(default)]
    pub models: Vec<String>,

    /// Name of the transformer to resolve in the registry
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transformer: Option<String>,

    /// Request timeout in milliseconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_retries: Option<u32>,

    /// Delay between retries in milliseconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retry_delay: Option<u64>,
}

impl ProviderConfig {
    /// Create a provider configuration with the required fields
    pub fn new(
        id: impl Into<String>,
        provider_type: impl Into<String>,
        api_base_url: impl Into<String>,
        api_key: impl Into<SecretString>,
    ) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            provider_type: provider_type.into(),
            api_base_url: api_base_url.into(),
            api_key: api_key.into(),
            models: Vec::new(),
            transformer: None,
            timeout: None,
            max_retries: None,
            retry_delay: None,
        }
    }

    pub fn with_transformer(mut self, transformer: impl Into<String>) -> Self {
        self.transformer = Some(transformer.into());
        self
    }

    pub fn with_models(mut self, models: Vec<String>) -> Self {
        self.models = models;
        self
    }

    /// Whether the configuration explicitly lists `model`
    pub fn serves_model(&self, model: &str) -> bool {
        self.models.iter().any(|m| m == model)
    }

    /// Fill every unset field from an adapter's seed values
    ///
    /// Fields the user already set are left alone. The API key is never seeded.
    pub fn apply_defaults(&mut self, defaults: &ProviderDefaults) {
        if self.api_base_url.is_empty() {
            if let Some(url) = &defaults.api_base_url {
                self.api_base_url = url.clone();
            }
        }
        if self.provider_type.is_empty() {
            if let Some(provider_type) = &defaults.provider_type {
                self.provider_type = provider_type.clone();
            }
        }
        if self.transformer.is_none() {
            self.transformer = defaults.transformer.clone();
        }
        if self.models.is_empty() {
            self.models = defaults.models.clone();
        }
        self.timeout = self.timeout.or(defaults.timeout);
        self.max_retries = self.max_retries.or(defaults.max_retries);
        self.retry_delay = self.retry_delay.or(defaults.retry_delay);
    }

    /// Validate the structural requirements checked at load time
    pub fn validate(&self, path: &str) -> Result<(), ValidationError> {
        if self.id.is_empty() {
            return Err(ValidationError::required(format!("{}.id", path)));
        }

        if self.name.is_empty() {
            return Err(ValidationError::required(format!("{}.name", path)));
        }

        if self.api_base_url.is_empty() {
            return Err(ValidationError::required(format!("{}.apiBaseUrl", path)));
        }

        match url::Url::parse(&self.api_base_url) {
            Ok(url) => {
                if url.scheme() != "http" && url.scheme() != "https" {
                    return Err(ValidationError::invalid_url(
                        format!("{}.apiBaseUrl", path),
                        format!("scheme must be http or https, got {}", url.scheme()),
                    ));
                }
            }
            Err(e) => {
                return Err(ValidationError::invalid_url(format!("{}.apiBaseUrl", path), e.to_string()));
            }
        }

        if self.timeout == Some(0) {
            return Err(ValidationError::out_of_range(
                format!("{}.timeout", path),
                "timeout must be positive",
            ));
        }

        let mut seen_models = HashSet::new();
        for (i, model) in self.models.iter().enumerate() {
            if model.is_empty() {
                return Err(ValidationError::required(format!("{}.models[{}]", path, i)));
            }
            if !seen_models.insert(model) {
                return Err(ValidationError::duplicate(format!("{}.models[{}]", path, i), model.as_str()));
            }
        }

        Ok(())
    }
}

impl SafeLogging for ProviderConfig {
    fn safe_for_logging(&self) -> String {
        format!(
            "provider '{}' (type={}, url={}, key={}, transformer={})",
            self.id,
            self.provider_type,
            self.api_base_url,
            self.api_key.partial_redact(),
            self.transformer.as_deref().unwrap_or("<none>"),
        )
    }
}

/// Seed values an adapter offers for a new provider of its type
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderDefaults {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub provider_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_base_url: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub models: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transformer: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_retries: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retry_delay: Option<u64>,
}

/// Root of a provider configuration file
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct ProvidersFile {
    #[serde(default)]
    pub providers: Vec<ProviderConfig>,
}

impl ProvidersFile {
    /// Validate every provider and reject duplicate ids
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut seen_ids = HashSet::new();
        for (i, provider) in self.providers.iter().enumerate() {
            if !seen_ids.insert(&provider.id) {
                return Err(ValidationError::duplicate(format!("providers[{}].id", i), provider.id.as_str()));
            }

            provider.validate(&format!("providers[{}]", i))?;
        }

        Ok(())
    }

    /// Find a provider by id
    pub fn get(&self, id: &str) -> Option<&ProviderConfig> {
        self.providers.iter().find(|p| p.id == id)
    }
}
