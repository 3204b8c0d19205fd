//! Provider configuration
//!
//! The transformer layer consumes [`ProviderConfig`] read-only. This module
//! also loads provider files (YAML or JSON with `${ENV_VAR}` placeholders) and
//! produces the advisory diagnostics adapters return from `validate_config`.

mod env;
mod error;
mod schema;
mod secrets;
mod validator;

pub use env::{interpolate_env_vars, interpolate_provider_env_vars};
pub use error::{ConfigError, ConfigResult, ValidationError, ValidationErrorKind};
pub use schema::{ProviderConfig, ProviderDefaults, ProvidersFile};
pub use secrets::{SafeLogging, SecretString};
pub use validator::{ConfigDiagnostics, ConfigValidator, ProviderConventions};

use std::fs;
use std::path::Path;

/// Load a provider file from YAML
pub fn load_from_yaml<P: AsRef<Path>>(path: P) -> ConfigResult<ProvidersFile> {
    let path = path.as_ref();
    let content = read(path)?;
    let interpolated = interpolate_env_vars(&content)?;

    let file: ProvidersFile =
        serde_yaml::from_str(&interpolated).map_err(|e| ConfigError::yaml(path, e))?;

    finish(file)
}

/// Load a provider file from JSON
pub fn load_from_json<P: AsRef<Path>>(path: P) -> ConfigResult<ProvidersFile> {
    let path = path.as_ref();
    let content = read(path)?;
    let interpolated = interpolate_env_vars(&content)?;

    let file: ProvidersFile =
        serde_json::from_str(&interpolated).map_err(|e| ConfigError::json(path, e))?;

    finish(file)
}

fn read(path: &Path) -> ConfigResult<String> {
    fs::read_to_string(path).map_err(|e| ConfigError::io(path, e))
}

fn finish(mut file: ProvidersFile) -> ConfigResult<ProvidersFile> {
    interpolate_provider_env_vars(&mut file)?;
    file.validate()?;
    tracing::debug!(providers = file.providers.len(), "loaded provider configuration");
    Ok(file)
}
