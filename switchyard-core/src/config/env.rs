//! Environment variable interpolation for provider files

use super::error::ConfigError;
use super::schema::ProvidersFile;
use super::secrets::SecretString;
use regex::Regex;
use std::env;
use std::sync::LazyLock;

/// `${VAR_NAME}` placeholders
pub(crate) static ENV_VAR_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").expect("env var pattern is a valid regex")
});

/// Interpolate environment variables in raw configuration text
///
/// Fails on the first placeholder whose variable is unset.
pub fn interpolate_env_vars(content: &str) -> Result<String, ConfigError> {
    let mut missing = None;
    let result = ENV_VAR_PATTERN.replace_all(content, |cap: &regex::Captures<'_>| {
        match env::var(&cap[1]) {
            Ok(value) => value,
            Err(_) => {
                missing.get_or_insert_with(|| cap[1].to_string());
                String::new()
            }
        }
    });

    match missing {
        Some(var) => Err(ConfigError::EnvVarNotFound { var }),
        None => Ok(result.into_owned()),
    }
}

/// Interpolate the fields of loaded providers that commonly hold placeholders
///
/// Covers values that reached the struct without passing through text
/// interpolation, e.g. a file assembled programmatically.
pub fn interpolate_provider_env_vars(file: &mut ProvidersFile) -> Result<(), ConfigError> {
    for provider in &mut file.providers {
        let api_key = provider.api_key.expose_secret();
        if ENV_VAR_PATTERN.is_match(api_key) {
            provider.api_key = SecretString::new(interpolate_env_vars(api_key)?);
        }

        if ENV_VAR_PATTERN.is_match(&provider.api_base_url) {
            provider.api_base_url = interpolate_env_vars(&provider.api_base_url)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProviderConfig;

    #[test]
    fn test_interpolate_env_vars() {
        env::set_var("SWITCHYARD_TEST_VAR", "test_value");

        let content = "apiKey: ${SWITCHYARD_TEST_VAR}";
        let result = interpolate_env_vars(content).unwrap();
        assert_eq!(result, "apiKey: test_value");

        env::remove_var("SWITCHYARD_TEST_VAR");
    }

    #[test]
    fn test_missing_env_var() {
        let content = "apiKey: ${SWITCHYARD_MISSING_VAR}";
        let result = interpolate_env_vars(content);

        match result {
            Err(ConfigError::EnvVarNotFound { var }) => assert_eq!(var, "SWITCHYARD_MISSING_VAR"),
            other => panic!("Expected EnvVarNotFound error, got {:?}", other),
        }
    }

    #[test]
    fn test_lowercase_placeholders_are_left_alone() {
        let content = "url: ${not_a_var}";
        assert_eq!(interpolate_env_vars(content).unwrap(), content);
    }

    #[test]
    fn test_interpolate_provider_fields() {
        env::set_var("SWITCHYARD_PROVIDER_KEY", "sk-from-env");

        let mut file = ProvidersFile {
            providers: vec![ProviderConfig::new(
                "p",
                "openai",
                "https://api.openai.com/v1",
                "${SWITCHYARD_PROVIDER_KEY}",
            )],
        };
        interpolate_provider_env_vars(&mut file).unwrap();
        assert_eq!(file.providers[0].api_key.expose_secret(), "sk-from-env");

        env::remove_var("SWITCHYARD_PROVIDER_KEY");
    }
}
