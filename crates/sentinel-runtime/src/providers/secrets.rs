//! API key handling for LLM providers.
//!
//! Keys are wrapped in [`secrecy::SecretString`] as soon as they are read, so
//! a provider can be logged with `{:?}` without leaking its key. The only way
//! back to the raw value is [`ApiCredential::expose`], called where the HTTP
//! header is set.
//!
//! ```ignore
//! let cred = ApiCredential::from_config_or_env(&config, "api_key", "ANTHROPIC_API_KEY", "Anthropic API key")?;
//! request.header("x-api-key", cred.expose());
//! ```

use secrecy::{ExposeSecret, SecretString};
use serde_json::Value as JsonValue;
use std::fmt;

use super::ProviderError;

/// Where a credential was loaded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialSource {
    /// The `api_key` entry of the runtime config
    Config,
    Environment,
    /// Passed in by the caller
    Programmatic,
}

impl fmt::Display for CredentialSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CredentialSource::Config => write!(f, "config"),
            CredentialSource::Environment => write!(f, "environment"),
            CredentialSource::Programmatic => write!(f, "programmatic"),
        }
    }
}

/// An API key that prints as `[REDACTED]`.
pub struct ApiCredential {
    value: SecretString,
    source: CredentialSource,
    name: &'static str,
}

impl ApiCredential {
    pub fn new(value: impl Into<String>, source: CredentialSource, name: &'static str) -> Self {
        Self {
            value: SecretString::from(value.into()),
            source,
            name,
        }
    }

    /// Load `config_key` from JSON config, falling back to `env_var`.
    ///
    /// An empty string in the config counts as absent.
    pub fn from_config_or_env(
        config: &JsonValue,
        config_key: &str,
        env_var: &str,
        name: &'static str,
    ) -> Result<Self, ProviderError> {
        if let Some(value) = config_value(config, config_key) {
            return Ok(Self::new(value, CredentialSource::Config, name));
        }

        if let Ok(value) = std::env::var(env_var) {
            return Ok(Self::new(value, CredentialSource::Environment, name));
        }

        Err(ProviderError::NotConfigured(format!(
            "{} required: set '{}' in config or {} environment variable",
            name, config_key, env_var
        )))
    }

    /// Whether a credential could be loaded, without loading it.
    pub fn is_available(config: &JsonValue, config_key: &str, env_var: &str) -> bool {
        config_value(config, config_key).is_some() || std::env::var(env_var).is_ok()
    }

    /// The raw key. Call only where the request header is built.
    pub fn expose(&self) -> &str {
        self.value.expose_secret()
    }

    pub fn source(&self) -> CredentialSource {
        self.source
    }
}

fn config_value<'a>(config: &'a JsonValue, key: &str) -> Option<&'a str> {
    config[key].as_str().filter(|v| !v.is_empty())
}

impl fmt::Debug for ApiCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiCredential")
            .field("value", &"[REDACTED]")
            .field("source", &self.source)
            .field("name", &self.name)
            .finish()
    }
}

impl fmt::Display for ApiCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} from {} [REDACTED]", self.name, self.source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "sk-ant-very-secret-0042";

    #[test]
    fn test_credential_redacted_in_debug() {
        let cred = ApiCredential::new(SECRET, CredentialSource::Programmatic, "Test API key");
        let debug = format!("{:?}", cred);
        assert!(!debug.contains(SECRET), "Secret exposed in Debug!");
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn test_credential_redacted_in_display() {
        let cred = ApiCredential::new(SECRET, CredentialSource::Config, "Test API key");
        let display = cred.to_string();
        assert!(!display.contains(SECRET), "Secret exposed in Display!");
        assert_eq!(display, "Test API key from config [REDACTED]");
    }

    #[test]
    fn test_expose_returns_value() {
        let cred = ApiCredential::new(SECRET, CredentialSource::Programmatic, "Test API key");
        assert_eq!(cred.expose(), SECRET);
    }

    #[test]
    fn test_config_takes_precedence_over_env() {
        std::env::set_var("SENTINEL_TEST_KEY_PRIORITY", "env-key");
        let config = serde_json::json!({ "api_key": "config-key" });
        let cred = ApiCredential::from_config_or_env(&config, "api_key", "SENTINEL_TEST_KEY_PRIORITY", "Test key")
            .unwrap();
        assert_eq!(cred.expose(), "config-key");
        assert_eq!(cred.source(), CredentialSource::Config);
        std::env::remove_var("SENTINEL_TEST_KEY_PRIORITY");
    }

    #[test]
    fn test_empty_config_value_falls_back_to_env() {
        std::env::set_var("SENTINEL_TEST_KEY_FALLBACK", "env-key");
        let config = serde_json::json!({ "api_key": "" });
        let cred = ApiCredential::from_config_or_env(&config, "api_key", "SENTINEL_TEST_KEY_FALLBACK", "Test key")
            .unwrap();
        assert_eq!(cred.expose(), "env-key");
        assert_eq!(cred.source(), CredentialSource::Environment);
        std::env::remove_var("SENTINEL_TEST_KEY_FALLBACK");
    }

    #[test]
    fn test_missing_credential_error_names_both_sources() {
        let err = ApiCredential::from_config_or_env(
            &serde_json::json!({}),
            "api_key",
            "SENTINEL_TEST_KEY_ABSENT_913",
            "Test key",
        )
        .unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("Test key"));
        assert!(msg.contains("api_key"));
        assert!(msg.contains("SENTINEL_TEST_KEY_ABSENT_913"));
    }

    #[test]
    fn test_is_available() {
        let config = serde_json::json!({ "api_key": "value" });
        assert!(ApiCredential::is_available(&config, "api_key", "SENTINEL_TEST_KEY_ABSENT_914"));
        assert!(!ApiCredential::is_available(
            &serde_json::json!({}),
            "api_key",
            "SENTINEL_TEST_KEY_ABSENT_914"
        ));
    }
}
