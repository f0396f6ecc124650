//! Runtime configuration.
//!
//! Loaded from YAML; every field is optional.
//!
//! ```yaml
//! provider: anthropic
//! model: claude-sonnet-4-5
//! request_timeout: 90s
//! run_token_budget: 60000
//! cache:
//!   max_entries: 500
//!   ttl: 2h
//! ```

use std::fmt;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Deserializer};
use serde_json::Value as JsonValue;
use thiserror::Error;

use crate::providers::{CompletionConfig, DEFAULT_MODEL};

/// Errors loading or checking a runtime config.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config '{path}': {source}")]
    IoError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] serde_yaml::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Settings for the AI review runtime.
#[derive(Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Provider type registered in the provider registry
    pub provider: String,

    pub model: String,

    /// Override for the provider's API endpoint
    pub base_url: Option<String>,

    /// Prefer the provider's environment variable over this
    pub api_key: Option<String>,

    /// Per-request timeout, e.g. "60s" or "2m"
    #[serde(deserialize_with = "human_duration")]
    pub request_timeout: Duration,

    /// Tokens one review run may spend
    pub run_token_budget: u32,

    /// Ask the provider to cache prompts
    pub prompt_caching: bool,

    pub cache: CacheConfig,
}

/// Response cache settings.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct CacheConfig {
    pub max_entries: u64,

    #[serde(deserialize_with = "human_duration")]
    pub ttl: Duration,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            provider: "anthropic".to_string(),
            model: DEFAULT_MODEL.to_string(),
            base_url: None,
            api_key: None,
            request_timeout: Duration::from_secs(60),
            run_token_budget: 40_000,
            prompt_caching: false,
            cache: CacheConfig::default(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_entries: 256,
            ttl: Duration::from_secs(3600),
        }
    }
}

impl fmt::Debug for RuntimeConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuntimeConfig")
            .field("provider", &self.provider)
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("request_timeout", &self.request_timeout)
            .field("run_token_budget", &self.run_token_budget)
            .field("prompt_caching", &self.prompt_caching)
            .field("cache", &self.cache)
            .finish()
    }
}

impl RuntimeConfig {
    /// Parse and check a YAML config.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        // An empty file deserializes to unit, not a map
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path).map_err(|source| ConfigError::IoError {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml(&yaml)
    }

    /// Replace the model, ignoring blank overrides.
    pub fn with_model(mut self, model: Option<&str>) -> Self {
        if let Some(model) = model.map(str::trim).filter(|m| !m.is_empty()) {
            self.model = model.to_string();
        }
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.provider.trim().is_empty() {
            return Err(ConfigError::Invalid("provider must not be empty".to_string()));
        }
        if self.model.trim().is_empty() {
            return Err(ConfigError::Invalid("model must not be empty".to_string()));
        }
        if self.request_timeout.is_zero() {
            return Err(ConfigError::Invalid("request_timeout must be positive".to_string()));
        }
        if self.run_token_budget == 0 {
            return Err(ConfigError::Invalid("run_token_budget must be positive".to_string()));
        }
        Ok(())
    }

    /// Settings object handed to the provider factory.
    pub fn provider_settings(&self) -> JsonValue {
        let mut settings = serde_json::Map::new();
        if let Some(key) = &self.api_key {
            settings.insert("api_key".to_string(), JsonValue::String(key.clone()));
        }
        if let Some(url) = &self.base_url {
            settings.insert("base_url".to_string(), JsonValue::String(url.clone()));
        }
        JsonValue::Object(settings)
    }

    /// Completion settings for one prompt.
    pub fn completion_config(&self, max_tokens: u32, temperature: f32) -> CompletionConfig {
        CompletionConfig {
            model: self.model.clone(),
            max_tokens,
            temperature,
            timeout: self.request_timeout,
            prompt_caching: self.prompt_caching,
        }
    }
}

fn human_duration<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    let text = String::deserialize(deserializer)?;
    humantime::parse_duration(text.trim()).map_err(serde::de::Error::custom)
}
