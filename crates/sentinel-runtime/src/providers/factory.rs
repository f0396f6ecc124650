//! Provider factories and the registry that looks them up by name.
//!
//! The runtime config names a provider (`provider: anthropic`); the registry
//! turns that name plus a JSON settings object into a live provider.
//!
//! ```ignore
//! let registry = ProviderRegistry::with_defaults();
//! let provider = registry.create("anthropic", &config.provider_settings())?;
//! ```

use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::Value as JsonValue;

use super::{LlmProvider, ProviderError};

/// Creates providers of one type from JSON settings.
pub trait ProviderFactory: Send + Sync {
    /// Name used in the runtime config, e.g. "anthropic".
    fn provider_type(&self) -> &'static str;

    fn create(&self, config: &JsonValue) -> Result<Arc<dyn LlmProvider>, ProviderError>;

    /// Check settings without building a provider.
    fn validate_config(&self, config: &JsonValue) -> Result<(), ProviderError>;
}

/// Registered provider factories, keyed by type name.
#[derive(Default)]
pub struct ProviderRegistry {
    factories: BTreeMap<String, Arc<dyn ProviderFactory>>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a factory, replacing any factory of the same type.
    pub fn register(&mut self, factory: Arc<dyn ProviderFactory>) {
        self.factories
            .insert(factory.provider_type().to_string(), factory);
    }

    pub fn create(
        &self,
        provider_type: &str,
        config: &JsonValue,
    ) -> Result<Arc<dyn LlmProvider>, ProviderError> {
        self.factory(provider_type)?.create(config)
    }

    fn factory(&self, provider_type: &str) -> Result<&Arc<dyn ProviderFactory>, ProviderError> {
        self.factories.get(provider_type).ok_or_else(|| {
            ProviderError::NotConfigured(format!(
                "Unknown provider type: '{}'. Available: {:?}",
                provider_type,
                self.available_types()
            ))
        })
    }

    pub fn available_types(&self) -> Vec<&str> {
        self.factories.keys().map(|s| s.as_str()).collect()
    }

    /// Registry with every provider compiled into this build.
    #[cfg(feature = "anthropic")]
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(super::AnthropicProviderFactory));
        registry
    }

    /// Registry with every provider compiled into this build.
    #[cfg(not(feature = "anthropic"))]
    pub fn with_defaults() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderRegistry")
            .field("providers", &self.available_types())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::{ChatMessage, CompletionConfig, CompletionResponse, TokenUsage};
    use async_trait::async_trait;

    struct EchoProvider {
        name: String,
    }

    #[async_trait]
    impl LlmProvider for EchoProvider {
        async fn complete(
            &self,
            messages: Vec<ChatMessage>,
            config: &CompletionConfig,
        ) -> Result<CompletionResponse, ProviderError> {
            Ok(CompletionResponse {
                content: messages.last().map(|m| m.content.clone()).unwrap_or_default(),
                usage: TokenUsage::default(),
                model: config.model.clone(),
                stop_reason: Some("end_turn".to_string()),
            })
        }

        fn name(&self) -> &str {
            &self.name
        }
    }

    struct EchoFactory;

    impl ProviderFactory for EchoFactory {
        fn provider_type(&self) -> &'static str {
            "echo"
        }

        fn create(&self, config: &JsonValue) -> Result<Arc<dyn LlmProvider>, ProviderError> {
            self.validate_config(config)?;
            let name = config["name"].as_str().unwrap_or("echo").to_string();
            Ok(Arc::new(EchoProvider { name }))
        }

        fn validate_config(&self, config: &JsonValue) -> Result<(), ProviderError> {
            if config["broken"].as_bool() == Some(true) {
                return Err(ProviderError::NotConfigured("broken".to_string()));
            }
            Ok(())
        }
    }

    #[test]
    fn test_register_and_create() {
        let mut registry = ProviderRegistry::new();
        registry.register(Arc::new(EchoFactory));

        assert_eq!(registry.available_types(), vec!["echo"]);

        let provider = registry
            .create("echo", &serde_json::json!({ "name": "test-echo" }))
            .unwrap();
        assert_eq!(provider.name(), "test-echo");
    }

    #[test]
    fn test_unknown_provider_lists_available() {
        let mut registry = ProviderRegistry::new();
        registry.register(Arc::new(EchoFactory));

        match registry.create("nope", &serde_json::json!({})) {
            Err(ProviderError::NotConfigured(msg)) => {
                assert!(msg.contains("Unknown provider type"));
                assert!(msg.contains("echo"));
            }
            _ => panic!("Expected NotConfigured error"),
        }
    }

    #[test]
    fn test_create_rejects_invalid_settings() {
        let mut registry = ProviderRegistry::new();
        registry.register(Arc::new(EchoFactory));

        assert!(registry.create("echo", &serde_json::json!({ "broken": true })).is_err());
    }

    #[tokio::test]
    async fn test_created_provider_answers() {
        let mut registry = ProviderRegistry::new();
        registry.register(Arc::new(EchoFactory));
        let provider = registry.create("echo", &serde_json::json!({})).unwrap();

        let response = provider
            .complete(vec![ChatMessage::user("ping")], &CompletionConfig::default())
            .await
            .unwrap();
        assert_eq!(response.content, "ping");
    }
}
