//! In-memory cache of model answers.
//!
//! Re-running a review on an unchanged record and manuscript sends the same
//! prompts again; answers come from here instead of the provider.

use moka::future::Cache;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::time::Duration;

use crate::config::CacheConfig;
use crate::providers::ChatMessage;

/// Identity of one prompt sent to one model.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CacheKey {
    model: String,
    prompt_hash: u64,
    max_tokens: u32,
    temperature_bits: u32,
}

impl CacheKey {
    pub fn new(model: &str, messages: &[ChatMessage], max_tokens: u32, temperature: f32) -> Self {
        let mut hasher = DefaultHasher::new();
        for message in messages {
            message.role.hash(&mut hasher);
            message.content.hash(&mut hasher);
        }
        Self {
            model: model.to_string(),
            prompt_hash: hasher.finish(),
            max_tokens,
            temperature_bits: temperature.to_bits(),
        }
    }
}

/// Response cache using moka.
pub struct ResponseCache {
    cache: Cache<CacheKey, String>,
}

impl ResponseCache {
    pub fn new(max_entries: u64, ttl: Duration) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_entries)
            .time_to_live(ttl)
            .build();

        Self { cache }
    }

    pub fn from_config(config: &CacheConfig) -> Self {
        Self::new(config.max_entries, config.ttl)
    }

    pub async fn get(&self, key: &CacheKey) -> Option<String> {
        self.cache.get(key).await
    }

    pub async fn insert(&self, key: CacheKey, answer: String) {
        self.cache.insert(key, answer).await;
    }

    pub fn invalidate_all(&self) {
        self.cache.invalidate_all();
    }

    pub fn entry_count(&self) -> u64 {
        self.cache.entry_count()
    }
}

impl Default for ResponseCache {
    fn default() -> Self {
        Self::from_config(&CacheConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prompt(text: &str) -> Vec<ChatMessage> {
        vec![ChatMessage::system("You review books."), ChatMessage::user(text)]
    }

    #[test]
    fn test_key_depends_on_model_and_prompt() {
        let base = CacheKey::new("claude-sonnet-4-5", &prompt("a"), 800, 0.2);
        assert_eq!(base, CacheKey::new("claude-sonnet-4-5", &prompt("a"), 800, 0.2));
        assert_ne!(base, CacheKey::new("claude-haiku-4-5", &prompt("a"), 800, 0.2));
        assert_ne!(base, CacheKey::new("claude-sonnet-4-5", &prompt("b"), 800, 0.2));
        assert_ne!(base, CacheKey::new("claude-sonnet-4-5", &prompt("a"), 800, 0.3));
    }

    #[tokio::test]
    async fn test_cache_operations() {
        let cache = ResponseCache::default();
        let key = CacheKey::new("claude-sonnet-4-5", &prompt("Check the blurb."), 800, 0.2);

        assert!(cache.get(&key).await.is_none());

        cache.insert(key.clone(), "Looks fine.".to_string()).await;
        assert_eq!(cache.get(&key).await.as_deref(), Some("Looks fine."));

        cache.invalidate_all();
        assert!(cache.get(&key).await.is_none());
    }
}
