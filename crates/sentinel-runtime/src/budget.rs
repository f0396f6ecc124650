//! Token budget and usage accounting for one review run.

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU32, Ordering};

use crate::providers::TokenUsage;

/// A token allowance that can be drawn down from shared references.
pub struct TokenBudget {
    pub max_tokens: u32,
    used: AtomicU32,
}

impl TokenBudget {
    pub fn new(max_tokens: u32) -> Self {
        Self {
            max_tokens,
            used: AtomicU32::new(0),
        }
    }

    pub fn can_afford(&self, tokens: u32) -> bool {
        self.remaining() >= tokens
    }

    pub fn record(&self, tokens: u32) {
        self.used.fetch_add(tokens, Ordering::SeqCst);
    }

    pub fn remaining(&self) -> u32 {
        self.max_tokens.saturating_sub(self.used.load(Ordering::SeqCst))
    }

    pub fn used(&self) -> u32 {
        self.used.load(Ordering::SeqCst)
    }

    pub fn reset(&self) {
        self.used.store(0, Ordering::SeqCst);
    }
}

/// Accumulated LLM usage for a run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LlmUsage {
    pub total_tokens: u32,
    pub prompt_tokens: u32,
    pub completion_tokens: u32,

    /// Provider calls made
    pub llm_calls: u32,

    /// Prompts answered from the response cache
    pub cached_responses: u32,

    /// Prompts skipped because the budget ran out
    pub skipped_prompts: u32,

    /// Estimated cost in USD
    pub estimated_cost: f64,

    pub cache_creation_tokens: u32,
    pub cache_read_tokens: u32,
}

impl LlmUsage {
    /// Add token usage from a provider response.
    pub fn add(&mut self, usage: &TokenUsage, model: &str) {
        self.prompt_tokens += usage.prompt_tokens;
        self.completion_tokens += usage.completion_tokens;
        self.total_tokens += usage.total();
        self.llm_calls += 1;
        self.cache_creation_tokens += usage.cache_creation_tokens;
        self.cache_read_tokens += usage.cache_read_tokens;
        self.estimated_cost += Self::estimate_cost(usage, model);
    }

    fn estimate_cost(usage: &TokenUsage, model: &str) -> f64 {
        // USD per million tokens: input, output, cache write, cache read
        let (input_rate, output_rate, cache_write_rate, cache_read_rate) = match model {
            m if m.contains("opus") => (15.0, 75.0, 18.75, 1.5),
            m if m.contains("haiku") => (1.0, 5.0, 1.25, 0.1),
            _ => (3.0, 15.0, 3.75, 0.3),
        };

        let per_million = |tokens: u32, rate: f64| (tokens as f64 / 1_000_000.0) * rate;

        per_million(usage.prompt_tokens, input_rate)
            + per_million(usage.completion_tokens, output_rate)
            + per_million(usage.cache_creation_tokens, cache_write_rate)
            + per_million(usage.cache_read_tokens, cache_read_rate)
    }
}

/// Run-wide budget plus the usage it has absorbed.
pub struct BudgetTracker {
    budget: TokenBudget,
    usage: RwLock<LlmUsage>,
}

impl BudgetTracker {
    pub fn new(max_tokens: u32) -> Self {
        Self {
            budget: TokenBudget::new(max_tokens),
            usage: RwLock::new(LlmUsage::default()),
        }
    }

    pub fn can_afford(&self, estimated_tokens: u32) -> bool {
        self.budget.can_afford(estimated_tokens)
    }

    /// Record usage after a provider call.
    pub fn record_usage(&self, usage: &TokenUsage, model: &str) {
        self.budget.record(usage.total());
        self.usage.write().add(usage, model);
    }

    pub fn record_cached(&self) {
        self.usage.write().cached_responses += 1;
    }

    pub fn record_skipped(&self) {
        self.usage.write().skipped_prompts += 1;
    }

    pub fn get_usage(&self) -> LlmUsage {
        self.usage.read().clone()
    }

    pub fn remaining(&self) -> u32 {
        self.budget.remaining()
    }

    pub fn reset(&self) {
        self.budget.reset();
        *self.usage.write() = LlmUsage::default();
    }
}

impl Default for BudgetTracker {
    fn default() -> Self {
        Self::new(40_000)
    }
}
