//! Runs the AI checks over a book record.
//!
//! The runner owns the provider and the run-wide resources:
//! - Analyzers run one after another, in registration order
//! - Every prompt is checked against the token budget and the response cache
//!   before the provider is called, with a per-request timeout
//! - A failed request becomes a failure note in the report; there are no retries

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;

use sentinel_core::{BookRecord, Manuscript, Readiness, ValidationReport};

use crate::analyzers::{
    default_analyzers, AiFeedback, AiSection, AnalysisInput, AnalysisKind, Analyzer, FeedbackKind,
    PromptResponse, PromptSpec,
};
use crate::autofill::{autofill_prompt, AutofillSuggestions};
use crate::budget::{BudgetTracker, LlmUsage};
use crate::cache::{CacheKey, ResponseCache};
use crate::config::RuntimeConfig;
use crate::prompts::SYSTEM_PROMPT;
use crate::providers::{ChatMessage, LlmProvider, ProviderRegistry};
use crate::{AnalysisError, RuntimeError};

/// An analyzer that did not run, and why.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedAnalysis {
    pub analysis: AnalysisKind,
    pub reason: String,
}

/// Feedback for one report section.
#[derive(Debug, Clone, Serialize)]
pub struct AiSectionReport {
    pub section: AiSection,
    pub feedback: Vec<AiFeedback>,
}

/// Result of one AI review run.
#[derive(Debug, Clone, Serialize)]
pub struct AiReport {
    /// Sections with feedback, in render order
    pub sections: Vec<AiSectionReport>,
    pub skipped: Vec<SkippedAnalysis>,
    pub usage: LlmUsage,
    pub completed_at: DateTime<Utc>,
}

impl AiReport {
    fn new(feedback: Vec<AiFeedback>, skipped: Vec<SkippedAnalysis>, usage: LlmUsage) -> Self {
        let sections = AiSection::ALL
            .iter()
            .map(|&section| AiSectionReport {
                section,
                feedback: feedback.iter().filter(|f| f.section == section).cloned().collect(),
            })
            .filter(|s| !s.feedback.is_empty())
            .collect();

        Self {
            sections,
            skipped,
            usage,
            completed_at: Utc::now(),
        }
    }

    pub fn feedback(&self) -> impl Iterator<Item = &AiFeedback> {
        self.sections.iter().flat_map(|s| s.feedback.iter())
    }

    /// Feedback that reads as a concern.
    pub fn concern_count(&self) -> usize {
        self.feedback().filter(|f| f.is_concern()).count()
    }

    /// Requests that could not be completed.
    pub fn failure_count(&self) -> usize {
        self.feedback().filter(|f| f.kind == FeedbackKind::Failure).count()
    }
}

/// Rule validation plus an optional AI review.
#[derive(Debug, Clone, Serialize)]
pub struct SessionReport {
    pub validation: ValidationReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ai: Option<AiReport>,
    /// AI concerns count as warnings
    pub readiness: Readiness,
}

impl SessionReport {
    pub fn new(validation: ValidationReport, ai: Option<AiReport>) -> Self {
        let concerns = ai.as_ref().map_or(0, AiReport::concern_count);
        let readiness = Readiness::assess(validation.error_count, validation.warning_count + concerns);
        Self {
            validation,
            ai,
            readiness,
        }
    }
}

/// Runs analyzers against a provider.
pub struct AnalysisRunner {
    provider: Arc<dyn LlmProvider>,
    config: RuntimeConfig,
    analyzers: Vec<Box<dyn Analyzer>>,
    budget_tracker: BudgetTracker,
    cache: ResponseCache,
}

impl AnalysisRunner {
    /// Runner with every built-in analyzer.
    pub fn new(provider: Arc<dyn LlmProvider>, config: RuntimeConfig) -> Self {
        Self::with_analyzers(provider, config, default_analyzers())
    }

    pub fn with_analyzers(
        provider: Arc<dyn LlmProvider>,
        config: RuntimeConfig,
        analyzers: Vec<Box<dyn Analyzer>>,
    ) -> Self {
        let budget_tracker = BudgetTracker::new(config.run_token_budget);
        let cache = ResponseCache::from_config(&config.cache);
        Self {
            provider,
            config,
            analyzers,
            budget_tracker,
            cache,
        }
    }

    /// Build the provider named in `config` from the default registry.
    pub fn from_config(config: RuntimeConfig) -> Result<Self, RuntimeError> {
        config.validate()?;
        let provider = ProviderRegistry::with_defaults()
            .create(&config.provider, &config.provider_settings())?;
        AnalysisRunnerBuilder::new().provider(provider).config(config).build()
    }

    pub fn builder() -> AnalysisRunnerBuilder {
        AnalysisRunnerBuilder::new()
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// Run every applicable analyzer.
    ///
    /// Starts a fresh token budget. Cached answers survive between runs.
    pub async fn run(&self, record: &BookRecord, manuscript: Option<&Manuscript>) -> AiReport {
        self.budget_tracker.reset();

        let input = AnalysisInput::new(record, manuscript.map(|m| m.text.as_str()));
        let mut feedback = Vec::new();
        let mut skipped = Vec::new();

        for analyzer in &self.analyzers {
            let kind = analyzer.kind();
            if let Err(reason) = analyzer.applicable(&input) {
                tracing::debug!(analysis = %kind, reason = %reason, "Analysis skipped");
                skipped.push(SkippedAnalysis {
                    analysis: kind,
                    reason,
                });
                continue;
            }

            let mut responses = Vec::new();
            let mut notes = Vec::new();
            for spec in analyzer.prompts(&input) {
                match self.ask(&spec).await {
                    Ok(text) => responses.push(PromptResponse {
                        heading: spec.heading.clone(),
                        text,
                    }),
                    Err(AnalysisError::BudgetExhausted) => notes.push(
                        AiFeedback::new(
                            kind,
                            FeedbackKind::Note,
                            "Skipped: the token budget for this review is used up.",
                        )
                        .with_heading(spec.heading.clone()),
                    ),
                    Err(e) => {
                        tracing::warn!(analysis = %kind, error = %e, "AI check failed");
                        notes.push(
                            AiFeedback::new(
                                kind,
                                FeedbackKind::Failure,
                                format!("AI check '{}' could not be completed.", kind.label()),
                            )
                            .with_heading(spec.heading.clone()),
                        );
                    }
                }
            }

            feedback.extend(analyzer.interpret(&input, &responses));
            feedback.extend(notes);
        }

        let report = AiReport::new(feedback, skipped, self.budget_tracker.get_usage());
        tracing::info!(
            provider = self.provider.name(),
            calls = report.usage.llm_calls,
            cached = report.usage.cached_responses,
            tokens = report.usage.total_tokens,
            concerns = report.concern_count(),
            "AI review complete"
        );
        report
    }

    /// Suggest metadata from the opening of a manuscript.
    pub async fn autofill(&self, manuscript: &str) -> Result<AutofillSuggestions, AnalysisError> {
        let spec = autofill_prompt(manuscript)?;
        let reply = self.ask(&spec).await?;
        let suggestions = AutofillSuggestions::parse(&reply)?;
        tracing::info!(
            keywords = suggestions.keywords.len(),
            categories = suggestions.categories.len(),
            "Auto-fill suggestions received"
        );
        Ok(suggestions)
    }

    /// Usage so far in the current run.
    pub fn usage(&self) -> LlmUsage {
        self.budget_tracker.get_usage()
    }

    /// Send one prompt: cache, then budget, then the provider under a timeout.
    async fn ask(&self, spec: &PromptSpec) -> Result<String, AnalysisError> {
        let messages = vec![
            ChatMessage::system(SYSTEM_PROMPT.trim()),
            ChatMessage::user(spec.prompt.as_str()),
        ];
        let key = CacheKey::new(&self.config.model, &messages, spec.max_tokens, spec.temperature);

        if let Some(answer) = self.cache.get(&key).await {
            tracing::debug!("Answer served from cache");
            self.budget_tracker.record_cached();
            return Ok(answer);
        }

        let estimated = messages
            .iter()
            .map(|m| self.provider.estimate_tokens(&m.content))
            .sum::<u32>()
            + spec.max_tokens;
        if !self.budget_tracker.can_afford(estimated) {
            tracing::warn!(
                estimated,
                remaining = self.budget_tracker.remaining(),
                "Token budget exhausted, skipping prompt"
            );
            self.budget_tracker.record_skipped();
            return Err(AnalysisError::BudgetExhausted);
        }

        let completion = self.config.completion_config(spec.max_tokens, spec.temperature);
        let timeout = self.config.request_timeout;
        let response = tokio::time::timeout(timeout, self.provider.complete(messages, &completion))
            .await
            .map_err(|_| AnalysisError::Timeout(timeout))??;

        self.budget_tracker.record_usage(&response.usage, &response.model);
        self.cache.insert(key, response.content.clone()).await;
        Ok(response.content)
    }
}

/// Builder for [`AnalysisRunner`].
pub struct AnalysisRunnerBuilder {
    provider: Option<Arc<dyn LlmProvider>>,
    config: RuntimeConfig,
    analyzers: Option<Vec<Box<dyn Analyzer>>>,
}

impl AnalysisRunnerBuilder {
    pub fn new() -> Self {
        Self {
            provider: None,
            config: RuntimeConfig::default(),
            analyzers: None,
        }
    }

    pub fn provider(mut self, provider: Arc<dyn LlmProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Register an analyzer. Once any is registered the defaults are not used.
    pub fn analyzer(mut self, analyzer: Box<dyn Analyzer>) -> Self {
        self.analyzers.get_or_insert_with(Vec::new).push(analyzer);
        self
    }

    pub fn build(self) -> Result<AnalysisRunner, RuntimeError> {
        let provider = self
            .provider
            .ok_or_else(|| RuntimeError::NotConfigured("No provider set".to_string()))?;
        let analyzers = self.analyzers.unwrap_or_else(default_analyzers);
        Ok(AnalysisRunner::with_analyzers(provider, self.config, analyzers))
    }
}

impl Default for AnalysisRunnerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
