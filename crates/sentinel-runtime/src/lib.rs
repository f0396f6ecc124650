//! # sentinel-runtime
//!
//! Optional LLM-assisted review for Sentinel.
//!
//! The rule engine in `sentinel-core` is deterministic and never calls a
//! model. This crate adds the checks that need judgement: description and
//! keyword feedback, manuscript quality, content-policy screens and
//! metadata auto-fill from a manuscript.
//!
//! ## Example
//!
//! ```rust,ignore
//! use sentinel_core::{validate, BookRecord, Manuscript};
//! use sentinel_runtime::{AnalysisRunner, RuntimeConfig, SessionReport};
//!
//! let record = BookRecord::from_path("my-book.yaml")?;
//! let manuscript = Manuscript::from_path("my-book.txt")?;
//!
//! let runner = AnalysisRunner::from_config(RuntimeConfig::default())?;
//! let ai = runner.run(&record, Some(&manuscript)).await;
//!
//! let session = SessionReport::new(validate(&record), Some(ai));
//! println!("{}", session.readiness);
//! ```

use std::time::Duration;
use thiserror::Error;

pub mod analyzers;
pub mod autofill;
pub mod budget;
pub mod cache;
pub mod config;
pub mod orchestrator;
pub mod prompts;
pub mod providers;

pub use analyzers::{AiFeedback, AiSection, AnalysisKind, Analyzer, FeedbackKind};
pub use autofill::AutofillSuggestions;
pub use budget::{BudgetTracker, LlmUsage};
pub use config::{ConfigError, RuntimeConfig};
pub use orchestrator::{
    AiReport, AiSectionReport, AnalysisRunner, AnalysisRunnerBuilder, SessionReport,
    SkippedAnalysis,
};
pub use providers::{LlmProvider, ProviderError};

/// Errors setting up the runtime.
#[derive(Error, Debug)]
pub enum RuntimeError {
    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Provider(#[from] ProviderError),
}

/// Errors from a single model request.
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Manuscript too short: {chars} characters, at least {min} needed")]
    TooShort { chars: usize, min: usize },

    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    #[error("Token budget exhausted")]
    BudgetExhausted,

    #[error("Malformed model response: {0}")]
    MalformedResponse(String),
}
