//! AI checks over a book record and its manuscript.
//!
//! An [`Analyzer`] decides whether it applies, builds the prompts to send and
//! turns the model's answers into [`AiFeedback`]. It never calls a provider;
//! the [`AnalysisRunner`](crate::orchestrator::AnalysisRunner) does that.

mod content;
mod manuscript;
mod specialized;

use serde::{Deserialize, Serialize};
use std::fmt;

use sentinel_core::BookRecord;

pub use content::{
    CategorySuggestions, DescriptionQuality, KeywordSuggestions, MisleadingDescription,
};
pub use manuscript::{detect_urls, DisappointingContent, SnippetQuality};
pub use specialized::{
    sample_sentences, FreelyAvailableContent, LanguageConsistency, OffensiveContent,
    PublicDomainStatement,
};

/// Phrases that mark an answer as raising a concern.
pub const CONCERN_PHRASES: &[&str] = &[
    "potential issue",
    "recommend review",
    "mismatch",
    "problematic",
    "unsupported",
    "unintentional duplication",
    "poorly translated",
    "not allowed",
    "unclear",
];

/// Phrases that mark an answer as clean even when a concern phrase appears.
pub const CLEAN_PHRASES: &[&str] = &["no potential issue", "no obvious", "not immediately raise"];

/// Whether free-form model feedback reads as raising a concern.
pub fn flags_concern(text: &str) -> bool {
    let text = text.to_lowercase();
    CONCERN_PHRASES.iter().any(|p| text.contains(p)) && !CLEAN_PHRASES.iter().any(|p| text.contains(p))
}

/// Report sections for AI feedback, in render order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AiSection {
    ContentDescription,
    ManuscriptQuality,
    Specialized,
}

impl AiSection {
    pub const ALL: [AiSection; 3] = [
        AiSection::ContentDescription,
        AiSection::ManuscriptQuality,
        AiSection::Specialized,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            AiSection::ContentDescription => "Content & Description",
            AiSection::ManuscriptQuality => "Manuscript Quality",
            AiSection::Specialized => "Specialized Content",
        }
    }
}

impl fmt::Display for AiSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// The individual AI checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisKind {
    DescriptionQuality,
    KeywordSuggestions,
    CategorySuggestions,
    MisleadingDescription,
    SnippetQuality,
    DisappointingContent,
    OffensiveContent,
    FreelyAvailableContent,
    PublicDomainStatement,
    LanguageConsistency,
}

impl AnalysisKind {
    pub fn label(&self) -> &'static str {
        match self {
            AnalysisKind::DescriptionQuality => "Description Quality",
            AnalysisKind::KeywordSuggestions => "Keyword Suggestions",
            AnalysisKind::CategorySuggestions => "Category Suggestions",
            AnalysisKind::MisleadingDescription => "Misleading Description",
            AnalysisKind::SnippetQuality => "Manuscript Snippet Quality",
            AnalysisKind::DisappointingContent => "Disappointing Content",
            AnalysisKind::OffensiveContent => "Offensive Content Scan",
            AnalysisKind::FreelyAvailableContent => "Freely Available & Infringing Content",
            AnalysisKind::PublicDomainStatement => "Public Domain Differentiation",
            AnalysisKind::LanguageConsistency => "Manuscript Language Consistency",
        }
    }

    pub fn section(&self) -> AiSection {
        match self {
            AnalysisKind::DescriptionQuality
            | AnalysisKind::KeywordSuggestions
            | AnalysisKind::CategorySuggestions
            | AnalysisKind::MisleadingDescription => AiSection::ContentDescription,
            AnalysisKind::SnippetQuality | AnalysisKind::DisappointingContent => {
                AiSection::ManuscriptQuality
            }
            AnalysisKind::OffensiveContent
            | AnalysisKind::FreelyAvailableContent
            | AnalysisKind::PublicDomainStatement
            | AnalysisKind::LanguageConsistency => AiSection::Specialized,
        }
    }
}

impl fmt::Display for AnalysisKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// What a piece of feedback is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackKind {
    /// Free-form model answer
    Analysis,
    /// A check with a definite outcome that passed
    Pass,
    /// A check with a definite outcome that failed
    Warning,
    /// Context about how the check ran
    Note,
    /// The model could not be reached or did not answer
    Failure,
}

/// One piece of AI feedback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiFeedback {
    pub analysis: AnalysisKind,
    pub section: AiSection,
    pub kind: FeedbackKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heading: Option<String>,
    pub text: String,
}

impl AiFeedback {
    pub fn new(analysis: AnalysisKind, kind: FeedbackKind, text: impl Into<String>) -> Self {
        Self {
            analysis,
            section: analysis.section(),
            kind,
            heading: None,
            text: text.into(),
        }
    }

    pub fn with_heading(mut self, heading: Option<String>) -> Self {
        self.heading = heading;
        self
    }

    /// Warnings always count; free-form answers count when they read as a concern.
    pub fn is_concern(&self) -> bool {
        match self.kind {
            FeedbackKind::Warning => true,
            FeedbackKind::Analysis => flags_concern(&self.text),
            FeedbackKind::Pass | FeedbackKind::Note | FeedbackKind::Failure => false,
        }
    }
}

/// What the analyzers look at.
#[derive(Debug, Clone, Copy)]
pub struct AnalysisInput<'a> {
    pub record: &'a BookRecord,
    /// Extracted manuscript text, if any
    pub manuscript: Option<&'a str>,
}

impl<'a> AnalysisInput<'a> {
    pub fn new(record: &'a BookRecord, manuscript: Option<&'a str>) -> Self {
        Self { record, manuscript }
    }

    /// Manuscript text, or "" when there is none.
    pub fn text(&self) -> &'a str {
        self.manuscript.unwrap_or("")
    }

    pub fn manuscript_chars(&self) -> usize {
        self.text().chars().count()
    }

    /// Require at least `min_chars` of manuscript text.
    pub fn require_manuscript(&self, min_chars: usize) -> Result<(), String> {
        let chars = self.manuscript_chars();
        if chars < min_chars {
            return Err(format!(
                "needs at least {} characters of manuscript text ({} available)",
                min_chars, chars
            ));
        }
        Ok(())
    }
}

/// One prompt an analyzer wants sent.
#[derive(Debug, Clone, PartialEq)]
pub struct PromptSpec {
    /// Sub-heading for the answer when an analyzer sends several prompts
    pub heading: Option<String>,
    /// The user prompt; the shared system prompt is added by the runner
    pub prompt: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl PromptSpec {
    pub fn new(prompt: String, max_tokens: u32, temperature: f32) -> Self {
        Self {
            heading: None,
            prompt,
            max_tokens,
            temperature,
        }
    }

    pub fn with_heading(mut self, heading: impl Into<String>) -> Self {
        self.heading = Some(heading.into());
        self
    }
}

/// A model answer to one [`PromptSpec`].
#[derive(Debug, Clone, PartialEq)]
pub struct PromptResponse {
    pub heading: Option<String>,
    pub text: String,
}

/// An AI check.
pub trait Analyzer: Send + Sync {
    fn kind(&self) -> AnalysisKind;

    fn section(&self) -> AiSection {
        self.kind().section()
    }

    /// `Err` carries the reason the check is skipped.
    fn applicable(&self, input: &AnalysisInput<'_>) -> Result<(), String>;

    /// Prompts to send, in order.
    fn prompts(&self, input: &AnalysisInput<'_>) -> Vec<PromptSpec>;

    /// Turn the answers that came back into feedback.
    ///
    /// Prompts that failed or were skipped have no entry in `responses`.
    fn interpret(&self, _input: &AnalysisInput<'_>, responses: &[PromptResponse]) -> Vec<AiFeedback> {
        responses
            .iter()
            .filter(|r| !r.text.trim().is_empty())
            .map(|r| {
                AiFeedback::new(self.kind(), FeedbackKind::Analysis, r.text.trim())
                    .with_heading(r.heading.clone())
            })
            .collect()
    }
}

/// Every built-in analyzer, in run order.
pub fn default_analyzers() -> Vec<Box<dyn Analyzer>> {
    vec![
        Box::new(DescriptionQuality::new()),
        Box::new(KeywordSuggestions::new()),
        Box::new(CategorySuggestions::new()),
        Box::new(MisleadingDescription::new()),
        Box::new(SnippetQuality::new()),
        Box::new(DisappointingContent::new()),
        Box::new(OffensiveContent::new()),
        Box::new(FreelyAvailableContent::new()),
        Box::new(PublicDomainStatement::new()),
        Box::new(LanguageConsistency::new()),
    ]
}
