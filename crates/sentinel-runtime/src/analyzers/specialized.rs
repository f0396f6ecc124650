//! Policy-sensitive content checks.

use lazy_static::lazy_static;
use regex::Regex;

use super::{AiFeedback, AnalysisInput, AnalysisKind, Analyzer, FeedbackKind, PromptResponse, PromptSpec};
use crate::prompts::{
    clip, render, FREELY_AVAILABLE_PROMPT, INFRINGING_COMPANION_PROMPT, LANGUAGE_PROMPT,
    OFFENSIVE_CONTENT_PROMPT, PUBLIC_DOMAIN_PROMPT,
};

lazy_static! {
    static ref SENTENCE_END_PATTERN: Regex = Regex::new(r"[.?!]\s+").unwrap();
    /// "Mr." and "e.g." style tokens that end in a period without ending a sentence
    static ref ABBREVIATION_PATTERN: Regex = Regex::new(r"(?:^|\s)(?:[A-Z][a-z]?|\w\.\w)\.$").unwrap();
}

const OFFENSIVE_EXCERPT: usize = 2000;
const COMPANION_EXCERPT: usize = 1000;
const LANGUAGE_EXCERPT: usize = 1500;

const SAMPLE_SIZE: usize = 3;

/// Split text into sentences at `.`, `?` or `!` followed by whitespace.
fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;
    for m in SENTENCE_END_PATTERN.find_iter(text) {
        let candidate = &text[start..m.start() + 1];
        if ABBREVIATION_PATTERN.is_match(candidate) {
            continue;
        }
        sentences.push(candidate.trim());
        start = m.end();
    }
    let rest = text[start..].trim();
    if !rest.is_empty() {
        sentences.push(rest);
    }
    sentences
}

/// The longest distinct sentences worth checking against the web.
///
/// A candidate has 13 to 69 words and more than 70 characters. Ties in
/// length are broken alphabetically so the sample is stable.
pub fn sample_sentences(text: &str, count: usize) -> Vec<&str> {
    let mut candidates: Vec<&str> = split_sentences(text)
        .into_iter()
        .filter(|s| {
            let words = s.split_whitespace().count();
            (13..70).contains(&words) && s.chars().count() > 70
        })
        .collect();

    candidates.sort_by(|a, b| {
        b.chars()
            .count()
            .cmp(&a.chars().count())
            .then_with(|| a.cmp(b))
    });
    candidates.dedup();
    candidates.truncate(count);
    candidates
}

/// Screens the manuscript for content KDP does not allow.
#[derive(Debug, Default)]
pub struct OffensiveContent;

impl OffensiveContent {
    pub fn new() -> Self {
        Self
    }
}

impl Analyzer for OffensiveContent {
    fn kind(&self) -> AnalysisKind {
        AnalysisKind::OffensiveContent
    }

    fn applicable(&self, input: &AnalysisInput<'_>) -> Result<(), String> {
        input.require_manuscript(50)
    }

    fn prompts(&self, input: &AnalysisInput<'_>) -> Vec<PromptSpec> {
        let prompt = render(OFFENSIVE_CONTENT_PROMPT, &[("text", clip(input.text(), OFFENSIVE_EXCERPT))]);
        vec![PromptSpec::new(prompt, 800, 0.1)]
    }
}

/// Web-availability of sample sentences, plus an unauthorized-companion check.
#[derive(Debug, Default)]
pub struct FreelyAvailableContent;

impl FreelyAvailableContent {
    pub fn new() -> Self {
        Self
    }
}

impl Analyzer for FreelyAvailableContent {
    fn kind(&self) -> AnalysisKind {
        AnalysisKind::FreelyAvailableContent
    }

    fn applicable(&self, input: &AnalysisInput<'_>) -> Result<(), String> {
        input.require_manuscript(300)
    }

    fn prompts(&self, input: &AnalysisInput<'_>) -> Vec<PromptSpec> {
        let mut prompts = Vec::new();

        let sentences = sample_sentences(input.text(), SAMPLE_SIZE);
        if !sentences.is_empty() {
            let block: String = sentences
                .iter()
                .enumerate()
                .map(|(i, s)| format!("{}. \"{}\"\n", i + 1, s))
                .collect();
            let prompt = render(FREELY_AVAILABLE_PROMPT, &[("sentences", block.as_str())]);
            prompts.push(PromptSpec::new(prompt, 800, 0.2).with_heading("Sample Sentences: Web Availability"));
        }

        let companion = render(INFRINGING_COMPANION_PROMPT, &[
            ("title", input.record.title.as_str()),
            ("text", clip(input.text(), COMPANION_EXCERPT)),
        ]);
        prompts.push(PromptSpec::new(companion, 700, 0.1).with_heading("Potential Infringing Companion"));
        prompts
    }

    fn interpret(&self, input: &AnalysisInput<'_>, responses: &[PromptResponse]) -> Vec<AiFeedback> {
        let mut feedback = Vec::new();
        if sample_sentences(input.text(), SAMPLE_SIZE).is_empty() {
            feedback.push(AiFeedback::new(
                self.kind(),
                FeedbackKind::Note,
                "No distinct long sentences were found to check for web availability.",
            ));
        }
        feedback.extend(responses.iter().filter(|r| !r.text.trim().is_empty()).map(|r| {
            AiFeedback::new(self.kind(), FeedbackKind::Analysis, r.text.trim()).with_heading(r.heading.clone())
        }));
        feedback
    }
}

/// Reviews the public-domain differentiation statement.
#[derive(Debug, Default)]
pub struct PublicDomainStatement;

impl PublicDomainStatement {
    pub fn new() -> Self {
        Self
    }
}

impl Analyzer for PublicDomainStatement {
    fn kind(&self) -> AnalysisKind {
        AnalysisKind::PublicDomainStatement
    }

    fn applicable(&self, input: &AnalysisInput<'_>) -> Result<(), String> {
        if !input.record.is_public_domain {
            return Err("the book is not marked public domain".to_string());
        }
        if input.record.public_domain_statement.trim().is_empty() {
            return Err("no differentiation statement was given".to_string());
        }
        Ok(())
    }

    fn prompts(&self, input: &AnalysisInput<'_>) -> Vec<PromptSpec> {
        let prompt = render(PUBLIC_DOMAIN_PROMPT, &[(
            "statement",
            input.record.public_domain_statement.trim(),
        )]);
        vec![PromptSpec::new(prompt, 700, 0.3)]
    }
}

/// Compares the metadata language with the language the model detects.
#[derive(Debug, Default)]
pub struct LanguageConsistency;

impl LanguageConsistency {
    pub fn new() -> Self {
        Self
    }
}

/// Lowercase and drop a parenthesised suffix, e.g. "Portuguese (Brazil)".
fn normalize_language(name: &str) -> String {
    name.split('(').next().unwrap_or("").trim().to_lowercase()
}

impl Analyzer for LanguageConsistency {
    fn kind(&self) -> AnalysisKind {
        AnalysisKind::LanguageConsistency
    }

    fn applicable(&self, input: &AnalysisInput<'_>) -> Result<(), String> {
        input.require_manuscript(100)?;
        if input.record.language.trim().is_empty() {
            return Err("no metadata language is set".to_string());
        }
        Ok(())
    }

    fn prompts(&self, input: &AnalysisInput<'_>) -> Vec<PromptSpec> {
        let prompt = render(LANGUAGE_PROMPT, &[("text", clip(input.text(), LANGUAGE_EXCERPT))]);
        vec![PromptSpec::new(prompt, 50, 0.1)]
    }

    fn interpret(&self, input: &AnalysisInput<'_>, responses: &[PromptResponse]) -> Vec<AiFeedback> {
        let Some(answer) = responses.first() else {
            return Vec::new();
        };

        let detected = answer
            .text
            .trim()
            .lines()
            .next()
            .unwrap_or("")
            .trim()
            .trim_end_matches('.')
            .trim_matches('"')
            .trim();
        let metadata = input.record.language.trim();

        if detected.is_empty() {
            return vec![AiFeedback::new(
                self.kind(),
                FeedbackKind::Note,
                "The model did not name a language for the manuscript excerpt.",
            )];
        }

        let expected = normalize_language(metadata);
        let found = normalize_language(detected);
        let consistent =
            !found.is_empty() && (expected == found || expected.contains(&found) || found.contains(&expected));

        if consistent {
            vec![AiFeedback::new(
                self.kind(),
                FeedbackKind::Pass,
                format!(
                    "Detected '{}', consistent with the metadata language '{}'.",
                    detected, metadata
                ),
            )]
        } else {
            tracing::debug!(metadata, detected, "language mismatch");
            vec![AiFeedback::new(
                self.kind(),
                FeedbackKind::Warning,
                format!(
                    "Metadata language is '{}' but the manuscript reads as '{}'. Make sure they match.",
                    metadata, detected
                ),
            )]
        }
    }
}
