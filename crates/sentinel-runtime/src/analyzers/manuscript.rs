//! Manuscript quality checks.

use lazy_static::lazy_static;
use regex::Regex;

use super::{AnalysisInput, AnalysisKind, Analyzer, PromptSpec};
use crate::prompts::{
    clip, render, DISAPPOINTING_CONTENT_PROMPT, SNIPPET_LINKS_PROMPT, SNIPPET_TYPOS_PROMPT,
};

lazy_static! {
    static ref URL_PATTERN: Regex =
        Regex::new(r"(?:(?:https?|ftp)://|www\.)[\w/\-?=%.~+#&;]+[\w/\-?=%.~+#&;]").unwrap();
}

const TYPOS_EXCERPT: usize = 4000;
const LINKS_EXCERPT: usize = 6000;
const MAX_URLS: usize = 5;

const DISAPPOINTING_EXCERPT: usize = 2000;
const DESCRIPTION_EXCERPT: usize = 500;

/// Distinct URLs in `text`, in order of first appearance, at most `limit`.
pub fn detect_urls(text: &str, limit: usize) -> Vec<&str> {
    let mut urls: Vec<&str> = Vec::new();
    for m in URL_PATTERN.find_iter(text) {
        if urls.len() == limit {
            break;
        }
        if !urls.contains(&m.as_str()) {
            urls.push(m.as_str());
        }
    }
    urls
}

/// Typos, placeholders and accessibility, then links and duplicated text.
#[derive(Debug, Default)]
pub struct SnippetQuality;

impl SnippetQuality {
    pub fn new() -> Self {
        Self
    }
}

impl Analyzer for SnippetQuality {
    fn kind(&self) -> AnalysisKind {
        AnalysisKind::SnippetQuality
    }

    fn applicable(&self, input: &AnalysisInput<'_>) -> Result<(), String> {
        input.require_manuscript(200)
    }

    fn prompts(&self, input: &AnalysisInput<'_>) -> Vec<PromptSpec> {
        let typos_text = clip(input.text(), TYPOS_EXCERPT);
        let typos_chars = typos_text.chars().count().to_string();
        let typos = render(SNIPPET_TYPOS_PROMPT, &[
            ("chars", typos_chars.as_str()),
            ("text", typos_text),
        ]);

        let links_text = clip(input.text(), LINKS_EXCERPT);
        let links_chars = links_text.chars().count().to_string();
        let urls = detect_urls(links_text, MAX_URLS);
        let url_block = if urls.is_empty() {
            "No URLs were detected.\n".to_string()
        } else {
            format!("Detected URLs:\n{}\n", urls.join("\n"))
        };
        let links = render(SNIPPET_LINKS_PROMPT, &[
            ("chars", links_chars.as_str()),
            ("urls", url_block.as_str()),
            ("text", links_text),
        ]);

        vec![
            PromptSpec::new(typos, 1800, 0.2)
                .with_heading(format!("Typos, Placeholders, Accessibility (first ~{} chars)", typos_chars)),
            PromptSpec::new(links, 1200, 0.3)
                .with_heading(format!("Links & Duplicated Text (first ~{} chars)", links_chars)),
        ]
    }
}

/// Content that would disappoint readers: too short, poorly translated,
/// mostly advertising or with bonus material up front.
#[derive(Debug, Default)]
pub struct DisappointingContent;

impl DisappointingContent {
    pub fn new() -> Self {
        Self
    }
}

impl Analyzer for DisappointingContent {
    fn kind(&self) -> AnalysisKind {
        AnalysisKind::DisappointingContent
    }

    fn applicable(&self, input: &AnalysisInput<'_>) -> Result<(), String> {
        if input.text().trim().is_empty() && input.record.description.trim().is_empty() {
            return Err("needs manuscript text or a description".to_string());
        }
        Ok(())
    }

    fn prompts(&self, input: &AnalysisInput<'_>) -> Vec<PromptSpec> {
        let text = clip(input.text(), DISAPPOINTING_EXCERPT);
        let chars = text.chars().count().to_string();
        let is_translation = if input.record.is_translation { "yes" } else { "no" };
        let prompt = render(DISAPPOINTING_CONTENT_PROMPT, &[
            ("description", clip(&input.record.description, DESCRIPTION_EXCERPT)),
            ("chars", chars.as_str()),
            ("text", text),
            ("is_translation", is_translation),
        ]);
        vec![PromptSpec::new(prompt, 1000, 0.3)]
    }
}
