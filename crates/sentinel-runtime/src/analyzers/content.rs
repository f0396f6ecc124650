//! Content & description checks.

use super::{AnalysisInput, AnalysisKind, Analyzer, PromptSpec};
use crate::prompts::{
    clip, render, CATEGORY_PROMPT, DESCRIPTION_QUALITY_PROMPT, KEYWORD_PROMPT,
    MISLEADING_DESCRIPTION_PROMPT,
};

/// Description excerpt length used in keyword and category prompts.
const DESCRIPTION_EXCERPT: usize = 500;

/// Manuscript excerpt compared with the description.
const MISLEADING_EXCERPT: usize = 1000;

fn require_title_or_description(input: &AnalysisInput<'_>) -> Result<(), String> {
    let record = input.record;
    if record.title.trim().is_empty() && record.description.trim().is_empty() {
        return Err("needs a title or a description".to_string());
    }
    Ok(())
}

fn require_description(input: &AnalysisInput<'_>) -> Result<(), String> {
    if input.record.description.trim().is_empty() {
        return Err("needs a description".to_string());
    }
    Ok(())
}

/// Reviews the description for appeal, professionalism and HTML use.
#[derive(Debug, Default)]
pub struct DescriptionQuality;

impl DescriptionQuality {
    pub fn new() -> Self {
        Self
    }
}

impl Analyzer for DescriptionQuality {
    fn kind(&self) -> AnalysisKind {
        AnalysisKind::DescriptionQuality
    }

    fn applicable(&self, input: &AnalysisInput<'_>) -> Result<(), String> {
        require_description(input)
    }

    fn prompts(&self, input: &AnalysisInput<'_>) -> Vec<PromptSpec> {
        let prompt = render(DESCRIPTION_QUALITY_PROMPT, &[("description", input.record.description.as_str())]);
        vec![PromptSpec::new(prompt, 1500, 0.4)]
    }
}

/// Suggests search keywords.
#[derive(Debug, Default)]
pub struct KeywordSuggestions;

impl KeywordSuggestions {
    pub fn new() -> Self {
        Self
    }
}

impl Analyzer for KeywordSuggestions {
    fn kind(&self) -> AnalysisKind {
        AnalysisKind::KeywordSuggestions
    }

    fn applicable(&self, input: &AnalysisInput<'_>) -> Result<(), String> {
        require_title_or_description(input)
    }

    fn prompts(&self, input: &AnalysisInput<'_>) -> Vec<PromptSpec> {
        let record = input.record;
        let keywords = record.filled_keywords().join("; ");
        let prompt = render(KEYWORD_PROMPT, &[
            ("title", record.title.as_str()),
            ("description", clip(&record.description, DESCRIPTION_EXCERPT)),
            ("keywords", keywords.as_str()),
        ]);
        vec![PromptSpec::new(prompt, 800, 0.5)]
    }
}

/// Suggests or confirms categories.
#[derive(Debug, Default)]
pub struct CategorySuggestions;

impl CategorySuggestions {
    pub fn new() -> Self {
        Self
    }
}

impl Analyzer for CategorySuggestions {
    fn kind(&self) -> AnalysisKind {
        AnalysisKind::CategorySuggestions
    }

    fn applicable(&self, input: &AnalysisInput<'_>) -> Result<(), String> {
        require_title_or_description(input)
    }

    fn prompts(&self, input: &AnalysisInput<'_>) -> Vec<PromptSpec> {
        let record = input.record;
        let categories = record.filled_categories().join("; ");
        let prompt = render(CATEGORY_PROMPT, &[
            ("title", record.title.as_str()),
            ("description", clip(&record.description, DESCRIPTION_EXCERPT)),
            ("categories", categories.as_str()),
        ]);
        vec![PromptSpec::new(prompt, 700, 0.4)]
    }
}

/// Compares the description with the opening of the manuscript.
#[derive(Debug, Default)]
pub struct MisleadingDescription;

impl MisleadingDescription {
    pub fn new() -> Self {
        Self
    }
}

impl Analyzer for MisleadingDescription {
    fn kind(&self) -> AnalysisKind {
        AnalysisKind::MisleadingDescription
    }

    fn applicable(&self, input: &AnalysisInput<'_>) -> Result<(), String> {
        require_description(input)?;
        input.require_manuscript(200)
    }

    fn prompts(&self, input: &AnalysisInput<'_>) -> Vec<PromptSpec> {
        let text = clip(input.text(), MISLEADING_EXCERPT);
        let chars = text.chars().count().to_string();
        let prompt = render(MISLEADING_DESCRIPTION_PROMPT, &[
            ("description", input.record.description.as_str()),
            ("chars", chars.as_str()),
            ("text", text),
        ]);
        vec![PromptSpec::new(prompt, 500, 0.3)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sentinel_core::BookRecord;

    fn record() -> BookRecord {
        BookRecord {
            title: "The Lighthouse Keeper".to_string(),
            description: "A keeper weathers the storm of the century.".to_string(),
            keywords: vec!["island".to_string(), "".to_string(), "storm".to_string()],
            categories: vec!["Fiction > Literary".to_string()],
            ..Default::default()
        }
    }

    #[test]
    fn test_description_quality_needs_description() {
        let mut record = record();
        assert!(DescriptionQuality::new().applicable(&AnalysisInput::new(&record, None)).is_ok());
        record.description = "   ".to_string();
        assert!(DescriptionQuality::new().applicable(&AnalysisInput::new(&record, None)).is_err());
    }

    #[test]
    fn test_keyword_prompt_lists_current_keywords() {
        let record = record();
        let prompts = KeywordSuggestions::new().prompts(&AnalysisInput::new(&record, None));
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].prompt.contains("\"island; storm\""));
        assert_eq!(prompts[0].max_tokens, 800);
    }

    #[test]
    fn test_title_alone_enables_suggestions() {
        let record = BookRecord {
            title: "Only A Title".to_string(),
            description: String::new(),
            ..Default::default()
        };
        let input = AnalysisInput::new(&record, None);
        assert!(KeywordSuggestions::new().applicable(&input).is_ok());
        assert!(CategorySuggestions::new().applicable(&input).is_ok());

        let empty = BookRecord {
            title: String::new(),
            description: String::new(),
            ..Default::default()
        };
        assert!(CategorySuggestions::new()
            .applicable(&AnalysisInput::new(&empty, None))
            .is_err());
    }

    #[test]
    fn test_category_prompt_clips_description() {
        let mut record = record();
        record.description = "x".repeat(2000);
        let prompts = CategorySuggestions::new().prompts(&AnalysisInput::new(&record, None));
        assert!(prompts[0].prompt.contains(&"x".repeat(500)));
        assert!(!prompts[0].prompt.contains(&"x".repeat(501)));
        assert!(prompts[0].prompt.contains("Fiction > Literary"));
    }

    #[test]
    fn test_misleading_needs_manuscript() {
        let record = record();
        let analyzer = MisleadingDescription::new();
        assert!(analyzer.applicable(&AnalysisInput::new(&record, None)).is_err());
        assert!(analyzer
            .applicable(&AnalysisInput::new(&record, Some("a".repeat(199).as_str())))
            .is_err());

        let text = "word ".repeat(400);
        let input = AnalysisInput::new(&record, Some(text.as_str()));
        assert!(analyzer.applicable(&input).is_ok());
        let prompts = analyzer.prompts(&input);
        assert!(prompts[0].prompt.contains("first 1000 characters"));
        assert!(prompts[0].prompt.contains("storm of the century"));
    }
}
