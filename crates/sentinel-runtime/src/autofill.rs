//! Metadata auto-fill from the opening of a manuscript.
//!
//! The model answers with a JSON object; the first `{...}` block of the
//! reply is parsed leniently (missing keys are empty, numbers are accepted
//! where text is expected) and the suggestions can then be applied to a
//! [`BookRecord`].

use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;
use serde_json::Value as JsonValue;

use sentinel_core::catalog::match_language;
use sentinel_core::record::{CATEGORY_SLOTS, KEYWORD_SLOTS};
use sentinel_core::BookRecord;

use crate::analyzers::PromptSpec;
use crate::prompts::{clip, render, AUTOFILL_PROMPT};
use crate::AnalysisError;

lazy_static! {
    static ref JSON_BLOCK_PATTERN: Regex = Regex::new(r"(?s)\{.*\}").unwrap();
}

/// Shortest manuscript worth auto-filling from.
pub const MIN_AUTOFILL_CHARS: usize = 200;

const AUTOFILL_EXCERPT: usize = 8000;

/// Prompt for auto-filling from `manuscript`.
pub fn autofill_prompt(manuscript: &str) -> Result<PromptSpec, AnalysisError> {
    let chars = manuscript.chars().count();
    if chars < MIN_AUTOFILL_CHARS {
        return Err(AnalysisError::TooShort {
            chars,
            min: MIN_AUTOFILL_CHARS,
        });
    }

    let text = clip(manuscript, AUTOFILL_EXCERPT);
    let excerpt_chars = text.chars().count().to_string();
    let prompt = render(AUTOFILL_PROMPT, &[("chars", excerpt_chars.as_str()), ("text", text)]);
    Ok(PromptSpec::new(prompt, 1800, 0.2))
}

/// Metadata the model inferred from a manuscript.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AutofillSuggestions {
    pub title: String,
    pub author: String,
    pub language: String,
    pub description_draft: String,
    pub keywords: Vec<String>,
    pub categories: Vec<String>,
    pub series_title: String,
    pub series_number: String,
    pub is_translation_hint: bool,
    pub original_author_hint: String,
    pub translator_hint: String,
}

impl AutofillSuggestions {
    /// Parse the first `{...}` block of a model reply.
    pub fn parse(reply: &str) -> Result<Self, AnalysisError> {
        let block = JSON_BLOCK_PATTERN
            .find(reply)
            .ok_or_else(|| AnalysisError::MalformedResponse(preview(reply)))?;

        let value: JsonValue = serde_json::from_str(block.as_str())
            .map_err(|e| AnalysisError::MalformedResponse(format!("{}: {}", e, preview(reply))))?;

        if !value.is_object() {
            return Err(AnalysisError::MalformedResponse(preview(reply)));
        }

        Ok(Self {
            title: text_field(&value, "title_suggestion"),
            author: text_field(&value, "author_suggestion"),
            language: text_field(&value, "language_suggestion"),
            description_draft: text_field(&value, "description_draft_suggestion"),
            keywords: list_field(&value, "keyword_suggestions"),
            categories: list_field(&value, "category_suggestions"),
            series_title: text_field(&value, "series_title_suggestion"),
            series_number: text_field(&value, "series_number_suggestion"),
            is_translation_hint: flag_field(&value, "is_translation_hint"),
            original_author_hint: text_field(&value, "original_author_hint"),
            translator_hint: text_field(&value, "translator_hint"),
        })
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Copy non-empty suggestions onto `record`, returning the fields changed.
    ///
    /// The language is only applied when it maps onto a supported language.
    /// Keywords and categories replace the existing slots.
    pub fn apply_to(&self, record: &mut BookRecord) -> Vec<&'static str> {
        let mut applied = Vec::new();

        if !self.title.is_empty() {
            record.title = self.title.clone();
            applied.push("title");
        }
        if !self.author.is_empty() {
            record.author = self.author.clone();
            applied.push("author");
        }
        if let Some(language) = match_language(&self.language) {
            record.language = language.to_string();
            applied.push("language");
        }
        if !self.description_draft.is_empty() {
            record.description = self.description_draft.clone();
            applied.push("description");
        }
        if !self.keywords.is_empty() {
            record.keywords = fill_slots(&self.keywords, KEYWORD_SLOTS);
            applied.push("keywords");
        }
        if !self.categories.is_empty() {
            record.categories = fill_slots(&self.categories, CATEGORY_SLOTS);
            applied.push("categories");
        }
        if !self.series_title.is_empty() {
            record.series_name = self.series_title.clone();
            record.is_series = true;
            applied.push("series_name");
        }
        if !self.series_number.is_empty() {
            record.series_number = self.series_number.clone();
            applied.push("series_number");
        }
        if self.is_translation_hint {
            record.is_translation = true;
            applied.push("is_translation");
        }
        if !self.original_author_hint.is_empty() {
            record.original_author = self.original_author_hint.clone();
            applied.push("original_author");
        }
        if !self.translator_hint.is_empty() {
            record.translator = self.translator_hint.clone();
            applied.push("translator");
        }

        tracing::debug!(fields = ?applied, "auto-fill applied");
        applied
    }
}

fn fill_slots(values: &[String], slots: usize) -> Vec<String> {
    let mut filled: Vec<String> = values.iter().take(slots).cloned().collect();
    filled.resize(slots, String::new());
    filled
}

fn text_field(value: &JsonValue, key: &str) -> String {
    match &value[key] {
        JsonValue::String(s) => s.trim().to_string(),
        JsonValue::Number(n) => n.to_string(),
        _ => String::new(),
    }
}

fn list_field(value: &JsonValue, key: &str) -> Vec<String> {
    value[key]
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(|item| item.as_str())
                .map(str::trim)
                .filter(|item| !item.is_empty())
                .map(String::from)
                .collect()
        })
        .unwrap_or_default()
}

fn flag_field(value: &JsonValue, key: &str) -> bool {
    match &value[key] {
        JsonValue::Bool(b) => *b,
        JsonValue::String(s) => s.trim().eq_ignore_ascii_case("true"),
        _ => false,
    }
}

fn preview(reply: &str) -> String {
    let clipped = clip(reply.trim(), 200);
    if clipped.len() < reply.trim().len() {
        format!("{}...", clipped)
    } else {
        clipped.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const REPLY: &str = r#"Here is what I found:
{
  "title_suggestion": " The Salt Road ",
  "author_suggestion": "Ines Varga",
  "language_suggestion": "spanish",
  "description_draft_suggestion": "A caravan crosses the desert.",
  "keyword_suggestions": ["desert caravan", "", "salt trade", 7, "family saga", "a", "b", "c", "d"],
  "category_suggestions": ["Fiction > Historical", "Fiction > Sagas", "Fiction > Literary", "Extra"],
  "series_title_suggestion": "Desert Chronicles",
  "series_number_suggestion": 2,
  "is_translation_hint": "true",
  "original_author_hint": "",
  "translator_hint": "Sam Lee"
}
Let me know if you need more."#;

    #[test]
    fn test_parse_lenient_reply() {
        let s = AutofillSuggestions::parse(REPLY).unwrap();
        assert_eq!(s.title, "The Salt Road");
        assert_eq!(s.keywords[..3], ["desert caravan", "salt trade", "family saga"]);
        assert_eq!(s.keywords.len(), 7);
        assert_eq!(s.categories.len(), 4);
        assert_eq!(s.series_number, "2");
        assert!(s.is_translation_hint);
        assert!(s.original_author_hint.is_empty());
    }

    #[test]
    fn test_apply_to_record() {
        let mut record = BookRecord::default();
        let applied = AutofillSuggestions::parse(REPLY).unwrap().apply_to(&mut record);

        assert_eq!(record.title, "The Salt Road");
        assert_eq!(record.language, "Spanish");
        assert_eq!(record.keywords.len(), KEYWORD_SLOTS);
        assert_eq!(record.categories, vec!["Fiction > Historical", "Fiction > Sagas", "Fiction > Literary"]);
        assert!(record.is_series);
        assert_eq!(record.series_name, "Desert Chronicles");
        assert!(record.is_translation);
        assert_eq!(record.translator, "Sam Lee");
        assert!(applied.contains(&"language"));
        assert!(!applied.contains(&"original_author"));
    }

    #[test]
    fn test_unknown_language_not_applied() {
        let mut record = BookRecord::default();
        let suggestions = AutofillSuggestions {
            language: "Klingon".to_string(),
            keywords: vec!["space".to_string()],
            ..Default::default()
        };
        let applied = suggestions.apply_to(&mut record);
        assert_eq!(record.language, "English");
        assert_eq!(applied, vec!["keywords"]);
        assert_eq!(record.keywords[0], "space");
        assert!(record.keywords[1..].iter().all(String::is_empty));
    }

    #[test]
    fn test_malformed_replies() {
        assert!(matches!(
            AutofillSuggestions::parse("I could not read the manuscript."),
            Err(AnalysisError::MalformedResponse(_))
        ));
        assert!(matches!(
            AutofillSuggestions::parse("{ not json }"),
            Err(AnalysisError::MalformedResponse(_))
        ));
        assert!(AutofillSuggestions::parse("{}").unwrap().is_empty());
    }

    #[test]
    fn test_prompt_requires_200_chars_and_clips() {
        assert!(matches!(
            autofill_prompt(&"a".repeat(199)),
            Err(AnalysisError::TooShort { chars: 199, min: 200 })
        ));
        let spec = autofill_prompt(&"b".repeat(9000)).unwrap();
        assert!(spec.prompt.contains("about 8000 characters"));
        assert!(!spec.prompt.contains(&"b".repeat(8001)));
        assert_eq!(spec.max_tokens, 1800);
    }
}
