//! Book metadata record parsing from JSON/YAML.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

use super::options::{AiContribution, BookFormat, InkPaper, UploadFormat};
use super::schema::validate_record_schema;

/// Number of category slots on the KDP details page.
pub const CATEGORY_SLOTS: usize = 3;

/// Number of keyword slots on the KDP details page.
pub const KEYWORD_SLOTS: usize = 7;

/// Errors that can occur when loading a record.
#[derive(Error, Debug)]
pub enum RecordError {
    #[error("Failed to read record file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Record does not match schema: {}", .0.join("; "))]
    SchemaError(Vec<String>),

    #[error("Unsupported record file extension: {0} (expected .json, .yaml or .yml)")]
    UnsupportedExtension(String),
}

/// Everything an author enters while setting up a KDP title.
///
/// Every field has a default so partial records load; the rule sets
/// decide what is missing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BookRecord {
    pub title: String,
    pub subtitle: String,
    pub author: String,

    pub is_public_domain: bool,
    pub public_domain_statement: String,

    /// Title exactly as printed on the cover
    pub title_on_cover: String,
    /// Author name exactly as printed on the cover
    pub author_on_cover: String,

    pub is_translation: bool,
    pub original_author: String,
    pub translator: String,

    /// Product description, may contain limited HTML
    pub description: String,
    pub categories: Vec<String>,
    pub keywords: Vec<String>,

    pub is_series: bool,
    pub series_name: String,
    pub series_number: String,

    pub sexually_explicit: bool,
    /// 0 means not set
    pub min_reading_age: i32,
    /// 0 means not set
    pub max_reading_age: i32,

    pub ai_used: bool,
    pub ai_text: AiContribution,
    pub ai_images: AiContribution,
    pub ai_translation: AiContribution,

    pub is_low_content: bool,
    pub isbn: String,

    pub language: String,
    pub upload_format: UploadFormat,
    pub book_format: BookFormat,

    pub trim_size: Option<String>,
    pub ink_paper: Option<InkPaper>,
    /// Raw page count as entered; validated by the print rules
    #[serde(deserialize_with = "string_or_number")]
    pub page_count: String,
    pub interior_bleed: bool,
}

impl Default for BookRecord {
    fn default() -> Self {
        Self {
            title: String::new(),
            subtitle: String::new(),
            author: String::new(),
            is_public_domain: false,
            public_domain_statement: String::new(),
            title_on_cover: String::new(),
            author_on_cover: String::new(),
            is_translation: false,
            original_author: String::new(),
            translator: String::new(),
            description: String::new(),
            categories: vec![String::new(); CATEGORY_SLOTS],
            keywords: vec![String::new(); KEYWORD_SLOTS],
            is_series: false,
            series_name: String::new(),
            series_number: String::new(),
            sexually_explicit: false,
            min_reading_age: 0,
            max_reading_age: 0,
            ai_used: false,
            ai_text: AiContribution::None,
            ai_images: AiContribution::None,
            ai_translation: AiContribution::None,
            is_low_content: false,
            isbn: String::new(),
            language: "English".to_string(),
            upload_format: UploadFormat::Other,
            book_format: BookFormat::Ebook,
            trim_size: None,
            ink_paper: None,
            page_count: String::new(),
            interior_bleed: false,
        }
    }
}

impl BookRecord {
    /// Parse a record from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, RecordError> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        Self::from_value(value)
    }

    /// Parse a record from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, RecordError> {
        let value: serde_json::Value = serde_yaml::from_str(yaml)?;
        Self::from_value(value)
    }

    /// Load a record file, choosing the parser by extension.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, RecordError> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();

        let contents = fs::read_to_string(path)?;
        match extension.as_str() {
            "json" => Self::from_json(&contents),
            "yaml" | "yml" => Self::from_yaml(&contents),
            other => Err(RecordError::UnsupportedExtension(other.to_string())),
        }
    }

    fn from_value(value: serde_json::Value) -> Result<Self, RecordError> {
        validate_record_schema(&value).map_err(RecordError::SchemaError)?;
        Ok(serde_json::from_value(value)?)
    }

    /// Pretty JSON export, suitable for sharing and re-importing.
    pub fn to_json_pretty(&self) -> Result<String, RecordError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Keywords with blank slots removed, trimmed.
    pub fn filled_keywords(&self) -> Vec<&str> {
        filled(&self.keywords)
    }

    /// Categories with blank slots removed, trimmed.
    pub fn filled_categories(&self) -> Vec<&str> {
        filled(&self.categories)
    }

    pub fn is_print(&self) -> bool {
        self.book_format.is_print()
    }

    /// Whether the metadata language equals `name`, ignoring case.
    pub fn language_is(&self, name: &str) -> bool {
        crate::catalog::eq_ignore_case(self.language.trim(), name)
    }
}

/// Accept `page_count: 240` as well as `page_count: "240"`.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(i64),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(text) => text,
        Raw::Number(n) => n.to_string(),
    })
}

fn filled(values: &[String]) -> Vec<&str> {
    values
        .iter()
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAPERBACK_YAML: &str = r#"
title: "The Lighthouse Keeper"
author: "Mara Quinn"
description: "<p>A quiet story.</p>"
keywords: ["coastal mystery", "", "lighthouse"]
book_format: Paperback
trim_size: '6" x 9"'
ink_paper: bw_cream
page_count: "240"
"#;

    #[test]
    fn test_parse_partial_yaml() {
        let record = BookRecord::from_yaml(PAPERBACK_YAML).unwrap();
        assert_eq!(record.title, "The Lighthouse Keeper");
        assert_eq!(record.book_format, BookFormat::Paperback);
        assert_eq!(record.ink_paper, Some(InkPaper::BwCream));
        assert_eq!(record.language, "English");
        assert_eq!(record.filled_keywords(), vec!["coastal mystery", "lighthouse"]);
        assert!(record.is_print());
    }

    #[test]
    fn test_unknown_keys_ignored() {
        let record = BookRecord::from_json(r#"{"title": "T", "validation_results": {}}"#).unwrap();
        assert_eq!(record.title, "T");
    }

    #[test]
    fn test_type_mismatch_rejected() {
        let result = BookRecord::from_json(r#"{"is_series": "maybe"}"#);
        assert!(matches!(result, Err(RecordError::SchemaError(_))));
    }

    #[test]
    fn test_default_has_empty_slots() {
        let record = BookRecord::default();
        assert_eq!(record.categories.len(), CATEGORY_SLOTS);
        assert_eq!(record.keywords.len(), KEYWORD_SLOTS);
        assert!(record.filled_keywords().is_empty());
        assert_eq!(record.book_format, BookFormat::Ebook);
    }

    #[test]
    fn test_export_reimports_identically() {
        let record = BookRecord::from_yaml(PAPERBACK_YAML).unwrap();
        let json = record.to_json_pretty().unwrap();
        assert_eq!(BookRecord::from_json(&json).unwrap(), record);
    }

    #[test]
    fn test_numeric_page_count_accepted() {
        let record = BookRecord::from_yaml("page_count: 312").unwrap();
        assert_eq!(record.page_count, "312");
    }

    #[test]
    fn test_language_is_ignores_case() {
        let record = BookRecord {
            language: " BOKMÅL NORWEGIAN ".to_string(),
            ..Default::default()
        };
        assert!(record.language_is("Bokmål Norwegian"));
        assert!(!record.language_is("Norwegian"));
    }

    #[test]
    fn test_unsupported_extension() {
        let dir = std::env::temp_dir().join("sentinel-record-ext-test.toml");
        std::fs::write(&dir, "title = 'x'").unwrap();
        let result = BookRecord::from_path(&dir);
        assert!(matches!(result, Err(RecordError::UnsupportedExtension(_))));
        let _ = std::fs::remove_file(&dir);
    }
}
