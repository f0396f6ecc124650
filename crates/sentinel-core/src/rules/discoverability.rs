//! Description & discoverability: product description HTML, categories,
//! keywords and series details.

use std::collections::{BTreeMap, BTreeSet};

use crate::catalog::{
    MAX_CATEGORIES, MAX_DESCRIPTION_LENGTH, MAX_KEYWORDS, MAX_KEYWORD_LENGTH,
    PAIRED_DESCRIPTION_TAGS, PROHIBITED_KEYWORD_TERMS, SUPPORTED_DESCRIPTION_TAGS,
};
use crate::record::BookRecord;
use crate::types::{Finding, Section, Severity};

use super::core_details::check_title;
use super::patterns::{
    contains_html, contains_word, preview, DESCRIPTION_TAG_PATTERN, DOUBLE_BRACKET_PATTERN,
    EMPTY_TAG_PATTERN, SPACED_BRACKET_PATTERN,
};
use super::RuleSet;

const DESCRIPTION_GUIDELINE: &str = "Guideline 10";
const CATEGORY_GUIDELINE: &str = "Guideline 2, 11";
const KEYWORD_GUIDELINE: &str = "Guideline 9, 10";
const SERIES_GUIDELINE: &str = "Guideline 2, 6, 7, 11";

/// Tag usage in a description, keyed by lowercase tag name.
#[derive(Debug, Default)]
struct TagCounts {
    opened: BTreeMap<String, usize>,
    closed: BTreeMap<String, usize>,
}

impl TagCounts {
    fn scan(description: &str) -> Self {
        let mut counts = Self::default();
        for caps in DESCRIPTION_TAG_PATTERN.captures_iter(description) {
            let closing = caps.get(1).is_some_and(|m| !m.as_str().is_empty());
            let Some(name) = caps.get(2) else { continue };
            let name = name.as_str().to_lowercase();
            let bucket = if closing { &mut counts.closed } else { &mut counts.opened };
            *bucket.entry(name).or_default() += 1;
        }
        counts
    }

    fn names(&self) -> BTreeSet<&str> {
        self.opened.keys().chain(self.closed.keys()).map(String::as_str).collect()
    }

    fn opened(&self, tag: &str) -> usize {
        self.opened.get(tag).copied().unwrap_or(0)
    }

    fn closed(&self, tag: &str) -> usize {
        self.closed.get(tag).copied().unwrap_or(0)
    }
}

/// Description, category, keyword and series checks.
pub struct DiscoverabilityRules;

impl DiscoverabilityRules {
    pub fn new() -> Self {
        Self
    }

    fn check_description(&self, description: &str) -> Vec<Finding> {
        if description.trim().is_empty() {
            return vec![Finding::info("description", "Description is empty.")];
        }

        let mut findings = Vec::new();
        let tags = TagCounts::scan(description);

        let unsupported: Vec<&str> = tags
            .names()
            .into_iter()
            .filter(|name| !SUPPORTED_DESCRIPTION_TAGS.contains(name))
            .collect();
        if !unsupported.is_empty() {
            findings.push(
                Finding::error(
                    "description",
                    format!(
                        "Uses unsupported HTML tags: {}. Allowed tags are {}.",
                        unsupported.join(", "),
                        SUPPORTED_DESCRIPTION_TAGS.join(", ")
                    ),
                )
                .cite(DESCRIPTION_GUIDELINE),
            );
        }

        if ["h1", "h2", "h3"].iter().any(|h| tags.opened(h) + tags.closed(h) > 0) {
            findings.push(
                Finding::error("description", "Headings h1, h2 and h3 are not allowed. Use h4 to h6 instead.")
                    .cite(DESCRIPTION_GUIDELINE),
            );
        }

        for tag in PAIRED_DESCRIPTION_TAGS {
            let (opened, closed) = (tags.opened(tag), tags.closed(tag));
            if opened > closed {
                findings.push(
                    Finding::warning(
                        "description",
                        format!("Possibly unclosed <{}> tag ({} opened, {} closed).", tag, opened, closed),
                    )
                    .cite(DESCRIPTION_GUIDELINE),
                );
            } else if closed > opened {
                findings.push(
                    Finding::warning(
                        "description",
                        format!("Extra closing </{}> tag ({} opened, {} closed).", tag, opened, closed),
                    )
                    .cite(DESCRIPTION_GUIDELINE),
                );
            }
        }

        if SPACED_BRACKET_PATTERN.is_match(description) {
            findings.push(
                Finding::error("description", "Malformed tag: whitespace right after '<'.").cite(DESCRIPTION_GUIDELINE),
            );
        }
        if DOUBLE_BRACKET_PATTERN.is_match(description) {
            findings.push(
                Finding::error("description", "Malformed tag: doubled '<<' or '>>' brackets.").cite(DESCRIPTION_GUIDELINE),
            );
        }
        if EMPTY_TAG_PATTERN.is_match(description) {
            findings.push(Finding::error("description", "Malformed tag: empty '<>'.").cite(DESCRIPTION_GUIDELINE));
        }

        let length = description.chars().count();
        findings.push(Finding::info(
            "description",
            format!("Length is {} characters (limit {}, including HTML).", length, MAX_DESCRIPTION_LENGTH),
        ));
        if length > MAX_DESCRIPTION_LENGTH {
            findings.push(
                Finding::error(
                    "description",
                    format!("Description exceeds the {} character limit.", MAX_DESCRIPTION_LENGTH),
                )
                .cite(DESCRIPTION_GUIDELINE),
            );
        }

        findings
    }

    fn check_categories(&self, categories: &[&str]) -> Vec<Finding> {
        if categories.len() > MAX_CATEGORIES {
            vec![Finding::error(
                "categories",
                format!("{} categories selected; at most {} are allowed.", categories.len(), MAX_CATEGORIES),
            )
            .cite(CATEGORY_GUIDELINE)]
        } else if categories.is_empty() {
            vec![Finding::info("categories", "No categories selected.")]
        } else {
            vec![Finding::pass("categories", format!("{} categories selected.", categories.len()))]
        }
    }

    fn check_keywords(&self, record: &BookRecord) -> Vec<Finding> {
        let keywords = record.filled_keywords();
        if keywords.is_empty() {
            return vec![Finding::info("keywords", "No keywords entered.")];
        }

        let mut findings = Vec::new();
        if keywords.len() > MAX_KEYWORDS {
            findings.push(
                Finding::error(
                    "keywords",
                    format!("{} keywords entered; at most {} are allowed.", keywords.len(), MAX_KEYWORDS),
                )
                .cite(KEYWORD_GUIDELINE),
            );
        }

        let title = record.title.to_lowercase();
        let subtitle = record.subtitle.to_lowercase();
        let categories: Vec<String> = record.filled_categories().iter().map(|c| c.to_lowercase()).collect();

        for (i, keyword) in keywords.iter().enumerate() {
            let field = format!("Keyword {} (\"{}\")", i + 1, preview(keyword, 20));
            let lower = keyword.to_lowercase();

            let length = keyword.chars().count();
            if length > MAX_KEYWORD_LENGTH {
                findings.push(
                    Finding::warning(
                        &field,
                        format!("{} characters; keep keywords under {}.", length, MAX_KEYWORD_LENGTH),
                    )
                    .cite(KEYWORD_GUIDELINE),
                );
            }
            for term in PROHIBITED_KEYWORD_TERMS.iter().filter(|t| contains_word(&lower, t)) {
                findings.push(
                    Finding::warning(&field, format!("Contains potentially prohibited term '{}'.", term))
                        .cite(KEYWORD_GUIDELINE),
                );
            }
            if contains_html(keyword) {
                findings.push(Finding::error(&field, "Contains HTML tags.").cite(KEYWORD_GUIDELINE));
            }
            if keyword.contains('"') {
                findings.push(
                    Finding::warning(&field, "Contains quotation marks, which are usually unnecessary.")
                        .cite(KEYWORD_GUIDELINE),
                );
            }
            if title.contains(&lower) {
                findings.push(Finding::info(&field, "Already appears in the title; a different keyword may reach more readers."));
            }
            if !subtitle.is_empty() && subtitle.contains(&lower) {
                findings.push(Finding::info(&field, "Already appears in the subtitle."));
            }
            for category in categories.iter().filter(|c| c.contains(&lower)) {
                findings.push(Finding::info(&field, format!("Already covered by category '{}'.", category)));
            }
        }

        if findings.is_empty() {
            findings.push(Finding::pass("keywords", format!("{} keywords passed basic checks.", keywords.len())));
        }
        findings
    }

    fn check_series(&self, record: &BookRecord) -> Vec<Finding> {
        if !record.is_series {
            return Vec::new();
        }

        let mut findings = vec![Finding::info("series", "Book is marked as part of a series.")];

        if record.is_low_content {
            findings.push(
                Finding::error("series", "Low-content books cannot be part of a series.").cite(SERIES_GUIDELINE),
            );
        }
        if record.is_public_domain {
            findings.push(
                Finding::error("series", "Public domain books cannot be added to a series.").cite(SERIES_GUIDELINE),
            );
        }

        let name = record.series_name.trim();
        if name.is_empty() {
            findings.push(Finding::error("series_name", "Series name is missing.").cite(SERIES_GUIDELINE));
        } else {
            let issues: Vec<Finding> = check_title(name, "", "series_name", SERIES_GUIDELINE)
                .into_iter()
                .filter(|f| matches!(f.severity, Severity::Error | Severity::Warning))
                .collect();
            if issues.is_empty() {
                findings.push(Finding::pass("series_name", "Series name passed basic checks."));
            } else {
                findings.extend(issues);
            }
        }

        let number = record.series_number.trim();
        if number.is_empty() {
            findings.push(Finding::info("series_number", "Series number not entered."));
        } else if !number.chars().all(|c| c.is_ascii_digit()) {
            findings.push(
                Finding::error("series_number", "Series number must be a whole number.").cite(SERIES_GUIDELINE),
            );
        } else if contains_word(&name.to_lowercase(), number) {
            findings.push(
                Finding::warning("series_number", "Series number appears in the series name; keep numbering in its own field.")
                    .cite(SERIES_GUIDELINE),
            );
        } else {
            findings.push(Finding::pass("series_number", "Series number format is valid."));
        }

        findings
    }
}

impl Default for DiscoverabilityRules {
    fn default() -> Self {
        Self::new()
    }
}

impl RuleSet for DiscoverabilityRules {
    fn section(&self) -> Section {
        Section::Discoverability
    }

    fn evaluate(&self, record: &BookRecord) -> Vec<Finding> {
        let mut findings = self.check_description(&record.description);
        findings.extend(self.check_categories(&record.filled_categories()));
        findings.extend(self.check_keywords(record));
        findings.extend(self.check_series(record));
        findings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count(findings: &[Finding], severity: Severity) -> usize {
        findings.iter().filter(|f| f.severity == severity).count()
    }

    #[test]
    fn test_empty_description_is_info_only() {
        let findings = DiscoverabilityRules::new().check_description("  ");
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].severity, Severity::Info);
    }

    #[test]
    fn test_clean_description() {
        let findings = DiscoverabilityRules::new().check_description("<p>A <b>gripping</b> tale.<br></p>");
        assert_eq!(count(&findings, Severity::Error), 0);
        assert_eq!(count(&findings, Severity::Warning), 0);
        assert!(findings.iter().any(|f| f.message.contains("Length is")));
    }

    #[test]
    fn test_br_does_not_count_as_bold() {
        let findings = DiscoverabilityRules::new().check_description("Line one<br>Line two<br/>");
        assert_eq!(count(&findings, Severity::Warning), 0);
    }

    #[test]
    fn test_unsupported_and_heading_tags() {
        let findings =
            DiscoverabilityRules::new().check_description("<h1>Big</h1><div>text</div><span>x</span>");
        let unsupported = findings
            .iter()
            .find(|f| f.message.starts_with("Uses unsupported"))
            .expect("unsupported tag finding");
        assert!(unsupported.message.contains("div, h1, span"));
        assert!(findings.iter().any(|f| f.message.contains("h1, h2 and h3")));
    }

    #[test]
    fn test_unbalanced_tags() {
        let findings = DiscoverabilityRules::new().check_description("<b>open <i>text</i></i>");
        assert!(findings.iter().any(|f| f.message.contains("unclosed <b>")));
        assert!(findings.iter().any(|f| f.message.contains("Extra closing </i>")));
    }

    #[test]
    fn test_malformed_brackets() {
        let rules = DiscoverabilityRules::new();
        assert!(count(&rules.check_description("< b>x"), Severity::Error) >= 1);
        assert!(count(&rules.check_description("<<b>x</b>"), Severity::Error) >= 1);
        assert!(count(&rules.check_description("a <> b"), Severity::Error) >= 1);
    }

    #[test]
    fn test_description_length_limit() {
        let long = "a".repeat(MAX_DESCRIPTION_LENGTH + 1);
        let findings = DiscoverabilityRules::new().check_description(&long);
        assert_eq!(count(&findings, Severity::Error), 1);
    }

    #[test]
    fn test_categories() {
        let rules = DiscoverabilityRules::new();
        assert_eq!(rules.check_categories(&[])[0].severity, Severity::Info);
        assert_eq!(rules.check_categories(&["Fiction", "Mystery"])[0].severity, Severity::Pass);
        assert!(rules.check_categories(&["a", "b", "c", "d"])[0].severity.is_error());
    }

    #[test]
    fn test_keywords() {
        let record = BookRecord {
            title: "Ocean Tides".to_string(),
            keywords: vec![
                "free ebook".to_string(),
                "ocean".to_string(),
                "\"sailing\"".to_string(),
                "x".repeat(51),
            ],
            ..Default::default()
        };
        let findings = DiscoverabilityRules::new().check_keywords(&record);
        assert!(findings.iter().any(|f| f.field.starts_with("Keyword 1") && f.message.contains("'free'")));
        assert!(findings.iter().any(|f| f.field.starts_with("Keyword 1") && f.message.contains("'ebook'")));
        assert!(findings.iter().any(|f| f.field.starts_with("Keyword 2") && f.severity == Severity::Info));
        assert!(findings.iter().any(|f| f.field.starts_with("Keyword 3") && f.message.contains("quotation")));
        assert!(findings.iter().any(|f| f.field.starts_with("Keyword 4") && f.severity.is_warning()));
    }

    #[test]
    fn test_keyword_freedom_not_flagged() {
        let record = BookRecord {
            keywords: vec!["freedom".to_string(), "bookish romance".to_string()],
            ..Default::default()
        };
        let findings = DiscoverabilityRules::new().check_keywords(&record);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].severity, Severity::Pass);
    }

    #[test]
    fn test_too_many_keywords() {
        let record = BookRecord {
            keywords: (1..=8).map(|i| format!("topic {}", i)).collect(),
            ..Default::default()
        };
        let findings = DiscoverabilityRules::new().check_keywords(&record);
        assert!(findings.iter().any(|f| f.field == "keywords" && f.severity.is_error()));
    }

    #[test]
    fn test_series_skipped_when_not_series() {
        assert!(DiscoverabilityRules::new().check_series(&BookRecord::default()).is_empty());
    }

    #[test]
    fn test_series_checks() {
        let rules = DiscoverabilityRules::new();
        let mut record = BookRecord {
            is_series: true,
            series_name: "Saga Book 2".to_string(),
            series_number: "2".to_string(),
            ..Default::default()
        };
        let findings = rules.check_series(&record);
        assert!(findings.iter().any(|f| f.field == "series_number" && f.severity.is_warning()));

        record.series_number = "two".to_string();
        record.is_low_content = true;
        let findings = rules.check_series(&record);
        assert!(findings.iter().any(|f| f.field == "series_number" && f.severity.is_error()));
        assert!(findings.iter().any(|f| f.field == "series" && f.severity.is_error()));

        record.series_name = "Free Stuff".to_string();
        let findings = rules.check_series(&record);
        assert!(findings.iter().any(|f| f.field == "series_name" && f.severity.is_warning()));
    }

    #[test]
    fn test_series_missing_name_and_number() {
        let record = BookRecord { is_series: true, ..Default::default() };
        let findings = DiscoverabilityRules::new().check_series(&record);
        assert!(findings.iter().any(|f| f.field == "series_name" && f.severity.is_error()));
        assert!(findings.iter().any(|f| f.field == "series_number" && f.severity == Severity::Info));
    }
}
