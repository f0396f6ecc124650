//! # sentinel-core
//!
//! Deterministic KDP book metadata validation engine.
//!
//! This crate checks the details an author enters while setting up a
//! Kindle Direct Publishing title against KDP's content and formatting
//! guidelines, before anything is submitted.
//!
//! ## Key Guarantees
//!
//! 1. **Deterministic**: The same record always produces the same findings
//! 2. **No network**: All validation is rule-based
//! 3. **Total**: Validation never fails; problems are findings, not errors
//! 4. **Traceable**: Findings name the record field and the KDP guideline
//!
//! ## Example
//!
//! ```rust,ignore
//! use sentinel_core::{validate, BookRecord, Severity};
//!
//! let record = BookRecord::from_path("my-book.yaml")?;
//! let report = validate(&record);
//!
//! for finding in report.findings().filter(|f| f.severity == Severity::Error) {
//!     println!("{}: {}", finding.field, finding.message);
//! }
//! println!("{}", report.readiness);
//! ```

pub mod catalog;
pub mod manuscript;
pub mod record;
pub mod rules;
pub mod synthesizer;
pub mod types;

// Re-export main types at crate root
pub use manuscript::{Manuscript, ManuscriptError};
pub use record::{
    AiContentKind, AiContribution, BookFormat, BookRecord, InkPaper, RecordError, UploadFormat,
};
pub use rules::RuleSet;
pub use synthesizer::Synthesizer;
pub use types::{Finding, Readiness, Section, SectionReport, Severity, ValidationReport};

/// Validate a record against every built-in rule set.
pub fn validate(record: &BookRecord) -> ValidationReport {
    Synthesizer::new().validate(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const CLEAN_RECORD: &str = r#"
title: "The Lighthouse Keeper"
subtitle: "A Novel"
author: "Mara Quinn"
title_on_cover: "The Lighthouse Keeper"
author_on_cover: "Mara Quinn"
description: "<p>A <b>moving</b> story about a keeper and the storm that changed her island.</p>"
categories: ["Fiction > Literary"]
keywords: ["coastal fiction", "storm survival", "island community"]
language: "English"
book_format: "paperback"
trim_size: "6\" x 9\""
ink_paper: "bw_cream"
page_count: 320
isbn: "978-0-306-40615-7"
"#;

    #[test]
    fn test_clean_record_has_no_errors() {
        let record = BookRecord::from_yaml(CLEAN_RECORD).unwrap();
        let report = validate(&record);
        let errors: Vec<_> = report.findings().filter(|f| f.severity.is_error()).collect();
        assert!(errors.is_empty(), "unexpected errors: {:?}", errors);
        assert_ne!(report.readiness, Readiness::HighRisk);
    }

    #[test]
    fn test_low_content_print_isbn_flagged() {
        let mut record = BookRecord::from_yaml(CLEAN_RECORD).unwrap();
        record.is_low_content = true;
        let report = validate(&record);
        let audience = report.section(Section::Audience).unwrap();
        assert!(audience
            .findings
            .iter()
            .any(|f| f.field == "isbn" && f.severity.is_warning()));
    }

    #[test]
    fn test_long_description_is_error() {
        let mut record = BookRecord::from_yaml(CLEAN_RECORD).unwrap();
        record.description = "word ".repeat(900);
        let report = validate(&record);
        assert!(report
            .findings()
            .any(|f| f.field == "description" && f.severity.is_error()));
        assert_eq!(report.readiness, Readiness::HighRisk);
    }

    fn arb_record() -> impl Strategy<Value = BookRecord> {
        (
            ".{0,80}",
            ".{0,40}",
            ".{0,30}",
            ".{0,300}",
            proptest::collection::vec(".{0,60}", 0..10),
            proptest::collection::vec(".{0,40}", 0..5),
            (-5i32..30, -5i32..30),
            any::<(bool, bool, bool, bool, bool, bool)>(),
            ".{0,16}",
            "[0-9a-z ]{0,6}",
            prop::sample::select(BookFormat::ALL.to_vec()),
            prop::option::of(prop::sample::select(InkPaper::ALL.to_vec())),
        )
            .prop_map(
                |(
                    title,
                    subtitle,
                    author,
                    description,
                    keywords,
                    categories,
                    (min_age, max_age),
                    (series, explicit, low_content, public_domain, translation, ai_used),
                    isbn,
                    page_count,
                    book_format,
                    ink_paper,
                )| BookRecord {
                    title,
                    subtitle,
                    author,
                    description,
                    keywords,
                    categories,
                    min_reading_age: min_age,
                    max_reading_age: max_age,
                    is_series: series,
                    series_name: "Saga".to_string(),
                    series_number: page_count.clone(),
                    sexually_explicit: explicit,
                    is_low_content: low_content,
                    is_public_domain: public_domain,
                    is_translation: translation,
                    ai_used,
                    isbn,
                    page_count,
                    book_format,
                    ink_paper,
                    trim_size: Some("6\" x 9\"".to_string()),
                    ..Default::default()
                },
            )
    }

    proptest! {
        #[test]
        fn prop_counts_match_findings(record in arb_record()) {
            let report = validate(&record);
            let errors = report.findings().filter(|f| f.severity == Severity::Error).count();
            let warnings = report.findings().filter(|f| f.severity == Severity::Warning).count();
            prop_assert_eq!(report.error_count, errors);
            prop_assert_eq!(report.warning_count, warnings);
            prop_assert_eq!(report.readiness, Readiness::assess(errors, warnings));
        }

        #[test]
        fn prop_validation_is_deterministic(record in arb_record()) {
            let first = validate(&record);
            let second = validate(&record);
            prop_assert_eq!(first.sections, second.sections);
        }

        #[test]
        fn prop_every_section_reported(record in arb_record()) {
            let report = validate(&record);
            let sections: Vec<Section> = report.sections.iter().map(|s| s.section).collect();
            prop_assert_eq!(sections, Section::ALL.to_vec());
            prop_assert!(report.sections.iter().all(|s| !s.findings.is_empty()));
        }
    }
}
