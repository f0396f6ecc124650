//! Audience & special book types: reading age, ISBN, low-content,
//! translation and public-domain rules.

use crate::catalog::{CHILDREN_CATEGORY_TERMS, DIFFERENTIATION_PHRASES, TEEN_CATEGORY_TERMS};
use crate::record::BookRecord;
use crate::types::{Finding, Section};

use super::patterns::{contains_word, preview};
use super::RuleSet;

const AUDIENCE_GUIDELINE: &str = "Guideline 2, 11";
const ISBN_GUIDELINE: &str = "Guideline 6, 7, 11, 12";
const TRANSLATION_GUIDELINE: &str = "Guideline 1";

/// Whether a lowercase category names a children's or teen audience.
fn is_young_reader_category(category: &str) -> bool {
    CHILDREN_CATEGORY_TERMS.iter().any(|t| category.contains(t))
        || TEEN_CATEGORY_TERMS.iter().any(|t| {
            // "ya" is too short for substring matching
            if *t == "ya" {
                contains_word(category, t)
            } else {
                category.contains(t)
            }
        })
}

/// Validate an ISBN check digit. Expects separators already removed.
fn isbn_checksum_ok(isbn: &str) -> bool {
    let chars: Vec<char> = isbn.chars().collect();
    match chars.len() {
        10 => {
            let mut sum = 0;
            for (i, &c) in chars.iter().enumerate() {
                let value = match c {
                    'X' | 'x' if i == 9 => 10,
                    c => match c.to_digit(10) {
                        Some(d) => d,
                        None => return false,
                    },
                };
                sum += value * (10 - i as u32);
            }
            sum % 11 == 0
        }
        13 => {
            let mut sum = 0;
            for (i, &c) in chars.iter().enumerate() {
                let Some(d) = c.to_digit(10) else { return false };
                sum += if i % 2 == 0 { d } else { d * 3 };
            }
            sum % 10 == 0
        }
        _ => false,
    }
}

/// Reading age, ISBN and special book type checks.
pub struct AudienceRules;

impl AudienceRules {
    pub fn new() -> Self {
        Self
    }

    fn check_primary_audience(&self, record: &BookRecord) -> Vec<Finding> {
        let mut findings = Vec::new();
        let min_age = record.min_reading_age;
        let max_age = record.max_reading_age;
        let categories: Vec<String> = record.filled_categories().iter().map(|c| c.to_lowercase()).collect();

        if record.sexually_explicit {
            findings.push(
                Finding::warning(
                    "sexually_explicit",
                    "Marked as sexually explicit. Make sure the cover, title and description stay appropriate.",
                )
                .cite(AUDIENCE_GUIDELINE),
            );
            if min_age < 18 {
                let message = if min_age <= 0 {
                    "Sexually explicit content with no minimum reading age set. This is usually 18+.".to_string()
                } else {
                    format!("Sexually explicit content with a minimum reading age of {}. This is usually 18+.", min_age)
                };
                findings.push(Finding::warning("min_reading_age", message).cite(AUDIENCE_GUIDELINE));
            }
            for category in categories.iter().filter(|c| CHILDREN_CATEGORY_TERMS.iter().any(|t| c.contains(t))) {
                findings.push(
                    Finding::error(
                        "categories",
                        format!("Sexually explicit content cannot be listed in the children's category '{}'.", category),
                    )
                    .cite(AUDIENCE_GUIDELINE),
                );
            }
        }

        if min_age < 0 || max_age < 0 {
            findings.push(Finding::error("reading_age", "Reading ages cannot be negative.").cite(AUDIENCE_GUIDELINE));
        } else if max_age != 0 && min_age > max_age {
            findings.push(
                Finding::error(
                    "reading_age",
                    format!("Minimum reading age ({}) is greater than maximum reading age ({}).", min_age, max_age),
                )
                .cite(AUDIENCE_GUIDELINE),
            );
        } else if (min_age > 0) != (max_age > 0) {
            findings.push(Finding::info(
                "reading_age",
                "Only one reading age bound is set. Enter both to target a specific range.",
            ));
        } else if min_age > 0 && max_age > 0 {
            findings.push(Finding::pass(
                "reading_age",
                format!("Reading age range {}-{} is valid.", min_age, max_age),
            ));
        }

        let young_category = categories.iter().find(|c| is_young_reader_category(c));
        if let Some(category) = young_category {
            if min_age == 0 {
                findings.push(
                    Finding::warning(
                        "min_reading_age",
                        format!("Category '{}' suggests a young audience, but no minimum reading age is set.", category),
                    )
                    .cite(AUDIENCE_GUIDELINE),
                );
            } else if min_age > 17 {
                findings.push(
                    Finding::warning(
                        "min_reading_age",
                        format!("Minimum reading age {} conflicts with the young-reader category '{}'.", min_age, category),
                    )
                    .cite(AUDIENCE_GUIDELINE),
                );
            }
        }

        if findings.is_empty() {
            findings.push(Finding::pass("primary_audience", "Primary audience settings look consistent."));
        }
        findings
    }

    fn check_isbn(&self, record: &BookRecord) -> Vec<Finding> {
        let raw = record.isbn.trim();
        let print = record.is_print();

        if raw.is_empty() {
            let note = if print && !record.is_low_content {
                "No ISBN entered. Print books need one; KDP can assign a free ISBN."
            } else if print {
                "No ISBN entered. Acceptable for low-content print books, but KDP does not provide free ISBNs for them."
            } else {
                "No ISBN entered. ISBNs are optional for eBooks."
            };
            return vec![Finding::info("isbn", note)];
        }

        let isbn: String = raw.chars().filter(|c| *c != '-' && *c != ' ').collect();
        let length = isbn.chars().count();
        let mut findings = Vec::new();

        let valid_chars = isbn.chars().enumerate().all(|(i, c)| {
            c.is_ascii_digit() || (length == 10 && i == 9 && (c == 'X' || c == 'x'))
        });
        if !valid_chars {
            findings.push(
                Finding::error("isbn", "ISBN may only contain digits (and a final 'X' for ISBN-10).").cite(ISBN_GUIDELINE),
            );
        }

        if length != 10 && length != 13 {
            findings.push(
                Finding::error(
                    "isbn",
                    format!("ISBN has {} characters after removing hyphens; it must have 10 or 13.", length),
                )
                .cite(ISBN_GUIDELINE),
            );
        } else if valid_chars {
            findings.push(Finding::pass("isbn", format!("ISBN-{} length is valid.", length)));
            if !isbn_checksum_ok(&isbn) {
                findings.push(
                    Finding::error("isbn", "ISBN check digit does not match. Check for typos.").cite(ISBN_GUIDELINE),
                );
            }
        }

        if print && record.is_low_content {
            findings.push(
                Finding::warning(
                    "isbn",
                    "Low-content books must use an ISBN you purchased yourself; KDP free ISBNs are not available.",
                )
                .cite(ISBN_GUIDELINE),
            );
        } else if print {
            findings.push(Finding::info(
                "isbn",
                "If you use your own ISBN, the imprint and registration (e.g. with Bowker) must match the book details.",
            ));
        }

        findings
    }

    fn check_low_content(&self, record: &BookRecord) -> Vec<Finding> {
        if !record.is_low_content {
            return Vec::new();
        }

        let field = "is_low_content";
        let notes = [
            "No free KDP ISBN is available; the book will not have one unless you provide your own.",
            "Low-content books cannot be part of a series.",
            "Look Inside is not available.",
            "Transparency codes cannot be used.",
            "Pre-order release dates are not available.",
            "Keep the barcode area on the back cover clear.",
            "The low-content setting cannot be changed after publishing.",
        ];

        let mut findings = vec![Finding::info(field, "Marked as a low-content book (journal, planner, notebook, etc.).")];
        findings.extend(notes.iter().map(|note| Finding::info(field, *note)));
        findings
    }

    fn check_translation(&self, record: &BookRecord) -> Vec<Finding> {
        if !record.is_translation {
            return Vec::new();
        }

        let mut findings = vec![Finding::info("is_translation", "Marked as a translation.")];

        if record.original_author.trim().is_empty() {
            findings.push(
                Finding::error("original_author", "Translations must credit the original author.")
                    .cite(TRANSLATION_GUIDELINE),
            );
        } else {
            findings.push(Finding::pass("original_author", "Original author is provided."));
        }

        let translator = record.translator.trim();
        if translator.is_empty() {
            findings.push(
                Finding::warning("translator", "Translator is not credited. Credit them, or enter 'Anonymous'.")
                    .cite(TRANSLATION_GUIDELINE),
            );
        } else if translator.eq_ignore_ascii_case("anonymous") {
            findings.push(Finding::pass("translator", "Translator credited as 'Anonymous', which is acceptable."));
        } else {
            findings.push(Finding::pass("translator", "Translator is provided."));
        }

        findings
    }

    fn check_public_domain(&self, record: &BookRecord) -> Vec<Finding> {
        if !record.is_public_domain {
            return Vec::new();
        }

        let mut findings = vec![
            Finding::info("is_public_domain", "Marked as a public domain work."),
            Finding::info(
                "is_public_domain",
                "Undifferentiated public domain titles are not allowed when a free edition is already on sale.",
            ),
        ];

        let statement = record.public_domain_statement.trim();
        let searched = format!("{} {}", statement, record.description).to_lowercase();
        let found: Vec<&str> = DIFFERENTIATION_PHRASES
            .iter()
            .copied()
            .filter(|phrase| searched.contains(phrase))
            .collect();

        if found.is_empty() {
            if statement.is_empty() {
                findings.push(Finding::error(
                    "public_domain_statement",
                    "No differentiation statement and no differentiating phrases (annotated, illustrated by, new translation by, ...) found.",
                ));
            } else {
                findings.push(Finding::warning(
                    "public_domain_statement",
                    format!(
                        "Statement '{}' does not use recognised differentiation phrases. Make sure it explains what is unique.",
                        preview(statement, 70)
                    ),
                ));
            }
        } else {
            findings.push(Finding::pass(
                "public_domain_statement",
                format!("Differentiation phrases found: {}.", found.join(", ")),
            ));
        }

        findings
    }
}

impl Default for AudienceRules {
    fn default() -> Self {
        Self::new()
    }
}

impl RuleSet for AudienceRules {
    fn section(&self) -> Section {
        Section::Audience
    }

    fn evaluate(&self, record: &BookRecord) -> Vec<Finding> {
        let mut findings = self.check_primary_audience(record);
        findings.extend(self.check_isbn(record));
        findings.extend(self.check_low_content(record));
        findings.extend(self.check_translation(record));
        findings.extend(self.check_public_domain(record));
        findings
    }
}
