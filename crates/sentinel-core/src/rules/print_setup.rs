//! Print book setup (KDP Guidelines 12, 13).
//!
//! Only runs for paperback and hardcover records. Missing trim, ink or
//! page count stop the section early, as does an unusable page count;
//! everything after that depends on a valid page count.

use crate::catalog::{
    self, BLEED_HEIGHT_ALLOWANCE, BLEED_WIDTH_ALLOWANCE, HARDCOVER_INSIDE_MARGIN,
    HARDCOVER_PAGE_RANGE, MIN_PRINT_PAGES, OUTSIDE_MARGIN_BLEED, OUTSIDE_MARGIN_NO_BLEED,
};
use crate::record::{BookFormat, BookRecord, InkPaper};
use crate::types::{Finding, Section};

use super::patterns::parse_trim_dimensions;
use super::RuleSet;

const GUIDELINE: &str = "Guideline 12, 13";

/// Inputs that passed the presence checks.
struct PrintInputs<'a> {
    format: BookFormat,
    trim: &'a str,
    ink: InkPaper,
    pages: u32,
    bleed: bool,
}

/// Trim size, ink, page count, page size and margin checks.
pub struct PrintSetupRules;

impl PrintSetupRules {
    pub fn new() -> Self {
        Self
    }

    fn unverified_limits(inputs: &PrintInputs<'_>) -> Finding {
        Finding::warning(
            "page_count",
            format!(
                "Could not verify page count limits for '{}' with {} ({}). Check the KDP page count tables.",
                inputs.trim,
                inputs.ink.label(),
                inputs.format
            ),
        )
        .cite(GUIDELINE)
    }

    fn check_page_limits(&self, inputs: &PrintInputs<'_>) -> Vec<Finding> {
        let mut findings = Vec::new();

        // No page table exists for this combination.
        if inputs.format == BookFormat::Hardcover && inputs.ink == InkPaper::StandardColorWhite {
            findings.push(
                Finding::error(
                    "ink_paper",
                    "Standard color interior is not available for hardcovers. Choose premium color or black ink.",
                )
                .cite(GUIDELINE),
            );
            findings.push(Self::unverified_limits(inputs));
            return findings;
        }

        let trim = parse_trim_dimensions(inputs.trim).and_then(|(w, h)| catalog::find_trim(w, h));
        let Some(trim) = trim else {
            findings.push(Self::unverified_limits(inputs));
            return findings;
        };

        let Some(ranges) = trim.ranges(inputs.format) else {
            findings.push(
                Finding::error(
                    "trim_size",
                    format!("Trim size {} is not offered for {}.", trim.label, inputs.format),
                )
                .cite(GUIDELINE),
            );
            return findings;
        };

        match ranges.for_ink(inputs.ink) {
            Some((min, max)) if !(min..=max).contains(&inputs.pages) => findings.push(
                Finding::error(
                    "page_count",
                    format!(
                        "For {} ({}, {}) pages must be {}-{}. Entered: {}.",
                        trim.label,
                        inputs.ink.label(),
                        inputs.format,
                        min,
                        max,
                        inputs.pages
                    ),
                )
                .cite(GUIDELINE),
            ),
            Some((min, max)) => findings.push(Finding::pass(
                "page_count",
                format!(
                    "{} pages is within {}-{} for {} ({}, {}).",
                    inputs.pages,
                    min,
                    max,
                    trim.label,
                    inputs.ink.label(),
                    inputs.format
                ),
            )),
            None => findings.push(
                Finding::error(
                    "ink_paper",
                    format!(
                        "{} with {} is not available for {}. Choose a different combination.",
                        trim.label,
                        inputs.ink.label(),
                        inputs.format
                    ),
                )
                .cite(GUIDELINE),
            ),
        }

        findings
    }

    fn check_document_size(&self, inputs: &PrintInputs<'_>) -> Vec<Finding> {
        let Some((width, height)) = parse_trim_dimensions(inputs.trim) else {
            return vec![Finding::warning(
                "trim_size",
                format!("Could not parse trim size '{}' to work out the document page size.", inputs.trim),
            )
            .cite(GUIDELINE)];
        };

        let (width, height) = if inputs.bleed {
            (width + BLEED_WIDTH_ALLOWANCE, height + BLEED_HEIGHT_ALLOWANCE)
        } else {
            (width, height)
        };

        let mut findings = vec![Finding::pass(
            "document_size",
            format!(
                "For '{}' {}, set the document page size to {:.3}\" W x {:.3}\" H.",
                inputs.trim,
                if inputs.bleed { "with bleed" } else { "without bleed" },
                width,
                height
            ),
        )
        .cite(GUIDELINE)];
        if inputs.bleed {
            findings.push(Finding::info(
                "interior_bleed",
                "Bleed elements must extend fully to the larger page dimensions.",
            ));
        }
        findings
    }

    fn check_margins(&self, inputs: &PrintInputs<'_>) -> Vec<Finding> {
        let mut findings = Vec::new();
        let mut inside = catalog::inside_margin(inputs.pages);

        if inputs.format == BookFormat::Hardcover {
            let (low, high) = HARDCOVER_PAGE_RANGE;
            if (low..=high).contains(&inputs.pages) {
                inside = Some(HARDCOVER_INSIDE_MARGIN);
            } else if inputs.pages > high {
                findings.push(
                    Finding::warning(
                        "page_count",
                        format!("Hardcover page count ({}) exceeds {}. Verify the margin requirements.", inputs.pages, high),
                    )
                    .cite(GUIDELINE),
                );
            }
        }

        let outside = if inputs.bleed { OUTSIDE_MARGIN_BLEED } else { OUTSIDE_MARGIN_NO_BLEED };

        match inside {
            Some(inside) => findings.push(
                Finding::pass(
                    "margins",
                    format!(
                        "Inside (gutter) margin at least {:.3}\"; outside margins at least {:.3}\".",
                        inside, outside
                    ),
                )
                .cite(GUIDELINE),
            ),
            None => findings.push(
                Finding::warning(
                    "margins",
                    format!(
                        "Could not determine the inside margin for {} pages. Outside margins must be at least {:.3}\".",
                        inputs.pages, outside
                    ),
                )
                .cite(GUIDELINE),
            ),
        }

        findings.push(Finding::info("margins", "Enable mirror margins in your document setup for print books."));
        if inputs.format == BookFormat::Hardcover {
            findings.push(Finding::info(
                "margins",
                "Hardcover margins can depend on trim size and page count. Double-check the KDP documentation.",
            ));
        }
        findings
    }
}

impl Default for PrintSetupRules {
    fn default() -> Self {
        Self::new()
    }
}

impl RuleSet for PrintSetupRules {
    fn section(&self) -> Section {
        Section::PrintSetup
    }

    fn evaluate(&self, record: &BookRecord) -> Vec<Finding> {
        if !record.is_print() {
            return vec![Finding::info("book_format", "Print checks do not apply to eBooks.")];
        }

        let trim = record
            .trim_size
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty() && !t.starts_with("Select"));
        let page_count = record.page_count.trim();

        let mut findings = Vec::new();
        if trim.is_none() {
            findings.push(Finding::error("trim_size", "Select a trim size.").cite(GUIDELINE));
        }
        if record.ink_paper.is_none() {
            findings.push(Finding::error("ink_paper", "Select an ink and paper type.").cite(GUIDELINE));
        }
        if page_count.is_empty() {
            findings.push(Finding::error("page_count", "Page count is required.").cite(GUIDELINE));
        }
        let (Some(trim), Some(ink), false) = (trim, record.ink_paper, page_count.is_empty()) else {
            return findings;
        };

        let pages = match page_count.parse::<u32>() {
            Ok(pages) if pages >= MIN_PRINT_PAGES => pages,
            Err(_) if page_count.bytes().all(|b| b.is_ascii_digit()) => {
                findings.push(
                    Finding::error(
                        "page_count",
                        format!("Page count {} is beyond the page limits of any KDP print book.", page_count),
                    )
                    .cite(GUIDELINE),
                );
                return findings;
            }
            _ => {
                findings.push(
                    Finding::error(
                        "page_count",
                        format!("Page count '{}' must be a whole number, at least {}.", page_count, MIN_PRINT_PAGES),
                    )
                    .cite(GUIDELINE),
                );
                return findings;
            }
        };

        let inputs = PrintInputs {
            format: record.book_format,
            trim,
            ink,
            pages,
            bleed: record.interior_bleed,
        };

        findings.push(Finding::info(
            "print_summary",
            format!(
                "Format: {}, Trim: {}, Ink/Paper: {}, Bleed: {}, Pages: {}.",
                inputs.format,
                inputs.trim,
                inputs.ink.label(),
                if inputs.bleed { "Yes" } else { "No" },
                inputs.pages
            ),
        ));
        findings.extend(self.check_page_limits(&inputs));
        findings.extend(self.check_document_size(&inputs));
        findings.extend(self.check_margins(&inputs));
        findings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Severity;

    fn paperback(trim: &str, ink: InkPaper, pages: &str) -> BookRecord {
        BookRecord {
            book_format: BookFormat::Paperback,
            trim_size: Some(trim.to_string()),
            ink_paper: Some(ink),
            page_count: pages.to_string(),
            ..Default::default()
        }
    }

    fn errors(findings: &[Finding]) -> Vec<&Finding> {
        findings.iter().filter(|f| f.severity.is_error()).collect()
    }

    #[test]
    fn test_ebook_not_applicable() {
        let findings = PrintSetupRules::new().evaluate(&BookRecord::default());
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].severity, Severity::Info);
    }

    #[test]
    fn test_missing_inputs_stop_early() {
        let record = BookRecord { book_format: BookFormat::Paperback, ..Default::default() };
        let findings = PrintSetupRules::new().evaluate(&record);
        assert_eq!(findings.len(), 3);
        assert!(findings.iter().all(|f| f.severity.is_error()));
    }

    #[test]
    fn test_select_placeholder_counts_as_missing() {
        let mut record = paperback("Select Trim Size", InkPaper::BwWhite, "100");
        record.trim_size = Some("Select Trim Size".to_string());
        let findings = PrintSetupRules::new().evaluate(&record);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].field, "trim_size");
    }

    #[test]
    fn test_invalid_page_count() {
        let rules = PrintSetupRules::new();
        for pages in ["12", "abc", "-40"] {
            let findings = rules.evaluate(&paperback("6\" x 9\"", InkPaper::BwWhite, pages));
            assert_eq!(findings.len(), 1, "pages = {}", pages);
            assert!(findings[0].message.contains("at least 24"));
        }
    }

    #[test]
    fn test_huge_page_count_is_out_of_range() {
        let findings = PrintSetupRules::new().evaluate(&paperback("6\" x 9\"", InkPaper::BwWhite, "99999999999"));
        assert_eq!(findings.len(), 1);
        assert!(findings[0].severity.is_error());
        assert!(findings[0].message.contains("beyond the page limits"));
        assert!(!findings[0].message.contains("whole number"));
    }

    #[test]
    fn test_valid_paperback() {
        let findings = PrintSetupRules::new().evaluate(&paperback("6\" x 9\"", InkPaper::BwCream, "320"));
        assert!(errors(&findings).is_empty());
        assert!(findings.iter().any(|f| f.field == "page_count" && f.severity == Severity::Pass));
        assert!(findings.iter().any(|f| f.message.contains("6.000\" W x 9.000\" H")));
        assert!(findings.iter().any(|f| f.message.contains("0.625\"")));
    }

    #[test]
    fn test_page_count_out_of_range() {
        let findings = PrintSetupRules::new().evaluate(&paperback("6\" x 9\"", InkPaper::StandardColorWhite, "40"));
        let errs = errors(&findings);
        assert_eq!(errs.len(), 1);
        assert!(errs[0].message.contains("72-600"));
    }

    #[test]
    fn test_a4_standard_color_not_available() {
        let findings =
            PrintSetupRules::new().evaluate(&paperback("8.27\" x 11.69\" (A4)", InkPaper::StandardColorWhite, "100"));
        assert!(findings.iter().any(|f| f.field == "ink_paper" && f.message.contains("not available")));
    }

    #[test]
    fn test_hardcover_rules() {
        let mut record = paperback("6\" x 9\"", InkPaper::StandardColorWhite, "100");
        record.book_format = BookFormat::Hardcover;
        let findings = PrintSetupRules::new().evaluate(&record);
        assert!(findings.iter().any(|f| f.field == "ink_paper" && f.severity.is_error()));
        assert!(findings
            .iter()
            .any(|f| f.field == "page_count" && f.severity.is_warning() && f.message.contains("Could not verify")));
        assert!(!findings.iter().any(|f| f.field == "page_count" && f.severity == Severity::Pass));

        record.ink_paper = Some(InkPaper::BwWhite);
        record.page_count = "60".to_string();
        let findings = PrintSetupRules::new().evaluate(&record);
        assert!(findings.iter().any(|f| f.message.contains("75-550")));
    }

    #[test]
    fn test_trim_not_offered_for_format() {
        let record = paperback("8.25\" x 11\"", InkPaper::BwWhite, "100");
        let findings = PrintSetupRules::new().evaluate(&record);
        assert!(findings.iter().any(|f| f.field == "trim_size" && f.message.contains("not offered")));
    }

    #[test]
    fn test_bleed_adds_allowance() {
        let mut record = paperback("8.5\" x 11\"", InkPaper::PremiumColorWhite, "120");
        record.interior_bleed = true;
        let findings = PrintSetupRules::new().evaluate(&record);
        assert!(findings.iter().any(|f| f.message.contains("8.625\" W x 11.250\" H")));
        assert!(findings.iter().any(|f| f.message.contains("0.375\"") && f.field == "margins"));
        assert!(findings.iter().any(|f| f.field == "interior_bleed"));
    }

    #[test]
    fn test_unknown_trim_warns() {
        let findings = PrintSetupRules::new().evaluate(&paperback("4\" x 6\"", InkPaper::BwWhite, "100"));
        assert!(findings
            .iter()
            .any(|f| f.field == "page_count" && f.severity.is_warning() && f.message.contains("Could not verify")));

        let findings = PrintSetupRules::new().evaluate(&paperback("pocket", InkPaper::BwWhite, "100"));
        assert!(findings.iter().any(|f| f.field == "trim_size" && f.severity.is_warning()));
    }
}
