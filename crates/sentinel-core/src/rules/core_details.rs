//! Core book & author details.
//!
//! Title and subtitle content, author name, cover text consistency and
//! language/format availability (KDP Guidelines 2, 4, 7, 11, 12).

use crate::catalog::{
    self, eq_ignore_case, DESCRIPTIVE_TITLE_TERMS, MAX_TITLE_LENGTH, PDF_UPLOAD_LANGUAGES,
    PROHIBITED_TITLE_TERMS, TITLE_PLACEHOLDERS,
};
use crate::record::{BookFormat, BookRecord, InkPaper, UploadFormat};
use crate::types::{Finding, Section, Severity};

use super::patterns::{contains_html, contains_word, is_punctuation_only, AUTHOR_NAME_PATTERN};
use super::RuleSet;

const TITLE_GUIDELINE: &str = "Guideline 2, 7";
const AUTHOR_GUIDELINE: &str = "Guideline 7";
const COVER_GUIDELINE: &str = "Guideline 2, 4, 12";
const LANGUAGE_GUIDELINE: &str = "Guideline 11";

/// Title, author, cover text and language checks.
pub struct CoreDetailsRules;

impl CoreDetailsRules {
    pub fn new() -> Self {
        Self
    }

    fn check_author(&self, author: &str) -> Vec<Finding> {
        let author = author.trim();
        if author.is_empty() {
            return vec![Finding::error(
                "author",
                "Primary author name is missing. It is mandatory and cannot be changed after publishing.",
            )
            .cite(AUTHOR_GUIDELINE)];
        }

        let mut findings = Vec::new();
        if contains_html(author) {
            findings.push(Finding::error("author", "Contains HTML tags, which are not allowed.").cite(AUTHOR_GUIDELINE));
        }
        if !AUTHOR_NAME_PATTERN.is_match(author) {
            findings.push(
                Finding::warning(
                    "author",
                    "Contains characters beyond letters, numbers, spaces, periods, hyphens or apostrophes. Review it carefully.",
                )
                .cite(AUTHOR_GUIDELINE),
            );
        }
        if findings.is_empty() {
            findings.push(Finding::pass("author", "Basic checks passed."));
        }
        findings
    }

    fn check_cover_text(&self, record: &BookRecord) -> Vec<Finding> {
        let mut findings = Vec::new();
        let cover_title = record.title_on_cover.trim();
        let cover_author = record.author_on_cover.trim();
        let title = record.title.trim();
        let author = record.author.trim();

        if !title.is_empty() && !cover_title.is_empty() && !eq_ignore_case(cover_title, title) {
            findings.push(
                Finding::warning(
                    "title_on_cover",
                    format!(
                        "Cover title '{}' does not match metadata title '{}'. They must match.",
                        cover_title, title
                    ),
                )
                .cite(COVER_GUIDELINE),
            );
        }
        if !author.is_empty() && !cover_author.is_empty() && !eq_ignore_case(cover_author, author) {
            findings.push(
                Finding::warning(
                    "author_on_cover",
                    format!(
                        "Cover author '{}' does not match metadata author '{}'. They must match.",
                        cover_author, author
                    ),
                )
                .cite(COVER_GUIDELINE),
            );
        }

        if cover_title.is_empty() && !title.is_empty() {
            findings.push(Finding::info(
                "title_on_cover",
                format!("Metadata title '{}' provided, but no cover title was entered for comparison.", title),
            ));
        }
        if cover_author.is_empty() && !author.is_empty() {
            findings.push(Finding::info(
                "author_on_cover",
                format!("Metadata author '{}' provided, but no cover author was entered for comparison.", author),
            ));
        }

        let cover_entered = !cover_title.is_empty() || !cover_author.is_empty();
        let metadata_entered = !title.is_empty() || !author.is_empty();
        if findings.is_empty() && cover_entered && metadata_entered {
            findings.push(Finding::pass("cover_text", "Cover text is consistent with the metadata."));
        } else if !cover_entered {
            findings.push(Finding::info("cover_text", "No cover text entered for comparison."));
        }
        findings
    }

    fn check_language(&self, record: &BookRecord) -> Vec<Finding> {
        let language = record.language.trim();
        if language.is_empty() {
            return vec![Finding::error("language", "Book language is not selected. It is mandatory.").cite(LANGUAGE_GUIDELINE)];
        }

        let mut findings = Vec::new();
        let format = record.book_format;

        if !catalog::is_supported_language(language) {
            findings.push(
                Finding::warning(
                    "language",
                    format!("'{}' is not in the list of languages KDP supports. Check the spelling or pick a supported language.", language),
                )
                .cite(LANGUAGE_GUIDELINE),
            );
        }

        match format {
            BookFormat::Ebook => {
                if catalog::is_print_only(language) {
                    findings.push(
                        Finding::error(
                            "language",
                            format!("'{}' is supported for print formats (Paperback/Hardcover) only, not eBooks.", language),
                        )
                        .cite(LANGUAGE_GUIDELINE),
                    );
                } else if record.language_is("Hebrew") {
                    findings.push(
                        Finding::error("language", "Hebrew is available for Paperback only, not eBooks.")
                            .cite(LANGUAGE_GUIDELINE),
                    );
                } else if record.language_is("Japanese") {
                    findings.push(
                        Finding::warning(
                            "language",
                            "Japanese eBooks have specific reading direction settings in KDP. Make sure they are configured.",
                        )
                        .cite(LANGUAGE_GUIDELINE),
                    );
                }
            }
            BookFormat::Paperback | BookFormat::Hardcover => {
                if catalog::is_ebook_only(language) {
                    findings.push(
                        Finding::error(
                            "language",
                            format!("'{}' is supported for eBooks only, not for {}.", language, format),
                        )
                        .cite(LANGUAGE_GUIDELINE),
                    );
                }
                if record.language_is("Japanese") && format == BookFormat::Hardcover {
                    findings.push(
                        Finding::error("language", "Japanese is available for eBook and Paperback only, not Hardcover.")
                            .cite(LANGUAGE_GUIDELINE),
                    );
                }
                if record.language_is("Hebrew") {
                    if format != BookFormat::Paperback {
                        findings.push(
                            Finding::error("language", format!("Hebrew is available for Paperback only, not {}.", format))
                                .cite(LANGUAGE_GUIDELINE),
                        );
                    }
                    if record.ink_paper == Some(InkPaper::StandardColorWhite) {
                        findings.push(
                            Finding::error("ink_paper", "Hebrew paperbacks cannot use standard color ink. Choose black & white or premium color.")
                                .cite(LANGUAGE_GUIDELINE),
                        );
                    }
                }
                if record.language_is("Yiddish") && format == BookFormat::Hardcover {
                    findings.push(
                        Finding::info("language", "Yiddish hardcovers must be set up with left-to-right (LTR) reading direction.")
                            .cite(LANGUAGE_GUIDELINE),
                    );
                }

                if record.upload_format == UploadFormat::Pdf && !catalog::allows_pdf_upload(language) {
                    findings.push(
                        Finding::warning(
                            "upload_format",
                            format!(
                                "KDP only accepts PDF manuscripts for {}. Upload '{}' books as DOCX, EPUB or HTML instead.",
                                PDF_UPLOAD_LANGUAGES.join(", "),
                                language
                            ),
                        )
                        .cite(LANGUAGE_GUIDELINE),
                    );
                }
            }
        }

        if findings.is_empty() {
            findings.push(Finding::pass("language", "Language and format are compatible."));
        }
        findings
    }
}

impl Default for CoreDetailsRules {
    fn default() -> Self {
        Self::new()
    }
}

impl RuleSet for CoreDetailsRules {
    fn section(&self) -> Section {
        Section::CoreDetails
    }

    fn evaluate(&self, record: &BookRecord) -> Vec<Finding> {
        let mut findings = check_title(&record.title, &record.subtitle, "title", TITLE_GUIDELINE);
        findings.extend(self.check_author(&record.author));
        findings.extend(self.check_cover_text(record));
        findings.extend(self.check_language(record));
        findings
    }
}

/// Title rules, shared with the series name check.
///
/// `field` names the record field the findings are reported under.
pub(crate) fn check_title(title: &str, subtitle: &str, field: &str, guideline: &str) -> Vec<Finding> {
    let title = title.trim();
    let subtitle = subtitle.trim();

    if title.is_empty() {
        return vec![Finding::error(field, "Title is missing. It is mandatory.").cite(guideline)];
    }

    let mut findings = Vec::new();

    let length = title.chars().count() + subtitle.chars().count();
    if length > MAX_TITLE_LENGTH {
        findings.push(
            Finding::error(
                field,
                format!("Title and subtitle together are {} characters, over the {} character limit.", length, MAX_TITLE_LENGTH),
            )
            .cite(guideline),
        );
    }

    let combined = if subtitle.is_empty() {
        title.to_string()
    } else {
        format!("{} {}", title, subtitle)
    };

    for term in prohibited_title_terms(&combined) {
        findings.push(
            Finding::warning(field, format!("Contains potentially problematic term '{}'. Review KDP guidance on its use.", term))
                .cite(guideline),
        );
    }

    if contains_html(&combined) {
        findings.push(Finding::error(field, "Contains HTML tags, which are not allowed.").cite(guideline));
    }
    if is_punctuation_only(title) || (!subtitle.is_empty() && is_punctuation_only(subtitle)) {
        findings.push(Finding::error(field, "Consists only of punctuation.").cite(guideline));
    }
    if is_placeholder(title) || (!subtitle.is_empty() && is_placeholder(subtitle)) {
        findings.push(
            Finding::error(field, "Uses placeholder text such as 'unknown' or 'untitled'.").cite(guideline),
        );
    }

    if findings.is_empty() {
        findings.push(Finding::pass(field, "Basic checks passed."));
    }
    findings
}

/// Prohibited terms found in a title.
///
/// Phrases match anywhere; single words need word boundaries. Generic
/// product words are tolerated once in titles of more than three words.
fn prohibited_title_terms(text: &str) -> Vec<&'static str> {
    let lower = text.to_lowercase();
    let word_count = lower.split_whitespace().count();

    PROHIBITED_TITLE_TERMS
        .iter()
        .copied()
        .filter(|term| {
            if term.contains(' ') {
                lower.contains(term)
            } else {
                contains_word(&lower, term)
            }
        })
        .filter(|term| {
            let tolerated = DESCRIPTIVE_TITLE_TERMS.contains(term)
                && lower.matches(term).count() == 1
                && word_count > 3;
            !tolerated
        })
        .collect()
}

fn is_placeholder(text: &str) -> bool {
    let lower = text.trim().to_lowercase();
    TITLE_PLACEHOLDERS.contains(&lower.as_str())
}

/// Whether any finding needs attention.
pub(crate) fn has_issues(findings: &[Finding]) -> bool {
    findings
        .iter()
        .any(|f| matches!(f.severity, Severity::Error | Severity::Warning))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> BookRecord {
        BookRecord {
            title: "The Lighthouse Keeper".to_string(),
            author: "Mara Quinn".to_string(),
            ..Default::default()
        }
    }

    fn has(findings: &[Finding], severity: Severity, field: &str) -> bool {
        findings.iter().any(|f| f.severity == severity && f.field == field)
    }

    #[test]
    fn test_missing_title_is_error() {
        let findings = check_title("", "", "title", TITLE_GUIDELINE);
        assert_eq!(findings.len(), 1);
        assert!(findings[0].severity.is_error());
    }

    #[test]
    fn test_clean_title_passes() {
        let findings = check_title("The Lighthouse Keeper", "A Novel", "title", TITLE_GUIDELINE);
        assert_eq!(findings, vec![Finding::pass("title", "Basic checks passed.")]);
    }

    #[test]
    fn test_title_too_long() {
        let title = "a".repeat(150);
        let subtitle = "b".repeat(51);
        let findings = check_title(&title, &subtitle, "title", TITLE_GUIDELINE);
        assert!(findings.iter().any(|f| f.severity.is_error() && f.message.contains("201")));
    }

    #[test]
    fn test_prohibited_terms_warn() {
        let findings = check_title("Free Bestselling Recipes", "", "title", TITLE_GUIDELINE);
        let warnings: Vec<_> = findings.iter().filter(|f| f.severity.is_warning()).collect();
        assert_eq!(warnings.len(), 2);
    }

    #[test]
    fn test_freedom_is_not_free() {
        let findings = check_title("Road to Freedom", "", "title", TITLE_GUIDELINE);
        assert!(!has(&findings, Severity::Warning, "title"));
    }

    #[test]
    fn test_descriptive_term_tolerated_in_long_title() {
        let long = check_title("My Grandmother's Garden Journal", "", "title", TITLE_GUIDELINE);
        assert!(!has(&long, Severity::Warning, "title"));

        let short = check_title("Garden Journal", "", "title", TITLE_GUIDELINE);
        assert!(has(&short, Severity::Warning, "title"));
    }

    #[test]
    fn test_phrase_matches_as_substring() {
        let findings = check_title("Summary of Moby Dick", "", "title", TITLE_GUIDELINE);
        assert!(findings.iter().any(|f| f.message.contains("summary of")));
    }

    #[test]
    fn test_html_punctuation_placeholder() {
        assert!(has(&check_title("<b>Bold</b>", "", "title", TITLE_GUIDELINE), Severity::Error, "title"));
        assert!(has(&check_title("???", "", "title", TITLE_GUIDELINE), Severity::Error, "title"));
        assert!(has(&check_title("Untitled", "", "title", TITLE_GUIDELINE), Severity::Error, "title"));
        assert!(has(&check_title("Real Title", "N/A", "title", TITLE_GUIDELINE), Severity::Error, "title"));
    }

    #[test]
    fn test_author_checks() {
        let rules = CoreDetailsRules::new();
        assert!(has(&rules.check_author(""), Severity::Error, "author"));
        assert!(has(&rules.check_author("Zoë Ångström"), Severity::Pass, "author"));
        assert!(has(&rules.check_author("DJ #1"), Severity::Warning, "author"));
        assert!(has(&rules.check_author("<i>Ann</i>"), Severity::Error, "author"));
    }

    #[test]
    fn test_cover_mismatch_warns() {
        let rules = CoreDetailsRules::new();
        let mut r = record();
        r.title_on_cover = "The Lighthouse".to_string();
        r.author_on_cover = "mara quinn".to_string();
        let findings = rules.check_cover_text(&r);
        assert!(has(&findings, Severity::Warning, "title_on_cover"));
        assert!(!has(&findings, Severity::Warning, "author_on_cover"));
    }

    #[test]
    fn test_cover_match_passes() {
        let rules = CoreDetailsRules::new();
        let mut r = record();
        r.title_on_cover = " the lighthouse keeper ".to_string();
        r.author_on_cover = "Mara Quinn".to_string();
        let findings = rules.check_cover_text(&r);
        assert_eq!(findings.len(), 1);
        assert!(has(&findings, Severity::Pass, "cover_text"));
    }

    #[test]
    fn test_cover_match_folds_non_ascii_case() {
        let rules = CoreDetailsRules::new();
        let mut r = record();
        r.title = "Élan in Åre".to_string();
        r.author = "Zoë Åberg".to_string();
        r.title_on_cover = "ÉLAN IN ÅRE".to_string();
        r.author_on_cover = "ZOË ÅBERG".to_string();
        let findings = rules.check_cover_text(&r);
        assert!(!has(&findings, Severity::Warning, "title_on_cover"));
        assert!(!has(&findings, Severity::Warning, "author_on_cover"));
        assert!(has(&findings, Severity::Pass, "cover_text"));
    }

    #[test]
    fn test_cover_not_entered_is_info() {
        let rules = CoreDetailsRules::new();
        let findings = rules.check_cover_text(&record());
        assert_eq!(findings.len(), 3);
        assert!(findings.iter().all(|f| f.severity == Severity::Info));
    }

    #[test]
    fn test_language_format_conflicts() {
        let rules = CoreDetailsRules::new();

        let mut r = record();
        r.language = "Polish".to_string();
        assert!(has(&rules.check_language(&r), Severity::Error, "language"));

        r.language = "Hindi".to_string();
        r.book_format = BookFormat::Paperback;
        assert!(has(&rules.check_language(&r), Severity::Error, "language"));

        r.language = "Japanese".to_string();
        r.book_format = BookFormat::Hardcover;
        assert!(has(&rules.check_language(&r), Severity::Error, "language"));

        r.language = "Hebrew".to_string();
        r.book_format = BookFormat::Paperback;
        r.ink_paper = Some(InkPaper::StandardColorWhite);
        assert!(has(&rules.check_language(&r), Severity::Error, "ink_paper"));
    }

    #[test]
    fn test_japanese_ebook_warns() {
        let rules = CoreDetailsRules::new();
        let mut r = record();
        r.language = "Japanese".to_string();
        let findings = rules.check_language(&r);
        assert!(has(&findings, Severity::Warning, "language"));
    }

    #[test]
    fn test_yiddish_hardcover_note() {
        let rules = CoreDetailsRules::new();
        let mut r = record();
        r.language = "Yiddish".to_string();
        r.book_format = BookFormat::Hardcover;
        assert!(has(&rules.check_language(&r), Severity::Info, "language"));
    }

    #[test]
    fn test_pdf_upload_language() {
        let rules = CoreDetailsRules::new();
        let mut r = record();
        r.language = "Dutch/Flemish".to_string();
        r.book_format = BookFormat::Paperback;
        r.upload_format = UploadFormat::Pdf;
        assert!(has(&rules.check_language(&r), Severity::Warning, "upload_format"));

        r.language = "German".to_string();
        assert!(has(&rules.check_language(&r), Severity::Pass, "language"));
    }

    #[test]
    fn test_missing_and_unknown_language() {
        let rules = CoreDetailsRules::new();
        let mut r = record();
        r.language = String::new();
        assert!(has(&rules.check_language(&r), Severity::Error, "language"));

        r.language = "Klingon".to_string();
        assert!(has(&rules.check_language(&r), Severity::Warning, "language"));
    }

    #[test]
    fn test_has_issues() {
        assert!(!has_issues(&[Finding::pass("x", "ok"), Finding::info("x", "fyi")]));
        assert!(has_issues(&[Finding::warning("x", "hmm")]));
    }
}
