//! Shared text patterns for the rule sets.
//!
//! Regexes are compiled once. Term matching uses a hand-written word
//! boundary check so term lists never have to be turned into regexes at
//! runtime.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Any HTML-looking tag.
    pub static ref HTML_TAG_PATTERN: Regex = Regex::new(r"<[^>]+>").unwrap();

    /// Text made only of punctuation and symbols.
    pub static ref PUNCTUATION_ONLY_PATTERN: Regex = Regex::new(r"^[^\w\s]+$").unwrap();

    /// Letters (Latin incl. accented and extended), digits, spaces, `.`, `'`, `-`.
    pub static ref AUTHOR_NAME_PATTERN: Regex =
        Regex::new(r"^[a-zA-Z0-9À-ÖØ-öø-ÿĀ-žḀ-ỿ\s.'-]+$").unwrap();

    /// Opening or closing tag in a description: group 1 is `/` for closing tags, group 2 the name.
    pub static ref DESCRIPTION_TAG_PATTERN: Regex = Regex::new(r"<(/?)(\w+)[^>]*>").unwrap();

    /// `< text`: whitespace right after an opening bracket.
    pub static ref SPACED_BRACKET_PATTERN: Regex = Regex::new(r"<\s+\w").unwrap();

    pub static ref DOUBLE_BRACKET_PATTERN: Regex = Regex::new(r"<<|>>").unwrap();

    pub static ref EMPTY_TAG_PATTERN: Regex = Regex::new(r"<>").unwrap();

    /// Trim size such as `6" x 9"`, `6x9` or `8.27 × 11.69`.
    pub static ref TRIM_DIMENSIONS_PATTERN: Regex =
        Regex::new(r#"(\d+(?:\.\d+)?)\s*"?\s*[xX×]\s*(\d+(?:\.\d+)?)"#).unwrap();
}

/// Whether `needle` occurs in `haystack` delimited by non-word characters.
///
/// Both arguments are expected to be lowercase already.
pub fn contains_word(haystack: &str, needle: &str) -> bool {
    if needle.is_empty() {
        return false;
    }

    haystack.match_indices(needle).any(|(start, matched)| {
        let end = start + matched.len();
        let before = haystack[..start].chars().next_back();
        let after = haystack[end..].chars().next();
        !before.is_some_and(is_word_char) && !after.is_some_and(is_word_char)
    })
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

pub fn contains_html(text: &str) -> bool {
    HTML_TAG_PATTERN.is_match(text)
}

pub fn is_punctuation_only(text: &str) -> bool {
    PUNCTUATION_ONLY_PATTERN.is_match(text)
}

/// Parse the width and height out of a trim size string.
pub fn parse_trim_dimensions(trim: &str) -> Option<(f64, f64)> {
    let caps = TRIM_DIMENSIONS_PATTERN.captures(trim)?;
    let width = caps.get(1)?.as_str().parse().ok()?;
    let height = caps.get(2)?.as_str().parse().ok()?;
    Some((width, height))
}

/// First `max` characters of `text`, with an ellipsis when cut.
pub fn preview(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max).collect();
        format!("{}...", cut)
    }
}
