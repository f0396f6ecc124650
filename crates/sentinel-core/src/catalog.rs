//! KDP reference tables.
//!
//! Trim sizes, page-count limits, language availability, term lists and
//! margin minimums used by the rule sets. Values follow the KDP help pages
//! the guideline numbers refer to.

use crate::record::{BookFormat, InkPaper};

// =========================================================================
// LIMITS
// =========================================================================

/// Title plus subtitle, in characters.
pub const MAX_TITLE_LENGTH: usize = 200;

/// Description, in characters, HTML included.
pub const MAX_DESCRIPTION_LENGTH: usize = 4000;

pub const MAX_CATEGORIES: usize = 3;
pub const MAX_KEYWORDS: usize = 7;

/// Keywords longer than this are probably phrases stuffed into one slot.
pub const MAX_KEYWORD_LENGTH: usize = 50;

/// Minimum page count for any print book.
pub const MIN_PRINT_PAGES: u32 = 24;

// =========================================================================
// TRIM SIZES & PAGE COUNTS
// =========================================================================

/// Page-count ranges per interior type. `None` means the combination is not offered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRanges {
    pub bw_white: Option<(u32, u32)>,
    pub bw_cream: Option<(u32, u32)>,
    pub standard_color_white: Option<(u32, u32)>,
    pub premium_color_white: Option<(u32, u32)>,
}

impl PageRanges {
    pub fn for_ink(&self, ink: InkPaper) -> Option<(u32, u32)> {
        match ink {
            InkPaper::BwWhite => self.bw_white,
            InkPaper::BwCream => self.bw_cream,
            InkPaper::StandardColorWhite => self.standard_color_white,
            InkPaper::PremiumColorWhite => self.premium_color_white,
        }
    }
}

/// A KDP trim size and the page ranges it supports per format.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrimSize {
    /// Form label, e.g. `6" x 9"`
    pub label: &'static str,
    pub width: f64,
    pub height: f64,
    pub paperback: Option<PageRanges>,
    pub hardcover: Option<PageRanges>,
}

impl TrimSize {
    pub fn ranges(&self, format: BookFormat) -> Option<&PageRanges> {
        match format {
            BookFormat::Paperback => self.paperback.as_ref(),
            BookFormat::Hardcover => self.hardcover.as_ref(),
            BookFormat::Ebook => None,
        }
    }

    pub fn offered_for(&self, format: BookFormat) -> bool {
        self.ranges(format).is_some()
    }
}

const REGULAR: PageRanges = PageRanges {
    bw_white: Some((24, 828)),
    bw_cream: Some((24, 776)),
    standard_color_white: Some((72, 600)),
    premium_color_white: Some((24, 828)),
};

const WIDE: PageRanges = PageRanges {
    bw_white: Some((24, 800)),
    bw_cream: Some((24, 750)),
    standard_color_white: Some((72, 600)),
    premium_color_white: Some((24, 800)),
};

const LARGE: PageRanges = PageRanges {
    bw_white: Some((24, 590)),
    bw_cream: Some((24, 550)),
    standard_color_white: Some((72, 600)),
    premium_color_white: Some((24, 590)),
};

const A4: PageRanges = PageRanges {
    bw_white: Some((24, 780)),
    bw_cream: Some((24, 730)),
    standard_color_white: None,
    premium_color_white: Some((24, 590)),
};

const CASE_LAMINATE: PageRanges = PageRanges {
    bw_white: Some((75, 550)),
    bw_cream: Some((75, 550)),
    standard_color_white: None,
    premium_color_white: Some((75, 550)),
};

const fn paperback(label: &'static str, width: f64, height: f64, ranges: PageRanges) -> TrimSize {
    TrimSize {
        label,
        width,
        height,
        paperback: Some(ranges),
        hardcover: None,
    }
}

const fn both(label: &'static str, width: f64, height: f64) -> TrimSize {
    TrimSize {
        label,
        width,
        height,
        paperback: Some(REGULAR),
        hardcover: Some(CASE_LAMINATE),
    }
}

/// Every trim size KDP offers for paperback or hardcover.
pub const TRIM_SIZES: &[TrimSize] = &[
    paperback("5\" x 8\"", 5.0, 8.0, REGULAR),
    paperback("5.06\" x 7.81\"", 5.06, 7.81, REGULAR),
    paperback("5.25\" x 8\"", 5.25, 8.0, REGULAR),
    both("5.5\" x 8.5\"", 5.5, 8.5),
    both("6\" x 9\"", 6.0, 9.0),
    both("6.14\" x 9.21\"", 6.14, 9.21),
    paperback("6.69\" x 9.61\"", 6.69, 9.61, REGULAR),
    both("7\" x 10\"", 7.0, 10.0),
    paperback("7.44\" x 9.69\"", 7.44, 9.69, REGULAR),
    paperback("7.5\" x 9.25\"", 7.5, 9.25, REGULAR),
    paperback("8\" x 10\"", 8.0, 10.0, REGULAR),
    paperback("8.25\" x 6\"", 8.25, 6.0, WIDE),
    paperback("8.25\" x 8.25\"", 8.25, 8.25, WIDE),
    paperback("8.5\" x 8.5\"", 8.5, 8.5, LARGE),
    paperback("8.5\" x 11\"", 8.5, 11.0, LARGE),
    paperback("8.27\" x 11.69\" (A4)", 8.27, 11.69, A4),
    TrimSize {
        label: "8.25\" x 11\"",
        width: 8.25,
        height: 11.0,
        paperback: None,
        hardcover: Some(CASE_LAMINATE),
    },
];

/// Trim sizes offered for a format, in form order.
pub fn trim_options(format: BookFormat) -> Vec<&'static TrimSize> {
    TRIM_SIZES.iter().filter(|t| t.offered_for(format)).collect()
}

/// Find the trim size with the given dimensions.
pub fn find_trim(width: f64, height: f64) -> Option<&'static TrimSize> {
    TRIM_SIZES
        .iter()
        .find(|t| (t.width - width).abs() < 0.005 && (t.height - height).abs() < 0.005)
}

// =========================================================================
// MARGINS
// =========================================================================

pub const OUTSIDE_MARGIN_NO_BLEED: f64 = 0.25;
pub const OUTSIDE_MARGIN_BLEED: f64 = 0.375;

/// Bleed adds this much to the page width.
pub const BLEED_WIDTH_ALLOWANCE: f64 = 0.125;
/// Bleed adds this much to the page height.
pub const BLEED_HEIGHT_ALLOWANCE: f64 = 0.25;

/// Inside (gutter) margin minimums by page count.
pub const INSIDE_MARGIN_TIERS: &[(u32, u32, f64)] = &[
    (24, 150, 0.375),
    (151, 300, 0.5),
    (301, 500, 0.625),
    (501, 700, 0.75),
    (701, 828, 0.875),
];

pub const HARDCOVER_PAGE_RANGE: (u32, u32) = (75, 550);
pub const HARDCOVER_INSIDE_MARGIN: f64 = 0.625;

/// Inside margin for a paperback page count.
pub fn inside_margin(pages: u32) -> Option<f64> {
    INSIDE_MARGIN_TIERS
        .iter()
        .find(|(low, high, _)| (*low..=*high).contains(&pages))
        .map(|(_, _, margin)| *margin)
}

// =========================================================================
// LANGUAGES
// =========================================================================

pub const SUPPORTED_LANGUAGES: &[&str] = &[
    "Afrikaans", "Alsatian", "Arabic", "Basque", "Bokmål Norwegian", "Breton", "Catalan",
    "Chinese (Traditional)", "Cornish", "Corsican", "Danish", "Dutch/Flemish", "Eastern Frisian",
    "English", "Finnish", "French", "Frisian", "Galician", "German", "Gujarati", "Hebrew", "Hindi",
    "Icelandic", "Irish", "Italian", "Japanese", "Latin", "Luxembourgish", "Malayalam", "Manx",
    "Marathi", "Northern Frisian", "Norwegian", "Nynorsk Norwegian", "Polish", "Portuguese",
    "Provençal", "Romansh", "Scots", "Scottish Gaelic", "Spanish", "Swedish", "Tamil", "Ukrainian",
    "Welsh", "Yiddish",
];

/// Languages KDP only publishes as eBooks.
pub const EBOOK_ONLY_LANGUAGES: &[&str] = &[
    "Arabic", "Chinese (Traditional)", "Gujarati", "Hindi", "Malayalam", "Marathi", "Tamil",
];

/// Languages KDP only publishes in print.
pub const PRINT_ONLY_LANGUAGES: &[&str] = &["Polish", "Latin", "Ukrainian"];

/// Languages accepted for PDF manuscript upload.
pub const PDF_UPLOAD_LANGUAGES: &[&str] = &[
    "English", "French", "German", "Italian", "Portuguese", "Spanish", "Catalan", "Galician",
    "Basque",
];

/// Case-insensitive equality over full Unicode case folding, not just ASCII.
pub fn eq_ignore_case(a: &str, b: &str) -> bool {
    a.chars().flat_map(char::to_lowercase).eq(b.chars().flat_map(char::to_lowercase))
}

fn contains_ignore_case(list: &[&str], language: &str) -> bool {
    let language = language.trim();
    list.iter().any(|l| eq_ignore_case(l, language))
}

pub fn is_supported_language(language: &str) -> bool {
    contains_ignore_case(SUPPORTED_LANGUAGES, language)
}

pub fn is_ebook_only(language: &str) -> bool {
    contains_ignore_case(EBOOK_ONLY_LANGUAGES, language)
}

pub fn is_print_only(language: &str) -> bool {
    contains_ignore_case(PRINT_ONLY_LANGUAGES, language)
}

pub fn allows_pdf_upload(language: &str) -> bool {
    contains_ignore_case(PDF_UPLOAD_LANGUAGES, language)
}

/// Map free text (e.g. a model answer) onto a supported language name.
///
/// Matches when either string contains the other, ignoring case.
pub fn match_language(candidate: &str) -> Option<&'static str> {
    let candidate = candidate.trim().to_lowercase();
    if candidate.is_empty() {
        return None;
    }
    SUPPORTED_LANGUAGES
        .iter()
        .find(|l| l.to_lowercase() == candidate)
        .or_else(|| {
            SUPPORTED_LANGUAGES.iter().find(|l| {
                let l = l.to_lowercase();
                l.contains(&candidate) || candidate.contains(&l)
            })
        })
        .copied()
}

// =========================================================================
// TERM LISTS
// =========================================================================

/// Terms that make a title look like advertising or a generic product.
pub const PROHIBITED_TITLE_TERMS: &[&str] = &[
    "free", "bestselling", "best seller", "best book", "sale", "discount", "notebook", "journal",
    "gifts", "books", "summary of", "study guide for", "analysis of",
];

/// Generic words tolerated once in titles longer than three words.
pub const DESCRIPTIVE_TITLE_TERMS: &[&str] = &["notebook", "journal", "gifts", "books"];

/// Values authors type when they do not have a title yet.
pub const TITLE_PLACEHOLDERS: &[&str] = &[
    "unknown", "n/a", "na", "blank", "none", "null", "not applicable", "untitled",
];

pub const PROHIBITED_KEYWORD_TERMS: &[&str] = &[
    "free", "bestselling", "on sale", "new", "available now", "kindle unlimited", "kdp select",
    "book", "ebook",
];

/// HTML tags allowed in the product description.
pub const SUPPORTED_DESCRIPTION_TAGS: &[&str] = &[
    "br", "p", "b", "em", "i", "u", "h4", "h5", "h6", "ol", "ul", "li",
];

/// Tags that must be opened and closed in pairs.
pub const PAIRED_DESCRIPTION_TAGS: &[&str] = &["b", "i", "em", "u", "p", "h4", "h5", "h6"];

/// Category words that indicate a children's audience.
pub const CHILDREN_CATEGORY_TERMS: &[&str] = &[
    "children", "kids", "juvenile", "baby", "toddler", "picture book", "early reader",
    "middle grade",
];

/// Category words that indicate a teen audience.
pub const TEEN_CATEGORY_TERMS: &[&str] = &["teen", "young adult", "ya"];

/// Phrases showing a public-domain edition adds something of its own.
pub const DIFFERENTIATION_PHRASES: &[&str] = &[
    "annotated", "annotations by", "illustrated by", "original illustrations",
    "new translation by", "critical edition", "introduction by", "foreword by", "commentary by",
    "scholarly analysis", "edited by", "with new research", "unique collection of",
];
