//! Enumerated choices offered by the KDP setup forms.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Publication format of the title being set up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BookFormat {
    #[default]
    #[serde(alias = "eBook", alias = "Ebook", alias = "kindle")]
    Ebook,
    #[serde(alias = "Paperback")]
    Paperback,
    #[serde(alias = "Hardcover")]
    Hardcover,
}

impl BookFormat {
    pub const ALL: [BookFormat; 3] = [BookFormat::Ebook, BookFormat::Paperback, BookFormat::Hardcover];

    pub fn is_print(&self) -> bool {
        !matches!(self, BookFormat::Ebook)
    }

    pub fn label(&self) -> &'static str {
        match self {
            BookFormat::Ebook => "eBook",
            BookFormat::Paperback => "Paperback",
            BookFormat::Hardcover => "Hardcover",
        }
    }
}

impl fmt::Display for BookFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Interior ink and paper combination for print books.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InkPaper {
    #[serde(alias = "Black & white interior with cream paper")]
    BwCream,
    #[serde(alias = "Black & white interior with white paper")]
    BwWhite,
    #[serde(
        alias = "std_color_white",
        alias = "Standard color interior with white paper"
    )]
    StandardColorWhite,
    #[serde(
        alias = "prem_color_white",
        alias = "Premium color interior with white paper"
    )]
    PremiumColorWhite,
}

impl InkPaper {
    pub const ALL: [InkPaper; 4] = [
        InkPaper::BwCream,
        InkPaper::BwWhite,
        InkPaper::StandardColorWhite,
        InkPaper::PremiumColorWhite,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            InkPaper::BwCream => "Black & white interior with cream paper",
            InkPaper::BwWhite => "Black & white interior with white paper",
            InkPaper::StandardColorWhite => "Standard color interior with white paper",
            InkPaper::PremiumColorWhite => "Premium color interior with white paper",
        }
    }

    /// Options shown for a print format. Hardcover has no standard color.
    pub fn options_for(format: BookFormat) -> Vec<InkPaper> {
        match format {
            BookFormat::Ebook => Vec::new(),
            BookFormat::Paperback => Self::ALL.to_vec(),
            BookFormat::Hardcover => Self::ALL
                .into_iter()
                .filter(|ink| *ink != InkPaper::StandardColorWhite)
                .collect(),
        }
    }
}

impl fmt::Display for InkPaper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Manuscript file format the author intends to upload to KDP.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UploadFormat {
    #[default]
    #[serde(alias = "Other")]
    Other,
    #[serde(alias = "PDF")]
    Pdf,
    #[serde(alias = "DOCX")]
    Docx,
    #[serde(alias = "EPUB")]
    Epub,
    #[serde(alias = "HTML")]
    Html,
    #[serde(alias = "TXT")]
    Txt,
}

impl UploadFormat {
    pub const ALL: [UploadFormat; 6] = [
        UploadFormat::Other,
        UploadFormat::Pdf,
        UploadFormat::Docx,
        UploadFormat::Epub,
        UploadFormat::Html,
        UploadFormat::Txt,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            UploadFormat::Other => "Other",
            UploadFormat::Pdf => "PDF",
            UploadFormat::Docx => "DOCX",
            UploadFormat::Epub => "EPUB",
            UploadFormat::Html => "HTML",
            UploadFormat::Txt => "TXT",
        }
    }
}

impl fmt::Display for UploadFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Which part of the book an AI declaration answer covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AiContentKind {
    Text,
    Images,
    Translation,
}

impl AiContentKind {
    pub fn label(&self) -> &'static str {
        match self {
            AiContentKind::Text => "Text",
            AiContentKind::Images => "Images",
            AiContentKind::Translation => "Translation",
        }
    }
}

/// Answer to one question of the KDP AI-generated content questionnaire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AiContribution {
    /// AI was only used as an assistant
    #[default]
    None,
    PartialLightEdit,
    PartialHeavyEdit,
    WholeLightEdit,
    WholeHeavyEdit,
}

impl AiContribution {
    pub const ALL: [AiContribution; 5] = [
        AiContribution::None,
        AiContribution::PartialLightEdit,
        AiContribution::PartialHeavyEdit,
        AiContribution::WholeLightEdit,
        AiContribution::WholeHeavyEdit,
    ];

    pub fn is_none(&self) -> bool {
        matches!(self, AiContribution::None)
    }

    /// Questionnaire wording for this answer.
    pub fn describe(&self, kind: AiContentKind) -> &'static str {
        use AiContentKind::*;
        use AiContribution::*;

        match (kind, self) {
            (Text, None) => "None (AI was only used for assistance like brainstorming or editing my own writing)",
            (Text, PartialLightEdit) => "Some sections created by AI, with minimal or no editing by you",
            (Text, PartialHeavyEdit) => "Some sections created by AI, with extensive editing by you",
            (Text, WholeLightEdit) => "Entire work created by AI, with minimal or no editing by you",
            (Text, WholeHeavyEdit) => "Entire work created by AI, with extensive editing by you",
            (Images, None) => "None (AI was only used for assistance like brainstorming or editing my own images)",
            (Images, PartialLightEdit) => "One or a few AI-generated images, with minimal or no editing by you",
            (Images, PartialHeavyEdit) => "One or a few AI-generated images, with extensive editing by you",
            (Images, WholeLightEdit) => "Many AI-generated images, with minimal or no editing by you",
            (Images, WholeHeavyEdit) => "Many AI-generated images, with extensive editing by you",
            (Translation, None) => "None (AI was only used for assistance like brainstorming or editing my own translations)",
            (Translation, PartialLightEdit) => "Some sections translated by AI, with minimal or no editing by you",
            (Translation, PartialHeavyEdit) => "Some sections translated by AI, with extensive editing by you",
            (Translation, WholeLightEdit) => "Entire work translated by AI, with minimal or no editing by you",
            (Translation, WholeHeavyEdit) => "Entire work translated by AI, with extensive editing by you",
        }
    }
}
