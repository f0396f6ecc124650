//! AI content declaration (KDP Guideline 1).

use crate::record::{AiContentKind, BookRecord};
use crate::types::{Finding, Section};

use super::RuleSet;

const GUIDELINE: &str = "Guideline 1";

/// Checks the AI-generated content questionnaire for consistency.
pub struct AiDeclarationRules;

impl AiDeclarationRules {
    pub fn new() -> Self {
        Self
    }
}

impl Default for AiDeclarationRules {
    fn default() -> Self {
        Self::new()
    }
}

impl RuleSet for AiDeclarationRules {
    fn section(&self) -> Section {
        Section::AiDeclaration
    }

    fn evaluate(&self, record: &BookRecord) -> Vec<Finding> {
        if !record.ai_used {
            return vec![Finding::pass("ai_used", "No AI-generated content declared.")];
        }

        let mut findings = vec![Finding::info(
            "ai_used",
            "AI-generated content declared. Amazon records this; accuracy is your responsibility.",
        )
        .cite(GUIDELINE)];

        let answers = [
            (AiContentKind::Text, record.ai_text, "ai_text"),
            (AiContentKind::Images, record.ai_images, "ai_images"),
            (AiContentKind::Translation, record.ai_translation, "ai_translation"),
        ];

        for (kind, contribution, field) in answers.iter().filter(|(_, c, _)| !c.is_none()) {
            findings.push(Finding::info(
                *field,
                format!("{}: {}", kind.label(), contribution.describe(*kind)),
            ));
        }

        if answers.iter().all(|(_, c, _)| c.is_none()) {
            findings.push(
                Finding::warning(
                    "ai_used",
                    "AI use is declared, but text, images and translation are all set to 'None'. Update the details.",
                )
                .cite(GUIDELINE),
            );
        }

        findings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::AiContribution;
    use crate::types::Severity;

    #[test]
    fn test_not_used_passes() {
        let findings = AiDeclarationRules::new().evaluate(&BookRecord::default());
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].severity, Severity::Pass);
    }

    #[test]
    fn test_declared_without_details_warns() {
        let record = BookRecord { ai_used: true, ..Default::default() };
        let findings = AiDeclarationRules::new().evaluate(&record);
        assert_eq!(findings.len(), 2);
        assert!(findings[1].severity.is_warning());
    }

    #[test]
    fn test_declared_contributions_listed() {
        let record = BookRecord {
            ai_used: true,
            ai_text: AiContribution::PartialLightEdit,
            ai_images: AiContribution::WholeHeavyEdit,
            ..Default::default()
        };
        let findings = AiDeclarationRules::new().evaluate(&record);
        assert_eq!(findings.len(), 3);
        assert_eq!(findings[1].field, "ai_text");
        assert_eq!(findings[2].field, "ai_images");
        assert!(findings.iter().all(|f| f.severity == Severity::Info));
    }
}
