//! Core types shared by the rule sets, the synthesizer and the runtime.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// How serious a finding is.
///
/// `Pass` records a check that ran and found nothing to fix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Info,
    Pass,
}

impl Severity {
    pub fn is_error(&self) -> bool {
        matches!(self, Severity::Error)
    }

    pub fn is_warning(&self) -> bool {
        matches!(self, Severity::Warning)
    }

    /// Short tag used in text reports.
    pub fn label(&self) -> &'static str {
        match self {
            Severity::Error => "ERROR",
            Severity::Warning => "WARNING",
            Severity::Info => "INFO",
            Severity::Pass => "PASS",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Report sections, in the order they are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    CoreDetails,
    Discoverability,
    Audience,
    AiDeclaration,
    PrintSetup,
}

impl Section {
    pub const ALL: [Section; 5] = [
        Section::CoreDetails,
        Section::Discoverability,
        Section::Audience,
        Section::AiDeclaration,
        Section::PrintSetup,
    ];

    /// Heading shown to the user.
    pub fn title(&self) -> &'static str {
        match self {
            Section::CoreDetails => "Core Book & Author Details",
            Section::Discoverability => "Description & Discoverability",
            Section::Audience => "Audience & Special Book Types",
            Section::AiDeclaration => "AI Content Declaration",
            Section::PrintSetup => "Print Book Setup",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// A single validation result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    pub severity: Severity,

    /// Record field (or field group) the finding is about
    pub field: String,

    pub message: String,

    /// KDP guideline the rule is derived from, e.g. "Guideline 11"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guideline: Option<String>,
}

impl Finding {
    pub fn new(severity: Severity, field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity,
            field: field.into(),
            message: message.into(),
            guideline: None,
        }
    }

    pub fn error(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(Severity::Error, field, message)
    }

    pub fn warning(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, field, message)
    }

    pub fn info(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(Severity::Info, field, message)
    }

    pub fn pass(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(Severity::Pass, field, message)
    }

    /// Attach a guideline reference.
    pub fn cite(mut self, guideline: impl Into<String>) -> Self {
        self.guideline = Some(guideline.into());
        self
    }
}

/// Findings for one report section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionReport {
    pub section: Section,
    pub findings: Vec<Finding>,
}

impl SectionReport {
    pub fn count(&self, severity: Severity) -> usize {
        self.findings.iter().filter(|f| f.severity == severity).count()
    }
}

/// Overall publishing readiness derived from error and warning counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Readiness {
    HighRisk,
    ModerateRisk,
    LowRisk,
    LookingGood,
}

impl Readiness {
    /// Errors dominate; more than five warnings is moderate risk.
    pub fn assess(errors: usize, warnings: usize) -> Self {
        if errors > 0 {
            Readiness::HighRisk
        } else if warnings > 5 {
            Readiness::ModerateRisk
        } else if warnings > 0 {
            Readiness::LowRisk
        } else {
            Readiness::LookingGood
        }
    }

    pub fn headline(&self) -> &'static str {
        match self {
            Readiness::HighRisk => "High Risk: critical errors must be fixed before publishing",
            Readiness::ModerateRisk => "Moderate: several warnings need review",
            Readiness::LowRisk => "Low Risk: a few warnings to review",
            Readiness::LookingGood => "Looking Good: no errors or warnings found",
        }
    }
}

impl fmt::Display for Readiness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.headline())
    }
}

/// Result of running every rule set over a record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationReport {
    pub sections: Vec<SectionReport>,
    pub error_count: usize,
    pub warning_count: usize,
    pub readiness: Readiness,
    pub evaluated_at: DateTime<Utc>,
}

impl ValidationReport {
    /// All findings in section order.
    pub fn findings(&self) -> impl Iterator<Item = &Finding> {
        self.sections.iter().flat_map(|s| s.findings.iter())
    }

    pub fn section(&self, section: Section) -> Option<&SectionReport> {
        self.sections.iter().find(|s| s.section == section)
    }

    pub fn has_errors(&self) -> bool {
        self.error_count > 0
    }
}
