//! Text rendering of reports and reference tables.

use serde::Serialize;

use sentinel_core::catalog::{self, SUPPORTED_LANGUAGES};
use sentinel_core::{BookFormat, BookRecord, InkPaper, UploadFormat};
use sentinel_runtime::{AiReport, FeedbackKind, SessionReport};

const RULE: &str = "------------------------------------------------------------";

/// Human-readable session report.
pub fn session_text(session: &SessionReport, record: &BookRecord) -> String {
    let mut out = String::new();
    let title = if record.title.trim().is_empty() {
        "(untitled)"
    } else {
        record.title.trim()
    };

    out.push_str(&format!("Sentinel report: {}\n{}\n", title, RULE));
    out.push_str(&format!("Readiness: {}\n", session.readiness.headline()));
    out.push_str(&format!(
        "Errors: {}  Warnings: {}",
        session.validation.error_count, session.validation.warning_count
    ));
    if let Some(ai) = &session.ai {
        out.push_str(&format!("  AI concerns: {}", ai.concern_count()));
    }
    out.push('\n');

    for section in &session.validation.sections {
        out.push_str(&format!("\n{}\n", section.section.title()));
        for finding in &section.findings {
            out.push_str(&format!("  [{}] {}: {}", finding.severity.label(), finding.field, finding.message));
            if let Some(guideline) = &finding.guideline {
                out.push_str(&format!(" ({})", guideline));
            }
            out.push('\n');
        }
    }

    if let Some(ai) = &session.ai {
        out.push_str(&ai_text(ai));
    }
    out
}

fn ai_text(ai: &AiReport) -> String {
    let mut out = format!("\n{}\nAI review\n{}\n", RULE, RULE);

    for section in &ai.sections {
        out.push_str(&format!("\n{}\n", section.section.title()));
        for feedback in &section.feedback {
            let tag = match feedback.kind {
                FeedbackKind::Analysis if feedback.is_concern() => "REVIEW",
                FeedbackKind::Analysis => "AI",
                FeedbackKind::Pass => "PASS",
                FeedbackKind::Warning => "WARNING",
                FeedbackKind::Note => "NOTE",
                FeedbackKind::Failure => "FAILED",
            };
            match &feedback.heading {
                Some(heading) => out.push_str(&format!("  [{}] {}: {}\n", tag, feedback.analysis.label(), heading)),
                None => out.push_str(&format!("  [{}] {}\n", tag, feedback.analysis.label())),
            }
            for line in feedback.text.lines() {
                out.push_str(&format!("      {}\n", line));
            }
        }
    }

    if !ai.skipped.is_empty() {
        out.push_str("\nNot run\n");
        for skipped in &ai.skipped {
            out.push_str(&format!("  {}: {}\n", skipped.analysis.label(), skipped.reason));
        }
    }

    out.push_str(&format!(
        "\nModel calls: {}  Cached: {}  Tokens: {}  Estimated cost: ${:.4}\n",
        ai.usage.llm_calls, ai.usage.cached_responses, ai.usage.total_tokens, ai.usage.estimated_cost
    ));
    out
}

/// Choices offered by the KDP setup forms.
#[derive(Debug, Serialize)]
pub struct FormOptions {
    pub formats: Vec<FormatOptions>,
    pub upload_formats: Vec<&'static str>,
    pub languages: Vec<&'static str>,
}

#[derive(Debug, Serialize)]
pub struct FormatOptions {
    pub format: &'static str,
    pub ink_paper: Vec<&'static str>,
    pub trim_sizes: Vec<&'static str>,
}

impl FormOptions {
    pub fn collect() -> Self {
        let formats = BookFormat::ALL
            .iter()
            .map(|&format| FormatOptions {
                format: format.label(),
                ink_paper: InkPaper::options_for(format).iter().map(InkPaper::label).collect(),
                trim_sizes: catalog::trim_options(format).iter().map(|t| t.label).collect(),
            })
            .collect();

        Self {
            formats,
            upload_formats: UploadFormat::ALL.iter().map(UploadFormat::label).collect(),
            languages: SUPPORTED_LANGUAGES.to_vec(),
        }
    }

    pub fn to_text(&self) -> String {
        let mut out = String::new();
        for format in &self.formats {
            out.push_str(&format!("{}\n", format.format));
            if format.ink_paper.is_empty() {
                out.push_str("  No print options\n");
                continue;
            }
            out.push_str("  Ink & paper:\n");
            for ink in &format.ink_paper {
                out.push_str(&format!("    {}\n", ink));
            }
            out.push_str("  Trim sizes:\n");
            out.push_str(&format!("    {}\n", format.trim_sizes.join(", ")));
        }
        out.push_str(&format!("\nUpload formats: {}\n", self.upload_formats.join(", ")));
        out.push_str(&format!("Languages: {}\n", self.languages.join(", ")));
        out
    }
}
