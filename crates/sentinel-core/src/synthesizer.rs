//! Synthesizer: collects rule set findings into a validation report.
//!
//! Sections appear in rule set order. A section whose rule set produced
//! nothing gets a single PASS so every section is visible in the report.
//! Readiness is derived from the error and warning totals only.

use chrono::Utc;

use crate::record::BookRecord;
use crate::rules::{default_rule_sets, RuleSet};
use crate::types::{Finding, Readiness, SectionReport, Severity, ValidationReport};

pub struct Synthesizer {
    rule_sets: Vec<Box<dyn RuleSet>>,
}

impl Synthesizer {
    /// Synthesizer over every built-in rule set.
    pub fn new() -> Self {
        Self {
            rule_sets: default_rule_sets(),
        }
    }

    /// Synthesizer over a custom list of rule sets.
    pub fn with_rule_sets(rule_sets: Vec<Box<dyn RuleSet>>) -> Self {
        Self { rule_sets }
    }

    pub fn validate(&self, record: &BookRecord) -> ValidationReport {
        let sections: Vec<SectionReport> = self
            .rule_sets
            .iter()
            .map(|rules| {
                let mut findings = rules.evaluate(record);
                if findings.is_empty() {
                    findings.push(Finding::pass("section", "All checks passed."));
                }
                SectionReport {
                    section: rules.section(),
                    findings,
                }
            })
            .collect();

        let error_count = sections.iter().map(|s| s.count(Severity::Error)).sum();
        let warning_count = sections.iter().map(|s| s.count(Severity::Warning)).sum();
        let readiness = Readiness::assess(error_count, warning_count);

        tracing::debug!(
            sections = sections.len(),
            errors = error_count,
            warnings = warning_count,
            readiness = ?readiness,
            "record validated"
        );

        ValidationReport {
            sections,
            error_count,
            warning_count,
            readiness,
            evaluated_at: Utc::now(),
        }
    }
}

impl Default for Synthesizer {
    fn default() -> Self {
        Self::new()
    }
}
