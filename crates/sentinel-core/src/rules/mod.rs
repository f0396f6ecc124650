//! Rule sets for book metadata validation.
//!
//! Each rule set owns one report section and evaluates the whole record
//! independently. Rule sets never see each other's findings; the
//! synthesizer collects them in section order.
//!
//! | Rule set | Section | Checks |
//! |----------|---------|--------|
//! | [`CoreDetailsRules`] | Core details | title, author, cover text, language & format |
//! | [`DiscoverabilityRules`] | Discoverability | description HTML, categories, keywords, series |
//! | [`AudienceRules`] | Audience | reading age, ISBN, low content, translation, public domain |
//! | [`AiDeclarationRules`] | AI declaration | AI-generated content questionnaire |
//! | [`PrintSetupRules`] | Print setup | trim, ink, page limits, page size, margins |

mod ai_declaration;
mod audience;
mod core_details;
mod discoverability;
pub mod patterns;
mod print_setup;

pub use ai_declaration::AiDeclarationRules;
pub use audience::AudienceRules;
pub use core_details::CoreDetailsRules;
pub use discoverability::DiscoverabilityRules;
pub use print_setup::PrintSetupRules;

use crate::record::BookRecord;
use crate::types::{Finding, Section};

/// A group of related checks producing findings for one report section.
pub trait RuleSet: Send + Sync {
    /// The section this rule set reports into.
    fn section(&self) -> Section;

    /// Run every check against the record.
    ///
    /// Must be deterministic: the same record always yields the same findings
    /// in the same order.
    fn evaluate(&self, record: &BookRecord) -> Vec<Finding>;
}

/// All rule sets in report order.
pub fn default_rule_sets() -> Vec<Box<dyn RuleSet>> {
    vec![
        Box::new(CoreDetailsRules::new()),
        Box::new(DiscoverabilityRules::new()),
        Box::new(AudienceRules::new()),
        Box::new(AiDeclarationRules::new()),
        Box::new(PrintSetupRules::new()),
    ]
}
