//! Book metadata records.
//!
//! A record is the flat set of fields an author fills in on the KDP setup
//! pages. It is loaded from JSON or YAML, checked against a JSON Schema and
//! exported again as pretty JSON.

mod options;
mod parser;
mod schema;

pub use options::{AiContentKind, AiContribution, BookFormat, InkPaper, UploadFormat};
pub use parser::{BookRecord, RecordError, CATEGORY_SLOTS, KEYWORD_SLOTS};
pub use schema::validate_record_schema;
