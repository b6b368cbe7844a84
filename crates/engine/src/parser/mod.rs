//! Line classification and field extraction
//!
//! - `model.rs`: field rules, type definitions, the parse table and records
//! - `extract.rs`: hard-skip / soft-skip / parsed classification of one line
//!
//! Recognition is an exact match of one positional token against the
//! table keys. Extraction selects tokens by index and slices them by
//! character position; it never fails a line because of a missing token.

pub mod model;
mod extract;

pub use extract::extract;
pub use model::{Classification, Field, FieldRule, FieldRules, LogRecord, ParseTable, TypeDefinition};

/// Leading timestamp format, the text before the first comma.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
