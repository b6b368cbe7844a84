// Configuration-driven log line parsing engine.

// Configuration: document model, loading, profile resolution
pub mod conf;
pub mod error;

// Line classification and field extraction
pub mod parser;

// Whole-file conversion and skip reporting
pub mod convert;
pub mod report;

pub use conf::{resolve, ParserDocument};
pub use convert::{convert, Conversion, RecordSink};
pub use error::ConfigError;
pub use parser::{
    extract, Classification, Field, FieldRule, FieldRules, LogRecord, ParseTable, TypeDefinition,
};
pub use report::condense;
