//! Conf module — parser document model, loading, and profile resolution.

pub mod model;
pub mod load;
pub mod resolve;

pub use model::{FieldSpec, ParserDocument, Profile, RuleSpec, TypeEntry, DEFAULT_PROFILE};
pub use resolve::resolve;
