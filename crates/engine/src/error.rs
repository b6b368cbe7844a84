use std::path::PathBuf;
use thiserror::Error;

/// Fatal configuration problems. Any of these aborts a run before the
/// first line is read.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read parser config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed parser config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Config is missing the \"default\" profile")]
    MissingDefaultProfile,

    #[error("Config is missing default parameters (profiles.default.default.fields)")]
    MissingBaseline,

    #[error("Unknown profile: {0}")]
    UnknownProfile(String),

    #[error("No type detection rule: set `type_token` or a baseline `type` field")]
    MissingTypeRule,

    #[error("Type '{alias}' in the default profile has no pattern")]
    MissingPattern { alias: String },

    #[error("Type '{alias}' uses the reserved pattern \"default\"")]
    ReservedPattern { alias: String },
}
