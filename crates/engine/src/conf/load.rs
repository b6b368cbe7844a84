//! Load — reading the parser document from disk or text.

use std::fs;
use std::path::Path;
use std::str::FromStr;

use tracing::{debug, info};

use super::model::{ParserDocument, DEFAULT_PROFILE};
use crate::error::ConfigError;

impl ParserDocument {
    /// Load a parser document from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        info!("Loading parser config from: {}", path.display());

        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let doc: ParserDocument = contents.parse()?;

        debug!(
            profiles = doc.profiles.len(),
            "Parsed parser config from {}",
            path.display()
        );
        Ok(doc)
    }

    /// Non-default profile names, in document order.
    pub fn profile_names(&self) -> impl Iterator<Item = &str> {
        self.profiles
            .keys()
            .map(String::as_str)
            .filter(|name| *name != DEFAULT_PROFILE)
    }

    pub fn has_profile(&self, name: &str) -> bool {
        self.profiles.contains_key(name)
    }
}

impl FromStr for ParserDocument {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(toml::from_str(s)?)
    }
}
