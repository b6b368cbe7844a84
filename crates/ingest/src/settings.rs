use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::cli::{Cli, Commands};

/// Database file used when neither settings nor the parser document name one.
const FALLBACK_DATABASE: &str = "logs.db";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    pub parser: ParserSettings,
    pub storage: StorageSettings,
    pub logging: LoggingSettings,
    /// Directory searched for `.gz` logfiles
    pub search_dir: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ParserSettings {
    /// Layered parser document (profiles, type patterns, field rules)
    pub path: String,
    pub profile: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageSettings {
    /// SQLite file. Falls back to `<db_name>.db` from the parser document.
    pub database: Option<String>,
    pub table: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingSettings {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    Pretty,
}

impl Settings {
    /// Load settings from defaults, an optional settings file and the
    /// environment (`INGEST_STORAGE__TABLE=...`), in increasing priority.
    ///
    /// Without an explicit file, `ingest.toml` and `config/ingest.toml`
    /// are tried and may be absent.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        dotenvy::dotenv().ok();

        let defaults = config::Config::try_from(&Settings::default())
            .context("Failed to serialize default settings")?;

        let mut builder = config::Config::builder().add_source(defaults);

        match explicit {
            Some(path) => {
                builder = builder.add_source(config::File::from(path).required(true));
            }
            None => {
                for path in ["ingest", "config/ingest"] {
                    builder = builder.add_source(config::File::with_name(path).required(false));
                }
            }
        }

        builder = builder.add_source(
            config::Environment::with_prefix("INGEST")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        builder
            .build()
            .context("Failed to build settings")?
            .try_deserialize()
            .context("Failed to deserialize settings")
    }

    /// CLI flags override everything else.
    pub fn apply_cli(&mut self, cli: &Cli) {
        if let Some(parser) = &cli.parser {
            self.parser.path = parser.clone();
        }
        if let Some(dir) = &cli.dir {
            self.search_dir = dir.clone();
        }
        if let Commands::Convert { profile, table, database, .. } = &cli.cmd {
            if let Some(profile) = profile {
                self.parser.profile = profile.clone();
            }
            if let Some(table) = table {
                self.storage.table = table.clone();
            }
            if let Some(database) = database {
                self.storage.database = Some(database.clone());
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.parser.path.is_empty() {
            anyhow::bail!("parser.path must not be empty");
        }
        if self.parser.profile.is_empty() {
            anyhow::bail!("parser.profile must not be empty");
        }
        crate::store::validate_table_name(&self.storage.table)?;
        Ok(())
    }

    /// Target database: explicit setting, then `<db_name>.db`, then the fallback.
    pub fn database_path(&self, db_name: Option<&str>) -> PathBuf {
        self.storage
            .database
            .as_ref()
            .map(PathBuf::from)
            .or_else(|| db_name.map(|name| PathBuf::from(format!("{}.db", name))))
            .unwrap_or_else(|| PathBuf::from(FALLBACK_DATABASE))
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            parser: ParserSettings {
                path: "soups.toml".to_string(),
                profile: "default".to_string(),
            },
            storage: StorageSettings {
                database: None,
                table: "logs".to_string(),
            },
            logging: LoggingSettings {
                level: "warn,ingest=info,engine=info".to_string(),
                format: LogFormat::Pretty,
            },
            search_dir: ".".to_string(),
        }
    }
}
