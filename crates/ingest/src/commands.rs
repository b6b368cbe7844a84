//! Commands — the work behind each CLI subcommand.

use std::path::Path;

use anyhow::{Context, Result};
use engine::{ParserDocument, RecordSink};
use tracing::info;

use crate::discover;
use crate::report;
use crate::settings::Settings;
use crate::source;
use crate::store::SqliteSink;

pub fn list_files(settings: &Settings) -> Result<()> {
    let dir = Path::new(&settings.search_dir);
    let files = discover::identify_files(dir)
        .with_context(|| format!("Failed to scan {}", dir.display()))?;
    report::print_files(dir, &files);
    Ok(())
}

pub fn list_profiles(settings: &Settings) -> Result<()> {
    let doc = ParserDocument::from_file(&settings.parser.path)?;
    report::print_profiles(doc.profile_names());
    Ok(())
}

/// Resolve the parse table, classify every line of the target, report the
/// skipped types and store the parsed records.
pub fn convert(settings: &Settings, target: &str) -> Result<()> {
    let doc = ParserDocument::from_file(&settings.parser.path)?;
    let table = engine::resolve(&doc, &settings.parser.profile)
        .with_context(|| format!("Failed to resolve profile '{}'", settings.parser.profile))?;

    let path = discover::resolve_target(Path::new(&settings.search_dir), target)?;
    let database = settings.database_path(doc.db_name.as_deref());
    info!(
        "Converting {} to {} -> {} (profile: {})",
        path.display(),
        database.display(),
        settings.storage.table,
        settings.parser.profile
    );

    let lines = source::open_lines(&path)?;
    let conversion = engine::convert(lines, &table)?;
    report::print_skip_summary(&conversion.skip_summary());

    let mut sink = SqliteSink::open(&database, &settings.storage.table)?;
    let written = sink.store(&conversion.records)?;
    report::print_written(written, &database, &settings.storage.table);
    Ok(())
}
