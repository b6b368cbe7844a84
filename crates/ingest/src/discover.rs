//! Discover — finding compressed logfiles in a directory.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

use crate::source::is_gzip;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogFile {
    pub name: String,
    pub path: PathBuf,
}

/// Regular `.gz` files directly inside `dir`, sorted by name.
pub fn identify_files(dir: &Path) -> io::Result<Vec<LogFile>> {
    let mut files = Vec::new();

    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if !entry.file_type()?.is_file() || !is_gzip(&path) {
            continue;
        }
        files.push(LogFile {
            name: entry.file_name().to_string_lossy().into_owned(),
            path,
        });
    }

    files.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(files)
}

/// Resolve a convert target: a 1-based number from the discovered listing,
/// or a path to an existing file.
pub fn resolve_target(dir: &Path, target: &str) -> Result<PathBuf> {
    if let Ok(n) = target.parse::<usize>() {
        let files = identify_files(dir)
            .with_context(|| format!("Failed to scan {}", dir.display()))?;
        if files.is_empty() {
            bail!("No logfiles (*.gz) detected in {}", dir.display());
        }
        return match n.checked_sub(1).and_then(|i| files.get(i)) {
            Some(file) => Ok(file.path.clone()),
            None => bail!("Logfile number {} is out of range (1-{})", n, files.len()),
        };
    }

    let path = PathBuf::from(target);
    if !path.is_file() {
        bail!("Logfile not found: {}", path.display());
    }
    Ok(path)
}
