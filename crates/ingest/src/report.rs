//! Report — human output on stdout.

use std::path::Path;

use engine::report::format_condensed;

use crate::discover::LogFile;

/// Shown for soft-skipped lines that had no type token at all.
const NO_TOKEN: &str = "<no type token>";

pub fn print_files(dir: &Path, files: &[LogFile]) {
    if files.is_empty() {
        println!("No logfiles (*.gz) detected in {}", dir.display());
        return;
    }
    println!("({}) logfiles detected:", files.len());
    for (i, file) in files.iter().enumerate() {
        println!("  {}: {}", i + 1, file.name);
    }
}

pub fn print_profiles<'a>(names: impl IntoIterator<Item = &'a str>) {
    println!("Custom Configs:");
    let mut any = false;
    for name in names {
        println!("  {}", name);
        any = true;
    }
    if !any {
        println!("  **None**");
    }
}

pub fn skip_lines(summary: &[(Option<&str>, usize)]) -> Vec<String> {
    let labelled: Vec<(&str, usize)> = summary
        .iter()
        .map(|(token, count)| (token.unwrap_or(NO_TOKEN), *count))
        .collect();
    format_condensed(&labelled)
}

pub fn print_skip_summary(summary: &[(Option<&str>, usize)]) {
    if summary.is_empty() {
        return;
    }
    println!(
        "The following logline types were present in this log and will be skipped (sorted by frequency):"
    );
    for line in skip_lines(summary) {
        println!("  {}", line);
    }
}

pub fn print_written(written: usize, database: &Path, table: &str) {
    println!("Wrote {} log records to {} -> {}", written, database.display(), table);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skip_lines_label_missing_token() {
        let lines = skip_lines(&[(Some("WARN"), 3), (None, 1)]);
        assert_eq!(lines, vec!["WARN -> (3)", "<no type token> -> (1)"]);
    }
}
