//! CLI argument parsing via `clap`.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "ingest",
    version,
    about = "Convert line-oriented logfiles into SQLite tables",
    long_about = "Classify each line of a logfile against a layered parser config and store the recognized lines as rows.\n\nSettings precedence: CLI > INGEST_* env > ingest.toml > defaults.",
    after_help = "Examples:\n  ingest files --dir /var/log/app\n  ingest profiles --parser soups.toml\n  ingest convert 1 --profile staging --table jimmy",
    arg_required_else_help = true
)]
pub struct Cli {
    #[arg(long, global = true, help = "Settings file (default: ingest.toml or config/ingest.toml)")]
    pub settings: Option<PathBuf>,
    #[arg(long, global = true, help = "Parser config with profiles and type patterns")]
    pub parser: Option<String>,
    #[arg(long, global = true, help = "Directory searched for *.gz logfiles")]
    pub dir: Option<String>,
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List logfiles in the search directory
    #[command(about = "List logfiles")]
    Files,
    /// List the non-default profiles of the parser config
    #[command(about = "List parser profiles")]
    Profiles,
    /// Convert one logfile into table rows
    #[command(
        about = "Convert a logfile",
        after_help = "TARGET is a number from `ingest files` or a path to a logfile."
    )]
    Convert {
        #[arg(help = "Logfile number or path")]
        target: String,
        #[arg(long, help = "Parser profile (default: default)")]
        profile: Option<String>,
        #[arg(long, help = "Target table name")]
        table: Option<String>,
        #[arg(long, help = "SQLite database file")]
        database: Option<String>,
    },
}
