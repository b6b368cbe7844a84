use anyhow::{Context, Result};
use clap::Parser;
use tracing::debug;

use ingest::cli::{Cli, Commands};
use ingest::settings::Settings;
use ingest::{commands, logging};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut settings = Settings::load(cli.settings.as_deref())
        .context("Failed to load settings")?;

    settings.apply_cli(&cli);

    logging::init_logging(&settings.logging);
    settings.validate().context("Settings validation failed")?;
    debug!(?settings, "Effective settings");

    match &cli.cmd {
        Commands::Files => commands::list_files(&settings),
        Commands::Profiles => commands::list_profiles(&settings),
        Commands::Convert { target, .. } => commands::convert(&settings, target),
    }
}
