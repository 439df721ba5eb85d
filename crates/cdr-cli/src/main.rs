//! cdr - search call detail records and play call recordings

mod cli;
mod commands;
mod config;
mod logging;
mod output;
mod service;

use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;

use cdr_db::CdrDb;
use cdr_recordings::RecordingIndex;

use cli::{Cli, Command};
use config::Settings;
use service::CdrService;

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);
    colored::control::set_override(cli.use_color());

    let settings = Settings::from_cli(&cli);
    tracing::debug!(?settings, "resolved settings");

    // Commands that only need the recording index (or nothing)
    match &cli.command {
        Command::Doctor => return commands::doctor::run(&cli, &settings),
        Command::Audio { uuid, output } => {
            let index = RecordingIndex::open(&settings.recordings_dir);
            return commands::audio::run(&cli, &index, uuid, output.as_deref());
        }
        Command::Watch { queue } => {
            let index = Arc::new(RecordingIndex::open(&settings.recordings_dir));
            return commands::watch::run(&cli, index, *queue);
        }
        _ => {}
    }

    let db = CdrDb::open(&settings.db_path)
        .with_context(|| format!("opening CDR database {}", settings.db_path.display()))?;
    let index = Arc::new(RecordingIndex::open(&settings.recordings_dir));
    let service = CdrService::new(db, index);

    match &cli.command {
        Command::Search { filters } => commands::search::run(&cli, &service, filters),
        Command::Show { id } => commands::show::run(&cli, &service, *id),
        Command::Stats { filters } => commands::stats::run(&cli, &service, filters),
        Command::Export { filters, output } => {
            commands::export::run(&cli, &service, filters, output.as_deref())
        }

        // All other commands handled above
        _ => unreachable!(),
    }
}
