#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CLI entry point for the scrobble import tool.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use scrobble_clean::StandardCleaner;
use scrobble_cli_utils::IndicatifProgress;
use scrobble_ingest::prompt::DialoguerPrompter;
use scrobble_ingest::{ImportContext, import_scrobbles};
use scrobble_ingest_models::{BatchChoice, ImportSummary, WriteDecision};
use scrobble_models::WriteMode;
use scrobble_store::paths::resolve_store_dir;

#[derive(Parser)]
#[command(name = "scrobble_ingest", about = "Listening history import tool")]
struct Cli {
    /// Directory holding the scrobble stores (overrides `SCROBBLE_STORE_DIR`)
    #[arg(long, global = true)]
    store_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Import one or more export files
    Import {
        /// Export files (Last.fm `.csv`, `endsong_N.json`, `StreamingHistoryN.json`)
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// What to do when the store already exists: `overwrite` or `append`.
        /// Asks interactively if not given.
        #[arg(long)]
        mode: Option<WriteMode>,
        /// Whether to import the whole Spotify export (`all`) or only the
        /// named file (`single`). Asks interactively if not given.
        #[arg(long)]
        batch: Option<BatchChoice>,
    },
    /// List supported export formats and their stores
    Formats,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let multi = scrobble_cli_utils::init_logger();
    let cli = Cli::parse();
    let store_dir = resolve_store_dir(cli.store_dir);

    let Some(command) = cli.command else {
        return scrobble_ingest::interactive::run(&multi, &store_dir);
    };

    match command {
        Commands::Formats => scrobble_ingest::interactive::list_formats(&store_dir),
        Commands::Import { files, mode, batch } => {
            let prompter = DialoguerPrompter::new()
                .with_write_decision(mode.map(WriteDecision::from))
                .with_batch_choice(batch);
            let cleaner = StandardCleaner::new();
            let progress = IndicatifProgress::records_spinner(&multi, "Importing scrobbles");
            let ctx = ImportContext {
                store_dir,
                prompter: &prompter,
                cleaner: &cleaner,
                progress: &progress,
            };

            let mut total = ImportSummary::default();
            for file in &files {
                total += import_scrobbles(&ctx, file)?;
            }

            println!("{total}");
        }
    }

    Ok(())
}
