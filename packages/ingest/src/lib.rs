#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Library for importing listening-history exports into scrobble stores.
//!
//! [`import_scrobbles`] is the single entry point: it detects the export
//! format, settles which files and which write mode to use, then streams
//! the parser's outcomes through cleaning and timestamp assignment into
//! the store for that format.

pub mod interactive;
pub mod prompt;

use std::path::{Path, PathBuf};

use scrobble_clean::TextCleaner;
use scrobble_ingest_models::{BatchChoice, ImportSummary};
use scrobble_models::{
    Disposition, NormalizedScrobble, ParseOutcome, RawScrobble, SourceFormat, WriteMode,
};
use scrobble_source::batch::discover_batch;
use scrobble_source::detect::detect_format;
use scrobble_source::progress::ProgressCallback;
use scrobble_source::{ScrobbleParser, SourceError};
use scrobble_store::StoreError;
use scrobble_store::paths::store_path;
use scrobble_store::reader::read_store;
use scrobble_store::timestamps::{Assignment, TimestampAssigner};
use scrobble_store::writer::StoreWriter;

use crate::prompt::ImportPrompter;

/// A progress update is emitted every this many written records.
pub const PROGRESS_INTERVAL: u64 = 100;

/// Errors that abort an import.
///
/// Problems with individual entries never show up here; they are counted
/// in the [`ImportSummary`].
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    /// Reading the export failed.
    #[error(transparent)]
    Source(#[from] SourceError),

    /// Reading or writing the store failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The caller could not be asked for a decision.
    #[error("prompt failed: {0}")]
    Prompt(#[source] std::io::Error),

    /// The named input file does not exist.
    #[error("input file {} does not exist", .0.display())]
    MissingInput(PathBuf),
}

/// Everything an import needs besides the input path.
pub struct ImportContext<'a> {
    /// Directory holding the stores.
    pub store_dir: PathBuf,
    /// Answers overwrite/append and batch questions.
    pub prompter: &'a dyn ImportPrompter,
    /// Cleans artist and title strings.
    pub cleaner: &'a dyn TextCleaner,
    /// Receives progress updates.
    pub progress: &'a dyn ProgressCallback,
}

/// Imports the export at `input` into the store for its format.
///
/// Returns an all-zero summary without touching anything when `input` is
/// not a recognized export or the caller cancels. Records written before
/// a later error stay in the store.
///
/// # Errors
///
/// Returns [`ImportError`] if the input is missing, a prompt fails, or the
/// export or store cannot be read or written.
pub fn import_scrobbles(
    ctx: &ImportContext<'_>,
    input: &Path,
) -> Result<ImportSummary, ImportError> {
    let Some(format) = detect_format(input) else {
        log::warn!(
            "File {} could not be identified as a valid import source.",
            input.display()
        );
        return Ok(ImportSummary::default());
    };

    log::info!("Parsing {} as {} export", input.display(), format.label());

    if !input.is_file() {
        return Err(ImportError::MissingInput(input.to_path_buf()));
    }

    let files = resolve_batch(ctx.prompter, input, format)?;

    let store = store_path(&ctx.store_dir, format);
    let mode = if store.exists() {
        let decision = ctx
            .prompter
            .write_decision(format, &store)
            .map_err(ImportError::Prompt)?;
        let Some(mode) = decision.mode() else {
            log::info!("Import of {} cancelled", input.display());
            return Ok(ImportSummary::default());
        };
        mode
    } else {
        WriteMode::Overwrite
    };

    let mut assigner = match mode {
        WriteMode::Overwrite => TimestampAssigner::new(),
        WriteMode::Append => TimestampAssigner::with_existing(read_store(&store)?),
    };

    let parser = ScrobbleParser::open(format, files)?;
    let mut writer = StoreWriter::open(&store, mode)?;

    let summary = merge_into_store(
        parser,
        &mut assigner,
        &mut writer,
        ctx.cleaner,
        ctx.progress,
    )?;
    writer.finish()?;

    log::info!("{}: {summary}", store.display());
    ctx.progress.finish(format!("{} export: {summary}", format.label()));

    Ok(summary)
}

/// Settles which files of a batch to parse.
fn resolve_batch(
    prompter: &dyn ImportPrompter,
    input: &Path,
    format: SourceFormat,
) -> Result<Vec<PathBuf>, ImportError> {
    let candidates = discover_batch(input, format)?;
    if candidates.len() <= 1 {
        return Ok(candidates);
    }

    log::info!(
        "{} files should all be imported together to identify duplicates across the whole dataset.",
        format.label()
    );

    match prompter
        .batch_choice(input, &candidates)
        .map_err(ImportError::Prompt)?
    {
        BatchChoice::All => Ok(candidates),
        BatchChoice::Single => Ok(vec![input.to_path_buf()]),
    }
}

/// Cleans a raw record's artist and title.
#[must_use]
pub fn normalize(raw: RawScrobble, cleaner: &dyn TextCleaner) -> NormalizedScrobble {
    let (artists, title) = cleaner.clean(&raw.artist_string, &raw.title);
    NormalizedScrobble {
        timestamp: raw.timestamp,
        artists,
        title,
        album: raw.album,
        duration: raw.duration,
    }
}

/// Drives `outcomes` to completion, writing every accepted record.
///
/// Accepted records are cleaned, then given a store-unique timestamp.
/// A record found to be already in the store counts as a skip.
///
/// # Errors
///
/// Returns [`StoreError`] if a write fails.
pub fn merge_into_store(
    outcomes: impl Iterator<Item = ParseOutcome>,
    assigner: &mut TimestampAssigner,
    writer: &mut StoreWriter,
    cleaner: &dyn TextCleaner,
    progress: &dyn ProgressCallback,
) -> Result<ImportSummary, StoreError> {
    let mut summary = ImportSummary::default();

    for outcome in outcomes {
        let disposition = outcome.disposition();
        let raw = match outcome.into_scrobble() {
            Some(raw) if disposition.is_accepted() => raw,
            _ => {
                summary.record(disposition);
                continue;
            }
        };

        let mut scrobble = normalize(raw, cleaner);
        match assigner.assign(scrobble.timestamp, &scrobble.artists, &scrobble.title) {
            Assignment::AlreadyStored(timestamp) => {
                log::debug!(
                    "{} - {} is already stored at {timestamp}, skipping...",
                    scrobble.artists.join(", "),
                    scrobble.title
                );
                summary.record(Disposition::Skip);
            }
            Assignment::Unique(timestamp) => {
                scrobble.timestamp = timestamp;
                writer.write(&scrobble)?;
                summary.record(disposition);
                progress.inc(1);

                if summary.success % PROGRESS_INTERVAL == 0 {
                    log::info!("Imported {} scrobbles...", summary.success);
                    progress.set_message(format!("Imported {} scrobbles...", summary.success));
                }
            }
        }
    }

    Ok(summary)
}
