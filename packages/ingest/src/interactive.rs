#![allow(clippy::module_name_repetitions)]

//! Interactive menu for the scrobble import tool.
//!
//! Lets you run an import without remembering CLI flags: pick an action,
//! type a path, answer the overwrite/append and batch questions as they
//! come up.

use std::path::{Path, PathBuf};

use dialoguer::{Input, Select};
use scrobble_clean::StandardCleaner;
use scrobble_cli_utils::{IndicatifProgress, MultiProgress};
use scrobble_models::SourceFormat;
use scrobble_source::detect::file_name_pattern;
use scrobble_store::paths::store_path;

use crate::prompt::DialoguerPrompter;
use crate::{ImportContext, import_scrobbles};

/// Top-level actions available in the interactive menu.
enum ImportAction {
    ImportFile,
    ListFormats,
}

impl ImportAction {
    const ALL: &[Self] = &[Self::ImportFile, Self::ListFormats];

    #[must_use]
    const fn label(&self) -> &'static str {
        match self {
            Self::ImportFile => "Import an export file",
            Self::ListFormats => "List supported formats",
        }
    }
}

/// Runs the interactive menu.
///
/// # Errors
///
/// Returns an error if a prompt fails or the selected import fails.
pub fn run(multi: &MultiProgress, store_dir: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let labels: Vec<&str> = ImportAction::ALL.iter().map(ImportAction::label).collect();

    let idx = Select::new()
        .with_prompt("What would you like to do?")
        .items(&labels)
        .default(0)
        .interact()?;

    match ImportAction::ALL[idx] {
        ImportAction::ImportFile => import_file(multi, store_dir)?,
        ImportAction::ListFormats => list_formats(store_dir),
    }

    Ok(())
}

/// Prompts for a path and imports it, asking every question on the
/// terminal.
fn import_file(multi: &MultiProgress, store_dir: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let path: String = Input::new()
        .with_prompt("Path to the export file")
        .interact_text()?;

    let progress = IndicatifProgress::records_spinner(multi, "Importing scrobbles");
    let prompter = DialoguerPrompter::new();
    let cleaner = StandardCleaner::new();
    let ctx = ImportContext {
        store_dir: store_dir.to_path_buf(),
        prompter: &prompter,
        cleaner: &cleaner,
        progress: &progress,
    };

    let summary = import_scrobbles(&ctx, &PathBuf::from(path.trim()))?;
    println!("{summary}");

    Ok(())
}

/// Prints a table of the supported export formats.
pub fn list_formats(store_dir: &Path) {
    println!("{:<14} {:<36} STORE", "FORMAT", "FILE NAME");
    println!("{}", "-".repeat(80));
    for &format in SourceFormat::all() {
        println!(
            "{:<14} {:<36} {}",
            format.to_string(),
            file_name_pattern(format).as_str(),
            store_path(store_dir, format).display()
        );
    }
}
