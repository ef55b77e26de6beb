//! Decisions the importer delegates to its caller.
//!
//! The importer never decides on its own whether to clobber an existing
//! store or to widen an import to the rest of a batch. It asks an
//! [`ImportPrompter`]: interactively through `dialoguer`, or from answers
//! fixed up front by CLI flags or tests.

use std::io;
use std::path::{Path, PathBuf};

use dialoguer::{Confirm, Select};
use scrobble_ingest_models::{BatchChoice, WriteDecision};
use scrobble_models::SourceFormat;

const WRITE_CHOICES: [WriteDecision; 3] = [
    WriteDecision::Overwrite,
    WriteDecision::Append,
    WriteDecision::Cancel,
];
const WRITE_LABELS: [&str; 3] = ["Overwrite", "Append", "Cancel"];

/// Answers the importer's questions.
pub trait ImportPrompter {
    /// The store for `format` at `store` already exists. Overwrite,
    /// append, or cancel?
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the answer cannot be obtained.
    fn write_decision(&self, format: SourceFormat, store: &Path) -> io::Result<WriteDecision>;

    /// `input` belongs to a batch of `candidates`. Import all of them, or
    /// just `input`?
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the answer cannot be obtained.
    fn batch_choice(&self, input: &Path, candidates: &[PathBuf]) -> io::Result<BatchChoice>;
}

/// Gives the same answers every time without asking anyone.
#[derive(Debug, Clone, Copy)]
pub struct FixedDecisions {
    /// Answer for an existing store.
    pub write: WriteDecision,
    /// Answer for a discovered batch.
    pub batch: BatchChoice,
}

impl ImportPrompter for FixedDecisions {
    fn write_decision(&self, _format: SourceFormat, _store: &Path) -> io::Result<WriteDecision> {
        Ok(self.write)
    }

    fn batch_choice(&self, _input: &Path, _candidates: &[PathBuf]) -> io::Result<BatchChoice> {
        Ok(self.batch)
    }
}

/// Asks on the terminal, unless the answer was preset.
#[derive(Debug, Clone, Copy, Default)]
pub struct DialoguerPrompter {
    write: Option<WriteDecision>,
    batch: Option<BatchChoice>,
}

impl DialoguerPrompter {
    /// Creates a prompter that asks every question.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            write: None,
            batch: None,
        }
    }

    /// Answers the existing-store question with `decision` instead of
    /// asking.
    #[must_use]
    pub const fn with_write_decision(mut self, decision: Option<WriteDecision>) -> Self {
        self.write = decision;
        self
    }

    /// Answers the batch question with `choice` instead of asking.
    #[must_use]
    pub const fn with_batch_choice(mut self, choice: Option<BatchChoice>) -> Self {
        self.batch = choice;
        self
    }
}

impl ImportPrompter for DialoguerPrompter {
    fn write_decision(&self, format: SourceFormat, store: &Path) -> io::Result<WriteDecision> {
        if let Some(decision) = self.write {
            return Ok(decision);
        }

        let idx = Select::new()
            .with_prompt(format!(
                "Already imported {} data ({}). What would you like to do?",
                format.label(),
                store.display()
            ))
            .items(&WRITE_LABELS)
            .default(2)
            .interact()
            .map_err(io::Error::other)?;

        Ok(WRITE_CHOICES[idx])
    }

    fn batch_choice(&self, input: &Path, candidates: &[PathBuf]) -> io::Result<BatchChoice> {
        if let Some(choice) = self.batch {
            return Ok(choice);
        }

        let names = candidates
            .iter()
            .map(|c| c.display().to_string())
            .collect::<Vec<_>>()
            .join(", ");

        let all = Confirm::new()
            .with_prompt(format!(
                "{} is part of a larger export. Import {names}?",
                input.display()
            ))
            .default(true)
            .interact()
            .map_err(io::Error::other)?;

        Ok(if all {
            BatchChoice::All
        } else {
            BatchChoice::Single
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preset_answers_skip_the_terminal() {
        let prompter = DialoguerPrompter::new()
            .with_write_decision(Some(WriteDecision::Append))
            .with_batch_choice(Some(BatchChoice::Single));

        assert_eq!(
            prompter
                .write_decision(SourceFormat::LastFm, Path::new("store.tsv"))
                .unwrap(),
            WriteDecision::Append
        );
        assert_eq!(
            prompter
                .batch_choice(Path::new("endsong_0.json"), &[])
                .unwrap(),
            BatchChoice::Single
        );
    }
}
