//! End-to-end imports over temporary export directories.

use std::cell::RefCell;
use std::io;
use std::path::{Path, PathBuf};

use scrobble_clean::StandardCleaner;
use scrobble_ingest::prompt::{FixedDecisions, ImportPrompter};
use scrobble_ingest::{ImportContext, ImportError, import_scrobbles};
use scrobble_ingest_models::{BatchChoice, ImportSummary, WriteDecision};
use scrobble_models::SourceFormat;
use scrobble_source::progress::NullProgress;
use serde_json::json;
use tempfile::TempDir;

/// Answers like [`FixedDecisions`] and remembers which questions came up.
struct RecordingPrompter {
    answers: FixedDecisions,
    asked: RefCell<Vec<&'static str>>,
}

impl RecordingPrompter {
    fn new(write: WriteDecision, batch: BatchChoice) -> Self {
        Self {
            answers: FixedDecisions { write, batch },
            asked: RefCell::default(),
        }
    }

    fn asked(&self) -> Vec<&'static str> {
        self.asked.borrow().clone()
    }
}

impl ImportPrompter for RecordingPrompter {
    fn write_decision(&self, format: SourceFormat, store: &Path) -> io::Result<WriteDecision> {
        self.asked.borrow_mut().push("write");
        self.answers.write_decision(format, store)
    }

    fn batch_choice(&self, input: &Path, candidates: &[PathBuf]) -> io::Result<BatchChoice> {
        self.asked.borrow_mut().push("batch");
        self.answers.batch_choice(input, candidates)
    }
}

struct Fixture {
    exports: TempDir,
    stores: TempDir,
}

impl Fixture {
    fn new() -> Self {
        Self {
            exports: tempfile::tempdir().unwrap(),
            stores: tempfile::tempdir().unwrap(),
        }
    }

    fn export(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.exports.path().join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    fn store(&self, name: &str) -> PathBuf {
        self.stores.path().join(name)
    }

    fn import(&self, input: &Path, write: WriteDecision, batch: BatchChoice) -> ImportSummary {
        self.try_import(input, write, batch).unwrap()
    }

    fn try_import(
        &self,
        input: &Path,
        write: WriteDecision,
        batch: BatchChoice,
    ) -> Result<ImportSummary, ImportError> {
        self.import_with(input, &FixedDecisions { write, batch })
    }

    fn import_with(
        &self,
        input: &Path,
        prompter: &dyn ImportPrompter,
    ) -> Result<ImportSummary, ImportError> {
        let cleaner = StandardCleaner::new();
        let ctx = ImportContext {
            store_dir: self.stores.path().to_path_buf(),
            prompter,
            cleaner: &cleaner,
            progress: &NullProgress,
        };
        import_scrobbles(&ctx, input)
    }
}

fn store_lines(path: &Path) -> Vec<Vec<String>> {
    std::fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(|l| l.split('\t').map(ToString::to_string).collect())
        .collect()
}

fn endsong(
    offline_ms: i64,
    artist: Option<&str>,
    title: Option<&str>,
    ms_played: i64,
) -> serde_json::Value {
    json!({
        "ts": "2020-06-01T10:00:00Z",
        "ms_played": ms_played,
        "offline_timestamp": offline_ms,
        "master_metadata_album_artist_name": artist,
        "master_metadata_track_name": title,
        "master_metadata_album_album_name": "Album",
    })
}

#[test]
fn lastfm_collision_is_bumped_by_one_second() {
    let fx = Fixture::new();
    let input = fx.export(
        "scrobbles.csv",
        "Artist A,Album A,Title A,01 Jan 2020 00:00\n\
         Artist B,Album B,Title B,01 Jan 2020 00:00\n",
    );

    let summary = fx.import(&input, WriteDecision::Cancel, BatchChoice::All);
    assert_eq!(summary.as_tuple(), (2, 0, 0, 0));

    let lines = store_lines(&fx.store("lastfmimport.tsv"));
    assert_eq!(
        lines,
        vec![
            vec!["1577836800", "Artist A", "Title A", "Album A", "-"],
            vec!["1577836801", "Artist B", "Title B", "Album B", "-"],
        ]
    );
}

#[test]
fn lastfm_malformed_rows_count_as_failures() {
    let fx = Fixture::new();
    let input = fx.export(
        "scrobbles.csv",
        "Artist,Album,Title\n\
         Artist,Album,Title,not a time\n\
         Artist,Album,Title,01 Jan 2020 00:00\n",
    );

    let summary = fx.import(&input, WriteDecision::Cancel, BatchChoice::All);
    assert_eq!(summary.as_tuple(), (1, 0, 0, 2));
}

#[test]
fn spotify_null_title_is_skipped() {
    let fx = Fixture::new();
    let input = fx.export(
        "endsong_0.json",
        &json!([
            endsong(1_600_000_000_000, Some("A"), None, 60_000),
            endsong(1_600_000_100_000, Some("A"), Some("T"), 60_000),
        ])
        .to_string(),
    );

    let summary = fx.import(&input, WriteDecision::Cancel, BatchChoice::All);
    assert_eq!(summary.as_tuple(), (1, 0, 1, 0));
}

#[test]
fn spotify_batch_is_deduplicated_across_files() {
    let fx = Fixture::new();
    let play = endsong(1_600_000_000_000, Some("A"), Some("T"), 60_000);
    let first = fx.export("endsong_0.json", &json!([play.clone()]).to_string());
    fx.export(
        "endsong_1.json",
        &json!([play, endsong(0, Some("B"), Some("U"), 45_000)]).to_string(),
    );

    let summary = fx.import(&first, WriteDecision::Cancel, BatchChoice::All);
    assert_eq!(summary.as_tuple(), (2, 1, 1, 0));

    let lines = store_lines(&fx.store("spotifyimport.tsv"));
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0], vec!["1600000000", "A", "T", "Album", "60"]);
    // Zero offline timestamp falls back to `ts`.
    assert_eq!(lines[1][0], "1591005600");
}

#[test]
fn single_file_choice_ignores_siblings() {
    let fx = Fixture::new();
    let first = fx.export(
        "endsong_0.json",
        &json!([endsong(1_600_000_000_000, Some("A"), Some("T"), 60_000)]).to_string(),
    );
    fx.export(
        "endsong_1.json",
        &json!([endsong(1_600_000_500_000, Some("B"), Some("U"), 60_000)]).to_string(),
    );

    let summary = fx.import(&first, WriteDecision::Cancel, BatchChoice::Single);
    assert_eq!(summary.as_tuple(), (1, 0, 0, 0));
}

#[test]
fn lone_batch_file_into_new_store_asks_nothing() {
    let fx = Fixture::new();
    let input = fx.export(
        "endsong_0.json",
        &json!([endsong(1_600_000_000_000, Some("A"), Some("T"), 60_000)]).to_string(),
    );
    let prompter = RecordingPrompter::new(WriteDecision::Cancel, BatchChoice::Single);

    let summary = fx.import_with(&input, &prompter).unwrap();
    assert_eq!(summary.as_tuple(), (1, 0, 0, 0));
    assert!(prompter.asked().is_empty());
}

#[test]
fn batch_question_comes_before_write_question() {
    let fx = Fixture::new();
    let play = json!([endsong(1_600_000_000_000, Some("A"), Some("T"), 60_000)]).to_string();
    let first = fx.export("endsong_0.json", &play);
    fx.export("endsong_1.json", &play);
    std::fs::write(fx.store("spotifyimport.tsv"), "1\tX\tY\t\t-\n").unwrap();
    let prompter = RecordingPrompter::new(WriteDecision::Cancel, BatchChoice::All);

    let summary = fx.import_with(&first, &prompter).unwrap();
    assert_eq!(summary.as_tuple(), (0, 0, 0, 0));
    assert_eq!(prompter.asked(), vec!["batch", "write"]);
}

#[test]
fn unrecognized_file_asks_nothing() {
    let fx = Fixture::new();
    let input = fx.export("random.txt", "whatever");
    let prompter = RecordingPrompter::new(WriteDecision::Overwrite, BatchChoice::All);

    fx.import_with(&input, &prompter).unwrap();
    assert!(prompter.asked().is_empty());
}

#[test]
fn unrecognized_file_does_nothing() {
    let fx = Fixture::new();
    let input = fx.export("random.txt", "whatever");

    let summary = fx.import(&input, WriteDecision::Overwrite, BatchChoice::All);
    assert_eq!(summary.as_tuple(), (0, 0, 0, 0));
    assert_eq!(std::fs::read_dir(fx.stores.path()).unwrap().count(), 0);
}

#[test]
fn cancel_leaves_existing_store_untouched() {
    let fx = Fixture::new();
    let input = fx.export("scrobbles.csv", "Artist,Album,Title,01 Jan 2020 00:00\n");
    let store = fx.store("lastfmimport.tsv");
    std::fs::write(&store, "1\tX\tY\t\t-\n").unwrap();

    let summary = fx.import(&input, WriteDecision::Cancel, BatchChoice::All);
    assert_eq!(summary.as_tuple(), (0, 0, 0, 0));
    assert_eq!(std::fs::read_to_string(&store).unwrap(), "1\tX\tY\t\t-\n");
}

#[test]
fn overwrite_replaces_existing_store() {
    let fx = Fixture::new();
    let input = fx.export("scrobbles.csv", "Artist,Album,Title,01 Jan 2020 00:00\n");
    let store = fx.store("lastfmimport.tsv");
    std::fs::write(&store, "1\tX\tY\t\t-\n").unwrap();

    fx.import(&input, WriteDecision::Overwrite, BatchChoice::All);
    assert_eq!(
        store_lines(&store),
        vec![vec!["1577836800", "Artist", "Title", "Album", "-"]]
    );
}

#[test]
fn appending_same_export_twice_adds_nothing() {
    let fx = Fixture::new();
    let input = fx.export(
        "scrobbles.csv",
        "Artist A,Album A,Title A,01 Jan 2020 00:00\n\
         Artist B,Album B,Title B,01 Jan 2020 00:00\n\
         Artist C,Album C,Title C,01 Jan 2020 00:05\n",
    );

    let first = fx.import(&input, WriteDecision::Append, BatchChoice::All);
    assert_eq!(first.as_tuple(), (3, 0, 0, 0));

    let second = fx.import(&input, WriteDecision::Append, BatchChoice::All);
    assert_eq!(second.as_tuple(), (0, 0, 3, 0));

    assert_eq!(store_lines(&fx.store("lastfmimport.tsv")).len(), 3);
}

#[test]
fn appending_new_plays_avoids_stored_timestamps() {
    let fx = Fixture::new();
    let store = fx.store("spotifyimport.tsv");
    std::fs::write(&store, "1600000000\tA\tT\tAlbum\t60\n").unwrap();

    let input = fx.export(
        "endsong_0.json",
        &json!([endsong(1_600_000_000_000, Some("B"), Some("U"), 60_000)]).to_string(),
    );

    let summary = fx.import(&input, WriteDecision::Append, BatchChoice::All);
    assert_eq!(summary.as_tuple(), (1, 0, 0, 0));

    let lines = store_lines(&store);
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[1][0], "1600000001");
}

#[test]
fn cleaner_output_is_stored() {
    let fx = Fixture::new();
    let input = fx.export(
        "scrobbles.csv",
        "Artist A feat. Artist B,Album,Song (feat. Artist C),01 Jan 2020 00:00\n",
    );

    fx.import(&input, WriteDecision::Cancel, BatchChoice::All);
    let lines = store_lines(&fx.store("lastfmimport.tsv"));
    assert_eq!(lines[0][1], "Artist A\u{241F}Artist B\u{241F}Artist C");
    assert_eq!(lines[0][2], "Song");
}

#[test]
fn missing_input_is_an_error() {
    let fx = Fixture::new();
    let input = fx.exports.path().join("endsong_3.json");

    assert!(matches!(
        fx.try_import(&input, WriteDecision::Overwrite, BatchChoice::All),
        Err(ImportError::MissingInput(_))
    ));
}
