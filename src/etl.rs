//! Whole-run orchestration: song files first, then activity logs.

use crate::catalog_store::{CatalogStore, SongIndex, SqliteCatalogStore, TableCounts};
use crate::config::{AppConfig, ProgressMode};
use crate::ingestion::{
    discover_json_files, process_log_file, process_song_file, BatchLoader, BatchReport,
    LoggingObserver, ProgressBarObserver, ProgressObserver, SongplayResolver,
};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug)]
pub struct RunSummary {
    pub songs: BatchReport,
    pub logs: BatchReport,
    pub counts: TableCounts,
}

impl RunSummary {
    pub fn failed_files(&self) -> usize {
        self.songs.failed.len() + self.logs.failed.len()
    }
}

fn make_observer(mode: ProgressMode, total: usize, label: &str) -> Box<dyn ProgressObserver> {
    match mode {
        ProgressMode::Log => Box::new(LoggingObserver),
        ProgressMode::Bar => Box::new(ProgressBarObserver::new(total, label)),
    }
}

fn discover(dir: &Path) -> Result<Vec<PathBuf>> {
    let files = discover_json_files(dir)?;
    info!("{} files found in {}", files.len(), dir.display());
    Ok(files)
}

/// Load every song file, then every log file, into the store at
/// `config.db_path`.
///
/// Files that fail under the skip policy are listed in the returned summary;
/// under the abort policy the first failure is returned as the error.
pub fn run_etl(config: &AppConfig) -> Result<RunSummary> {
    info!("Opening SQLite database at {:?}...", config.db_path);
    let store = SqliteCatalogStore::new(&config.db_path)?;
    run_etl_with_store(&store, config)
}

pub fn run_etl_with_store(store: &SqliteCatalogStore, config: &AppConfig) -> Result<RunSummary> {
    let song_files = discover(&config.song_data)?;
    let observer = make_observer(config.progress, song_files.len(), "song files");
    let songs = BatchLoader::new(store, config.failure_policy, observer.as_ref())
        .run(&song_files, process_song_file)
        .context("Song data load aborted")?;

    let index = if config.song_index {
        Some(SongIndex::build(store)?)
    } else {
        None
    };
    let resolver = match &index {
        Some(index) => SongplayResolver::new(index, config.duration_tolerance),
        None => SongplayResolver::new(store, config.duration_tolerance),
    };

    let log_files = discover(&config.log_data)?;
    let observer = make_observer(config.progress, log_files.len(), "log files");
    let logs = BatchLoader::new(store, config.failure_policy, observer.as_ref())
        .run(&log_files, |store, path| process_log_file(store, &resolver, path))
        .context("Log data load aborted")?;

    let counts = store.counts()?;
    Ok(RunSummary {
        songs,
        logs,
        counts,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingestion::FailurePolicy;
    use std::fs;
    use tempfile::TempDir;

    fn config(root: &Path, song_index: bool) -> AppConfig {
        AppConfig {
            db_path: root.join("sparkify.db"),
            song_data: root.join("song_data"),
            log_data: root.join("log_data"),
            failure_policy: FailurePolicy::Skip,
            progress: ProgressMode::Log,
            duration_tolerance: 0.001,
            song_index,
        }
    }

    #[test]
    fn empty_data_dirs_load_nothing() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("song_data")).unwrap();
        fs::create_dir_all(dir.path().join("log_data")).unwrap();

        for song_index in [false, true] {
            let store = SqliteCatalogStore::open_in_memory().unwrap();
            let summary = run_etl_with_store(&store, &config(dir.path(), song_index)).unwrap();
            assert_eq!(summary.songs.total, 0);
            assert_eq!(summary.logs.total, 0);
            assert_eq!(summary.failed_files(), 0);
            assert_eq!(summary.counts, TableCounts::default());
        }
    }

    #[test]
    fn missing_data_dir_fails_the_run() {
        let dir = TempDir::new().unwrap();
        let store = SqliteCatalogStore::open_in_memory().unwrap();
        let err = run_etl_with_store(&store, &config(dir.path(), false)).unwrap_err();
        assert!(err.to_string().contains("Data directory not found"));
    }
}
