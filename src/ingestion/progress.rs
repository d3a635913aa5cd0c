//! Per-file progress reporting.

use super::pipeline::FileStats;
use super::IngestError;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use tracing::{error, info};

pub enum FileOutcome<'a> {
    Loaded(&'a FileStats),
    Failed(&'a IngestError),
}

/// Emitted once per file, after its commit (or rollback).
pub struct FileProgress<'a> {
    /// 1-based position in the batch.
    pub index: usize,
    pub total: usize,
    pub path: &'a Path,
    pub outcome: FileOutcome<'a>,
}

pub trait ProgressObserver {
    fn on_file_processed(&self, progress: &FileProgress);

    /// Called once after the last file, whatever the outcome of the run.
    fn on_batch_finished(&self) {}
}

/// Logs one line per file.
pub struct LoggingObserver;

impl ProgressObserver for LoggingObserver {
    fn on_file_processed(&self, progress: &FileProgress) {
        match progress.outcome {
            FileOutcome::Loaded(_) => {
                info!("{}/{} files processed.", progress.index, progress.total)
            }
            FileOutcome::Failed(err) => error!(
                "{}/{} failed: {}: {}",
                progress.index,
                progress.total,
                progress.path.display(),
                err
            ),
        }
    }
}

/// Terminal progress bar; failures are still printed above the bar.
pub struct ProgressBarObserver {
    bar: ProgressBar,
}

impl ProgressBarObserver {
    pub fn new(total: usize, label: &str) -> Self {
        let bar = ProgressBar::new(total as u64);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} files ({percent}%) | {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-");
        bar.set_style(style);
        bar.set_message(label.to_string());
        ProgressBarObserver { bar }
    }
}

impl ProgressObserver for ProgressBarObserver {
    fn on_file_processed(&self, progress: &FileProgress) {
        if let FileOutcome::Failed(err) = progress.outcome {
            self.bar
                .println(format!("failed: {}: {}", progress.path.display(), err));
            error!("Failed to load {}: {}", progress.path.display(), err);
        }
        self.bar.set_position(progress.index as u64);
    }

    fn on_batch_finished(&self) {
        self.bar.finish();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_bar_tracks_position() {
        let observer = ProgressBarObserver::new(3, "song files");
        let stats = FileStats::default();
        let error = IngestError::InvalidTimestamp(i64::MAX);
        for (index, outcome) in [
            (1, FileOutcome::Loaded(&stats)),
            (2, FileOutcome::Failed(&error)),
        ] {
            observer.on_file_processed(&FileProgress {
                index,
                total: 3,
                path: Path::new("/data/song_data/A/B/C/TRABCEI128F424C983.json"),
                outcome,
            });
        }
        assert_eq!(observer.bar.position(), 2);
        observer.on_batch_finished();
        assert!(observer.bar.is_finished());
    }
}
