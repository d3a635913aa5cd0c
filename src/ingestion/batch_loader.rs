//! Runs a per-file transform over a batch of source files, one transaction
//! per file.

use super::pipeline::FileStats;
use super::progress::{FileOutcome, FileProgress, ProgressObserver};
use super::IngestError;
use crate::catalog_store::CatalogStore;
use clap::ValueEnum;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{error, warn};

/// What happens to the run when a file fails. The failed file is rolled
/// back either way.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum FailurePolicy {
    /// Record the failure and continue with the next file.
    #[default]
    Skip,
    /// Stop at the first failure.
    Abort,
}

#[derive(Debug, Error)]
#[error("Failed to load {}: {source}", .path.display())]
pub struct FileLoadError {
    pub path: PathBuf,
    #[source]
    pub source: IngestError,
}

#[derive(Debug, Default)]
pub struct BatchReport {
    pub total: usize,
    pub loaded: usize,
    pub failed: Vec<FileLoadError>,
    /// Sum over the loaded files.
    pub stats: FileStats,
}

impl BatchReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    fn record_loaded(&mut self, stats: &FileStats) {
        self.loaded += 1;
        self.stats.rows += stats.rows;
        self.stats.listen_events += stats.listen_events;
        self.stats.matched += stats.matched;
    }
}

pub struct BatchLoader<'a> {
    store: &'a dyn CatalogStore,
    policy: FailurePolicy,
    observer: &'a dyn ProgressObserver,
}

impl<'a> BatchLoader<'a> {
    pub fn new(
        store: &'a dyn CatalogStore,
        policy: FailurePolicy,
        observer: &'a dyn ProgressObserver,
    ) -> Self {
        Self {
            store,
            policy,
            observer,
        }
    }

    /// Apply `transform` to every file in order, committing after each one
    /// that succeeds.
    ///
    /// Under [`FailurePolicy::Abort`] the first failure is returned as the
    /// error; files committed before it stay committed. A failed rollback
    /// ends the run under either policy.
    pub fn run<F>(&self, files: &[PathBuf], mut transform: F) -> Result<BatchReport, FileLoadError>
    where
        F: FnMut(&dyn CatalogStore, &Path) -> Result<FileStats, IngestError>,
    {
        let total = files.len();
        let mut report = BatchReport {
            total,
            ..Default::default()
        };

        for (position, path) in files.iter().enumerate() {
            let index = position + 1;
            let outcome = transform(self.store, path.as_path()).and_then(|stats| {
                self.store.commit()?;
                Ok(stats)
            });

            match outcome {
                Ok(stats) => {
                    self.observer.on_file_processed(&FileProgress {
                        index,
                        total,
                        path,
                        outcome: FileOutcome::Loaded(&stats),
                    });
                    report.record_loaded(&stats);
                }
                Err(err) => {
                    self.observer.on_file_processed(&FileProgress {
                        index,
                        total,
                        path,
                        outcome: FileOutcome::Failed(&err),
                    });
                    if let Err(rollback_err) = self.store.rollback() {
                        error!(
                            "Rollback after failure in {} did not succeed: {:#}",
                            path.display(),
                            rollback_err
                        );
                        self.observer.on_batch_finished();
                        return Err(FileLoadError {
                            path: path.clone(),
                            source: IngestError::Store(rollback_err),
                        });
                    }
                    let failure = FileLoadError {
                        path: path.clone(),
                        source: err,
                    };
                    match self.policy {
                        FailurePolicy::Skip => report.failed.push(failure),
                        FailurePolicy::Abort => {
                            warn!("Aborting after {}/{} files", index, total);
                            self.observer.on_batch_finished();
                            return Err(failure);
                        }
                    }
                }
            }
        }

        self.observer.on_batch_finished();
        Ok(report)
    }
}
