//! Sparkify ETL Library
//!
//! Loads the song catalog and user activity logs into a SQLite star schema.

pub mod catalog_store;
pub mod config;
pub mod etl;
pub mod ingestion;
pub mod sqlite_persistence;

// Re-export commonly used types for convenience
pub use catalog_store::{CatalogStore, SqliteCatalogStore, TableCounts};
pub use config::{AppConfig, CliConfig, FileConfig, ProgressMode};
pub use etl::{run_etl, RunSummary};
pub use ingestion::{FailurePolicy, IngestError};
