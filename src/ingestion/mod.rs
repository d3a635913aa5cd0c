//! Extract-transform-load of song and activity-log documents into the
//! catalog store.

mod activity_extractor;
mod batch_loader;
mod catalog_extractor;
mod discovery;
mod error;
mod parser;
mod pipeline;
mod progress;
mod records;
mod songplay_resolver;
mod time_dimension;

pub use activity_extractor::{extract_listen_events, ActivityEvent, LISTEN_EVENT_PAGE};
pub use batch_loader::{BatchLoader, BatchReport, FailurePolicy, FileLoadError};
pub use catalog_extractor::{extract_catalog_records, load_catalog_document};
pub use discovery::{discover_json_files, DiscoveryError};
pub use error::IngestError;
pub use parser::{parse_activity_document, parse_catalog_document, read_document};
pub use pipeline::{process_log_file, process_song_file, FileStats};
pub use progress::{
    FileOutcome, FileProgress, LoggingObserver, ProgressBarObserver, ProgressObserver,
};
pub use records::{ActivityLine, ActivityRow, CatalogDocument};
pub use songplay_resolver::{SongplayResolver, DEFAULT_DURATION_TOLERANCE};
pub use time_dimension::build_time_row;
