//! Per-file transforms handed to the batch loader.

use super::activity_extractor::{extract_listen_events, ActivityEvent};
use super::catalog_extractor::load_catalog_document;
use super::parser::{parse_activity_document, parse_catalog_document, read_document};
use super::songplay_resolver::SongplayResolver;
use super::time_dimension::build_time_row;
use super::IngestError;
use crate::catalog_store::{CatalogStore, UserRecord};
use std::path::Path;
use tracing::debug;

/// What one file contributed to the load.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FileStats {
    /// Source rows read from the document.
    pub rows: usize,
    /// Listen events kept (log files only).
    pub listen_events: usize,
    /// Listen events resolved to a catalog song (log files only).
    pub matched: usize,
}

fn user_record(event: &ActivityEvent) -> UserRecord {
    UserRecord {
        user_id: event.user_id.clone(),
        first_name: event.first_name.clone(),
        last_name: event.last_name.clone(),
        gender: event.gender.clone(),
        subscription_level: event.subscription_level.clone(),
    }
}

/// Load one song file into the song and artist tables.
pub fn process_song_file(store: &dyn CatalogStore, path: &Path) -> Result<FileStats, IngestError> {
    let bytes = read_document(path)?;
    let doc = parse_catalog_document(path, &bytes)?;
    load_catalog_document(store, &doc)?;
    Ok(FileStats {
        rows: 1,
        ..Default::default()
    })
}

/// Load one activity log into the time, user and songplay tables.
///
/// Each listen event writes, in order, its time row, its user (overwriting
/// earlier values for that user) and its songplay fact.
pub fn process_log_file(
    store: &dyn CatalogStore,
    resolver: &SongplayResolver,
    path: &Path,
) -> Result<FileStats, IngestError> {
    let bytes = read_document(path)?;
    let lines = parse_activity_document(path, &bytes)?;
    let events = extract_listen_events(&lines)?;

    let mut stats = FileStats {
        rows: lines.len(),
        listen_events: events.len(),
        matched: 0,
    };
    for event in &events {
        store.upsert_time(&build_time_row(event.timestamp_ms)?)?;
        store.upsert_user(&user_record(event))?;
        let fact = resolver.resolve(event)?;
        if fact.song_id.is_some() {
            stats.matched += 1;
        }
        store.insert_songplay(&fact)?;
    }
    debug!(
        "{}: {} rows, {} listen events, {} matched",
        path.display(),
        stats.rows,
        stats.listen_events,
        stats.matched
    );
    Ok(stats)
}
