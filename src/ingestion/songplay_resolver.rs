//! Listen events -> songplay facts, joined against the catalog.

use super::activity_extractor::ActivityEvent;
use super::IngestError;
use crate::catalog_store::{SongLookup, SongplayFact};

/// Default duration tolerance in seconds. Catalog and log durations come from
/// the same decimal text, so anything above float noise is a different
/// recording.
pub const DEFAULT_DURATION_TOLERANCE: f64 = 0.001;

pub struct SongplayResolver<'a> {
    lookup: &'a dyn SongLookup,
    tolerance: f64,
}

impl<'a> SongplayResolver<'a> {
    pub fn new(lookup: &'a dyn SongLookup, tolerance: f64) -> Self {
        Self { lookup, tolerance }
    }

    /// Build the fact for a listen event. An unmatched or ambiguous song
    /// leaves both catalog ids empty; only store failures are errors.
    pub fn resolve(&self, event: &ActivityEvent) -> Result<SongplayFact, IngestError> {
        let found = self.lookup.lookup_song(
            &event.song_title,
            &event.artist_name,
            event.duration,
            self.tolerance,
        )?;
        let (song_id, artist_id) = match found {
            Some(m) => (Some(m.song_id), Some(m.artist_id)),
            None => (None, None),
        };
        Ok(SongplayFact {
            start_time: event.timestamp_ms,
            user_id: event.user_id.clone(),
            subscription_level: event.subscription_level.clone(),
            song_id,
            artist_id,
            session_id: event.session_id,
            location: event.location.clone(),
            user_agent: event.user_agent.clone(),
        })
    }
}
