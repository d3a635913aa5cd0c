//! CatalogStore trait definition.
//!
//! The ingestion pipeline only talks to the relational store through this
//! trait, so the SQLite implementation can be swapped for a mock in tests.

use super::models::*;
use anyhow::Result;
use tracing::debug;

/// Trait for analytical catalog storage backends.
///
/// Writes are buffered in an open transaction until `commit` (or discarded
/// by `rollback`). Upsert semantics are per entity:
/// songs, artists and time rows are insert-or-ignore, users are
/// insert-or-overwrite, songplays are always appended.
#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
pub trait CatalogStore {
    // =========================================================================
    // Catalog dimensions
    // =========================================================================

    /// Insert a song unless one with the same `song_id` already exists.
    fn upsert_song(&self, song: &SongRecord) -> Result<()>;

    /// Insert an artist unless one with the same `artist_id` already exists.
    fn upsert_artist(&self, artist: &ArtistRecord) -> Result<()>;

    // =========================================================================
    // Activity dimensions and fact
    // =========================================================================

    /// Insert a time row unless one with the same `start_time` already exists.
    fn upsert_time(&self, row: &TimeDimensionRow) -> Result<()>;

    /// Insert a user, overwriting every non-key field if it already exists.
    fn upsert_user(&self, user: &UserRecord) -> Result<()>;

    /// Append a songplay fact.
    fn insert_songplay(&self, fact: &SongplayFact) -> Result<()>;

    // =========================================================================
    // Lookups
    // =========================================================================

    /// All songs whose title and artist name match exactly and whose duration
    /// is within `tolerance` seconds of `duration`.
    fn find_song_candidates(
        &self,
        title: &str,
        artist_name: &str,
        duration: f64,
        tolerance: f64,
    ) -> Result<Vec<SongMatch>>;

    /// Every song joined with its artist name, for building a `SongIndex`.
    fn list_song_keys(&self) -> Result<Vec<SongKey>>;

    /// Row counts of every table.
    fn counts(&self) -> Result<TableCounts>;

    // =========================================================================
    // Transaction boundary
    // =========================================================================

    /// Make every write since the last commit durable.
    fn commit(&self) -> Result<()>;

    /// Discard every write since the last commit.
    fn rollback(&self) -> Result<()>;
}

/// Resolves a (title, artist name, duration) triple to catalog identifiers.
pub trait SongLookup {
    /// Returns `Some` only when exactly one song matches.
    fn lookup_song(
        &self,
        title: &str,
        artist_name: &str,
        duration: f64,
        tolerance: f64,
    ) -> Result<Option<SongMatch>>;
}

impl<T: CatalogStore + ?Sized> SongLookup for T {
    fn lookup_song(
        &self,
        title: &str,
        artist_name: &str,
        duration: f64,
        tolerance: f64,
    ) -> Result<Option<SongMatch>> {
        let candidates = self.find_song_candidates(title, artist_name, duration, tolerance)?;
        Ok(single_candidate(title, artist_name, duration, candidates))
    }
}

/// Zero or several candidates are both treated as a miss.
pub(crate) fn single_candidate(
    title: &str,
    artist_name: &str,
    duration: f64,
    mut candidates: Vec<SongMatch>,
) -> Option<SongMatch> {
    if candidates.len() > 1 {
        debug!(
            "Ambiguous catalog match for '{}' by '{}' ({}s): {} candidates",
            title,
            artist_name,
            duration,
            candidates.len()
        );
        return None;
    }
    candidates.pop()
}
