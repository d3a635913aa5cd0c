//! Row models for the analytical catalog schema.
//!
//! Dimension rows (song, artist, time, user) and the songplay fact, in the
//! shape they are written to the store.

use serde::Serialize;

// =============================================================================
// Catalog dimensions
// =============================================================================

/// A song, keyed by `song_id`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SongRecord {
    pub song_id: String,
    pub title: String,
    pub artist_id: String,
    pub year: i32,
    pub duration: f64,
}

/// An artist, keyed by `artist_id`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ArtistRecord {
    pub artist_id: String,
    pub name: String,
    pub location: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

// =============================================================================
// Activity dimensions and fact
// =============================================================================

/// Calendar decomposition of a songplay start time, keyed by `start_time`.
///
/// `weekday` counts from Monday = 0 to Sunday = 6, `week` is the ISO-8601
/// week number.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TimeDimensionRow {
    pub start_time: i64,
    pub hour: u32,
    pub day: u32,
    pub week: u32,
    pub month: u32,
    pub year: i32,
    pub weekday: u32,
}

/// A listener, keyed by `user_id`. Later writes win.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct UserRecord {
    pub user_id: String,
    pub first_name: String,
    pub last_name: String,
    pub gender: String,
    pub subscription_level: String,
}

/// One listen event. `song_id` and `artist_id` are both `None` when the
/// event could not be matched against the catalog.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SongplayFact {
    pub start_time: i64,
    pub user_id: String,
    pub subscription_level: String,
    pub song_id: Option<String>,
    pub artist_id: Option<String>,
    pub session_id: i64,
    pub location: String,
    pub user_agent: String,
}

// =============================================================================
// Lookup types
// =============================================================================

/// Catalog identifiers resolved for a (title, artist, duration) triple.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SongMatch {
    pub song_id: String,
    pub artist_id: String,
}

/// Everything needed to answer a song lookup without touching the store.
#[derive(Clone, Debug, PartialEq)]
pub struct SongKey {
    pub title: String,
    pub artist_name: String,
    pub duration: f64,
    pub song_id: String,
    pub artist_id: String,
}

/// Row counts per table, used for run summaries.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct TableCounts {
    pub songs: usize,
    pub artists: usize,
    pub time: usize,
    pub users: usize,
    pub songplays: usize,
}
