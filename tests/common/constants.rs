//! Shared constants for end-to-end tests
//!
//! When the fixture dataset changes, update only this file.

// ============================================================================
// Catalog
// ============================================================================

/// Artist with two song documents that disagree on location
pub const CASUAL_ARTIST_ID: &str = "ARD7TVE1187B99BFB1";
pub const CASUAL_FIRST_LOCATION: &str = "California - LA";
pub const CASUAL_SONG_ID: &str = "SOMZWCG12A8C13C480";
pub const CASUAL_SONG_TITLE: &str = "I Didn't Mean To";
pub const CASUAL_SONG_DURATION: f64 = 218.93179;

pub const KANYE_ARTIST_ID: &str = "ARRH63Y1187FB47783";
pub const KANYE_SONG_ID: &str = "SOQMPHB12A8C139DB8";

pub const CATALOG_SONGS: usize = 3;
pub const CATALOG_ARTISTS: usize = 2;

// ============================================================================
// Activity logs
// ============================================================================

/// Free for both plays on the first day, paid on the second
pub const KAYLEE_USER_ID: &str = "8";
/// Logged with a numeric userId
pub const RYAN_USER_ID: &str = "10";

/// Timestamps of the listen events; the first one is played twice
pub const TS_FIRST: i64 = 1541903636796;
pub const TS_SECOND: i64 = 1541903700000;
pub const TS_THIRD: i64 = 1541990400000;

pub const LISTEN_EVENTS: usize = 4;
pub const MATCHED_EVENTS: usize = 2;
pub const TIME_ROWS: usize = 3;
pub const USERS: usize = 2;
