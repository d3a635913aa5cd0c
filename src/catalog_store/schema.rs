//! SQLite schema definitions for the analytical catalog database.
//!
//! A star schema: `songplays` is the fact table, `songs`, `artists`, `time`
//! and `users` are its dimensions. Natural keys from the source data are used
//! as primary keys.

use crate::sqlite_column;
use crate::sqlite_persistence::{
    Column, ForeignKey, ForeignKeyOnChange, SqlType, Table, VersionedSchema,
};

// =============================================================================
// Catalog dimensions
// =============================================================================

/// Songs table. `artist_id` is not a foreign key: catalogs are loaded
/// incrementally and a song is written before its artist.
const SONGS_TABLE: Table = Table {
    name: "songs",
    columns: &[
        sqlite_column!(
            "song_id",
            &SqlType::Text,
            is_primary_key = true,
            non_null = true
        ),
        sqlite_column!("title", &SqlType::Text, non_null = true),
        sqlite_column!("artist_id", &SqlType::Text, non_null = true),
        sqlite_column!("year", &SqlType::Integer, non_null = true),
        sqlite_column!("duration", &SqlType::Real, non_null = true),
    ],
    indices: &[
        ("idx_songs_title", "title"),
        ("idx_songs_artist", "artist_id"),
    ],
};

const ARTISTS_TABLE: Table = Table {
    name: "artists",
    columns: &[
        sqlite_column!(
            "artist_id",
            &SqlType::Text,
            is_primary_key = true,
            non_null = true
        ),
        sqlite_column!("name", &SqlType::Text, non_null = true),
        sqlite_column!("location", &SqlType::Text),
        sqlite_column!("latitude", &SqlType::Real),
        sqlite_column!("longitude", &SqlType::Real),
    ],
    indices: &[("idx_artists_name", "name")],
};

// =============================================================================
// Activity dimensions
// =============================================================================

/// Time table, one row per distinct songplay start time (epoch millis).
const TIME_TABLE: Table = Table {
    name: "time",
    columns: &[
        sqlite_column!(
            "start_time",
            &SqlType::Integer,
            is_primary_key = true,
            non_null = true
        ),
        sqlite_column!("hour", &SqlType::Integer, non_null = true),
        sqlite_column!("day", &SqlType::Integer, non_null = true),
        sqlite_column!("week", &SqlType::Integer, non_null = true),
        sqlite_column!("month", &SqlType::Integer, non_null = true),
        sqlite_column!("year", &SqlType::Integer, non_null = true),
        sqlite_column!("weekday", &SqlType::Integer, non_null = true), // 0=Monday .. 6=Sunday
    ],
    indices: &[],
};

const USERS_TABLE: Table = Table {
    name: "users",
    columns: &[
        sqlite_column!(
            "user_id",
            &SqlType::Text,
            is_primary_key = true,
            non_null = true
        ),
        sqlite_column!("first_name", &SqlType::Text, non_null = true),
        sqlite_column!("last_name", &SqlType::Text, non_null = true),
        sqlite_column!("gender", &SqlType::Text, non_null = true),
        sqlite_column!("level", &SqlType::Text, non_null = true), // 'free', 'paid'
    ],
    indices: &[],
};

// =============================================================================
// Fact table
// =============================================================================

const TIME_FK: ForeignKey = ForeignKey {
    foreign_table: "time",
    foreign_column: "start_time",
    on_delete: ForeignKeyOnChange::Restrict,
};

const USER_FK: ForeignKey = ForeignKey {
    foreign_table: "users",
    foreign_column: "user_id",
    on_delete: ForeignKeyOnChange::Restrict,
};

const SONGPLAYS_TABLE: Table = Table {
    name: "songplays",
    columns: &[
        sqlite_column!("songplay_id", &SqlType::Integer, is_primary_key = true),
        sqlite_column!(
            "start_time",
            &SqlType::Integer,
            non_null = true,
            foreign_key = Some(&TIME_FK)
        ),
        sqlite_column!(
            "user_id",
            &SqlType::Text,
            non_null = true,
            foreign_key = Some(&USER_FK)
        ),
        sqlite_column!("level", &SqlType::Text, non_null = true),
        sqlite_column!("song_id", &SqlType::Text),
        sqlite_column!("artist_id", &SqlType::Text),
        sqlite_column!("session_id", &SqlType::Integer, non_null = true),
        sqlite_column!("location", &SqlType::Text, non_null = true),
        sqlite_column!("user_agent", &SqlType::Text, non_null = true),
    ],
    indices: &[
        ("idx_songplays_start_time", "start_time"),
        ("idx_songplays_user", "user_id"),
    ],
};

// =============================================================================
// Versioned Schema Definition
// =============================================================================

pub const CATALOG_VERSIONED_SCHEMAS: &[VersionedSchema] = &[VersionedSchema {
    version: 0,
    tables: &[
        SONGS_TABLE,
        ARTISTS_TABLE,
        TIME_TABLE,
        USERS_TABLE,
        SONGPLAYS_TABLE,
    ],
}];
