//! SQLite-backed catalog store implementation.
//!
//! This module provides the `SqliteCatalogStore`, the relational sink of the
//! ETL run. A single connection is owned by the store; writes open a
//! transaction lazily and stay uncommitted until `commit` is called.

use super::models::*;
use super::schema::CATALOG_VERSIONED_SCHEMAS;
use super::trait_def::CatalogStore;
use anyhow::{Context, Result};
use rusqlite::{params, Connection, OpenFlags};
use std::path::Path;
use tracing::{info, warn};

/// SQLite-backed catalog store.
pub struct SqliteCatalogStore {
    conn: Connection,
}

fn init_schema(conn: &Connection) -> Result<()> {
    let latest_schema = &CATALOG_VERSIONED_SCHEMAS[CATALOG_VERSIONED_SCHEMAS.len() - 1];

    let table_count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%'",
        [],
        |r| r.get(0),
    )?;

    if table_count == 0 {
        info!(
            "Creating catalog db schema at version {}",
            latest_schema.version
        );
        latest_schema.create(conn)?;
        return Ok(());
    }

    latest_schema
        .validate(conn)
        .context("Existing database does not match the catalog schema")
}

impl SqliteCatalogStore {
    /// Open (or create) the catalog database at `db_path`.
    ///
    /// An empty database gets the schema created, an existing one is
    /// validated against it.
    pub fn new<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let db_path = db_path.as_ref();
        let conn = Connection::open_with_flags(
            db_path,
            OpenFlags::SQLITE_OPEN_READ_WRITE
                | OpenFlags::SQLITE_OPEN_CREATE
                | OpenFlags::SQLITE_OPEN_URI
                | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .with_context(|| format!("Failed to open catalog database {}", db_path.display()))?;
        Self::from_connection(conn)
    }

    /// Open a throwaway in-memory catalog.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("Failed to open in-memory database")?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        init_schema(&conn)?;
        conn.pragma_update(None, "foreign_keys", "ON")?;
        Ok(SqliteCatalogStore { conn })
    }

    fn begin_if_needed(&self) -> Result<()> {
        if self.conn.is_autocommit() {
            self.conn.execute_batch("BEGIN")?;
        }
        Ok(())
    }

    fn count_rows(&self, table: &str) -> Result<usize> {
        let count: i64 =
            self.conn
                .query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |r| r.get(0))?;
        Ok(count as usize)
    }
}

impl CatalogStore for SqliteCatalogStore {
    fn upsert_song(&self, song: &SongRecord) -> Result<()> {
        self.begin_if_needed()?;
        self.conn
            .prepare_cached(
                "INSERT INTO songs (song_id, title, artist_id, year, duration)
                 VALUES (?1, ?2, ?3, ?4, ?5)
                 ON CONFLICT(song_id) DO NOTHING",
            )?
            .execute(params![
                &song.song_id,
                &song.title,
                &song.artist_id,
                song.year,
                song.duration
            ])
            .with_context(|| format!("Failed to insert song {}", song.song_id))?;
        Ok(())
    }

    fn upsert_artist(&self, artist: &ArtistRecord) -> Result<()> {
        self.begin_if_needed()?;
        self.conn
            .prepare_cached(
                "INSERT INTO artists (artist_id, name, location, latitude, longitude)
                 VALUES (?1, ?2, ?3, ?4, ?5)
                 ON CONFLICT(artist_id) DO NOTHING",
            )?
            .execute(params![
                &artist.artist_id,
                &artist.name,
                &artist.location,
                artist.latitude,
                artist.longitude
            ])
            .with_context(|| format!("Failed to insert artist {}", artist.artist_id))?;
        Ok(())
    }

    fn upsert_time(&self, row: &TimeDimensionRow) -> Result<()> {
        self.begin_if_needed()?;
        self.conn
            .prepare_cached(
                "INSERT INTO time (start_time, hour, day, week, month, year, weekday)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                 ON CONFLICT(start_time) DO NOTHING",
            )?
            .execute(params![
                row.start_time,
                row.hour,
                row.day,
                row.week,
                row.month,
                row.year,
                row.weekday
            ])
            .with_context(|| format!("Failed to insert time row {}", row.start_time))?;
        Ok(())
    }

    fn upsert_user(&self, user: &UserRecord) -> Result<()> {
        self.begin_if_needed()?;
        self.conn
            .prepare_cached(
                "INSERT INTO users (user_id, first_name, last_name, gender, level)
                 VALUES (?1, ?2, ?3, ?4, ?5)
                 ON CONFLICT(user_id) DO UPDATE SET
                    first_name = excluded.first_name,
                    last_name = excluded.last_name,
                    gender = excluded.gender,
                    level = excluded.level",
            )?
            .execute(params![
                &user.user_id,
                &user.first_name,
                &user.last_name,
                &user.gender,
                &user.subscription_level
            ])
            .with_context(|| format!("Failed to upsert user {}", user.user_id))?;
        Ok(())
    }

    fn insert_songplay(&self, fact: &SongplayFact) -> Result<()> {
        self.begin_if_needed()?;
        self.conn
            .prepare_cached(
                "INSERT INTO songplays
                    (start_time, user_id, level, song_id, artist_id, session_id, location, user_agent)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            )?
            .execute(params![
                fact.start_time,
                &fact.user_id,
                &fact.subscription_level,
                &fact.song_id,
                &fact.artist_id,
                fact.session_id,
                &fact.location,
                &fact.user_agent
            ])
            .with_context(|| {
                format!(
                    "Failed to insert songplay for user {} at {}",
                    fact.user_id, fact.start_time
                )
            })?;
        Ok(())
    }

    fn find_song_candidates(
        &self,
        title: &str,
        artist_name: &str,
        duration: f64,
        tolerance: f64,
    ) -> Result<Vec<SongMatch>> {
        let mut stmt = self.conn.prepare_cached(
            "SELECT s.song_id, s.artist_id
             FROM songs s
             JOIN artists a ON a.artist_id = s.artist_id
             WHERE s.title = ?1 AND a.name = ?2 AND ABS(s.duration - ?3) <= ?4
             ORDER BY s.song_id",
        )?;
        let matches = stmt
            .query_map(params![title, artist_name, duration, tolerance], |r| {
                Ok(SongMatch {
                    song_id: r.get(0)?,
                    artist_id: r.get(1)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(matches)
    }

    fn list_song_keys(&self) -> Result<Vec<SongKey>> {
        let mut stmt = self.conn.prepare(
            "SELECT s.title, a.name, s.duration, s.song_id, s.artist_id
             FROM songs s
             JOIN artists a ON a.artist_id = s.artist_id
             ORDER BY s.song_id",
        )?;
        let keys = stmt
            .query_map([], |r| {
                Ok(SongKey {
                    title: r.get(0)?,
                    artist_name: r.get(1)?,
                    duration: r.get(2)?,
                    song_id: r.get(3)?,
                    artist_id: r.get(4)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(keys)
    }

    fn counts(&self) -> Result<TableCounts> {
        Ok(TableCounts {
            songs: self.count_rows("songs")?,
            artists: self.count_rows("artists")?,
            time: self.count_rows("time")?,
            users: self.count_rows("users")?,
            songplays: self.count_rows("songplays")?,
        })
    }

    fn commit(&self) -> Result<()> {
        if !self.conn.is_autocommit() {
            self.conn.execute_batch("COMMIT").context("Commit failed")?;
        }
        Ok(())
    }

    fn rollback(&self) -> Result<()> {
        if !self.conn.is_autocommit() {
            self.conn
                .execute_batch("ROLLBACK")
                .context("Rollback failed")?;
        }
        Ok(())
    }
}

impl Drop for SqliteCatalogStore {
    fn drop(&mut self) {
        if !self.conn.is_autocommit() {
            warn!("Closing catalog store with uncommitted writes, rolling back");
            if let Err(e) = self.conn.execute_batch("ROLLBACK") {
                warn!("Rollback on close failed: {}", e);
            }
        }
    }
}
