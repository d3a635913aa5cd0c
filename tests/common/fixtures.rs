//! On-disk song and log fixtures laid out like the real dataset.

use super::constants::*;
use anyhow::Result;
use rusqlite::Connection;
use serde_json::{json, Value};
use sparkify_etl::config::{AppConfig, CliConfig};
use sparkify_etl::FailurePolicy;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub struct TestDataset {
    // Held to keep the directory alive
    _dir: TempDir,
    pub song_data: PathBuf,
    pub log_data: PathBuf,
    pub db_path: PathBuf,
}

fn song_doc(
    song_id: &str,
    title: &str,
    duration: f64,
    year: i32,
    artist_id: &str,
    artist_name: &str,
    location: &str,
) -> Value {
    json!({
        "num_songs": 1,
        "artist_id": artist_id,
        "artist_latitude": null,
        "artist_longitude": null,
        "artist_location": location,
        "artist_name": artist_name,
        "song_id": song_id,
        "title": title,
        "duration": duration,
        "year": year,
    })
}

fn listen_row(
    ts: i64,
    user_id: Value,
    first_name: &str,
    level: &str,
    song: &str,
    artist: &str,
    length: f64,
) -> Value {
    json!({
        "artist": artist,
        "auth": "Logged In",
        "firstName": first_name,
        "gender": "F",
        "itemInSession": 0,
        "lastName": "Summers",
        "length": length,
        "level": level,
        "location": "Phoenix-Mesa-Scottsdale, AZ",
        "method": "PUT",
        "page": "NextSong",
        "registration": 1540344794796.0,
        "sessionId": 139,
        "song": song,
        "status": 200,
        "ts": ts,
        "userAgent": "Mozilla/5.0 (Windows NT 6.1; WOW64)",
        "userId": user_id,
    })
}

fn nav_row(ts: i64, page: &str, user_id: &str) -> Value {
    json!({
        "artist": null,
        "auth": "Logged In",
        "firstName": "Kaylee",
        "gender": "F",
        "itemInSession": 1,
        "lastName": "Summers",
        "length": null,
        "level": "free",
        "location": "Phoenix-Mesa-Scottsdale, AZ",
        "method": "GET",
        "page": page,
        "registration": 1540344794796.0,
        "sessionId": 139,
        "song": null,
        "status": 200,
        "ts": ts,
        "userAgent": "Mozilla/5.0 (Windows NT 6.1; WOW64)",
        "userId": user_id,
    })
}

fn jsonl(rows: &[Value]) -> String {
    rows.iter().map(|row| format!("{}\n", row)).collect()
}

impl TestDataset {
    /// Three song documents (two sharing an artist) and two daily logs.
    pub fn create() -> Result<Self> {
        let dir = TempDir::new()?;
        let dataset = TestDataset {
            song_data: dir.path().join("song_data"),
            log_data: dir.path().join("log_data"),
            db_path: dir.path().join("sparkify.db"),
            _dir: dir,
        };

        dataset.write_song(
            "A/A/A/TRAAAAW128F429D538.json",
            &song_doc(
                CASUAL_SONG_ID,
                CASUAL_SONG_TITLE,
                CASUAL_SONG_DURATION,
                0,
                CASUAL_ARTIST_ID,
                "Casual",
                CASUAL_FIRST_LOCATION,
            ),
        )?;
        dataset.write_song(
            "A/A/B/TRAABJL12903CDCF1A.json",
            &song_doc(
                "SOUDSGM12AC9618304",
                "Insatiable (Instrumental Version)",
                266.39628,
                0,
                CASUAL_ARTIST_ID,
                "Casual",
                "Los Angeles, CA",
            ),
        )?;
        dataset.write_song(
            "A/B/C/TRABCEI128F424C983.json",
            &song_doc(
                KANYE_SONG_ID,
                "Stronger",
                311.84,
                2007,
                KANYE_ARTIST_ID,
                "Kanye West",
                "",
            ),
        )?;

        dataset.write_log(
            "2018/11/2018-11-11-events.json",
            &jsonl(&[
                listen_row(TS_FIRST, json!(KAYLEE_USER_ID), "Kaylee", "free", "Stronger", "Kanye West", 311.84),
                nav_row(TS_FIRST + 1000, "Home", KAYLEE_USER_ID),
                listen_row(TS_SECOND, json!(KAYLEE_USER_ID), "Kaylee", "free", "Nothing Like This", "Nobody", 100.0),
            ]),
        )?;
        dataset.write_log(
            "2018/11/2018-11-12-events.json",
            &jsonl(&[
                nav_row(TS_THIRD - 1000, "Logout", ""),
                listen_row(TS_THIRD, json!(KAYLEE_USER_ID), "Kaylee", "paid", CASUAL_SONG_TITLE, "Casual", CASUAL_SONG_DURATION),
                listen_row(TS_FIRST, json!(10), "Ryan", "free", "Stronger", "Kanye West", 311.9),
            ]),
        )?;

        Ok(dataset)
    }

    fn write(root: &Path, relative: &str, content: &str) -> Result<()> {
        let path = root.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, content)?;
        Ok(())
    }

    pub fn write_song(&self, relative: &str, doc: &Value) -> Result<()> {
        Self::write(&self.song_data, relative, &doc.to_string())
    }

    pub fn write_log(&self, relative: &str, content: &str) -> Result<()> {
        Self::write(&self.log_data, relative, content)
    }

    /// A log that sorts after the fixture logs: one good listen event for
    /// `user_id` followed by a malformed line.
    pub fn write_broken_log(&self, user_id: &str) -> Result<()> {
        let good = listen_row(TS_THIRD + 60_000, json!(user_id), "Lily", "paid", "Stronger", "Kanye West", 311.84);
        self.write_log(
            "2018/11/2018-11-13-events.json",
            &format!("{}\n{{\"page\": \"NextSong\"\n", good),
        )
    }

    pub fn config(&self) -> AppConfig {
        self.config_with(FailurePolicy::Skip, false)
    }

    pub fn config_with(&self, failure_policy: FailurePolicy, song_index: bool) -> AppConfig {
        let cli = CliConfig {
            db_path: Some(self.db_path.clone()),
            song_data: Some(self.song_data.clone()),
            log_data: Some(self.log_data.clone()),
            failure_policy,
            song_index,
            ..Default::default()
        };
        // Only fails on a broken fixture layout
        AppConfig::resolve(&cli, None).expect("fixture config resolves")
    }

    pub fn connect(&self) -> Connection {
        Connection::open(&self.db_path).expect("open fixture database")
    }
}

pub fn count(conn: &Connection, table: &str) -> usize {
    conn.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |r| {
        r.get::<_, i64>(0)
    })
    .map(|n| n as usize)
    .expect("count rows")
}
