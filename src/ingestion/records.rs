//! Source document shapes, as they appear on disk.

use serde::{Deserialize, Deserializer};

/// One song file: a single song together with its artist.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct CatalogDocument {
    #[serde(default)]
    pub num_songs: Option<i64>,
    pub song_id: String,
    pub title: String,
    pub year: i32,
    pub duration: f64,
    pub artist_id: String,
    pub artist_name: String,
    #[serde(default)]
    pub artist_location: Option<String>,
    #[serde(default)]
    pub artist_latitude: Option<f64>,
    #[serde(default)]
    pub artist_longitude: Option<f64>,
}

/// One line of an activity log. Navigation rows (login, home, logout...)
/// leave most song and user fields empty, so nearly everything is optional.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct ActivityRow {
    pub ts: Option<i64>,
    pub page: Option<String>,
    #[serde(deserialize_with = "deserialize_user_id")]
    pub user_id: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub gender: Option<String>,
    pub level: Option<String>,
    pub song: Option<String>,
    pub artist: Option<String>,
    pub length: Option<f64>,
    pub session_id: Option<i64>,
    pub location: Option<String>,
    pub user_agent: Option<String>,
    pub auth: Option<String>,
    pub item_in_session: Option<i64>,
    pub method: Option<String>,
    pub status: Option<i64>,
    pub registration: Option<f64>,
}

/// Activity row with its 1-based line number in the source document.
#[derive(Clone, Debug, PartialEq)]
pub struct ActivityLine {
    pub line: usize,
    pub row: ActivityRow,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawUserId {
    Text(String),
    Number(i64),
}

/// Logs carry `userId` as a string, except for exports that wrote it as a
/// number. Logged-out rows have an empty string.
fn deserialize_user_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<RawUserId>::deserialize(deserializer)? {
        Some(RawUserId::Text(s)) if !s.trim().is_empty() => Some(s),
        Some(RawUserId::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}
