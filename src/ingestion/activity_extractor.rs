//! Activity logs -> listen events.

use super::records::ActivityLine;
use super::IngestError;

/// Page value marking a song play. Every other page is navigation.
pub const LISTEN_EVENT_PAGE: &str = "NextSong";

/// A song play taken from an activity log. Only lives while its log
/// document is being processed.
#[derive(Clone, Debug, PartialEq)]
pub struct ActivityEvent {
    pub line: usize,
    pub timestamp_ms: i64,
    pub action: String,
    pub user_id: String,
    pub first_name: String,
    pub last_name: String,
    pub gender: String,
    pub subscription_level: String,
    pub song_title: String,
    pub artist_name: String,
    pub duration: f64,
    pub session_id: i64,
    pub location: String,
    pub user_agent: String,
}

fn required<T: Clone>(value: &Option<T>, line: usize, field: &'static str) -> Result<T, IngestError> {
    value
        .clone()
        .ok_or(IngestError::MissingField { line, field })
}

/// Keep only listen events, in document order.
pub fn extract_listen_events(lines: &[ActivityLine]) -> Result<Vec<ActivityEvent>, IngestError> {
    lines
        .iter()
        .filter(|l| l.row.page.as_deref() == Some(LISTEN_EVENT_PAGE))
        .map(|ActivityLine { line, row }| {
            let line = *line;
            Ok(ActivityEvent {
                line,
                timestamp_ms: required(&row.ts, line, "ts")?,
                action: LISTEN_EVENT_PAGE.to_string(),
                user_id: required(&row.user_id, line, "userId")?,
                first_name: required(&row.first_name, line, "firstName")?,
                last_name: required(&row.last_name, line, "lastName")?,
                gender: required(&row.gender, line, "gender")?,
                subscription_level: required(&row.level, line, "level")?,
                song_title: required(&row.song, line, "song")?,
                artist_name: required(&row.artist, line, "artist")?,
                duration: required(&row.length, line, "length")?,
                session_id: required(&row.session_id, line, "sessionId")?,
                location: required(&row.location, line, "location")?,
                user_agent: required(&row.user_agent, line, "userAgent")?,
            })
        })
        .collect()
}
