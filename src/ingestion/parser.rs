//! Decoding of raw song and log documents into typed records.

use super::records::{ActivityLine, ActivityRow, CatalogDocument};
use super::IngestError;
use std::path::Path;

/// Read a whole source document into memory.
pub fn read_document(path: &Path) -> Result<Vec<u8>, IngestError> {
    std::fs::read(path).map_err(|source| IngestError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// A song document holds exactly one JSON object.
pub fn parse_catalog_document(path: &Path, bytes: &[u8]) -> Result<CatalogDocument, IngestError> {
    serde_json::from_slice(bytes).map_err(|source| IngestError::Parse {
        path: path.to_path_buf(),
        line: None,
        source,
    })
}

/// A log document holds one JSON object per line. Blank lines are skipped,
/// the first malformed line fails the whole document.
pub fn parse_activity_document(
    path: &Path,
    bytes: &[u8],
) -> Result<Vec<ActivityLine>, IngestError> {
    let mut lines = Vec::new();
    for (index, raw_line) in bytes.split(|b| *b == b'\n').enumerate() {
        let raw_line = raw_line.trim_ascii();
        if raw_line.is_empty() {
            continue;
        }
        let row: ActivityRow =
            serde_json::from_slice(raw_line).map_err(|source| IngestError::Parse {
                path: path.to_path_buf(),
                line: Some(index + 1),
                source,
            })?;
        lines.push(ActivityLine {
            line: index + 1,
            row,
        });
    }
    Ok(lines)
}
