use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading one source file.
///
/// Every variant is scoped to the file being processed; the batch loader
/// decides whether the run continues.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("IO error reading {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed JSON in {}{}: {source}", .path.display(), line_suffix(.line))]
    Parse {
        path: PathBuf,
        /// 1-based line for newline-delimited documents.
        line: Option<usize>,
        #[source]
        source: serde_json::Error,
    },

    #[error("Listen event on line {line} is missing '{field}'")]
    MissingField { line: usize, field: &'static str },

    #[error("Timestamp {0} ms is out of range")]
    InvalidTimestamp(i64),

    #[error("Store error: {0}")]
    Store(#[from] anyhow::Error),
}

fn line_suffix(line: &Option<usize>) -> String {
    match line {
        Some(line) => format!(" at line {}", line),
        None => String::new(),
    }
}
