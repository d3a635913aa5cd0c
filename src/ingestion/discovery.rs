use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::{DirEntry, WalkDir};

#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("Data directory not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    #[error("Failed to walk {}: {source}", .root.display())]
    Walk {
        root: PathBuf,
        #[source]
        source: walkdir::Error,
    },
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry
            .file_name()
            .to_str()
            .map(|name| name.starts_with('.'))
            .unwrap_or(false)
}

fn is_json_file(entry: &DirEntry) -> bool {
    entry.file_type().is_file() && entry.path().extension().is_some_and(|ext| ext == "json")
}

/// Every `*.json` file below `root`, as absolute paths sorted by a
/// depth-first walk ordered by file name. Hidden files and directories
/// (editor and notebook checkpoints) are skipped.
pub fn discover_json_files(root: &Path) -> Result<Vec<PathBuf>, DiscoveryError> {
    if !root.exists() {
        return Err(DiscoveryError::NotFound(root.to_path_buf()));
    }
    if !root.is_dir() {
        return Err(DiscoveryError::NotADirectory(root.to_path_buf()));
    }
    let root = root.canonicalize().map_err(|_| DiscoveryError::NotFound(root.to_path_buf()))?;

    let mut files = Vec::new();
    for entry in WalkDir::new(&root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !is_hidden(e))
    {
        let entry = entry.map_err(|source| DiscoveryError::Walk {
            root: root.clone(),
            source,
        })?;
        if is_json_file(&entry) {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}
