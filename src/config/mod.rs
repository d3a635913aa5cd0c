mod file_config;

pub use file_config::FileConfig;

use crate::ingestion::{FailurePolicy, DEFAULT_DURATION_TOLERANCE};
use anyhow::{anyhow, bail, Result};
use clap::ValueEnum;
use std::path::{Path, PathBuf};

pub const DEFAULT_SONG_DATA: &str = "data/song_data";
pub const DEFAULT_LOG_DATA: &str = "data/log_data";

/// How per-file progress is reported.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum ProgressMode {
    /// One log line per file.
    #[default]
    Log,
    /// Interactive progress bar.
    Bar,
}

/// CLI arguments that can be used for config resolution.
/// This struct mirrors the CLI arguments that can be overridden by TOML config.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub db_path: Option<PathBuf>,
    pub song_data: Option<PathBuf>,
    pub log_data: Option<PathBuf>,
    pub failure_policy: FailurePolicy,
    pub progress: ProgressMode,
    pub duration_tolerance: Option<f64>,
    pub song_index: bool,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub db_path: PathBuf,
    pub song_data: PathBuf,
    pub log_data: PathBuf,
    pub failure_policy: FailurePolicy,
    pub progress: ProgressMode,
    pub duration_tolerance: f64,
    pub song_index: bool,
}

impl AppConfig {
    /// Resolve configuration from CLI arguments and optional TOML file config.
    /// TOML values override CLI values where present.
    pub fn resolve(cli: &CliConfig, file_config: Option<FileConfig>) -> Result<Self> {
        let file = file_config.unwrap_or_default();

        let db_path = file
            .db_path
            .map(PathBuf::from)
            .or_else(|| cli.db_path.clone())
            .ok_or_else(|| anyhow!("db_path must be specified via --db-path or in config file"))?;

        let song_data = file
            .song_data
            .map(PathBuf::from)
            .or_else(|| cli.song_data.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SONG_DATA));
        validate_data_dir("song_data", &song_data)?;

        let log_data = file
            .log_data
            .map(PathBuf::from)
            .or_else(|| cli.log_data.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_DATA));
        validate_data_dir("log_data", &log_data)?;

        let failure_policy = match file.failure_policy {
            Some(s) => parse_value_enum::<FailurePolicy>("failure_policy", &s)?,
            None => cli.failure_policy,
        };
        let progress = match file.progress {
            Some(s) => parse_value_enum::<ProgressMode>("progress", &s)?,
            None => cli.progress,
        };

        let duration_tolerance = file
            .duration_tolerance
            .or(cli.duration_tolerance)
            .unwrap_or(DEFAULT_DURATION_TOLERANCE);
        if !duration_tolerance.is_finite() || duration_tolerance < 0.0 {
            bail!(
                "duration_tolerance must be a finite number of seconds >= 0, got {}",
                duration_tolerance
            );
        }

        let song_index = file.song_index.unwrap_or(cli.song_index);

        Ok(Self {
            db_path,
            song_data,
            log_data,
            failure_policy,
            progress,
            duration_tolerance,
            song_index,
        })
    }
}

fn validate_data_dir(name: &str, path: &Path) -> Result<()> {
    if !path.exists() {
        bail!("{} directory does not exist: {:?}", name, path);
    }
    if !path.is_dir() {
        bail!("{} is not a directory: {:?}", name, path);
    }
    Ok(())
}

/// Parses a config string with clap's ValueEnum, ignoring case.
fn parse_value_enum<T: ValueEnum>(key: &str, s: &str) -> Result<T> {
    T::from_str(s, true).map_err(|_| anyhow!("Invalid value for {}: {:?}", key, s))
}
