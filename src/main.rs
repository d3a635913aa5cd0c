use anyhow::{bail, Context, Result};
use clap::Parser;
use sparkify_etl::config::{AppConfig, CliConfig, FileConfig, ProgressMode};
use sparkify_etl::ingestion::{BatchReport, FailurePolicy};
use sparkify_etl::{run_etl, RunSummary};
use std::path::PathBuf;
use tracing::{error, info, level_filters::LevelFilter};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn parse_path(s: &str) -> Result<PathBuf> {
    let path_buf = PathBuf::from(s);
    let original_path = match path_buf.canonicalize() {
        Ok(path) => path,
        Err(msg) => {
            if msg.kind() == std::io::ErrorKind::NotFound {
                path_buf
            } else {
                return Err(msg).with_context(|| format!("Error resolving path: {}", s));
            }
        }
    };
    if original_path.is_absolute() {
        return Ok(original_path);
    }
    let cwd = std::env::current_dir()?;
    Ok(cwd.join(original_path))
}

#[derive(Parser, Debug)]
#[command(name = "sparkify-etl")]
#[command(about = "Load song metadata and listening logs into a SQLite star schema")]
struct CliArgs {
    /// Path to TOML configuration file. Values in the file override CLI arguments.
    #[clap(long, value_parser = parse_path)]
    pub config: Option<PathBuf>,

    /// Path to the SQLite database file. Created if missing.
    /// Can also be specified in config file.
    #[clap(long, value_parser = parse_path)]
    pub db_path: Option<PathBuf>,

    /// Root of the song metadata files [default: data/song_data]
    #[clap(long, value_parser = parse_path)]
    pub song_data: Option<PathBuf>,

    /// Root of the activity log files [default: data/log_data]
    #[clap(long, value_parser = parse_path)]
    pub log_data: Option<PathBuf>,

    /// What to do when a file fails to load.
    #[clap(long, default_value = "skip")]
    pub failure_policy: FailurePolicy,

    /// How to report per-file progress.
    #[clap(long, default_value = "log")]
    pub progress: ProgressMode,

    /// Maximum difference in seconds between a logged song length and a
    /// catalog song duration for them to match [default: 0.001]
    #[clap(long)]
    pub duration_tolerance: Option<f64>,

    /// Resolve songplays against an in-memory song index instead of querying
    /// the database for every event.
    #[clap(long, default_value_t = false)]
    pub song_index: bool,
}

/// Convert CLI args to CliConfig for config resolution
impl From<&CliArgs> for CliConfig {
    fn from(args: &CliArgs) -> Self {
        CliConfig {
            db_path: args.db_path.clone(),
            song_data: args.song_data.clone(),
            log_data: args.log_data.clone(),
            failure_policy: args.failure_policy,
            progress: args.progress,
            duration_tolerance: args.duration_tolerance,
            song_index: args.song_index,
        }
    }
}

fn log_report(label: &str, report: &BatchReport) {
    info!(
        "{}: {}/{} files loaded, {} rows",
        label, report.loaded, report.total, report.stats.rows
    );
    for failure in &report.failed {
        error!("  {}", failure);
    }
}

fn log_summary(summary: &RunSummary) {
    info!("");
    info!("Load Summary");
    info!("============");
    log_report("Song data", &summary.songs);
    log_report("Log data", &summary.logs);
    info!(
        "Listen events: {}, matched to catalog: {}",
        summary.logs.stats.listen_events, summary.logs.stats.matched
    );
    info!("");
    info!("Database contains:");
    info!("  {} songs", summary.counts.songs);
    info!("  {} artists", summary.counts.artists);
    info!("  {} time rows", summary.counts.time);
    info!("  {} users", summary.counts.users);
    info!("  {} songplays", summary.counts.songplays);
}

fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()
        .context("Failed to initialize logging")?;

    let file_config = match &cli_args.config {
        Some(path) => {
            info!("Loading configuration from {:?}", path);
            Some(FileConfig::load(path)?)
        }
        None => None,
    };

    // Resolve final configuration (TOML overrides CLI)
    let cli_config: CliConfig = (&cli_args).into();
    let app_config = AppConfig::resolve(&cli_config, file_config)?;

    info!("Configuration loaded:");
    info!("  db_path: {:?}", app_config.db_path);
    info!("  song_data: {:?}", app_config.song_data);
    info!("  log_data: {:?}", app_config.log_data);
    info!("  failure_policy: {:?}", app_config.failure_policy);
    info!("  duration_tolerance: {}", app_config.duration_tolerance);
    info!("  song_index: {}", app_config.song_index);

    let summary = run_etl(&app_config)?;
    log_summary(&summary);

    let failed = summary.failed_files();
    if failed > 0 {
        bail!("{} files failed to load", failed);
    }
    info!("Load completed successfully!");
    Ok(())
}
