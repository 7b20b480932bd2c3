//! File logging. The terminal belongs to the UI, so events go to
//! `<data dir>/scanlist/logs/scanlist.log`; `RUST_LOG` overrides the filter.

use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub log_dir: PathBuf,
    pub default_filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_dir: log_directory(),
            default_filter: "info".to_string(),
        }
    }
}

pub fn log_directory() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("scanlist")
        .join("logs")
}

/// Install the global subscriber. Returns the log file path.
pub fn init(config: &LoggingConfig) -> anyhow::Result<PathBuf> {
    std::fs::create_dir_all(&config.log_dir)?;
    let path = config.log_dir.join("scanlist.log");
    let file = OpenOptions::new().create(true).append(true).open(&path)?;

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init()
        .map_err(|e| anyhow::anyhow!("logging already initialized: {e}"))?;

    tracing::info!(log_file = %path.display(), "logging initialized");
    Ok(path)
}
