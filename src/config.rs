use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use crate::api::DEFAULT_API_URL;

pub const DEFAULT_LOG_FILTER: &str = "info,hyper_util=warn,reqwest=warn,hyper=warn";

#[derive(Debug, Clone)]
pub struct Config {
    pub api_url: String,
    pub data_dir: PathBuf,
}

impl Config {
    pub fn new(api_url: Option<String>, data_dir: Option<PathBuf>) -> Self {
        let api_url = api_url
            .map(|u| u.trim().to_string())
            .filter(|u| !u.is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        Self {
            api_url,
            data_dir: data_dir.unwrap_or_else(default_data_dir),
        }
    }

    pub fn prefs_path(&self) -> PathBuf {
        self.data_dir.join("prefs.db")
    }

    pub fn log_path(&self) -> PathBuf {
        self.data_dir.join("jobboard.log")
    }
}

fn default_data_dir() -> PathBuf {
    // Use XDG data directory or fallback
    if let Some(proj_dirs) = directories::ProjectDirs::from("", "", "jobboard") {
        proj_dirs.data_dir().to_path_buf()
    } else {
        PathBuf::from(".jobboard")
    }
}

/// Sends tracing output to `path`; the terminal belongs to the UI.
/// `RUST_LOG` overrides the default filter.
pub fn init_logging(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file {}", path.display()))?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_env_filter(filter)
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to install logger: {}", e))?;
    Ok(())
}
