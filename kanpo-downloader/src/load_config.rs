/// `load_config` module: Loads an optional YAML config file into the CLI's
/// [`CliConfig`], applying environment overrides.
///
/// # Responsibilities
/// - Parse user-supplied YAML into typed structs; every key is optional
/// - Fall back to built-in defaults when no file is given
/// - Apply `KANPO_CACHE_URL` on top of whatever the file says
///
/// # Errors
/// All errors use `anyhow::Error` and are surfaced at the CLI boundary.
use anyhow::Result;
use kanpo_downloader_core::config::ListingConfig;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info};

pub const CACHE_URL_ENV: &str = "KANPO_CACHE_URL";

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    pub listing: ListingConfig,
    pub download: DownloadSection,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DownloadSection {
    pub output_dir: PathBuf,
}

impl Default for DownloadSection {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("kanpo"),
        }
    }
}

/// Loads `path` when given, otherwise the defaults, then applies env overrides.
pub fn load_config<P: AsRef<Path>>(path: Option<P>) -> Result<CliConfig> {
    let mut config = match path {
        Some(path) => read_config_file(path.as_ref())?,
        None => {
            info!("No config file given, using defaults");
            CliConfig::default()
        }
    };

    if let Ok(url) = std::env::var(CACHE_URL_ENV) {
        if !url.trim().is_empty() {
            info!(cache_url = %url, "Overriding cache URL from environment");
            config.listing.cache_url = url;
        }
    }

    config.listing.trace_loaded();
    Ok(config)
}

fn read_config_file(path: &Path) -> Result<CliConfig> {
    info!(config_path = ?path, "Loading configuration from file");

    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            error!(error = ?e, config_path = ?path, "Failed to read config file");
            return Err(anyhow::anyhow!(
                "Failed to read config file {:?}: {}",
                path,
                e
            ));
        }
    };

    // An empty file is a valid, all-defaults config.
    if content.trim().is_empty() {
        return Ok(CliConfig::default());
    }

    match serde_yaml::from_str(&content) {
        Ok(conf) => {
            info!(config_path = ?path, "Parsed config YAML successfully");
            Ok(conf)
        }
        Err(e) => {
            error!(error = ?e, config_path = ?path, "Failed to parse config YAML");
            Err(anyhow::anyhow!("Failed to parse config YAML: {e}"))
        }
    }
}
