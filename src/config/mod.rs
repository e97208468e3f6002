mod schema;
mod validation;

pub use schema::{Config, FanScoreEntry};
pub use validation::validate_config;

use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

/// Get the config directory path (~/.config/pure-honours/)
pub fn get_config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home.join(".config").join("pure-honours"))
}

/// Get the default config file path (~/.config/pure-honours/config.yaml)
pub fn get_config_path() -> Result<PathBuf> {
    Ok(get_config_dir()?.join("config.yaml"))
}

/// Directory history files are written to
pub fn history_dir(config: &Config) -> Result<PathBuf> {
    match &config.history_dir {
        Some(dir) => Ok(expand_home(dir)),
        None => Ok(get_config_dir()?.join("history")),
    }
}

/// Directory CSV exports are written to
pub fn export_dir(config: &Config) -> PathBuf {
    config
        .export_dir
        .as_deref()
        .map(expand_home)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Expand a leading "~/" to the home directory
fn expand_home(path: &str) -> PathBuf {
    match (path.strip_prefix("~/"), dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(path),
    }
}

/// Work out which config file to read
///
/// An explicit `path` must exist. Without one, the default path
/// (~/.config/pure-honours/config.yaml) is used if present; `None` means
/// built-in defaults.
pub fn resolve_config_path(path: Option<PathBuf>) -> Result<Option<PathBuf>> {
    match path {
        Some(p) => {
            if !p.exists() {
                anyhow::bail!("Config file not found at {}", p.display());
            }
            Ok(Some(p))
        }
        None => {
            let default_path = get_config_path()?;
            Ok(default_path.exists().then_some(default_path))
        }
    }
}

/// Load configuration from a YAML file
///
/// # Arguments
///
/// * `path` - Optional path to config file. If None, uses default path
///   (~/.config/pure-honours/config.yaml), and a missing default file means
///   built-in defaults.
///
/// # Errors
///
/// Returns an error if:
/// - An explicitly given config file does not exist
/// - The config file cannot be read
/// - The YAML cannot be parsed
pub fn load_config(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match resolve_config_path(path)? {
        Some(p) => p,
        None => return Ok(Config::default()),
    };

    let config_content = fs::read_to_string(&config_path)
        .with_context(|| format!("Failed to read config file at {}", config_path.display()))?;

    let config: Config = serde_saphyr::from_str(&config_content)
        .with_context(|| format!("Failed to parse config: invalid YAML in {}", config_path.display()))?;

    Ok(config)
}
