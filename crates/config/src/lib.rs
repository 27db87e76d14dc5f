use std::path::{Path, PathBuf};

use thiserror::Error;

mod overrides;
mod schema;

pub use schema::{Config, LogFormat};

pub const CONFIG_PATH_ENV: &str = "ISSUE_TRACKER_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("Validation error: {0}")]
    ValidationError(String),
}

/// Config file location: `$ISSUE_TRACKER_CONFIG` when set, else `config.json` in the asset dir.
pub fn config_file_path() -> Result<PathBuf, ConfigError> {
    match std::env::var(CONFIG_PATH_ENV) {
        Ok(path) if !path.trim().is_empty() => Ok(PathBuf::from(path.trim())),
        _ => Ok(utils::assets::config_path()?),
    }
}

/// Will always return config, falling back to defaults on missing/invalid files.
pub fn load_config_from_file(config_path: &Path) -> Config {
    match std::fs::read_to_string(config_path) {
        Ok(raw_config) => match serde_json::from_str::<Config>(&raw_config) {
            Ok(config) => config,
            Err(err) => {
                tracing::warn!(
                    path = %config_path.display(),
                    "Invalid config file, using defaults: {}",
                    err
                );
                Config::default()
            }
        },
        Err(err) => {
            if err.kind() == std::io::ErrorKind::NotFound {
                tracing::info!(path = %config_path.display(), "No config file found, using defaults");
            } else {
                tracing::warn!("Failed to read config file: {}", err);
            }
            Config::default()
        }
    }
}

/// File, then environment, then validation.
pub fn load() -> Result<Config, ConfigError> {
    let path = config_file_path()?;
    let mut config = load_config_from_file(&path);
    config.apply_env_overrides();
    config.validate()?;
    Ok(config)
}
