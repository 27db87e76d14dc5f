use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

use crate::ConfigError;

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_public_dir() -> PathBuf {
    PathBuf::from("public")
}

fn default_shutdown_timeout_secs() -> u64 {
    10
}

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, EnumString, Display, Default,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub host: String,
    /// `0` asks the OS for a free port.
    pub port: u16,
    /// Store connection string. `None` means a SQLite file in the asset dir.
    pub database_url: Option<String>,
    /// Served under `/public`.
    pub public_dir: PathBuf,
    pub log_format: LogFormat,
    pub shutdown_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            database_url: None,
            public_dir: default_public_dir(),
            log_format: LogFormat::default(),
            shutdown_timeout_secs: default_shutdown_timeout_secs(),
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.host.trim().is_empty() {
            return Err(ConfigError::ValidationError("host must not be empty".to_string()));
        }
        if let Some(url) = &self.database_url
            && url.trim().is_empty()
        {
            return Err(ConfigError::ValidationError(
                "database_url must not be empty when set".to_string(),
            ));
        }
        Ok(())
    }

    pub fn database_url(&self) -> Result<String, ConfigError> {
        match &self.database_url {
            Some(url) => Ok(url.clone()),
            None => {
                let path = utils::assets::database_path()?;
                Ok(format!("sqlite://{}?mode=rwc", path.to_string_lossy()))
            }
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn defaults_validate() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.bind_address(), "127.0.0.1:3000");
    }

    #[test]
    fn blank_values_fail_validation() {
        let blank_host = Config {
            host: "  ".to_string(),
            ..Config::default()
        };
        assert!(matches!(
            blank_host.validate(),
            Err(ConfigError::ValidationError(_))
        ));

        let blank_url = Config {
            database_url: Some(String::new()),
            ..Config::default()
        };
        assert!(matches!(
            blank_url.validate(),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn explicit_database_url_is_used_verbatim() {
        let config = Config {
            database_url: Some("postgres://localhost/issues".to_string()),
            ..Config::default()
        };
        assert_eq!(config.database_url().unwrap(), "postgres://localhost/issues");
    }

    #[test]
    fn log_format_parses_case_insensitively() {
        assert_eq!(LogFormat::from_str("JSON").unwrap(), LogFormat::Json);
        assert_eq!(LogFormat::from_str("text").unwrap(), LogFormat::Text);
        assert!(LogFormat::from_str("xml").is_err());
    }
}
