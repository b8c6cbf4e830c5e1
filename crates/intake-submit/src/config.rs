//! Submission settings, loadable from a TOML file.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::recipient::RecipientEmail;

/// Backend used when no server is configured.
pub const DEFAULT_SERVER_URL: &str = "https://icon5-8005.iconluxury.today";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("failed to write config file {path}: {message}")]
    Write { path: PathBuf, message: String },

    #[error("unknown currency '{0}': expected USD or EUR")]
    UnknownCurrency(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    #[default]
    Usd,
    Eur,
}

impl Currency {
    pub const fn as_str(self) -> &'static str {
        match self {
            Currency::Usd => "USD",
            Currency::Eur => "EUR",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Currency {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "USD" => Ok(Currency::Usd),
            "EUR" => Ok(Currency::Eur),
            _ => Err(ConfigError::UnknownCurrency(s.to_string())),
        }
    }
}

/// Flags forwarded to the backend with every sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SubmitOptions {
    pub is_icon_distro: bool,
    pub is_ai_mode: bool,
    pub skip_data_warehouse: bool,
    pub is_new_distro: bool,
    pub currency: Currency,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubmitConfig {
    pub server_url: String,
    pub recipient: Option<RecipientEmail>,
    pub options: SubmitOptions,
}

impl Default for SubmitConfig {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
            recipient: None,
            options: SubmitOptions::default(),
        }
    }
}

impl SubmitConfig {
    /// Loads settings from `path`. Missing keys take their defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        info!(path = %path.display(), server = %config.server_url, "loaded submit config");
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let write_error = |message: String| ConfigError::Write {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| write_error(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| write_error(e.to_string()))
    }

    /// Full URL of `endpoint` on the configured server.
    pub fn endpoint_url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.server_url.trim_end_matches('/'), endpoint)
    }
}
