// Server rules file: which servers to watch and what to enforce on each.

use crate::domain::Fence;
use crate::use_cases::{
    DEFAULT_GRACE_PERIOD, DEFAULT_PUNISH_MESSAGE, DEFAULT_WARNING_MESSAGE, Enforcement,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to access config file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub servers: Vec<ServerConfig>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub password: String,
    #[serde(default = "default_punish_after_seconds")]
    pub punish_after_seconds: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub punish_message: Option<String>,
    #[serde(default)]
    pub allies_fence: Vec<Fence>,
    #[serde(default)]
    pub axis_fence: Vec<Fence>,
}

fn default_punish_after_seconds() -> u64 {
    DEFAULT_GRACE_PERIOD.as_secs()
}

impl ServerConfig {
    pub fn base_url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }

    pub fn enforcement(&self) -> Enforcement {
        Enforcement {
            grace_period: Duration::from_secs(self.punish_after_seconds),
            warning_template: self
                .warning_message
                .clone()
                .unwrap_or_else(|| DEFAULT_WARNING_MESSAGE.to_string()),
            punish_template: self
                .punish_message
                .clone()
                .unwrap_or_else(|| DEFAULT_PUNISH_MESSAGE.to_string()),
            allies_fences: self.allies_fence.clone(),
            axis_fences: self.axis_fence.clone(),
        }
    }
}

impl Config {
    pub fn parse(path: &Path, raw: &str) -> Result<Self, ConfigError> {
        toml::from_str(raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Reads the rules file, writing an empty one first when it does not exist yet.
    pub async fn load_or_create(path: &Path) -> Result<Self, ConfigError> {
        match tokio::fs::read_to_string(path).await {
            Ok(raw) => Self::parse(path, &raw),
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!(
                    path = %path.display(),
                    "config file missing, creating an empty one"
                );
                let config = Self::default();
                config.save(path).await?;
                Ok(config)
            }
            Err(source) => Err(ConfigError::Io {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    pub async fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let raw = toml::to_string_pretty(self)?;
        tokio::fs::write(path, raw)
            .await
            .map_err(|source| ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })
    }
}
