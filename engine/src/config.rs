//! Configuration loading for Mediq.
//!
//! Optional TOML file at `~/.mediq/config.toml`. Missing file means
//! defaults; an unreadable or unparsable file is reported and the defaults
//! are used (config problems are never fatal).

use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

const CONFIG_DIR: &str = ".mediq";
const CONFIG_FILE: &str = "config.toml";

/// Fixed display delay before the greeting turn appears.
pub const DEFAULT_GREETING_DELAY: Duration = Duration::from_millis(1200);
/// Fixed "thinking" delay between a submission and its reply.
pub const DEFAULT_THINKING_DELAY: Duration = Duration::from_millis(1000);
/// Knowledge document path used when the config does not override it.
pub const DEFAULT_KNOWLEDGE_PATH: &str = "data/conditions.json";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config at {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config at {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

impl ConfigError {
    #[must_use]
    pub fn path(&self) -> &PathBuf {
        match self {
            ConfigError::Read { path, .. } | ConfigError::Parse { path, .. } => path,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct MediqConfig {
    /// Override for the knowledge document path.
    pub knowledge_path: Option<PathBuf>,
    /// Greeting display delay in milliseconds.
    pub greeting_delay_ms: Option<u64>,
    /// Thinking delay in milliseconds.
    pub thinking_delay_ms: Option<u64>,
    /// Enable a high-contrast color palette.
    #[serde(default)]
    pub high_contrast: bool,
}

impl MediqConfig {
    pub fn load() -> Result<Option<Self>, ConfigError> {
        let path = match config_path() {
            Some(path) => path,
            None => return Ok(None),
        };
        if !path.exists() {
            return Ok(None);
        }

        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(err) => {
                tracing::warn!("Failed to read config at {:?}: {}", path, err);
                return Err(ConfigError::Read { path, source: err });
            }
        };

        match toml::from_str(&content) {
            Ok(config) => Ok(Some(config)),
            Err(err) => {
                tracing::warn!("Failed to parse config at {:?}: {}", path, err);
                Err(ConfigError::Parse { path, source: err })
            }
        }
    }

    #[must_use]
    pub fn path() -> Option<PathBuf> {
        config_path()
    }

    #[must_use]
    pub fn knowledge_path(&self) -> PathBuf {
        self.knowledge_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_KNOWLEDGE_PATH))
    }

    #[must_use]
    pub fn greeting_delay(&self) -> Duration {
        self.greeting_delay_ms
            .map_or(DEFAULT_GREETING_DELAY, Duration::from_millis)
    }

    #[must_use]
    pub fn thinking_delay(&self) -> Duration {
        self.thinking_delay_ms
            .map_or(DEFAULT_THINKING_DELAY, Duration::from_millis)
    }
}

fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(CONFIG_DIR).join(CONFIG_FILE))
}
