// config.rs

use crate::error::ConfigError;
use crate::poll::DEFAULT_REMINDER_WINDOW_SECS;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

const MIN_TICK_INTERVAL_MS: u64 = 100;
const MAX_REMINDER_WINDOW_SECS: u64 = 366 * 24 * 3600;

fn default_reminder_window_secs() -> u64 {
    DEFAULT_REMINDER_WINDOW_SECS
}
fn default_tick_interval_ms() -> u64 {
    1000
}
fn default_log_filter() -> String {
    "dayplanner=info".to_string()
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", "dayplanner")
}

pub fn default_config_path() -> PathBuf {
    project_dirs()
        .map(|dirs| dirs.config_dir().join("config.json"))
        .unwrap_or_else(|| PathBuf::from("config.json"))
}

pub fn default_log_path() -> PathBuf {
    project_dirs()
        .map(|dirs| dirs.data_local_dir().join("dayplanner.log"))
        .unwrap_or_else(|| PathBuf::from("dayplanner.log"))
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// How long before the due time the reminder popup appears.
    #[serde(default = "default_reminder_window_secs")]
    pub reminder_window_secs: u64,
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            reminder_window_secs: default_reminder_window_secs(),
            tick_interval_ms: default_tick_interval_ms(),
            log_filter: default_log_filter(),
        }
    }
}

impl Config {
    /// Reads the config at `path`; a missing file means defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        let config: Config = serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let window = self.reminder_window_secs;
        if window == 0 || window % 60 != 0 || window > MAX_REMINDER_WINDOW_SECS {
            return Err(ConfigError::Invalid(format!(
                "reminder_window_secs must be a whole number of minutes between 60 and \
                 {MAX_REMINDER_WINDOW_SECS}, got {window}"
            )));
        }
        if self.tick_interval_ms < MIN_TICK_INTERVAL_MS {
            return Err(ConfigError::Invalid(format!(
                "tick_interval_ms must be at least {MIN_TICK_INTERVAL_MS}"
            )));
        }
        Ok(())
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}
