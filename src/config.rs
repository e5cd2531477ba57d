use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::app_dirs::AppDirs;
use crate::session::{Mode, SessionSettings};

/// Persisted user settings. Missing fields take their defaults.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub mode: Mode,
    /// Provider-generated word list to use instead of a built-in one.
    pub word_list: Option<PathBuf>,
    pub builtin_list: String,
    pub shuffle: bool,
    pub tick_rate_ms: u64,
    pub error_flash_ms: u64,
    pub sample_interval_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mode: Mode::Endless,
            word_list: None,
            builtin_list: "kana".to_string(),
            shuffle: false,
            tick_rate_ms: 100,
            error_flash_ms: 200,
            sample_interval_secs: 2,
        }
    }
}

impl Config {
    pub fn tick_rate(&self) -> Duration {
        Duration::from_millis(self.tick_rate_ms.max(1))
    }

    pub fn session_settings(&self) -> SessionSettings {
        SessionSettings {
            mode: self.mode,
            shuffle: self.shuffle,
            error_flash: Duration::from_millis(self.error_flash_ms),
            sample_interval: Duration::from_secs(self.sample_interval_secs.max(1)),
        }
    }
}

pub trait ConfigStore {
    fn load(&self) -> Config;
    fn save(&self, cfg: &Config) -> std::io::Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    pub fn new() -> Self {
        Self {
            path: AppDirs::config_path(),
        }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> Config {
        let Ok(bytes) = fs::read(&self.path) else {
            return Config::default();
        };
        serde_json::from_slice::<Config>(&bytes).unwrap_or_else(|err| {
            log::warn!("ignoring malformed config {}: {err}", self.path.display());
            Config::default()
        })
    }

    fn save(&self, cfg: &Config) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg)?;
        fs::write(&self.path, data)
    }
}
