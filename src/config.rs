use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::settings::{self, GameMode, GameSettings};

/// Persisted user preferences: the last-used menu selections. Session data is
/// never persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    pub mode: GameMode,
    pub duration_secs: u64,
    pub target_size: f64,
    pub shrink_targets: bool,
}

impl Default for Config {
    fn default() -> Self {
        let s = GameSettings::default();
        Self {
            mode: s.mode,
            duration_secs: s.duration_secs,
            target_size: s.target_size,
            shrink_targets: s.shrink_targets,
        }
    }
}

impl Config {
    /// Turn stored preferences into session settings, re-clamping in case the
    /// file was edited by hand.
    pub fn to_settings(&self) -> GameSettings {
        let mut s = GameSettings::preset(
            self.mode,
            settings::clamp_duration(self.duration_secs),
            settings::clamp_size(self.target_size),
        );
        s.shrink_targets = s.shrink_targets || self.shrink_targets;
        s
    }
}

impl From<&GameSettings> for Config {
    fn from(s: &GameSettings) -> Self {
        Self {
            mode: s.mode,
            duration_secs: s.duration_secs,
            target_size: s.target_size,
            shrink_targets: s.shrink_targets,
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
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        let path = if let Some(pd) = ProjectDirs::from("", "", "aimdrill") {
            pd.config_dir().join("config.json")
        } else {
            PathBuf::from("aimdrill_config.json")
        };
        Self { path }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> Config {
        if let Ok(bytes) = fs::read(&self.path) {
            if let Ok(cfg) = serde_json::from_slice::<Config>(&bytes) {
                return cfg;
            }
        }
        Config::default()
    }

    fn save(&self, cfg: &Config) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg).unwrap_or_default();
        fs::write(&self.path, data)
    }
}
