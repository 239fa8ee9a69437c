use crate::error::{GameError, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_DURATION_SECS: u32 = 15;
pub const DEFAULT_CARROT_COUNT: u32 = 10;
pub const DEFAULT_BUG_COUNT: u32 = 7;

/// Settings persisted between runs. Scores are never stored here.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    pub duration_secs: u32,
    pub carrot_count: u32,
    pub bug_count: u32,
    pub sound: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            duration_secs: DEFAULT_DURATION_SECS,
            carrot_count: DEFAULT_CARROT_COUNT,
            bug_count: DEFAULT_BUG_COUNT,
            sound: true,
        }
    }
}

impl Config {
    pub fn game_config(&self) -> Result<GameConfig> {
        GameBuilder::new()
            .with_game_duration(self.duration_secs)
            .with_carrot_count(self.carrot_count)
            .with_bug_count(self.bug_count)
            .build()
    }
}

/// Parameters of a single session, fixed once the game is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameConfig {
    duration_secs: u32,
    carrot_count: u32,
    bug_count: u32,
}

impl GameConfig {
    pub fn duration_secs(&self) -> u32 {
        self.duration_secs
    }

    pub fn carrot_count(&self) -> u32 {
        self.carrot_count
    }

    pub fn bug_count(&self) -> u32 {
        self.bug_count
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            duration_secs: DEFAULT_DURATION_SECS,
            carrot_count: DEFAULT_CARROT_COUNT,
            bug_count: DEFAULT_BUG_COUNT,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct GameBuilder {
    duration_secs: Option<u32>,
    carrot_count: Option<u32>,
    bug_count: Option<u32>,
}

impl GameBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_game_duration(mut self, secs: u32) -> Self {
        self.duration_secs = Some(secs);
        self
    }

    pub fn with_carrot_count(mut self, count: u32) -> Self {
        self.carrot_count = Some(count);
        self
    }

    pub fn with_bug_count(mut self, count: u32) -> Self {
        self.bug_count = Some(count);
        self
    }

    /// Unset values fall back to the defaults. A zero duration is rejected
    /// since the countdown could never run.
    pub fn build(self) -> Result<GameConfig> {
        let duration_secs = self.duration_secs.unwrap_or(DEFAULT_DURATION_SECS);
        if duration_secs == 0 {
            return Err(GameError::InvalidConfig(
                "game duration must be at least one second".to_string(),
            ));
        }

        let config = GameConfig {
            duration_secs,
            carrot_count: self.carrot_count.unwrap_or(DEFAULT_CARROT_COUNT),
            bug_count: self.bug_count.unwrap_or(DEFAULT_BUG_COUNT),
        };
        log::debug!("built game config {:?}", config);
        Ok(config)
    }
}

pub trait ConfigStore {
    fn load(&self) -> Config;
    fn save(&self, cfg: &Config) -> Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        let path = if let Some(pd) = ProjectDirs::from("", "", "carrot-field") {
            pd.config_dir().join("config.json")
        } else {
            PathBuf::from("carrot_field_config.json")
        };
        Self { path }
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
        match fs::read(&self.path) {
            Ok(bytes) => match serde_json::from_slice::<Config>(&bytes) {
                Ok(cfg) => return cfg,
                Err(e) => log::warn!("ignoring malformed config {}: {}", self.path.display(), e),
            },
            Err(e) => log::debug!("no config at {}: {}", self.path.display(), e),
        }
        Config::default()
    }

    fn save(&self, cfg: &Config) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg).unwrap_or_default();
        fs::write(&self.path, data)?;
        log::info!("saved config to {}", self.path.display());
        Ok(())
    }
}
