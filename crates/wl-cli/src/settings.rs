//! Resolve file locations and engine settings from flags and the platform.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use wl_tui::EngineConfig;

const APPLICATION: &str = "whatlurkswithin";
const CONFIG_FILE: &str = "config.json";
const SAVE_FILE: &str = "save.json";

/// Command-line overrides plus the platform directories.
pub struct Settings {
    save: Option<PathBuf>,
    config: Option<PathBuf>,
    seed: Option<u64>,
    text_speed: Option<f64>,
    dirs: Option<ProjectDirs>,
}

impl Settings {
    pub fn new(
        save: Option<PathBuf>,
        config: Option<PathBuf>,
        seed: Option<u64>,
        text_speed: Option<f64>,
    ) -> Self {
        Self {
            save,
            config,
            seed,
            text_speed,
            dirs: ProjectDirs::from("", "", APPLICATION),
        }
    }

    /// Directory for the save file and the log.
    pub fn data_dir(&self) -> Result<&Path, String> {
        self.dirs
            .as_ref()
            .map(ProjectDirs::data_dir)
            .ok_or_else(|| "unable to determine the data directory; pass --save".to_string())
    }

    /// `explicit`, then `--save`, then the data directory.
    pub fn save_path(&self, explicit: Option<PathBuf>) -> Result<PathBuf, String> {
        match explicit.or_else(|| self.save.clone()) {
            Some(path) => Ok(path),
            None => Ok(self.data_dir()?.join(SAVE_FILE)),
        }
    }

    /// Engine settings: the config file if any, then flag overrides.
    ///
    /// An explicit `--config` must exist; the default location may not.
    pub fn engine_config(&self) -> Result<EngineConfig, String> {
        let default_file = self.dirs.as_ref().map(|d| d.config_dir().join(CONFIG_FILE));
        let config = match (&self.config, default_file) {
            (Some(path), _) => EngineConfig::load(path).map_err(|e| e.to_string())?,
            (None, Some(path)) if path.exists() => {
                EngineConfig::load(&path).map_err(|e| e.to_string())?
            }
            _ => EngineConfig::default(),
        };
        Ok(self.apply_overrides(config))
    }

    fn apply_overrides(&self, mut config: EngineConfig) -> EngineConfig {
        if let Some(seed) = self.seed {
            config = config.with_seed(seed);
        }
        if let Some(speed) = self.text_speed {
            config = config.with_text_speed(speed);
        }
        config
    }
}
