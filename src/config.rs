use directories::ProjectDirs;
use log::warn;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{GlanceError, Result};
use crate::pacing::{ReadingMode, ReadingSettings};

/// Persisted reading preferences
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub wpm: u32,
    pub mode: ReadingMode,
    pub chunk_size: usize,
    /// Share of each word shown in bold when emphasis is on
    pub bold_ratio: f64,
    pub emphasis: bool,
    pub show_orp: bool,
    /// Words on each side of the current one shown in the context view
    pub context_radius: usize,
}

impl Default for Config {
    fn default() -> Self {
        let settings = ReadingSettings::default();
        Self {
            wpm: settings.wpm,
            mode: settings.mode,
            chunk_size: settings.chunk_size,
            bold_ratio: 0.5,
            emphasis: false,
            show_orp: true,
            context_radius: 6,
        }
    }
}

impl Config {
    pub fn reading_settings(&self) -> Result<ReadingSettings> {
        ReadingSettings::new(self.wpm, self.mode, self.chunk_size)
    }

    pub fn validate(&self) -> Result<()> {
        self.reading_settings()?;
        if !(0.0..=1.0).contains(&self.bold_ratio) {
            return Err(GlanceError::InvalidConfiguration(format!(
                "bold ratio {} is outside 0..=1",
                self.bold_ratio
            )));
        }
        Ok(())
    }

    /// Adopt the pacing part of `settings`, keeping display preferences
    pub fn with_settings(self, settings: &ReadingSettings) -> Self {
        Self {
            wpm: settings.wpm,
            mode: settings.mode,
            chunk_size: settings.chunk_size,
            ..self
        }
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
    pub fn new() -> Self {
        let path = if let Some(pd) = ProjectDirs::from("", "", "glance") {
            pd.config_dir().join("config.json")
        } else {
            PathBuf::from("glance_config.json")
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
    /// Missing, unreadable or invalid files fall back to the defaults
    fn load(&self) -> Config {
        if let Ok(bytes) = fs::read(&self.path) {
            match serde_json::from_slice::<Config>(&bytes) {
                Ok(cfg) => match cfg.validate() {
                    Ok(()) => return cfg,
                    Err(e) => warn!("ignoring config at {:?}: {e}", self.path),
                },
                Err(e) => warn!("unreadable config at {:?}: {e}", self.path),
            }
        }
        Config::default()
    }

    fn save(&self, cfg: &Config) -> Result<()> {
        cfg.validate()?;
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg)?;
        fs::write(&self.path, data)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use tempfile::tempdir;

    #[test]
    fn roundtrip_default_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        let store = FileConfigStore::with_path(&path);
        let cfg = Config::default();
        store.save(&cfg).unwrap();
        let loaded = store.load();
        assert_eq!(cfg, loaded);
    }

    #[test]
    fn save_and_load_custom_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        let store = FileConfigStore::with_path(&path);
        let cfg = Config {
            wpm: 480,
            mode: ReadingMode::Chunk,
            chunk_size: 2,
            bold_ratio: 0.4,
            emphasis: true,
            show_orp: false,
            context_radius: 10,
        };
        store.save(&cfg).unwrap();
        let loaded = store.load();
        assert_eq!(cfg, loaded);
    }

    #[test]
    fn invalid_file_falls_back_to_default() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"wpm": 0}"#).unwrap();
        assert_eq!(FileConfigStore::with_path(&path).load(), Config::default());

        fs::write(&path, "{ nope").unwrap();
        assert_eq!(FileConfigStore::with_path(&path).load(), Config::default());
    }

    #[test]
    fn partial_file_fills_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"wpm": 520, "mode": "flow"}"#).unwrap();
        let cfg = FileConfigStore::with_path(&path).load();
        assert_eq!(cfg.wpm, 520);
        assert_eq!(cfg.mode, ReadingMode::Flow);
        assert_eq!(cfg.chunk_size, Config::default().chunk_size);
    }

    #[test]
    fn save_rejects_invalid_config() {
        let dir = tempdir().unwrap();
        let store = FileConfigStore::with_path(dir.path().join("config.json"));
        let cfg = Config {
            bold_ratio: 1.5,
            ..Config::default()
        };
        assert_matches!(store.save(&cfg), Err(GlanceError::InvalidConfiguration(_)));
        let cfg = Config {
            chunk_size: 0,
            ..Config::default()
        };
        assert_matches!(store.save(&cfg), Err(GlanceError::InvalidConfiguration(_)));
    }

    #[test]
    fn with_settings_keeps_display_preferences() {
        let cfg = Config {
            emphasis: true,
            ..Config::default()
        };
        let settings = ReadingSettings::new(700, ReadingMode::Classic, 1).unwrap();
        let updated = cfg.with_settings(&settings);
        assert_eq!(updated.wpm, 700);
        assert_eq!(updated.mode, ReadingMode::Classic);
        assert!(updated.emphasis);
    }
}
