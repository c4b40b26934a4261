//! Application configuration.
//!
//! Stored as JSON. Every field has a default, so a partial file (or no file
//! at all) is valid.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::effects::AmbientConfig;
use crate::error::ConfigError;
use crate::insight::SuggestionConfig;
use crate::physics::PhysicsParams;
use crate::zone::LayoutConfig;

/// Default key for the persisted snapshot.
pub const DEFAULT_STORAGE_KEY: &str = "thoughtspace.state";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub physics: PhysicsParams,
    pub ambient: AmbientConfig,
    pub layout: LayoutConfig,
    pub suggestions: SuggestionConfig,
    pub sound_enabled: bool,
    pub show_connections: bool,
    pub storage_key: String,
    /// Name attached to thoughts shared with collaborators.
    pub user_name: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            physics: PhysicsParams::default(),
            ambient: AmbientConfig::default(),
            layout: LayoutConfig::default(),
            suggestions: SuggestionConfig::default(),
            sound_enabled: true,
            show_connections: true,
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            user_name: "You".to_string(),
        }
    }
}

impl AppConfig {
    /// Read `path`, or return defaults when it does not exist.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no config file, using defaults");
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let io_err = |source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        fs::write(path, json).map_err(io_err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load(&dir.path().join("nope.json")).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.storage_key, "thoughtspace.state");
        assert_eq!(config.physics.friction, 0.98);
    }

    #[test]
    fn test_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{ "sound_enabled": false, "physics": { "gravity": 0.9 } }"#).unwrap();

        let config = AppConfig::load(&path).unwrap();
        assert!(!config.sound_enabled);
        assert_eq!(config.physics.gravity, 0.9);
        assert_eq!(config.physics.chaos, 0.1);
        assert_eq!(config.ambient.interval_ms, 33);
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sub").join("config.json");
        let mut config = AppConfig::default();
        config.user_name = "Robin".into();
        config.save(&path).unwrap();
        assert_eq!(AppConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn test_bad_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{ nope").unwrap();
        assert!(matches!(AppConfig::load(&path), Err(ConfigError::Parse { .. })));
    }
}
