//! Application configuration loaded from an optional YAML file.

use clicker_core::{validate_config, GameConfig, ValidationError};
use persistence::default_save_path;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config yaml: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("tick period must be > 0 ms")]
    ZeroTickPeriod,
    #[error("invalid game parameters: {0}")]
    Game(#[from] ValidationError),
}

/// Top-level settings. Every field has a default, so an empty file is valid.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Where the game is saved.
    pub save_path: PathBuf,
    /// Autoclicker period in milliseconds.
    pub tick_period_ms: u64,
    /// Starting parameters for new games.
    pub game: GameConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            save_path: default_save_path(),
            tick_period_ms: 1000,
            game: GameConfig::default(),
        }
    }
}

impl AppConfig {
    pub fn from_yaml(text: &str) -> Result<Self, ConfigError> {
        let cfg: AppConfig = serde_yaml::from_str(text)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_period_ms == 0 {
            return Err(ConfigError::ZeroTickPeriod);
        }
        validate_config(&self.game)?;
        Ok(())
    }

    pub fn tick_period(&self) -> Duration {
        Duration::from_millis(self.tick_period_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_yaml_is_default() {
        let cfg = AppConfig::from_yaml("{}").unwrap();
        assert_eq!(cfg, AppConfig::default());
        assert_eq!(cfg.save_path, PathBuf::from("save/game_state.json"));
        assert_eq!(cfg.tick_period(), Duration::from_secs(1));
    }

    #[test]
    fn partial_yaml_overrides_fields() {
        let cfg = AppConfig::from_yaml(
            "save_path: saves/alt.json\ntick_period_ms: 250\ngame:\n  autoclicker_cost: 100\n",
        )
        .unwrap();
        assert_eq!(cfg.save_path, PathBuf::from("saves/alt.json"));
        assert_eq!(cfg.tick_period_ms, 250);
        assert_eq!(cfg.game.autoclicker_cost, 100);
        assert_eq!(cfg.game.upgrade_cost, 10);
    }

    #[test]
    fn rejects_bad_values() {
        assert!(matches!(
            AppConfig::from_yaml("tick_period_ms: 0"),
            Err(ConfigError::ZeroTickPeriod)
        ));
        assert!(matches!(
            AppConfig::from_yaml("game:\n  upgrade_increment: 0\n"),
            Err(ConfigError::Game(ValidationError::ZeroIncrement))
        ));
        assert!(matches!(
            AppConfig::from_yaml("tick_period_ms: [1, 2]"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "game:\n  upgrade_max_level: 3").unwrap();
        let cfg = AppConfig::load(file.path()).unwrap();
        assert_eq!(cfg.game.upgrade_max_level, 3);
        assert!(matches!(
            AppConfig::load(Path::new("/nonexistent/clicker.yaml")),
            Err(ConfigError::Io { .. })
        ));
    }
}
