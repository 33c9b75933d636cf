use std::path::Path;

use log::warn;

use crate::error::ConfigError;
use crate::game::{Difficulty, SIZE};

/// Rules of a single game.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Spawn policy for new tiles.
    pub difficulty: Difficulty,
    /// Tiles placed on the board when a game starts.
    pub initial_tiles: usize,
    /// Snapshots kept for undo; 0 disables history.
    pub history_capacity: usize,
    /// Fixed RNG seed for reproducible games.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            difficulty: Difficulty::TwoOrFour,
            initial_tiles: 1,
            history_capacity: 256,
            seed: None,
        }
    }
}

/// Settings for the automated random player.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct BotConfig {
    /// Pause between bot turns, in milliseconds.
    pub move_delay_ms: u64,
    /// Stop after this many accepted moves.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_moves: Option<usize>,
}

impl Default for BotConfig {
    fn default() -> Self {
        BotConfig {
            move_delay_ms: 200,
            max_moves: None,
        }
    }
}

/// Top-level application configuration, loadable from TOML.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub game: GameConfig,
    pub bot: BotConfig,
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: AppConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the file
    /// does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            warn!("config file '{}' not found, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.game.initial_tiles == 0 || self.game.initial_tiles > SIZE * SIZE {
            return Err(ConfigError::Validation(format!(
                "game.initial_tiles must be in 1..={}",
                SIZE * SIZE
            )));
        }
        if self.bot.move_delay_ms > 60_000 {
            return Err(ConfigError::Validation(
                "bot.move_delay_ms must be <= 60000".into(),
            ));
        }
        if self.bot.max_moves == Some(0) {
            return Err(ConfigError::Validation(
                "bot.max_moves must be > 0 when set".into(),
            ));
        }

        Ok(())
    }

    /// Generate a TOML string with all default values (useful for creating
    /// example config files).
    pub fn default_toml() -> String {
        toml::to_string_pretty(&AppConfig::default()).expect("default config serializes")
    }
}
