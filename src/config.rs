//! Game Configuration
//!
//! Entity sizes, speeds, counts and the road stroke width. Every field has
//! a default, so a JSON file only needs the values it overrides.

use std::fs;
use std::path::Path;

use serde::{Serialize, Deserialize};
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file could not be read.
    #[error("failed to read config {path}: {source}")]
    Io {
        /// Path that failed
        path: String,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Config JSON could not be parsed.
    #[error("invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// A value is out of range.
    #[error("invalid config value: {0}")]
    Invalid(String),
}

/// Player settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Bounding box edge (pixels)
    pub size: f64,
    /// Distance per accepted input (pixels)
    pub step_size: f64,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            size: 25.0,
            step_size: 10.0,
        }
    }
}

/// Pursuer settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PursuerConfig {
    /// Number of pursuers per session
    pub count: usize,
    /// Bounding box edge (pixels)
    pub size: f64,
    /// Distance per tick (pixels)
    pub step_size: f64,
}

impl Default for PursuerConfig {
    fn default() -> Self {
        Self {
            count: 5,
            size: 50.0,
            step_size: 0.5,
        }
    }
}

/// Collectible settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectibleConfig {
    /// Number of collectibles per session
    pub count: usize,
    /// Bounding box edge (pixels)
    pub size: f64,
}

impl Default for CollectibleConfig {
    fn default() -> Self {
        Self {
            count: 25,
            size: 25.0,
        }
    }
}

/// Configuration for a game session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Player settings
    pub player: PlayerConfig,
    /// Pursuer settings
    pub pursuer: PursuerConfig,
    /// Collectible settings
    pub collectible: CollectibleConfig,
    /// Width of the drawn road stroke; the corridor is half of it either side
    pub stroke_width: f64,
    /// Attempts per entity before placement gives up
    pub max_placement_attempts: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            player: PlayerConfig::default(),
            pursuer: PursuerConfig::default(),
            collectible: CollectibleConfig::default(),
            stroke_width: 25.0,
            max_placement_attempts: 10_000,
        }
    }
}

impl GameConfig {
    /// Parse overrides from JSON.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load overrides from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// Reject sizes, steps and widths that are not finite and positive.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let lengths = [
            ("player.size", self.player.size),
            ("player.step_size", self.player.step_size),
            ("pursuer.size", self.pursuer.size),
            ("pursuer.step_size", self.pursuer.step_size),
            ("collectible.size", self.collectible.size),
            ("stroke_width", self.stroke_width),
        ];
        for (name, value) in lengths {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::Invalid(format!("{} must be positive, got {}", name, value)));
            }
        }

        if self.max_placement_attempts == 0 {
            return Err(ConfigError::Invalid("max_placement_attempts must be at least 1".into()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = GameConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.pursuer.count, 5);
        assert_eq!(config.collectible.count, 25);
        assert_eq!(config.stroke_width, 25.0);
    }

    #[test]
    fn test_partial_override() {
        let config = GameConfig::from_json_str(r#"{"pursuer": {"count": 2}, "stroke_width": 30}"#).unwrap();
        assert_eq!(config.pursuer.count, 2);
        assert_eq!(config.pursuer.size, 50.0);
        assert_eq!(config.stroke_width, 30.0);
        assert_eq!(config.player, PlayerConfig::default());
    }

    #[test]
    fn test_rejects_bad_values() {
        let err = GameConfig::from_json_str(r#"{"player": {"step_size": 0}}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(msg) if msg.contains("player.step_size")));

        let err = GameConfig::from_json_str(r#"{"max_placement_attempts": 0}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        let err = GameConfig::from_json_str("not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = GameConfig::from_json_file("/nonexistent/road-chase.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
