use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::coord::{CELL_COUNT, Coordinate, Heading};
use crate::input::Thresholds;

/// Largest value the analog channels can report
pub const MAX_SAMPLE: u16 = 4095;

/// Marker byte sent ahead of every frame on a streamed transport
pub const DEFAULT_FRAME_MARKER: u8 = 0xF2;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("start position {0:?} is outside the cube")]
    StartOutOfBounds(Coordinate),
    #[error("start position {0:?} leaves no room for the first step")]
    NoRoomToGrow(Coordinate),
    #[error("win length {0} must be between 3 and 512")]
    WinLength(usize),
    #[error("thresholds must satisfy low < high <= 4095 (got low={low}, high={high})")]
    Thresholds { low: u16, high: u16 },
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration for one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Where the tail starts; the head is one step east of it
    pub start: Coordinate,
    /// Body length that wins the game
    pub win_length: usize,
    /// Pause between iterations, in milliseconds
    pub tick_interval_ms: u64,
    /// Joystick decoding thresholds
    pub thresholds: Thresholds,
    /// Byte written before each frame, if any
    pub frame_marker: Option<u8>,
    /// Seed for apple placement; entropy when absent
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            start: Coordinate::new(0, 5, 5),
            win_length: CELL_COUNT,
            tick_interval_ms: 1000,
            thresholds: Thresholds::default(),
            frame_marker: Some(DEFAULT_FRAME_MARKER),
            seed: None,
        }
    }
}

impl GameConfig {
    /// Load a configuration from a JSON file; missing fields take defaults
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let data = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&data)?;
        config.validate()?;
        Ok(config)
    }

    /// Check every field against the fixed cube geometry
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.start.in_bounds() {
            return Err(ConfigError::StartOutOfBounds(self.start));
        }

        if !self.start.stepped(Heading::default()).in_bounds() {
            return Err(ConfigError::NoRoomToGrow(self.start));
        }

        if !(3..=CELL_COUNT).contains(&self.win_length) {
            return Err(ConfigError::WinLength(self.win_length));
        }

        let Thresholds { low, high } = self.thresholds;
        if low >= high || high > MAX_SAMPLE {
            return Err(ConfigError::Thresholds { low, high });
        }

        Ok(())
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    /// Create a seeded configuration for deterministic runs
    pub fn seeded(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = GameConfig::default();
        assert_eq!(config.start, Coordinate::new(0, 5, 5));
        assert_eq!(config.win_length, 512);
        assert_eq!(config.thresholds, Thresholds { low: 1500, high: 2500 });
        assert_eq!(config.frame_marker, Some(0xF2));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_bad_start() {
        let config = GameConfig {
            start: Coordinate::new(0, 8, 0),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::StartOutOfBounds(_))
        ));

        let config = GameConfig {
            start: Coordinate::new(7, 0, 0),
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::NoRoomToGrow(_))));
    }

    #[test]
    fn test_rejects_bad_win_length() {
        for win_length in [0, 2, 513] {
            let config = GameConfig {
                win_length,
                ..Default::default()
            };
            assert!(matches!(config.validate(), Err(ConfigError::WinLength(_))));
        }
    }

    #[test]
    fn test_rejects_inverted_thresholds() {
        let config = GameConfig {
            thresholds: Thresholds {
                low: 2500,
                high: 1500,
            },
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Thresholds { .. })
        ));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: GameConfig =
            serde_json::from_str(r#"{ "win_length": 100, "seed": 9 }"#).unwrap();
        assert_eq!(config.win_length, 100);
        assert_eq!(config.seed, Some(9));
        assert_eq!(config.tick_interval_ms, 1000);
        assert_eq!(config.start, Coordinate::new(0, 5, 5));
    }

    #[test]
    fn test_load_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");
        std::fs::write(
            &path,
            r#"{ "start": { "x": 2, "y": 2, "z": 2 }, "frame_marker": null }"#,
        )
        .unwrap();

        let config = GameConfig::from_json_file(&path).unwrap();

        assert_eq!(config.start, Coordinate::new(2, 2, 2));
        assert_eq!(config.frame_marker, None);
    }
}
