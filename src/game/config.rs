use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::board::Board;
use super::state::Position;

/// Configuration errors, raised before any gameplay starts
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{field} must be positive")]
    ZeroDimension { field: &'static str },

    #[error("board of {columns}x{rows} tiles at {tile_size}px does not fit in i32 coordinates")]
    BoardTooLarge {
        columns: u32,
        rows: u32,
        tile_size: u32,
    },

    #[error("board of {columns}x{rows} tiles leaves no room for food")]
    BoardTooSmall { columns: u32, rows: u32 },

    #[error("tick interval must be positive")]
    ZeroTickInterval,

    #[error("start tile ({column}, {row}) is outside the {columns}x{rows} board")]
    StartOutOfBounds {
        column: u32,
        row: u32,
        columns: u32,
        rows: u32,
    },
}

/// Configuration for the game
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Number of tile columns
    pub columns: u32,
    /// Number of tile rows
    pub rows: u32,
    /// Edge length of a tile in pixels
    pub tile_size: u32,
    /// Time between simulation ticks
    pub tick_interval_ms: u64,
    /// Tile column the head spawns on
    pub start_column: u32,
    /// Tile row the head spawns on
    pub start_row: u32,
    /// Seed for food placement; random when unset
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            columns: 25,
            rows: 25,
            tile_size: 25,
            tick_interval_ms: 200,
            start_column: 5,
            start_row: 5,
            seed: None,
        }
    }
}

impl GameConfig {
    /// Create a new configuration with custom board size
    pub fn new(columns: u32, rows: u32) -> Self {
        Self {
            columns,
            rows,
            ..Default::default()
        }
    }

    /// Create a small board for testing
    pub fn small() -> Self {
        Self {
            start_column: 2,
            start_row: 2,
            ..Self::new(10, 10)
        }
    }

    /// Read a JSON configuration file. Missing fields take their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    /// Check every setting and build the board
    pub fn validate(&self) -> Result<Board, ConfigError> {
        let board = Board::new(self.columns, self.rows, self.tile_size)?;

        if self.tick_interval_ms == 0 {
            return Err(ConfigError::ZeroTickInterval);
        }

        if self.start_column >= self.columns || self.start_row >= self.rows {
            return Err(ConfigError::StartOutOfBounds {
                column: self.start_column,
                row: self.start_row,
                columns: self.columns,
                rows: self.rows,
            });
        }

        Ok(board)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    /// Pixel position of the spawn tile
    pub fn start_position(&self) -> Position {
        Position::new(
            (self.start_column * self.tile_size) as i32,
            (self.start_row * self.tile_size) as i32,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = GameConfig::default();
        assert_eq!(config.columns, 25);
        assert_eq!(config.rows, 25);
        assert_eq!(config.tile_size, 25);
        assert_eq!(config.tick_interval(), Duration::from_millis(200));
        assert_eq!(config.start_position(), Position::new(125, 125));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_custom_config() {
        let config = GameConfig::new(15, 12);
        assert_eq!(config.columns, 15);
        assert_eq!(config.rows, 12);
        assert!(GameConfig::small().validate().is_ok());
    }

    #[test]
    fn test_rejects_zero_tick_interval() {
        let config = GameConfig {
            tick_interval_ms: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::ZeroTickInterval));
    }

    #[test]
    fn test_rejects_start_outside_board() {
        let config = GameConfig {
            start_column: 25,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::StartOutOfBounds { column: 25, .. })
        ));
    }

    #[test]
    fn test_rejects_zero_tile_size() {
        let config = GameConfig {
            tile_size: 0,
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::ZeroDimension { field: "tile_size" })
        );
    }

    #[test]
    fn test_load_partial_json() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("snake.json");
        std::fs::write(&path, r#"{ "columns": 30, "seed": 7 }"#).unwrap();

        let config = GameConfig::load(&path).unwrap();
        assert_eq!(config.columns, 30);
        assert_eq!(config.rows, 25);
        assert_eq!(config.seed, Some(7));
    }

    #[test]
    fn test_load_rejects_negative_dimension() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("snake.json");
        std::fs::write(&path, r#"{ "rows": -3 }"#).unwrap();

        assert!(GameConfig::load(&path).is_err());
    }

    #[test]
    fn test_load_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = GameConfig::load(&dir.path().join("absent.json")).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }
}
