//! Core game logic module for Snake
//!
//! This module contains all the game logic without any I/O or rendering dependencies.
//! The engine is driven by an external timer and input source; see `modes` for the
//! terminal front end.

pub mod action;
pub mod board;
pub mod config;
pub mod engine;
pub mod state;

// Re-export commonly used types
pub use action::Direction;
pub use board::Board;
pub use config::{ConfigError, GameConfig};
pub use engine::{SimulationEngine, Tick, TickEvent};
pub use state::{CollisionType, Ending, GameState, Phase, Position, Snake};
