//! Tile Snake - a grid-based snake arcade game
//!
//! This library provides:
//! - Core simulation: board, snake state and the tick engine (game module)
//! - Terminal front end: key mapping, rendering and the play loop
//!   (input, render, modes modules)
//! - Session counters shown while playing (metrics module)

pub mod game;
pub mod input;
pub mod logging;
pub mod metrics;
pub mod modes;
pub mod render;
