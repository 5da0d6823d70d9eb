//! Core simulation of the cube snake
//!
//! This module contains all the game logic without any I/O or rendering dependencies.
//! Input arrives through [`crate::input::AxisSource`] and frames leave through
//! [`crate::output::FrameSink`].

pub mod action;
pub mod config;
pub mod coord;
pub mod engine;
pub mod grid;
pub mod snake;
pub mod state;

// Re-export commonly used types
pub use action::DirectionChange;
pub use config::{ConfigError, GameConfig};
pub use coord::{CELL_COUNT, COLUMN_COUNT, Coordinate, GRID_SIZE, Heading};
pub use engine::{FixedInterval, GameLoop, NoPacing, Pacer, Phase};
pub use grid::{CellState, Frame, Grid};
pub use snake::{Collision, Snake, StepResult};
pub use state::GameState;
