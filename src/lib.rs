//! Cube Snake - 3D Snake on an 8x8x8 LED voxel cube
//!
//! This library provides:
//! - Core simulation: occupancy grid, snake body, turning and stepping (game module)
//! - Joystick decoding and input sources (input module)
//! - Frame sinks for the cube's 64-byte snapshots (output module)
//! - TUI rendering of the cube layers (render module)
//! - Interactive and headless execution modes (modes module)

pub mod game;
pub mod input;
pub mod metrics;
pub mod modes;
pub mod output;
pub mod render;
