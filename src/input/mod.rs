//! Steering input: analog samples, their decoding, and the concrete sticks

pub mod axis;
pub mod handler;
pub mod sources;

pub use axis::{AxisSource, Channel, Thresholds};
pub use handler::{InputHandler, KeyAction};
pub use sources::{RandomInput, ScriptError, ScriptedInput, VirtualJoystick};
