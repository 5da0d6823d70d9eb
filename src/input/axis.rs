//! Analog joystick channels and their decoding into steering intents

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::game::DirectionChange;

/// Value reported by a centred stick
pub const CENTRE_SAMPLE: u16 = 2048;

/// Value reported by a stick pushed fully along the positive direction
pub const FULL_SAMPLE: u16 = 4095;

/// Logical analog channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    /// Pushes the snake up or down the z axis
    DepthSteer,
    /// Turns the snake left or right
    VerticalSteer,
}

impl Channel {
    /// Hardware ADC channel number
    pub fn id(&self) -> u8 {
        match self {
            Channel::DepthSteer => 1,
            Channel::VerticalSteer => 2,
        }
    }
}

/// Producer of raw analog samples in `0..=4095`
pub trait AxisSource {
    /// Called once before each pair of channel reads
    fn begin_sample(&mut self) {}

    fn read_axis(&mut self, channel: Channel) -> u16;
}

impl<S: AxisSource + ?Sized> AxisSource for &mut S {
    fn begin_sample(&mut self) {
        (**self).begin_sample();
    }

    fn read_axis(&mut self, channel: Channel) -> u16 {
        (**self).read_axis(channel)
    }
}

impl<S: AxisSource + ?Sized> AxisSource for Box<S> {
    fn begin_sample(&mut self) {
        (**self).begin_sample();
    }

    fn read_axis(&mut self, channel: Channel) -> u16 {
        (**self).read_axis(channel)
    }
}

/// Deflection thresholds; samples strictly outside `(low, high)` count as pushed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Thresholds {
    pub low: u16,
    pub high: u16,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            low: 1500,
            high: 2500,
        }
    }
}

impl Thresholds {
    /// Decode one pair of samples; lateral steering wins over depth
    pub fn decode(&self, depth: u16, vertical: u16) -> DirectionChange {
        if vertical > self.high {
            DirectionChange::Left
        } else if vertical < self.low {
            DirectionChange::Right
        } else if depth > self.high {
            DirectionChange::Up
        } else if depth < self.low {
            DirectionChange::Down
        } else {
            DirectionChange::Forward
        }
    }

    /// Sample both channels of `source` and decode them
    pub fn read_direction<S: AxisSource + ?Sized>(&self, source: &mut S) -> DirectionChange {
        source.begin_sample();
        let depth = source.read_axis(Channel::DepthSteer);
        let vertical = source.read_axis(Channel::VerticalSteer);
        trace!(
            depth_channel = Channel::DepthSteer.id(),
            depth,
            vertical_channel = Channel::VerticalSteer.id(),
            vertical,
            "joystick sample"
        );
        self.decode(depth, vertical)
    }
}

/// Raw sample a stick held towards `change` reports on `channel`
pub fn deflection(change: DirectionChange, channel: Channel) -> u16 {
    match (change, channel) {
        (DirectionChange::Left, Channel::VerticalSteer) => FULL_SAMPLE,
        (DirectionChange::Right, Channel::VerticalSteer) => 0,
        (DirectionChange::Up, Channel::DepthSteer) => FULL_SAMPLE,
        (DirectionChange::Down, Channel::DepthSteer) => 0,
        _ => CENTRE_SAMPLE,
    }
}
