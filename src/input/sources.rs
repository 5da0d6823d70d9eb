use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;

use super::axis::{AxisSource, CENTRE_SAMPLE, Channel, FULL_SAMPLE, deflection};
use crate::game::DirectionChange;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScriptError {
    #[error("unknown steering character {0:?} (expected L, R, U, D or F)")]
    UnknownIntent(char),
    #[error("script is empty")]
    Empty,
}

/// Stick driven by keyboard presses
///
/// A press latches a deflection until [`VirtualJoystick::release`], so both
/// channel reads of one iteration see the same position.
#[derive(Debug, Clone, Default)]
pub struct VirtualJoystick {
    held: Option<DirectionChange>,
}

impl VirtualJoystick {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, change: DirectionChange) {
        self.held = Some(change);
    }

    /// Let the stick spring back to centre
    pub fn release(&mut self) {
        self.held = None;
    }

    pub fn held(&self) -> Option<DirectionChange> {
        self.held
    }
}

impl AxisSource for VirtualJoystick {
    fn read_axis(&mut self, channel: Channel) -> u16 {
        match self.held {
            Some(change) => deflection(change, channel),
            None => CENTRE_SAMPLE,
        }
    }
}

/// Replays a fixed list of intents, one per iteration
#[derive(Debug, Clone)]
pub struct ScriptedInput {
    script: Vec<DirectionChange>,
    cursor: usize,
    repeat: bool,
    current: DirectionChange,
}

impl ScriptedInput {
    /// Play `script` once, then hold the stick centred
    pub fn new(script: Vec<DirectionChange>) -> Self {
        Self {
            script,
            cursor: 0,
            repeat: false,
            current: DirectionChange::Forward,
        }
    }

    /// Play `script` in a loop
    pub fn repeating(script: Vec<DirectionChange>) -> Self {
        Self {
            repeat: true,
            ..Self::new(script)
        }
    }

    /// Parse a string of L/R/U/D/F characters; whitespace is ignored
    pub fn parse(text: &str, repeat: bool) -> Result<Self, ScriptError> {
        let script = text
            .chars()
            .filter(|c| !c.is_whitespace())
            .map(|c| DirectionChange::from_char(c).ok_or(ScriptError::UnknownIntent(c)))
            .collect::<Result<Vec<_>, _>>()?;

        if script.is_empty() {
            return Err(ScriptError::Empty);
        }

        Ok(if repeat {
            Self::repeating(script)
        } else {
            Self::new(script)
        })
    }
}

impl AxisSource for ScriptedInput {
    fn begin_sample(&mut self) {
        if self.repeat && !self.script.is_empty() {
            self.cursor %= self.script.len();
        }

        self.current = match self.script.get(self.cursor) {
            Some(change) => {
                self.cursor += 1;
                *change
            }
            None => DirectionChange::Forward,
        };
    }

    fn read_axis(&mut self, channel: Channel) -> u16 {
        deflection(self.current, channel)
    }
}

/// A stick that mostly rests near centre and occasionally gets shoved
#[derive(Debug, Clone)]
pub struct RandomInput {
    rng: StdRng,
    /// Chance per iteration that the stick is deflected at all
    push_probability: f64,
    depth: u16,
    vertical: u16,
}

impl RandomInput {
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Self {
            rng,
            push_probability: 0.3,
            depth: CENTRE_SAMPLE,
            vertical: CENTRE_SAMPLE,
        }
    }

    pub fn with_push_probability(mut self, probability: f64) -> Self {
        self.push_probability = probability.clamp(0.0, 1.0);
        self
    }
}

impl AxisSource for RandomInput {
    fn begin_sample(&mut self) {
        // Resting jitter stays well inside the dead zone
        self.depth = self.rng.gen_range(1900..=2200);
        self.vertical = self.rng.gen_range(1900..=2200);

        if self.rng.gen_bool(self.push_probability) {
            let pushed = if self.rng.gen_bool(0.5) {
                self.rng.gen_range(3000..=FULL_SAMPLE)
            } else {
                self.rng.gen_range(0..=1000)
            };

            if self.rng.gen_bool(0.5) {
                self.depth = pushed;
            } else {
                self.vertical = pushed;
            }
        }
    }

    fn read_axis(&mut self, channel: Channel) -> u16 {
        match channel {
            Channel::DepthSteer => self.depth,
            Channel::VerticalSteer => self.vertical,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Thresholds;

    #[test]
    fn test_joystick_latches_until_release() {
        let t = Thresholds::default();
        let mut stick = VirtualJoystick::new();
        assert_eq!(t.read_direction(&mut stick), DirectionChange::Forward);

        stick.push(DirectionChange::Up);
        assert_eq!(t.read_direction(&mut stick), DirectionChange::Up);
        assert_eq!(t.read_direction(&mut stick), DirectionChange::Up);

        stick.release();
        assert_eq!(stick.held(), None);
        assert_eq!(t.read_direction(&mut stick), DirectionChange::Forward);
    }

    #[test]
    fn test_script_plays_once() {
        let t = Thresholds::default();
        let mut input = ScriptedInput::parse("L U", false).unwrap();

        assert_eq!(t.read_direction(&mut input), DirectionChange::Left);
        assert_eq!(t.read_direction(&mut input), DirectionChange::Up);
        assert_eq!(t.read_direction(&mut input), DirectionChange::Forward);
        assert_eq!(t.read_direction(&mut input), DirectionChange::Forward);
    }

    #[test]
    fn test_script_repeats() {
        let t = Thresholds::default();
        let mut input = ScriptedInput::parse("rd", true).unwrap();

        let decoded: Vec<_> = (0..5).map(|_| t.read_direction(&mut input)).collect();
        assert_eq!(
            decoded,
            vec![
                DirectionChange::Right,
                DirectionChange::Down,
                DirectionChange::Right,
                DirectionChange::Down,
                DirectionChange::Right,
            ]
        );
    }

    #[test]
    fn test_script_parse_errors() {
        assert_eq!(
            ScriptedInput::parse("LLX", false).unwrap_err(),
            ScriptError::UnknownIntent('X')
        );
        assert_eq!(
            ScriptedInput::parse("   ", true).unwrap_err(),
            ScriptError::Empty
        );
    }

    #[test]
    fn test_random_input_is_reproducible() {
        let t = Thresholds::default();
        let mut a = RandomInput::new(Some(4));
        let mut b = RandomInput::new(Some(4));

        for _ in 0..50 {
            assert_eq!(t.read_direction(&mut a), t.read_direction(&mut b));
        }
    }

    #[test]
    fn test_random_input_at_rest_is_centred() {
        let t = Thresholds::default();
        let mut input = RandomInput::new(Some(8)).with_push_probability(0.0);

        for _ in 0..50 {
            assert_eq!(t.read_direction(&mut input), DirectionChange::Forward);
        }
    }
}
