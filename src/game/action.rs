use super::coord::Heading;

/// Steering intent decoded from the joystick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DirectionChange {
    Left,
    Right,
    Up,
    Down,
    /// Stick centred: keep the current heading
    Forward,
}

impl DirectionChange {
    /// Returns the heading after applying this intent to `heading`
    ///
    /// Left/Right rotate 90° about the vertical axis while moving in the
    /// horizontal plane, and snap to absolute south/north while moving
    /// vertically. Up/Down refuse to reverse the current vertical direction.
    pub fn apply(&self, heading: Heading) -> Heading {
        let Heading { x, y, z } = heading;

        match self {
            DirectionChange::Left if heading.is_vertical() => Heading::SOUTH,
            DirectionChange::Left => Heading { x: y, y: -x, z: 0 },
            DirectionChange::Right if heading.is_vertical() => Heading::NORTH,
            DirectionChange::Right => Heading { x: -y, y: x, z: 0 },
            DirectionChange::Up if z != -1 => Heading::UP,
            DirectionChange::Down if z != 1 => Heading::DOWN,
            DirectionChange::Up | DirectionChange::Down | DirectionChange::Forward => heading,
        }
    }

    /// Parse a single script character (L, R, U, D, F)
    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'L' => Some(DirectionChange::Left),
            'R' => Some(DirectionChange::Right),
            'U' => Some(DirectionChange::Up),
            'D' => Some(DirectionChange::Down),
            'F' => Some(DirectionChange::Forward),
            _ => None,
        }
    }
}
