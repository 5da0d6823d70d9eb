use serde::{Deserialize, Serialize};

/// Number of cells along each edge of the cube
pub const GRID_SIZE: i32 = 8;

/// Number of (x, y) columns, one byte each in a frame
pub const COLUMN_COUNT: usize = (GRID_SIZE * GRID_SIZE) as usize;

/// Total number of voxels in the cube
pub const CELL_COUNT: usize = COLUMN_COUNT * GRID_SIZE as usize;

/// A voxel position in the cube
///
/// Axes are not bounded by the type; anything outside `[0, GRID_SIZE)` is a wall.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coordinate {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl Coordinate {
    pub fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Returns true if every axis lies inside the cube
    pub fn in_bounds(&self) -> bool {
        [self.x, self.y, self.z]
            .iter()
            .all(|axis| (0..GRID_SIZE).contains(axis))
    }

    /// Move position one cell along a heading
    pub fn stepped(&self, heading: Heading) -> Self {
        Self {
            x: self.x + heading.x,
            y: self.y + heading.y,
            z: self.z + heading.z,
        }
    }

    /// Index of the (x, y) column byte inside a frame
    pub(crate) fn column(&self) -> usize {
        (GRID_SIZE * self.y + self.x) as usize
    }

    /// Bit mask of this coordinate inside its column byte
    pub(crate) fn mask(&self) -> u8 {
        1 << self.z
    }
}

/// Unit axis-aligned direction of travel
///
/// Exactly one component is non-zero and it is ±1. Only the rotations in
/// [`DirectionChange::apply`](super::DirectionChange::apply) produce new headings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Heading {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl Heading {
    pub const EAST: Heading = Heading { x: 1, y: 0, z: 0 };
    pub const WEST: Heading = Heading { x: -1, y: 0, z: 0 };
    pub const NORTH: Heading = Heading { x: 0, y: 1, z: 0 };
    pub const SOUTH: Heading = Heading { x: 0, y: -1, z: 0 };
    pub const UP: Heading = Heading { x: 0, y: 0, z: 1 };
    pub const DOWN: Heading = Heading { x: 0, y: 0, z: -1 };

    /// Returns true if travelling along the vertical (z) axis
    pub fn is_vertical(&self) -> bool {
        self.z != 0
    }
}

impl Default for Heading {
    fn default() -> Self {
        Self::EAST
    }
}
