use rand::Rng;

use super::coord::{CELL_COUNT, COLUMN_COUNT, Coordinate, GRID_SIZE};
use super::snake::Snake;

/// One snapshot of the cube: byte `8 * y + x` holds the z bits of column (x, y)
pub type Frame = [u8; COLUMN_COUNT];

/// What occupies a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellState {
    Empty,
    Apple,
    Snake,
    Wall,
}

/// Occupancy bitmap of the cube
///
/// A bit is set exactly when the voxel holds a snake segment or an apple.
/// The grid does not record which; [`Grid::classify`] cross-checks the snake.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    columns: Frame,
}

impl Grid {
    pub fn new() -> Self {
        Self {
            columns: [0; COLUMN_COUNT],
        }
    }

    /// Caller guarantees `coord` is in bounds.
    pub fn set(&mut self, coord: Coordinate) {
        self.columns[coord.column()] |= coord.mask();
    }

    /// Caller guarantees `coord` is in bounds.
    pub fn clear(&mut self, coord: Coordinate) {
        self.columns[coord.column()] &= !coord.mask();
    }

    /// Caller guarantees `coord` is in bounds.
    pub fn is_occupied(&self, coord: Coordinate) -> bool {
        self.columns[coord.column()] & coord.mask() != 0
    }

    /// Classify a cell; the single source of truth for step legality
    pub fn classify(&self, coord: Coordinate, snake: &Snake) -> CellState {
        if !coord.in_bounds() {
            return CellState::Wall;
        }

        if !self.is_occupied(coord) {
            return CellState::Empty;
        }

        if snake.contains(coord) {
            CellState::Snake
        } else {
            CellState::Apple
        }
    }

    /// Set a uniformly random free cell and return it
    ///
    /// Returns `None` without sampling when the cube is saturated.
    pub fn place_apple<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<Coordinate> {
        if self.occupied_count() >= CELL_COUNT {
            return None;
        }

        loop {
            let coord = Coordinate::new(
                rng.gen_range(0..GRID_SIZE),
                rng.gen_range(0..GRID_SIZE),
                rng.gen_range(0..GRID_SIZE),
            );

            if !self.is_occupied(coord) {
                self.set(coord);
                return Some(coord);
            }
        }
    }

    /// Light every voxel (victory display)
    pub fn fill_all(&mut self) {
        self.columns = [u8::MAX; COLUMN_COUNT];
    }

    /// Number of set bits
    pub fn occupied_count(&self) -> usize {
        self.columns.iter().map(|c| c.count_ones() as usize).sum()
    }

    /// Copy of the 64 column bytes
    pub fn snapshot(&self) -> Frame {
        self.columns
    }
}

impl Default for Grid {
    fn default() -> Self {
        Self::new()
    }
}
