use std::collections::VecDeque;

use rand::Rng;
use tracing::debug;

use super::action::DirectionChange;
use super::coord::{Coordinate, Heading};
use super::grid::{CellState, Grid};

/// Why a step was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collision {
    /// Candidate cell is outside the cube
    Wall,
    /// Candidate cell holds a body segment
    SelfCollision,
}

/// Outcome of [`Snake::step`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepResult {
    /// The snake moved (and possibly grew)
    Continue,
    /// The step was rejected without mutating anything; the run is over
    Blocked(Collision),
}

impl StepResult {
    pub fn is_blocked(&self) -> bool {
        matches!(self, StepResult::Blocked(_))
    }
}

/// The snake: an ordered body from head (front) to tail (back) plus a heading
///
/// Every segment has its grid bit set, so growing and shrinking always go
/// through the grid passed in.
#[derive(Debug, Clone, PartialEq)]
pub struct Snake {
    body: VecDeque<Coordinate>,
    heading: Heading,
    apple: Option<Coordinate>,
}

impl Snake {
    /// Create an empty snake; call [`Snake::init`] before stepping
    pub fn new(heading: Heading) -> Self {
        Self {
            body: VecDeque::new(),
            heading,
            apple: None,
        }
    }

    /// Build a snake from segments listed head first, setting their bits
    #[cfg(test)]
    pub(crate) fn with_body(
        heading: Heading,
        segments: impl IntoIterator<Item = Coordinate>,
        grid: &mut Grid,
    ) -> Self {
        let mut snake = Self::new(heading);
        for coord in segments {
            grid.set(coord);
            snake.body.push_back(coord);
        }
        snake
    }

    /// Reset to a single segment at `start`, then grow once along the heading
    ///
    /// The growth step places the first apple, leaving a length-2 snake.
    /// `start` and the cell ahead of it must be inside the cube.
    pub fn init<R: Rng + ?Sized>(&mut self, start: Coordinate, grid: &mut Grid, rng: &mut R) {
        self.body.clear();
        self.apple = None;

        self.body.push_front(start);
        grid.set(start);

        self.apple_step(start.stepped(self.heading), grid, rng);
    }

    /// Update the heading; never touches the body or the grid
    pub fn turn(&mut self, change: DirectionChange) {
        self.heading = change.apply(self.heading);
    }

    /// Try to advance one cell along the heading
    ///
    /// A torn-down snake has nothing to move and is always blocked.
    pub fn step<R: Rng + ?Sized>(&mut self, grid: &mut Grid, rng: &mut R) -> StepResult {
        let Some(head) = self.head() else {
            return StepResult::Blocked(Collision::Wall);
        };
        let candidate = head.stepped(self.heading);

        match grid.classify(candidate, self) {
            CellState::Wall => StepResult::Blocked(Collision::Wall),
            CellState::Snake => StepResult::Blocked(Collision::SelfCollision),
            CellState::Apple => {
                self.apple_step(candidate, grid, rng);
                StepResult::Continue
            }
            CellState::Empty => {
                self.normal_step(candidate, grid);
                StepResult::Continue
            }
        }
    }

    /// Grow into `candidate` and place a new apple
    ///
    /// The caller has already classified `candidate` as an apple (or free).
    pub fn apple_step<R: Rng + ?Sized>(
        &mut self,
        candidate: Coordinate,
        grid: &mut Grid,
        rng: &mut R,
    ) {
        self.add_head(candidate, grid);
        self.apple = grid.place_apple(rng);

        debug!(length = self.len(), apple = ?self.apple, "snake grew");
    }

    /// Move into `candidate` and release the tail
    ///
    /// The caller has already classified `candidate` as free.
    pub fn normal_step(&mut self, candidate: Coordinate, grid: &mut Grid) {
        self.add_head(candidate, grid);
        self.pop_tail(grid);
    }

    /// Release every segment
    pub fn teardown(&mut self) {
        self.body.clear();
        self.apple = None;
    }

    fn add_head(&mut self, coord: Coordinate, grid: &mut Grid) {
        grid.set(coord);
        self.body.push_front(coord);
    }

    fn pop_tail(&mut self, grid: &mut Grid) {
        if let Some(tail) = self.body.pop_back() {
            grid.clear(tail);
        }
    }

    pub fn head(&self) -> Option<Coordinate> {
        self.body.front().copied()
    }

    pub fn tail(&self) -> Option<Coordinate> {
        self.body.back().copied()
    }

    pub fn heading(&self) -> Heading {
        self.heading
    }

    /// Apple placed by the most recent growth step, if the cube had room
    pub fn apple(&self) -> Option<Coordinate> {
        self.apple
    }

    /// Segments from head to tail
    pub fn segments(&self) -> impl DoubleEndedIterator<Item = &Coordinate> + '_ {
        self.body.iter()
    }

    pub fn contains(&self, coord: Coordinate) -> bool {
        self.body.contains(&coord)
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}
