use rand::SeedableRng;
use rand::rngs::StdRng;

use super::action::DirectionChange;
use super::coord::{Coordinate, Heading};
use super::grid::{Frame, Grid};
use super::snake::{Snake, StepResult};

/// Everything one run mutates, owned in one place
#[derive(Debug, Clone)]
pub struct GameState {
    pub grid: Grid,
    pub snake: Snake,
    rng: StdRng,
    /// Apples eaten, not counting the seeding growth step
    pub score: u32,
    /// Successful moves
    pub steps: u32,
}

impl GameState {
    /// Create an empty cube and an uninitialised snake heading east
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Self {
            grid: Grid::new(),
            snake: Snake::new(Heading::default()),
            rng,
            score: 0,
            steps: 0,
        }
    }

    /// Seed the snake at `start` (length 2, first apple placed)
    pub fn init(&mut self, start: Coordinate) {
        self.snake.init(start, &mut self.grid, &mut self.rng);
    }

    pub fn turn(&mut self, change: DirectionChange) {
        self.snake.turn(change);
    }

    /// Advance the snake once, keeping score and step counters current
    pub fn step(&mut self) -> StepResult {
        let length_before = self.snake.len();
        let result = self.snake.step(&mut self.grid, &mut self.rng);

        if !result.is_blocked() {
            self.steps += 1;
            if self.snake.len() > length_before {
                self.score += 1;
            }
        }

        result
    }

    /// Light the whole cube
    pub fn fill_all(&mut self) {
        self.grid.fill_all();
    }

    pub fn frame(&self) -> Frame {
        self.grid.snapshot()
    }

    pub fn teardown(&mut self) {
        self.snake.teardown();
    }

    /// Returns true if the grid holds exactly the body plus the current apple
    pub fn is_consistent(&self) -> bool {
        let expected = self.snake.len() + usize::from(self.snake.apple().is_some());
        self.grid.occupied_count() == expected
            && self.snake.segments().all(|s| self.grid.is_occupied(*s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_is_empty() {
        let state = GameState::new(Some(1));
        assert!(state.snake.is_empty());
        assert_eq!(state.grid.occupied_count(), 0);
        assert_eq!(state.score, 0);
        assert_eq!(state.steps, 0);
    }

    #[test]
    fn test_init_sets_two_segments_and_an_apple() {
        let mut state = GameState::new(Some(1));
        state.init(Coordinate::new(0, 5, 5));

        assert_eq!(state.snake.len(), 2);
        assert_eq!(state.grid.occupied_count(), 3);
        assert_eq!(state.score, 0);
        assert!(state.is_consistent());
    }

    #[test]
    fn test_bit_count_tracks_body_and_apple() {
        let mut state = GameState::new(Some(11));
        state.init(Coordinate::new(0, 5, 5));
        let script = [
            DirectionChange::Forward,
            DirectionChange::Left,
            DirectionChange::Up,
            DirectionChange::Right,
            DirectionChange::Right,
            DirectionChange::Down,
        ];

        for change in script.iter().cycle().take(60) {
            state.turn(*change);
            if state.step().is_blocked() {
                break;
            }
            assert!(state.is_consistent());
        }
    }

    #[test]
    fn test_score_counts_apples() {
        let mut state = GameState::new(Some(5));
        state.init(Coordinate::new(0, 5, 5));

        // Move the apple directly ahead of the head
        let apple = state.snake.apple().unwrap();
        state.grid.clear(apple);
        state.grid.set(Coordinate::new(2, 5, 5));

        assert_eq!(state.step(), StepResult::Continue);
        assert_eq!(state.score, 1);
        assert_eq!(state.steps, 1);
        assert_eq!(state.snake.len(), 3);
    }

    #[test]
    fn test_same_seed_same_apples() {
        let mut a = GameState::new(Some(99));
        let mut b = GameState::new(Some(99));
        a.init(Coordinate::new(0, 5, 5));
        b.init(Coordinate::new(0, 5, 5));

        assert_eq!(a.snake.apple(), b.snake.apple());
        assert_eq!(a.frame(), b.frame());
    }
}
