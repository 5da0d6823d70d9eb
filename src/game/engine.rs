use std::time::Duration;

use tracing::{debug, info, warn};

use super::config::{ConfigError, GameConfig};
use super::snake::{Collision, StepResult};
use super::state::GameState;
use crate::input::AxisSource;
use crate::output::{FrameSink, SinkError};

/// Lifecycle of one run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Initializing,
    Running,
    /// The snake hit a wall or itself
    Blocked(Collision),
    /// The snake reached the winning length
    Won,
    /// The frame sink failed; the snake has been torn down
    Aborted,
}

impl Phase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Phase::Blocked(_) | Phase::Won | Phase::Aborted)
    }
}

/// Waits out the interval between two iterations
pub trait Pacer {
    fn wait(&mut self);
}

/// Blocks the calling thread for a fixed interval
#[derive(Debug, Clone, Copy)]
pub struct FixedInterval(pub Duration);

impl Pacer for FixedInterval {
    fn wait(&mut self) {
        std::thread::sleep(self.0);
    }
}

/// Runs iterations back to back
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPacing;

impl Pacer for NoPacing {
    fn wait(&mut self) {}
}

/// Drives one run: sample input, turn, step, emit a frame
pub struct GameLoop<I, F> {
    config: GameConfig,
    state: GameState,
    input: I,
    sink: F,
    phase: Phase,
}

impl<I: AxisSource, F: FrameSink> GameLoop<I, F> {
    pub fn new(config: GameConfig, input: I, sink: F) -> Result<Self, ConfigError> {
        config.validate()?;
        let state = GameState::new(config.seed);

        Ok(Self {
            config,
            state,
            input,
            sink,
            phase: Phase::Initializing,
        })
    }

    /// Seed the snake and enter `Running`; no-op once started
    pub fn start(&mut self) -> Phase {
        if self.phase == Phase::Initializing {
            self.state.init(self.config.start);
            self.phase = Phase::Running;

            info!(
                start = ?self.config.start,
                win_length = self.config.win_length,
                "game started"
            );
        }

        self.phase
    }

    /// Perform one iteration and return the resulting phase
    ///
    /// Starts the run if needed. Terminal phases are returned unchanged.
    pub fn tick(&mut self) -> Result<Phase, SinkError> {
        self.start();
        if self.phase.is_terminal() {
            return Ok(self.phase);
        }

        let change = self.config.thresholds.read_direction(&mut self.input);
        self.state.turn(change);

        if let StepResult::Blocked(collision) = self.state.step() {
            info!(
                ?collision,
                length = self.state.snake.len(),
                score = self.state.score,
                steps = self.state.steps,
                "game over"
            );
            self.state.teardown();
            self.phase = Phase::Blocked(collision);
            return Ok(self.phase);
        }

        debug!(
            ?change,
            head = ?self.state.snake.head(),
            heading = ?self.state.snake.heading(),
            "step"
        );

        if self.state.snake.len() >= self.config.win_length {
            self.state.fill_all();
            self.emit()?;
            info!(length = self.state.snake.len(), steps = self.state.steps, "game won");
            self.phase = Phase::Won;
            return Ok(self.phase);
        }

        self.emit()?;
        Ok(self.phase)
    }

    /// Iterate until a terminal phase, pausing with `pacer` in between
    pub fn run<P: Pacer>(&mut self, pacer: &mut P) -> Result<Phase, SinkError> {
        loop {
            let phase = self.tick()?;
            if phase.is_terminal() {
                return Ok(phase);
            }
            pacer.wait();
        }
    }

    fn emit(&mut self) -> Result<(), SinkError> {
        let frame = self.state.frame();
        if let Err(e) = self.sink.emit_frame(&frame) {
            warn!("frame sink failed, abandoning run: {e}");
            self.state.teardown();
            self.phase = Phase::Aborted;
            return Err(e);
        }
        Ok(())
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn input_mut(&mut self) -> &mut I {
        &mut self.input
    }

    pub fn sink(&self) -> &F {
        &self.sink
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{CELL_COUNT, COLUMN_COUNT, Coordinate, DirectionChange, Heading, Snake};
    use crate::input::ScriptedInput;
    use crate::output::{FrameRecorder, FramedWriter};

    fn straight_ahead(config: GameConfig) -> GameLoop<ScriptedInput, FrameRecorder> {
        GameLoop::new(config, ScriptedInput::new(Vec::new()), FrameRecorder::new()).unwrap()
    }

    /// Boustrophedon walk visiting every voxel once, each cell adjacent to the next
    fn serpentine() -> Vec<Coordinate> {
        let mut path = Vec::with_capacity(CELL_COUNT);
        let mut row = 0;
        for z in 0..8 {
            let ys: Vec<i32> = if z % 2 == 0 {
                (0..8).collect()
            } else {
                (0..8).rev().collect()
            };
            for y in ys {
                let xs: Vec<i32> = if row % 2 == 0 {
                    (0..8).collect()
                } else {
                    (0..8).rev().collect()
                };
                path.extend(xs.into_iter().map(|x| Coordinate::new(x, y, z)));
                row += 1;
            }
        }
        path
    }

    #[test]
    fn test_start_seeds_snake() {
        let mut game = straight_ahead(GameConfig::seeded(1));
        assert_eq!(game.phase(), Phase::Initializing);

        assert_eq!(game.start(), Phase::Running);
        assert_eq!(game.state().snake.len(), 2);
        assert_eq!(game.state().grid.occupied_count(), 3);
        assert_eq!(game.sink().count(), 0);

        // Starting twice does not re-seed
        game.start();
        assert_eq!(game.state().snake.len(), 2);
    }

    #[test]
    fn test_runs_into_wall() {
        let mut game = straight_ahead(GameConfig::seeded(2));

        let phase = game.run(&mut NoPacing).unwrap();

        // Head starts at x=1 and can reach x=7
        assert_eq!(phase, Phase::Blocked(Collision::Wall));
        assert_eq!(game.sink().count(), 6);
        assert!(game.state().snake.is_empty());
    }

    #[test]
    fn test_terminal_phase_is_sticky() {
        let mut game = straight_ahead(GameConfig::seeded(2));
        game.run(&mut NoPacing).unwrap();
        let frames = game.sink().count();

        assert_eq!(game.tick().unwrap(), Phase::Blocked(Collision::Wall));
        assert_eq!(game.sink().count(), frames);
    }

    #[test]
    fn test_frames_match_grid() {
        let mut game = straight_ahead(GameConfig::seeded(3));

        assert_eq!(game.tick().unwrap(), Phase::Running);
        assert_eq!(game.sink().latest(), Some(&game.state().frame()));
        assert!(game.state().is_consistent());
    }

    #[test]
    fn test_turns_follow_input() {
        let script = vec![DirectionChange::Up, DirectionChange::Left];
        let mut game = GameLoop::new(
            GameConfig::seeded(4),
            ScriptedInput::new(script),
            FrameRecorder::new(),
        )
        .unwrap();

        game.tick().unwrap();
        assert_eq!(game.state().snake.heading(), Heading::UP);
        assert_eq!(game.state().snake.head(), Some(Coordinate::new(1, 5, 6)));

        game.tick().unwrap();
        assert_eq!(game.state().snake.heading(), Heading::SOUTH);
        assert_eq!(game.state().snake.head(), Some(Coordinate::new(1, 4, 6)));
    }

    #[test]
    fn test_short_win_length() {
        let config = GameConfig {
            win_length: 3,
            ..GameConfig::seeded(5)
        };
        let mut game = straight_ahead(config);
        game.start();

        // Put the apple directly ahead
        let apple = game.state.snake.apple().unwrap();
        game.state.grid.clear(apple);
        game.state.grid.set(Coordinate::new(2, 5, 5));

        assert_eq!(game.tick().unwrap(), Phase::Won);
        assert_eq!(game.sink().count(), 1);
        assert_eq!(game.sink().latest(), Some(&[u8::MAX; COLUMN_COUNT]));
    }

    #[test]
    fn test_filling_the_cube_wins() {
        let path = serpentine();
        for pair in path.windows(2) {
            let d = (pair[1].x - pair[0].x).abs()
                + (pair[1].y - pair[0].y).abs()
                + (pair[1].z - pair[0].z).abs();
            assert_eq!(d, 1);
        }

        let mut game = straight_ahead(GameConfig::seeded(6));
        let head = path[CELL_COUNT - 2];
        let apple = path[CELL_COUNT - 1];
        let heading = Heading {
            x: apple.x - head.x,
            y: apple.y - head.y,
            z: apple.z - head.z,
        };

        let body = path[..CELL_COUNT - 1].iter().rev().copied();
        game.state.snake = Snake::with_body(heading, body, &mut game.state.grid);
        game.state.grid.set(apple);
        game.phase = Phase::Running;

        assert_eq!(game.tick().unwrap(), Phase::Won);
        assert_eq!(game.state().snake.len(), CELL_COUNT);
        assert_eq!(game.state().snake.apple(), None);
        assert!(game.sink().latest().unwrap().iter().all(|&b| b != 0));
    }

    struct Unplugged;

    impl std::io::Write for Unplugged {
        fn write(&mut self, _: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::other("unplugged"))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    fn unplugged(seed: u64) -> GameLoop<ScriptedInput, FramedWriter<Unplugged>> {
        GameLoop::new(
            GameConfig::seeded(seed),
            ScriptedInput::new(Vec::new()),
            FramedWriter::new(Unplugged, Some(0xF2)),
        )
        .unwrap()
    }

    #[test]
    fn test_sink_failure_aborts_run() {
        let mut game = unplugged(7);

        assert!(game.run(&mut NoPacing).is_err());
        assert_eq!(game.phase(), Phase::Aborted);
        assert!(game.state().snake.is_empty());
    }

    #[test]
    fn test_tick_after_sink_failure_stays_aborted() {
        let mut game = unplugged(8);
        assert!(game.tick().is_err());

        assert_eq!(game.tick().unwrap(), Phase::Aborted);
        assert_eq!(game.run(&mut NoPacing).unwrap(), Phase::Aborted);
        assert!(game.state().snake.is_empty());
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let config = GameConfig {
            start: Coordinate::new(7, 0, 0),
            ..GameConfig::seeded(9)
        };
        let result = GameLoop::new(config, ScriptedInput::new(Vec::new()), FrameRecorder::new());

        assert!(matches!(result, Err(ConfigError::NoRoomToGrow(_))));
    }
}
