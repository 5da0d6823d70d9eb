use anyhow::{Context, Result};
use crossterm::{
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{Stderr, stderr};
use std::time::Duration;
use tokio::time::interval;
use tracing::info;

use crate::game::{GameConfig, GameLoop, GameState, Phase};
use crate::input::{InputHandler, KeyAction, VirtualJoystick};
use crate::metrics::GameMetrics;
use crate::output::FrameRecorder;
use crate::render::Renderer;

type InteractiveLoop = GameLoop<VirtualJoystick, FrameRecorder>;

/// Keyboard-steered play in the terminal
pub struct HumanMode {
    config: GameConfig,
    game: InteractiveLoop,
    /// State as of the last live iteration, kept for drawing after a crash
    last_alive: GameState,
    metrics: GameMetrics,
    renderer: Renderer,
    input_handler: InputHandler,
    should_quit: bool,
}

impl HumanMode {
    pub fn new(config: GameConfig) -> Result<Self> {
        let mut game = Self::new_loop(&config)?;
        game.start();
        let last_alive = game.state().clone();

        Ok(Self {
            config,
            game,
            last_alive,
            metrics: GameMetrics::new(),
            renderer: Renderer::new(),
            input_handler: InputHandler::new(),
            should_quit: false,
        })
    }

    fn new_loop(config: &GameConfig) -> Result<InteractiveLoop> {
        GameLoop::new(config.clone(), VirtualJoystick::new(), FrameRecorder::new())
            .context("Invalid game configuration")
    }

    pub async fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stderr = stderr();
        execute!(stderr, EnterAlternateScreen).context("Failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stderr);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor().context("Failed to hide cursor")?;
        terminal.clear().context("Failed to clear terminal")?;

        // Run game loop with cleanup
        let result = self.run_game_loop(&mut terminal).await;

        // Cleanup terminal
        self.cleanup_terminal(&mut terminal)?;

        result
    }

    async fn run_game_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        let mut event_stream = EventStream::new();

        // tokio intervals reject a zero period
        let tick_interval = self.config.tick_interval().max(Duration::from_millis(1));
        let mut tick_timer = interval(tick_interval);

        // Render at 30 FPS (33ms per frame)
        let render_interval = Duration::from_millis(33);
        let mut render_timer = interval(render_interval);

        loop {
            tokio::select! {
                // Handle terminal events
                maybe_event = event_stream.next() => {
                    if let Some(Ok(event)) = maybe_event {
                        self.handle_event(event)?;
                    }
                }

                // Game logic tick
                _ = tick_timer.tick() => {
                    if !self.game.phase().is_terminal() {
                        self.update_game()?;
                    }
                }

                // Render frame
                _ = render_timer.tick() => {
                    if !self.game.phase().is_terminal() {
                        self.metrics.update();
                    }
                    let phase = self.game.phase();
                    let state = self.display_state();
                    let cube = self
                        .game
                        .sink()
                        .latest()
                        .copied()
                        .unwrap_or_else(|| state.frame());
                    terminal.draw(|frame| {
                        self.renderer.render(frame, &cube, state, phase, &self.metrics);
                    }).context("Failed to draw frame")?;
                }

                // Handle Ctrl+C
                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, event: Event) -> Result<()> {
        if let Event::Key(key) = event {
            // Only process key press events, not release
            if key.kind != KeyEventKind::Press {
                return Ok(());
            }

            match self.input_handler.handle_key_event(key) {
                KeyAction::Steer(change) => {
                    self.game.input_mut().push(change);
                }
                KeyAction::Restart => {
                    self.reset_game()?;
                }
                KeyAction::Quit => {
                    self.should_quit = true;
                }
                KeyAction::None => {}
            }
        }

        Ok(())
    }

    fn update_game(&mut self) -> Result<()> {
        self.last_alive = self.game.state().clone();

        let phase = self.game.tick().context("Failed to emit frame")?;
        self.game.input_mut().release();

        match phase {
            Phase::Won => self.metrics.on_game_over(self.game.state().snake.len(), true),
            Phase::Blocked(_) => self.metrics.on_game_over(self.last_alive.snake.len(), false),
            Phase::Initializing | Phase::Running | Phase::Aborted => {}
        }

        Ok(())
    }

    /// The state to draw: the live one, or the last live one after a crash
    fn display_state(&self) -> &GameState {
        match self.game.phase() {
            Phase::Blocked(_) => &self.last_alive,
            _ => self.game.state(),
        }
    }

    fn reset_game(&mut self) -> Result<()> {
        info!("restarting");
        self.game = Self::new_loop(&self.config)?;
        self.game.start();
        self.last_alive = self.game.state().clone();
        self.metrics.on_game_start();
        Ok(())
    }

    fn cleanup_terminal(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)
            .context("Failed to leave alternate screen")?;
        terminal.show_cursor().context("Failed to show cursor")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::DirectionChange;

    #[test]
    fn test_game_initialization() {
        let mode = HumanMode::new(GameConfig::seeded(1)).unwrap();
        assert_eq!(mode.game.phase(), Phase::Running);
        assert_eq!(mode.game.state().snake.len(), 2);
    }

    #[test]
    fn test_keypress_steers_one_tick() {
        let mut mode = HumanMode::new(GameConfig::seeded(2)).unwrap();
        mode.game.input_mut().push(DirectionChange::Up);

        mode.update_game().unwrap();

        assert_eq!(mode.game.state().snake.head().map(|head| head.z), Some(6));
        assert_eq!(mode.game.input_mut().held(), None);
    }

    #[test]
    fn test_crash_keeps_last_live_state() {
        let mut mode = HumanMode::new(GameConfig::seeded(3)).unwrap();
        while !mode.game.phase().is_terminal() {
            mode.update_game().unwrap();
        }

        assert!(matches!(mode.game.phase(), Phase::Blocked(_)));
        assert!(mode.display_state().snake.len() >= 2);
        assert_eq!(mode.metrics.games_played, 1);
    }

    #[test]
    fn test_game_reset() {
        let mut mode = HumanMode::new(GameConfig::seeded(4)).unwrap();
        while !mode.game.phase().is_terminal() {
            mode.update_game().unwrap();
        }

        mode.reset_game().unwrap();
        assert_eq!(mode.game.phase(), Phase::Running);
        assert_eq!(mode.game.state().snake.len(), 2);
    }
}
