use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
};

use crate::game::{Collision, Coordinate, Frame as CubeFrame, GRID_SIZE, GameState, Phase};
use crate::metrics::GameMetrics;

/// Draws the cube as eight stacked z-layers
pub struct Renderer;

impl Renderer {
    pub fn new() -> Self {
        Self
    }

    pub fn render(
        &self,
        frame: &mut Frame,
        cube: &CubeFrame,
        state: &GameState,
        phase: Phase,
        metrics: &GameMetrics,
    ) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(0),    // Cube layers
                Constraint::Length(3), // Footer
            ])
            .split(frame.area());

        let stats = self.render_stats(state, phase, metrics);
        frame.render_widget(stats, chunks[0]);

        if phase.is_terminal() {
            let halves = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(0), Constraint::Length(8)])
                .split(chunks[1]);
            self.render_layers(frame, halves[0], cube, state);
            frame.render_widget(self.render_game_over(state, phase, metrics), halves[1]);
        } else {
            self.render_layers(frame, chunks[1], cube, state);
        }

        let controls = self.render_controls();
        frame.render_widget(controls, chunks[2]);
    }

    /// Two rows of four layers, top layer first
    fn render_layers(&self, frame: &mut Frame, area: Rect, cube: &CubeFrame, state: &GameState) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(10), Constraint::Length(10)])
            .split(area);

        for (row_index, row_area) in rows.iter().enumerate() {
            let columns = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Length(18); 4])
                .split(*row_area);

            for (col_index, cell_area) in columns.iter().enumerate() {
                let z = GRID_SIZE - 1 - (row_index * 4 + col_index) as i32;
                frame.render_widget(self.render_layer(z, cube, state), *cell_area);
            }
        }
    }

    fn render_layer(&self, z: i32, cube: &CubeFrame, state: &GameState) -> Paragraph<'_> {
        let mut lines = Vec::new();

        // North at the top
        for y in (0..GRID_SIZE).rev() {
            let mut spans = Vec::new();

            for x in 0..GRID_SIZE {
                let pos = Coordinate::new(x, y, z);
                let lit = cube[(GRID_SIZE * y + x) as usize] & (1 << z) != 0;

                let cell = if !lit {
                    Span::styled("· ", Style::default().fg(Color::DarkGray))
                } else if state.snake.head() == Some(pos) {
                    Span::styled(
                        "■ ",
                        Style::default()
                            .fg(Color::Cyan)
                            .add_modifier(Modifier::BOLD),
                    )
                } else if state.snake.contains(pos) {
                    Span::styled("□ ", Style::default().fg(Color::Green))
                } else {
                    // Apple, or a victory light
                    Span::styled(
                        "O ",
                        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                    )
                };

                spans.push(cell);
            }

            lines.push(Line::from(spans));
        }

        Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(Color::White))
                .title(format!(" z={z} ")),
        )
    }

    fn render_stats(&self, state: &GameState, phase: Phase, metrics: &GameMetrics) -> Paragraph<'_> {
        let heading = state.snake.heading();
        let text = vec![Line::from(vec![
            Span::styled("Length: ", Style::default().fg(Color::Yellow)),
            Span::styled(
                state.snake.len().to_string(),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("    "),
            Span::styled("Steps: ", Style::default().fg(Color::Yellow)),
            Span::styled(state.steps.to_string(), Style::default().fg(Color::White)),
            Span::raw("    "),
            Span::styled("Heading: ", Style::default().fg(Color::Yellow)),
            Span::styled(
                format!("({}, {}, {})", heading.x, heading.y, heading.z),
                Style::default().fg(Color::White),
            ),
            Span::raw("    "),
            Span::styled("Time: ", Style::default().fg(Color::Yellow)),
            Span::styled(metrics.format_time(), Style::default().fg(Color::White)),
            Span::raw("    "),
            Span::styled(format!("{phase:?}"), Style::default().fg(Color::Gray)),
        ])];

        Paragraph::new(text).alignment(Alignment::Center)
    }

    fn render_game_over(&self, state: &GameState, phase: Phase, metrics: &GameMetrics) -> Paragraph<'_> {
        let (title, color) = match phase {
            Phase::Won => ("YOU WIN", Color::Green),
            Phase::Blocked(Collision::Wall) => ("GAME OVER - hit the wall", Color::Red),
            Phase::Blocked(Collision::SelfCollision) => ("GAME OVER - bit yourself", Color::Red),
            Phase::Aborted => ("STOPPED - frame output failed", Color::Red),
            Phase::Initializing | Phase::Running => ("", Color::Gray),
        };

        let text = vec![
            Line::from(vec![Span::styled(
                title,
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            )]),
            Line::from(vec![
                Span::styled("Apples: ", Style::default().fg(Color::Yellow)),
                Span::styled(
                    state.score.to_string(),
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::raw("    "),
                Span::styled("Best length: ", Style::default().fg(Color::Yellow)),
                Span::styled(
                    metrics.best_length.to_string(),
                    Style::default().fg(Color::White),
                ),
                Span::raw("    "),
                Span::styled("Wins: ", Style::default().fg(Color::Yellow)),
                Span::styled(
                    format!("{}/{}", metrics.games_won, metrics.games_played),
                    Style::default().fg(Color::White),
                ),
            ]),
            Line::from(vec![
                Span::styled("Press ", Style::default().fg(Color::Gray)),
                Span::styled(
                    "R",
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(" to restart or ", Style::default().fg(Color::Gray)),
                Span::styled(
                    "Q",
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                ),
                Span::styled(" to quit", Style::default().fg(Color::Gray)),
            ]),
        ];

        Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(color)),
        )
    }

    fn render_controls(&self) -> Paragraph<'_> {
        let text = vec![Line::from(vec![
            Span::styled("←→", Style::default().fg(Color::Cyan)),
            Span::raw(" or "),
            Span::styled("AD", Style::default().fg(Color::Cyan)),
            Span::raw(" to turn | "),
            Span::styled("↑↓", Style::default().fg(Color::Cyan)),
            Span::raw(" or "),
            Span::styled("WS", Style::default().fg(Color::Cyan)),
            Span::raw(" to climb/dive | "),
            Span::styled("Q", Style::default().fg(Color::Red)),
            Span::raw(" to quit"),
        ])];

        Paragraph::new(text).alignment(Alignment::Center)
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}
