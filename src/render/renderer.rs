use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Flex, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
};

use super::scene;
use super::surface::{PixelBuffer, Surface};
use crate::game::{Direction, GameConfig, GameState, Rgb};
use crate::input::{ButtonMap, KeyAction};
use crate::metrics::GameMetrics;

/// Samples taken across (and down) each grid cell when presenting the canvas
const SAMPLES_PER_CELL: u32 = 4;

const BUTTONS: [(&str, KeyAction); 5] = [
    ("▲", KeyAction::Turn(Direction::Up)),
    ("▼", KeyAction::Turn(Direction::Down)),
    ("◀", KeyAction::Turn(Direction::Left)),
    ("▶", KeyAction::Turn(Direction::Right)),
    ("Restart", KeyAction::Restart),
];

fn color(rgb: Rgb) -> Color {
    Color::Rgb(rgb.0, rgb.1, rgb.2)
}

/// Rectangle of at most `width` x `height` centred in `area`
fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

pub struct Renderer {
    canvas: PixelBuffer,
    cell_size: u32,
    stride: u32,
}

impl Renderer {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            canvas: PixelBuffer::new(config.canvas_width, config.canvas_height),
            cell_size: config.cell_size,
            stride: (config.cell_size / SAMPLES_PER_CELL).max(1),
        }
    }

    /// Terminal columns and rows the board needs, border excluded
    pub fn board_size(&self) -> (u16, u16) {
        let columns = self.canvas.width() / self.stride;
        let rows = (self.canvas.height() / self.stride).div_ceil(2);
        (columns as u16, rows as u16)
    }

    /// Draw one frame and return where the on-screen buttons ended up
    pub fn render(&mut self, frame: &mut Frame, state: &GameState, metrics: &GameMetrics) -> ButtonMap {
        let chunks = Layout::vertical([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Game area
            Constraint::Length(3), // Buttons
        ])
        .split(frame.area());

        // Render header with scores
        let stats = self.render_stats(state, metrics);
        frame.render_widget(stats, chunks[0]);

        let (columns, rows) = self.board_size();
        let board_area = centered_rect(chunks[1], columns + 2, rows + 2);

        if board_area.width < columns + 2 || board_area.height < rows + 2 {
            let message = self.render_too_small(columns + 2, rows + 2);
            frame.render_widget(message, chunks[1]);
        } else {
            scene::paint(&mut self.canvas, state, self.cell_size);
            let grid = self.render_grid();
            frame.render_widget(grid, board_area);
        }

        // The overlay only shows once the game is over
        if state.is_game_over {
            let popup = centered_rect(board_area, 36, 9);
            frame.render_widget(Clear, popup);
            frame.render_widget(self.render_game_over(state, metrics), popup);
        }

        self.render_buttons(frame, chunks[2])
    }

    /// Present the canvas with half blocks: two vertical samples per terminal cell
    fn render_grid(&self) -> Paragraph<'_> {
        let (columns, rows) = self.board_size();
        let offset = self.stride / 2;
        let sample = |column: u32, sample_row: u32| {
            self.canvas
                .pixel(column * self.stride + offset, sample_row * self.stride + offset)
                .unwrap_or(scene::BACKGROUND)
        };

        let mut lines = Vec::with_capacity(rows as usize);
        for row in 0..u32::from(rows) {
            let mut spans: Vec<Span> = Vec::new();
            let mut run = String::new();
            let mut run_style = Style::default();

            for column in 0..u32::from(columns) {
                let style = Style::default()
                    .fg(color(sample(column, row * 2)))
                    .bg(color(sample(column, row * 2 + 1)));

                if style != run_style && !run.is_empty() {
                    spans.push(Span::styled(std::mem::take(&mut run), run_style));
                }
                run_style = style;
                run.push('▀');
            }
            if !run.is_empty() {
                spans.push(Span::styled(run, run_style));
            }

            lines.push(Line::from(spans));
        }

        Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Double)
                .border_style(Style::default().fg(Color::White))
                .title(" Snake "),
        )
    }

    fn render_stats(&self, state: &GameState, metrics: &GameMetrics) -> Paragraph<'_> {
        let text = vec![
            Line::from(vec![
                Span::styled("Score: ", Style::default().fg(Color::Yellow)),
                Span::styled(
                    state.score.to_string(),
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::raw("    "),
                Span::styled("High Score: ", Style::default().fg(Color::Yellow)),
                Span::styled(
                    metrics.high_score.to_string(),
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::raw("    "),
                Span::styled("Speed: ", Style::default().fg(Color::Yellow)),
                Span::styled(
                    format!("{}ms", state.tick_interval.as_millis()),
                    Style::default().fg(Color::White),
                ),
                Span::raw("    "),
                Span::styled("Time: ", Style::default().fg(Color::Yellow)),
                Span::styled(metrics.format_time(), Style::default().fg(Color::White)),
            ]),
            Line::from(vec![
                Span::styled("↑↓←→", Style::default().fg(Color::Cyan)),
                Span::raw(" or "),
                Span::styled("WASD", Style::default().fg(Color::Cyan)),
                Span::raw(" to move | "),
                Span::styled("R", Style::default().fg(Color::Green)),
                Span::raw(" to restart | "),
                Span::styled("Q", Style::default().fg(Color::Red)),
                Span::raw(" to quit"),
            ]),
        ];

        Paragraph::new(text).alignment(Alignment::Center)
    }

    fn render_game_over(&self, state: &GameState, metrics: &GameMetrics) -> Paragraph<'_> {
        let outcome = state.outcome.map(|o| o.describe()).unwrap_or_default();
        let text = vec![
            Line::from(vec![Span::styled(
                "GAME OVER",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )]),
            Line::from(Span::styled(outcome, Style::default().fg(Color::Gray))),
            Line::from(""),
            Line::from(vec![
                Span::styled("Final Score: ", Style::default().fg(Color::Yellow)),
                Span::styled(
                    state.score.to_string(),
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(vec![
                Span::styled("High Score: ", Style::default().fg(Color::Yellow)),
                Span::styled(
                    metrics.high_score.to_string(),
                    Style::default().fg(Color::White),
                ),
            ]),
            Line::from(""),
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
                .border_style(Style::default().fg(Color::Red)),
        )
    }

    fn render_too_small(&self, width: u16, height: u16) -> Paragraph<'_> {
        Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(
                "Terminal too small",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )),
            Line::from(format!("The board needs {width}x{height} cells")),
        ])
        .alignment(Alignment::Center)
    }

    /// Direction pad and restart button, clickable with the mouse
    fn render_buttons(&self, frame: &mut Frame, area: Rect) -> ButtonMap {
        let constraints = BUTTONS
            .iter()
            .map(|(label, _)| Constraint::Length(label.chars().count() as u16 + 4));
        let areas = Layout::horizontal(constraints)
            .flex(Flex::Center)
            .spacing(1)
            .split(area);

        let mut buttons = ButtonMap::new();
        for ((label, action), &button_area) in BUTTONS.iter().zip(areas.iter()) {
            let accent = match action {
                KeyAction::Restart => Color::Green,
                _ => Color::Cyan,
            };
            let button = Paragraph::new(Span::styled(
                *label,
                Style::default().fg(accent).add_modifier(Modifier::BOLD),
            ))
            .alignment(Alignment::Center)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded)
                    .border_style(Style::default().fg(Color::DarkGray)),
            );
            frame.render_widget(button, button_area);
            buttons.insert(button_area, *action);
        }

        buttons
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::GameEngine;
    use ratatui::{Terminal, backend::TestBackend};

    fn draw(width: u16, height: u16, state: &GameState) -> (Terminal<TestBackend>, ButtonMap) {
        let config = GameConfig::default();
        let mut renderer = Renderer::new(&config);
        let metrics = GameMetrics::with_high_score(12);
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        let mut buttons = ButtonMap::new();
        terminal
            .draw(|frame| buttons = renderer.render(frame, state, &metrics))
            .unwrap();
        (terminal, buttons)
    }

    fn screen_text(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        buffer
            .content()
            .chunks(buffer.area.width as usize)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_board_size() {
        let renderer = Renderer::new(&GameConfig::default());
        assert_eq!(renderer.board_size(), (80, 40));
    }

    #[test]
    fn test_centered_rect() {
        let area = Rect::new(0, 0, 100, 50);
        assert_eq!(centered_rect(area, 20, 10), Rect::new(40, 20, 20, 10));
        assert_eq!(centered_rect(area, 200, 10), Rect::new(0, 20, 100, 10));
    }

    #[test]
    fn test_render_shows_scores_and_buttons() {
        let mut engine = GameEngine::with_seed(GameConfig::default(), 1);
        let mut state = engine.reset();
        state.score = 7;

        let (terminal, buttons) = draw(100, 52, &state);
        let text = screen_text(&terminal);

        assert!(text.contains("Score: 7"));
        assert!(text.contains("High Score: 12"));
        assert!(text.contains("200ms"));
        assert!(text.contains("Restart"));
        assert!(!text.contains("GAME OVER"));
        assert_eq!(buttons.len(), BUTTONS.len());
    }

    #[test]
    fn test_game_over_overlay() {
        let mut engine = GameEngine::with_seed(GameConfig::default(), 1);
        let mut state = engine.reset();
        state.score = 3;
        state.is_game_over = true;

        let (terminal, _) = draw(100, 52, &state);
        let text = screen_text(&terminal);

        assert!(text.contains("GAME OVER"));
        assert!(text.contains("Final Score: 3"));
    }

    #[test]
    fn test_small_terminal_warns() {
        let mut engine = GameEngine::with_seed(GameConfig::default(), 1);
        let state = engine.reset();

        let (terminal, _) = draw(40, 20, &state);
        assert!(screen_text(&terminal).contains("Terminal too small"));
    }

    #[test]
    fn test_restart_button_is_clickable() {
        let mut engine = GameEngine::with_seed(GameConfig::default(), 1);
        let state = engine.reset();

        let (_, buttons) = draw(100, 52, &state);

        let found = (0..100u16)
            .flat_map(|column| (0..52u16).map(move |row| (column, row)))
            .any(|(column, row)| buttons.hit(column, row) == KeyAction::Restart);
        assert!(found);
    }
}
