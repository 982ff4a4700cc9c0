use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
};

use super::palette::{CellAppearance, appearance};
use crate::game::{GameStatus, Position, Snapshot};
use crate::metrics::GameMetrics;

/// Extra header fields supplied by the running mode
#[derive(Debug, Clone, Default)]
pub struct HeaderInfo {
    /// "Manual", "Exploring", "Trained", ...
    pub mode: String,
    pub speed: u8,
    pub detail: Option<String>,
}

pub struct Renderer;

impl Renderer {
    pub fn new() -> Self {
        Self
    }

    pub fn render(
        &self,
        frame: &mut Frame,
        snapshot: &Snapshot,
        metrics: &GameMetrics,
        header: &HeaderInfo,
    ) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(0),    // Game area
                Constraint::Length(3), // Footer
            ])
            .split(frame.area());

        frame.render_widget(self.render_stats(snapshot, metrics, header), chunks[0]);

        let game_area = centered(chunks[1], snapshot.grid_size as u16 * 2 + 2, snapshot.grid_size as u16 + 2);
        frame.render_widget(self.render_grid(snapshot), game_area);

        match snapshot.status {
            GameStatus::Paused => {
                let popup = centered(game_area, 16, 3);
                frame.render_widget(Clear, popup);
                frame.render_widget(self.render_banner("PAUSED", Color::Yellow), popup);
            }
            GameStatus::GameOver if snapshot.game_over_banner_visible() => {
                let popup = centered(game_area, 20, 3);
                frame.render_widget(Clear, popup);
                frame.render_widget(self.render_banner("GAME OVER", Color::Red), popup);
            }
            _ => {}
        }

        frame.render_widget(self.render_controls(snapshot.status), chunks[2]);
    }

    fn render_grid(&self, snapshot: &Snapshot) -> Paragraph<'_> {
        let size = snapshot.grid_size as i32;
        let lines: Vec<Line> = (0..size)
            .map(|y| {
                let spans: Vec<Span> = (0..size)
                    .map(|x| styled(appearance(snapshot.cell_at(Position::new(x, y)))))
                    .collect();
                Line::from(spans)
            })
            .collect();

        Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Double)
                .border_style(Style::default().fg(Color::White))
                .title(" Snake "),
        )
    }

    fn render_stats(
        &self,
        snapshot: &Snapshot,
        metrics: &GameMetrics,
        header: &HeaderInfo,
    ) -> Paragraph<'_> {
        let label = Style::default().fg(Color::Yellow);
        let value = Style::default().fg(Color::White);

        let mut spans = vec![
            Span::styled("Score: ", label),
            Span::styled(
                snapshot.score.to_string(),
                value.add_modifier(Modifier::BOLD),
            ),
            Span::raw("    "),
            Span::styled("Best: ", label),
            Span::styled(metrics.high_score.to_string(), value),
            Span::raw("    "),
            Span::styled("FPS: ", label),
            Span::styled(format!("{}", snapshot.fps.floor() as u32), value),
            Span::raw("    "),
            Span::styled("Mode: ", label),
            Span::styled(header.mode.clone(), Style::default().fg(Color::Cyan)),
            Span::raw("    "),
            Span::styled("Speed: ", label),
            Span::styled(header.speed.to_string(), value),
        ];
        if let Some(detail) = &header.detail {
            spans.push(Span::raw("    "));
            spans.push(Span::styled(detail.clone(), Style::default().fg(Color::Gray)));
        }

        Paragraph::new(Line::from(spans)).alignment(Alignment::Center)
    }

    fn render_banner(&self, text: &'static str, color: Color) -> Paragraph<'static> {
        Paragraph::new(Line::from(Span::styled(
            text,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(color)),
        )
    }

    fn render_controls(&self, status: GameStatus) -> Paragraph<'_> {
        let action = if status == GameStatus::GameOver {
            " to restart | "
        } else {
            " to pause | "
        };

        let text = vec![Line::from(vec![
            Span::styled("↑↓←→", Style::default().fg(Color::Cyan)),
            Span::raw(" or "),
            Span::styled("WASD", Style::default().fg(Color::Cyan)),
            Span::raw(" to move | "),
            Span::styled("Space", Style::default().fg(Color::Green)),
            Span::raw(action),
            Span::styled("1-4", Style::default().fg(Color::Cyan)),
            Span::raw(" speed | "),
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

fn styled(cell: CellAppearance) -> Span<'static> {
    let mut style = Style::default().fg(Color::Rgb(cell.color.0, cell.color.1, cell.color.2));
    if cell.bold {
        style = style.add_modifier(Modifier::BOLD);
    }
    Span::styled(cell.glyph, style)
}

/// A `width` x `height` rectangle centred in `area`, clipped to it
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
