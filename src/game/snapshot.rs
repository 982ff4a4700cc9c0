//! Read-only view of a game handed to renderers once per frame

use super::grid::Position;
use super::state::{Food, FoodKind, GameState, GameStatus};

/// What occupies a grid cell, as far as drawing is concerned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellKind {
    Empty,
    /// `index` counts from the head (0); `hue` is set while the rainbow mode runs
    Snake { index: usize, hue: Option<u16> },
    /// `hue` cycles with the frame clock and is used by bonus items
    Food { kind: FoodKind, hue: u16 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SnakeCellView {
    pub position: Position,
    pub index: usize,
    pub hue: Option<u16>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub grid_size: usize,
    pub snake: Vec<SnakeCellView>,
    pub food: Option<Food>,
    pub score: usize,
    pub status: GameStatus,
    pub fps: f32,
    pub frames: u64,
    pub game_over_frames: u32,
}

impl Snapshot {
    pub fn capture(state: &GameState, fps: f32) -> Self {
        let rainbow = state.rainbow.elapsed();
        let snake = state
            .snake
            .body
            .iter()
            .enumerate()
            .map(|(index, &position)| SnakeCellView {
                position,
                index,
                // a cell's hue tracks how long it has existed during the rainbow run
                hue: rainbow.map(|ticks| (ticks.saturating_sub(index as u32) % 360) as u16),
            })
            .collect();

        Self {
            grid_size: state.grid.size(),
            snake,
            food: state.food,
            score: state.score(),
            status: state.status,
            fps,
            frames: state.frames,
            game_over_frames: state.game_over_frames,
        }
    }

    /// Classify a cell; snake segments are drawn above food lying under them
    pub fn cell_at(&self, pos: Position) -> CellKind {
        if let Some(cell) = self.snake.iter().find(|cell| cell.position == pos) {
            return CellKind::Snake {
                index: cell.index,
                hue: cell.hue,
            };
        }

        match self.food {
            Some(food) if food.position == pos => CellKind::Food {
                kind: food.kind,
                hue: (self.frames % 360) as u16,
            },
            _ => CellKind::Empty,
        }
    }

    /// Blinking "game over" banner: visible for 20 frames out of every 40
    pub fn game_over_banner_visible(&self) -> bool {
        self.status == GameStatus::GameOver && self.game_over_frames % 40 < 20
    }
}
