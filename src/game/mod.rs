//! Core game logic module for Snake
//!
//! This module contains all the game logic without any I/O or rendering dependencies.
//! It is driven the same way by a keyboard player and by the steering policy.

pub mod action;
pub mod config;
pub mod engine;
pub mod grid;
pub mod snapshot;
pub mod state;

// Re-export commonly used types
pub use action::{Control, Direction, Turn};
pub use config::GameConfig;
pub use engine::{GameEngine, TickResult};
pub use grid::{Grid, Position};
pub use snapshot::{CellKind, SnakeCellView, Snapshot};
pub use state::{Food, FoodKind, GameState, GameStatus, Rainbow, Snake};
