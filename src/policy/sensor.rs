//! Feature vectors describing the snake's immediate surroundings
//!
//! Two layouts exist:
//!
//! - [`SensorLayout::Relative`]: `[front, left, right, length, food_angle]`, where the
//!   first three are 0/1 blockage flags relative to the heading, `length` is the target
//!   length divided by the grid area and `food_angle` maps the bearing from heading to
//!   food onto [0, 1] (0.5 = straight ahead).
//! - [`SensorLayout::Absolute`]: `[up, down, left, right]` blockage flags.
//!
//! Blockage looks at the wrapped neighbour cell, so it agrees with where the engine
//! would actually move the head.

use std::f32::consts::{PI, TAU};

use serde::{Deserialize, Serialize};

use crate::game::{Direction, GameState, Position, Turn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SensorLayout {
    #[default]
    Relative,
    Absolute,
}

impl SensorLayout {
    pub fn input_size(&self) -> usize {
        match self {
            SensorLayout::Relative => 5,
            SensorLayout::Absolute => 4,
        }
    }
}

/// Compute the feature vector for `state`
///
/// A finished episode has no head; its features are all zero.
pub fn sense(state: &GameState, layout: SensorLayout) -> Vec<f32> {
    let Some(head) = state.snake.head() else {
        return vec![0.0; layout.input_size()];
    };

    match layout {
        SensorLayout::Relative => {
            let heading = state.snake.heading;
            // missing food falls back to the origin
            let food = state.food.map(|food| food.position).unwrap_or_default();

            vec![
                blocked(state, head, heading),
                blocked(state, head, heading.turned(Turn::Left)),
                blocked(state, head, heading.turned(Turn::Right)),
                state.snake.target_length as f32 / state.grid.area() as f32,
                food_angle(head, heading, food),
            ]
        }
        SensorLayout::Absolute => [
            Direction::Up,
            Direction::Down,
            Direction::Left,
            Direction::Right,
        ]
        .into_iter()
        .map(|direction| blocked(state, head, direction))
        .collect(),
    }
}

fn blocked(state: &GameState, head: Position, direction: Direction) -> f32 {
    let neighbour = state.grid.step(head, direction);
    if state.snake.collides_with_body(neighbour) {
        1.0
    } else {
        0.0
    }
}

/// Bearing from heading to food, rescaled from [-π, π] to [0, 1]
pub fn food_angle(head: Position, heading: Direction, food: Position) -> f32 {
    let (hx, hy) = heading.delta();
    let heading_bearing = (hy as f32).atan2(hx as f32);
    let food_bearing = ((food.y - head.y) as f32).atan2((food.x - head.x) as f32);

    let mut diff = food_bearing - heading_bearing;
    if diff > PI {
        diff -= TAU;
    } else if diff < -PI {
        diff += TAU;
    }

    ((diff + PI) / TAU).clamp(0.0, 1.0)
}
