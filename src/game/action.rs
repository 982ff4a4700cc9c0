use serde::{Deserialize, Serialize};

/// Direction the snake can move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Returns true if turning from self to other would be a 180-degree turn
    pub fn is_opposite(&self, other: Direction) -> bool {
        matches!(
            (self, other),
            (Direction::Up, Direction::Down)
                | (Direction::Down, Direction::Up)
                | (Direction::Left, Direction::Right)
                | (Direction::Right, Direction::Left)
        )
    }

    /// Returns the delta (dx, dy) for moving in this direction
    pub fn delta(&self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    /// Inverse of [`Direction::delta`] for unit vectors
    pub fn from_delta(dx: i32, dy: i32) -> Option<Self> {
        match (dx, dy) {
            (0, -1) => Some(Direction::Up),
            (0, 1) => Some(Direction::Down),
            (-1, 0) => Some(Direction::Left),
            (1, 0) => Some(Direction::Right),
            _ => None,
        }
    }

    /// Rotate the heading vector by a quarter turn (screen coordinates, y grows down)
    pub fn turned(&self, turn: Turn) -> Self {
        let (dx, dy) = self.delta();
        let (nx, ny) = match turn {
            Turn::Left => (dy, -dx),
            Turn::Straight => (dx, dy),
            Turn::Right => (-dy, dx),
        };
        Self::from_delta(nx, ny).unwrap_or(*self)
    }
}

/// Heading-relative steering decision
///
/// Encoded for the predictor as a single scalar: left = 0.0, straight = 0.5,
/// right = 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Turn {
    Left,
    Straight,
    Right,
}

impl Turn {
    pub const ALL: [Turn; 3] = [Turn::Left, Turn::Straight, Turn::Right];

    pub fn encode(&self) -> f32 {
        match self {
            Turn::Left => 0.0,
            Turn::Straight => 0.5,
            Turn::Right => 1.0,
        }
    }

    /// Snap a predictor output to the closest of 0, 0.5 and 1
    pub fn decode(value: f32) -> Self {
        if !value.is_finite() {
            return Turn::Straight;
        }
        let steps = (value * 2.0).round().clamp(0.0, 2.0);
        match steps as u8 {
            0 => Turn::Left,
            1 => Turn::Straight,
            _ => Turn::Right,
        }
    }
}

/// Non-directional input understood by the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    /// Playing <-> Paused
    TogglePause,
    /// GameOver -> Playing with a fresh snake
    Restart,
    /// Restart when the game is over, otherwise toggle pause
    PauseOrRestart,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opposite_directions() {
        assert!(Direction::Up.is_opposite(Direction::Down));
        assert!(Direction::Down.is_opposite(Direction::Up));
        assert!(Direction::Left.is_opposite(Direction::Right));
        assert!(Direction::Right.is_opposite(Direction::Left));

        assert!(!Direction::Up.is_opposite(Direction::Left));
        assert!(!Direction::Up.is_opposite(Direction::Right));
    }

    #[test]
    fn test_direction_delta() {
        assert_eq!(Direction::Up.delta(), (0, -1));
        assert_eq!(Direction::Down.delta(), (0, 1));
        assert_eq!(Direction::Left.delta(), (-1, 0));
        assert_eq!(Direction::Right.delta(), (1, 0));
        assert_eq!(Direction::from_delta(1, 1), None);
    }

    #[test]
    fn test_quarter_turns() {
        assert_eq!(Direction::Right.turned(Turn::Left), Direction::Up);
        assert_eq!(Direction::Right.turned(Turn::Right), Direction::Down);
        assert_eq!(Direction::Up.turned(Turn::Left), Direction::Left);
        assert_eq!(Direction::Up.turned(Turn::Right), Direction::Right);
        assert_eq!(Direction::Down.turned(Turn::Straight), Direction::Down);

        // four identical turns come back to the start
        let mut heading = Direction::Left;
        for _ in 0..4 {
            heading = heading.turned(Turn::Right);
        }
        assert_eq!(heading, Direction::Left);
    }

    #[test]
    fn test_turn_never_reverses() {
        for dir in [Direction::Up, Direction::Down, Direction::Left, Direction::Right] {
            for turn in Turn::ALL {
                assert!(!dir.is_opposite(dir.turned(turn)));
            }
        }
    }

    #[test]
    fn test_turn_decode_rounds_to_nearest() {
        assert_eq!(Turn::decode(0.1), Turn::Left);
        assert_eq!(Turn::decode(0.3), Turn::Straight);
        assert_eq!(Turn::decode(0.74), Turn::Straight);
        assert_eq!(Turn::decode(0.8), Turn::Right);
        assert_eq!(Turn::decode(-3.0), Turn::Left);
        assert_eq!(Turn::decode(7.0), Turn::Right);
        assert_eq!(Turn::decode(f32::NAN), Turn::Straight);

        for turn in Turn::ALL {
            assert_eq!(Turn::decode(turn.encode()), turn);
        }
    }
}
