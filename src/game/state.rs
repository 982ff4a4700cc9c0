use super::action::Direction;
use super::grid::{Grid, Position};

/// The snake in the game
#[derive(Debug, Clone, PartialEq)]
pub struct Snake {
    /// Body segments, with head at index 0
    pub body: Vec<Position>,
    /// Direction the next tick moves in
    pub heading: Direction,
    /// Length the body grows towards; eating raises it by one
    pub target_length: usize,
}

impl Snake {
    /// A one-cell snake that grows to `target_length` over its first ticks
    pub fn new(head: Position, heading: Direction, target_length: usize) -> Self {
        Self {
            body: vec![head],
            heading,
            target_length,
        }
    }

    /// Get the head position, `None` once the body has been cleared
    pub fn head(&self) -> Option<Position> {
        self.body.first().copied()
    }

    /// Get body segments (excluding head)
    pub fn body_segments(&self) -> &[Position] {
        self.body.get(1..).unwrap_or(&[])
    }

    /// Check if position collides with snake body (excluding head)
    pub fn collides_with_body(&self, pos: Position) -> bool {
        self.body_segments().contains(&pos)
    }

    /// Push a new head and drop the tail once the body exceeds its target length
    pub fn advance(&mut self, new_head: Position) {
        self.body.insert(0, new_head);

        if self.body.len() > self.target_length {
            self.body.pop();
        }
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FoodKind {
    Normal,
    /// Also starts the rainbow mode when eaten
    Bonus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Food {
    pub position: Position,
    pub kind: FoodKind,
}

impl Food {
    pub fn new(position: Position, kind: FoodKind) -> Self {
        Self { position, kind }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameStatus {
    Playing,
    Paused,
    GameOver,
}

/// Cosmetic mode triggered by bonus food
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rainbow {
    ticks: Option<u32>,
}

impl Rainbow {
    pub fn activate(&mut self) {
        self.ticks = Some(0);
    }

    pub fn is_active(&self) -> bool {
        self.ticks.is_some()
    }

    /// Ticks since activation, `None` when inactive
    pub fn elapsed(&self) -> Option<u32> {
        self.ticks
    }

    /// Count one tick; switches off once `duration` is exceeded
    pub fn advance(&mut self, duration: u32) {
        if let Some(ticks) = self.ticks {
            let next = ticks + 1;
            self.ticks = (next <= duration).then_some(next);
        }
    }
}

/// Complete game state
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    pub snake: Snake,
    /// At most one food item exists at a time
    pub food: Option<Food>,
    pub grid: Grid,
    pub status: GameStatus,
    pub rainbow: Rainbow,
    /// Target length the snake started the episode with
    pub initial_length: usize,
    /// Ticks taken in the current episode
    pub ticks: u32,
    /// Frames seen since the state was created
    pub frames: u64,
    /// Frames since the episode ended, zero while not over
    pub game_over_frames: u32,
    /// Frames counted towards the next tick
    pub(crate) frame_counter: u32,
}

impl GameState {
    pub fn new(snake: Snake, food: Option<Food>, grid: Grid) -> Self {
        let initial_length = snake.target_length;
        Self {
            snake,
            food,
            grid,
            status: GameStatus::Playing,
            rainbow: Rainbow::default(),
            initial_length,
            ticks: 0,
            frames: 0,
            game_over_frames: 0,
            frame_counter: 0,
        }
    }

    /// Food eaten this episode
    pub fn score(&self) -> usize {
        self.snake.target_length.saturating_sub(self.initial_length)
    }

    pub fn is_playing(&self) -> bool {
        self.status == GameStatus::Playing
    }

    pub fn is_over(&self) -> bool {
        self.status == GameStatus::GameOver
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snake_creation() {
        let snake = Snake::new(Position::new(5, 5), Direction::Right, 3);
        assert_eq!(snake.len(), 1);
        assert_eq!(snake.head(), Some(Position::new(5, 5)));
        assert!(snake.body_segments().is_empty());
    }

    #[test]
    fn test_snake_grows_to_target_then_keeps_length() {
        let mut snake = Snake::new(Position::new(5, 5), Direction::Right, 3);

        snake.advance(Position::new(6, 5));
        snake.advance(Position::new(7, 5));
        assert_eq!(snake.len(), 3);

        snake.advance(Position::new(8, 5));
        assert_eq!(snake.len(), 3);
        assert_eq!(snake.head(), Some(Position::new(8, 5)));
        assert_eq!(*snake.body.last().unwrap(), Position::new(6, 5));
    }

    #[test]
    fn test_collision_detection() {
        let mut snake = Snake::new(Position::new(5, 5), Direction::Right, 3);
        snake.advance(Position::new(6, 5));
        snake.advance(Position::new(7, 5));

        assert!(!snake.collides_with_body(Position::new(7, 5))); // head
        assert!(snake.collides_with_body(Position::new(6, 5))); // body
        assert!(!snake.collides_with_body(Position::new(10, 10))); // empty
    }

    #[test]
    fn test_cleared_snake_has_no_head() {
        let mut snake = Snake::new(Position::new(1, 1), Direction::Up, 3);
        snake.body.clear();
        assert_eq!(snake.head(), None);
        assert!(snake.body_segments().is_empty());
    }

    #[test]
    fn test_rainbow_expires_after_duration() {
        let mut rainbow = Rainbow::default();
        assert!(!rainbow.is_active());

        rainbow.activate();
        for _ in 0..3 {
            rainbow.advance(3);
        }
        assert_eq!(rainbow.elapsed(), Some(3));

        rainbow.advance(3);
        assert!(!rainbow.is_active());
    }

    #[test]
    fn test_score_is_derived_from_target_length() {
        let snake = Snake::new(Position::new(2, 2), Direction::Right, 3);
        let mut state = GameState::new(snake, None, Grid::new(8));
        assert_eq!(state.score(), 0);

        state.snake.target_length += 2;
        assert_eq!(state.score(), 2);
    }
}
