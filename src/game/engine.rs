use rand::{Rng, SeedableRng, rngs::SmallRng};
use tracing::{debug, trace};

use super::{
    action::{Control, Direction},
    config::GameConfig,
    grid::Grid,
    state::{Food, FoodKind, GameState, GameStatus, Snake},
};

/// Outcome of a single tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickResult {
    /// Snake moved without eating
    Continued,
    /// Snake ate a food item
    Grew,
    /// Snake ran into itself; the episode is over
    SelfCollided,
    /// Nothing moved: the game is paused, over, or has no snake
    Idle,
}

impl TickResult {
    /// Reward for this outcome (for training statistics)
    pub fn reward(&self, config: &GameConfig) -> f32 {
        match self {
            TickResult::Continued => config.step_penalty,
            TickResult::Grew => config.step_penalty + config.food_reward,
            TickResult::SelfCollided => config.death_penalty,
            TickResult::Idle => 0.0,
        }
    }

    pub fn is_fatal(&self) -> bool {
        matches!(self, TickResult::SelfCollided)
    }
}

/// The game engine that handles all game logic
pub struct GameEngine {
    config: GameConfig,
    rng: SmallRng,
}

impl GameEngine {
    /// Create a new game engine with the given configuration
    pub fn new(config: GameConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        };
        Self { config, rng }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Change how many frames pass per tick (speed control)
    pub fn set_tick_interval(&mut self, frames: u32) {
        self.config.tick_interval = frames.max(1);
    }

    pub fn grid(&self) -> Grid {
        Grid::new(self.config.grid_size)
    }

    /// Reset the game to initial state
    pub fn reset(&mut self) -> GameState {
        let grid = self.grid();
        let snake = Snake::new(grid.center(), Direction::Right, self.config.initial_length);
        let mut state = GameState::new(snake, None, grid);
        self.spawn_food(&mut state);
        state
    }

    /// Replace `state` with a fresh episode, keeping the frame clock
    pub fn restart(&mut self, state: &mut GameState) {
        let frames = state.frames;
        *state = self.reset();
        state.frames = frames;
        debug!("episode restarted");
    }

    /// Point the snake in `direction` unless that would reverse it
    ///
    /// Returns false when the change was rejected and the heading kept.
    pub fn steer(&self, state: &mut GameState, direction: Direction) -> bool {
        if state.snake.heading.is_opposite(direction) {
            trace!(?direction, heading = ?state.snake.heading, "reversal ignored");
            return false;
        }
        state.snake.heading = direction;
        true
    }

    /// Count one frame and report whether a tick is due
    ///
    /// Never reports a tick while paused or over.
    pub fn advance_frame(&self, state: &mut GameState) -> bool {
        state.frames += 1;

        match state.status {
            GameStatus::Playing => {
                state.frame_counter += 1;
                if state.frame_counter < self.config.tick_interval {
                    return false;
                }
                state.frame_counter = 0;
                true
            }
            GameStatus::Paused => false,
            GameStatus::GameOver => {
                state.game_over_frames = state.game_over_frames.saturating_add(1);
                false
            }
        }
    }

    /// Execute one step of the game
    pub fn tick(&mut self, state: &mut GameState, direction: Direction) -> TickResult {
        if !state.is_playing() {
            return TickResult::Idle;
        }

        let Some(head) = state.snake.head() else {
            return TickResult::Idle;
        };

        self.steer(state, direction);

        let new_head = state.grid.step(head, state.snake.heading);
        if state.grid.crosses_edge(head, state.snake.heading) {
            trace!(from = ?head, to = ?new_head, "wrapped around edge");
        }

        state.snake.advance(new_head);
        state.ticks += 1;
        state.rainbow.advance(self.config.rainbow_duration);

        if state.snake.collides_with_body(new_head) {
            debug!(at = ?new_head, score = state.score(), "snake collided with itself");
            self.end_episode(state);
            return TickResult::SelfCollided;
        }

        let mut result = TickResult::Continued;

        if let Some(food) = state.food.filter(|food| food.position == new_head) {
            state.food = None;
            state.snake.target_length += 1;
            if food.kind == FoodKind::Bonus {
                state.rainbow.activate();
            }
            debug!(at = ?new_head, kind = ?food.kind, score = state.score(), "food eaten");
            result = TickResult::Grew;
        }

        self.spawn_food(state);

        result
    }

    /// Finish the episode: the snake and food are cleared
    pub fn end_episode(&self, state: &mut GameState) {
        state.snake.body.clear();
        state.food = None;
        state.status = GameStatus::GameOver;
        state.game_over_frames = 0;
        state.frame_counter = 0;
    }

    /// Apply a pause/restart intent
    pub fn apply_control(&mut self, state: &mut GameState, control: Control) {
        match (control, state.status) {
            (Control::TogglePause | Control::PauseOrRestart, GameStatus::Playing) => {
                state.status = GameStatus::Paused;
            }
            (Control::TogglePause | Control::PauseOrRestart, GameStatus::Paused) => {
                state.status = GameStatus::Playing;
            }
            (Control::Restart | Control::PauseOrRestart, GameStatus::GameOver) => {
                self.restart(state);
            }
            _ => {}
        }
    }

    /// Spawn food at a random cell when none exists and the game is not over
    ///
    /// The cell may lie under the snake body.
    pub fn spawn_food(&mut self, state: &mut GameState) {
        if state.food.is_some() || state.is_over() {
            return;
        }

        let position = state.grid.random_cell(&mut self.rng);
        let kind = if self.rng.gen_bool(self.config.bonus_chance) {
            FoodKind::Bonus
        } else {
            FoodKind::Normal
        };

        trace!(?position, ?kind, "food spawned");
        state.food = Some(Food::new(position, kind));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Position;

    fn engine_with(grid_size: usize) -> GameEngine {
        GameEngine::new(GameConfig::new(grid_size).with_seed(1))
    }

    fn state_at(grid_size: usize, head: Position, heading: Direction, target: usize) -> GameState {
        GameState::new(Snake::new(head, heading, target), None, Grid::new(grid_size))
    }

    #[test]
    fn test_reset() {
        let mut engine = GameEngine::new(GameConfig::small());
        let state = engine.reset();

        assert!(state.is_playing());
        assert_eq!(state.score(), 0);
        assert_eq!(state.ticks, 0);
        assert_eq!(state.snake.len(), 1);
        assert_eq!(state.snake.head(), Some(Position::new(5, 5)));
        assert_eq!(state.snake.heading, Direction::Right);
        assert!(state.food.is_some());
    }

    #[test]
    fn test_basic_movement() {
        let mut engine = GameEngine::new(GameConfig::small());
        let mut state = engine.reset();
        state.food = Some(Food::new(Position::new(0, 0), FoodKind::Normal));

        let result = engine.tick(&mut state, Direction::Right);

        assert_eq!(result, TickResult::Continued);
        assert_eq!(state.ticks, 1);
        assert_eq!(state.snake.head(), Some(Position::new(6, 5)));
    }

    #[test]
    fn test_wraps_instead_of_dying() {
        let mut engine = engine_with(4);
        let mut state = state_at(4, Position::new(3, 2), Direction::Right, 3);

        let result = engine.tick(&mut state, Direction::Right);

        assert_ne!(result, TickResult::SelfCollided);
        assert_eq!(state.snake.head(), Some(Position::new(0, 2)));
    }

    #[test]
    fn test_food_consumption() {
        let mut engine = engine_with(16);
        let mut state = state_at(16, Position::new(8, 8), Direction::Right, 3);
        state.food = Some(Food::new(Position::new(9, 8), FoodKind::Normal));

        let result = engine.tick(&mut state, Direction::Right);

        assert_eq!(result, TickResult::Grew);
        assert_eq!(state.snake.target_length, 4);
        assert_eq!(state.score(), 1);
        assert!(result.reward(engine.config()) > 0.0);
        // replacement spawned before the next tick
        let food = state.food.expect("food respawned");
        assert!(state.grid.contains(food.position));
    }

    #[test]
    fn test_bonus_food_starts_rainbow() {
        let mut engine = engine_with(16);
        let mut state = state_at(16, Position::new(8, 8), Direction::Right, 3);
        state.food = Some(Food::new(Position::new(9, 8), FoodKind::Bonus));

        engine.tick(&mut state, Direction::Right);

        assert!(state.rainbow.is_active());
        assert_eq!(state.score(), 1);
    }

    #[test]
    fn test_self_collision() {
        let mut engine = engine_with(10);
        let mut state = state_at(10, Position::new(5, 5), Direction::Right, 5);
        state.food = Some(Food::new(Position::new(0, 9), FoodKind::Normal));

        // grow to (8,5) (7,5) (6,5) (5,5) then curl back into the body
        for _ in 0..3 {
            engine.tick(&mut state, Direction::Right);
        }
        engine.tick(&mut state, Direction::Down);
        engine.tick(&mut state, Direction::Left);
        let result = engine.tick(&mut state, Direction::Up);

        assert_eq!(result, TickResult::SelfCollided);
        assert_eq!(state.status, GameStatus::GameOver);
        assert!(state.snake.is_empty());
        assert!(state.food.is_none());
    }

    #[test]
    fn test_moving_into_vacated_tail_is_safe() {
        let mut engine = engine_with(10);
        let mut state = state_at(10, Position::new(5, 5), Direction::Up, 4);
        state.snake.body = vec![
            Position::new(5, 5),
            Position::new(5, 6),
            Position::new(4, 6),
            Position::new(4, 5),
        ];
        state.food = Some(Food::new(Position::new(0, 0), FoodKind::Normal));

        let result = engine.tick(&mut state, Direction::Left);

        assert_eq!(result, TickResult::Continued);
        assert_eq!(state.snake.head(), Some(Position::new(4, 5)));
    }

    #[test]
    fn test_prevent_180_degree_turn() {
        let mut engine = engine_with(10);
        let mut state = state_at(10, Position::new(5, 5), Direction::Right, 3);

        assert!(!engine.steer(&mut state, Direction::Left));
        assert_eq!(state.snake.heading, Direction::Right);

        engine.tick(&mut state, Direction::Left);
        assert_eq!(state.snake.heading, Direction::Right);
        assert_eq!(state.snake.head(), Some(Position::new(6, 5)));
    }

    #[test]
    fn test_terminated_game_no_update() {
        let mut engine = GameEngine::new(GameConfig::small());
        let mut state = engine.reset();
        engine.end_episode(&mut state);
        let ticks_before = state.ticks;

        let result = engine.tick(&mut state, Direction::Up);

        assert_eq!(result, TickResult::Idle);
        assert_eq!(state.ticks, ticks_before);
    }

    #[test]
    fn test_no_food_spawned_after_game_over() {
        let mut engine = GameEngine::new(GameConfig::small());
        let mut state = engine.reset();
        engine.end_episode(&mut state);

        engine.spawn_food(&mut state);
        engine.tick(&mut state, Direction::Right);
        engine.advance_frame(&mut state);

        assert!(state.food.is_none());
        assert!(state.snake.is_empty());
    }

    #[test]
    fn test_tick_gate_counts_frames() {
        let config = GameConfig {
            tick_interval: 3,
            ..GameConfig::small()
        };
        let engine = GameEngine::new(config);
        let grid = engine.grid();
        let mut state = GameState::new(Snake::new(grid.center(), Direction::Right, 3), None, grid);

        let due: Vec<bool> = (0..6).map(|_| engine.advance_frame(&mut state)).collect();
        assert_eq!(due, vec![false, false, true, false, false, true]);
        assert_eq!(state.frames, 6);
    }

    #[test]
    fn test_no_tick_due_while_paused_or_over() {
        let mut engine = GameEngine::new(GameConfig::small());
        let mut state = engine.reset();

        engine.apply_control(&mut state, Control::TogglePause);
        assert!(!engine.advance_frame(&mut state));

        engine.apply_control(&mut state, Control::TogglePause);
        engine.end_episode(&mut state);
        assert!(!engine.advance_frame(&mut state));
        assert!(!engine.advance_frame(&mut state));
        assert_eq!(state.game_over_frames, 2);
    }

    #[test]
    fn test_pause_toggle_pair_is_identity() {
        let mut engine = GameEngine::new(GameConfig::small());
        let mut state = engine.reset();

        engine.apply_control(&mut state, Control::TogglePause);
        assert_eq!(state.status, GameStatus::Paused);
        engine.apply_control(&mut state, Control::TogglePause);
        assert_eq!(state.status, GameStatus::Playing);
    }

    #[test]
    fn test_restart_only_from_game_over() {
        let mut engine = GameEngine::new(GameConfig::small());
        let mut state = engine.reset();

        engine.apply_control(&mut state, Control::Restart);
        assert_eq!(state.status, GameStatus::Playing);

        engine.end_episode(&mut state);
        engine.apply_control(&mut state, Control::Restart);
        assert_eq!(state.status, GameStatus::Playing);
        assert_eq!(state.snake.len(), 1);
        assert_eq!(state.score(), 0);
        assert!(state.food.is_some());
    }

    #[test]
    fn test_pause_or_restart_matches_state() {
        let mut engine = GameEngine::new(GameConfig::small());
        let mut state = engine.reset();

        engine.apply_control(&mut state, Control::PauseOrRestart);
        assert_eq!(state.status, GameStatus::Paused);

        engine.apply_control(&mut state, Control::PauseOrRestart);
        assert_eq!(state.status, GameStatus::Playing);

        engine.end_episode(&mut state);
        engine.apply_control(&mut state, Control::PauseOrRestart);
        assert_eq!(state.status, GameStatus::Playing);
        assert_eq!(state.snake.len(), 1);
    }

    #[test]
    fn test_pause_ignored_when_over() {
        let mut engine = GameEngine::new(GameConfig::small());
        let mut state = engine.reset();
        engine.end_episode(&mut state);

        engine.apply_control(&mut state, Control::TogglePause);
        assert_eq!(state.status, GameStatus::GameOver);
    }

    #[test]
    fn test_bonus_frequency_follows_config() {
        let always = GameConfig {
            bonus_chance: 1.0,
            ..GameConfig::small()
        };
        let mut engine = GameEngine::new(always);
        let state = engine.reset();
        assert_eq!(state.food.map(|food| food.kind), Some(FoodKind::Bonus));

        let never = GameConfig {
            bonus_chance: 0.0,
            ..GameConfig::small()
        };
        let mut engine = GameEngine::new(never);
        for _ in 0..50 {
            let state = engine.reset();
            assert_eq!(state.food.map(|food| food.kind), Some(FoodKind::Normal));
        }
    }
}
