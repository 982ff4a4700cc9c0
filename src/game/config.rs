use serde::{Deserialize, Serialize};

/// Configuration for the game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Side length of the square, wrap-around grid
    pub grid_size: usize,
    /// Target length of a freshly reset snake; the score is measured from here
    pub initial_length: usize,
    /// Frames per simulation tick (1 = tick every frame)
    pub tick_interval: u32,
    /// Probability that a spawned food is a bonus item
    pub bonus_chance: f64,
    /// Ticks the rainbow mode lasts after eating a bonus item
    pub rainbow_duration: u32,
    /// Fixed RNG seed; `None` seeds from entropy
    pub seed: Option<u64>,

    // Rewards (for training statistics)
    /// Reward for eating food
    pub food_reward: f32,
    /// Penalty for each step
    pub step_penalty: f32,
    /// Penalty for ending the episode
    pub death_penalty: f32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_size: 16,
            initial_length: 3,
            tick_interval: 1,
            bonus_chance: 0.1,
            rainbow_duration: 5000,
            seed: None,
            food_reward: 10.0,
            step_penalty: -0.01,
            death_penalty: -10.0,
        }
    }
}

impl GameConfig {
    /// Create a new configuration with custom grid size
    pub fn new(grid_size: usize) -> Self {
        Self {
            grid_size,
            ..Default::default()
        }
    }

    /// Small seeded grid for tests
    pub fn small() -> Self {
        Self {
            seed: Some(42),
            ..Self::new(10)
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validate configuration parameters
    pub fn validate(&self) -> Result<(), String> {
        if self.grid_size < 2 {
            return Err(format!("grid_size must be at least 2, got {}", self.grid_size));
        }

        if self.grid_size > i32::MAX as usize {
            return Err(format!("grid_size {} is too large", self.grid_size));
        }

        if self.initial_length == 0 {
            return Err("initial_length must be at least 1".to_string());
        }

        if self.tick_interval == 0 {
            return Err("tick_interval must be at least 1".to_string());
        }

        if !(0.0..=1.0).contains(&self.bonus_chance) {
            return Err(format!(
                "bonus_chance must be in [0, 1], got {}",
                self.bonus_chance
            ));
        }

        Ok(())
    }
}
