//! Steering policy and predictor training configuration

use serde::{Deserialize, Serialize};

use super::sensor::SensorLayout;

/// Configuration for exploration, inline training and inference
///
/// # Example
///
/// ```rust
/// use neuro_snake::policy::TrainerConfig;
///
/// let config = TrainerConfig {
///     exploration_ticks: 500,
///     ..Default::default()
/// };
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainerConfig {
    /// Feature vector layout fed to the predictor
    pub sensor_layout: SensorLayout,

    /// Width of the single hidden layer
    ///
    /// Default: 3
    pub hidden_size: usize,

    /// Learning rate for the Adam optimizer
    ///
    /// Default: 0.05
    pub learning_rate: f64,

    /// Upper bound on full-batch training passes
    ///
    /// Default: 2000
    pub epochs: usize,

    /// Training stops early once the mean squared error drops below this
    ///
    /// Default: 0.005
    pub error_threshold: f32,

    /// Exploration decisions taken before the predictor is trained
    ///
    /// Default: 20000
    pub exploration_ticks: usize,

    /// Oldest samples are dropped beyond this many
    ///
    /// Default: 50000
    pub max_samples: usize,

    /// End the episode when an exploration turn would cross the grid edge
    ///
    /// Default: true
    pub edge_is_fatal: bool,

    /// Ticks per frame while exploring
    ///
    /// Default: 200
    pub exploration_ticks_per_frame: usize,

    /// Ticks per frame once the predictor steers
    ///
    /// Default: 1
    pub inference_ticks_per_frame: usize,

    /// Seed for exploration randomness, entropy when unset
    pub seed: Option<u64>,
}

impl TrainerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate configuration parameters
    ///
    /// # Returns
    ///
    /// `Ok(())` if all parameters are valid, `Err(String)` with an error message otherwise.
    pub fn validate(&self) -> Result<(), String> {
        if self.hidden_size == 0 {
            return Err("hidden_size must be at least 1".to_string());
        }

        if self.learning_rate <= 0.0 {
            return Err(format!(
                "learning_rate must be positive, got {}",
                self.learning_rate
            ));
        }

        if self.epochs == 0 {
            return Err("epochs must be at least 1".to_string());
        }

        if !(0.0..1.0).contains(&self.error_threshold) {
            return Err(format!(
                "error_threshold must be in [0, 1), got {}",
                self.error_threshold
            ));
        }

        if self.max_samples == 0 {
            return Err("max_samples must be at least 1".to_string());
        }

        if self.exploration_ticks_per_frame == 0 || self.inference_ticks_per_frame == 0 {
            return Err("ticks per frame must be at least 1".to_string());
        }

        Ok(())
    }
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            sensor_layout: SensorLayout::Relative,
            hidden_size: 3,
            learning_rate: 0.05,
            epochs: 2000,
            error_threshold: 0.005,
            exploration_ticks: 20_000,
            max_samples: 50_000,
            edge_is_fatal: true,
            exploration_ticks_per_frame: 200,
            inference_ticks_per_frame: 1,
            seed: None,
        }
    }
}
