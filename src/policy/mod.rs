//! Learned steering for the snake
//!
//! Provides:
//! - heading-relative and absolute blockage sensors
//! - exploration with a pending-sample recorder and failure signal
//! - a small burn feed-forward predictor trained inline
//! - JSON persistence of trained weights

pub mod backend;
pub mod config;
pub mod controller;
pub mod dataset;
pub mod error;
pub mod network;
pub mod persistence;
pub mod predictor;
pub mod sensor;

pub use backend::{InferenceBackend, TrainingBackend, default_device};
pub use config::TrainerConfig;
pub use controller::{PolicyController, PolicyMode};
pub use dataset::{SampleLog, TrainingSample};
pub use error::PolicyError;
pub use network::{PolicyNetwork, PolicyNetworkConfig};
pub use persistence::{LayerWeights, PolicySnapshot, load_policy, save_policy};
pub use predictor::{NeuralPredictor, Predictor, TrainingReport};
pub use sensor::{SensorLayout, sense};

/// Predictor type the binary trains and loads
pub type DefaultPredictor = NeuralPredictor<TrainingBackend>;
