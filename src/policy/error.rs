use std::path::PathBuf;

use thiserror::Error;

use super::sensor::SensorLayout;

/// Failures of the learned policy: loading, shaping, or training
///
/// All of them are recoverable; callers fall back to an untrained predictor.
#[derive(Debug, Error)]
pub enum PolicyError {
    #[error("malformed policy json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("unsupported policy format version {found}, expected {expected}")]
    UnsupportedVersion { found: u32, expected: u32 },
    #[error("layer {layer} is {inputs}x{outputs} but holds {weights} weights and {biases} biases")]
    Shape {
        layer: &'static str,
        inputs: usize,
        outputs: usize,
        weights: usize,
        biases: usize,
    },
    #[error("layer {layer} expects {expected} inputs, got {actual}")]
    Topology {
        layer: &'static str,
        expected: usize,
        actual: usize,
    },
    #[error("policy uses {found:?} sensors but {expected:?} are configured")]
    LayoutMismatch {
        found: SensorLayout,
        expected: SensorLayout,
    },
    #[error("tensor conversion failed: {0}")]
    Tensor(String),
    #[error("no training samples were collected")]
    EmptyDataset,
}
