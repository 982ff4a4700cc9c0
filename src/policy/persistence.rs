//! Saving and loading trained predictor weights
//!
//! A policy is stored as a single JSON document holding the sensor layout, the
//! shape of both layers and their weights. Weights are row-major `[inputs, outputs]`.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::error::PolicyError;
use super::sensor::SensorLayout;

/// Current on-disk format version
pub const FORMAT_VERSION: u32 = 1;

/// Weights and biases of one dense layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerWeights {
    pub inputs: usize,
    pub outputs: usize,
    pub weight: Vec<f32>,
    pub bias: Vec<f32>,
}

impl LayerWeights {
    fn validate(&self, layer: &'static str) -> Result<(), PolicyError> {
        let finite = self.weight.iter().chain(&self.bias).all(|value| value.is_finite());
        if self.inputs == 0
            || self.outputs == 0
            || self.weight.len() != self.inputs * self.outputs
            || self.bias.len() != self.outputs
            || !finite
        {
            return Err(PolicyError::Shape {
                layer,
                inputs: self.inputs,
                outputs: self.outputs,
                weights: self.weight.len(),
                biases: self.bias.len(),
            });
        }
        Ok(())
    }
}

/// Everything needed to rebuild a trained predictor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicySnapshot {
    pub version: u32,
    pub sensor_layout: SensorLayout,
    pub hidden: LayerWeights,
    pub output: LayerWeights,
    /// Samples the weights were fitted on
    pub samples_trained: usize,
    /// Crate version that wrote the file
    pub crate_version: String,
}

impl PolicySnapshot {
    pub fn new(
        sensor_layout: SensorLayout,
        hidden: LayerWeights,
        output: LayerWeights,
        samples_trained: usize,
    ) -> Self {
        Self {
            version: FORMAT_VERSION,
            sensor_layout,
            hidden,
            output,
            samples_trained,
            crate_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    pub fn input_size(&self) -> usize {
        self.hidden.inputs
    }

    pub fn hidden_size(&self) -> usize {
        self.hidden.outputs
    }

    /// Check version, layer shapes and the wiring between layers
    pub fn validate(&self) -> Result<(), PolicyError> {
        if self.version != FORMAT_VERSION {
            return Err(PolicyError::UnsupportedVersion {
                found: self.version,
                expected: FORMAT_VERSION,
            });
        }

        self.hidden.validate("hidden")?;
        self.output.validate("output")?;

        if self.hidden.inputs != self.sensor_layout.input_size() {
            return Err(PolicyError::Topology {
                layer: "hidden",
                expected: self.sensor_layout.input_size(),
                actual: self.hidden.inputs,
            });
        }
        if self.output.inputs != self.hidden.outputs {
            return Err(PolicyError::Topology {
                layer: "output",
                expected: self.hidden.outputs,
                actual: self.output.inputs,
            });
        }
        if self.output.outputs != 1 {
            return Err(PolicyError::Shape {
                layer: "output",
                inputs: self.output.inputs,
                outputs: self.output.outputs,
                weights: self.output.weight.len(),
                biases: self.output.bias.len(),
            });
        }

        Ok(())
    }

    pub fn to_json(&self) -> Result<String, PolicyError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse and validate a serialized policy
    pub fn from_json(json: &str) -> Result<Self, PolicyError> {
        let snapshot: PolicySnapshot = serde_json::from_str(json)?;
        snapshot.validate()?;
        Ok(snapshot)
    }
}

/// Write a policy to `path`, creating parent directories as needed
pub fn save_policy(snapshot: &PolicySnapshot, path: &Path) -> Result<(), PolicyError> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| PolicyError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let json = snapshot.to_json()?;
    fs::write(path, json).map_err(|source| PolicyError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Read and validate a policy written by [`save_policy`]
pub fn load_policy(path: &Path) -> Result<PolicySnapshot, PolicyError> {
    let json = fs::read_to_string(path).map_err(|source| PolicyError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    PolicySnapshot::from_json(&json)
}
