//! Burn backends the predictor runs on
//!
//! Training needs autodiff; prediction runs the inner backend through
//! `AutodiffModule::valid`, which is [`InferenceBackend`]. The network holds a
//! few dozen weights, so the CPU ndarray backend covers both.

use burn::backend::{
    Autodiff,
    ndarray::{NdArray, NdArrayDevice},
};

pub type TrainingBackend = Autodiff<NdArray<f32>>;

/// What `TrainingBackend` unwraps to for gradient-free prediction
pub type InferenceBackend = NdArray<f32>;

pub fn default_device() -> NdArrayDevice {
    NdArrayDevice::default()
}
