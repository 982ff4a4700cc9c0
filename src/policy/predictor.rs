//! Predictors turning a feature vector into a turn scalar

use burn::{
    module::AutodiffModule,
    optim::{Adam, AdamConfig, GradientsParams, Optimizer, adaptor::OptimizerAdaptor},
    tensor::{ElementConversion, Tensor, TensorData, backend::AutodiffBackend},
};
use tracing::{debug, info};

use super::config::TrainerConfig;
use super::dataset::TrainingSample;
use super::error::PolicyError;
use super::network::{PolicyNetwork, PolicyNetworkConfig, tensor_values};
use super::persistence::PolicySnapshot;
use super::sensor::SensorLayout;

/// Summary of one training run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrainingReport {
    pub samples: usize,
    pub epochs: usize,
    /// Mean squared error after the last epoch
    pub final_error: f32,
    /// Whether the error threshold was reached before the epoch limit
    pub converged: bool,
}

/// A trainable scalar predictor
pub trait Predictor {
    /// Length of the feature vectors this predictor accepts
    fn input_size(&self) -> usize;

    /// Predict a value in [0, 1] for one feature vector
    fn predict(&self, input: &[f32]) -> f32;

    /// Fit the predictor to `samples`
    fn train(&mut self, samples: &[TrainingSample]) -> Result<TrainingReport, PolicyError>;
}

/// Two-layer sigmoid network trained with Adam on mean squared error
pub struct NeuralPredictor<B: AutodiffBackend> {
    network: PolicyNetwork<B>,
    optim: OptimizerAdaptor<Adam, PolicyNetwork<B>, B>,
    config: TrainerConfig,
    device: B::Device,
    samples_trained: usize,
}

impl<B: AutodiffBackend> NeuralPredictor<B> {
    /// Untrained predictor sized for the configured sensor layout
    pub fn new(config: TrainerConfig, device: B::Device) -> Self {
        let network = PolicyNetworkConfig::new(config.sensor_layout.input_size(), config.hidden_size)
            .init::<B>(&device);

        Self {
            network,
            optim: AdamConfig::new().init(),
            config,
            device,
            samples_trained: 0,
        }
    }

    /// Rebuild a trained predictor from a snapshot
    ///
    /// The snapshot's hidden size wins over the configured one; its sensor layout
    /// must match the configuration.
    pub fn from_snapshot(
        snapshot: &PolicySnapshot,
        config: TrainerConfig,
        device: B::Device,
    ) -> Result<Self, PolicyError> {
        snapshot.validate()?;
        if snapshot.sensor_layout != config.sensor_layout {
            return Err(PolicyError::LayoutMismatch {
                found: snapshot.sensor_layout,
                expected: config.sensor_layout,
            });
        }

        let network = PolicyNetworkConfig::new(snapshot.input_size(), snapshot.hidden_size())
            .init::<B>(&device)
            .with_weights(&snapshot.hidden, &snapshot.output, &device);

        Ok(Self {
            network,
            optim: AdamConfig::new().init(),
            config,
            device,
            samples_trained: snapshot.samples_trained,
        })
    }

    pub fn snapshot(&self) -> Result<PolicySnapshot, PolicyError> {
        let (hidden, output) = self.network.export()?;
        Ok(PolicySnapshot::new(
            self.config.sensor_layout,
            hidden,
            output,
            self.samples_trained,
        ))
    }

    pub fn sensor_layout(&self) -> SensorLayout {
        self.config.sensor_layout
    }

    pub fn samples_trained(&self) -> usize {
        self.samples_trained
    }

    fn batch(&self, samples: &[TrainingSample]) -> (Tensor<B, 2>, Tensor<B, 2>) {
        let width = self.input_size();
        let inputs: Vec<f32> = samples
            .iter()
            .flat_map(|sample| sample.input.iter().copied())
            .collect();
        let targets: Vec<f32> = samples.iter().map(|sample| sample.target).collect();

        (
            Tensor::from_data(TensorData::new(inputs, [samples.len(), width]), &self.device),
            Tensor::from_data(TensorData::new(targets, [samples.len(), 1]), &self.device),
        )
    }
}

impl<B: AutodiffBackend> Predictor for NeuralPredictor<B> {
    fn input_size(&self) -> usize {
        self.network.input_size()
    }

    /// Falls back to 0.5 (straight ahead) on a malformed input
    fn predict(&self, input: &[f32]) -> f32 {
        if input.len() != self.input_size() {
            debug!(expected = self.input_size(), actual = input.len(), "feature length mismatch");
            return 0.5;
        }

        let network = self.network.valid();
        let input = Tensor::<B::InnerBackend, 2>::from_data(
            TensorData::new(input.to_vec(), [1, input.len()]),
            &self.device,
        );

        tensor_values(network.forward(input).into_data())
            .ok()
            .and_then(|values| values.first().copied())
            .filter(|value| value.is_finite())
            .unwrap_or(0.5)
    }

    fn train(&mut self, samples: &[TrainingSample]) -> Result<TrainingReport, PolicyError> {
        if samples.is_empty() {
            return Err(PolicyError::EmptyDataset);
        }
        let width = self.input_size();
        if let Some(sample) = samples.iter().find(|sample| sample.input.len() != width) {
            return Err(PolicyError::Topology {
                layer: "hidden",
                expected: width,
                actual: sample.input.len(),
            });
        }

        let (inputs, targets) = self.batch(samples);
        let mut report = TrainingReport {
            samples: samples.len(),
            epochs: 0,
            final_error: f32::INFINITY,
            converged: false,
        };

        for epoch in 1..=self.config.epochs {
            let predictions = self.network.forward(inputs.clone());
            let loss = (predictions - targets.clone()).powf_scalar(2.0).mean();
            let error = loss.clone().into_scalar().elem::<f32>();

            let grads = loss.backward();
            let grads = GradientsParams::from_grads(grads, &self.network);
            self.network = self
                .optim
                .step(self.config.learning_rate, self.network.clone(), grads);

            report.epochs = epoch;
            report.final_error = error;

            if epoch % 250 == 0 {
                debug!(epoch, error, "training");
            }
            if error < self.config.error_threshold {
                report.converged = true;
                break;
            }
        }

        self.samples_trained = samples.len();
        info!(
            samples = report.samples,
            epochs = report.epochs,
            error = report.final_error,
            converged = report.converged,
            "predictor trained"
        );

        Ok(report)
    }
}
