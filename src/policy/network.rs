//! Feed-forward network mapping sensor features to a turn scalar
//!
//! # Architecture
//!
//! ```text
//! Input: [batch, inputs]
//!   ↓ Linear(inputs → hidden) + sigmoid
//!   ↓ Linear(hidden → 1) + sigmoid
//! Output: [batch, 1] in (0, 1)
//! ```
//!
//! The output is read as a [`Turn`](crate::game::Turn) encoding: 0 left,
//! 0.5 straight, 1 right.

use burn::{
    module::{Module, Param},
    nn::{Linear, LinearConfig},
    tensor::{Tensor, TensorData, activation::sigmoid, backend::Backend},
};

use super::error::PolicyError;
use super::persistence::LayerWeights;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PolicyNetworkConfig {
    pub input_size: usize,
    pub hidden_size: usize,
}

impl PolicyNetworkConfig {
    pub fn new(input_size: usize, hidden_size: usize) -> Self {
        Self {
            input_size,
            hidden_size,
        }
    }

    /// Initialize the network with random weights on `device`
    pub fn init<B: Backend>(&self, device: &B::Device) -> PolicyNetwork<B> {
        PolicyNetwork {
            hidden: LinearConfig::new(self.input_size, self.hidden_size).init(device),
            output: LinearConfig::new(self.hidden_size, 1).init(device),
        }
    }
}

#[derive(Module, Debug)]
pub struct PolicyNetwork<B: Backend> {
    hidden: Linear<B>,
    output: Linear<B>,
}

impl<B: Backend> PolicyNetwork<B> {
    /// Forward pass; `input` has shape `[batch, inputs]`, the result `[batch, 1]`
    pub fn forward(&self, input: Tensor<B, 2>) -> Tensor<B, 2> {
        let x = sigmoid(self.hidden.forward(input));
        sigmoid(self.output.forward(x))
    }

    pub fn input_size(&self) -> usize {
        self.hidden.weight.dims()[0]
    }

    pub fn hidden_size(&self) -> usize {
        self.hidden.weight.dims()[1]
    }

    /// Copy out both layers as plain vectors
    pub fn export(&self) -> Result<(LayerWeights, LayerWeights), PolicyError> {
        Ok((export_linear(&self.hidden)?, export_linear(&self.output)?))
    }

    /// Replace both layers; shapes must already have been validated
    pub fn with_weights(
        mut self,
        hidden: &LayerWeights,
        output: &LayerWeights,
        device: &B::Device,
    ) -> Self {
        import_linear(&mut self.hidden, hidden, device);
        import_linear(&mut self.output, output, device);
        self
    }
}

fn export_linear<B: Backend>(linear: &Linear<B>) -> Result<LayerWeights, PolicyError> {
    let [inputs, outputs] = linear.weight.dims();
    let weight = tensor_values(linear.weight.val().into_data())?;
    let bias = match &linear.bias {
        Some(bias) => tensor_values(bias.val().into_data())?,
        None => vec![0.0; outputs],
    };

    Ok(LayerWeights {
        inputs,
        outputs,
        weight,
        bias,
    })
}

fn import_linear<B: Backend>(linear: &mut Linear<B>, layer: &LayerWeights, device: &B::Device) {
    let weight = Tensor::<B, 2>::from_data(
        TensorData::new(layer.weight.clone(), [layer.inputs, layer.outputs]),
        device,
    );
    let bias = Tensor::<B, 1>::from_data(TensorData::new(layer.bias.clone(), [layer.outputs]), device);

    linear.weight = Param::from_tensor(weight);
    linear.bias = Some(Param::from_tensor(bias));
}

pub(crate) fn tensor_values(data: TensorData) -> Result<Vec<f32>, PolicyError> {
    data.convert::<f32>()
        .to_vec::<f32>()
        .map_err(|err| PolicyError::Tensor(format!("{err:?}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::backend::{InferenceBackend, TrainingBackend, default_device};

    #[test]
    fn test_forward_pass_shapes() {
        let device = default_device();
        let network = PolicyNetworkConfig::new(5, 3).init::<InferenceBackend>(&device);

        for batch_size in [1, 4, 16] {
            let input = Tensor::zeros([batch_size, 5], &device);
            assert_eq!(network.forward(input).dims(), [batch_size, 1]);
        }
    }

    #[test]
    fn test_output_in_unit_interval() {
        let device = default_device();
        let network = PolicyNetworkConfig::new(4, 3).init::<InferenceBackend>(&device);
        let input = Tensor::from_data(
            TensorData::new(vec![1.0f32, -50.0, 3.0, 0.0, 0.0, 0.0, 0.0, 100.0], [2, 4]),
            &device,
        );

        let values = tensor_values(network.forward(input).into_data()).unwrap();
        assert_eq!(values.len(), 2);
        for value in values {
            assert!((0.0..=1.0).contains(&value), "got {value}");
        }
    }

    #[test]
    fn test_sizes_reported() {
        let network = PolicyNetworkConfig::new(5, 7).init::<InferenceBackend>(&default_device());
        assert_eq!(network.input_size(), 5);
        assert_eq!(network.hidden_size(), 7);
    }

    #[test]
    fn test_export_import_preserves_outputs() {
        let device = default_device();
        let source = PolicyNetworkConfig::new(5, 3).init::<TrainingBackend>(&device);
        let (hidden, output) = source.export().unwrap();

        assert_eq!((hidden.inputs, hidden.outputs), (5, 3));
        assert_eq!(hidden.weight.len(), 15);
        assert_eq!((output.inputs, output.outputs), (3, 1));

        let target = PolicyNetworkConfig::new(5, 3)
            .init::<TrainingBackend>(&device)
            .with_weights(&hidden, &output, &device);

        let input = || {
            Tensor::<TrainingBackend, 2>::from_data(
                TensorData::new(vec![0.0f32, 1.0, 0.0, 0.25, 0.5], [1, 5]),
                &device,
            )
        };
        let expected = tensor_values(source.forward(input()).into_data()).unwrap();
        let actual = tensor_values(target.forward(input()).into_data()).unwrap();
        assert!((expected[0] - actual[0]).abs() < 1e-6);
    }
}
