use ndarray::{Array1, Array2, ArrayView1, Axis};
use crate::activations::Activation;
use super::initialization::WeightInit;

/// A fully connected (dense) layer in a neural network
#[derive(Clone, Debug)]
pub struct DenseLayer {
    pub weights: Array2<f64>,
    pub biases: Array1<f64>,
    pub activation: Activation,
    inputs: Option<Array1<f64>>,
    outputs: Option<Array1<f64>>,
}

impl DenseLayer {
    /// Create a new dense layer with the given input size, output size, and activation function.
    /// Weights and biases start at zero; call [`DenseLayer::initialize`] to seed them.
    pub fn new(input_size: usize, output_size: usize, activation: Activation) -> Self {
        DenseLayer {
            weights: Array2::zeros((input_size, output_size)),
            biases: Array1::zeros(output_size),
            activation,
            inputs: None,
            outputs: None,
        }
    }

    pub fn initialize(&mut self, init: WeightInit) {
        self.weights = init.initialize_weights(self.weights.dim());
        self.biases = init.initialize_biases(self.biases.len());
        self.inputs = None;
        self.outputs = None;
    }

    /// Output of the layer without recording anything for backpropagation.
    pub fn evaluate(&self, input: ArrayView1<f64>) -> Array1<f64> {
        let mut output = input.dot(&self.weights) + &self.biases;
        self.activation.apply(&mut output);
        output
    }

    /// Forward pass that keeps the input and output for a following [`DenseLayer::backward`].
    pub fn forward(&mut self, input: ArrayView1<f64>) -> Array1<f64> {
        let output = self.evaluate(input);
        self.inputs = Some(input.to_owned());
        self.outputs = Some(output.clone());
        output
    }

    /// Compute gradients for the layer's weights and biases from the error at its outputs.
    ///
    /// Returns `(delta, weight_gradients, bias_gradients)`, where `delta` is the error
    /// scaled by the activation slope; `None` if no forward pass was recorded.
    pub fn backward(&self, output_error: ArrayView1<f64>) -> Option<(Array1<f64>, Array2<f64>, Array1<f64>)> {
        let inputs = self.inputs.as_ref()?;
        let outputs = self.outputs.as_ref()?;

        let delta = &output_error * &self.activation.derivative(outputs);
        let weight_gradients = inputs
            .view()
            .insert_axis(Axis(1))
            .dot(&delta.view().insert_axis(Axis(0)));
        let bias_gradients = delta.clone();

        Some((delta, weight_gradients, bias_gradients))
    }

    pub fn output_size(&self) -> usize {
        self.weights.shape()[1]
    }

    pub fn input_size(&self) -> usize {
        self.weights.shape()[0]
    }
}
