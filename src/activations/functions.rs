use ndarray::Array1;
use serde::{Serialize, Deserialize};

/// An enumeration of the possible activation functions that can be used in a neural network layer.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Activation {
    /// Logistic sigmoid in `[0, 1]`
    Binary,
    /// Symmetric sigmoid in `[-1, 1]`
    #[default]
    Bipolar,
    /// Sigmoid rescaled into `[lower, upper]`
    Bounded { lower: f64, upper: f64 },
    Linear,
}

impl Activation {
    /// The `(lower, upper)` range of a squashing activation.
    pub fn bounds(&self) -> Option<(f64, f64)> {
        match *self {
            Activation::Binary => Some((0.0, 1.0)),
            Activation::Bipolar => Some((-1.0, 1.0)),
            Activation::Bounded { lower, upper } => Some((lower, upper)),
            Activation::Linear => None,
        }
    }

    /// Apply the activation to a single pre-activation value.
    pub fn value(&self, x: f64) -> f64 {
        match self.bounds() {
            Some((lower, upper)) => lower + (upper - lower) / (1.0 + (-x).exp()),
            None => x,
        }
    }

    /// Derivative expressed in terms of the activation's output `y`.
    pub fn derivative_from_output(&self, y: f64) -> f64 {
        match self.bounds() {
            Some((lower, upper)) => (y - lower) * (upper - y) / (upper - lower),
            None => 1.0,
        }
    }

    /// Apply the activation function to an input array in-place.
    pub fn apply(&self, input: &mut Array1<f64>) {
        input.mapv_inplace(|v| self.value(v));
    }

    /// Compute the derivative for an array of activation outputs.
    pub fn derivative(&self, output: &Array1<f64>) -> Array1<f64> {
        output.mapv(|y| self.derivative_from_output(y))
    }
}
