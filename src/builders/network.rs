use crate::activations::Activation;
use crate::error::{LearnError, Result};
use crate::layers::WeightInit;
use crate::network::NeuralNetwork;
use crate::types::KEY_LEN;

/// Builder for the one-hidden-layer regression network with a fluent API
pub struct NetworkBuilder {
    inputs: usize,
    hidden: Option<usize>,
    activation: Activation,
    learning_rate: Option<f64>,
    momentum: f64,
    output_bounds: (f64, f64),
    weight_init: WeightInit,
}

impl NetworkBuilder {
    /// Create a new network builder sized for a state-action key
    pub fn new() -> Self {
        NetworkBuilder {
            inputs: KEY_LEN,
            hidden: None,
            activation: Activation::Bipolar,
            learning_rate: None,
            momentum: 0.0,
            output_bounds: (-1.0, 1.0),
            weight_init: WeightInit::default(),
        }
    }

    pub fn inputs(mut self, inputs: usize) -> Self {
        self.inputs = inputs;
        self
    }

    /// Set the number of hidden units
    pub fn hidden(mut self, hidden: usize) -> Self {
        self.hidden = Some(hidden);
        self
    }

    /// Set the hidden-unit activation
    pub fn activation(mut self, activation: Activation) -> Self {
        self.activation = activation;
        self
    }

    pub fn learning_rate(mut self, learning_rate: f64) -> Self {
        self.learning_rate = Some(learning_rate);
        self
    }

    pub fn momentum(mut self, momentum: f64) -> Self {
        self.momentum = momentum;
        self
    }

    /// Range of the sigmoid output unit
    pub fn output_bounds(mut self, lower: f64, upper: f64) -> Self {
        self.output_bounds = (lower, upper);
        self
    }

    pub fn weight_init(mut self, weight_init: WeightInit) -> Self {
        self.weight_init = weight_init;
        self
    }

    /// Build the network. Weights still need [`NeuralNetwork::initialize_weights`].
    pub fn build(self) -> Result<NeuralNetwork> {
        let hidden = self.hidden.ok_or_else(|| LearnError::InvalidParameter {
            name: "hidden".to_string(),
            reason: "Number of hidden units not specified".to_string(),
        })?;

        let learning_rate = self.learning_rate.ok_or_else(|| LearnError::InvalidParameter {
            name: "learning_rate".to_string(),
            reason: "Learning rate not specified".to_string(),
        })?;

        self.weight_init.validate().map_err(|reason| LearnError::InvalidParameter {
            name: "weight_init".to_string(),
            reason,
        })?;

        let (lower, upper) = self.output_bounds;
        Ok(NeuralNetwork::new(self.activation, self.inputs, hidden, learning_rate, self.momentum, lower, upper)?
            .with_weight_init(self.weight_init))
    }
}

impl Default for NetworkBuilder {
    fn default() -> Self {
        Self::new()
    }
}
