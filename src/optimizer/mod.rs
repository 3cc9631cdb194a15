use ndarray::{Array2, Array1};

use crate::layers::DenseLayer;

pub trait Optimizer {
    fn update_weights(&mut self, layer: usize, weights: &mut Array2<f64>, gradients: &Array2<f64>);
    fn update_biases(&mut self, layer: usize, biases: &mut Array1<f64>, gradients: &Array1<f64>);

    /// Forget any state carried between updates.
    fn reset(&mut self);
}

/// Gradient descent with momentum.
///
/// Each update is `v = momentum * v - learning_rate * g; w += v`, so the applied
/// change mixes the current gradient step with a fraction of the previous change.
#[derive(Clone, Debug)]
pub struct Momentum {
    pub learning_rate: f64,
    pub momentum: f64,
    v_weights: Vec<Array2<f64>>,
    v_biases: Vec<Array1<f64>>,
}

impl Momentum {
    pub fn new(layers: &[&DenseLayer], learning_rate: f64, momentum: f64) -> Self {
        let v_weights = layers
            .iter()
            .map(|layer| Array2::<f64>::zeros(layer.weights.dim()))
            .collect();
        let v_biases = layers
            .iter()
            .map(|layer| Array1::<f64>::zeros(layer.biases.dim()))
            .collect();

        Momentum {
            learning_rate,
            momentum,
            v_weights,
            v_biases,
        }
    }

    /// Previous weight change applied to `layer`.
    pub fn weight_velocity(&self, layer: usize) -> Option<&Array2<f64>> {
        self.v_weights.get(layer)
    }
}

impl Optimizer for Momentum {
    fn update_weights(&mut self, layer: usize, weights: &mut Array2<f64>, gradients: &Array2<f64>) {
        let v = &mut self.v_weights[layer];
        let (lr, mu) = (self.learning_rate, self.momentum);
        v.zip_mut_with(gradients, |v, &g| *v = mu * *v - lr * g);
        *weights += &*v;
    }

    fn update_biases(&mut self, layer: usize, biases: &mut Array1<f64>, gradients: &Array1<f64>) {
        let v = &mut self.v_biases[layer];
        let (lr, mu) = (self.learning_rate, self.momentum);
        v.zip_mut_with(gradients, |v, &g| *v = mu * *v - lr * g);
        *biases += &*v;
    }

    fn reset(&mut self) {
        self.v_weights.iter_mut().for_each(|v| v.fill(0.0));
        self.v_biases.iter_mut().for_each(|v| v.fill(0.0));
    }
}
