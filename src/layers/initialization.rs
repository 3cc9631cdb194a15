use ndarray::{Array2, Array1};
use ndarray_rand::RandomExt;
use ndarray_rand::rand_distr::Uniform;
use serde::{Serialize, Deserialize};

/// Weight initialization strategies
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum WeightInit {
    /// Xavier/Glorot uniform initialization
    XavierUniform,

    /// Uniform distribution with custom range
    Uniform { min: f64, max: f64 },

    /// All zeros
    Zeros,
}

impl Default for WeightInit {
    fn default() -> Self {
        WeightInit::Uniform { min: -0.5, max: 0.5 }
    }
}

impl WeightInit {
    /// Initialize weights for a layer
    pub fn initialize_weights(&self, shape: (usize, usize)) -> Array2<f64> {
        let (fan_in, fan_out) = shape;

        match *self {
            WeightInit::XavierUniform => {
                let limit = (6.0 / (fan_in + fan_out) as f64).sqrt();
                Array2::random(shape, Uniform::new(-limit, limit))
            }

            WeightInit::Uniform { min, max } => {
                Array2::random(shape, Uniform::new(min, max))
            }

            WeightInit::Zeros => {
                Array2::zeros(shape)
            }
        }
    }

    /// Initialize biases for a layer
    pub fn initialize_biases(&self, size: usize) -> Array1<f64> {
        match *self {
            WeightInit::Zeros | WeightInit::XavierUniform => Array1::zeros(size),
            WeightInit::Uniform { min, max } => Array1::random(size, Uniform::new(min, max)),
        }
    }

    pub(crate) fn validate(&self) -> std::result::Result<(), String> {
        match *self {
            WeightInit::Uniform { min, max } if !(min < max) => {
                Err(format!("uniform range must satisfy min < max, got [{}, {})", min, max))
            }
            _ => Ok(()),
        }
    }
}
