//! Serializable engine configuration.
//!
//! [`EngineConfig`] gathers everything needed to assemble a
//! [`LearningController`](crate::agent::LearningController) or a
//! [`Session`](crate::session::Session) and can be read from JSON:
//!
//! ```rust
//! use tdlearn::config::EngineConfig;
//!
//! let json = serde_json::to_string(&EngineConfig::lookup_table()).unwrap();
//! let config = EngineConfig::from_json_str(&json).unwrap();
//! assert_eq!(config.backend.action_dim(), 5);
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Serialize, Deserialize};
use tracing::info;

use crate::activations::Activation;
use crate::agent::{LearningController, LearningControllerBuilder, PolicyMode, RewardScheme};
use crate::builders::{ExperienceBufferBuilder, NetworkBuilder};
use crate::error::{LearnError, Result};
use crate::layers::WeightInit;
use crate::q_function::{KeyEncoding, LookupTable, QFunction};
use crate::quantizer::Quantizer;
use crate::replay_buffer::{ExperienceBuffer, SamplingStrategy};
use crate::session::Session;
use crate::types::{KEY_LEN, STATE_AXES};

/// Hyperparameters of the TD update and the exploration policy
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LearningConfig {
    /// Learning rate of the TD update
    pub alpha: f64,
    /// Discount factor
    pub gamma: f64,
    /// Exploration probability
    pub epsilon: f64,
    #[serde(default)]
    pub policy: PolicyMode,
    /// Seed for action selection; entropy-seeded when absent
    #[serde(default)]
    pub seed: Option<u64>,
}

impl LearningConfig {
    /// Table agent defaults: alpha 0.7, gamma 0.9, epsilon 0.1.
    pub fn lookup_table() -> Self {
        LearningConfig {
            alpha: 0.7,
            gamma: 0.9,
            epsilon: 0.1,
            policy: PolicyMode::OffPolicy,
            seed: None,
        }
    }

    /// Network agent defaults: alpha 0.2, gamma 0.1, epsilon 0.1.
    pub fn neural() -> Self {
        LearningConfig {
            alpha: 0.2,
            gamma: 0.1,
            epsilon: 0.1,
            policy: PolicyMode::OffPolicy,
            seed: None,
        }
    }

    pub fn with_policy(mut self, policy: PolicyMode) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    pub fn validate(&self) -> Result<()> {
        for (name, value) in [("alpha", self.alpha), ("gamma", self.gamma), ("epsilon", self.epsilon)] {
            if !(0.0..=1.0).contains(&value) {
                return Err(LearnError::invalid_parameter(
                    name.to_string(),
                    format!("must lie in [0, 1], got {}", value),
                ));
            }
        }
        Ok(())
    }
}

impl Default for LearningConfig {
    fn default() -> Self {
        Self::lookup_table()
    }
}

/// Which Q-function backend to build
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BackendConfig {
    /// Dense table; axis sizes come from the quantizer's cardinalities
    LookupTable {
        action_dim: usize,
        #[serde(default)]
        random_init: bool,
        #[serde(default)]
        key_encoding: KeyEncoding,
    },
    NeuralNetwork {
        action_dim: usize,
        hidden: usize,
        learning_rate: f64,
        momentum: f64,
        #[serde(default)]
        activation: Activation,
        output_lower: f64,
        output_upper: f64,
        #[serde(default)]
        weight_init: WeightInit,
    },
}

impl BackendConfig {
    pub fn action_dim(&self) -> usize {
        match self {
            BackendConfig::LookupTable { action_dim, .. } | BackendConfig::NeuralNetwork { action_dim, .. } => {
                *action_dim
            }
        }
    }

    /// Build the backend for states produced by `quantizer`.
    ///
    /// Networks come back with freshly initialized weights.
    pub fn build(&self, quantizer: &Quantizer) -> Result<Box<dyn QFunction>> {
        match *self {
            BackendConfig::LookupTable {
                action_dim,
                random_init,
                key_encoding,
            } => {
                let cardinalities = quantizer.cardinalities().ok_or_else(|| {
                    LearnError::invalid_parameter(
                        "quantizer".to_string(),
                        "a lookup table needs every axis quantized into buckets".to_string(),
                    )
                })?;
                let mut dims = [0; KEY_LEN];
                dims[..STATE_AXES].copy_from_slice(&cardinalities);
                dims[STATE_AXES] = action_dim;
                Ok(Box::new(LookupTable::with_encoding(dims, random_init, key_encoding)?))
            }
            BackendConfig::NeuralNetwork {
                hidden,
                learning_rate,
                momentum,
                activation,
                output_lower,
                output_upper,
                weight_init,
                ..
            } => {
                let mut network = NetworkBuilder::new()
                    .inputs(KEY_LEN)
                    .hidden(hidden)
                    .activation(activation)
                    .learning_rate(learning_rate)
                    .momentum(momentum)
                    .output_bounds(output_lower, output_upper)
                    .weight_init(weight_init)
                    .build()?;
                network.initialize_weights();
                Ok(Box::new(network))
            }
        }
    }
}

/// Experience replay settings
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReplayConfig {
    pub capacity: usize,
    #[serde(default)]
    pub strategy: SamplingStrategy,
    #[serde(default)]
    pub seed: Option<u64>,
}

impl ReplayConfig {
    pub fn build(&self) -> Result<ExperienceBuffer> {
        let mut builder = ExperienceBufferBuilder::new()
            .capacity(self.capacity)
            .strategy(self.strategy);
        if let Some(seed) = self.seed {
            builder = builder.seed(seed);
        }
        builder.build()
    }
}

/// Complete description of a learning engine
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    pub learning: LearningConfig,
    #[serde(default)]
    pub quantizer: Quantizer,
    pub backend: BackendConfig,
    #[serde(default)]
    pub replay: Option<ReplayConfig>,
    #[serde(default)]
    pub rewards: RewardScheme,
    /// Backend file loaded at session start and written at each checkpoint
    #[serde(default)]
    pub checkpoint: Option<PathBuf>,
}

impl EngineConfig {
    /// Table agent: bucketed position, distance and bearing, five actions, no replay.
    pub fn lookup_table() -> Self {
        EngineConfig {
            learning: LearningConfig::lookup_table(),
            quantizer: Quantizer::lookup_table(),
            backend: BackendConfig::LookupTable {
                action_dim: 5,
                random_init: false,
                key_encoding: KeyEncoding::FixedWidth,
            },
            replay: None,
            rewards: RewardScheme::default(),
            checkpoint: None,
        }
    }

    /// Network agent: scaled inputs, 5 bipolar hidden units, replay of the last 10 steps.
    pub fn neural_network() -> Self {
        EngineConfig {
            learning: LearningConfig::neural(),
            quantizer: Quantizer::neural(),
            backend: BackendConfig::NeuralNetwork {
                action_dim: 5,
                hidden: 5,
                learning_rate: 0.2,
                momentum: 0.5,
                activation: Activation::Bipolar,
                output_lower: -1.0,
                output_upper: 1.0,
                weight_init: WeightInit::default(),
            },
            replay: Some(ReplayConfig {
                capacity: 10,
                strategy: SamplingStrategy::MostRecent,
                seed: None,
            }),
            rewards: RewardScheme::default(),
            checkpoint: None,
        }
    }

    pub fn with_checkpoint<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.checkpoint = Some(path.into());
        self
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)?;
        let config = Self::from_json_str(&json)?;
        info!(path = %path.display(), "loaded engine config");
        Ok(config)
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<()> {
        self.learning.validate()?;
        self.quantizer.validate()?;
        if self.backend.action_dim() == 0 {
            return Err(LearnError::invalid_parameter(
                "action_dim".to_string(),
                "action space must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    pub fn build_controller(&self) -> Result<LearningController> {
        self.validate()?;
        let q_function = self.backend.build(&self.quantizer)?;

        let mut builder = LearningControllerBuilder::new()
            .q_function(q_function)
            .quantizer(self.quantizer.clone())
            .config(self.learning)
            .action_dim(self.backend.action_dim())
            .rewards(self.rewards);
        if let Some(replay) = &self.replay {
            builder = builder.replay(replay.build()?);
        }
        builder.build()
    }

    pub fn build_session(&self) -> Result<Session> {
        Session::start(self.build_controller()?, self.checkpoint.clone())
    }
}
