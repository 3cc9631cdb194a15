//! # tdlearn - Online Temporal-Difference Learning Engine
//!
//! tdlearn drives a reactive agent that learns an action-value function while it
//! plays. Each tick the host reports an observation; the engine quantizes it into
//! a compact state, picks an action epsilon-greedily, and updates its Q-value
//! estimate for the previous state-action pair from the reward that followed.
//!
//! ## Key Features
//!
//! - **Quantization**: configurable per-axis bucketing of raw observations
//! - **Interchangeable backends**: an exact 5-D lookup table or a one-hidden-layer
//!   regression network, both behind the [`q_function::QFunction`] trait
//! - **Q-learning and SARSA**: off-policy or on-policy TD targets
//! - **Experience replay**: fixed-capacity buffer with recency or uniform sampling
//! - **Persistence**: human-readable text formats for tables and weights
//!
//! ## Quick Start
//!
//! ```rust
//! use tdlearn::agent::RewardEvent;
//! use tdlearn::config::EngineConfig;
//! use tdlearn::quantizer::Observation;
//!
//! let mut session = EngineConfig::lookup_table().build_session().unwrap();
//!
//! session.begin_episode().unwrap();
//! for tick in 0..10 {
//!     let x = 100.0 + tick as f64 * 20.0;
//!     session.observe(&Observation::new(x, 300.0, 420.0, -30.0, 90.0));
//!     let _action = session.act().unwrap();
//! }
//! session.record_event(RewardEvent::Won).unwrap();
//! session.end_episode();
//!
//! let stats = session.end_session().unwrap();
//! assert_eq!(stats.wins, 1);
//! ```
//!
//! ## Module Organization
//!
//! - [`activations`] - Sigmoid-family activation functions
//! - [`agent`] - Learning controller, policies and rewards
//! - [`builders`] - Builder patterns for networks and buffers
//! - [`config`] - Serializable engine configuration
//! - [`error`] - Error types and result handling
//! - [`layers`] - Dense layer and weight initialization
//! - [`metrics`] - Session statistics
//! - [`network`] - Regression network backend
//! - [`optimizer`] - Momentum gradient descent
//! - [`q_function`] - The Q-function trait and lookup-table backend
//! - [`quantizer`] - Observation to state mapping
//! - [`replay_buffer`] - Experience replay
//! - [`session`] - Cross-episode session context
//! - [`types`] - States, actions and keys

pub mod activations;
pub mod agent;
pub mod builders;
pub mod config;
pub mod error;
pub mod layers;
pub mod metrics;
pub mod network;
pub mod optimizer;
pub mod q_function;
pub mod quantizer;
pub mod replay_buffer;
pub mod session;
pub mod types;

#[cfg(test)]
mod tests;
