//! # Learning Agent Module
//!
//! The temporal-difference controller and the pieces it is assembled from.
//!
//! ## Core Concepts
//!
//! - **Q-value**: the estimated return of taking an action in a state
//! - **TD update**: `Q(s,a) <- Q(s,a) + alpha * (r + gamma * Q(s',a*) - Q(s,a))`
//! - **Exploration vs Exploitation**: epsilon-greedy selection with ties broken
//!   toward the highest action index
//! - **Off-policy / On-policy**: `a*` is the greedy action in `s'` (Q-learning) or
//!   the action actually taken there (SARSA)
//! - **Experience Replay**: optionally retraining on a window of recent transitions
//!
//! ## Example Usage
//!
//! ```rust
//! use tdlearn::agent::{RewardEvent, Mode};
//! use tdlearn::config::EngineConfig;
//! use tdlearn::quantizer::Observation;
//!
//! let mut controller = EngineConfig::lookup_table().build_controller().unwrap();
//!
//! controller.observe(&Observation::new(50.0, 50.0, 300.0, 10.0, 100.0));
//! let first = controller.act().unwrap();
//! controller.record_event(RewardEvent::BulletHit).unwrap();
//!
//! controller.observe(&Observation::new(60.0, 50.0, 280.0, 15.0, 97.0));
//! let second = controller.act().unwrap();
//! assert_eq!(controller.mode(), Mode::Scan);
//! assert_eq!(controller.update_count(), 1);
//! # let _ = (first, second);
//! ```

pub mod controller;
pub mod policy;
pub mod reward;

pub use controller::{LearningController, LearningControllerBuilder, Mode};
pub use policy::{greedy_index, td_update, PolicyMode};
pub use reward::{RewardEvent, RewardScheme};
