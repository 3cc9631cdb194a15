use rand::rngs::StdRng;
use rand::{seq::index, SeedableRng};
use serde::{Serialize, Deserialize};
use std::collections::VecDeque;

use crate::types::{Action, State};

/// One recorded step: the previous state and action, the reward that followed,
/// and the state (and action chosen there) it led to.
///
/// Fields are copied in at construction and cannot be changed afterwards.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transition {
    prev_state: State,
    prev_action: Action,
    reward: f64,
    curr_state: State,
    curr_action: Action,
}

impl Transition {
    pub fn new(prev_state: State, prev_action: Action, reward: f64, curr_state: State, curr_action: Action) -> Self {
        Transition {
            prev_state,
            prev_action,
            reward,
            curr_state,
            curr_action,
        }
    }

    pub fn prev_state(&self) -> State {
        self.prev_state
    }

    pub fn prev_action(&self) -> Action {
        self.prev_action
    }

    pub fn reward(&self) -> f64 {
        self.reward
    }

    pub fn curr_state(&self) -> State {
        self.curr_state
    }

    pub fn curr_action(&self) -> Action {
        self.curr_action
    }
}

/// How [`ExperienceBuffer::sample`] picks transitions
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SamplingStrategy {
    /// The `n` most recently added transitions: a recency window.
    #[default]
    MostRecent,
    /// `n` distinct transitions drawn uniformly without replacement.
    Uniform,
}

/// Fixed-capacity FIFO store of past transitions.
#[derive(Clone, Debug)]
pub struct ExperienceBuffer {
    buffer: VecDeque<Transition>,
    capacity: usize,
    strategy: SamplingStrategy,
    rng: StdRng,
}

impl ExperienceBuffer {
    pub fn new(capacity: usize) -> Self {
        ExperienceBuffer {
            buffer: VecDeque::with_capacity(capacity),
            capacity,
            strategy: SamplingStrategy::default(),
            rng: StdRng::from_entropy(),
        }
    }

    pub fn with_strategy(mut self, strategy: SamplingStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Seed the generator used by [`SamplingStrategy::Uniform`].
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// Append a transition, evicting the oldest one once over capacity.
    pub fn add(&mut self, transition: Transition) {
        if self.capacity == 0 {
            return;
        }
        if self.buffer.len() == self.capacity {
            self.buffer.pop_front();
        }
        self.buffer.push_back(transition);
    }

    /// Up to `n` transitions, reported in insertion order. `n` is clamped to [`Self::len`].
    pub fn sample(&mut self, n: usize) -> Vec<Transition> {
        let n = n.min(self.buffer.len());
        match self.strategy {
            SamplingStrategy::MostRecent => {
                self.buffer.iter().skip(self.buffer.len() - n).copied().collect()
            }
            SamplingStrategy::Uniform => {
                let mut picked = index::sample(&mut self.rng, self.buffer.len(), n).into_vec();
                picked.sort_unstable();
                picked.into_iter().map(|i| self.buffer[i]).collect()
            }
        }
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn strategy(&self) -> SamplingStrategy {
        self.strategy
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &Transition> {
        self.buffer.iter()
    }
}
