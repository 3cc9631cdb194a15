use crate::error::{LearnError, Result};
use crate::replay_buffer::{ExperienceBuffer, SamplingStrategy};

/// Builder for ExperienceBuffer
pub struct ExperienceBufferBuilder {
    capacity: Option<usize>,
    strategy: SamplingStrategy,
    seed: Option<u64>,
}

impl ExperienceBufferBuilder {
    /// Create a new experience buffer builder
    pub fn new() -> Self {
        ExperienceBufferBuilder {
            capacity: None,
            strategy: SamplingStrategy::default(),
            seed: None,
        }
    }

    /// Set the capacity
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = Some(capacity);
        self
    }

    /// Sample the most recent transitions (the default)
    pub fn most_recent(mut self) -> Self {
        self.strategy = SamplingStrategy::MostRecent;
        self
    }

    /// Sample uniformly without replacement
    pub fn uniform(mut self) -> Self {
        self.strategy = SamplingStrategy::Uniform;
        self
    }

    pub fn strategy(mut self, strategy: SamplingStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Seed the sampling generator
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Build the experience buffer
    pub fn build(self) -> Result<ExperienceBuffer> {
        let capacity = self.capacity.ok_or_else(|| LearnError::InvalidParameter {
            name: "capacity".to_string(),
            reason: "Capacity not specified".to_string(),
        })?;

        if capacity == 0 {
            return Err(LearnError::InvalidParameter {
                name: "capacity".to_string(),
                reason: "Capacity must be greater than 0".to_string(),
            });
        }

        let buffer = ExperienceBuffer::new(capacity).with_strategy(self.strategy);
        Ok(match self.seed {
            Some(seed) => buffer.with_seed(seed),
            None => buffer,
        })
    }
}

impl Default for ExperienceBufferBuilder {
    fn default() -> Self {
        Self::new()
    }
}
