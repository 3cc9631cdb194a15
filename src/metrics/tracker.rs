use serde::{Serialize, Deserialize};

/// Episodes per block in [`SessionStats::block_wins`]
pub const WIN_BLOCK: usize = 100;

/// Tracks outcomes across the episodes of a session
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionStats {
    /// Episodes recorded so far
    pub episodes: usize,

    /// Episodes won
    pub wins: usize,

    /// Wins in each block of [`WIN_BLOCK`] episodes; the last entry may be partial
    pub block_wins: Vec<usize>,

    /// Accumulated reward of each episode, in order
    pub episode_rewards: Vec<f64>,
}

impl SessionStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_episode(&mut self, won: bool, reward: f64) {
        if self.episodes % WIN_BLOCK == 0 {
            self.block_wins.push(0);
        }
        self.episodes += 1;
        self.episode_rewards.push(reward);

        if won {
            self.wins += 1;
            if let Some(block) = self.block_wins.last_mut() {
                *block += 1;
            }
        }
    }

    /// Fraction of episodes won, 0 before any episode.
    pub fn win_rate(&self) -> f64 {
        if self.episodes == 0 {
            0.0
        } else {
            self.wins as f64 / self.episodes as f64
        }
    }

    /// Win rate of each block of [`WIN_BLOCK`] episodes.
    pub fn block_win_rates(&self) -> Vec<f64> {
        let mut remaining = self.episodes;
        self.block_wins
            .iter()
            .map(|&wins| {
                let played = remaining.min(WIN_BLOCK);
                remaining -= played;
                wins as f64 / played as f64
            })
            .collect()
    }

    /// Mean reward over the last `window` episodes.
    pub fn mean_reward(&self, window: usize) -> Option<f64> {
        let n = window.min(self.episode_rewards.len());
        if n == 0 {
            return None;
        }
        let recent = &self.episode_rewards[self.episode_rewards.len() - n..];
        Some(recent.iter().sum::<f64>() / n as f64)
    }
}
