//! Explicit owner of everything that lives across episodes.
//!
//! A [`Session`] holds the controller (and through it the backend and replay
//! buffer), the outcome statistics, and the checkpoint path. The host calls it
//! for every callback; nothing is kept in process-wide state.

use std::path::{Path, PathBuf};

use tracing::info;

use crate::agent::{LearningController, RewardEvent};
use crate::error::Result;
use crate::metrics::SessionStats;
use crate::q_function;
use crate::quantizer::Observation;
use crate::types::{Action, State};

pub struct Session {
    controller: LearningController,
    stats: SessionStats,
    checkpoint: Option<PathBuf>,
    won: bool,
}

impl Session {
    /// Wrap `controller`, restoring its backend from `checkpoint` when that file exists.
    pub fn start(mut controller: LearningController, checkpoint: Option<PathBuf>) -> Result<Self> {
        if let Some(path) = checkpoint.as_deref() {
            if path.exists() {
                q_function::load_from_path(controller.q_function_mut(), path)?;
            } else {
                info!(path = %path.display(), "no checkpoint yet, starting fresh");
            }
        }
        info!(backend = controller.q_function().name(), "session started");

        Ok(Session {
            controller,
            stats: SessionStats::new(),
            checkpoint,
            won: false,
        })
    }

    pub fn controller(&self) -> &LearningController {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut LearningController {
        &mut self.controller
    }

    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    pub fn checkpoint_path(&self) -> Option<&Path> {
        self.checkpoint.as_deref()
    }

    /// Write the backend to the checkpoint path, if one is configured.
    pub fn checkpoint(&self) -> Result<()> {
        if let Some(path) = self.checkpoint.as_deref() {
            q_function::save_to_path(self.controller.q_function(), path)?;
        }
        Ok(())
    }

    /// Checkpoint, then clear the controller's per-episode state.
    pub fn begin_episode(&mut self) -> Result<()> {
        self.checkpoint()?;
        self.controller.reset_episode();
        self.won = false;
        Ok(())
    }

    pub fn observe(&mut self, observation: &Observation) -> State {
        self.controller.observe(observation)
    }

    pub fn act(&mut self) -> Result<Action> {
        self.controller.act()
    }

    pub fn record_event(&mut self, event: RewardEvent) -> Result<()> {
        if event == RewardEvent::Won {
            self.won = true;
        }
        self.controller.record_event(event)
    }

    /// Record the finished episode and return its accumulated reward.
    pub fn end_episode(&mut self) -> f64 {
        let reward = self.controller.episode_reward();
        self.stats.record_episode(self.won, reward);
        info!(
            episode = self.stats.episodes,
            won = self.won,
            reward,
            win_rate = self.stats.win_rate(),
            "episode finished"
        );
        reward
    }

    /// Final checkpoint; hands back the statistics.
    pub fn end_session(self) -> Result<SessionStats> {
        self.checkpoint()?;
        info!(episodes = self.stats.episodes, wins = self.stats.wins, "session ended");
        Ok(self.stats)
    }
}
