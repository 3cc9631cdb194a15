use serde::{Serialize, Deserialize};

/// Events reported by the host simulation that carry a reward
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RewardEvent {
    /// Hit by an opponent's bullet
    HitByBullet,
    /// One of our bullets hit the opponent
    BulletHit,
    /// Collided with the opponent
    HitRobot,
    HitWall,
    /// The episode was won
    Won,
    /// The episode was lost
    Lost,
}

impl RewardEvent {
    /// Terminal events end the episode and trigger an immediate learning update.
    pub fn is_terminal(self) -> bool {
        matches!(self, RewardEvent::Won | RewardEvent::Lost)
    }
}

/// Reward magnitudes for each class of event
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RewardScheme {
    pub bad_instant: f64,
    pub good_instant: f64,
    pub bad_terminal: f64,
    pub good_terminal: f64,
}

impl Default for RewardScheme {
    fn default() -> Self {
        RewardScheme {
            bad_instant: -0.25,
            good_instant: 1.0,
            bad_terminal: -0.5,
            good_terminal: 2.0,
        }
    }
}

impl RewardScheme {
    pub fn reward_for(&self, event: RewardEvent) -> f64 {
        match event {
            RewardEvent::HitByBullet | RewardEvent::HitRobot | RewardEvent::HitWall => self.bad_instant,
            RewardEvent::BulletHit => self.good_instant,
            RewardEvent::Won => self.good_terminal,
            RewardEvent::Lost => self.bad_terminal,
        }
    }
}
