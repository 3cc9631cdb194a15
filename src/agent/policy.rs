use serde::{Serialize, Deserialize};

/// Which action the TD target bootstraps from in the next state
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyMode {
    /// Q-learning: the greedy action in the next state
    #[default]
    OffPolicy,
    /// SARSA: the action actually chosen in the next state
    OnPolicy,
}

/// Index of the largest value.
///
/// Values are scanned in order and an index replaces the running best whenever its
/// value is `>=` the best so far, so exact ties go to the highest index.
/// Returns `None` for an empty input.
pub fn greedy_index<I>(values: I) -> Option<usize>
where
    I: IntoIterator<Item = f64>,
{
    let mut best: Option<(usize, f64)> = None;
    for (index, value) in values.into_iter().enumerate() {
        match best {
            Some((_, max)) if value < max || value.is_nan() => {}
            _ => best = Some((index, value)),
        }
    }
    best.map(|(index, _)| index)
}

/// Temporal-difference update: `prev_q + alpha * (reward + gamma * curr_q - prev_q)`.
pub fn td_update(prev_q: f64, curr_q: f64, reward: f64, alpha: f64, gamma: f64) -> f64 {
    prev_q + alpha * (reward + gamma * curr_q - prev_q)
}
