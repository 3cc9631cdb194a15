use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, trace};

use super::policy::{greedy_index, td_update, PolicyMode};
use super::reward::{RewardEvent, RewardScheme};
use crate::config::LearningConfig;
use crate::error::{LearnError, Result};
use crate::q_function::QFunction;
use crate::quantizer::{Observation, Quantizer};
use crate::replay_buffer::{ExperienceBuffer, Transition};
use crate::types::{Action, State, KEY_LEN, STATE_AXES};

/// Phase of the scan/act cycle
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    /// Waiting for the next observation
    Scan,
    /// An observation arrived; an action must be chosen and learned from
    Act,
}

/// Temporal-difference learner driving a [`QFunction`].
///
/// The controller alternates between [`Mode::Scan`] and [`Mode::Act`]:
/// [`observe`](Self::observe) stores a fresh quantized state and switches to act,
/// [`act`](Self::act) picks an epsilon-greedy action, learns from the transition
/// that led here and switches back to scan.
///
/// # Example
///
/// ```rust
/// use tdlearn::agent::LearningControllerBuilder;
/// use tdlearn::config::LearningConfig;
/// use tdlearn::q_function::LookupTable;
/// use tdlearn::quantizer::{Observation, Quantizer};
///
/// let table = LookupTable::new([8, 6, 4, 4, 5], false).unwrap();
/// let mut controller = LearningControllerBuilder::new()
///     .q_function(Box::new(table))
///     .quantizer(Quantizer::lookup_table())
///     .action_dim(5)
///     .config(LearningConfig::lookup_table())
///     .build()
///     .unwrap();
///
/// controller.observe(&Observation::new(120.0, 340.0, 400.0, -45.0, 100.0));
/// let action = controller.act().unwrap();
/// assert!(action.index() < 5);
/// ```
pub struct LearningController {
    q_function: Box<dyn QFunction>,
    quantizer: Quantizer,
    config: LearningConfig,
    action_dim: usize,
    replay: Option<ExperienceBuffer>,
    rewards: RewardScheme,
    rng: StdRng,

    mode: Mode,
    prev: Option<(State, Action)>,
    curr_state: Option<State>,
    curr_action: Option<Action>,
    step_reward: f64,
    episode_reward: f64,
    updates: usize,
}

impl LearningController {
    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn action_dim(&self) -> usize {
        self.action_dim
    }

    pub fn config(&self) -> &LearningConfig {
        &self.config
    }

    pub fn quantizer(&self) -> &Quantizer {
        &self.quantizer
    }

    pub fn rewards(&self) -> &RewardScheme {
        &self.rewards
    }

    pub fn q_function(&self) -> &dyn QFunction {
        self.q_function.as_ref()
    }

    pub fn q_function_mut(&mut self) -> &mut dyn QFunction {
        self.q_function.as_mut()
    }

    pub fn replay(&self) -> Option<&ExperienceBuffer> {
        self.replay.as_ref()
    }

    pub fn current_state(&self) -> Option<State> {
        self.curr_state
    }

    pub fn current_action(&self) -> Option<Action> {
        self.curr_action
    }

    /// The state-action pair the next update will train.
    pub fn previous(&self) -> Option<(State, Action)> {
        self.prev
    }

    /// Reward accumulated since the last action.
    pub fn step_reward(&self) -> f64 {
        self.step_reward
    }

    /// Reward accumulated since the episode started.
    pub fn episode_reward(&self) -> f64 {
        self.episode_reward
    }

    /// Total number of backend training calls made.
    pub fn update_count(&self) -> usize {
        self.updates
    }

    /// Update epsilon for exploration decay
    pub fn set_epsilon(&mut self, epsilon: f64) {
        self.config.epsilon = epsilon.clamp(0.0, 1.0);
    }

    /// Quantize `observation` and make it the current state.
    pub fn observe(&mut self, observation: &Observation) -> State {
        let state = self.quantizer.quantize(observation);
        self.observe_state(state);
        state
    }

    /// Make an already quantized `state` the current state.
    ///
    /// The previous current state and the action chosen in it become the
    /// pair the next update trains.
    pub fn observe_state(&mut self, state: State) {
        if self.mode == Mode::Act {
            debug!("observation replaced one that was never acted on");
        }
        self.prev = self.curr_state.zip(self.curr_action);
        self.curr_state = Some(state);
        self.mode = Mode::Act;
    }

    /// Choose and return the action for the current state, learning from the
    /// transition that led to it, then return to scanning.
    pub fn act(&mut self) -> Result<Action> {
        if self.mode != Mode::Act {
            return Err(LearnError::NotReady("act() called without a fresh observation".to_string()));
        }
        let state = self
            .curr_state
            .ok_or_else(|| LearnError::NotReady("no current state".to_string()))?;

        let action = self.select_action(state)?;
        self.curr_action = Some(action);
        self.update_prev_q()?;

        self.mode = Mode::Scan;
        self.step_reward = 0.0;
        Ok(action)
    }

    /// Epsilon-greedy choice: a uniformly random action with probability epsilon,
    /// otherwise the greedy one.
    pub fn select_action(&mut self, state: State) -> Result<Action> {
        if self.rng.gen::<f64>() < self.config.epsilon {
            let action = Action::new(self.rng.gen_range(0..self.action_dim), self.action_dim)?;
            trace!(%action, "exploring");
            Ok(action)
        } else {
            let action = self.greedy_action(state)?;
            trace!(%action, "exploiting");
            Ok(action)
        }
    }

    /// Values of every action in `state`, in action order.
    pub fn action_values(&self, state: State) -> Result<Vec<f64>> {
        (0..self.action_dim)
            .map(|i| {
                let action = Action::new(i, self.action_dim)?;
                self.q_function.output_for(state.key(action).as_slice())
            })
            .collect()
    }

    /// Action with the largest value in `state`; ties go to the highest index.
    pub fn greedy_action(&self, state: State) -> Result<Action> {
        let values = self.action_values(state)?;
        let index = greedy_index(values)
            .ok_or_else(|| LearnError::NotReady("action space is empty".to_string()))?;
        Action::new(index, self.action_dim)
    }

    /// TD target for the transition's previous state-action pair.
    pub fn learn_q(&self, transition: &Transition) -> Result<f64> {
        let prev_key = transition.prev_state().key(transition.prev_action());
        let next_action = match self.config.policy {
            PolicyMode::OffPolicy => self.greedy_action(transition.curr_state())?,
            PolicyMode::OnPolicy => transition.curr_action(),
        };
        let curr_key = transition.curr_state().key(next_action);

        let prev_q = self.q_function.output_for(prev_key.as_slice())?;
        let curr_q = self.q_function.output_for(curr_key.as_slice())?;
        Ok(td_update(prev_q, curr_q, transition.reward(), self.config.alpha, self.config.gamma))
    }

    /// Train the backend on the transition into the current state.
    ///
    /// Without a replay buffer this is a single update. With one, the transition is
    /// buffered and every sampled transition is trained on its own previous key.
    /// Does nothing until a previous state-action pair exists.
    pub fn update_prev_q(&mut self) -> Result<()> {
        let (prev, curr_state, curr_action) = match (self.prev, self.curr_state, self.curr_action) {
            (Some(prev), Some(state), Some(action)) => (prev, state, action),
            _ => {
                trace!("no previous state-action pair to learn from");
                return Ok(());
            }
        };
        let transition = Transition::new(prev.0, prev.1, self.step_reward, curr_state, curr_action);

        let batch = match self.replay.as_mut() {
            None => vec![transition],
            Some(buffer) => {
                buffer.add(transition);
                let n = buffer.capacity();
                buffer.sample(n)
            }
        };

        for transition in &batch {
            self.train_on(transition)?;
        }
        debug!(batch = batch.len(), reward = self.step_reward, "learning tick");
        Ok(())
    }

    fn train_on(&mut self, transition: &Transition) -> Result<()> {
        let target = self.learn_q(transition)?;
        let key = transition.prev_state().key(transition.prev_action());
        self.q_function.train(key.as_slice(), target)?;
        self.updates += 1;
        Ok(())
    }

    /// Accumulate the event's reward; terminal events also trigger an update.
    pub fn record_event(&mut self, event: RewardEvent) -> Result<()> {
        let reward = self.rewards.reward_for(event);
        self.step_reward += reward;
        self.episode_reward += reward;
        trace!(?event, reward, "reward event");
        if event.is_terminal() {
            self.update_prev_q()?;
        }
        Ok(())
    }

    /// Forget the per-episode state. The backend and replay buffer persist.
    pub fn reset_episode(&mut self) {
        self.mode = Mode::Scan;
        self.prev = None;
        self.curr_state = None;
        self.curr_action = None;
        self.step_reward = 0.0;
        self.episode_reward = 0.0;
    }
}

/// Builder pattern for LearningController
pub struct LearningControllerBuilder {
    q_function: Option<Box<dyn QFunction>>,
    quantizer: Quantizer,
    config: LearningConfig,
    action_dim: Option<usize>,
    replay: Option<ExperienceBuffer>,
    rewards: RewardScheme,
}

impl LearningControllerBuilder {
    pub fn new() -> Self {
        LearningControllerBuilder {
            q_function: None,
            quantizer: Quantizer::default(),
            config: LearningConfig::default(),
            action_dim: None,
            replay: None,
            rewards: RewardScheme::default(),
        }
    }

    pub fn q_function(mut self, q_function: Box<dyn QFunction>) -> Self {
        self.q_function = Some(q_function);
        self
    }

    pub fn quantizer(mut self, quantizer: Quantizer) -> Self {
        self.quantizer = quantizer;
        self
    }

    pub fn config(mut self, config: LearningConfig) -> Self {
        self.config = config;
        self
    }

    pub fn action_dim(mut self, action_dim: usize) -> Self {
        self.action_dim = Some(action_dim);
        self
    }

    pub fn replay(mut self, buffer: ExperienceBuffer) -> Self {
        self.replay = Some(buffer);
        self
    }

    pub fn rewards(mut self, rewards: RewardScheme) -> Self {
        self.rewards = rewards;
        self
    }

    pub fn build(self) -> Result<LearningController> {
        let q_function = self.q_function.ok_or_else(|| LearnError::InvalidParameter {
            name: "q_function".to_string(),
            reason: "Q-function backend must be specified".to_string(),
        })?;

        let action_dim = self.action_dim.ok_or_else(|| LearnError::InvalidParameter {
            name: "action_dim".to_string(),
            reason: "Action space size must be specified".to_string(),
        })?;
        if action_dim == 0 {
            return Err(LearnError::InvalidParameter {
                name: "action_dim".to_string(),
                reason: "Action space must not be empty".to_string(),
            });
        }

        self.config.validate()?;
        self.quantizer.validate()?;
        check_table_shape(q_function.as_ref(), &self.quantizer, action_dim)?;

        let rng = match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Ok(LearningController {
            q_function,
            quantizer: self.quantizer,
            config: self.config,
            action_dim,
            replay: self.replay,
            rewards: self.rewards,
            rng,
            mode: Mode::Scan,
            prev: None,
            curr_state: None,
            curr_action: None,
            step_reward: 0.0,
            episode_reward: 0.0,
            updates: 0,
        })
    }
}

/// A cell-addressed backend must have one axis per quantizer bucket set plus the action axis.
fn check_table_shape(q_function: &dyn QFunction, quantizer: &Quantizer, action_dim: usize) -> Result<()> {
    let dims = match q_function.key_dims() {
        Some(dims) => dims,
        None => return Ok(()),
    };
    let cardinalities = quantizer.cardinalities().ok_or_else(|| {
        LearnError::invalid_parameter(
            "quantizer".to_string(),
            format!("{} needs every axis quantized into buckets", q_function.name()),
        )
    })?;

    let mut expected = [0; KEY_LEN];
    expected[..STATE_AXES].copy_from_slice(&cardinalities);
    expected[STATE_AXES] = action_dim;
    if dims != expected {
        return Err(LearnError::dimension_mismatch(
            format!("{} dims {:?}", q_function.name(), expected),
            format!("{:?}", dims),
        ));
    }
    Ok(())
}

impl Default for LearningControllerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
