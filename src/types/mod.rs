use serde::{Serialize, Deserialize};
use std::fmt;

use crate::error::{LearnError, Result};

/// Number of state axes fed to a Q-function
pub const STATE_AXES: usize = 4;

/// Length of a state-action key: the state axes followed by the action index
pub const KEY_LEN: usize = STATE_AXES + 1;

/// Quantized agent state.
///
/// For the lookup-table backend every axis holds a bucket index in
/// `[0, axis_dim)`; for the network backend the axes are bounded reals.
/// `State` is a plain value: copying it never aliases another snapshot.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct State {
    pub values: [f64; STATE_AXES],
}

impl State {
    pub fn new(a1: f64, a2: f64, a3: f64, a4: f64) -> Self {
        State { values: [a1, a2, a3, a4] }
    }

    pub fn from_array(values: [f64; STATE_AXES]) -> Self {
        State { values }
    }

    /// Address of `action` taken in this state.
    pub fn key(&self, action: Action) -> StateActionKey {
        let mut key = [0.0; KEY_LEN];
        key[..STATE_AXES].copy_from_slice(&self.values);
        key[STATE_AXES] = action.index() as f64;
        StateActionKey(key)
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d] = self.values;
        write!(f, "{}, {}, {}, {}", a, b, c, d)
    }
}

/// Index of one of a fixed, enumerable set of actions
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Action(usize);

impl Action {
    /// Validate `index` against the size of the action space.
    pub fn new(index: usize, action_dim: usize) -> Result<Self> {
        if index >= action_dim {
            return Err(LearnError::InvalidAction {
                action: index,
                max_actions: action_dim,
            });
        }
        Ok(Action(index))
    }

    pub fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "a{}", self.0 + 1)
    }
}

/// The five macro-behaviours of the reactive agent.
///
/// Translating these into movement and firing commands belongs to the host
/// simulation; the engine only needs their count and order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MacroAction {
    CircleClockwise,
    CircleAnticlockwise,
    Advance,
    Retreat,
    Fire,
}

impl MacroAction {
    pub const ALL: [MacroAction; 5] = [
        MacroAction::CircleClockwise,
        MacroAction::CircleAnticlockwise,
        MacroAction::Advance,
        MacroAction::Retreat,
        MacroAction::Fire,
    ];

    /// Size of the macro action space
    pub const COUNT: usize = Self::ALL.len();

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_action(action: Action) -> Option<Self> {
        Self::ALL.get(action.index()).copied()
    }
}

impl From<MacroAction> for Action {
    fn from(action: MacroAction) -> Self {
        Action(action.index())
    }
}

/// A state concatenated with one action; the addressing unit of a Q-function.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct StateActionKey(pub [f64; KEY_LEN]);

impl StateActionKey {
    pub fn new(values: [f64; KEY_LEN]) -> Self {
        StateActionKey(values)
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn state(&self) -> State {
        let mut values = [0.0; STATE_AXES];
        values.copy_from_slice(&self.0[..STATE_AXES]);
        State { values }
    }

    pub fn action_index(&self) -> usize {
        self.0[STATE_AXES] as usize
    }
}

impl AsRef<[f64]> for StateActionKey {
    fn as_ref(&self) -> &[f64] {
        &self.0
    }
}
