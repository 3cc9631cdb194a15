use std::fmt;

/// Result type for tdlearn operations
pub type Result<T> = std::result::Result<T, LearnError>;

/// Main error type for the learning engine
#[derive(Debug, Clone, PartialEq)]
pub enum LearnError {
    /// Invalid dimensions for operations
    DimensionMismatch {
        expected: String,
        actual: String,
    },

    /// Invalid parameter value
    InvalidParameter {
        name: String,
        reason: String,
    },

    /// Invalid action
    InvalidAction {
        action: usize,
        max_actions: usize,
    },

    /// A state-action key component outside its axis cardinality
    IndexOutOfRange {
        axis: usize,
        index: f64,
        dim: usize,
    },

    /// Malformed record in a persisted table or weight file
    Parse {
        line: usize,
        reason: String,
    },

    /// IO errors (file operations)
    IoError(String),

    /// Serialization/deserialization errors
    SerializationError(String),

    /// Component used before it was initialized or in the wrong mode
    NotReady(String),
}

/// Coarse classification of a [`LearnError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Inconsistent configuration or out-of-range addressing; unrecoverable
    Configuration,
    /// Failure reading or writing persisted state
    Persistence,
    /// Operation invoked before the component was ready
    State,
}

impl fmt::Display for LearnError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LearnError::DimensionMismatch { expected, actual } => {
                write!(f, "Dimension mismatch: expected {}, got {}", expected, actual)
            }
            LearnError::InvalidParameter { name, reason } => {
                write!(f, "Invalid parameter '{}': {}", name, reason)
            }
            LearnError::InvalidAction { action, max_actions } => {
                write!(f, "Invalid action {}: must be less than {}", action, max_actions)
            }
            LearnError::IndexOutOfRange { axis, index, dim } => {
                write!(f, "Index {} on axis {} is outside [0, {})", index, axis, dim)
            }
            LearnError::Parse { line, reason } => write!(f, "Parse error on line {}: {}", line, reason),
            LearnError::IoError(msg) => write!(f, "IO error: {}", msg),
            LearnError::SerializationError(msg) => write!(f, "Serialization error: {}", msg),
            LearnError::NotReady(msg) => write!(f, "Not ready: {}", msg),
        }
    }
}

impl std::error::Error for LearnError {}

// Conversion from std::io::Error
impl From<std::io::Error> for LearnError {
    fn from(err: std::io::Error) -> Self {
        LearnError::IoError(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for LearnError {
    fn from(err: serde_json::Error) -> Self {
        LearnError::SerializationError(err.to_string())
    }
}

impl LearnError {
    pub fn dimension_mismatch<S: Into<String>>(expected: S, actual: S) -> Self {
        LearnError::DimensionMismatch {
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    pub fn invalid_parameter<S: Into<String>>(name: S, reason: S) -> Self {
        LearnError::InvalidParameter {
            name: name.into(),
            reason: reason.into(),
        }
    }

    pub fn parse<S: Into<String>>(line: usize, reason: S) -> Self {
        LearnError::Parse {
            line,
            reason: reason.into(),
        }
    }

    /// Which part of the error taxonomy this error belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            LearnError::DimensionMismatch { .. }
            | LearnError::InvalidParameter { .. }
            | LearnError::InvalidAction { .. }
            | LearnError::IndexOutOfRange { .. } => ErrorKind::Configuration,
            LearnError::Parse { .. } | LearnError::IoError(_) | LearnError::SerializationError(_) => {
                ErrorKind::Persistence
            }
            LearnError::NotReady(_) => ErrorKind::State,
        }
    }
}
