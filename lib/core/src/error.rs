use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Computation error: {0}")]
    Computation(String),

    #[error("Evaluation cancelled after {processed} candidates")]
    Cancelled { processed: usize },

    #[error("Embedding error: {0}")]
    Embedding(String),
}

impl Error {
    /// Whether this error was caused by malformed input
    pub fn is_validation(&self) -> bool {
        matches!(self, Error::Validation(_))
    }

    pub fn as_validation(&self) -> Option<&ValidationError> {
        match self {
            Error::Validation(e) => Some(e),
            _ => None,
        }
    }
}

/// Malformed or inconsistent input. Always fatal to the call.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("criteria must not be empty")]
    EmptyCriteria,

    #[error("alternatives must not be empty")]
    EmptyAlternatives,

    #[error("criterion name '{0}' is not unique")]
    DuplicateCriterion(String),

    #[error("criterion '{criterion}' weight must be > 0, got {weight}")]
    NonPositiveWeight { criterion: String, weight: f64 },

    #[error("invalid criterion direction '{0}': expected BENEFIT or COST")]
    InvalidDirection(String),

    #[error("'{id}' has dimension {actual}, expected {expected}")]
    DimensionMismatch {
        id: String,
        expected: usize,
        actual: usize,
    },

    #[error("'{id}' has a non-finite value at position {index}")]
    NonFiniteValue { id: String, index: usize },

    #[error("'{id}' has no value for criterion '{criterion}'")]
    MissingValue { id: String, criterion: String },

    #[error("top_n must be in [{min}, {max}], got {top_n}")]
    TopNOutOfRange { top_n: usize, min: usize, max: usize },

    #[error("vector of '{0}' is empty")]
    EmptyVector(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}
