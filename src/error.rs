/// Errors returned by selection, transform, and crossover operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Returned when the lower bound is greater than the upper bound.
    #[error("invalid bounds: low ({low}) must be less than or equal to high ({high})")]
    InvalidBounds {
        /// The lower bound value.
        low: f64,
        /// The upper bound value.
        high: f64,
    },

    /// Returned when log scale is used with non-positive bounds.
    #[error("invalid log bounds: low must be positive for log scale")]
    InvalidLogBounds,

    /// Returned when step size is not positive, or is combined with log scale.
    #[error("invalid step: step must be positive and cannot be combined with log scale")]
    InvalidStep,

    /// Returned when categorical choices are empty.
    #[error("categorical choices cannot be empty")]
    EmptyChoices,

    /// Returned when an operator needs more distinct parents than the population holds.
    #[error("not enough parents: operator requires {requested} but population has {available}")]
    NotEnoughParents {
        /// The number of parents the operator requires.
        requested: usize,
        /// The number of trials in the parent population.
        available: usize,
    },

    /// Returned when the swapping probability is outside `[0.0, 1.0]`.
    #[error("invalid swapping probability: {0} must be in [0.0, 1.0]")]
    InvalidSwappingProb(f64),

    /// Returned when a crossover operator is configured with an invalid value.
    #[error("invalid crossover parameter '{name}': {reason}")]
    InvalidCrossoverParameter {
        /// The name of the offending parameter.
        name: &'static str,
        /// Why the value was rejected.
        reason: String,
    },

    /// Returned when a parameter expected by a transform or search space is absent.
    #[error("missing parameter '{0}'")]
    MissingParameter(String),

    /// Returned when a parameter is not declared by the transform or search space.
    #[error("unknown parameter '{0}'")]
    UnknownParameter(String),

    /// Returned when a parameter value or distribution does not fit where it is used.
    #[error("parameter conflict for '{name}': {reason}")]
    ParameterConflict {
        /// The name of the conflicting parameter.
        name: String,
        /// The reason for the conflict.
        reason: String,
    },

    /// Returned when a vector or matrix row has the wrong number of columns.
    #[error("dimension mismatch: expected {expected} values, got {got}")]
    DimensionMismatch {
        /// The expected number of values.
        expected: usize,
        /// The actual number of values.
        got: usize,
    },

    /// Returned when a bounded repair loop gives up without a feasible child.
    #[error("no feasible child found after {attempts} attempts")]
    RetriesExhausted {
        /// How many children were generated and rejected.
        attempts: usize,
    },
}

pub type Result<T> = core::result::Result<T, Error>;
