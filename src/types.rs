//! Core types shared by selection and crossover.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The direction of optimization for one objective.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Direction {
    /// Minimize the objective value.
    Minimize,
    /// Maximize the objective value.
    Maximize,
}

/// The state of a trial in its lifecycle.
///
/// Only [`TrialState::Complete`] trials carry meaningful objective values;
/// the sampler façade drops everything else before breeding.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum TrialState {
    /// The trial is currently running.
    Running,
    /// The trial completed successfully.
    Complete,
    /// The trial failed with an error.
    Failed,
}
