//! Evaluated trials consumed by parent selection.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::param::ParamMap;
use crate::types::TrialState;

/// An evaluated trial with one objective value per optimization direction.
///
/// Trials are owned by the outer optimization loop; selection and
/// crossover only ever borrow them.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MultiObjectiveTrial {
    /// The ordinal number of this trial.
    pub id: u64,
    /// Realized parameter values, keyed by parameter name.
    pub params: ParamMap,
    /// The objective values (one per objective).
    pub values: Vec<f64>,
    /// The state of the trial.
    pub state: TrialState,
    /// Constraint values for this trial (<=0.0 means feasible).
    #[cfg_attr(feature = "serde", serde(default))]
    pub constraints: Vec<f64>,
}

impl MultiObjectiveTrial {
    /// Creates a completed trial without constraints.
    #[must_use]
    pub fn new(id: u64, params: ParamMap, values: Vec<f64>) -> Self {
        Self {
            id,
            params,
            values,
            state: TrialState::Complete,
            constraints: Vec::new(),
        }
    }

    /// Attaches constraint values.
    #[must_use]
    pub fn with_constraints(mut self, constraints: Vec<f64>) -> Self {
        self.constraints = constraints;
        self
    }

    /// Overrides the trial state.
    #[must_use]
    pub fn with_state(mut self, state: TrialState) -> Self {
        self.state = state;
        self
    }

    /// Returns `true` if all constraints are satisfied (values <= 0.0).
    ///
    /// A trial with no constraints is considered feasible.
    #[must_use]
    pub fn is_feasible(&self) -> bool {
        self.constraints.iter().all(|&c| c <= 0.0)
    }

    /// Returns `true` if the trial finished with objective values.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.state == TrialState::Complete
    }
}
