//! Parameter distribution types.
//!
//! A [`Distribution`] declares the legal domain of one parameter. Every
//! distribution maps realized values to a single `f64` internal
//! representation ([`Distribution::to_internal_repr`]) and answers
//! containment in that representation ([`Distribution::contains`]).

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::param::ParamValue;

/// Tolerance used when checking that a float lies on its step grid.
const STEP_TOLERANCE: f64 = 1e-8;

/// Distribution for floating-point parameters.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FloatDistribution {
    /// Lower bound (inclusive).
    pub low: f64,
    /// Upper bound (inclusive).
    pub high: f64,
    /// Whether the parameter is searched in log space.
    pub log_scale: bool,
    /// Optional step size for discretization.
    pub step: Option<f64>,
}

impl FloatDistribution {
    /// Creates a uniform float distribution over `[low, high]`.
    #[must_use]
    pub fn new(low: f64, high: f64) -> Self {
        Self {
            low,
            high,
            log_scale: false,
            step: None,
        }
    }

    /// Enables log scale.
    #[must_use]
    pub fn log_scale(mut self) -> Self {
        self.log_scale = true;
        self
    }

    /// Sets a step size for a quantized distribution.
    #[must_use]
    pub fn step(mut self, step: f64) -> Self {
        self.step = Some(step);
        self
    }

    /// Checks the bounds, log-scale, and step invariants.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidBounds`], [`Error::InvalidLogBounds`], or
    /// [`Error::InvalidStep`].
    pub fn validate(&self) -> Result<()> {
        if self.low.is_nan() || self.high.is_nan() || self.low > self.high {
            return Err(Error::InvalidBounds {
                low: self.low,
                high: self.high,
            });
        }
        if self.log_scale && self.low <= 0.0 {
            return Err(Error::InvalidLogBounds);
        }
        if let Some(step) = self.step
            && (step <= 0.0 || self.log_scale)
        {
            return Err(Error::InvalidStep);
        }
        Ok(())
    }

    fn contains(&self, value: f64) -> bool {
        if value.is_nan() || value < self.low || value > self.high {
            return false;
        }
        match self.step {
            Some(step) => {
                let k = (value - self.low) / step;
                (k - k.round()).abs() < STEP_TOLERANCE
            }
            None => true,
        }
    }
}

/// Distribution for integer parameters.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct IntDistribution {
    /// Lower bound (inclusive).
    pub low: i64,
    /// Upper bound (inclusive).
    pub high: i64,
    /// Whether the parameter is searched in log space.
    pub log_scale: bool,
    /// Optional step size. `None` means a step of one.
    pub step: Option<i64>,
}

impl IntDistribution {
    /// Creates a uniform integer distribution over `[low, high]`.
    #[must_use]
    pub fn new(low: i64, high: i64) -> Self {
        Self {
            low,
            high,
            log_scale: false,
            step: None,
        }
    }

    /// Enables log scale.
    #[must_use]
    pub fn log_scale(mut self) -> Self {
        self.log_scale = true;
        self
    }

    /// Sets a step size.
    #[must_use]
    pub fn step(mut self, step: i64) -> Self {
        self.step = Some(step);
        self
    }

    /// The step size, defaulting to one.
    #[must_use]
    pub fn effective_step(&self) -> i64 {
        self.step.unwrap_or(1)
    }

    /// Checks the bounds, log-scale, and step invariants.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidBounds`], [`Error::InvalidLogBounds`], or
    /// [`Error::InvalidStep`].
    #[allow(clippy::cast_precision_loss)]
    pub fn validate(&self) -> Result<()> {
        if self.low > self.high {
            return Err(Error::InvalidBounds {
                low: self.low as f64,
                high: self.high as f64,
            });
        }
        if self.log_scale && self.low < 1 {
            return Err(Error::InvalidLogBounds);
        }
        if let Some(step) = self.step
            && (step <= 0 || (self.log_scale && step != 1))
        {
            return Err(Error::InvalidStep);
        }
        Ok(())
    }

    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
    fn contains(&self, value: f64) -> bool {
        if value.fract() != 0.0 || value < self.low as f64 || value > self.high as f64 {
            return false;
        }
        (value as i64 - self.low) % self.effective_step() == 0
    }
}

/// Distribution for categorical parameters: an unordered finite set of tokens.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CategoricalDistribution {
    /// The available choices. Values are stored as indices into this list.
    pub choices: Vec<String>,
}

impl CategoricalDistribution {
    /// Creates a categorical distribution over the given choices.
    pub fn new<I, S>(choices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            choices: choices.into_iter().map(Into::into).collect(),
        }
    }

    /// Number of choices available.
    #[must_use]
    pub fn n_choices(&self) -> usize {
        self.choices.len()
    }

    /// Returns the label of the choice at `index`.
    #[must_use]
    pub fn choice(&self, index: usize) -> Option<&str> {
        self.choices.get(index).map(String::as_str)
    }

    /// Checks that at least one choice is declared.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyChoices`] if there are no choices.
    pub fn validate(&self) -> Result<()> {
        if self.choices.is_empty() {
            return Err(Error::EmptyChoices);
        }
        Ok(())
    }

    #[allow(clippy::cast_precision_loss)]
    fn contains(&self, value: f64) -> bool {
        value.fract() == 0.0 && 0.0 <= value && value < self.choices.len() as f64
    }
}

/// Enum wrapping all parameter distribution types.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Distribution {
    /// A floating-point distribution.
    Float(FloatDistribution),
    /// An integer distribution.
    Int(IntDistribution),
    /// A categorical distribution.
    Categorical(CategoricalDistribution),
}

impl Distribution {
    /// Returns `true` for bounded interval kinds (float and integer, with or
    /// without log scale or step), `false` for categorical.
    #[must_use]
    pub fn is_numerical(&self) -> bool {
        matches!(self, Self::Float(_) | Self::Int(_))
    }

    /// Returns `true` if the domain holds exactly one value.
    #[must_use]
    #[allow(clippy::float_cmp)]
    pub fn single(&self) -> bool {
        match self {
            Self::Float(d) => match d.step {
                Some(step) => d.high - d.low < step,
                None => d.low == d.high,
            },
            Self::Int(d) => d.high - d.low < d.effective_step(),
            Self::Categorical(d) => d.choices.len() == 1,
        }
    }

    /// Checks the construction invariants of the wrapped distribution.
    ///
    /// # Errors
    ///
    /// Returns the validation error of the wrapped distribution.
    pub fn validate(&self) -> Result<()> {
        match self {
            Self::Float(d) => d.validate(),
            Self::Int(d) => d.validate(),
            Self::Categorical(d) => d.validate(),
        }
    }

    /// Maps a realized value to its internal `f64` representation.
    ///
    /// Categorical values map to their index. Returns `None` when the
    /// value kind does not match the distribution kind.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn to_internal_repr(&self, value: &ParamValue) -> Option<f64> {
        match (self, value) {
            (Self::Float(_), ParamValue::Float(v)) => Some(*v),
            (Self::Int(_), ParamValue::Int(v)) => Some(*v as f64),
            (Self::Categorical(_), ParamValue::Categorical(i)) => Some(*i as f64),
            _ => None,
        }
    }

    /// Maps an internal representation back to a realized value.
    ///
    /// Integer and categorical representations are rounded. No bounds are
    /// enforced; use [`contains`](Self::contains) for that.
    #[must_use]
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    pub fn to_external_repr(&self, internal: f64) -> ParamValue {
        match self {
            Self::Float(_) => ParamValue::Float(internal),
            Self::Int(_) => ParamValue::Int(internal.round() as i64),
            Self::Categorical(_) => ParamValue::Categorical(internal.round().max(0.0) as usize),
        }
    }

    /// Returns `true` if the internal representation lies in the domain.
    #[must_use]
    pub fn contains(&self, internal: f64) -> bool {
        match self {
            Self::Float(d) => d.contains(internal),
            Self::Int(d) => d.contains(internal),
            Self::Categorical(d) => d.contains(internal),
        }
    }

    /// Convenience: converts `value` and checks containment in one step.
    ///
    /// A value of the wrong kind is never contained.
    #[must_use]
    pub fn contains_value(&self, value: &ParamValue) -> bool {
        self.to_internal_repr(value)
            .is_some_and(|internal| self.contains(internal))
    }
}

impl From<FloatDistribution> for Distribution {
    fn from(d: FloatDistribution) -> Self {
        Self::Float(d)
    }
}

impl From<IntDistribution> for Distribution {
    fn from(d: IntDistribution) -> Self {
        Self::Int(d)
    }
}

impl From<CategoricalDistribution> for Distribution {
    fn from(d: CategoricalDistribution) -> Self {
        Self::Categorical(d)
    }
}
