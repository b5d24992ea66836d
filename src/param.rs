//! Parameter value storage types.

use std::collections::BTreeMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Represents a realized parameter value.
///
/// For categorical parameters, the `Categorical` variant stores
/// the index into the distribution's choices.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ParamValue {
    /// A floating-point parameter value.
    Float(f64),
    /// An integer parameter value.
    Int(i64),
    /// A categorical parameter value, stored as an index into the choices.
    Categorical(usize),
}

impl ParamValue {
    /// Short name of the variant, used in error messages.
    pub(crate) fn kind(&self) -> &'static str {
        match self {
            Self::Float(_) => "float",
            Self::Int(_) => "int",
            Self::Categorical(_) => "categorical",
        }
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

/// Parameter values keyed by parameter name, iterated in name order.
pub type ParamMap = BTreeMap<String, ParamValue>;
