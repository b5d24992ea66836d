//! Search space declaration and partitioning.
//!
//! A [`SearchSpace`] maps parameter names to distributions. Iteration
//! follows name order, which fixes the column order of every matrix built
//! from it.

use std::collections::BTreeMap;
use std::collections::btree_map;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::distribution::Distribution;
use crate::error::{Error, Result};
use crate::param::ParamMap;

/// Mapping from parameter name to its declared [`Distribution`].
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct SearchSpace {
    distributions: BTreeMap<String, Distribution>,
}

impl SearchSpace {
    /// Creates an empty search space.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a parameter, returning the space for chaining.
    ///
    /// A parameter declared twice keeps the last distribution.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, distribution: impl Into<Distribution>) -> Self {
        self.insert(name, distribution);
        self
    }

    /// Adds or replaces a parameter, returning the previous distribution.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        distribution: impl Into<Distribution>,
    ) -> Option<Distribution> {
        self.distributions.insert(name.into(), distribution.into())
    }

    /// Returns the distribution declared for `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Distribution> {
        self.distributions.get(name)
    }

    /// Returns `true` if `name` is declared.
    #[must_use]
    pub fn contains_key(&self, name: &str) -> bool {
        self.distributions.contains_key(name)
    }

    /// Number of declared parameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.distributions.len()
    }

    /// Returns `true` if no parameter is declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.distributions.is_empty()
    }

    /// Iterates over `(name, distribution)` pairs in name order.
    pub fn iter(&self) -> btree_map::Iter<'_, String, Distribution> {
        self.distributions.iter()
    }

    /// Iterates over parameter names in name order.
    pub fn names(&self) -> btree_map::Keys<'_, String, Distribution> {
        self.distributions.keys()
    }

    /// Validates every declared distribution.
    ///
    /// # Errors
    ///
    /// Returns the first distribution validation error, wrapped with the
    /// parameter name in [`Error::ParameterConflict`].
    pub fn validate(&self) -> Result<()> {
        for (name, distribution) in &self.distributions {
            distribution
                .validate()
                .map_err(|e| Error::ParameterConflict {
                    name: name.clone(),
                    reason: e.to_string(),
                })?;
        }
        Ok(())
    }

    /// Splits the space into `(categorical, numerical)` subspaces.
    ///
    /// A parameter is numerical iff its distribution is a bounded float or
    /// integer interval (log-scaled or stepped included). The two halves are
    /// disjoint and together hold every declared parameter.
    #[must_use]
    pub fn partition(&self) -> (SearchSpace, SearchSpace) {
        let (numerical, categorical): (BTreeMap<_, _>, BTreeMap<_, _>) = self
            .distributions
            .iter()
            .map(|(name, d)| (name.clone(), d.clone()))
            .partition(|(_, d)| d.is_numerical());
        (
            SearchSpace {
                distributions: categorical,
            },
            SearchSpace {
                distributions: numerical,
            },
        )
    }

    /// Returns `true` if every value in `params` satisfies its distribution.
    ///
    /// A value whose name is not declared, or whose kind does not match the
    /// declared distribution, is not contained. Declared parameters absent
    /// from `params` are not checked.
    #[must_use]
    pub fn contains(&self, params: &ParamMap) -> bool {
        params.iter().all(|(name, value)| {
            self.distributions
                .get(name)
                .is_some_and(|d| d.contains_value(value))
        })
    }
}

impl FromIterator<(String, Distribution)> for SearchSpace {
    fn from_iter<T: IntoIterator<Item = (String, Distribution)>>(iter: T) -> Self {
        Self {
            distributions: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a SearchSpace {
    type Item = (&'a String, &'a Distribution);
    type IntoIter = btree_map::Iter<'a, String, Distribution>;

    fn into_iter(self) -> Self::IntoIter {
        self.distributions.iter()
    }
}
