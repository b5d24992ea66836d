//! Crossover orchestration: parent selection, per-subspace recombination,
//! decoding, and the accept/reject repair loop.
//!
//! [`crossover`] produces one child parameter map from a parent population:
//!
//! 1. The search space is partitioned into categorical and numerical
//!    subspaces, and a [`SearchSpaceTransform`] is built for the numerical
//!    one (once per call).
//! 2. On every attempt, fresh parents are chosen by binary tournament.
//!    Categorical values always come from a [`UniformCrossover`] between
//!    the first and the last selected parent; numerical values come from
//!    the configured operator applied to all selected parents in encoded
//!    space.
//! 3. A child whose decoded values fall outside their distributions is
//!    discarded and the attempt repeats.
//!
//! The repair loop in [`crossover`] has no upper bound: a search space in
//! which the operator almost never produces a feasible child makes it spin
//! for a long time. [`crossover_with_limit`] offers an explicit attempt
//! budget for callers that need bounded latency.
//!
//! # Examples
//!
//! ```
//! use nsga_crossover::Direction;
//! use nsga_crossover::crossover::crossover;
//! use nsga_crossover::crossovers::UniformCrossover;
//! use nsga_crossover::distribution::{CategoricalDistribution, FloatDistribution};
//! use nsga_crossover::param::{ParamMap, ParamValue};
//! use nsga_crossover::pareto::trial_dominates;
//! use nsga_crossover::search_space::SearchSpace;
//! use nsga_crossover::trial::MultiObjectiveTrial;
//!
//! let space = SearchSpace::new()
//!     .with("x", FloatDistribution::new(0.0, 1.0))
//!     .with("color", CategoricalDistribution::new(["r", "g"]));
//!
//! let population: Vec<_> = (0..4_u32)
//!     .map(|i| {
//!         let mut params = ParamMap::new();
//!         params.insert("x".into(), ParamValue::Float(f64::from(i) / 4.0));
//!         params.insert("color".into(), ParamValue::Categorical(i as usize % 2));
//!         MultiObjectiveTrial::new(u64::from(i), params, vec![f64::from(i), 4.0 - f64::from(i)])
//!     })
//!     .collect();
//!
//! let mut rng = fastrand::Rng::with_seed(42);
//! let child = crossover(
//!     &UniformCrossover::default(),
//!     &[Direction::Minimize, Direction::Minimize],
//!     &population,
//!     &space,
//!     &mut rng,
//!     0.5,
//!     trial_dominates,
//! )
//! .unwrap();
//! assert!(space.contains(&child));
//! ```

use core::borrow::Borrow;

use crate::crossovers::{Crossover, UniformCrossover};
use crate::distribution::Distribution;
use crate::error::{Error, Result};
use crate::param::ParamMap;
use crate::search_space::SearchSpace;
use crate::selection::select_parents;
use crate::transform::SearchSpaceTransform;
use crate::trial::MultiObjectiveTrial;
use crate::types::Direction;

/// An accepted child together with the number of attempts it took.
#[derive(Clone, Debug, PartialEq)]
pub struct Offspring {
    /// The feasible child parameter values.
    pub params: ParamMap,
    /// How many children were generated, the accepted one included.
    pub attempts: usize,
}

/// Breeds one feasible child from `parent_population`.
///
/// The population may hold owned trials or references to them.
/// Retries until a child satisfies every distribution in `search_space`;
/// see the [module docs](self) for the procedure and its unbounded loop.
///
/// # Errors
///
/// - [`Error::InvalidSwappingProb`] if `swapping_prob` is outside `[0, 1]`.
/// - [`Error::NotEnoughParents`] if `operator` needs more parents than the
///   population holds.
/// - [`Error::MissingParameter`] / [`Error::ParameterConflict`] if a parent
///   lacks a declared parameter or holds a value of the wrong kind.
pub fn crossover<T, D>(
    operator: &dyn Crossover,
    directions: &[Direction],
    parent_population: &[T],
    search_space: &SearchSpace,
    rng: &mut fastrand::Rng,
    swapping_prob: f64,
    dominates: D,
) -> Result<ParamMap>
where
    T: Borrow<MultiObjectiveTrial>,
    D: Fn(&MultiObjectiveTrial, &MultiObjectiveTrial, &[Direction]) -> bool,
{
    crossover_with_limit(
        operator,
        directions,
        parent_population,
        search_space,
        rng,
        swapping_prob,
        dominates,
        None,
    )
    .map(|offspring| offspring.params)
}

/// Like [`crossover`], but gives up after `max_attempts` rejected children.
///
/// `None` keeps the unbounded behaviour of [`crossover`].
///
/// # Errors
///
/// Everything [`crossover`] returns, plus [`Error::RetriesExhausted`] when
/// the attempt budget runs out.
#[allow(clippy::too_many_arguments)]
pub fn crossover_with_limit<T, D>(
    operator: &dyn Crossover,
    directions: &[Direction],
    parent_population: &[T],
    search_space: &SearchSpace,
    rng: &mut fastrand::Rng,
    swapping_prob: f64,
    dominates: D,
    max_attempts: Option<usize>,
) -> Result<Offspring>
where
    T: Borrow<MultiObjectiveTrial>,
    D: Fn(&MultiObjectiveTrial, &MultiObjectiveTrial, &[Direction]) -> bool,
{
    let categorical_op = UniformCrossover::new(swapping_prob)?;
    let n_parents = operator.n_parents();
    if n_parents == 0 {
        return Err(Error::InvalidCrossoverParameter {
            name: "n_parents",
            reason: "operator must require at least one parent".into(),
        });
    }
    if n_parents > parent_population.len() {
        return Err(Error::NotEnoughParents {
            requested: n_parents,
            available: parent_population.len(),
        });
    }

    let plan = CrossoverPlan::new(search_space)?;
    trace_info!(
        n_categorical = plan.categorical.len(),
        n_numerical = plan.transform.as_ref().map_or(0, SearchSpaceTransform::len),
        n_parents,
        population = parent_population.len(),
        "starting crossover"
    );

    let mut attempts = 0_usize;
    loop {
        if let Some(max) = max_attempts
            && attempts >= max
        {
            trace_info!(attempts, "no feasible child within attempt budget");
            return Err(Error::RetriesExhausted { attempts });
        }
        attempts += 1;

        let parents = select_parents(parent_population, n_parents, directions, rng, &dominates)?;
        match plan.try_crossover(&parents, operator, &categorical_op, rng, directions)? {
            Some(params) => {
                trace_debug!(attempts, "accepted child");
                return Ok(Offspring { params, attempts });
            }
            None => {
                trace_debug!(attempt = attempts, "rejected infeasible child");
            }
        }
    }
}

/// Per-call state built once before the repair loop.
struct CrossoverPlan<'a> {
    search_space: &'a SearchSpace,
    categorical: SearchSpace,
    transform: Option<SearchSpaceTransform>,
}

impl<'a> CrossoverPlan<'a> {
    fn new(search_space: &'a SearchSpace) -> Result<Self> {
        let (categorical, numerical) = search_space.partition();
        let transform = if numerical.is_empty() {
            None
        } else {
            Some(SearchSpaceTransform::new(&numerical)?)
        };
        Ok(Self {
            search_space,
            categorical,
            transform,
        })
    }

    /// Generates one child; `Ok(None)` means it was infeasible.
    fn try_crossover(
        &self,
        parents: &[&MultiObjectiveTrial],
        operator: &dyn Crossover,
        categorical_op: &UniformCrossover,
        rng: &mut fastrand::Rng,
        directions: &[Direction],
    ) -> Result<Option<ParamMap>> {
        let mut child = ParamMap::new();

        if !self.categorical.is_empty() {
            self.categorical_crossover(parents, categorical_op, rng, directions, &mut child)?;
        }

        // Categorical values are copied from parents and need no check.
        let Some(transform) = &self.transform else {
            return Ok(Some(child));
        };

        let matrix = parents
            .iter()
            .map(|parent| transform.transform(&numerical_params(transform, parent)?))
            .collect::<Result<Vec<_>>>()?;
        let encoded = operator.crossover(&matrix, rng, directions, transform.bounds());
        if encoded.len() != transform.len() {
            return Err(Error::DimensionMismatch {
                expected: transform.len(),
                got: encoded.len(),
            });
        }
        if encoded.iter().any(|x| !x.is_finite()) {
            return Ok(None);
        }
        child.extend(transform.untransform(&encoded)?);

        Ok(self.search_space.contains(&child).then_some(child))
    }

    /// Uniform crossover between the first and last parent's categorical values.
    #[allow(clippy::cast_precision_loss)]
    fn categorical_crossover(
        &self,
        parents: &[&MultiObjectiveTrial],
        categorical_op: &UniformCrossover,
        rng: &mut fastrand::Rng,
        directions: &[Direction],
        child: &mut ParamMap,
    ) -> Result<()> {
        let endpoints = [parents[0], parents[parents.len() - 1]];
        let matrix = endpoints
            .iter()
            .map(|parent| {
                self.categorical
                    .iter()
                    .map(|(name, distribution)| internal_value(parent, name, distribution))
                    .collect::<Result<Vec<f64>>>()
            })
            .collect::<Result<Vec<_>>>()?;

        let bounds: Vec<(f64, f64)> = self
            .categorical
            .iter()
            .map(|(_, d)| match d {
                Distribution::Categorical(c) => (0.0, c.n_choices().saturating_sub(1) as f64),
                _ => unreachable!("numerical distributions are partitioned out"),
            })
            .collect();

        let values = categorical_op.crossover(&matrix, rng, directions, &bounds);
        for ((name, distribution), value) in self.categorical.iter().zip(values) {
            child.insert(name.clone(), distribution.to_external_repr(value));
        }
        Ok(())
    }
}

/// The parent's values for the encoded columns; other parameters are ignored.
fn numerical_params(
    transform: &SearchSpaceTransform,
    parent: &MultiObjectiveTrial,
) -> Result<ParamMap> {
    transform
        .column_names()
        .iter()
        .map(|name| {
            parent
                .params
                .get(name)
                .map(|v| (name.clone(), v.clone()))
                .ok_or_else(|| Error::MissingParameter(name.clone()))
        })
        .collect()
}

fn internal_value(
    parent: &MultiObjectiveTrial,
    name: &str,
    distribution: &Distribution,
) -> Result<f64> {
    let value = parent
        .params
        .get(name)
        .ok_or_else(|| Error::MissingParameter(name.to_owned()))?;
    distribution
        .to_internal_repr(value)
        .ok_or_else(|| Error::ParameterConflict {
            name: name.to_owned(),
            reason: format!(
                "trial {} holds a {} value for a categorical parameter",
                parent.id,
                value.kind()
            ),
        })
}
