//! NSGA-II offspring sampler built on the crossover orchestrator.
//!
//! [`Nsga2CrossoverSampler`] bundles everything a generation step needs to
//! breed one child: a seeded generator, a numerical [`Crossover`] operator,
//! the categorical swapping probability, and an optional attempt budget.
//! It filters the population down to completed trials, optionally keeps
//! only the elite (fronts first, then least crowded), and switches to
//! constrained domination as soon as any trial carries constraint values.
//!
//! # Examples
//!
//! ```
//! use nsga_crossover::Direction;
//! use nsga_crossover::crossovers::SbxCrossover;
//! use nsga_crossover::distribution::{FloatDistribution, IntDistribution};
//! use nsga_crossover::param::{ParamMap, ParamValue};
//! use nsga_crossover::sampler::Nsga2CrossoverSampler;
//! use nsga_crossover::search_space::SearchSpace;
//! use nsga_crossover::trial::MultiObjectiveTrial;
//!
//! let space = SearchSpace::new()
//!     .with("x", FloatDistribution::new(-1.0, 1.0))
//!     .with("n", IntDistribution::new(0, 10));
//!
//! let population: Vec<_> = (0..6_i64)
//!     .map(|i| {
//!         let mut params = ParamMap::new();
//!         params.insert("x".into(), ParamValue::Float(i as f64 / 5.0 - 0.5));
//!         params.insert("n".into(), ParamValue::Int(i));
//!         MultiObjectiveTrial::new(i as u64, params, vec![i as f64, 5.0 - i as f64])
//!     })
//!     .collect();
//!
//! let sampler = Nsga2CrossoverSampler::builder()
//!     .crossover(SbxCrossover::default())
//!     .seed(7)
//!     .build()
//!     .unwrap();
//! let child = sampler
//!     .sample_child(&population, &space, &[Direction::Minimize, Direction::Minimize])
//!     .unwrap();
//! assert!(space.contains(&child));
//! ```

use parking_lot::Mutex;

use crate::crossover::{Offspring, crossover_with_limit};
use crate::crossovers::{Crossover, UniformCrossover};
use crate::error::{Error, Result};
use crate::param::ParamMap;
use crate::pareto::{self, constrained_trial_dominates, trial_dominates};
use crate::search_space::SearchSpace;
use crate::trial::MultiObjectiveTrial;
use crate::types::Direction;

type Dominates = fn(&MultiObjectiveTrial, &MultiObjectiveTrial, &[Direction]) -> bool;

/// Breeds children from an evaluated population with NSGA-II selection.
pub struct Nsga2CrossoverSampler {
    rng: Mutex<fastrand::Rng>,
    operator: Box<dyn Crossover>,
    swapping_prob: f64,
    max_attempts: Option<usize>,
    elite_size: Option<usize>,
}

impl Nsga2CrossoverSampler {
    /// Creates a sampler with uniform crossover and a random seed.
    #[must_use]
    pub fn new() -> Self {
        Self::from_parts(fastrand::Rng::new(), Box::new(UniformCrossover::default()))
    }

    /// Creates a sampler with uniform crossover and a fixed seed.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self::from_parts(
            fastrand::Rng::with_seed(seed),
            Box::new(UniformCrossover::default()),
        )
    }

    /// Creates a builder for configuring an `Nsga2CrossoverSampler`.
    #[must_use]
    pub fn builder() -> Nsga2CrossoverSamplerBuilder {
        Nsga2CrossoverSamplerBuilder::default()
    }

    fn from_parts(rng: fastrand::Rng, operator: Box<dyn Crossover>) -> Self {
        Self {
            rng: Mutex::new(rng),
            operator,
            swapping_prob: 0.5,
            max_attempts: None,
            elite_size: None,
        }
    }

    /// The numerical crossover operator.
    #[must_use]
    pub fn operator(&self) -> &dyn Crossover {
        self.operator.as_ref()
    }

    /// Breeds one child parameter map that lies inside `search_space`.
    ///
    /// Only [`TrialState::Complete`](crate::TrialState::Complete) trials
    /// take part.
    ///
    /// # Errors
    ///
    /// - Any [`SearchSpace::validate`] error.
    /// - [`Error::NotEnoughParents`] if fewer completed (or elite) trials
    ///   exist than the operator needs.
    /// - [`Error::RetriesExhausted`] if an attempt budget is configured and
    ///   no feasible child was found within it.
    /// - Parameter errors from [`crossover`](crate::crossover::crossover).
    pub fn sample_child(
        &self,
        population: &[MultiObjectiveTrial],
        search_space: &SearchSpace,
        directions: &[Direction],
    ) -> Result<ParamMap> {
        self.sample_offspring(population, search_space, directions)
            .map(|offspring| offspring.params)
    }

    /// Like [`sample_child`](Self::sample_child), but also reports how many
    /// attempts the accepted child took.
    ///
    /// # Errors
    ///
    /// See [`sample_child`](Self::sample_child).
    pub fn sample_offspring(
        &self,
        population: &[MultiObjectiveTrial],
        search_space: &SearchSpace,
        directions: &[Direction],
    ) -> Result<Offspring> {
        search_space.validate()?;

        let complete: Vec<&MultiObjectiveTrial> =
            population.iter().filter(|t| t.is_complete()).collect();
        let dominates: Dominates = if complete.iter().any(|t| !t.constraints.is_empty()) {
            constrained_trial_dominates
        } else {
            trial_dominates
        };

        let parents = match self.elite_size {
            Some(size) if size < complete.len() => {
                let elite = pareto::select_elite(&complete, size, directions, dominates);
                trace_debug!(elite = elite.len(), population = complete.len(), "selected elite");
                elite.into_iter().map(|i| complete[i]).collect()
            }
            _ => complete,
        };

        let mut rng = self.rng.lock();
        crossover_with_limit(
            self.operator.as_ref(),
            directions,
            &parents,
            search_space,
            &mut rng,
            self.swapping_prob,
            dominates,
            self.max_attempts,
        )
    }
}

impl Default for Nsga2CrossoverSampler {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for [`Nsga2CrossoverSampler`].
#[derive(Default)]
pub struct Nsga2CrossoverSamplerBuilder {
    operator: Option<Box<dyn Crossover>>,
    swapping_prob: Option<f64>,
    max_attempts: Option<usize>,
    elite_size: Option<usize>,
    seed: Option<u64>,
}

impl Nsga2CrossoverSamplerBuilder {
    /// Sets the numerical crossover operator. Default: [`UniformCrossover`].
    #[must_use]
    pub fn crossover(mut self, operator: impl Crossover + 'static) -> Self {
        self.operator = Some(Box::new(operator));
        self
    }

    /// Sets the probability of taking a categorical value from the second
    /// parent. Default: 0.5.
    #[must_use]
    pub fn swapping_prob(mut self, prob: f64) -> Self {
        self.swapping_prob = Some(prob);
        self
    }

    /// Caps the number of children generated per call. Default: unbounded.
    #[must_use]
    pub fn max_attempts(mut self, attempts: usize) -> Self {
        self.max_attempts = Some(attempts);
        self
    }

    /// Restricts parent selection to the best `size` trials. Default: the
    /// whole completed population.
    #[must_use]
    pub fn elite_size(mut self, size: usize) -> Self {
        self.elite_size = Some(size);
        self
    }

    /// Sets the random seed for reproducibility.
    #[must_use]
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Builds the configured [`Nsga2CrossoverSampler`].
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidSwappingProb`] if the swapping probability is
    ///   outside `[0, 1]`.
    /// - [`Error::InvalidCrossoverParameter`] if the elite size is smaller
    ///   than the operator's parent count.
    pub fn build(self) -> Result<Nsga2CrossoverSampler> {
        let swapping_prob =
            UniformCrossover::new(self.swapping_prob.unwrap_or(0.5))?.swapping_prob();
        let operator: Box<dyn Crossover> = match self.operator {
            Some(operator) => operator,
            None => Box::new(UniformCrossover::default()),
        };
        if let Some(size) = self.elite_size
            && size < operator.n_parents()
        {
            return Err(Error::InvalidCrossoverParameter {
                name: "elite_size",
                reason: format!(
                    "{size} is smaller than the {} parents the operator needs",
                    operator.n_parents()
                ),
            });
        }
        let rng = self.seed.map_or_else(fastrand::Rng::new, fastrand::Rng::with_seed);
        Ok(Nsga2CrossoverSampler {
            rng: Mutex::new(rng),
            operator,
            swapping_prob,
            max_attempts: self.max_attempts,
            elite_size: self.elite_size,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crossovers::{SpxCrossover, UndxCrossover};
    use crate::distribution::{CategoricalDistribution, FloatDistribution};
    use crate::param::ParamValue;
    use crate::types::TrialState;

    const DIRS: [Direction; 2] = [Direction::Minimize, Direction::Minimize];

    fn space() -> SearchSpace {
        SearchSpace::new()
            .with("x", FloatDistribution::new(0.0, 10.0))
            .with("c", CategoricalDistribution::new(["a", "b", "c", "d", "e", "f"]))
    }

    #[allow(clippy::cast_precision_loss)]
    fn trial(id: u64, values: [f64; 2]) -> MultiObjectiveTrial {
        let mut params = ParamMap::new();
        params.insert("x".into(), ParamValue::Float(id as f64));
        params.insert("c".into(), ParamValue::Categorical(id as usize));
        MultiObjectiveTrial::new(id, params, values.to_vec())
    }

    #[test]
    fn test_seeded_samplers_agree() {
        let population: Vec<_> = (0..6).map(|i| trial(i, [i as f64, 6.0 - i as f64])).collect();
        let a = Nsga2CrossoverSampler::with_seed(11);
        let b = Nsga2CrossoverSampler::with_seed(11);
        for _ in 0..10 {
            assert_eq!(
                a.sample_child(&population, &space(), &DIRS).unwrap(),
                b.sample_child(&population, &space(), &DIRS).unwrap()
            );
        }
    }

    #[test]
    fn test_elite_restricts_parents() {
        // Trials 0 and 1 form the first front; 2..6 are dominated.
        let population = vec![
            trial(0, [0.0, 1.0]),
            trial(1, [1.0, 0.0]),
            trial(2, [2.0, 2.0]),
            trial(3, [3.0, 3.0]),
            trial(4, [4.0, 4.0]),
            trial(5, [5.0, 5.0]),
        ];
        let sampler = Nsga2CrossoverSampler::builder()
            .elite_size(2)
            .seed(3)
            .build()
            .unwrap();
        for _ in 0..20 {
            let child = sampler.sample_child(&population, &space(), &DIRS).unwrap();
            assert!(matches!(child["c"], ParamValue::Categorical(0 | 1)), "{child:?}");
            assert!(
                matches!(child["x"], ParamValue::Float(x) if x == 0.0 || x == 1.0),
                "{child:?}"
            );
        }
    }

    #[test]
    fn test_incomplete_trials_are_ignored() {
        let population = vec![
            trial(0, [0.0, 0.0]),
            trial(1, [1.0, 1.0]).with_state(TrialState::Running),
            trial(2, [2.0, 2.0]).with_state(TrialState::Failed),
        ];
        let sampler = Nsga2CrossoverSampler::with_seed(0);
        let err = sampler.sample_child(&population, &space(), &DIRS).unwrap_err();
        assert!(matches!(
            err,
            Error::NotEnoughParents {
                requested: 2,
                available: 1
            }
        ));
    }

    #[test]
    fn test_constraints_switch_domination() {
        // Two feasible trials at the top of the sort, four infeasible ones that
        // would otherwise dominate them.
        let population = vec![
            trial(0, [9.0, 9.0]).with_constraints(vec![-1.0]),
            trial(1, [8.0, 9.5]).with_constraints(vec![0.0]),
            trial(2, [0.0, 0.0]).with_constraints(vec![1.0]),
            trial(3, [0.1, 0.1]).with_constraints(vec![2.0]),
            trial(4, [0.2, 0.2]).with_constraints(vec![3.0]),
            trial(5, [0.3, 0.3]).with_constraints(vec![4.0]),
        ];
        let sampler = Nsga2CrossoverSampler::builder()
            .elite_size(2)
            .seed(5)
            .build()
            .unwrap();
        for _ in 0..20 {
            let child = sampler.sample_child(&population, &space(), &DIRS).unwrap();
            assert!(matches!(child["c"], ParamValue::Categorical(0 | 1)), "{child:?}");
        }
    }

    #[test]
    fn test_three_parent_operators() {
        let population: Vec<_> = (0..6).map(|i| trial(i, [i as f64, 6.0 - i as f64])).collect();
        for sampler in [
            Nsga2CrossoverSampler::builder()
                .crossover(SpxCrossover::default())
                .seed(1)
                .build()
                .unwrap(),
            Nsga2CrossoverSampler::builder()
                .crossover(UndxCrossover::default())
                .seed(1)
                .build()
                .unwrap(),
        ] {
            assert_eq!(sampler.operator().n_parents(), 3);
            for _ in 0..10 {
                let child = sampler.sample_child(&population, &space(), &DIRS).unwrap();
                assert!(space().contains(&child));
            }
        }
    }

    #[test]
    fn test_sample_offspring_reports_attempts() {
        let population: Vec<_> = (0..4).map(|i| trial(i, [i as f64, 4.0 - i as f64])).collect();
        let sampler = Nsga2CrossoverSampler::builder()
            .max_attempts(50)
            .seed(2)
            .build()
            .unwrap();
        let offspring = sampler.sample_offspring(&population, &space(), &DIRS).unwrap();
        // Uniform crossover copies parent values, so the first child is feasible.
        assert_eq!(offspring.attempts, 1);
    }

    #[test]
    fn test_builder_validation() {
        assert!(matches!(
            Nsga2CrossoverSampler::builder().swapping_prob(-0.1).build(),
            Err(Error::InvalidSwappingProb(_))
        ));
        assert!(matches!(
            Nsga2CrossoverSampler::builder()
                .crossover(SpxCrossover::default())
                .elite_size(2)
                .build(),
            Err(Error::InvalidCrossoverParameter {
                name: "elite_size",
                ..
            })
        ));
    }

    #[test]
    fn test_invalid_search_space_is_rejected() {
        let population: Vec<_> = (0..4).map(|i| trial(i, [0.0, 0.0])).collect();
        let bad = SearchSpace::new().with("x", FloatDistribution::new(1.0, 0.0));
        let sampler = Nsga2CrossoverSampler::with_seed(0);
        assert!(sampler.sample_child(&population, &bad, &DIRS).is_err());
    }
}
