//! Domination-aware binary tournament selection of distinct parents.

use core::borrow::Borrow;

use crate::error::{Error, Result};
use crate::trial::MultiObjectiveTrial;
use crate::types::Direction;

/// Selects `n_parents` pairwise-distinct parents by repeated binary tournament.
///
/// Each tournament draws two candidates uniformly *with replacement* from
/// the trials not yet selected. The first draw wins only if it dominates
/// the second; otherwise the second draw wins. The winner is removed from
/// the pool, so no trial is returned twice. Distinctness is by position in
/// `population`, not by value.
///
/// `population` may hold owned trials or references to them.
///
/// # Errors
///
/// Returns [`Error::NotEnoughParents`] if `n_parents` exceeds the
/// population size.
///
/// # Examples
///
/// ```
/// use nsga_crossover::Direction;
/// use nsga_crossover::pareto::trial_dominates;
/// use nsga_crossover::param::ParamMap;
/// use nsga_crossover::selection::select_parents;
/// use nsga_crossover::trial::MultiObjectiveTrial;
///
/// let population: Vec<_> = (0..4)
///     .map(|i| MultiObjectiveTrial::new(i, ParamMap::new(), vec![i as f64]))
///     .collect();
/// let mut rng = fastrand::Rng::with_seed(7);
/// let parents = select_parents(
///     &population,
///     2,
///     &[Direction::Minimize],
///     &mut rng,
///     trial_dominates,
/// )
/// .unwrap();
/// assert_eq!(parents.len(), 2);
/// assert_ne!(parents[0].id, parents[1].id);
/// ```
pub fn select_parents<'a, T, D>(
    population: &'a [T],
    n_parents: usize,
    directions: &[Direction],
    rng: &mut fastrand::Rng,
    dominates: D,
) -> Result<Vec<&'a MultiObjectiveTrial>>
where
    T: Borrow<MultiObjectiveTrial>,
    D: Fn(&MultiObjectiveTrial, &MultiObjectiveTrial, &[Direction]) -> bool,
{
    if n_parents > population.len() {
        return Err(Error::NotEnoughParents {
            requested: n_parents,
            available: population.len(),
        });
    }

    let mut pool: Vec<usize> = (0..population.len()).collect();
    let mut parents: Vec<&'a MultiObjectiveTrial> = Vec::with_capacity(n_parents);
    for _ in 0..n_parents {
        let slot = binary_tournament(population, &pool, directions, rng, &dominates);
        parents.push(population[pool.remove(slot)].borrow());
    }
    Ok(parents)
}

/// Runs one tournament over `pool` and returns the winner's slot in `pool`.
fn binary_tournament<T, D>(
    population: &[T],
    pool: &[usize],
    directions: &[Direction],
    rng: &mut fastrand::Rng,
    dominates: &D,
) -> usize
where
    T: Borrow<MultiObjectiveTrial>,
    D: Fn(&MultiObjectiveTrial, &MultiObjectiveTrial, &[Direction]) -> bool,
{
    let first = rng.usize(0..pool.len());
    let second = rng.usize(0..pool.len());

    // TODO: break non-dominated ties by crowding distance instead of favouring the later draw.
    if dominates(
        population[pool[first]].borrow(),
        population[pool[second]].borrow(),
        directions,
    ) {
        first
    } else {
        second
    }
}
