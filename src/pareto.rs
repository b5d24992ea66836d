//! Domination predicates and Pareto ranking.
//!
//! A trial **dominates** another if it is at least as good in every
//! objective and strictly better in at least one, under the given
//! directions. [`trial_dominates`] is the default predicate handed to
//! parent selection; [`constrained_trial_dominates`] additionally ranks
//! feasible trials above infeasible ones.
//!
//! [`non_dominated_sort`], [`crowding_distance`], and [`select_elite`]
//! are what an outer NSGA-II loop uses to shrink its history to the
//! parent population before breeding.
//!
//! # Example
//!
//! ```
//! use nsga_crossover::Direction;
//! use nsga_crossover::pareto::dominates;
//!
//! let dirs = [Direction::Minimize, Direction::Maximize];
//! assert!(dominates(&[1.0, 5.0], &[2.0, 4.0], &dirs));
//! assert!(!dominates(&[1.0, 3.0], &[2.0, 4.0], &dirs));
//! ```

use core::borrow::Borrow;

use crate::trial::MultiObjectiveTrial;
use crate::types::Direction;

/// Returns `true` if objective vector `a` Pareto-dominates `b`.
#[must_use]
pub fn dominates(a: &[f64], b: &[f64], directions: &[Direction]) -> bool {
    debug_assert_eq!(a.len(), b.len());
    debug_assert_eq!(a.len(), directions.len());

    let mut strictly_better = false;
    for ((&av, &bv), dir) in a.iter().zip(b).zip(directions) {
        let (better, worse) = match dir {
            Direction::Minimize => (av < bv, av > bv),
            Direction::Maximize => (av > bv, av < bv),
        };
        if worse {
            return false;
        }
        strictly_better |= better;
    }
    strictly_better
}

/// Returns `true` if trial `a` Pareto-dominates trial `b` on their objective values.
#[must_use]
pub fn trial_dominates(
    a: &MultiObjectiveTrial,
    b: &MultiObjectiveTrial,
    directions: &[Direction],
) -> bool {
    dominates(&a.values, &b.values, directions)
}

/// Constrained domination: feasible beats infeasible, among infeasible
/// trials the lower total violation wins, among feasible trials Pareto
/// domination decides.
#[must_use]
pub fn constrained_trial_dominates(
    a: &MultiObjectiveTrial,
    b: &MultiObjectiveTrial,
    directions: &[Direction],
) -> bool {
    match (a.is_feasible(), b.is_feasible()) {
        (true, false) => true,
        (false, true) => false,
        (false, false) => total_violation(&a.constraints) < total_violation(&b.constraints),
        (true, true) => dominates(&a.values, &b.values, directions),
    }
}

fn total_violation(constraints: &[f64]) -> f64 {
    constraints.iter().map(|c| c.max(0.0)).sum()
}

/// Fast non-dominated sorting (Deb et al., 2002) under any domination predicate.
///
/// Returns fronts of indices into `trials`; `fronts[0]` is the Pareto front.
///
/// Complexity: O(M * N^2) where M = objectives, N = trials.
pub fn non_dominated_sort<T, D>(
    trials: &[T],
    directions: &[Direction],
    dominates: D,
) -> Vec<Vec<usize>>
where
    T: Borrow<MultiObjectiveTrial>,
    D: Fn(&MultiObjectiveTrial, &MultiObjectiveTrial, &[Direction]) -> bool,
{
    let trials: Vec<&MultiObjectiveTrial> = trials.iter().map(Borrow::borrow).collect();
    let n = trials.len();

    // S_p: indices dominated by p, n_p: how many dominate p
    let mut dominated_by: Vec<Vec<usize>> = vec![Vec::new(); n];
    let mut domination_count: Vec<usize> = vec![0; n];

    for i in 0..n {
        for j in (i + 1)..n {
            if dominates(trials[i], trials[j], directions) {
                dominated_by[i].push(j);
                domination_count[j] += 1;
            } else if dominates(trials[j], trials[i], directions) {
                dominated_by[j].push(i);
                domination_count[i] += 1;
            }
        }
    }

    let mut fronts: Vec<Vec<usize>> = Vec::new();
    let mut current: Vec<usize> = (0..n).filter(|&i| domination_count[i] == 0).collect();

    while !current.is_empty() {
        let mut next: Vec<usize> = Vec::new();
        for &p in &current {
            for &q in &dominated_by[p] {
                domination_count[q] -= 1;
                if domination_count[q] == 0 {
                    next.push(q);
                }
            }
        }
        fronts.push(current);
        current = next;
    }

    fronts
}

/// Crowding distance of each member of one front.
///
/// `front` holds indices into `trials`. Boundary members get
/// `f64::INFINITY`. The result is in the same order as `front`.
#[must_use]
pub fn crowding_distance<T>(front: &[usize], trials: &[T]) -> Vec<f64>
where
    T: Borrow<MultiObjectiveTrial>,
{
    let n = front.len();
    if n <= 2 {
        return vec![f64::INFINITY; n];
    }

    let members: Vec<&MultiObjectiveTrial> =
        front.iter().map(|&i| Borrow::borrow(&trials[i])).collect();
    let n_objectives = members[0].values.len();
    let mut distances = vec![0.0_f64; n];
    let value = |pos: usize, obj: usize| members[pos].values[obj];

    for obj in 0..n_objectives {
        let mut sorted: Vec<usize> = (0..n).collect();
        sorted.sort_by(|&a, &b| value(a, obj).total_cmp(&value(b, obj)));

        distances[sorted[0]] = f64::INFINITY;
        distances[sorted[n - 1]] = f64::INFINITY;

        let range = value(sorted[n - 1], obj) - value(sorted[0], obj);
        if range > 0.0 {
            for w in sorted.windows(3) {
                distances[w[1]] += (value(w[2], obj) - value(w[0], obj)) / range;
            }
        }
    }

    distances
}

/// Selects the indices of the best `size` trials: whole fronts first, then
/// the least crowded members of the front that does not fit entirely.
///
/// Returns every index when `size >= trials.len()`.
pub fn select_elite<T, D>(
    trials: &[T],
    size: usize,
    directions: &[Direction],
    dominates: D,
) -> Vec<usize>
where
    T: Borrow<MultiObjectiveTrial>,
    D: Fn(&MultiObjectiveTrial, &MultiObjectiveTrial, &[Direction]) -> bool,
{
    let mut elite = Vec::with_capacity(size.min(trials.len()));
    for front in non_dominated_sort(trials, directions, dominates) {
        let remaining = size - elite.len();
        if front.len() <= remaining {
            elite.extend_from_slice(&front);
        } else {
            let distances = crowding_distance(&front, trials);
            let mut order: Vec<usize> = (0..front.len()).collect();
            order.sort_by(|&a, &b| distances[b].total_cmp(&distances[a]));
            elite.extend(order.into_iter().take(remaining).map(|pos| front[pos]));
        }
        if elite.len() == size {
            break;
        }
    }
    elite
}
