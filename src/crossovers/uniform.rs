use crate::crossovers::Crossover;
use crate::error::{Error, Result};
use crate::types::Direction;

/// Uniform crossover: each column independently comes from one of two parents.
///
/// For every column a uniform number in `[0, 1)` is drawn; below
/// `swapping_prob` the second parent's value is taken, otherwise the
/// first parent's.
///
/// # Examples
///
/// ```
/// use nsga_crossover::Direction;
/// use nsga_crossover::crossovers::{Crossover, UniformCrossover};
///
/// let op = UniformCrossover::new(1.0).unwrap();
/// let mut rng = fastrand::Rng::with_seed(0);
/// let parents = vec![vec![0.0, 0.0], vec![1.0, 1.0]];
/// let child = op.crossover(&parents, &mut rng, &[Direction::Minimize], &[(0.0, 1.0); 2]);
/// assert_eq!(child, vec![1.0, 1.0]);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct UniformCrossover {
    swapping_prob: f64,
}

impl UniformCrossover {
    /// Creates a uniform crossover with the given swapping probability.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidSwappingProb`] if the probability is outside `[0, 1]`.
    pub fn new(swapping_prob: f64) -> Result<Self> {
        if !(0.0..=1.0).contains(&swapping_prob) {
            return Err(Error::InvalidSwappingProb(swapping_prob));
        }
        Ok(Self { swapping_prob })
    }

    /// The probability of taking the second parent's value for a column.
    #[must_use]
    pub fn swapping_prob(&self) -> f64 {
        self.swapping_prob
    }
}

impl Default for UniformCrossover {
    fn default() -> Self {
        Self { swapping_prob: 0.5 }
    }
}

impl Crossover for UniformCrossover {
    fn n_parents(&self) -> usize {
        2
    }

    fn crossover(
        &self,
        parents: &[Vec<f64>],
        rng: &mut fastrand::Rng,
        _directions: &[Direction],
        bounds: &[(f64, f64)],
    ) -> Vec<f64> {
        debug_assert_eq!(parents.len(), 2);
        let (first, second) = (&parents[0], &parents[1]);
        (0..bounds.len())
            .map(|col| {
                if rng.f64() < self.swapping_prob {
                    second[col]
                } else {
                    first[col]
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crossovers::test_util::unit_bounds;

    #[test]
    fn test_probability_zero_keeps_first_parent() {
        let op = UniformCrossover::new(0.0).unwrap();
        let mut rng = fastrand::Rng::with_seed(3);
        let parents = vec![vec![0.1, 0.2, 0.3], vec![0.9, 0.8, 0.7]];
        let child = op.crossover(&parents, &mut rng, &[Direction::Minimize], &unit_bounds(3));
        assert_eq!(child, parents[0]);
    }

    #[test]
    #[allow(clippy::float_cmp)]
    fn test_children_mix_parent_columns() {
        let op = UniformCrossover::default();
        let parents = vec![vec![0.0; 8], vec![1.0; 8]];
        let mut seen_first = false;
        let mut seen_second = false;
        for seed in 0..20 {
            let mut rng = fastrand::Rng::with_seed(seed);
            let child = op.crossover(&parents, &mut rng, &[Direction::Minimize], &unit_bounds(8));
            for v in child {
                assert!(v == 0.0 || v == 1.0);
                seen_first |= v == 0.0;
                seen_second |= v == 1.0;
            }
        }
        assert!(seen_first && seen_second);
    }

    #[test]
    fn test_consumes_one_draw_per_column() {
        let op = UniformCrossover::default();
        let mut a = fastrand::Rng::with_seed(11);
        let mut b = fastrand::Rng::with_seed(11);
        let _ = op.crossover(&[vec![0.0; 4], vec![1.0; 4]], &mut a, &[], &unit_bounds(4));
        for _ in 0..4 {
            let _ = b.f64();
        }
        assert_eq!(a.u64(..), b.u64(..));
    }

    #[test]
    fn test_rejects_invalid_probability() {
        assert!(UniformCrossover::new(-0.1).is_err());
        assert!(UniformCrossover::new(1.5).is_err());
        assert!(UniformCrossover::new(f64::NAN).is_err());
    }
}
