use crate::crossovers::{Crossover, column};
use crate::error::{Error, Result};
use crate::types::Direction;

/// Smallest parent spread used to keep the spread factors finite.
const MIN_SPREAD: f64 = 1e-10;

/// Bounded simulated binary crossover (SBX).
///
/// Two offspring are generated per column with a spread distribution that
/// respects the column bounds; each child column then takes one of the two
/// offspring values with probability `uniform_crossover_prob`, otherwise
/// one of the two parent values, choosing between the pair evenly.
///
/// The distribution index `eta` defaults to 2 for single-objective and 20
/// for multi-objective searches; larger values keep children closer to
/// their parents.
///
/// Reference: Deb & Agrawal (1995), *Simulated Binary Crossover for
/// Continuous Search Space*.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SbxCrossover {
    eta: Option<f64>,
    uniform_crossover_prob: f64,
}

impl SbxCrossover {
    /// Creates an SBX crossover. `None` picks `eta` from the number of objectives.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidCrossoverParameter`] if `eta` is negative or
    /// not finite.
    pub fn new(eta: Option<f64>) -> Result<Self> {
        if let Some(eta) = eta
            && (!eta.is_finite() || eta < 0.0)
        {
            return Err(Error::InvalidCrossoverParameter {
                name: "eta",
                reason: format!("{eta} must be finite and non-negative"),
            });
        }
        Ok(Self {
            eta,
            uniform_crossover_prob: 0.5,
        })
    }

    /// Sets the probability that a column takes an offspring value rather
    /// than a parent value. Default: 0.5.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidCrossoverParameter`] if `prob` is outside `[0, 1]`.
    pub fn with_uniform_crossover_prob(mut self, prob: f64) -> Result<Self> {
        if !(0.0..=1.0).contains(&prob) {
            return Err(Error::InvalidCrossoverParameter {
                name: "uniform_crossover_prob",
                reason: format!("{prob} must be in [0.0, 1.0]"),
            });
        }
        self.uniform_crossover_prob = prob;
        Ok(self)
    }

    fn eta(&self, directions: &[Direction]) -> f64 {
        self.eta
            .unwrap_or(if directions.len() > 1 { 20.0 } else { 2.0 })
    }
}

impl Default for SbxCrossover {
    fn default() -> Self {
        Self {
            eta: None,
            uniform_crossover_prob: 0.5,
        }
    }
}

impl Crossover for SbxCrossover {
    fn n_parents(&self) -> usize {
        2
    }

    fn crossover(
        &self,
        parents: &[Vec<f64>],
        rng: &mut fastrand::Rng,
        directions: &[Direction],
        bounds: &[(f64, f64)],
    ) -> Vec<f64> {
        let eta = self.eta(directions);
        let exponent = 1.0 / (eta + 1.0);

        let us: Vec<f64> = (0..bounds.len()).map(|_| rng.f64()).collect();

        bounds
            .iter()
            .zip(us)
            .enumerate()
            .map(|(col, (&(low, high), u))| {
                let x_min = column(parents, col).fold(f64::INFINITY, f64::min);
                let x_max = column(parents, col).fold(f64::NEG_INFINITY, f64::max);
                let spread = (x_max - x_min).max(MIN_SPREAD);

                let beta_q = |beta: f64| {
                    let alpha = 2.0 - beta.powf(-(eta + 1.0));
                    if u <= 1.0 / alpha {
                        (u * alpha).powf(exponent)
                    } else {
                        (1.0 / (2.0 - u * alpha)).powf(exponent)
                    }
                };
                let beta_low = 1.0 + 2.0 * (x_min - low) / spread;
                let beta_high = 1.0 + 2.0 * (high - x_max) / spread;

                let c1 = 0.5 * ((x_min + x_max) - beta_q(beta_low) * spread);
                let c2 = 0.5 * ((x_min + x_max) + beta_q(beta_high) * spread);

                let take_offspring = rng.f64() < self.uniform_crossover_prob;
                let take_first = rng.f64() < 0.5;
                match (take_offspring, take_first) {
                    (true, true) => c1,
                    (true, false) => c2,
                    (false, true) => parents[0][col],
                    (false, false) => parents[1][col],
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
    fn test_children_stay_in_bounds_for_interior_parents() {
        let op = SbxCrossover::default();
        let parents = vec![vec![0.2, 0.5, 0.9], vec![0.4, 0.6, 0.1]];
        let bounds = unit_bounds(3);
        for seed in 0..200 {
            let mut rng = fastrand::Rng::with_seed(seed);
            let child = op.crossover(&parents, &mut rng, &[Direction::Minimize], &bounds);
            for (v, (lo, hi)) in child.iter().zip(&bounds) {
                assert!(*lo <= *v && *v <= *hi, "seed {seed}: {v} out of bounds");
            }
        }
    }

    #[test]
    fn test_zero_offspring_prob_returns_parent_genes() {
        let op = SbxCrossover::new(Some(15.0))
            .unwrap()
            .with_uniform_crossover_prob(0.0)
            .unwrap();
        let parents = vec![vec![0.25, 0.5], vec![0.75, 0.0]];
        let mut rng = fastrand::Rng::with_seed(5);
        let child = op.crossover(&parents, &mut rng, &[Direction::Minimize], &unit_bounds(2));
        for (col, v) in child.iter().enumerate() {
            assert!(
                (*v - parents[0][col]).abs() < 1e-12 || (*v - parents[1][col]).abs() < 1e-12
            );
        }
    }

    #[test]
    fn test_eta_defaults_follow_objective_count() {
        let op = SbxCrossover::default();
        assert!((op.eta(&[Direction::Minimize]) - 2.0).abs() < f64::EPSILON);
        assert!((op.eta(&[Direction::Minimize, Direction::Maximize]) - 20.0).abs() < f64::EPSILON);
        let fixed = SbxCrossover::new(Some(7.0)).unwrap();
        assert!((fixed.eta(&[Direction::Minimize]) - 7.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_rejects_invalid_parameters() {
        assert!(SbxCrossover::new(Some(-1.0)).is_err());
        assert!(SbxCrossover::default().with_uniform_crossover_prob(2.0).is_err());
    }
}
