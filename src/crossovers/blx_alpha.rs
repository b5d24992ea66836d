use crate::crossovers::{Crossover, column};
use crate::error::{Error, Result};
use crate::rng_util;
use crate::types::Direction;

/// Blend crossover (BLX-alpha).
///
/// Per column the child is drawn uniformly from the parents' range
/// `[min, max]` extended by `alpha * (max - min)` on both sides.
///
/// Reference: Eshelman & Schaffer (1993), *Real-Coded Genetic Algorithms
/// and Interval-Schemata*.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BlxAlphaCrossover {
    alpha: f64,
}

impl BlxAlphaCrossover {
    /// Creates a BLX-alpha crossover.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidCrossoverParameter`] if `alpha` is negative or not finite.
    pub fn new(alpha: f64) -> Result<Self> {
        if !alpha.is_finite() || alpha < 0.0 {
            return Err(Error::InvalidCrossoverParameter {
                name: "alpha",
                reason: format!("{alpha} must be finite and non-negative"),
            });
        }
        Ok(Self { alpha })
    }
}

impl Default for BlxAlphaCrossover {
    fn default() -> Self {
        Self { alpha: 0.5 }
    }
}

impl Crossover for BlxAlphaCrossover {
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
        (0..bounds.len())
            .map(|col| {
                let lo = column(parents, col).fold(f64::INFINITY, f64::min);
                let hi = column(parents, col).fold(f64::NEG_INFINITY, f64::max);
                let spread = self.alpha * (hi - lo);
                rng_util::f64_range(rng, lo - spread, hi + spread)
            })
            .collect()
    }
}
