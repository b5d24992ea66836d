use crate::crossovers::{Crossover, axpy};
use crate::error::{Error, Result};
use crate::types::Direction;

/// Simplex crossover (SPX) over three parents.
///
/// The parents span a simplex that is expanded around its centroid by
/// `epsilon` (default `sqrt(n + 2)` for `n` columns); the child is drawn
/// from the expanded simplex.
///
/// Reference: Tsutsui, Yamamura & Higuchi (1999), *Multi-parent
/// Recombination with Simplex Crossover in Real Coded Genetic Algorithms*.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SpxCrossover {
    epsilon: Option<f64>,
}

impl SpxCrossover {
    /// Creates an SPX crossover. `None` uses `sqrt(n + 2)`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidCrossoverParameter`] if `epsilon` is not
    /// finite and positive.
    pub fn new(epsilon: Option<f64>) -> Result<Self> {
        if let Some(eps) = epsilon
            && (!eps.is_finite() || eps <= 0.0)
        {
            return Err(Error::InvalidCrossoverParameter {
                name: "epsilon",
                reason: format!("{eps} must be finite and positive"),
            });
        }
        Ok(Self { epsilon })
    }
}

impl Crossover for SpxCrossover {
    fn n_parents(&self) -> usize {
        3
    }

    #[allow(clippy::cast_precision_loss)]
    fn crossover(
        &self,
        parents: &[Vec<f64>],
        rng: &mut fastrand::Rng,
        _directions: &[Direction],
        bounds: &[(f64, f64)],
    ) -> Vec<f64> {
        let n = bounds.len();
        let n_parents = parents.len();
        let epsilon = self.epsilon.unwrap_or_else(|| ((n + 2) as f64).sqrt());

        let centroid: Vec<f64> = (0..n)
            .map(|col| parents.iter().map(|p| p[col]).sum::<f64>() / n_parents as f64)
            .collect();

        // Vertices of the expanded simplex.
        let vertices: Vec<Vec<f64>> = parents
            .iter()
            .map(|p| {
                let offset: Vec<f64> = p.iter().zip(&centroid).map(|(x, g)| x - g).collect();
                axpy(&centroid, epsilon, &offset)
            })
            .collect();

        // r_k ~ Beta(k + 1, 1), sampled as U^(1 / (k + 1)).
        let rs: Vec<f64> = (0..n_parents - 1)
            .map(|k| rng.f64().powf(1.0 / (k + 1) as f64))
            .collect();

        let mut c = vec![0.0; n];
        for k in 1..n_parents {
            c = (0..n)
                .map(|col| rs[k - 1] * (vertices[k - 1][col] - vertices[k][col] + c[col]))
                .collect();
        }

        axpy(&vertices[n_parents - 1], 1.0, &c)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crossovers::test_util::unit_bounds;

    #[test]
    fn test_identical_parents_reproduce_parent() {
        let op = SpxCrossover::default();
        let parents = vec![vec![0.3, 0.7]; 3];
        let mut rng = fastrand::Rng::with_seed(9);
        let child = op.crossover(&parents, &mut rng, &[Direction::Minimize], &unit_bounds(2));
        assert!((child[0] - 0.3).abs() < 1e-12);
        assert!((child[1] - 0.7).abs() < 1e-12);
    }

    #[test]
    fn test_child_in_expanded_simplex_hull() {
        // 1-D: the expanded simplex of {0, 0.5, 1} around 0.5 with epsilon 1
        // is the parents' own range.
        let op = SpxCrossover::new(Some(1.0)).unwrap();
        let parents = vec![vec![0.0], vec![0.5], vec![1.0]];
        for seed in 0..100 {
            let mut rng = fastrand::Rng::with_seed(seed);
            let child = op.crossover(&parents, &mut rng, &[], &unit_bounds(1));
            assert!((-1e-12..=1.0 + 1e-12).contains(&child[0]), "{}", child[0]);
        }
    }

    #[test]
    fn test_requires_three_parents() {
        assert_eq!(SpxCrossover::default().n_parents(), 3);
        assert!(SpxCrossover::new(Some(0.0)).is_err());
    }
}
