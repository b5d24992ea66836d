use crate::crossovers::{Crossover, axpy, dot, norm};
use crate::error::{Error, Result};
use crate::rng_util;
use crate::types::Direction;

/// Unimodal normal distribution crossover (UNDX) over three parents.
///
/// The first two parents define the primary search line; the child is
/// drawn from a normal distribution centred on their midpoint, spread
/// along the line with `sigma_xi` and orthogonally to it with `sigma_eta`
/// scaled by the third parent's distance from the line.
///
/// Reference: Kita, Ono & Kobayashi (1999), *Multi-parental extension of
/// the unimodal normal distribution crossover for real-coded genetic
/// algorithms*.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct UndxCrossover {
    sigma_xi: f64,
    sigma_eta: Option<f64>,
}

impl UndxCrossover {
    /// Creates a UNDX crossover. `sigma_eta = None` uses `0.35 / sqrt(n)`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidCrossoverParameter`] if a deviation is
    /// negative or not finite.
    pub fn new(sigma_xi: f64, sigma_eta: Option<f64>) -> Result<Self> {
        for (name, value) in [("sigma_xi", Some(sigma_xi)), ("sigma_eta", sigma_eta)] {
            if let Some(v) = value
                && (!v.is_finite() || v < 0.0)
            {
                return Err(Error::InvalidCrossoverParameter {
                    name,
                    reason: format!("{v} must be finite and non-negative"),
                });
            }
        }
        Ok(Self {
            sigma_xi,
            sigma_eta,
        })
    }
}

impl Default for UndxCrossover {
    fn default() -> Self {
        Self {
            sigma_xi: 0.5,
            sigma_eta: None,
        }
    }
}

impl Crossover for UndxCrossover {
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
        let (x1, x2, x3) = (&parents[0], &parents[1], &parents[2]);
        let sigma_eta = self
            .sigma_eta
            .unwrap_or_else(|| 0.35 / (n as f64).sqrt());

        let midpoint: Vec<f64> = x1.iter().zip(x2).map(|(a, b)| 0.5 * (a + b)).collect();
        let d: Vec<f64> = x1.iter().zip(x2).map(|(a, b)| a - b).collect();

        let etas: Vec<f64> = (0..n)
            .map(|_| rng_util::normal(rng, 0.0, sigma_eta))
            .collect();
        let xi = rng_util::normal(rng, 0.0, self.sigma_xi);

        let child = axpy(&midpoint, xi, &d);
        if n <= 1 {
            return child;
        }

        let e12 = unit_direction(x1, x2);
        let distance = distance_to_line(x1, x3, &e12);
        orthonormal_complement(&e12)
            .iter()
            .zip(&etas)
            .fold(child, |acc, (basis, &eta)| axpy(&acc, eta * distance, basis))
    }
}

/// Unit vector from `x1` towards `x2`; zero when the points coincide.
fn unit_direction(x1: &[f64], x2: &[f64]) -> Vec<f64> {
    let v: Vec<f64> = x2.iter().zip(x1).map(|(b, a)| b - a).collect();
    let m = norm(&v).max(1e-10);
    v.into_iter().map(|x| x / m).collect()
}

/// Distance from `x3` to the line through `x1` with unit direction `e12`.
fn distance_to_line(x1: &[f64], x3: &[f64], e12: &[f64]) -> f64 {
    let v13: Vec<f64> = x3.iter().zip(x1).map(|(c, a)| c - a).collect();
    let along = dot(&v13, e12);
    norm(&axpy(&v13, -along, e12))
}

/// `n - 1` orthonormal vectors spanning the complement of `e12`.
///
/// Gram-Schmidt over `e12` followed by the standard basis; when `e12` is
/// zero the standard basis minus its first vector is returned.
fn orthonormal_complement(e12: &[f64]) -> Vec<Vec<f64>> {
    let n = e12.len();
    let mut basis: Vec<Vec<f64>> = Vec::with_capacity(n);
    if norm(e12) > 0.5 {
        basis.push(e12.to_vec());
    }

    for axis in 0..n {
        if basis.len() == n {
            break;
        }
        let mut v = vec![0.0; n];
        v[axis] = 1.0;
        for b in &basis {
            let proj = dot(&v, b);
            v = axpy(&v, -proj, b);
        }
        let m = norm(&v);
        if m > 1e-8 {
            basis.push(v.into_iter().map(|x| x / m).collect());
        }
    }

    basis.split_off(1)
}
