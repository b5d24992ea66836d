//! Crossover operators over encoded parameter vectors.
//!
//! Every operator implements [`Crossover`]: it declares how many parent
//! rows it needs and turns a parent matrix (one row per parent, one
//! column per encoded parameter) into a single child row.
//!
//! | Operator | Parents | Idea |
//! |----------|---------|------|
//! | [`UniformCrossover`] | 2 | Per column, take either parent's value |
//! | [`BlxAlphaCrossover`] | 2 | Uniform draw in the parents' range widened by `alpha` |
//! | [`SbxCrossover`] | 2 | Bounded simulated binary crossover |
//! | [`SpxCrossover`] | 3 | Simplex crossover around the parents' centroid |
//! | [`UndxCrossover`] | 3 | Unimodal normal distribution crossover |
//!
//! [`UniformCrossover`] is also what the orchestrator always applies to
//! categorical parameters, whatever operator handles the numerical ones.

mod blx_alpha;
mod sbx;
mod spx;
mod undx;
mod uniform;

pub use blx_alpha::BlxAlphaCrossover;
pub use sbx::SbxCrossover;
pub use spx::SpxCrossover;
pub use undx::UndxCrossover;
pub use uniform::UniformCrossover;

use crate::types::Direction;

/// A pluggable crossover operator.
///
/// The caller guarantees that `parents` has exactly
/// [`n_parents`](Self::n_parents) rows and that every row, like `bounds`,
/// has one entry per encoded column. The returned child has the same
/// number of columns. It may fall outside `bounds`; the orchestrator's
/// repair loop rejects such children.
pub trait Crossover: Send + Sync {
    /// The exact number of parent rows this operator consumes.
    fn n_parents(&self) -> usize;

    /// Produces one child row from the parent matrix.
    fn crossover(
        &self,
        parents: &[Vec<f64>],
        rng: &mut fastrand::Rng,
        directions: &[Direction],
        bounds: &[(f64, f64)],
    ) -> Vec<f64>;
}

impl<C: Crossover + ?Sized> Crossover for Box<C> {
    fn n_parents(&self) -> usize {
        (**self).n_parents()
    }

    fn crossover(
        &self,
        parents: &[Vec<f64>],
        rng: &mut fastrand::Rng,
        directions: &[Direction],
        bounds: &[(f64, f64)],
    ) -> Vec<f64> {
        (**self).crossover(parents, rng, directions, bounds)
    }
}

/// Iterates over the values of one column of the parent matrix.
fn column(parents: &[Vec<f64>], col: usize) -> impl Iterator<Item = f64> + '_ {
    parents.iter().map(move |row| row[col])
}

/// Element-wise `a + scale * b`.
fn axpy(a: &[f64], scale: f64, b: &[f64]) -> Vec<f64> {
    a.iter().zip(b).map(|(x, y)| x + scale * y).collect()
}

fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

fn norm(a: &[f64]) -> f64 {
    dot(a, a).sqrt()
}
