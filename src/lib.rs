#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![deny(unreachable_pub)]
#![deny(clippy::correctness)]
#![deny(clippy::suspicious)]
#![deny(clippy::style)]
#![deny(clippy::complexity)]
#![deny(clippy::perf)]
#![deny(clippy::pedantic)]
#![deny(clippy::std_instead_of_core)]

//! Crossover for NSGA-II style multi-objective optimization over mixed
//! search spaces. Given an evaluated parent population and a search space of
//! float, integer, and categorical parameters, it selects parents by binary
//! tournament, recombines categorical values with uniform crossover and
//! numerical values with a pluggable real-coded operator, and repeats until
//! the child lies inside the search space.
//!
//! # Getting Started
//!
//! ```
//! use nsga_crossover::prelude::*;
//!
//! let space = SearchSpace::new()
//!     .with("lr", FloatDistribution::new(1e-4, 1e-1).log_scale())
//!     .with("layers", IntDistribution::new(1, 8))
//!     .with("optimizer", CategoricalDistribution::new(["sgd", "adam"]));
//!
//! let population: Vec<_> = (0..8_i64)
//!     .map(|i| {
//!         let mut params = ParamMap::new();
//!         params.insert("lr".into(), ParamValue::Float(1e-4 * 2f64.powi(i as i32)));
//!         params.insert("layers".into(), ParamValue::Int(1 + i % 8));
//!         params.insert("optimizer".into(), ParamValue::Categorical((i % 2) as usize));
//!         MultiObjectiveTrial::new(i as u64, params, vec![i as f64, 8.0 - i as f64])
//!     })
//!     .collect();
//!
//! let sampler = Nsga2CrossoverSampler::builder()
//!     .crossover(BlxAlphaCrossover::default())
//!     .seed(42)
//!     .build()
//!     .unwrap();
//! let child = sampler
//!     .sample_child(&population, &space, &[Direction::Minimize, Direction::Minimize])
//!     .unwrap();
//! assert!(space.contains(&child));
//! ```
//!
//! # Core Concepts
//!
//! | Type | Role |
//! |------|------|
//! | [`SearchSpace`](search_space::SearchSpace) | Named parameter distributions, split into categorical and numerical parts. |
//! | [`SearchSpaceTransform`](transform::SearchSpaceTransform) | Encodes numerical parameters into a continuous vector and decodes them back. |
//! | [`MultiObjectiveTrial`](trial::MultiObjectiveTrial) | An evaluated parent: parameter values, objective values, constraints. |
//! | [`select_parents`](selection::select_parents) | Binary tournament selection of distinct parents. |
//! | [`Crossover`](crossovers::Crossover) | A numerical recombination operator over encoded parents. |
//! | [`crossover`](crossover::crossover) | The repair loop that produces one feasible child. |
//! | [`Nsga2CrossoverSampler`](sampler::Nsga2CrossoverSampler) | Seeded, configurable entry point around all of the above. |
//!
//! # Crossover Operators
//!
//! | Operator | Parents | Algorithm |
//! |----------|---------|-----------|
//! | [`UniformCrossover`](crossovers::UniformCrossover) | 2 | Per-column swap with a fixed probability |
//! | [`BlxAlphaCrossover`](crossovers::BlxAlphaCrossover) | 2 | Blend crossover over an extended parent range |
//! | [`SbxCrossover`](crossovers::SbxCrossover) | 2 | Bounded simulated binary crossover |
//! | [`SpxCrossover`](crossovers::SpxCrossover) | 3 | Simplex crossover |
//! | [`UndxCrossover`](crossovers::UndxCrossover) | 3 | Unimodal normal distribution crossover |
//!
//! # Feature Flags
//!
//! | Flag | What it enables | Default |
//! |------|----------------|---------|
//! | `serde` | `Serialize`/`Deserialize` on distributions, search spaces, parameter values, and trials | off |
//! | `tracing` | Structured log events via [`tracing`](https://docs.rs/tracing) for each crossover attempt | off |

/// Emit a `tracing::info!` event when the `tracing` feature is enabled.
/// No-op otherwise.
#[cfg(feature = "tracing")]
macro_rules! trace_info {
    ($($arg:tt)*) => { tracing::info!($($arg)*) };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_info {
    ($($arg:tt)*) => {};
}

/// Emit a `tracing::debug!` event when the `tracing` feature is enabled.
/// No-op otherwise.
#[cfg(feature = "tracing")]
macro_rules! trace_debug {
    ($($arg:tt)*) => { tracing::debug!($($arg)*) };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_debug {
    ($($arg:tt)*) => {};
}

pub mod crossover;
pub mod crossovers;
pub mod distribution;
mod error;
pub mod param;
pub mod pareto;
mod rng_util;
pub mod sampler;
pub mod search_space;
pub mod selection;
pub mod transform;
pub mod trial;
mod types;

pub use crossover::{Offspring, crossover, crossover_with_limit};
pub use error::{Error, Result};
pub use sampler::{Nsga2CrossoverSampler, Nsga2CrossoverSamplerBuilder};
pub use types::{Direction, TrialState};

/// Convenient wildcard import for the most common types.
///
/// ```
/// use nsga_crossover::prelude::*;
/// ```
pub mod prelude {
    pub use crate::crossover::{Offspring, crossover, crossover_with_limit};
    pub use crate::crossovers::{
        BlxAlphaCrossover, Crossover, SbxCrossover, SpxCrossover, UndxCrossover, UniformCrossover,
    };
    pub use crate::distribution::{
        CategoricalDistribution, Distribution, FloatDistribution, IntDistribution,
    };
    pub use crate::error::{Error, Result};
    pub use crate::param::{ParamMap, ParamValue};
    pub use crate::pareto::{constrained_trial_dominates, trial_dominates};
    pub use crate::sampler::{Nsga2CrossoverSampler, Nsga2CrossoverSamplerBuilder};
    pub use crate::search_space::SearchSpace;
    pub use crate::selection::select_parents;
    pub use crate::transform::{SearchSpaceTransform, TransformOptions};
    pub use crate::trial::MultiObjectiveTrial;
    pub use crate::types::{Direction, TrialState};
}
