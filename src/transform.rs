//! Bijection between numerical parameter maps and flat real vectors.
//!
//! [`SearchSpaceTransform`] encodes one column per numerical parameter, in
//! the search space's name order. Log-scaled parameters are encoded as
//! `ln(value)`; integer and stepped parameters keep their raw value but
//! report bounds widened by half a step so that every grid point owns an
//! equally wide slice of the encoded interval.
//!
//! Decoding rounds integers and snaps stepped floats back onto their grid
//! but never clips into bounds: a vector outside [`bounds`] decodes to a
//! value outside its distribution, which callers are expected to reject.
//! The only exception is rounding error: a float that misses a bound by a
//! relative `1e-12` (as `exp(ln(high))` or `low + k * step` can) is placed
//! on the bound, and single-valued domains always decode to their value.
//!
//! Because nothing is clamped, a decoder that clamps out-of-range values
//! onto the nearest bound would accept more children than this one, and
//! its accepted children would pile up on the bounds. Here those children
//! are rejected and redrawn, so accepted children follow the operator's own
//! distribution restricted to the domain.
//!
//! [`bounds`]: SearchSpaceTransform::bounds

use crate::distribution::Distribution;
use crate::error::{Error, Result};
use crate::param::{ParamMap, ParamValue};
use crate::search_space::SearchSpace;

/// Encoding switches for [`SearchSpaceTransform`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TransformOptions {
    /// Encode log-scaled parameters as `ln(value)`. Default: `true`.
    pub transform_log: bool,
    /// Widen integer and stepped bounds by half a step. Default: `true`.
    pub transform_step: bool,
    /// Rescale every column to `[0, 1]` using its bounds. Default: `false`.
    pub transform_0_1: bool,
}

impl Default for TransformOptions {
    fn default() -> Self {
        Self {
            transform_log: true,
            transform_step: true,
            transform_0_1: false,
        }
    }
}

/// Encodes and decodes parameter maps of a numerical-only search space.
///
/// Built once per crossover call and reused across repair-loop iterations.
///
/// # Examples
///
/// ```
/// use nsga_crossover::distribution::{FloatDistribution, IntDistribution};
/// use nsga_crossover::param::{ParamMap, ParamValue};
/// use nsga_crossover::search_space::SearchSpace;
/// use nsga_crossover::transform::SearchSpaceTransform;
///
/// let space = SearchSpace::new()
///     .with("lr", FloatDistribution::new(1e-4, 1.0).log_scale())
///     .with("layers", IntDistribution::new(1, 4));
/// let transform = SearchSpaceTransform::new(&space).unwrap();
///
/// let mut params = ParamMap::new();
/// params.insert("lr".into(), ParamValue::Float(0.01));
/// params.insert("layers".into(), ParamValue::Int(3));
///
/// let encoded = transform.transform(&params).unwrap();
/// assert_eq!(encoded[0], 3.0); // "layers" sorts first
/// let decoded = transform.untransform(&encoded).unwrap();
/// assert_eq!(decoded["layers"], ParamValue::Int(3));
/// ```
#[derive(Clone, Debug)]
pub struct SearchSpaceTransform {
    names: Vec<String>,
    distributions: Vec<Distribution>,
    raw_bounds: Vec<(f64, f64)>,
    bounds: Vec<(f64, f64)>,
    options: TransformOptions,
}

impl SearchSpaceTransform {
    /// Creates a transform with [`TransformOptions::default`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::ParameterConflict`] if the space declares a
    /// categorical parameter.
    pub fn new(search_space: &SearchSpace) -> Result<Self> {
        Self::with_options(search_space, TransformOptions::default())
    }

    /// Creates a transform with explicit encoding options.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ParameterConflict`] if the space declares a
    /// categorical parameter.
    pub fn with_options(search_space: &SearchSpace, options: TransformOptions) -> Result<Self> {
        let mut names = Vec::with_capacity(search_space.len());
        let mut distributions = Vec::with_capacity(search_space.len());
        let mut raw_bounds = Vec::with_capacity(search_space.len());

        for (name, distribution) in search_space {
            if !distribution.is_numerical() {
                return Err(Error::ParameterConflict {
                    name: name.clone(),
                    reason: "categorical parameters cannot be numerically transformed".into(),
                });
            }
            raw_bounds.push(encoded_bounds(distribution, options));
            names.push(name.clone());
            distributions.push(distribution.clone());
        }

        let bounds = if options.transform_0_1 {
            vec![(0.0, 1.0); raw_bounds.len()]
        } else {
            raw_bounds.clone()
        };

        Ok(Self {
            names,
            distributions,
            raw_bounds,
            bounds,
            options,
        })
    }

    /// Encoded `(low, high)` bounds, one pair per column.
    #[must_use]
    pub fn bounds(&self) -> &[(f64, f64)] {
        &self.bounds
    }

    /// Parameter names in column order.
    #[must_use]
    pub fn column_names(&self) -> &[String] {
        &self.names
    }

    /// Number of encoded columns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Returns `true` if the transform has no columns.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Encodes a parameter map into a flat vector.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingParameter`] or [`Error::UnknownParameter`]
    /// if the keys differ from the declared ones, and
    /// [`Error::ParameterConflict`] if a value has the wrong kind.
    pub fn transform(&self, params: &ParamMap) -> Result<Vec<f64>> {
        if let Some(extra) = params.keys().find(|k| !self.names.contains(k)) {
            return Err(Error::UnknownParameter(extra.clone()));
        }

        self.names
            .iter()
            .zip(&self.distributions)
            .zip(&self.raw_bounds)
            .map(|((name, distribution), &bounds)| {
                let value = params
                    .get(name)
                    .ok_or_else(|| Error::MissingParameter(name.clone()))?;
                let encoded = encode(value, distribution, self.options.transform_log).ok_or_else(
                    || Error::ParameterConflict {
                        name: name.clone(),
                        reason: format!("{} value does not fit the distribution", value.kind()),
                    },
                )?;
                Ok(if self.options.transform_0_1 {
                    to_unit(encoded, bounds)
                } else {
                    encoded
                })
            })
            .collect()
    }

    /// Decodes a flat vector into a parameter map.
    ///
    /// Values are not clipped into bounds. Non-finite values in integer
    /// columns saturate.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DimensionMismatch`] if the vector length differs
    /// from the number of columns.
    pub fn untransform(&self, encoded: &[f64]) -> Result<ParamMap> {
        if encoded.len() != self.names.len() {
            return Err(Error::DimensionMismatch {
                expected: self.names.len(),
                got: encoded.len(),
            });
        }

        Ok(self
            .names
            .iter()
            .zip(&self.distributions)
            .zip(&self.raw_bounds)
            .zip(encoded)
            .map(|(((name, distribution), &bounds), &x)| {
                let x = if self.options.transform_0_1 {
                    from_unit(x, bounds)
                } else {
                    x
                };
                (
                    name.clone(),
                    decode(x, distribution, self.options.transform_log),
                )
            })
            .collect())
    }
}

#[allow(clippy::cast_precision_loss)]
fn encoded_bounds(distribution: &Distribution, options: TransformOptions) -> (f64, f64) {
    let (low, high, log_scale, half_step) = match distribution {
        Distribution::Float(d) => (
            d.low,
            d.high,
            d.log_scale,
            d.step.map_or(0.0, |s| 0.5 * s),
        ),
        Distribution::Int(d) => (
            d.low as f64,
            d.high as f64,
            d.log_scale,
            0.5 * d.effective_step() as f64,
        ),
        Distribution::Categorical(_) => unreachable!("categorical columns are rejected up front"),
    };
    let half_step = if options.transform_step { half_step } else { 0.0 };
    let (low, high) = (low - half_step, high + half_step);
    if log_scale && options.transform_log {
        (low.ln(), high.ln())
    } else {
        (low, high)
    }
}

#[allow(clippy::cast_precision_loss)]
fn encode(value: &ParamValue, distribution: &Distribution, transform_log: bool) -> Option<f64> {
    let (x, log_scale) = match (value, distribution) {
        (ParamValue::Float(v), Distribution::Float(d)) => (*v, d.log_scale),
        (ParamValue::Int(v), Distribution::Int(d)) => (*v as f64, d.log_scale),
        _ => return None,
    };
    Some(if log_scale && transform_log { x.ln() } else { x })
}

/// Relative distance from a bound still attributed to rounding error.
const BOUND_TOLERANCE: f64 = 1e-12;

#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
fn decode(x: f64, distribution: &Distribution, transform_log: bool) -> ParamValue {
    match distribution {
        Distribution::Float(d) if distribution.single() => ParamValue::Float(d.low),
        Distribution::Int(d) if distribution.single() => ParamValue::Int(d.low),
        Distribution::Float(d) => {
            let v = if d.log_scale && transform_log { x.exp() } else { x };
            let v = match d.step {
                Some(step) => d.low + ((v - d.low) / step).round() * step,
                None => v,
            };
            ParamValue::Float(snap_to_bounds(v, d.low, d.high))
        }
        Distribution::Int(d) => {
            let v = if d.log_scale && transform_log { x.exp() } else { x };
            let step = d.effective_step();
            let k = ((v - d.low as f64) / step as f64).round() as i64;
            ParamValue::Int(d.low.saturating_add(k.saturating_mul(step)))
        }
        Distribution::Categorical(_) => unreachable!("categorical columns are rejected up front"),
    }
}

/// Moves `v` onto `low` or `high` when it misses the bound only by rounding
/// error. Values further out are returned unchanged.
fn snap_to_bounds(v: f64, low: f64, high: f64) -> f64 {
    if v < low && low - v <= BOUND_TOLERANCE * low.abs() {
        low
    } else if v > high && v - high <= BOUND_TOLERANCE * high.abs() {
        high
    } else {
        v
    }
}

fn to_unit(x: f64, (low, high): (f64, f64)) -> f64 {
    let width = high - low;
    if width > 0.0 { (x - low) / width } else { 0.5 }
}

fn from_unit(x: f64, (low, high): (f64, f64)) -> f64 {
    low + x * (high - low)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distribution::{CategoricalDistribution, FloatDistribution, IntDistribution};

    fn numeric_space() -> SearchSpace {
        SearchSpace::new()
            .with("a_float", FloatDistribution::new(-2.0, 3.0))
            .with("b_log", FloatDistribution::new(1e-4, 1.0).log_scale())
            .with("c_step", FloatDistribution::new(0.0, 1.0).step(0.25))
            .with("d_int", IntDistribution::new(-5, 5))
            .with("e_int_log", IntDistribution::new(1, 1024).log_scale())
            .with("f_int_step", IntDistribution::new(0, 10).step(2))
    }

    fn sample_params() -> ParamMap {
        let mut p = ParamMap::new();
        p.insert("a_float".into(), ParamValue::Float(1.25));
        p.insert("b_log".into(), ParamValue::Float(0.003));
        p.insert("c_step".into(), ParamValue::Float(0.75));
        p.insert("d_int".into(), ParamValue::Int(-3));
        p.insert("e_int_log".into(), ParamValue::Int(64));
        p.insert("f_int_step".into(), ParamValue::Int(8));
        p
    }

    fn assert_params_close(a: &ParamMap, b: &ParamMap) {
        assert_eq!(a.len(), b.len());
        for (name, va) in a {
            match (va, &b[name]) {
                (ParamValue::Float(x), ParamValue::Float(y)) => {
                    assert!((x - y).abs() < 1e-9, "{name}: {x} vs {y}");
                }
                (x, y) => assert_eq!(x, y, "{name}"),
            }
        }
    }

    #[test]
    fn test_round_trip_default_options() {
        let t = SearchSpaceTransform::new(&numeric_space()).unwrap();
        let params = sample_params();
        let decoded = t.untransform(&t.transform(&params).unwrap()).unwrap();
        assert_params_close(&params, &decoded);
    }

    #[test]
    fn test_round_trip_all_option_combinations() {
        for options in all_options() {
            let t = SearchSpaceTransform::with_options(&numeric_space(), options).unwrap();
            let params = sample_params();
            let decoded = t.untransform(&t.transform(&params).unwrap()).unwrap();
            assert_params_close(&params, &decoded);
        }
    }

    fn all_options() -> impl Iterator<Item = TransformOptions> {
        (0..8_u8).map(|bits| TransformOptions {
            transform_log: bits & 1 != 0,
            transform_step: bits & 2 != 0,
            transform_0_1: bits & 4 != 0,
        })
    }

    /// Draws a value inside `distribution`, hitting each bound a quarter of the time.
    #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
    fn draw_contained(distribution: &Distribution, rng: &mut fastrand::Rng) -> ParamValue {
        let pick = rng.u8(0..4);
        match distribution {
            Distribution::Float(d) => {
                let v = match (pick, d.step) {
                    (0, _) => d.low,
                    (1, _) => d.high,
                    (_, Some(step)) => {
                        let n = ((d.high - d.low) / step).round() as i64;
                        (d.low + rng.i64(0..=n) as f64 * step).min(d.high)
                    }
                    (_, None) if d.log_scale => {
                        let (lo, hi) = (d.low.ln(), d.high.ln());
                        (lo + rng.f64() * (hi - lo)).exp().clamp(d.low, d.high)
                    }
                    (_, None) => d.low + rng.f64() * (d.high - d.low),
                };
                ParamValue::Float(v)
            }
            Distribution::Int(d) => {
                let step = d.effective_step();
                let n = (d.high - d.low) / step;
                let k = match pick {
                    0 => 0,
                    1 => n,
                    _ => rng.i64(0..=n),
                };
                ParamValue::Int(d.low + k * step)
            }
            Distribution::Categorical(_) => unreachable!(),
        }
    }

    #[test]
    fn test_round_trip_property_over_contained_values() {
        let space = SearchSpace::new()
            .with("a_float", FloatDistribution::new(-2.0, 3.0))
            .with("b_log", FloatDistribution::new(1e-5, 0.3).log_scale())
            .with("c_log", FloatDistribution::new(1e-3, 3.0).log_scale())
            .with("d_step", FloatDistribution::new(0.0, 0.3).step(0.1))
            .with("e_step", FloatDistribution::new(-1.0, 1.0).step(0.25))
            .with("f_int", IntDistribution::new(-5, 5))
            .with("g_int_log", IntDistribution::new(1, 1024).log_scale())
            .with("h_int_step", IntDistribution::new(0, 10).step(2));
        let mut rng = fastrand::Rng::with_seed(17);

        for options in all_options() {
            let t = SearchSpaceTransform::with_options(&space, options).unwrap();
            for _ in 0..200 {
                let params: ParamMap = space
                    .iter()
                    .map(|(name, d)| (name.clone(), draw_contained(d, &mut rng)))
                    .collect();
                assert!(space.contains(&params), "{params:?}");

                let decoded = t.untransform(&t.transform(&params).unwrap()).unwrap();
                assert!(space.contains(&decoded), "{options:?}: {decoded:?}");
                for (name, original) in &params {
                    match (original, &decoded[name]) {
                        (ParamValue::Float(x), ParamValue::Float(y)) => assert!(
                            (x - y).abs() <= 1e-9 * x.abs().max(1.0),
                            "{options:?} {name}: {x} vs {y}"
                        ),
                        (x, y) => assert_eq!(x, y, "{options:?} {name}"),
                    }
                }
            }
        }
    }

    #[test]
    fn test_log_scaled_bounds_decode_onto_themselves() {
        for (low, high) in [(1e-4, 0.1), (1e-5, 0.3), (1e-3, 3.0), (1e-6, 1e-2)] {
            let space =
                SearchSpace::new().with("lr", FloatDistribution::new(low, high).log_scale());
            for options in all_options() {
                let t = SearchSpaceTransform::with_options(&space, options).unwrap();
                for v in [low, high] {
                    let mut params = ParamMap::new();
                    params.insert("lr".into(), ParamValue::Float(v));
                    let decoded = t.untransform(&t.transform(&params).unwrap()).unwrap();
                    assert_eq!(decoded["lr"], ParamValue::Float(v), "{options:?}");
                    assert!(space.contains(&decoded));
                }
            }
        }
    }

    #[test]
    fn test_stepped_float_top_of_grid_stays_inside() {
        // 0.0 + 3 * 0.1 rounds to 0.30000000000000004.
        let space = SearchSpace::new().with("x", FloatDistribution::new(0.0, 0.3).step(0.1));
        let t = SearchSpaceTransform::new(&space).unwrap();
        let decoded = t.untransform(&[0.3]).unwrap();
        assert_eq!(decoded["x"], ParamValue::Float(0.3));
        assert!(space.contains(&decoded));
    }

    #[test]
    fn test_snapping_leaves_real_excursions_alone() {
        let space = SearchSpace::new().with("lr", FloatDistribution::new(1e-4, 0.1).log_scale());
        let t = SearchSpaceTransform::new(&space).unwrap();
        let above = t.untransform(&[0.1_f64.ln() + 1e-6]).unwrap();
        assert!(!space.contains(&above));
        let below = t.untransform(&[1e-4_f64.ln() - 1e-6]).unwrap();
        assert!(!space.contains(&below));
    }

    #[test]
    fn test_single_value_domains_decode_to_their_value() {
        let space = SearchSpace::new()
            .with("f", FloatDistribution::new(0.5, 0.5))
            .with("g", FloatDistribution::new(1.0, 1.2).step(0.5))
            .with("n", IntDistribution::new(3, 4).step(5));
        let t = SearchSpaceTransform::new(&space).unwrap();
        let decoded = t.untransform(&[0.7, 1.4, 4.2]).unwrap();
        assert_eq!(decoded["f"], ParamValue::Float(0.5));
        assert_eq!(decoded["g"], ParamValue::Float(1.0));
        assert_eq!(decoded["n"], ParamValue::Int(3));
        assert!(space.contains(&decoded));
    }

    #[test]
    fn test_log_encoding_and_bounds() {
        let space = SearchSpace::new().with("lr", FloatDistribution::new(1e-4, 1.0).log_scale());
        let t = SearchSpaceTransform::new(&space).unwrap();
        let mut p = ParamMap::new();
        p.insert("lr".into(), ParamValue::Float(1.0));
        assert!(t.transform(&p).unwrap()[0].abs() < 1e-12);
        let (lo, hi) = t.bounds()[0];
        assert!((lo - 1e-4_f64.ln()).abs() < 1e-12);
        assert!(hi.abs() < 1e-12);
    }

    #[test]
    fn test_step_bounds_are_widened() {
        let space = SearchSpace::new().with("n", IntDistribution::new(0, 10).step(2));
        let t = SearchSpaceTransform::new(&space).unwrap();
        assert_eq!(t.bounds(), &[(-1.0, 11.0)]);

        let plain = SearchSpaceTransform::with_options(
            &space,
            TransformOptions {
                transform_step: false,
                ..TransformOptions::default()
            },
        )
        .unwrap();
        assert_eq!(plain.bounds(), &[(0.0, 10.0)]);
    }

    #[test]
    fn test_unit_bounds() {
        let t = SearchSpaceTransform::with_options(
            &numeric_space(),
            TransformOptions {
                transform_0_1: true,
                ..TransformOptions::default()
            },
        )
        .unwrap();
        assert!(t.bounds().iter().all(|&b| b == (0.0, 1.0)));
        let encoded = t.transform(&sample_params()).unwrap();
        assert!(encoded.iter().all(|x| (0.0..=1.0).contains(x)));
    }

    #[test]
    fn test_untransform_snaps_but_does_not_clip() {
        let space = SearchSpace::new()
            .with("n", IntDistribution::new(0, 10).step(2))
            .with("x", FloatDistribution::new(0.0, 1.0));
        let t = SearchSpaceTransform::new(&space).unwrap();
        let decoded = t.untransform(&[3.2, 1.5]).unwrap();
        assert_eq!(decoded["n"], ParamValue::Int(4));
        assert_eq!(decoded["x"], ParamValue::Float(1.5));
        assert!(!space.contains(&decoded));

        let decoded = t.untransform(&[12.9, 0.5]).unwrap();
        assert_eq!(decoded["n"], ParamValue::Int(12));
    }

    #[test]
    fn test_transform_rejects_missing_and_extra_keys() {
        let t = SearchSpaceTransform::new(&numeric_space()).unwrap();

        let mut missing = sample_params();
        missing.remove("d_int");
        assert!(matches!(
            t.transform(&missing),
            Err(Error::MissingParameter(ref n)) if n == "d_int"
        ));

        let mut extra = sample_params();
        extra.insert("zzz".into(), ParamValue::Float(0.0));
        assert!(matches!(
            t.transform(&extra),
            Err(Error::UnknownParameter(ref n)) if n == "zzz"
        ));
    }

    #[test]
    fn test_transform_rejects_kind_mismatch() {
        let t = SearchSpaceTransform::new(&numeric_space()).unwrap();
        let mut params = sample_params();
        params.insert("d_int".into(), ParamValue::Float(1.0));
        assert!(matches!(
            t.transform(&params),
            Err(Error::ParameterConflict { .. })
        ));
    }

    #[test]
    fn test_untransform_dimension_mismatch() {
        let t = SearchSpaceTransform::new(&numeric_space()).unwrap();
        assert!(matches!(
            t.untransform(&[0.0]),
            Err(Error::DimensionMismatch {
                expected: 6,
                got: 1
            })
        ));
    }

    #[test]
    fn test_categorical_space_rejected() {
        let space = SearchSpace::new().with("c", CategoricalDistribution::new(["a", "b"]));
        assert!(SearchSpaceTransform::new(&space).is_err());
    }
}
