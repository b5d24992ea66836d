//! A small NSGA-II loop over a mixed search space.
//!
//! Each generation breeds children with `Nsga2CrossoverSampler`, evaluates
//! them on two competing objectives, and keeps the best trials with
//! `pareto::select_elite`.
//!
//! Run with: `cargo run --example nsga2_crossover`

use nsga_crossover::pareto;
use nsga_crossover::prelude::*;

const POPULATION: usize = 16;
const GENERATIONS: usize = 10;

/// Two objectives trading off `x` against `y`, with a penalty per extra layer
/// and a small bonus for the "wide" shape.
#[allow(clippy::cast_precision_loss)]
fn evaluate(params: &ParamMap) -> Vec<f64> {
    let (
        ParamValue::Float(x),
        ParamValue::Float(y),
        ParamValue::Int(layers),
        ParamValue::Categorical(shape),
    ) = (&params["x"], &params["y"], &params["layers"], &params["shape"])
    else {
        unreachable!("parameters follow the search space");
    };
    let bonus = if *shape == 1 { 0.1 } else { 0.0 };
    let f1 = x * x + 0.05 * (*layers as f64) - bonus;
    let f2 = (x - 2.0).powi(2) + y.ln().abs() - bonus;
    vec![f1, f2]
}

fn main() -> nsga_crossover::Result<()> {
    let directions = [Direction::Minimize, Direction::Minimize];
    let shapes = CategoricalDistribution::new(["narrow", "wide", "deep"]);
    let space = SearchSpace::new()
        .with("x", FloatDistribution::new(-1.0, 3.0))
        .with("y", FloatDistribution::new(0.1, 10.0).log_scale())
        .with("layers", IntDistribution::new(1, 6))
        .with("shape", shapes.clone());
    space.validate()?;

    let mut rng = fastrand::Rng::with_seed(0);
    let mut population: Vec<MultiObjectiveTrial> = (0..POPULATION as u64)
        .map(|id| {
            let mut params = ParamMap::new();
            params.insert("x".into(), ParamValue::Float(-1.0 + 4.0 * rng.f64()));
            params.insert("y".into(), ParamValue::Float(0.1 * 100f64.powf(rng.f64())));
            params.insert("layers".into(), ParamValue::Int(rng.i64(1..=6)));
            params.insert("shape".into(), ParamValue::Categorical(rng.usize(0..3)));
            let values = evaluate(&params);
            MultiObjectiveTrial::new(id, params, values)
        })
        .collect();

    let sampler = Nsga2CrossoverSampler::builder()
        .crossover(SbxCrossover::default())
        .swapping_prob(0.5)
        .max_attempts(1_000)
        .seed(42)
        .build()?;

    let mut next_id = POPULATION as u64;
    for generation in 0..GENERATIONS {
        let mut children = Vec::with_capacity(POPULATION);
        for _ in 0..POPULATION {
            let params = sampler.sample_child(&population, &space, &directions)?;
            let values = evaluate(&params);
            children.push(MultiObjectiveTrial::new(next_id, params, values));
            next_id += 1;
        }
        population.extend(children);

        let elite = pareto::select_elite(&population, POPULATION, &directions, trial_dominates);
        population = elite.into_iter().map(|i| population[i].clone()).collect();

        let best_f1 = population.iter().map(|t| t.values[0]).fold(f64::INFINITY, f64::min);
        println!("generation {generation}: best f1 = {best_f1:.4}");
    }

    let front = pareto::non_dominated_sort(&population, &directions, trial_dominates)
        .into_iter()
        .next()
        .unwrap_or_default();
    println!("Pareto front has {} trials:", front.len());
    for i in front {
        let trial = &population[i];
        let shape = match trial.params["shape"] {
            ParamValue::Categorical(index) => shapes.choice(index).unwrap_or("?"),
            _ => "?",
        };
        println!(
            "  #{:<3} f1={:.4} f2={:.4} x={:?} y={:?} layers={:?} shape={shape}",
            trial.id,
            trial.values[0],
            trial.values[1],
            trial.params["x"],
            trial.params["y"],
            trial.params["layers"],
        );
    }

    Ok(())
}
