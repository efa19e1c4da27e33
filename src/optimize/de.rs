//! Differential evolution
//!
//! The rand/1/bin scheme: each target vector is perturbed by a scaled
//! difference of two other population members and recombined with
//! binomial crossover. Greedy one-to-one selection keeps the better of
//! target and trial.

use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};

use crate::error::MiningError;
use crate::optimize::{
    evaluate_batch, sample_uniform, Bounds, Budget, Objective, Optimizer, Outcome,
};

/// Configuration for differential evolution
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DeConfig {
    /// Population size
    pub population_size: usize,
    /// Scale factor F applied to the difference vector
    pub differential_weight: f64,
    /// Binomial crossover probability CR
    pub crossover_probability: f64,
}

impl Default for DeConfig {
    fn default() -> Self {
        Self {
            population_size: 50,
            differential_weight: 0.8,
            crossover_probability: 0.9,
        }
    }
}

/// Differential evolution optimizer (rand/1/bin)
#[derive(Debug, Clone, Default)]
pub struct DifferentialEvolution {
    config: DeConfig,
}

impl DifferentialEvolution {
    /// Create the optimizer with the given configuration
    pub fn new(config: DeConfig) -> Self {
        Self { config }
    }

    fn trial(
        &self,
        target: usize,
        population: &[Vec<f64>],
        bounds: &Bounds,
        rng: &mut dyn RngCore,
    ) -> Vec<f64> {
        let [r0, r1, r2] = distinct_indices(rng, population.len(), target);
        let dimension = population[target].len();
        let forced = rng.gen_range(0..dimension);
        (0..dimension)
            .map(|j| {
                if j == forced || rng.gen::<f64>() < self.config.crossover_probability {
                    let mutant = population[r0][j]
                        + self.config.differential_weight * (population[r1][j] - population[r2][j]);
                    bounds.clamp(mutant)
                } else {
                    population[target][j]
                }
            })
            .collect()
    }
}

impl Optimizer for DifferentialEvolution {
    fn name(&self) -> &'static str {
        "DifferentialEvolution"
    }

    fn parameters(&self) -> serde_json::Value {
        serde_json::to_value(&self.config).unwrap_or(serde_json::Value::Null)
    }

    fn set_parameters(&mut self, parameters: serde_json::Value) -> Result<(), MiningError> {
        self.config = serde_json::from_value(parameters)
            .map_err(|e| MiningError::InvalidParameters(e.to_string()))?;
        Ok(())
    }

    fn optimize(
        &self,
        objective: &dyn Objective,
        budget: &Budget,
        rng: &mut dyn RngCore,
    ) -> Outcome {
        let dimension = objective.dimension();
        let bounds = objective.bounds();
        // difference vectors need at least four members
        let population_size = self.config.population_size.max(4);
        let max_evaluations = budget.max_evaluations();
        let max_iterations = budget.max_iterations();

        let mut population: Vec<Vec<f64>> = (0..population_size)
            .map(|_| sample_uniform(rng, dimension, &bounds))
            .collect();
        let initial = population_size.min(max_evaluations);
        let mut fitness = evaluate_batch(objective, &population[..initial]);
        let mut evaluations = initial;
        fitness.resize(population_size, f64::NEG_INFINITY);

        let mut best = Vec::new();
        let mut best_fitness = f64::NEG_INFINITY;
        for (x, &f) in population.iter().zip(&fitness) {
            if f > best_fitness {
                best_fitness = f;
                best = x.clone();
            }
        }

        let mut iterations = 0;
        while iterations < max_iterations && evaluations < max_evaluations {
            let trials: Vec<Vec<f64>> = (0..population_size)
                .map(|i| self.trial(i, &population, &bounds, rng))
                .collect();
            let batch = population_size.min(max_evaluations - evaluations);
            let scores = evaluate_batch(objective, &trials[..batch]);
            evaluations += batch;

            for (i, (trial, score)) in trials.into_iter().zip(scores).enumerate() {
                if score >= fitness[i] {
                    fitness[i] = score;
                    population[i] = trial;
                }
                if score > best_fitness {
                    best_fitness = score;
                    best = population[i].clone();
                }
            }
            iterations += 1;
            if batch < population_size {
                break;
            }
        }

        Outcome {
            best,
            best_fitness,
            evaluations,
            iterations,
        }
    }
}

/// Three distinct population indices, all different from `exclude`
fn distinct_indices(rng: &mut dyn RngCore, population_size: usize, exclude: usize) -> [usize; 3] {
    let mut picked = [0usize; 3];
    let mut count = 0;
    while count < 3 {
        let candidate = rng.gen_range(0..population_size);
        if candidate != exclude && !picked[..count].contains(&candidate) {
            picked[count] = candidate;
            count += 1;
        }
    }
    picked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimize::testing::Sphere;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_respects_evaluation_budget() {
        let mut rng = StdRng::seed_from_u64(7);
        let optimizer = DifferentialEvolution::default();
        let budget = Budget::evaluations(173);
        let outcome = optimizer.optimize(&Sphere { dimension: 6 }, &budget, &mut rng);
        assert_eq!(outcome.evaluations, 173);
    }

    #[test]
    fn test_respects_iteration_budget() {
        let mut rng = StdRng::seed_from_u64(7);
        let optimizer = DifferentialEvolution::default();
        let budget = Budget::iterations(5);
        let outcome = optimizer.optimize(&Sphere { dimension: 6 }, &budget, &mut rng);
        assert_eq!(outcome.iterations, 5);
        // initial population plus five generations
        assert_eq!(outcome.evaluations, 50 * 6);
    }

    #[test]
    fn test_improves_on_sphere() {
        let mut rng = StdRng::seed_from_u64(42);
        let optimizer = DifferentialEvolution::default();
        let budget = Budget::evaluations(3000);
        let outcome = optimizer.optimize(&Sphere { dimension: 4 }, &budget, &mut rng);
        assert!(outcome.best_fitness > -0.01);
        assert!(outcome.best.iter().all(|&v| (0.0..=1.0).contains(&v)));
    }

    #[test]
    fn test_deterministic_under_fixed_seed() {
        let optimizer = DifferentialEvolution::default();
        let budget = Budget::evaluations(500);
        let mut rng = StdRng::seed_from_u64(11);
        let a = optimizer.optimize(&Sphere { dimension: 4 }, &budget, &mut rng);
        let mut rng = StdRng::seed_from_u64(11);
        let b = optimizer.optimize(&Sphere { dimension: 4 }, &budget, &mut rng);
        assert_eq!(a.best, b.best);
        assert_eq!(a.best_fitness, b.best_fitness);
    }

    #[test]
    fn test_parameter_round_trip() {
        let mut optimizer = DifferentialEvolution::default();
        let mut parameters = optimizer.parameters();
        parameters["population_size"] = serde_json::json!(20);
        optimizer.set_parameters(parameters).expect("valid parameters");
        assert_eq!(optimizer.config.population_size, 20);

        let result = optimizer.set_parameters(serde_json::json!({"population_size": "many"}));
        assert!(matches!(result, Err(MiningError::InvalidParameters(_))));
    }

    #[test]
    fn test_distinct_indices() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..100 {
            let [r0, r1, r2] = distinct_indices(&mut rng, 5, 2);
            assert!(r0 != 2 && r1 != 2 && r2 != 2);
            assert!(r0 != r1 && r1 != r2 && r0 != r2);
        }
    }
}
