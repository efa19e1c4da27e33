//! Random search
//!
//! Uniform sampling of the search space, a baseline and smoke-test
//! optimizer.

use rand::RngCore;
use serde::{Deserialize, Serialize};

use crate::error::MiningError;
use crate::optimize::{
    evaluate_batch, sample_uniform, Budget, Objective, Optimizer, Outcome,
};

/// Configuration for random search
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RandomSearchConfig {
    /// Candidates drawn per iteration
    pub population_size: usize,
}

impl Default for RandomSearchConfig {
    fn default() -> Self {
        Self {
            population_size: 50,
        }
    }
}

/// Uniform random search optimizer
#[derive(Debug, Clone, Default)]
pub struct RandomSearch {
    config: RandomSearchConfig,
}

impl RandomSearch {
    /// Create the optimizer with the given configuration
    pub fn new(config: RandomSearchConfig) -> Self {
        Self { config }
    }
}

impl Optimizer for RandomSearch {
    fn name(&self) -> &'static str {
        "RandomSearch"
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
        let population_size = self.config.population_size.max(1);
        let max_evaluations = budget.max_evaluations();
        let max_iterations = budget.max_iterations();

        let mut best = Vec::new();
        let mut best_fitness = f64::NEG_INFINITY;
        let mut evaluations = 0;
        let mut iterations = 0;

        while iterations < max_iterations && evaluations < max_evaluations {
            let batch = population_size.min(max_evaluations - evaluations);
            let candidates: Vec<Vec<f64>> = (0..batch)
                .map(|_| sample_uniform(rng, dimension, &bounds))
                .collect();
            let scores = evaluate_batch(objective, &candidates);
            evaluations += batch;

            for (candidate, score) in candidates.into_iter().zip(scores) {
                if score > best_fitness {
                    best_fitness = score;
                    best = candidate;
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimize::testing::Sphere;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_respects_evaluation_budget() {
        let mut rng = StdRng::seed_from_u64(1);
        let optimizer = RandomSearch::default();
        let budget = Budget::evaluations(120);
        let outcome = optimizer.optimize(&Sphere { dimension: 3 }, &budget, &mut rng);
        assert_eq!(outcome.evaluations, 120);
    }

    #[test]
    fn test_finds_reasonable_point() {
        let mut rng = StdRng::seed_from_u64(42);
        let optimizer = RandomSearch::default();
        let budget = Budget::evaluations(2000);
        let outcome = optimizer.optimize(&Sphere { dimension: 2 }, &budget, &mut rng);
        assert!(outcome.best_fitness > -0.05);
    }

    #[test]
    fn test_iteration_budget() {
        let mut rng = StdRng::seed_from_u64(1);
        let optimizer = RandomSearch::default();
        let budget = Budget::iterations(3);
        let outcome = optimizer.optimize(&Sphere { dimension: 3 }, &budget, &mut rng);
        assert_eq!(outcome.iterations, 3);
        assert_eq!(outcome.evaluations, 150);
    }
}
