//! Particle swarm optimization
//!
//! Particles track their personal best and are pulled toward it and the
//! swarm's global best, with inertia on the previous velocity. Velocity
//! and position are clamped to the search bounds.

use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};

use crate::error::MiningError;
use crate::optimize::{
    evaluate_batch, sample_uniform, Budget, Objective, Optimizer, Outcome,
};

/// Configuration for particle swarm optimization
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PsoConfig {
    /// Number of particles
    pub population_size: usize,
    /// Inertia weight on the previous velocity
    pub inertia: f64,
    /// Pull toward the particle's personal best
    pub cognitive: f64,
    /// Pull toward the swarm's global best
    pub social: f64,
    /// Velocity clamp, as a fraction of the bounds range
    pub max_velocity: f64,
}

impl Default for PsoConfig {
    fn default() -> Self {
        Self {
            population_size: 25,
            inertia: 0.7,
            cognitive: 2.0,
            social: 2.0,
            max_velocity: 1.5,
        }
    }
}

/// Particle swarm optimizer
#[derive(Debug, Clone, Default)]
pub struct ParticleSwarmOptimization {
    config: PsoConfig,
}

impl ParticleSwarmOptimization {
    /// Create the optimizer with the given configuration
    pub fn new(config: PsoConfig) -> Self {
        Self { config }
    }
}

impl Optimizer for ParticleSwarmOptimization {
    fn name(&self) -> &'static str {
        "ParticleSwarmOptimization"
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
        let velocity_limit = self.config.max_velocity * bounds.range();

        let mut positions: Vec<Vec<f64>> = (0..population_size)
            .map(|_| sample_uniform(rng, dimension, &bounds))
            .collect();
        let mut velocities: Vec<Vec<f64>> = vec![vec![0.0; dimension]; population_size];

        let initial = population_size.min(max_evaluations);
        let mut personal_best_fitness = evaluate_batch(objective, &positions[..initial]);
        let mut evaluations = initial;
        personal_best_fitness.resize(population_size, f64::NEG_INFINITY);
        let mut personal_best = positions.clone();

        let mut best = Vec::new();
        let mut best_fitness = f64::NEG_INFINITY;
        for (x, &f) in personal_best.iter().zip(&personal_best_fitness) {
            if f > best_fitness {
                best_fitness = f;
                best = x.clone();
            }
        }

        let mut iterations = 0;
        while iterations < max_iterations && evaluations < max_evaluations && !best.is_empty() {
            for i in 0..population_size {
                for j in 0..dimension {
                    let cognitive_pull = self.config.cognitive
                        * rng.gen::<f64>()
                        * (personal_best[i][j] - positions[i][j]);
                    let social_pull =
                        self.config.social * rng.gen::<f64>() * (best[j] - positions[i][j]);
                    let velocity = self.config.inertia * velocities[i][j]
                        + cognitive_pull
                        + social_pull;
                    velocities[i][j] = velocity.clamp(-velocity_limit, velocity_limit);
                    positions[i][j] = bounds.clamp(positions[i][j] + velocities[i][j]);
                }
            }

            let batch = population_size.min(max_evaluations - evaluations);
            let scores = evaluate_batch(objective, &positions[..batch]);
            evaluations += batch;

            for (i, score) in scores.into_iter().enumerate() {
                if score > personal_best_fitness[i] {
                    personal_best_fitness[i] = score;
                    personal_best[i] = positions[i].clone();
                }
                if score > best_fitness {
                    best_fitness = score;
                    best = positions[i].clone();
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
