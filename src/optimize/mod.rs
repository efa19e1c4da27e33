//! Optimization boundary
//!
//! This module defines the contract between the mining core and the
//! search algorithms: an [`Objective`] exposing dimension, bounds and a
//! synchronous evaluation function, a validated stopping [`Budget`],
//! and the [`Optimizer`] trait the reference algorithms implement. The
//! core does not depend on which algorithm is used.

pub mod de;
pub mod pso;
pub mod random_search;

use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};

use crate::error::MiningError;

pub mod prelude {
    pub use super::de::{DeConfig, DifferentialEvolution};
    pub use super::pso::{ParticleSwarmOptimization, PsoConfig};
    pub use super::random_search::{RandomSearch, RandomSearchConfig};
    pub use super::{optimizer_by_name, Bounds, Budget, Objective, Optimizer, Outcome};
}

/// A maximization objective over a box-bounded real search space
#[cfg(feature = "parallel")]
pub trait Objective: Send + Sync {
    /// Length of a candidate vector
    fn dimension(&self) -> usize;

    /// Bounds of every vector component
    fn bounds(&self) -> Bounds {
        Bounds::unit()
    }

    /// Evaluate a candidate (higher is better)
    fn evaluate(&self, x: &[f64]) -> f64;
}

/// A maximization objective over a box-bounded real search space
#[cfg(not(feature = "parallel"))]
pub trait Objective {
    /// Length of a candidate vector
    fn dimension(&self) -> usize;

    /// Bounds of every vector component
    fn bounds(&self) -> Bounds {
        Bounds::unit()
    }

    /// Evaluate a candidate (higher is better)
    fn evaluate(&self, x: &[f64]) -> f64;
}

/// Uniform bounds for all vector components
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    /// Lower bound (inclusive)
    pub min: f64,
    /// Upper bound (inclusive)
    pub max: f64,
}

impl Bounds {
    /// Create new bounds
    ///
    /// # Panics
    /// Panics if min > max
    pub fn new(min: f64, max: f64) -> Self {
        assert!(
            min <= max,
            "Invalid bounds: min ({}) must be <= max ({})",
            min,
            max
        );
        Self { min, max }
    }

    /// Unit bounds [0, 1], the rule-encoding search space
    pub fn unit() -> Self {
        Self::new(0.0, 1.0)
    }

    /// Get the range (max - min)
    pub fn range(&self) -> f64 {
        self.max - self.min
    }

    /// Check if a value is within bounds
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    /// Clamp a value to be within bounds
    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }

    /// Denormalize a value from [0, 1] to bounds
    pub fn denormalize(&self, value: f64) -> f64 {
        self.min + value * self.range()
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self::unit()
    }
}

/// Stopping budget for a search run
///
/// At least one of the two limits must be finite; validating this at
/// construction keeps a budgetless run from spinning forever.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Budget {
    max_evaluations: Option<usize>,
    max_iterations: Option<usize>,
}

impl Budget {
    /// Create a budget from optional limits
    pub fn new(
        max_evaluations: Option<usize>,
        max_iterations: Option<usize>,
    ) -> Result<Self, MiningError> {
        if max_evaluations.is_none() && max_iterations.is_none() {
            return Err(MiningError::MissingBudget);
        }
        Ok(Self {
            max_evaluations,
            max_iterations,
        })
    }

    /// Budget limited by evaluations only
    pub fn evaluations(max_evaluations: usize) -> Self {
        Self {
            max_evaluations: Some(max_evaluations),
            max_iterations: None,
        }
    }

    /// Budget limited by iterations only
    pub fn iterations(max_iterations: usize) -> Self {
        Self {
            max_evaluations: None,
            max_iterations: Some(max_iterations),
        }
    }

    /// Evaluation limit, effectively unbounded when unset
    pub fn max_evaluations(&self) -> usize {
        self.max_evaluations.unwrap_or(usize::MAX)
    }

    /// Iteration limit, effectively unbounded when unset
    pub fn max_iterations(&self) -> usize {
        self.max_iterations.unwrap_or(usize::MAX)
    }
}

/// Result of a search run
#[derive(Debug, Clone)]
pub struct Outcome {
    /// Best vector found
    pub best: Vec<f64>,
    /// Fitness of the best vector
    pub best_fitness: f64,
    /// Evaluations spent
    pub evaluations: usize,
    /// Iterations completed
    pub iterations: usize,
}

/// A population-based search algorithm
///
/// Implementations expose their tunable configuration as JSON so a
/// driver can round-trip it through an editor, and must respect the
/// budget exactly, stopping mid-generation when evaluations run out.
pub trait Optimizer {
    /// Canonical algorithm name
    fn name(&self) -> &'static str;

    /// Current configuration as a JSON value
    fn parameters(&self) -> serde_json::Value;

    /// Replace the configuration from a JSON value
    fn set_parameters(&mut self, parameters: serde_json::Value) -> Result<(), MiningError>;

    /// Run the search and return the best result found
    fn optimize(
        &self,
        objective: &dyn Objective,
        budget: &Budget,
        rng: &mut dyn RngCore,
    ) -> Outcome;
}

/// Resolve an optimizer from its name (case-insensitive, with short
/// aliases)
pub fn optimizer_by_name(name: &str) -> Result<Box<dyn Optimizer>, MiningError> {
    match name.to_ascii_lowercase().as_str() {
        "differentialevolution" | "de" => {
            Ok(Box::new(de::DifferentialEvolution::default()))
        }
        "particleswarmoptimization" | "pso" => {
            Ok(Box::new(pso::ParticleSwarmOptimization::default()))
        }
        "randomsearch" | "random" => Ok(Box::new(random_search::RandomSearch::default())),
        _ => Err(MiningError::UnknownAlgorithm(name.to_string())),
    }
}

/// Draw a uniform candidate vector within bounds
pub(crate) fn sample_uniform(
    rng: &mut dyn RngCore,
    dimension: usize,
    bounds: &Bounds,
) -> Vec<f64> {
    (0..dimension)
        .map(|_| rng.gen_range(bounds.min..=bounds.max))
        .collect()
}

/// Evaluate a batch of candidates
#[cfg(feature = "parallel")]
pub(crate) fn evaluate_batch(objective: &dyn Objective, candidates: &[Vec<f64>]) -> Vec<f64> {
    use rayon::prelude::*;
    candidates
        .par_iter()
        .map(|x| objective.evaluate(x))
        .collect()
}

/// Evaluate a batch of candidates
#[cfg(not(feature = "parallel"))]
pub(crate) fn evaluate_batch(objective: &dyn Objective, candidates: &[Vec<f64>]) -> Vec<f64> {
    candidates.iter().map(|x| objective.evaluate(x)).collect()
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;

    /// Concave objective with its optimum at 0.5 in every component
    pub struct Sphere {
        pub dimension: usize,
    }

    impl Objective for Sphere {
        fn dimension(&self) -> usize {
            self.dimension
        }

        fn evaluate(&self, x: &[f64]) -> f64 {
            -x.iter().map(|v| (v - 0.5) * (v - 0.5)).sum::<f64>()
        }
    }
}
