//! Mining entry point
//!
//! Wires a dataset, a metric weighting and an optimizer together, runs
//! the search and returns the discovered rules sorted by fitness.

use std::time::{Duration, Instant};

use rand::RngCore;
use tracing::debug;

use crate::dataset::Dataset;
use crate::optimize::{Budget, Optimizer};
use crate::problem::{MetricWeights, MiningProblem};
use crate::rule::list::RuleList;

/// Result of a mining run
#[derive(Debug)]
pub struct MiningRun {
    /// Mined rules, sorted by fitness descending
    pub rules: RuleList,
    /// Wall-clock duration of the search
    pub run_time: Duration,
}

/// Mine association rules on a dataset
///
/// Configuration is validated by [`MetricWeights`] and [`Budget`]
/// construction, before any evaluation budget is spent; this function
/// only runs the search.
pub fn mine(
    dataset: &Dataset,
    optimizer: &dyn Optimizer,
    weights: MetricWeights,
    budget: &Budget,
    rng: &mut dyn RngCore,
    logging: bool,
) -> MiningRun {
    let problem = MiningProblem::new(dataset, weights, logging);

    let start = Instant::now();
    let outcome = optimizer.optimize(&problem, budget, rng);
    let run_time = start.elapsed();

    debug!(
        algorithm = optimizer.name(),
        evaluations = outcome.evaluations,
        iterations = outcome.iterations,
        best_fitness = outcome.best_fitness,
        rules = problem.num_rules(),
        "search finished"
    );

    let mut rules = problem.into_rules();
    rules.sort_by_fitness(true);
    MiningRun { rules, run_time }
}
