//! Mining problem and fitness aggregation
//!
//! [`MiningProblem`] is the objective handed to an optimizer: each
//! candidate vector is decoded into a rule, scored as a weighted mean of
//! interest measures, and archived when it is feasible, has positive
//! support and confidence, and is novel. Infeasible candidates evaluate
//! to a sentinel of -1 so a maximizing search consistently disfavors
//! them.

use std::sync::{Mutex, PoisonError};

use tracing::info;

use crate::dataset::Dataset;
use crate::encoding::{cut_point, RuleEncoding};
use crate::error::MiningError;
use crate::optimize::Objective;
use crate::rule::list::RuleList;
use crate::rule::metrics::Metric;
use crate::rule::{Predicate, Rule};

/// Fitness returned for candidates that decode to an empty antecedent
/// or consequent
pub const INFEASIBLE_FITNESS: f64 = -1.0;

/// A validated set of metrics with positive weights
///
/// The aggregate fitness of a rule is the weighted mean of the selected
/// measures. Construction is the configuration boundary: an empty set or
/// a nonpositive weight is rejected before any search budget is spent.
#[derive(Debug, Clone)]
pub struct MetricWeights {
    entries: Vec<(Metric, f64)>,
    total_weight: f64,
}

impl MetricWeights {
    /// Create a weighted metric set
    pub fn new(entries: Vec<(Metric, f64)>) -> Result<Self, MiningError> {
        if entries.is_empty() {
            return Err(MiningError::EmptyMetrics);
        }
        for (metric, weight) in &entries {
            if *weight <= 0.0 {
                return Err(MiningError::NonpositiveWeight {
                    metric: metric.name(),
                    weight: *weight,
                });
            }
        }
        let total_weight = entries.iter().map(|(_, w)| w).sum();
        Ok(Self {
            entries,
            total_weight,
        })
    }

    /// Create a set with every weight at 1
    pub fn uniform(metrics: &[Metric]) -> Result<Self, MiningError> {
        Self::new(metrics.iter().map(|&m| (m, 1.0)).collect())
    }

    /// Pair up parallel metric and weight lists
    pub fn zipped(metrics: Vec<Metric>, weights: Vec<f64>) -> Result<Self, MiningError> {
        if metrics.len() != weights.len() {
            return Err(MiningError::WeightCountMismatch {
                metrics: metrics.len(),
                weights: weights.len(),
            });
        }
        Self::new(metrics.into_iter().zip(weights).collect())
    }

    /// The metric/weight pairs
    pub fn entries(&self) -> &[(Metric, f64)] {
        &self.entries
    }

    /// Weighted mean of the selected measures for `rule`
    pub fn score<P: Predicate>(&self, rule: &Rule<P>) -> f64 {
        self.entries
            .iter()
            .map(|(metric, weight)| weight * metric.evaluate(rule))
            .sum::<f64>()
            / self.total_weight
    }

    fn describe<P: Predicate>(&self, rule: &Rule<P>) -> String {
        let parts: Vec<String> = self
            .entries
            .iter()
            .map(|(metric, _)| format!("{} = {:.6}", metric.name(), metric.evaluate(rule)))
            .collect();
        parts.join(", ")
    }
}

// Shared state mutated from evaluate(); appends and best-fitness
// updates are serialized so evaluations may run concurrently.
#[derive(Debug)]
struct SearchState {
    rules: RuleList,
    best_fitness: f64,
}

/// The rule mining optimization problem over a dataset
#[derive(Debug)]
pub struct MiningProblem<'a> {
    dataset: &'a Dataset,
    encoding: RuleEncoding,
    weights: MetricWeights,
    logging: bool,
    state: Mutex<SearchState>,
}

impl<'a> MiningProblem<'a> {
    /// Create the problem for a dataset and metric weighting
    pub fn new(dataset: &'a Dataset, weights: MetricWeights, logging: bool) -> Self {
        Self {
            dataset,
            encoding: RuleEncoding::new(dataset.features()),
            weights,
            logging,
            state: Mutex::new(SearchState {
                rules: RuleList::new(),
                best_fitness: f64::NEG_INFINITY,
            }),
        }
    }

    /// The vector layout for this problem
    pub fn encoding(&self) -> &RuleEncoding {
        &self.encoding
    }

    /// Best fitness found so far
    pub fn best_fitness(&self) -> f64 {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .best_fitness
    }

    /// Number of rules archived so far
    pub fn num_rules(&self) -> usize {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .rules
            .len()
    }

    /// Consume the problem and take the archived rules
    pub fn into_rules(self) -> RuleList {
        self.state
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
            .rules
    }
}

impl Objective for MiningProblem<'_> {
    fn dimension(&self) -> usize {
        self.encoding.dimension()
    }

    fn evaluate(&self, x: &[f64]) -> f64 {
        assert_eq!(x.len(), self.encoding.dimension(), "candidate vector length mismatch");
        let (solution, cut_slot) = x.split_at(x.len() - 1);
        let decoded = self.encoding.decode(solution);
        let cut = cut_point(cut_slot[0], self.encoding.num_features());
        let (antecedent, consequent) = decoded.split(cut);
        if antecedent.is_empty() || consequent.is_empty() {
            return INFEASIBLE_FITNESS;
        }

        let mut rule = Rule::new(antecedent, consequent, self.dataset.table());
        let fitness = self.weights.score(&rule);

        if rule.support() > 0.0 && rule.confidence() > 0.0 {
            rule.fitness = fitness;
            let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
            if fitness > state.best_fitness {
                state.best_fitness = fitness;
                if self.logging {
                    info!(fitness, rule = %rule, metrics = %self.weights.describe(&rule), "fitness improved");
                }
            }
            if !state.rules.contains(&rule) {
                state.rules.push(rule);
            }
        }
        fitness
    }
}
