//! # evoarm
//!
//! Numeric and categorical association rule mining with population-based
//! metaheuristics.
//!
//! Rule discovery is treated as a continuous optimization problem: a
//! fixed-length real vector in the unit hypercube decodes into a
//! candidate rule (per-feature interval or category constraints, split
//! into antecedent and consequent by a cut point), the rule is scored
//! against the transaction table with a weighted mean of interest
//! measures, and the resulting scalar drives any population-based
//! search algorithm.
//!
//! ## Core Concepts
//!
//! - **Vector encoding**: variable-length rules packed into fixed-length
//!   vectors, with permutation-based feature ordering
//! - **Derived metrics**: support, confidence, lift and a dozen related
//!   measures, all pure functions of a rule's contingency counts
//! - **Pluggable search**: any [`optimize::Optimizer`] drives the same
//!   fitness function
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use evoarm::prelude::*;
//! use rand::SeedableRng;
//!
//! let mut rng = rand::rngs::StdRng::seed_from_u64(42);
//!
//! let dataset = Dataset::from_csv("transactions.csv")?;
//! let weights = MetricWeights::uniform(&[Metric::Support, Metric::Confidence])?;
//! let budget = Budget::evaluations(10_000);
//!
//! let run = mine(&dataset, &DifferentialEvolution::default(), weights, &budget, &mut rng, true);
//! run.rules.to_csv("rules.csv")?;
//! ```

pub mod dataset;
pub mod encoding;
pub mod error;
pub mod mine;
pub mod optimize;
pub mod problem;
pub mod rule;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::dataset::prelude::*;
    pub use crate::encoding::{cut_point, DecodedRule, RuleEncoding};
    pub use crate::error::*;
    pub use crate::mine::{mine, MiningRun};
    pub use crate::optimize::prelude::*;
    pub use crate::problem::{MetricWeights, MiningProblem, INFEASIBLE_FITNESS};
    pub use crate::rule::prelude::*;
}
