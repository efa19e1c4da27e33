//! Feature model
//!
//! A feature describes one column of a transaction table: its datatype and
//! its admissible value range (numeric) or category set (categorical).
//! Features are immutable once derived from the dataset's column statistics.

use approx::abs_diff_eq;
use serde::{Deserialize, Serialize};

/// Tolerance for comparing float bounds, absorbs round-trip error
const BOUND_TOLERANCE: f64 = 1e-10;

/// Admissible values of a feature
///
/// Numeric variants carry their observed bounds, the categorical variant
/// carries a non-empty, ordered category list. The enum makes the
/// bounds-xor-categories invariant unrepresentable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Domain {
    /// Continuous values in `[min, max]`
    Float { min: f64, max: f64 },
    /// Integer values in `[min, max]`
    Int { min: i64, max: i64 },
    /// One of an ordered set of categories
    Categorical { categories: Vec<String> },
}

impl Domain {
    /// Whether the domain is numeric (float or int)
    pub fn is_numeric(&self) -> bool {
        matches!(self, Domain::Float { .. } | Domain::Int { .. })
    }

    /// Number of candidate-vector slots this domain occupies: three for
    /// numeric features (inclusion, lower bound, upper bound), two for
    /// categorical features (inclusion, category index).
    pub fn slot_width(&self) -> usize {
        if self.is_numeric() {
            3
        } else {
            2
        }
    }
}

impl PartialEq for Domain {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (
                Domain::Float { min: a, max: b },
                Domain::Float { min: c, max: d },
            ) => {
                abs_diff_eq!(a, c, epsilon = BOUND_TOLERANCE)
                    && abs_diff_eq!(b, d, epsilon = BOUND_TOLERANCE)
            }
            (
                Domain::Int { min: a, max: b },
                Domain::Int { min: c, max: d },
            ) => a == c && b == d,
            (
                Domain::Categorical { categories: a },
                Domain::Categorical { categories: b },
            ) => a == b,
            _ => false,
        }
    }
}

/// One column of the transaction table: a name plus its domain
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    name: String,
    domain: Domain,
}

impl Feature {
    /// Create a new feature
    pub fn new(name: impl Into<String>, domain: Domain) -> Self {
        Self {
            name: name.into(),
            domain,
        }
    }

    /// Feature name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Feature domain
    pub fn domain(&self) -> &Domain {
        &self.domain
    }
}

impl std::fmt::Display for Feature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.domain {
            Domain::Float { min, max } => write!(f, "{}: float [{}, {}]", self.name, min, max),
            Domain::Int { min, max } => write!(f, "{}: int [{}, {}]", self.name, min, max),
            Domain::Categorical { categories } => {
                write!(f, "{}: category {:?}", self.name, categories)
            }
        }
    }
}
