//! Association rules
//!
//! This module defines rule attributes (per-feature constraints), the
//! membership predicate abstraction, and the [`Rule`] type that computes
//! its contingency counts against a transaction table at construction.
//! Interest measures are derived lazily from those counts in
//! [`metrics`]; discovered rules are collected in [`list`].

pub mod list;
pub mod metrics;

use std::fmt;

use approx::abs_diff_eq;
use serde::{Deserialize, Serialize};

use crate::dataset::table::{TransactionTable, Value};

pub mod prelude {
    pub use super::list::RuleList;
    pub use super::metrics::Metric;
    pub use super::{Attribute, Constraint, Predicate, Rule, RuleCounts};
}

/// Membership predicate over a single table column
///
/// A rule is a conjunction of predicates per side. Numeric/categorical
/// attributes are the standard implementation; any other row-level
/// membership test (e.g. a term-weight threshold over a term-document
/// table) plugs into the same rule and metrics machinery.
pub trait Predicate: Clone + PartialEq + fmt::Display {
    /// Name of the column this predicate constrains
    fn feature(&self) -> &str;

    /// Whether a raw cell value satisfies the predicate
    fn test(&self, value: &Value<'_>) -> bool;

    /// Closed numeric interval for width-based measures, if any
    fn interval(&self) -> Option<(f64, f64)>;
}

/// Concrete constraint on one feature's value
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Constraint {
    /// Closed interval over a float feature
    FloatRange { low: f64, high: f64 },
    /// Closed interval over an int feature
    IntRange { low: i64, high: i64 },
    /// A single selected category
    Category(String),
}

impl PartialEq for Constraint {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (
                Constraint::FloatRange { low: a, high: b },
                Constraint::FloatRange { low: c, high: d },
            ) => abs_diff_eq!(a, c, epsilon = 1e-10) && abs_diff_eq!(b, d, epsilon = 1e-10),
            (
                Constraint::IntRange { low: a, high: b },
                Constraint::IntRange { low: c, high: d },
            ) => a == c && b == d,
            (Constraint::Category(a), Constraint::Category(b)) => a == b,
            _ => false,
        }
    }
}

/// A decoded rule attribute: one feature with a concrete constraint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attribute {
    name: String,
    constraint: Constraint,
}

impl Attribute {
    /// Create a new attribute
    pub fn new(name: impl Into<String>, constraint: Constraint) -> Self {
        Self {
            name: name.into(),
            constraint,
        }
    }

    /// The constraint on the feature's value
    pub fn constraint(&self) -> &Constraint {
        &self.constraint
    }
}

impl Predicate for Attribute {
    fn feature(&self) -> &str {
        &self.name
    }

    fn test(&self, value: &Value<'_>) -> bool {
        match &self.constraint {
            Constraint::FloatRange { low, high } => value
                .as_f64()
                .map_or(false, |v| v >= *low && v <= *high),
            Constraint::IntRange { low, high } => value
                .as_f64()
                .map_or(false, |v| v >= *low as f64 && v <= *high as f64),
            Constraint::Category(category) => {
                matches!(value, Value::Categorical(c) if *c == category.as_str())
            }
        }
    }

    fn interval(&self) -> Option<(f64, f64)> {
        match &self.constraint {
            Constraint::FloatRange { low, high } => Some((*low, *high)),
            Constraint::IntRange { low, high } => Some((*low as f64, *high as f64)),
            Constraint::Category(_) => None,
        }
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.constraint {
            Constraint::FloatRange { low, high } => {
                if abs_diff_eq!(low, high, epsilon = 1e-10) {
                    write!(f, "{}({})", self.name, low)
                } else {
                    write!(f, "{}([{}, {}])", self.name, low, high)
                }
            }
            Constraint::IntRange { low, high } => {
                if low == high {
                    write!(f, "{}({})", self.name, low)
                } else {
                    write!(f, "{}([{}, {}])", self.name, low, high)
                }
            }
            Constraint::Category(category) => write!(f, "{}({})", self.name, category),
        }
    }
}

/// Bracketed, comma-joined display form of one rule side
pub(crate) fn format_side<P: Predicate>(side: &[P]) -> String {
    let parts: Vec<String> = side.iter().map(|p| p.to_string()).collect();
    format!("[{}]", parts.join(", "))
}

/// Contingency counts of a rule over a transaction table
///
/// The four cells partition the table:
/// `full_count + ant_not_con + con_not_ant + not_ant_not_con == num_transactions`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RuleCounts {
    /// Rows matching the whole antecedent
    pub antecedent_count: usize,
    /// Rows matching the whole consequent
    pub consequent_count: usize,
    /// Rows matching both sides
    pub full_count: usize,
    /// Rows matching the antecedent but not the consequent
    pub ant_not_con: usize,
    /// Rows matching the consequent but not the antecedent
    pub con_not_ant: usize,
    /// Rows matching neither side
    pub not_ant_not_con: usize,
    /// Total rows in the table
    pub num_transactions: usize,
}

/// An association rule with its occurrence counts
///
/// Counts are computed once, in a single pass over the transaction
/// table, when the rule is constructed; every interest measure is a pure
/// function of that immutable state. Only `fitness` is mutable after
/// construction. Equality compares antecedent and consequent content,
/// which makes it the dedup key for the rule archive.
#[derive(Debug, Clone)]
pub struct Rule<P: Predicate = Attribute> {
    antecedent: Vec<P>,
    consequent: Vec<P>,
    counts: RuleCounts,
    inclusion: f64,
    amplitude: f64,
    /// Aggregate fitness assigned by the mining problem
    pub fitness: f64,
}

impl<P: Predicate> Rule<P> {
    /// Build a rule and compute its counts against `table`
    ///
    /// A predicate naming a column absent from the table matches no row.
    pub fn new(antecedent: Vec<P>, consequent: Vec<P>, table: &TransactionTable) -> Self {
        let antecedent_columns: Vec<Option<usize>> = antecedent
            .iter()
            .map(|p| table.column_index(p.feature()))
            .collect();
        let consequent_columns: Vec<Option<usize>> = consequent
            .iter()
            .map(|p| table.column_index(p.feature()))
            .collect();

        let mut counts = RuleCounts {
            num_transactions: table.len(),
            ..RuleCounts::default()
        };
        for row in 0..table.len() {
            let in_antecedent = matches_all(&antecedent, &antecedent_columns, table, row);
            let in_consequent = matches_all(&consequent, &consequent_columns, table, row);
            match (in_antecedent, in_consequent) {
                (true, true) => counts.full_count += 1,
                (true, false) => counts.ant_not_con += 1,
                (false, true) => counts.con_not_ant += 1,
                (false, false) => counts.not_ant_not_con += 1,
            }
            if in_antecedent {
                counts.antecedent_count += 1;
            }
            if in_consequent {
                counts.consequent_count += 1;
            }
        }

        let inclusion =
            (antecedent.len() + consequent.len()) as f64 / table.num_columns() as f64;
        let amplitude = amplitude_of(&antecedent, &consequent, table);

        Self {
            antecedent,
            consequent,
            counts,
            inclusion,
            amplitude,
            fitness: 0.0,
        }
    }

    /// Antecedent attributes (the rule's left-hand side)
    pub fn antecedent(&self) -> &[P] {
        &self.antecedent
    }

    /// Consequent attributes (the rule's right-hand side)
    pub fn consequent(&self) -> &[P] {
        &self.consequent
    }

    /// The rule's contingency counts
    pub fn counts(&self) -> &RuleCounts {
        &self.counts
    }

    /// Fraction of all features the rule constrains
    pub fn inclusion(&self) -> f64 {
        self.inclusion
    }

    /// One minus the mean relative interval width of the rule's numeric
    /// attributes, normalized by the table's observed column ranges
    pub fn amplitude(&self) -> f64 {
        self.amplitude
    }
}

impl<P: Predicate> PartialEq for Rule<P> {
    fn eq(&self, other: &Self) -> bool {
        self.antecedent == other.antecedent && self.consequent == other.consequent
    }
}

impl<P: Predicate> fmt::Display for Rule<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} => {}",
            format_side(&self.antecedent),
            format_side(&self.consequent)
        )
    }
}

fn matches_all<P: Predicate>(
    side: &[P],
    columns: &[Option<usize>],
    table: &TransactionTable,
    row: usize,
) -> bool {
    side.iter().zip(columns).all(|(predicate, column)| {
        column.map_or(false, |c| {
            table
                .value(row, c)
                .map_or(false, |value| predicate.test(&value))
        })
    })
}

/// Mean relative interval width over the rule's numeric attributes
///
/// Categorical attributes contribute nothing to the accumulator but
/// still count in the divisor. A degenerate column (observed max equals
/// min) contributes a full-width 1 instead of dividing by zero.
fn amplitude_of<P: Predicate>(
    antecedent: &[P],
    consequent: &[P],
    table: &TransactionTable,
) -> f64 {
    let total = antecedent.len() + consequent.len();
    let mut widths = 0.0;
    for predicate in antecedent.iter().chain(consequent.iter()) {
        if let Some((low, high)) = predicate.interval() {
            let range = table
                .column_index(predicate.feature())
                .and_then(|c| table.observed_range(c));
            match range {
                Some((min, max)) if max > min => widths += (high - low) / (max - min),
                _ => widths += 1.0,
            }
        }
    }
    1.0 - widths / total as f64
}
