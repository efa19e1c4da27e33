//! Rule collection
//!
//! An ordered, index-addressable container of discovered rules with
//! sort, aggregate and export operations.

use std::fmt;
use std::ops::Index;
use std::path::Path;

use tracing::warn;

use crate::error::DatasetError;
use crate::rule::metrics::Metric;
use crate::rule::{format_side, Attribute, Predicate, Rule};

/// Ordered collection of mined rules
///
/// Append-only during search, re-sortable afterwards by fitness or any
/// metric.
#[derive(Debug, Clone, Default)]
pub struct RuleList<P: Predicate = Attribute> {
    rules: Vec<Rule<P>>,
}

impl<P: Predicate> RuleList<P> {
    /// Create an empty collection
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Number of stored rules
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether the collection is empty
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Append a rule
    pub fn push(&mut self, rule: Rule<P>) {
        self.rules.push(rule);
    }

    /// Whether an equal rule (by antecedent and consequent content) is
    /// already stored
    pub fn contains(&self, rule: &Rule<P>) -> bool {
        self.rules.iter().any(|r| r == rule)
    }

    /// Iterate over the rules in collection order
    pub fn iter(&self) -> std::slice::Iter<'_, Rule<P>> {
        self.rules.iter()
    }

    /// Stable sort by fitness
    pub fn sort_by_fitness(&mut self, descending: bool) {
        self.rules.sort_by(|a, b| {
            if descending {
                b.fitness.total_cmp(&a.fitness)
            } else {
                a.fitness.total_cmp(&b.fitness)
            }
        });
    }

    /// Stable sort by a metric
    pub fn sort_by_metric(&mut self, metric: Metric, descending: bool) {
        self.rules.sort_by(|a, b| {
            let x = metric.evaluate(a);
            let y = metric.evaluate(b);
            if descending {
                y.total_cmp(&x)
            } else {
                x.total_cmp(&y)
            }
        });
    }

    /// The metric's value for every rule, in collection order
    pub fn metric_values(&self, metric: Metric) -> Vec<f64> {
        self.rules.iter().map(|r| metric.evaluate(r)).collect()
    }

    /// Rule with the smallest value of the metric
    pub fn min(&self, metric: Metric) -> Option<&Rule<P>> {
        self.rules
            .iter()
            .min_by(|a, b| metric.evaluate(a).total_cmp(&metric.evaluate(b)))
    }

    /// Rule with the largest value of the metric
    pub fn max(&self, metric: Metric) -> Option<&Rule<P>> {
        self.rules
            .iter()
            .max_by(|a, b| metric.evaluate(a).total_cmp(&metric.evaluate(b)))
    }

    /// Mean of the metric across all rules, `None` when empty
    pub fn mean(&self, metric: Metric) -> Option<f64> {
        if self.rules.is_empty() {
            return None;
        }
        let sum: f64 = self.rules.iter().map(|r| metric.evaluate(r)).sum();
        Some(sum / self.rules.len() as f64)
    }

    /// Population standard deviation of the metric, `None` when empty
    pub fn std(&self, metric: Metric) -> Option<f64> {
        let mean = self.mean(metric)?;
        let variance: f64 = self
            .rules
            .iter()
            .map(|r| {
                let deviation = metric.evaluate(r) - mean;
                deviation * deviation
            })
            .sum::<f64>()
            / self.rules.len() as f64;
        Some(variance.sqrt())
    }

    /// Mean fitness across all rules, `None` when empty
    pub fn mean_fitness(&self) -> Option<f64> {
        if self.rules.is_empty() {
            return None;
        }
        Some(self.rules.iter().map(|r| r.fitness).sum::<f64>() / self.rules.len() as f64)
    }

    /// Export the rules as CSV
    ///
    /// The header row is `antecedent,consequent,fitness` followed by
    /// every metric name; antecedent and consequent cells are bracketed,
    /// comma-joined attribute display forms. Exporting an empty
    /// collection writes nothing at all.
    pub fn to_csv<Q: AsRef<Path>>(&self, path: Q) -> Result<(), DatasetError> {
        if self.is_empty() {
            warn!("no rules to export");
            return Ok(());
        }

        let mut writer = csv::Writer::from_path(path)?;
        let mut header = vec![
            "antecedent".to_string(),
            "consequent".to_string(),
            "fitness".to_string(),
        ];
        header.extend(Metric::ALL.iter().map(|m| m.name().to_string()));
        writer.write_record(&header)?;

        for rule in &self.rules {
            let mut record = vec![
                format_side(rule.antecedent()),
                format_side(rule.consequent()),
                rule.fitness.to_string(),
            ];
            record.extend(Metric::ALL.iter().map(|m| m.evaluate(rule).to_string()));
            writer.write_record(&record)?;
        }
        writer.flush().map_err(DatasetError::Io)?;
        Ok(())
    }
}

impl<P: Predicate> Index<usize> for RuleList<P> {
    type Output = Rule<P>;

    fn index(&self, index: usize) -> &Self::Output {
        &self.rules[index]
    }
}

impl<'a, P: Predicate> IntoIterator for &'a RuleList<P> {
    type Item = &'a Rule<P>;
    type IntoIter = std::slice::Iter<'a, Rule<P>>;

    fn into_iter(self) -> Self::IntoIter {
        self.rules.iter()
    }
}

impl<P: Predicate> fmt::Display for RuleList<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "[]");
        }
        writeln!(f, "STATS:")?;
        writeln!(f, "Total rules: {}", self.len())?;
        writeln!(
            f,
            "Average fitness: {}",
            self.mean_fitness().unwrap_or(f64::NAN)
        )?;
        for metric in Metric::ALL {
            writeln!(
                f,
                "Average {}: {}",
                metric.name(),
                self.mean(metric).unwrap_or(f64::NAN)
            )?;
        }
        let antecedent_length: usize = self.rules.iter().map(|r| r.antecedent().len()).sum();
        let consequent_length: usize = self.rules.iter().map(|r| r.consequent().len()).sum();
        writeln!(
            f,
            "Average antecedent length: {}",
            antecedent_length as f64 / self.len() as f64
        )?;
        writeln!(
            f,
            "Average consequent length: {}",
            consequent_length as f64 / self.len() as f64
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Dataset;
    use crate::rule::Constraint;

    const WIKI_CSV: &str = "Feat1,Feat2\nA,0\nA,0\nA,1\nA,0\nB,1\nB,0\nB,1\n";

    fn sample_list() -> RuleList {
        let dataset = Dataset::from_reader(WIKI_CSV.as_bytes(), true).expect("load wiki dataset");
        let mut one = Rule::new(
            vec![Attribute::new("Feat1", Constraint::Category("A".to_string()))],
            vec![Attribute::new("Feat2", Constraint::IntRange { low: 0, high: 0 })],
            dataset.table(),
        );
        one.fitness = 0.6;
        let mut two = Rule::new(
            vec![Attribute::new("Feat1", Constraint::Category("B".to_string()))],
            vec![Attribute::new("Feat2", Constraint::IntRange { low: 1, high: 1 })],
            dataset.table(),
        );
        two.fitness = 0.4;
        let mut list = RuleList::new();
        list.push(one);
        list.push(two);
        list
    }

    #[test]
    fn test_push_and_index() {
        let list = sample_list();
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].fitness, 0.6);
        assert_eq!(list[1].fitness, 0.4);
    }

    #[test]
    fn test_contains() {
        let list = sample_list();
        let duplicate = list[0].clone();
        assert!(list.contains(&duplicate));
    }

    #[test]
    fn test_sort_by_fitness() {
        let mut list = sample_list();
        list.sort_by_fitness(false);
        assert_eq!(list[0].fitness, 0.4);
        list.sort_by_fitness(true);
        assert_eq!(list[0].fitness, 0.6);
    }

    #[test]
    fn test_sort_by_metric() {
        let mut list = sample_list();
        list.sort_by_metric(Metric::Support, true);
        assert_eq!(list[0].support(), 3.0 / 7.0);
        list.sort_by_metric(Metric::Support, false);
        assert_eq!(list[0].support(), 2.0 / 7.0);
    }

    #[test]
    fn test_aggregates() {
        let list = sample_list();
        let mean = list.mean(Metric::Support).expect("non-empty");
        assert!((mean - (3.0 / 7.0 + 2.0 / 7.0) / 2.0).abs() < 1e-12);

        let std = list.std(Metric::Support).expect("non-empty");
        assert!((std - 0.5 / 7.0).abs() < 1e-12);

        assert_eq!(
            list.max(Metric::Support).map(|r| r.support()),
            Some(3.0 / 7.0)
        );
        assert_eq!(
            list.min(Metric::Support).map(|r| r.support()),
            Some(2.0 / 7.0)
        );

        let values = list.metric_values(Metric::Confidence);
        assert_eq!(values, vec![3.0 / 4.0, 2.0 / 3.0]);
    }

    #[test]
    fn test_empty_aggregates() {
        let list: RuleList = RuleList::new();
        assert_eq!(list.mean(Metric::Support), None);
        assert_eq!(list.std(Metric::Support), None);
        assert!(list.min(Metric::Support).is_none());
        assert_eq!(list.to_string(), "[]");
    }

    #[test]
    fn test_to_csv() {
        let list = sample_list();
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("rules.csv");
        list.to_csv(&path).expect("export");

        let contents = std::fs::read_to_string(&path).expect("read back");
        let mut lines = contents.lines();
        let header = lines.next().expect("header");
        assert!(header.starts_with("antecedent,consequent,fitness,support,confidence,lift"));
        let first = lines.next().expect("first rule");
        assert!(first.contains("[Feat1(A)]"));
        assert!(first.contains("[Feat2(0)]"));
        assert_eq!(contents.lines().count(), 3);
    }

    #[test]
    fn test_empty_export_writes_nothing() {
        let list: RuleList = RuleList::new();
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("rules.csv");
        list.to_csv(&path).expect("no-op export");
        assert!(!path.exists());
    }

    #[test]
    fn test_summary_display() {
        let list = sample_list();
        let summary = list.to_string();
        assert!(summary.contains("Total rules: 2"));
        assert!(summary.contains("Average fitness: 0.5"));
        assert!(summary.contains("Average antecedent length: 1"));
    }
}
