//! Dataset loading
//!
//! This module loads CSV transaction data, infers a datatype per column
//! and derives the feature list and the optimization problem dimension.

pub mod feature;
pub mod table;

use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::DatasetError;
use feature::{Domain, Feature};
use table::{Column, TransactionTable};

pub mod prelude {
    pub use super::feature::{Domain, Feature};
    pub use super::table::{Column, TransactionTable, Value};
    pub use super::Dataset;
}

/// A transaction dataset: the typed table plus its feature descriptions
///
/// Column types are inferred on load: a column where every field parses
/// as an integer becomes `Int`, booleans are coerced to 0/1 integers,
/// remaining numeric columns become `Float`, everything else becomes
/// `Categorical` with a sorted category list.
#[derive(Debug, Clone)]
pub struct Dataset {
    features: Vec<Feature>,
    table: TransactionTable,
}

impl Dataset {
    /// Load a dataset from a CSV file with a header row
    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<Self, DatasetError> {
        Self::from_reader(File::open(path)?, true)
    }

    /// Load a dataset from a headerless CSV file, naming columns
    /// `Feature0..FeatureN`
    pub fn from_csv_headerless<P: AsRef<Path>>(path: P) -> Result<Self, DatasetError> {
        Self::from_reader(File::open(path)?, false)
    }

    /// Load a dataset from any CSV reader
    pub fn from_reader<R: Read>(reader: R, has_headers: bool) -> Result<Self, DatasetError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(has_headers)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut names: Vec<String> = if has_headers {
            csv_reader.headers()?.iter().map(str::to_string).collect()
        } else {
            Vec::new()
        };

        let mut cells: Vec<Vec<String>> = vec![Vec::new(); names.len()];
        for (index, record) in csv_reader.records().enumerate() {
            let record = record?;
            if cells.is_empty() {
                cells = vec![Vec::new(); record.len()];
            }
            if record.len() != cells.len() {
                return Err(DatasetError::RaggedRow {
                    row: index,
                    expected: cells.len(),
                    actual: record.len(),
                });
            }
            for (column, field) in record.iter().enumerate() {
                cells[column].push(field.to_string());
            }
        }

        if cells.is_empty() || cells[0].is_empty() {
            return Err(DatasetError::EmptyTable);
        }
        if names.is_empty() {
            names = (0..cells.len()).map(|i| format!("Feature{}", i)).collect();
        }

        let mut features = Vec::with_capacity(cells.len());
        let mut columns = Vec::with_capacity(cells.len());
        for (name, raw) in names.iter().zip(&cells) {
            let (domain, column) = infer_column(raw);
            features.push(Feature::new(name.clone(), domain));
            columns.push(column);
        }

        let table = TransactionTable::new(names, columns)?;
        Ok(Self { features, table })
    }

    /// Ordered feature list, one entry per column
    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    /// The transaction table
    pub fn table(&self) -> &TransactionTable {
        &self.table
    }

    /// Dimension of the optimization problem for this dataset:
    /// one permutation slot per feature, one cut slot, plus the
    /// per-feature attribute slots.
    pub fn dimension(&self) -> usize {
        self.features.len()
            + 1
            + self
                .features
                .iter()
                .map(|f| f.domain().slot_width())
                .sum::<usize>()
    }
}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "DATASET INFO:")?;
        writeln!(f, "Number of transactions: {}", self.table.len())?;
        writeln!(f, "Number of features: {}", self.features.len())?;
        writeln!(f)?;
        writeln!(f, "FEATURE INFO:")?;
        for feature in &self.features {
            writeln!(f, "{}", feature)?;
        }
        Ok(())
    }
}

/// Infer the domain and typed storage of one column from its raw fields
fn infer_column(raw: &[String]) -> (Domain, Column) {
    if raw.iter().all(|field| is_bool(field)) {
        // bool columns are coerced to 0/1 integers
        let values: Vec<i64> = raw
            .iter()
            .map(|field| i64::from(field.eq_ignore_ascii_case("true")))
            .collect();
        return (Domain::Int { min: 0, max: 1 }, Column::Int(values));
    }

    if let Some(values) = parse_all::<i64>(raw) {
        let min = values.iter().copied().min().unwrap_or(0);
        let max = values.iter().copied().max().unwrap_or(0);
        return (Domain::Int { min, max }, Column::Int(values));
    }

    if let Some(values) = parse_all::<f64>(raw) {
        let (min, max) = values.iter().fold(
            (f64::INFINITY, f64::NEG_INFINITY),
            |(min, max), &v| (min.min(v), max.max(v)),
        );
        return (Domain::Float { min, max }, Column::Float(values));
    }

    let mut categories: Vec<String> = raw.to_vec();
    categories.sort();
    categories.dedup();
    let codes = raw
        .iter()
        .map(|field| {
            categories
                .iter()
                .position(|c| c == field)
                .unwrap_or(0) as u32
        })
        .collect();
    (
        Domain::Categorical {
            categories: categories.clone(),
        },
        Column::Categorical { codes, categories },
    )
}

fn is_bool(field: &str) -> bool {
    field.eq_ignore_ascii_case("true") || field.eq_ignore_ascii_case("false")
}

fn parse_all<T: std::str::FromStr>(raw: &[String]) -> Option<Vec<T>> {
    raw.iter().map(|field| field.parse::<T>().ok()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_inference() {
        let csv = "age,height,name,member\n25,1.75,ana,true\n30,1.60,bo,false\n25,1.80,ana,true\n";
        let dataset = Dataset::from_reader(csv.as_bytes(), true).expect("load");

        assert_eq!(dataset.features().len(), 4);
        assert_eq!(
            dataset.features()[0],
            Feature::new("age", Domain::Int { min: 25, max: 30 })
        );
        assert_eq!(
            dataset.features()[1],
            Feature::new("height", Domain::Float { min: 1.6, max: 1.8 })
        );
        assert_eq!(
            dataset.features()[2],
            Feature::new(
                "name",
                Domain::Categorical {
                    categories: vec!["ana".to_string(), "bo".to_string()]
                }
            )
        );
        // bool coerced to 0/1 int
        assert_eq!(
            dataset.features()[3],
            Feature::new("member", Domain::Int { min: 0, max: 1 })
        );
        assert_eq!(dataset.table().value(0, 3), Some(table::Value::Int(1)));
        assert_eq!(dataset.table().value(1, 3), Some(table::Value::Int(0)));
    }

    #[test]
    fn test_dimension() {
        // 1 categorical (2 slots) + 1 int (3 slots) + 2 permutation + 1 cut
        let csv = "Feat1,Feat2\nA,0\nB,1\n";
        let dataset = Dataset::from_reader(csv.as_bytes(), true).expect("load");
        assert_eq!(dataset.dimension(), 8);
    }

    #[test]
    fn test_headerless_names() {
        let csv = "1,x\n2,y\n";
        let dataset = Dataset::from_reader(csv.as_bytes(), false).expect("load");
        assert_eq!(dataset.features()[0].name(), "Feature0");
        assert_eq!(dataset.features()[1].name(), "Feature1");
    }

    #[test]
    fn test_empty_table_rejected() {
        let csv = "a,b\n";
        let result = Dataset::from_reader(csv.as_bytes(), true);
        assert!(matches!(result, Err(DatasetError::EmptyTable)));
    }

    #[test]
    fn test_ragged_row_rejected() {
        let csv = "a,b\n1,2\n3\n";
        let result = Dataset::from_reader(csv.as_bytes(), true);
        assert!(matches!(
            result,
            Err(DatasetError::RaggedRow {
                row: 1,
                expected: 2,
                actual: 1
            })
        ));
    }

    #[test]
    fn test_mixed_numeric_column_is_float() {
        let csv = "x\n1\n2.5\n3\n";
        let dataset = Dataset::from_reader(csv.as_bytes(), true).expect("load");
        assert_eq!(
            dataset.features()[0],
            Feature::new("x", Domain::Float { min: 1.0, max: 3.0 })
        );
    }

    #[test]
    fn test_display_report() {
        let csv = "Feat1,Feat2\nA,0\nB,1\n";
        let dataset = Dataset::from_reader(csv.as_bytes(), true).expect("load");
        let report = dataset.to_string();
        assert!(report.contains("Number of transactions: 2"));
        assert!(report.contains("Number of features: 2"));
        assert!(report.contains("Feat2: int [0, 1]"));
    }
}
