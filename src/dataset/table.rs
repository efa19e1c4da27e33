//! Transaction table
//!
//! Row-oriented, column-typed storage for the raw transaction data.
//! Column order is the canonical feature order. The table is read-only
//! during mining; metric computation consumes it through random access
//! by (row, column).

use crate::error::DatasetError;

/// One typed column of transaction data
///
/// Categorical columns are interned: rows store a code into the ordered
/// category list.
#[derive(Debug, Clone)]
pub enum Column {
    /// Continuous values
    Float(Vec<f64>),
    /// Integer values
    Int(Vec<i64>),
    /// Category codes into an ordered category list
    Categorical {
        codes: Vec<u32>,
        categories: Vec<String>,
    },
}

impl Column {
    fn len(&self) -> usize {
        match self {
            Column::Float(values) => values.len(),
            Column::Int(values) => values.len(),
            Column::Categorical { codes, .. } => codes.len(),
        }
    }

    /// Observed min/max of a numeric column, `None` for categorical or
    /// empty columns.
    fn range(&self) -> Option<(f64, f64)> {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        match self {
            Column::Float(values) => {
                if values.is_empty() {
                    return None;
                }
                for &v in values {
                    min = min.min(v);
                    max = max.max(v);
                }
            }
            Column::Int(values) => {
                if values.is_empty() {
                    return None;
                }
                for &v in values {
                    min = min.min(v as f64);
                    max = max.max(v as f64);
                }
            }
            Column::Categorical { .. } => return None,
        }
        Some((min, max))
    }
}

/// A single raw cell value, borrowed from its column
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value<'a> {
    Float(f64),
    Int(i64),
    Categorical(&'a str),
}

impl Value<'_> {
    /// Numeric view of the value, `None` for categories
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(v) => Some(*v),
            Value::Int(v) => Some(*v as f64),
            Value::Categorical(_) => None,
        }
    }
}

/// Read-only, column-typed table of transactions
#[derive(Debug, Clone)]
pub struct TransactionTable {
    names: Vec<String>,
    columns: Vec<Column>,
    // observed numeric ranges, fixed at construction
    ranges: Vec<Option<(f64, f64)>>,
    rows: usize,
}

impl TransactionTable {
    /// Create a table from named columns
    ///
    /// All columns must have the same length.
    pub fn new(names: Vec<String>, columns: Vec<Column>) -> Result<Self, DatasetError> {
        let rows = columns.first().map(Column::len).unwrap_or(0);
        for column in &columns {
            if column.len() != rows {
                return Err(DatasetError::ColumnLengths {
                    expected: rows,
                    actual: column.len(),
                });
            }
        }
        let ranges = columns.iter().map(Column::range).collect();
        Ok(Self {
            names,
            columns,
            ranges,
            rows,
        })
    }

    /// Number of transactions
    pub fn len(&self) -> usize {
        self.rows
    }

    /// Whether the table holds no transactions
    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    /// Number of columns
    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    /// Index of the column with the given name
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    /// Column by index
    pub fn column(&self, index: usize) -> Option<&Column> {
        self.columns.get(index)
    }

    /// Raw value at (row, column)
    pub fn value(&self, row: usize, column: usize) -> Option<Value<'_>> {
        if row >= self.rows {
            return None;
        }
        match self.columns.get(column)? {
            Column::Float(values) => Some(Value::Float(values[row])),
            Column::Int(values) => Some(Value::Int(values[row])),
            Column::Categorical { codes, categories } => {
                Some(Value::Categorical(&categories[codes[row] as usize]))
            }
        }
    }

    /// Observed min/max of a numeric column, computed from the stored
    /// transactions rather than any feature metadata
    pub fn observed_range(&self, column: usize) -> Option<(f64, f64)> {
        self.ranges.get(column).copied().flatten()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> TransactionTable {
        TransactionTable::new(
            vec!["size".to_string(), "color".to_string()],
            vec![
                Column::Float(vec![1.5, 2.5, 3.5]),
                Column::Categorical {
                    codes: vec![0, 1, 0],
                    categories: vec!["blue".to_string(), "red".to_string()],
                },
            ],
        )
        .expect("valid table")
    }

    #[test]
    fn test_dimensions() {
        let t = table();
        assert_eq!(t.len(), 3);
        assert_eq!(t.num_columns(), 2);
        assert!(!t.is_empty());
    }

    #[test]
    fn test_column_index() {
        let t = table();
        assert_eq!(t.column_index("size"), Some(0));
        assert_eq!(t.column_index("color"), Some(1));
        assert_eq!(t.column_index("weight"), None);
    }

    #[test]
    fn test_value_access() {
        let t = table();
        assert_eq!(t.value(0, 0), Some(Value::Float(1.5)));
        assert_eq!(t.value(1, 1), Some(Value::Categorical("red")));
        assert_eq!(t.value(3, 0), None);
        assert_eq!(t.value(0, 2), None);
    }

    #[test]
    fn test_observed_range() {
        let t = table();
        assert_eq!(t.observed_range(0), Some((1.5, 3.5)));
        assert_eq!(t.observed_range(1), None);
    }

    #[test]
    fn test_degenerate_range() {
        let t = TransactionTable::new(
            vec!["constant".to_string()],
            vec![Column::Int(vec![7, 7, 7])],
        )
        .expect("valid table");
        assert_eq!(t.observed_range(0), Some((7.0, 7.0)));
    }

    #[test]
    fn test_mismatched_column_lengths() {
        let result = TransactionTable::new(
            vec!["a".to_string(), "b".to_string()],
            vec![Column::Int(vec![1, 2]), Column::Int(vec![1])],
        );
        assert!(matches!(
            result,
            Err(DatasetError::ColumnLengths {
                expected: 2,
                actual: 1
            })
        ));
    }

    #[test]
    fn test_as_f64() {
        assert_eq!(Value::Float(1.25).as_f64(), Some(1.25));
        assert_eq!(Value::Int(-3).as_f64(), Some(-3.0));
        assert_eq!(Value::Categorical("x").as_f64(), None);
    }
}
