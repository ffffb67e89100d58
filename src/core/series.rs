use serde::{Deserialize, Serialize};

use crate::core::{RecordSet, Row, Scalar};
use crate::error::{ChartError, ChartResult};

/// Named pair of equal-length coordinate sequences.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Series {
    pub name: String,
    pub x: Vec<Scalar>,
    pub y: Vec<Scalar>,
}

impl Series {
    pub fn new(name: impl Into<String>, x: Vec<Scalar>, y: Vec<Scalar>) -> ChartResult<Self> {
        if x.len() != y.len() {
            return Err(ChartError::InvalidData(format!(
                "series x/y lengths differ: {} vs {}",
                x.len(),
                y.len()
            )));
        }
        Ok(Self {
            name: name.into(),
            x,
            y,
        })
    }

    #[must_use]
    pub fn empty(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            x: Vec::new(),
            y: Vec::new(),
        }
    }

    pub fn from_numbers(name: impl Into<String>, x: &[f64], y: &[f64]) -> ChartResult<Self> {
        Self::new(
            name,
            x.iter().copied().map(Scalar::Number).collect(),
            y.iter().copied().map(Scalar::Number).collect(),
        )
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.x.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// Numeric `(x, y)` pairs; pairs with a text coordinate are skipped.
    #[must_use]
    pub fn numeric_points(&self) -> Vec<(f64, f64)> {
        self.x
            .iter()
            .zip(&self.y)
            .filter_map(|(x, y)| Some((x.as_f64()?, y.as_f64()?)))
            .collect()
    }
}

/// Projects two columns of every record into a series.
///
/// An absent column yields an empty series rather than an error.
#[must_use]
pub fn project_series(
    records: &RecordSet,
    x_column: &str,
    y_column: &str,
    name: impl Into<String>,
) -> Series {
    derive_series(records, |_| true, x_column, y_column, name)
}

/// Filters records by `predicate` and projects two columns into a series.
#[must_use]
pub fn derive_series<P>(
    records: &RecordSet,
    predicate: P,
    x_column: &str,
    y_column: &str,
    name: impl Into<String>,
) -> Series
where
    P: Fn(&Row) -> bool,
{
    let name = name.into();
    if !records.has_column(x_column) || !records.has_column(y_column) {
        return Series::empty(name);
    }

    let mut x = Vec::new();
    let mut y = Vec::new();
    for row in records.rows().iter().filter(|row| predicate(row)) {
        if let (Some(x_value), Some(y_value)) = (row.get(x_column), row.get(y_column)) {
            x.push(x_value.clone());
            y.push(y_value.clone());
        }
    }

    Series { name, x, y }
}

/// One series per category of `group_column`, in `categories` order.
///
/// Categories with no matching rows produce empty series.
#[must_use]
pub fn group_series(
    records: &RecordSet,
    group_column: &str,
    categories: &[Scalar],
    x_column: &str,
    y_column: &str,
) -> Vec<Series> {
    categories
        .iter()
        .map(|category| {
            derive_series(
                records,
                |row| row.get(group_column) == Some(category),
                x_column,
                y_column,
                category.to_string(),
            )
        })
        .collect()
}
