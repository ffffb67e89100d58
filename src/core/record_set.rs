use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

use crate::core::Scalar;
use crate::error::{ChartError, ChartResult};

/// One record: column name to cell value, in column order.
pub type Row = IndexMap<String, Scalar>;

/// Ordered, immutable table of records.
///
/// Every row carries exactly the declared columns. Filtering and derived
/// columns always produce a new record set; nothing is patched in place.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordSet {
    columns: Vec<String>,
    rows: Vec<Row>,
}

impl RecordSet {
    pub fn new(columns: Vec<String>, rows: Vec<Row>) -> ChartResult<Self> {
        let mut seen = IndexSet::with_capacity(columns.len());
        for column in &columns {
            if column.is_empty() {
                return Err(ChartError::InvalidData(
                    "record set column name must not be empty".to_owned(),
                ));
            }
            if !seen.insert(column.as_str()) {
                return Err(ChartError::InvalidData(format!(
                    "duplicate record set column `{column}`"
                )));
            }
        }

        for (index, row) in rows.iter().enumerate() {
            if row.len() != columns.len() || !columns.iter().all(|c| row.contains_key(c)) {
                return Err(ChartError::InvalidData(format!(
                    "row {index} does not match the declared columns"
                )));
            }
        }

        Ok(Self { columns, rows })
    }

    /// Builds a record set from positional rows.
    pub fn from_rows(columns: &[&str], rows: Vec<Vec<Scalar>>) -> ChartResult<Self> {
        let columns: Vec<String> = columns.iter().map(|c| (*c).to_owned()).collect();
        let mut keyed = Vec::with_capacity(rows.len());
        for (index, cells) in rows.into_iter().enumerate() {
            if cells.len() != columns.len() {
                return Err(ChartError::InvalidData(format!(
                    "row {index} has {} cells, expected {}",
                    cells.len(),
                    columns.len()
                )));
            }
            keyed.push(columns.iter().cloned().zip(cells).collect::<Row>());
        }
        Self::new(columns, keyed)
    }

    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    #[must_use]
    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    #[must_use]
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    #[must_use]
    pub fn row(&self, index: usize) -> Option<&Row> {
        self.rows.get(index)
    }

    #[must_use]
    pub fn value(&self, index: usize, column: &str) -> Option<&Scalar> {
        self.rows.get(index).and_then(|row| row.get(column))
    }

    /// Returns the cells of one column, or `None` when the column is absent.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<Vec<Scalar>> {
        if !self.has_column(name) {
            return None;
        }
        Some(
            self.rows
                .iter()
                .filter_map(|row| row.get(name).cloned())
                .collect(),
        )
    }

    /// Numeric cells of one column; text cells are skipped.
    #[must_use]
    pub fn numeric_column(&self, name: &str) -> Vec<f64> {
        self.rows
            .iter()
            .filter_map(|row| row.get(name).and_then(Scalar::as_f64))
            .collect()
    }

    /// Distinct values of a column in first-appearance order.
    #[must_use]
    pub fn unique(&self, name: &str) -> Vec<Scalar> {
        let mut seen = IndexSet::new();
        let mut values = Vec::new();
        for cell in self.rows.iter().filter_map(|row| row.get(name)) {
            if seen.insert(cell.key()) {
                values.push(cell.clone());
            }
        }
        values
    }

    #[must_use]
    pub fn filter<P>(&self, predicate: P) -> Self
    where
        P: Fn(&Row) -> bool,
    {
        Self {
            columns: self.columns.clone(),
            rows: self.rows.iter().filter(|row| predicate(row)).cloned().collect(),
        }
    }

    /// Rows whose `column` equals `value`. An absent column matches nothing.
    #[must_use]
    pub fn filter_eq(&self, column: &str, value: &Scalar) -> Self {
        self.filter(|row| row.get(column) == Some(value))
    }

    #[must_use]
    pub fn numeric_min(&self, column: &str) -> Option<f64> {
        self.numeric_column(column).into_iter().reduce(f64::min)
    }

    #[must_use]
    pub fn numeric_max(&self, column: &str) -> Option<f64> {
        self.numeric_column(column).into_iter().reduce(f64::max)
    }

    /// Returns a copy with `name` computed per row, replacing an existing
    /// column of the same name.
    pub fn with_column<F>(&self, name: &str, derive: F) -> ChartResult<Self>
    where
        F: Fn(usize, &Row) -> Scalar,
    {
        if name.is_empty() {
            return Err(ChartError::InvalidData(
                "record set column name must not be empty".to_owned(),
            ));
        }

        let mut columns = self.columns.clone();
        if !self.has_column(name) {
            columns.push(name.to_owned());
        }
        let rows = self
            .rows
            .iter()
            .enumerate()
            .map(|(index, row)| {
                let mut next = row.clone();
                next.insert(name.to_owned(), derive(index, row));
                next
            })
            .collect();

        Ok(Self { columns, rows })
    }
}
