use std::io::Read;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::core::{RecordSet, Row, Scalar};
use crate::error::{ChartError, ChartResult};

/// Loads a record set from a storage location.
pub trait RecordSetLoader {
    fn load(&self, location: &str) -> ChartResult<RecordSet>;
}

/// CSV loader: first line holds column names, numeric cells become numbers.
#[derive(Debug, Clone)]
pub struct CsvRecordSetLoader {
    base_dir: Option<PathBuf>,
    delimiter: u8,
}

impl Default for CsvRecordSetLoader {
    fn default() -> Self {
        Self {
            base_dir: None,
            delimiter: b',',
        }
    }
}

impl CsvRecordSetLoader {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolves relative locations against `base_dir`.
    #[must_use]
    pub fn with_base_dir(mut self, base_dir: impl Into<PathBuf>) -> Self {
        self.base_dir = Some(base_dir.into());
        self
    }

    #[must_use]
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    fn resolve(&self, location: &str) -> PathBuf {
        let path = Path::new(location);
        match &self.base_dir {
            Some(base) if path.is_relative() => base.join(path),
            _ => path.to_path_buf(),
        }
    }

    /// Parses CSV text already in memory.
    pub fn parse_str(&self, location: &str, input: &str) -> ChartResult<RecordSet> {
        self.parse_reader(location, input.as_bytes())
    }

    fn parse_reader<R: Read>(&self, location: &str, reader: R) -> ChartResult<RecordSet> {
        let unavailable = |reason: String| ChartError::RecordSetUnavailable {
            location: location.to_owned(),
            reason,
        };

        let mut reader = csv::ReaderBuilder::new()
            .delimiter(self.delimiter)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let columns: Vec<String> = reader
            .headers()
            .map_err(|e| unavailable(e.to_string()))?
            .iter()
            .map(str::to_owned)
            .collect();

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record.map_err(|e| unavailable(e.to_string()))?;
            let row: Row = columns
                .iter()
                .cloned()
                .zip(record.iter().map(Scalar::parse))
                .collect();
            rows.push(row);
        }

        RecordSet::new(columns, rows).map_err(|e| unavailable(e.to_string()))
    }
}

impl RecordSetLoader for CsvRecordSetLoader {
    fn load(&self, location: &str) -> ChartResult<RecordSet> {
        let path = self.resolve(location);
        let file = std::fs::File::open(&path).map_err(|e| ChartError::RecordSetUnavailable {
            location: path.display().to_string(),
            reason: e.to_string(),
        })?;
        let records = self.parse_reader(&path.display().to_string(), file)?;
        debug!(
            location = %path.display(),
            rows = records.len(),
            columns = records.columns().len(),
            "loaded record set"
        );
        Ok(records)
    }
}
