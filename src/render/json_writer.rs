use std::path::{Path, PathBuf};

use tracing::debug;

use crate::core::Figure;
use crate::error::{ChartError, ChartResult};
use crate::render::FigureWriter;

/// Writes the versioned figure JSON contract to a file.
#[derive(Debug, Clone)]
pub struct JsonFigureWriter {
    path: PathBuf,
}

impl JsonFigureWriter {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl FigureWriter for JsonFigureWriter {
    fn write(&mut self, figure: &Figure) -> ChartResult<()> {
        figure.validate()?;
        let payload = figure.to_json_contract_v1_pretty()?;
        std::fs::write(&self.path, payload).map_err(|source| ChartError::ArtifactWrite {
            path: self.path.display().to_string(),
            source,
        })?;
        debug!(path = %self.path.display(), traces = figure.trace_count(), "wrote figure json");
        Ok(())
    }
}
