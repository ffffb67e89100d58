use crate::core::Figure;
use crate::error::ChartResult;
use crate::render::FigureWriter;

/// No-op writer used by tests and headless runs.
///
/// It still validates the figure so tests catch malformed traces before an
/// artifact is produced.
#[derive(Debug, Default)]
pub struct NullFigureWriter {
    pub last_trace_count: usize,
    pub last_point_count: usize,
    pub writes: usize,
}

impl FigureWriter for NullFigureWriter {
    fn write(&mut self, figure: &Figure) -> ChartResult<()> {
        figure.validate()?;
        self.last_trace_count = figure.trace_count();
        self.last_point_count = figure.point_count();
        self.writes += 1;
        Ok(())
    }
}
