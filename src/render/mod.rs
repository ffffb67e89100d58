mod html_writer;
mod json_writer;
mod null_writer;
mod plotly;

pub use html_writer::{DEFAULT_PLOTLY_SRC, HtmlFigureWriter};
pub use json_writer::JsonFigureWriter;
pub use null_writer::NullFigureWriter;
pub use plotly::figure_to_plotly;

use crate::core::Figure;
use crate::error::ChartResult;

/// Contract implemented by any figure artifact backend.
///
/// Writers receive a complete, immutable `Figure`; drawing itself is left to
/// whatever consumes the artifact.
pub trait FigureWriter {
    fn write(&mut self, figure: &Figure) -> ChartResult<()>;
}
