pub mod figure;
pub mod histogram;
pub mod record_set;
pub mod scalar;
pub mod series;
pub mod style;
pub mod trace;
pub mod types;

pub use figure::{Axis, AxisType, BarMode, Figure, FigureLayout, HoverMode, SubplotGrid};
pub use histogram::{HistogramBin, distribution_figure, histogram_bins};
pub use record_set::{RecordSet, Row};
pub use scalar::{Scalar, ScalarKey};
pub use series::{Series, derive_series, group_series, project_series};
pub use style::{Color, LineDash, LineStyle, MarkerStyle, MarkerSymbol};
pub use trace::{HistogramNormalization, ScatterMode, SubplotCell, Trace, TraceKind};
pub use types::ImageRef;
