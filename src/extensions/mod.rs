//! Replaceable I/O collaborators and the tutorial dashboard wiring.

pub mod demo;
mod image_resolver;
mod record_loader;
mod report;

pub use demo::{
    DemoData, demo_bindings, demo_layout, density_text, feature_figure, hover_line_figure,
    hover_stats, year_figure,
};
pub use image_resolver::{ImageResolver, RecordImageResolver};
pub use record_loader::{CsvRecordSetLoader, RecordSetLoader};
pub use report::{ReportFigure, report_figures};
