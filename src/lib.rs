//! plotboard: chart descriptors over tabular data plus a reactive binding
//! evaluator for single-page dashboards.
//!
//! The crate keeps a strict split between the immutable data model
//! (`core`), control-state events (`interaction`), the dashboard runtime
//! (`api`), replaceable I/O collaborators (`extensions`) and figure artifact
//! writers (`render`).

pub mod api;
pub mod core;
pub mod error;
pub mod extensions;
pub mod interaction;
pub mod render;
pub mod telemetry;

pub use api::{Dashboard, DashboardConfig};
pub use error::{ChartError, ChartResult};
