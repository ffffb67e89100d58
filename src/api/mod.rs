//! Dashboard runtime: component tree, binding table, evaluator, shared
//! state store, auth gate and serializable snapshots.

mod auth;
mod binding;
mod component;
mod dashboard;
mod dashboard_config;
mod evaluator;
mod json_contract;
mod registry;
mod state_store;

pub use auth::BasicAuth;
pub use binding::{
    Binding, BindingError, BindingOutcome, BindingResult, InputSnapshot, MissingInputPolicy,
    OutputTarget, OutputValue,
};
pub use component::{Component, ControlOption, SliderMark, Style};
pub use dashboard::Dashboard;
pub use dashboard_config::{Credential, DashboardConfig};
pub use evaluator::{EvaluatedOutput, EvaluationOutcome, EvaluationReport, Evaluator};
pub use json_contract::{
    ControlEntry, DASHBOARD_SNAPSHOT_JSON_SCHEMA_V1, DashboardSnapshot,
    DashboardSnapshotJsonContractV1, FIGURE_JSON_SCHEMA_V1, FigureJsonContractV1, OutputEntry,
};
pub use registry::BindingRegistry;
pub use state_store::{OutputSlot, OutputStatus, StateStore};
