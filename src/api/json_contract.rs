use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::core::Figure;
use crate::error::{ChartError, ChartResult};
use crate::interaction::{ControlKey, ControlValue};

use super::{Component, OutputSlot, OutputTarget};

pub const DASHBOARD_SNAPSHOT_JSON_SCHEMA_V1: u32 = 1;
pub const FIGURE_JSON_SCHEMA_V1: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControlEntry {
    pub key: ControlKey,
    pub value: ControlValue,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputEntry {
    pub target: OutputTarget,
    pub slot: OutputSlot,
}

/// Serializable view of a dashboard: static tree, current controls and
/// latest outputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardSnapshot {
    pub title: String,
    pub revision: u64,
    pub layout: Component,
    pub controls: Vec<ControlEntry>,
    pub outputs: Vec<OutputEntry>,
}

impl DashboardSnapshot {
    #[must_use]
    pub fn output(&self, target: &OutputTarget) -> Option<&OutputSlot> {
        self.outputs
            .iter()
            .find(|entry| &entry.target == target)
            .map(|entry| &entry.slot)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardSnapshotJsonContractV1 {
    pub schema_version: u32,
    pub snapshot: DashboardSnapshot,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FigureJsonContractV1 {
    pub schema_version: u32,
    pub figure: Figure,
}

/// A versioned wrapper around one payload type.
trait Versioned: Serialize + DeserializeOwned {
    type Payload: DeserializeOwned;
    const KIND: &'static str;
    const SCHEMA: u32;

    fn schema_version(&self) -> u32;
    fn into_payload(self) -> Self::Payload;
}

impl Versioned for DashboardSnapshotJsonContractV1 {
    type Payload = DashboardSnapshot;
    const KIND: &'static str = "snapshot";
    const SCHEMA: u32 = DASHBOARD_SNAPSHOT_JSON_SCHEMA_V1;

    fn schema_version(&self) -> u32 {
        self.schema_version
    }

    fn into_payload(self) -> DashboardSnapshot {
        self.snapshot
    }
}

impl Versioned for FigureJsonContractV1 {
    type Payload = Figure;
    const KIND: &'static str = "figure";
    const SCHEMA: u32 = FIGURE_JSON_SCHEMA_V1;

    fn schema_version(&self) -> u32 {
        self.schema_version
    }

    fn into_payload(self) -> Figure {
        self.figure
    }
}

fn encode<V: Versioned>(envelope: &V) -> ChartResult<String> {
    serde_json::to_string_pretty(envelope).map_err(|e| {
        ChartError::InvalidData(format!("failed to serialize {} contract v1: {e}", V::KIND))
    })
}

/// Accepts either the bare payload or a v1 envelope.
fn decode_compat<V: Versioned>(input: &str) -> ChartResult<V::Payload> {
    if let Ok(payload) = serde_json::from_str::<V::Payload>(input) {
        return Ok(payload);
    }
    let envelope: V = serde_json::from_str(input).map_err(|e| {
        ChartError::InvalidData(format!("failed to parse {} json payload: {e}", V::KIND))
    })?;
    if envelope.schema_version() != V::SCHEMA {
        return Err(ChartError::InvalidData(format!(
            "unsupported {} schema version: {}",
            V::KIND,
            envelope.schema_version()
        )));
    }
    Ok(envelope.into_payload())
}

impl DashboardSnapshot {
    pub fn to_json_contract_v1_pretty(&self) -> ChartResult<String> {
        encode(&DashboardSnapshotJsonContractV1 {
            schema_version: DASHBOARD_SNAPSHOT_JSON_SCHEMA_V1,
            snapshot: self.clone(),
        })
    }

    pub fn from_json_compat_str(input: &str) -> ChartResult<Self> {
        decode_compat::<DashboardSnapshotJsonContractV1>(input)
    }
}

impl Figure {
    pub fn to_json_contract_v1_pretty(&self) -> ChartResult<String> {
        encode(&FigureJsonContractV1 {
            schema_version: FIGURE_JSON_SCHEMA_V1,
            figure: self.clone(),
        })
    }

    pub fn from_json_compat_str(input: &str) -> ChartResult<Self> {
        decode_compat::<FigureJsonContractV1>(input)
    }
}
