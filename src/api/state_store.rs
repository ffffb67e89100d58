use std::sync::{PoisonError, RwLock};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::interaction::{ChangeEvent, ControlKey, ControlValue};

use super::{OutputTarget, OutputValue};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum OutputStatus {
    /// No evaluation has published anything yet.
    #[default]
    Pending,
    /// The value came from the latest successful evaluation.
    Fresh,
    /// The latest evaluation failed; `value` still holds the previous result.
    NoResult { reason: String },
}

/// Current state of one output target.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct OutputSlot {
    pub value: Option<OutputValue>,
    pub status: OutputStatus,
    /// Control-state revision of the snapshot that produced `status`.
    pub revision: u64,
}

#[derive(Debug, Default)]
struct ControlState {
    values: IndexMap<ControlKey, ControlValue>,
    revision: u64,
}

/// Shared control-state and output-state store.
///
/// Control writes and snapshot capture happen under one write lock, and each
/// output publication is a single write, so readers never observe torn state.
#[derive(Debug)]
pub struct StateStore {
    controls: RwLock<ControlState>,
    outputs: RwLock<IndexMap<OutputTarget, OutputSlot>>,
    reject_stale: bool,
}

impl Default for StateStore {
    fn default() -> Self {
        Self::new()
    }
}

impl StateStore {
    #[must_use]
    pub fn new() -> Self {
        Self {
            controls: RwLock::new(ControlState::default()),
            outputs: RwLock::new(IndexMap::new()),
            reject_stale: true,
        }
    }

    #[must_use]
    pub fn with_controls(initial: impl IntoIterator<Item = (ControlKey, ControlValue)>) -> Self {
        let store = Self::new();
        {
            let mut controls = store.controls.write().unwrap_or_else(PoisonError::into_inner);
            controls.values.extend(initial);
        }
        store
    }

    /// When enabled (default), a publication computed from an older snapshot
    /// than the current value's is dropped.
    #[must_use]
    pub fn with_reject_stale(mut self, reject_stale: bool) -> Self {
        self.reject_stale = reject_stale;
        self
    }

    /// Creates a `Pending` slot for `target` if none exists.
    pub fn declare_output(&self, target: OutputTarget) {
        let mut outputs = self.outputs.write().unwrap_or_else(PoisonError::into_inner);
        outputs.entry(target).or_default();
    }

    #[must_use]
    pub fn control(&self, key: &ControlKey) -> Option<ControlValue> {
        let controls = self.controls.read().unwrap_or_else(PoisonError::into_inner);
        controls.values.get(key).cloned()
    }

    #[must_use]
    pub fn controls(&self) -> IndexMap<ControlKey, ControlValue> {
        let controls = self.controls.read().unwrap_or_else(PoisonError::into_inner);
        controls.values.clone()
    }

    #[must_use]
    pub fn revision(&self) -> u64 {
        let controls = self.controls.read().unwrap_or_else(PoisonError::into_inner);
        controls.revision
    }

    /// Applies a change event and, under the same lock, lets `capture` read
    /// the post-change control values with the new revision.
    pub fn apply_change<T, F>(&self, event: ChangeEvent, capture: F) -> T
    where
        F: FnOnce(u64, &IndexMap<ControlKey, ControlValue>) -> T,
    {
        let mut controls = self.controls.write().unwrap_or_else(PoisonError::into_inner);
        match event.value {
            Some(value) => {
                controls.values.insert(event.key, value);
            }
            None => {
                controls.values.shift_remove(&event.key);
            }
        }
        controls.revision += 1;
        trace!(revision = controls.revision, "control state changed");
        capture(controls.revision, &controls.values)
    }

    /// Reads the current control values and revision under a read lock.
    pub fn capture<T, F>(&self, capture: F) -> T
    where
        F: FnOnce(u64, &IndexMap<ControlKey, ControlValue>) -> T,
    {
        let controls = self.controls.read().unwrap_or_else(PoisonError::into_inner);
        capture(controls.revision, &controls.values)
    }

    #[must_use]
    pub fn output(&self, target: &OutputTarget) -> Option<OutputSlot> {
        let outputs = self.outputs.read().unwrap_or_else(PoisonError::into_inner);
        outputs.get(target).cloned()
    }

    #[must_use]
    pub fn output_value(&self, target: &OutputTarget) -> Option<OutputValue> {
        self.output(target).and_then(|slot| slot.value)
    }

    #[must_use]
    pub fn outputs(&self) -> IndexMap<OutputTarget, OutputSlot> {
        let outputs = self.outputs.read().unwrap_or_else(PoisonError::into_inner);
        outputs.clone()
    }

    /// Replaces the output value wholesale. Returns `false` when the
    /// publication was stale and dropped.
    pub fn publish(&self, target: &OutputTarget, value: OutputValue, revision: u64) -> bool {
        let mut outputs = self.outputs.write().unwrap_or_else(PoisonError::into_inner);
        let slot = outputs.entry(target.clone()).or_default();
        if self.is_stale(slot, revision) {
            return false;
        }
        slot.value = Some(value);
        slot.status = OutputStatus::Fresh;
        slot.revision = revision;
        true
    }

    /// Records a failed evaluation while keeping the previous value.
    pub fn mark_no_result(&self, target: &OutputTarget, reason: String, revision: u64) -> bool {
        let mut outputs = self.outputs.write().unwrap_or_else(PoisonError::into_inner);
        let slot = outputs.entry(target.clone()).or_default();
        if self.is_stale(slot, revision) {
            return false;
        }
        slot.status = OutputStatus::NoResult { reason };
        slot.revision = revision;
        true
    }

    fn is_stale(&self, slot: &OutputSlot, revision: u64) -> bool {
        self.reject_stale && slot.status != OutputStatus::Pending && revision < slot.revision
    }
}
