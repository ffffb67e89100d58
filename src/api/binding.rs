use std::fmt;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use thiserror::Error;

use crate::core::{Figure, ImageRef};
use crate::interaction::{ControlKey, ControlValue};

/// Identifies one published property of one component, e.g. `graph.figure`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OutputTarget {
    pub component_id: String,
    pub property: String,
}

impl OutputTarget {
    #[must_use]
    pub fn new(component_id: impl Into<String>, property: impl Into<String>) -> Self {
        Self {
            component_id: component_id.into(),
            property: property.into(),
        }
    }
}

impl fmt::Display for OutputTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.component_id, self.property)
    }
}

/// Value published to an output target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum OutputValue {
    Figure(Figure),
    Text(String),
    Image(ImageRef),
    /// Explicit "nothing to show" state.
    Empty,
}

impl OutputValue {
    #[must_use]
    pub fn as_figure(&self) -> Option<&Figure> {
        match self {
            Self::Figure(figure) => Some(figure),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_image(&self) -> Option<&ImageRef> {
        match self {
            Self::Image(image) => Some(image),
            _ => None,
        }
    }
}

/// Successful result of one binding invocation.
#[derive(Debug, Clone, PartialEq)]
pub enum BindingOutcome {
    Publish(OutputValue),
    /// Keep the previously published value untouched.
    NoUpdate,
}

/// Failure local to one output. Never crosses into other bindings.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BindingError {
    #[error("input `{key}` has no value")]
    MissingInput { key: ControlKey },

    #[error("input `{key}` has an unexpected value kind")]
    UnexpectedInput { key: ControlKey },

    #[error("missing image: {0}")]
    MissingImage(String),

    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("binding panicked: {0}")]
    Panicked(String),
}

pub type BindingResult = Result<BindingOutcome, BindingError>;

/// How a binding reacts when any declared input or state has no value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MissingInputPolicy {
    /// Call the function anyway; it inspects the `None` values itself.
    #[default]
    Invoke,
    /// Skip the call and keep the previous output.
    NoUpdate,
    /// Skip the call and publish `OutputValue::Empty`.
    PublishEmpty,
}

/// Consistent view of a binding's declared inputs and states, captured
/// under one control-state revision.
#[derive(Debug, Clone, PartialEq)]
pub struct InputSnapshot {
    revision: u64,
    inputs: SmallVec<[(ControlKey, Option<ControlValue>); 4]>,
    states: SmallVec<[(ControlKey, Option<ControlValue>); 2]>,
}

impl InputSnapshot {
    pub(crate) fn new(
        revision: u64,
        inputs: SmallVec<[(ControlKey, Option<ControlValue>); 4]>,
        states: SmallVec<[(ControlKey, Option<ControlValue>); 2]>,
    ) -> Self {
        Self {
            revision,
            inputs,
            states,
        }
    }

    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Value of the `index`-th declared trigger input.
    #[must_use]
    pub fn input(&self, index: usize) -> Option<&ControlValue> {
        self.inputs.get(index).and_then(|(_, value)| value.as_ref())
    }

    /// Value of the `index`-th declared state input.
    #[must_use]
    pub fn state(&self, index: usize) -> Option<&ControlValue> {
        self.states.get(index).and_then(|(_, value)| value.as_ref())
    }

    /// Value of a declared input or state by key.
    #[must_use]
    pub fn get(&self, key: &ControlKey) -> Option<&ControlValue> {
        self.inputs
            .iter()
            .chain(self.states.iter())
            .find(|(candidate, _)| candidate == key)
            .and_then(|(_, value)| value.as_ref())
    }

    /// Like `input`, but a missing value becomes `BindingError::MissingInput`.
    pub fn require_input(&self, index: usize) -> Result<&ControlValue, BindingError> {
        match self.inputs.get(index) {
            Some((_, Some(value))) => Ok(value),
            Some((key, None)) => Err(BindingError::MissingInput { key: key.clone() }),
            None => Err(BindingError::InvalidData(format!(
                "binding has no input at position {index}"
            ))),
        }
    }

    #[must_use]
    pub fn has_missing(&self) -> bool {
        self.inputs
            .iter()
            .chain(self.states.iter())
            .any(|(_, value)| value.is_none())
    }

    #[must_use]
    pub fn inputs(&self) -> &[(ControlKey, Option<ControlValue>)] {
        &self.inputs
    }

    #[must_use]
    pub fn states(&self) -> &[(ControlKey, Option<ControlValue>)] {
        &self.states
    }
}

type BindingFn<D> = dyn Fn(&D, &InputSnapshot) -> BindingResult + Send + Sync;

/// Declarative mapping from control properties to one output target.
///
/// Trigger inputs cause re-evaluation when they change; state inputs are
/// only read. `D` is the read-only shared data passed to every call.
pub struct Binding<D> {
    output: OutputTarget,
    inputs: SmallVec<[ControlKey; 4]>,
    states: SmallVec<[ControlKey; 2]>,
    policy: MissingInputPolicy,
    func: Arc<BindingFn<D>>,
}

impl<D> Binding<D> {
    pub fn new<F>(output: OutputTarget, func: F) -> Self
    where
        F: Fn(&D, &InputSnapshot) -> BindingResult + Send + Sync + 'static,
    {
        Self {
            output,
            inputs: SmallVec::new(),
            states: SmallVec::new(),
            policy: MissingInputPolicy::default(),
            func: Arc::new(func),
        }
    }

    #[must_use]
    pub fn with_input(mut self, key: ControlKey) -> Self {
        self.inputs.push(key);
        self
    }

    #[must_use]
    pub fn with_state(mut self, key: ControlKey) -> Self {
        self.states.push(key);
        self
    }

    #[must_use]
    pub fn with_missing_input_policy(mut self, policy: MissingInputPolicy) -> Self {
        self.policy = policy;
        self
    }

    #[must_use]
    pub fn output(&self) -> &OutputTarget {
        &self.output
    }

    #[must_use]
    pub fn inputs(&self) -> &[ControlKey] {
        &self.inputs
    }

    #[must_use]
    pub fn states(&self) -> &[ControlKey] {
        &self.states
    }

    #[must_use]
    pub fn policy(&self) -> MissingInputPolicy {
        self.policy
    }

    #[must_use]
    pub fn triggers_on(&self, key: &ControlKey) -> bool {
        self.inputs.contains(key)
    }

    /// Declared inputs followed by declared states.
    pub fn referenced_keys(&self) -> impl Iterator<Item = &ControlKey> {
        self.inputs.iter().chain(self.states.iter())
    }

    /// Runs the binding against a snapshot, applying the missing-input policy
    /// and turning a panic into `BindingError::Panicked`.
    pub(crate) fn invoke(&self, data: &D, snapshot: &InputSnapshot) -> BindingResult {
        if snapshot.has_missing() {
            match self.policy {
                MissingInputPolicy::Invoke => {}
                MissingInputPolicy::NoUpdate => return Ok(BindingOutcome::NoUpdate),
                MissingInputPolicy::PublishEmpty => {
                    return Ok(BindingOutcome::Publish(OutputValue::Empty));
                }
            }
        }

        match catch_unwind(AssertUnwindSafe(|| (self.func)(data, snapshot))) {
            Ok(result) => result,
            Err(payload) => {
                let message = payload
                    .downcast_ref::<&str>()
                    .map(|s| (*s).to_owned())
                    .or_else(|| payload.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "non-string panic payload".to_owned());
                Err(BindingError::Panicked(message))
            }
        }
    }
}

impl<D> Clone for Binding<D> {
    fn clone(&self) -> Self {
        Self {
            output: self.output.clone(),
            inputs: self.inputs.clone(),
            states: self.states.clone(),
            policy: self.policy,
            func: Arc::clone(&self.func),
        }
    }
}

impl<D> fmt::Debug for Binding<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binding")
            .field("output", &self.output)
            .field("inputs", &self.inputs)
            .field("states", &self.states)
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}
