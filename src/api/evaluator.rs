use std::sync::Arc;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::{debug, trace, warn};

#[cfg(feature = "parallel-evaluation")]
use rayon::prelude::*;

use crate::interaction::{ChangeEvent, ControlKey, ControlValue};

use super::{
    Binding, BindingOutcome, BindingRegistry, InputSnapshot, OutputTarget, StateStore,
};

/// What happened to one output during an evaluation pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum EvaluationOutcome {
    Published,
    /// The binding declined to update; the previous value stays.
    Declined,
    /// The binding failed; the previous value stays and the output is
    /// marked as having no result.
    Failed { reason: String },
    /// A newer evaluation already published; this result was dropped.
    Superseded,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluatedOutput {
    pub target: OutputTarget,
    pub outcome: EvaluationOutcome,
}

/// Per-event summary of which outputs were evaluated and how.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationReport {
    pub revision: u64,
    pub trigger: Option<ControlKey>,
    pub outputs: Vec<EvaluatedOutput>,
}

impl EvaluationReport {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.outputs.is_empty()
    }

    pub fn evaluated_targets(&self) -> impl Iterator<Item = &OutputTarget> {
        self.outputs.iter().map(|entry| &entry.target)
    }

    #[must_use]
    pub fn outcome_for(&self, target: &OutputTarget) -> Option<&EvaluationOutcome> {
        self.outputs
            .iter()
            .find(|entry| &entry.target == target)
            .map(|entry| &entry.outcome)
    }

    #[must_use]
    pub fn published_count(&self) -> usize {
        self.count(|outcome| matches!(outcome, EvaluationOutcome::Published))
    }

    #[must_use]
    pub fn failed_count(&self) -> usize {
        self.count(|outcome| matches!(outcome, EvaluationOutcome::Failed { .. }))
    }

    fn count(&self, predicate: impl Fn(&EvaluationOutcome) -> bool) -> usize {
        self.outputs.iter().filter(|entry| predicate(&entry.outcome)).count()
    }
}

/// Dispatches control changes to dependent bindings and publishes results.
///
/// Stateless per event: all persisted state lives in the shared
/// `StateStore`. `handle_event` takes `&self` so several threads may feed
/// events concurrently.
pub struct Evaluator<D> {
    registry: Arc<BindingRegistry<D>>,
    store: Arc<StateStore>,
    data: Arc<D>,
}

impl<D> Clone for Evaluator<D> {
    fn clone(&self) -> Self {
        Self {
            registry: Arc::clone(&self.registry),
            store: Arc::clone(&self.store),
            data: Arc::clone(&self.data),
        }
    }
}

fn snapshot_for<D>(
    binding: &Binding<D>,
    revision: u64,
    controls: &IndexMap<ControlKey, ControlValue>,
) -> InputSnapshot {
    let inputs: SmallVec<[(ControlKey, Option<ControlValue>); 4]> = binding
        .inputs()
        .iter()
        .map(|key| (key.clone(), controls.get(key).cloned()))
        .collect();
    let states: SmallVec<[(ControlKey, Option<ControlValue>); 2]> = binding
        .states()
        .iter()
        .map(|key| (key.clone(), controls.get(key).cloned()))
        .collect();
    InputSnapshot::new(revision, inputs, states)
}

impl<D: Send + Sync> Evaluator<D> {
    #[must_use]
    pub fn new(registry: Arc<BindingRegistry<D>>, store: Arc<StateStore>, data: Arc<D>) -> Self {
        Self {
            registry,
            store,
            data,
        }
    }

    #[must_use]
    pub fn registry(&self) -> &BindingRegistry<D> {
        &self.registry
    }

    #[must_use]
    pub fn store(&self) -> &StateStore {
        &self.store
    }

    #[must_use]
    pub fn data(&self) -> &D {
        &self.data
    }

    /// Stores the new control value and re-evaluates exactly the bindings
    /// that declare the changed control as a trigger input.
    pub fn handle_event(&self, event: ChangeEvent) -> EvaluationReport {
        let trigger = event.key.clone();
        let (revision, jobs) = self.store.apply_change(event, |revision, controls| {
            let jobs: Vec<(&Binding<D>, InputSnapshot)> = self
                .registry
                .dependents(&trigger)
                .map(|binding| (binding, snapshot_for(binding, revision, controls)))
                .collect();
            (revision, jobs)
        });
        debug!(
            control = %trigger,
            revision,
            dependents = jobs.len(),
            "handle control change"
        );

        EvaluationReport {
            revision,
            trigger: Some(trigger),
            outputs: self.run(jobs),
        }
    }

    /// Evaluates every registered binding against the current control state.
    pub fn evaluate_all(&self) -> EvaluationReport {
        let (revision, jobs) = self.store.capture(|revision, controls| {
            let jobs: Vec<(&Binding<D>, InputSnapshot)> = self
                .registry
                .iter()
                .map(|binding| (binding, snapshot_for(binding, revision, controls)))
                .collect();
            (revision, jobs)
        });
        debug!(revision, bindings = jobs.len(), "evaluate all bindings");

        EvaluationReport {
            revision,
            trigger: None,
            outputs: self.run(jobs),
        }
    }

    #[cfg(not(feature = "parallel-evaluation"))]
    fn run(&self, jobs: Vec<(&Binding<D>, InputSnapshot)>) -> Vec<EvaluatedOutput> {
        jobs.into_iter()
            .map(|(binding, snapshot)| self.evaluate_one(binding, &snapshot))
            .collect()
    }

    #[cfg(feature = "parallel-evaluation")]
    fn run(&self, jobs: Vec<(&Binding<D>, InputSnapshot)>) -> Vec<EvaluatedOutput> {
        jobs.into_par_iter()
            .map(|(binding, snapshot)| self.evaluate_one(binding, &snapshot))
            .collect()
    }

    fn evaluate_one(&self, binding: &Binding<D>, snapshot: &InputSnapshot) -> EvaluatedOutput {
        let target = binding.output().clone();
        let revision = snapshot.revision();
        let outcome = match binding.invoke(&self.data, snapshot) {
            Ok(BindingOutcome::Publish(value)) => {
                if self.store.publish(&target, value, revision) {
                    trace!(output = %target, revision, "published output");
                    EvaluationOutcome::Published
                } else {
                    debug!(output = %target, revision, "dropping superseded publication");
                    EvaluationOutcome::Superseded
                }
            }
            Ok(BindingOutcome::NoUpdate) => {
                trace!(output = %target, revision, "binding declined to update");
                EvaluationOutcome::Declined
            }
            Err(err) => {
                warn!(
                    output = %target,
                    revision,
                    error = %err,
                    "binding failed; keeping previous output"
                );
                let reason = err.to_string();
                if self.store.mark_no_result(&target, reason.clone(), revision) {
                    EvaluationOutcome::Failed { reason }
                } else {
                    EvaluationOutcome::Superseded
                }
            }
        };

        EvaluatedOutput { target, outcome }
    }
}
