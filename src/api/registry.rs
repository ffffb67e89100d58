use indexmap::{IndexMap, IndexSet};
use smallvec::SmallVec;
use tracing::debug;

use crate::error::{ChartError, ChartResult};
use crate::interaction::ControlKey;

use super::{Binding, OutputTarget};

/// Explicit binding table: output target to binding, plus a reverse index
/// from trigger control to dependent bindings in registration order.
pub struct BindingRegistry<D> {
    bindings: IndexMap<OutputTarget, Binding<D>>,
    dependents: IndexMap<ControlKey, SmallVec<[usize; 4]>>,
}

impl<D> Default for BindingRegistry<D> {
    fn default() -> Self {
        Self {
            bindings: IndexMap::new(),
            dependents: IndexMap::new(),
        }
    }
}

impl<D> BindingRegistry<D> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a binding. Each output target accepts exactly one binding.
    pub fn register(&mut self, binding: Binding<D>) -> ChartResult<()> {
        let target = binding.output().clone();
        if target.component_id.is_empty() || target.property.is_empty() {
            return Err(ChartError::InvalidData(
                "binding output id and property must not be empty".to_owned(),
            ));
        }
        if binding.inputs().is_empty() {
            return Err(ChartError::InvalidData(format!(
                "binding for `{target}` must declare at least one input"
            )));
        }
        let mut seen = IndexSet::new();
        for key in binding.referenced_keys() {
            if !seen.insert(key) {
                return Err(ChartError::InvalidData(format!(
                    "binding for `{target}` declares `{key}` more than once"
                )));
            }
        }
        if self.bindings.contains_key(&target) {
            return Err(ChartError::DuplicateOutput {
                target: target.to_string(),
            });
        }

        let index = self.bindings.len();
        for key in binding.inputs() {
            self.dependents.entry(key.clone()).or_default().push(index);
        }
        debug!(
            output = %target,
            inputs = binding.inputs().len(),
            states = binding.states().len(),
            "register binding"
        );
        self.bindings.insert(target, binding);
        Ok(())
    }

    /// Removes the binding for `target`. Returns `true` when removed.
    pub fn unregister(&mut self, target: &OutputTarget) -> bool {
        if self.bindings.shift_remove(target).is_none() {
            return false;
        }
        self.rebuild_dependents();
        true
    }

    fn rebuild_dependents(&mut self) {
        self.dependents.clear();
        for (index, binding) in self.bindings.values().enumerate() {
            for key in binding.inputs() {
                self.dependents.entry(key.clone()).or_default().push(index);
            }
        }
    }

    /// Bindings triggered by `key`, in registration order.
    pub fn dependents<'a>(
        &'a self,
        key: &ControlKey,
    ) -> impl Iterator<Item = &'a Binding<D>> + use<'a, D> {
        self.dependents
            .get(key)
            .into_iter()
            .flat_map(|indices| indices.iter())
            .filter_map(|index| self.bindings.get_index(*index).map(|(_, binding)| binding))
    }

    #[must_use]
    pub fn get(&self, target: &OutputTarget) -> Option<&Binding<D>> {
        self.bindings.get(target)
    }

    #[must_use]
    pub fn contains(&self, target: &OutputTarget) -> bool {
        self.bindings.contains_key(target)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Binding<D>> {
        self.bindings.values()
    }

    pub fn targets(&self) -> impl Iterator<Item = &OutputTarget> {
        self.bindings.keys()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}
