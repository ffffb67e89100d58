use std::sync::Arc;

use tracing::{debug, info};

use crate::error::{ChartError, ChartResult};
use crate::interaction::{ChangeEvent, ControlKey, ControlValue};

use super::{
    BasicAuth, Binding, BindingRegistry, Component, ControlEntry, DashboardConfig,
    DashboardSnapshot, EvaluationReport, Evaluator, OutputEntry, OutputSlot, OutputTarget,
    OutputValue, StateStore,
};

/// Hosting-boundary facade consumed by a UI server.
///
/// `Dashboard` owns the static component tree, the binding table, the shared
/// state store and the auth gate. Shared data `D` is loaded once by the host
/// and handed in behind an `Arc`.
pub struct Dashboard<D> {
    config: DashboardConfig,
    layout: Component,
    auth: BasicAuth,
    evaluator: Evaluator<D>,
}

impl<D: Send + Sync> Dashboard<D> {
    pub fn new(
        config: DashboardConfig,
        layout: Component,
        data: Arc<D>,
        bindings: impl IntoIterator<Item = Binding<D>>,
    ) -> ChartResult<Self> {
        config.validate()?;
        layout.validate()?;
        let auth = BasicAuth::from_credentials(&config.credentials)?;

        let mut registry = BindingRegistry::new();
        for binding in bindings {
            if config.strict_component_ids {
                validate_binding_ids(&layout, &binding)?;
            }
            registry.register(binding)?;
        }

        let store = StateStore::with_controls(layout.initial_controls())
            .with_reject_stale(config.reject_stale_publications);
        for target in registry.targets() {
            store.declare_output(target.clone());
        }

        let evaluator = Evaluator::new(Arc::new(registry), Arc::new(store), data);
        let dashboard = Self {
            config,
            layout,
            auth,
            evaluator,
        };
        info!(
            title = %dashboard.config.title,
            bindings = dashboard.evaluator.registry().len(),
            auth = dashboard.auth.is_enabled(),
            "dashboard ready"
        );

        if dashboard.config.evaluate_on_start {
            let report = dashboard.evaluator.evaluate_all();
            debug!(
                published = report.published_count(),
                failed = report.failed_count(),
                "initial evaluation"
            );
        }
        Ok(dashboard)
    }

    #[must_use]
    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    #[must_use]
    pub fn layout(&self) -> &Component {
        &self.layout
    }

    #[must_use]
    pub fn evaluator(&self) -> &Evaluator<D> {
        &self.evaluator
    }

    #[must_use]
    pub fn binding_count(&self) -> usize {
        self.evaluator.registry().len()
    }

    pub fn handle_change(&self, event: ChangeEvent) -> EvaluationReport {
        self.evaluator.handle_event(event)
    }

    /// Sets `component_id.property` and re-evaluates its dependents.
    pub fn set_control(
        &self,
        component_id: &str,
        property: &str,
        value: impl Into<ControlValue>,
    ) -> EvaluationReport {
        self.handle_change(ChangeEvent::set(ControlKey::new(component_id, property), value))
    }

    /// Re-runs every binding against current control state.
    pub fn refresh_all(&self) -> EvaluationReport {
        self.evaluator.evaluate_all()
    }

    #[must_use]
    pub fn control(&self, key: &ControlKey) -> Option<ControlValue> {
        self.evaluator.store().control(key)
    }

    #[must_use]
    pub fn output(&self, target: &OutputTarget) -> Option<OutputSlot> {
        self.evaluator.store().output(target)
    }

    #[must_use]
    pub fn output_value(&self, target: &OutputTarget) -> Option<OutputValue> {
        self.evaluator.store().output_value(target)
    }

    #[must_use]
    pub fn authorize(&self, username: &str, password: &str) -> bool {
        self.auth.verify(username, password)
    }

    #[must_use]
    pub fn authorize_header(&self, header: &str) -> bool {
        self.auth.verify_header(header)
    }

    /// Tree plus current controls and outputs, as served to a viewer.
    #[must_use]
    pub fn snapshot(&self) -> DashboardSnapshot {
        let store = self.evaluator.store();
        DashboardSnapshot {
            title: self.config.title.clone(),
            revision: store.revision(),
            layout: self.layout.clone(),
            controls: store
                .controls()
                .into_iter()
                .map(|(key, value)| ControlEntry { key, value })
                .collect(),
            outputs: store
                .outputs()
                .into_iter()
                .map(|(target, slot)| OutputEntry { target, slot })
                .collect(),
        }
    }
}

fn validate_binding_ids<D>(layout: &Component, binding: &Binding<D>) -> ChartResult<()> {
    let ids = std::iter::once(binding.output().component_id.as_str())
        .chain(binding.referenced_keys().map(|key| key.component_id.as_str()));
    for component_id in ids {
        if !layout.has_id(component_id) {
            return Err(ChartError::UnknownComponent {
                component_id: component_id.to_owned(),
            });
        }
    }
    Ok(())
}
