use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    pub username: String,
    pub password: String,
}

/// Public dashboard bootstrap configuration.
///
/// This type is serializable so hosts can persist/load dashboard setup
/// next to the component tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardConfig {
    pub title: String,
    #[serde(default)]
    pub credentials: Vec<Credential>,
    #[serde(default = "default_reject_stale_publications")]
    pub reject_stale_publications: bool,
    #[serde(default = "default_evaluate_on_start")]
    pub evaluate_on_start: bool,
    /// Reject bindings whose inputs or output name ids missing from the tree.
    #[serde(default = "default_strict_component_ids")]
    pub strict_component_ids: bool,
}

fn default_reject_stale_publications() -> bool {
    true
}

fn default_evaluate_on_start() -> bool {
    true
}

fn default_strict_component_ids() -> bool {
    true
}

impl DashboardConfig {
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            credentials: Vec::new(),
            reject_stale_publications: default_reject_stale_publications(),
            evaluate_on_start: default_evaluate_on_start(),
            strict_component_ids: default_strict_component_ids(),
        }
    }

    #[must_use]
    pub fn with_credential(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.credentials.push(Credential {
            username: username.into(),
            password: password.into(),
        });
        self
    }

    #[must_use]
    pub fn with_reject_stale_publications(mut self, enabled: bool) -> Self {
        self.reject_stale_publications = enabled;
        self
    }

    #[must_use]
    pub fn with_evaluate_on_start(mut self, enabled: bool) -> Self {
        self.evaluate_on_start = enabled;
        self
    }

    #[must_use]
    pub fn with_strict_component_ids(mut self, enabled: bool) -> Self {
        self.strict_component_ids = enabled;
        self
    }

    pub fn validate(&self) -> ChartResult<()> {
        if self.title.trim().is_empty() {
            return Err(ChartError::InvalidData(
                "dashboard title must not be empty".to_owned(),
            ));
        }
        Ok(())
    }

    pub fn from_json_str(input: &str) -> ChartResult<Self> {
        let config: Self = serde_json::from_str(input).map_err(|e| {
            ChartError::InvalidData(format!("failed to parse dashboard config: {e}"))
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json_pretty(&self) -> ChartResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| {
            ChartError::InvalidData(format!("failed to serialize dashboard config: {e}"))
        })
    }
}
