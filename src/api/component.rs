use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

use crate::core::{Figure, Scalar};
use crate::error::{ChartError, ChartResult};
use crate::interaction::{ControlKey, ControlValue};

/// Inline style properties, e.g. `textAlign -> center`.
pub type Style = IndexMap<String, String>;

/// One entry of a dropdown or radio list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControlOption {
    pub label: String,
    pub value: Scalar,
}

impl ControlOption {
    #[must_use]
    pub fn new(label: impl Into<String>, value: impl Into<Scalar>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }

    /// Options labelled with the display form of each value.
    #[must_use]
    pub fn from_values(values: &[Scalar]) -> Vec<Self> {
        values
            .iter()
            .map(|value| Self {
                label: value.to_string(),
                value: value.clone(),
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SliderMark {
    pub value: f64,
    pub label: String,
}

impl SliderMark {
    /// One mark per integer step in `min..=max`, labelled with the number.
    #[must_use]
    pub fn integer_range(min: i32, max: i32) -> Vec<Self> {
        (min..=max)
            .map(|value| Self {
                value: f64::from(value),
                label: value.to_string(),
            })
            .collect()
    }
}

/// Declarative UI tree. Controls seed the initial control state; graphs,
/// images and text elements act as output targets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Component {
    Div {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        id: Option<String>,
        #[serde(default)]
        children: Vec<Component>,
        #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
        style: Style,
    },
    Text {
        text: String,
    },
    Heading {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        id: Option<String>,
        level: u8,
        #[serde(default)]
        text: String,
        #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
        style: Style,
    },
    Label {
        text: String,
        #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
        style: Style,
    },
    Paragraph {
        #[serde(default)]
        children: Vec<Component>,
    },
    Markdown {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        id: Option<String>,
        #[serde(default)]
        text: String,
    },
    Rule,
    Dropdown {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        id: Option<String>,
        options: Vec<ControlOption>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        value: Option<Scalar>,
    },
    Slider {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        id: Option<String>,
        min: f64,
        max: f64,
        step: f64,
        value: f64,
        #[serde(default)]
        marks: Vec<SliderMark>,
    },
    RadioItems {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        id: Option<String>,
        options: Vec<ControlOption>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        value: Option<Scalar>,
    },
    TextInput {
        id: String,
        #[serde(default)]
        value: String,
    },
    Button {
        id: String,
        label: String,
        #[serde(default)]
        n_clicks: u64,
    },
    Graph {
        id: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        figure: Option<Figure>,
        #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
        style: Style,
    },
    Image {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        id: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        src: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        height: Option<u32>,
    },
    Interval {
        id: String,
        interval_ms: u64,
        #[serde(default)]
        n_intervals: u64,
    },
}

impl Component {
    #[must_use]
    pub fn div(children: Vec<Component>) -> Self {
        Self::Div {
            id: None,
            children,
            style: Style::new(),
        }
    }

    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    #[must_use]
    pub fn paragraph(children: Vec<Component>) -> Self {
        Self::Paragraph { children }
    }

    #[must_use]
    pub fn heading(level: u8, text: impl Into<String>) -> Self {
        Self::Heading {
            id: None,
            level,
            text: text.into(),
            style: Style::new(),
        }
    }

    #[must_use]
    pub fn label(text: impl Into<String>) -> Self {
        Self::Label {
            text: text.into(),
            style: Style::new(),
        }
    }

    #[must_use]
    pub fn markdown(text: impl Into<String>) -> Self {
        Self::Markdown {
            id: None,
            text: text.into(),
        }
    }

    #[must_use]
    pub fn dropdown(options: Vec<ControlOption>, value: Option<Scalar>) -> Self {
        Self::Dropdown {
            id: None,
            options,
            value,
        }
    }

    #[must_use]
    pub fn radio_items(options: Vec<ControlOption>, value: Option<Scalar>) -> Self {
        Self::RadioItems {
            id: None,
            options,
            value,
        }
    }

    #[must_use]
    pub fn slider(min: f64, max: f64, step: f64, value: f64) -> Self {
        Self::Slider {
            id: None,
            min,
            max,
            step,
            value,
            marks: Vec::new(),
        }
    }

    #[must_use]
    pub fn text_input(id: impl Into<String>, value: impl Into<String>) -> Self {
        Self::TextInput {
            id: id.into(),
            value: value.into(),
        }
    }

    #[must_use]
    pub fn button(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self::Button {
            id: id.into(),
            label: label.into(),
            n_clicks: 0,
        }
    }

    #[must_use]
    pub fn graph(id: impl Into<String>, figure: Option<Figure>) -> Self {
        Self::Graph {
            id: id.into(),
            figure,
            style: Style::new(),
        }
    }

    #[must_use]
    pub fn image(id: impl Into<String>, height: Option<u32>) -> Self {
        Self::Image {
            id: Some(id.into()),
            src: None,
            height,
        }
    }

    #[must_use]
    pub fn interval(id: impl Into<String>, interval_ms: u64) -> Self {
        Self::Interval {
            id: id.into(),
            interval_ms,
            n_intervals: 0,
        }
    }

    /// Replaces slider marks; ignored by other components.
    #[must_use]
    pub fn with_marks(mut self, new_marks: Vec<SliderMark>) -> Self {
        if let Self::Slider { marks, .. } = &mut self {
            *marks = new_marks;
        }
        self
    }

    /// Sets the id on components that carry an optional id.
    #[must_use]
    pub fn with_id(mut self, new_id: impl Into<String>) -> Self {
        let new_id = new_id.into();
        match &mut self {
            Self::Div { id, .. }
            | Self::Heading { id, .. }
            | Self::Markdown { id, .. }
            | Self::Dropdown { id, .. }
            | Self::Slider { id, .. }
            | Self::RadioItems { id, .. }
            | Self::Image { id, .. } => *id = Some(new_id),
            Self::TextInput { id, .. }
            | Self::Button { id, .. }
            | Self::Graph { id, .. }
            | Self::Interval { id, .. } => *id = new_id,
            Self::Text { .. } | Self::Label { .. } | Self::Paragraph { .. } | Self::Rule => {}
        }
        self
    }

    /// Adds one inline style property on components that support styling.
    #[must_use]
    pub fn with_style(mut self, property: impl Into<String>, value: impl Into<String>) -> Self {
        match &mut self {
            Self::Div { style, .. }
            | Self::Heading { style, .. }
            | Self::Label { style, .. }
            | Self::Graph { style, .. } => {
                style.insert(property.into(), value.into());
            }
            _ => {}
        }
        self
    }

    #[must_use]
    pub fn id(&self) -> Option<&str> {
        match self {
            Self::Div { id, .. }
            | Self::Heading { id, .. }
            | Self::Markdown { id, .. }
            | Self::Dropdown { id, .. }
            | Self::Slider { id, .. }
            | Self::RadioItems { id, .. }
            | Self::Image { id, .. } => id.as_deref(),
            Self::TextInput { id, .. }
            | Self::Button { id, .. }
            | Self::Graph { id, .. }
            | Self::Interval { id, .. } => Some(id),
            Self::Text { .. } | Self::Label { .. } | Self::Paragraph { .. } | Self::Rule => None,
        }
    }

    #[must_use]
    pub fn children(&self) -> &[Component] {
        match self {
            Self::Div { children, .. } | Self::Paragraph { children } => children,
            _ => &[],
        }
    }

    /// Depth-first, pre-order traversal.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a Component)) {
        visit(self);
        for child in self.children() {
            child.walk(visit);
        }
    }

    #[must_use]
    pub fn ids(&self) -> Vec<&str> {
        let mut ids = Vec::new();
        self.walk(&mut |component| {
            if let Some(id) = component.id() {
                ids.push(id);
            }
        });
        ids
    }

    #[must_use]
    pub fn find(&self, id: &str) -> Option<&Component> {
        let mut found = None;
        self.walk(&mut |component| {
            if found.is_none() && component.id() == Some(id) {
                found = Some(component);
            }
        });
        found
    }

    #[must_use]
    pub fn has_id(&self, id: &str) -> bool {
        self.find(id).is_some()
    }

    /// Checks id uniqueness and per-component constraints.
    pub fn validate(&self) -> ChartResult<()> {
        let mut seen = IndexSet::new();
        let mut result = Ok(());
        self.walk(&mut |component| {
            if result.is_err() {
                return;
            }
            if let Some(id) = component.id() {
                if id.is_empty() {
                    result = Err(ChartError::InvalidData(
                        "component id must not be empty".to_owned(),
                    ));
                    return;
                }
                if !seen.insert(id) {
                    result = Err(ChartError::InvalidData(format!(
                        "duplicate component id `{id}`"
                    )));
                    return;
                }
            }
            result = component.validate_self();
        });
        result
    }

    fn validate_self(&self) -> ChartResult<()> {
        match self {
            Self::Heading { level, .. } if !(1..=6).contains(level) => Err(
                ChartError::InvalidData(format!("heading level {level} must be in 1..=6")),
            ),
            Self::Slider {
                min,
                max,
                step,
                value,
                ..
            } => {
                if !min.is_finite() || !max.is_finite() || min >= max {
                    return Err(ChartError::InvalidData(
                        "slider range must be finite with min < max".to_owned(),
                    ));
                }
                if !step.is_finite() || *step <= 0.0 {
                    return Err(ChartError::InvalidData(
                        "slider step must be finite and > 0".to_owned(),
                    ));
                }
                if !(*min..=*max).contains(value) {
                    return Err(ChartError::InvalidData(
                        "slider value must lie within its range".to_owned(),
                    ));
                }
                Ok(())
            }
            Self::Interval { interval_ms, .. } if *interval_ms == 0 => Err(
                ChartError::InvalidData("interval must be > 0 ms".to_owned()),
            ),
            Self::Graph {
                figure: Some(figure),
                ..
            } => figure.validate(),
            _ => Ok(()),
        }
    }

    /// Control values declared by the tree, used to seed the state store.
    #[must_use]
    pub fn initial_controls(&self) -> Vec<(ControlKey, ControlValue)> {
        let mut controls = Vec::new();
        self.walk(&mut |component| {
            let entry = match component {
                Self::Dropdown {
                    id: Some(id),
                    value: Some(value),
                    ..
                }
                | Self::RadioItems {
                    id: Some(id),
                    value: Some(value),
                    ..
                } => Some((ControlKey::value(id.clone()), ControlValue::from(value.clone()))),
                Self::Slider {
                    id: Some(id),
                    value,
                    ..
                } => Some((ControlKey::value(id.clone()), ControlValue::Number(*value))),
                Self::TextInput { id, value } => Some((
                    ControlKey::value(id.clone()),
                    ControlValue::Text(value.clone()),
                )),
                Self::Button { id, n_clicks, .. } => Some((
                    ControlKey::new(id.clone(), "n_clicks"),
                    ControlValue::Number(*n_clicks as f64),
                )),
                Self::Interval {
                    id, n_intervals, ..
                } => Some((
                    ControlKey::new(id.clone(), "n_intervals"),
                    ControlValue::Number(*n_intervals as f64),
                )),
                _ => None,
            };
            controls.extend(entry);
        });
        controls
    }
}
