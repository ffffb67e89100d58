//! Control state and the change events emitted by the hosting UI.

mod selection;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::Scalar;

pub use selection::{BoundingBox, SelectedPoint, Selection, SelectionRegion};

/// Identifies one property of one component, e.g. `year-picker.value`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ControlKey {
    pub component_id: String,
    pub property: String,
}

impl ControlKey {
    #[must_use]
    pub fn new(component_id: impl Into<String>, property: impl Into<String>) -> Self {
        Self {
            component_id: component_id.into(),
            property: property.into(),
        }
    }

    #[must_use]
    pub fn value(component_id: impl Into<String>) -> Self {
        Self::new(component_id, "value")
    }
}

impl fmt::Display for ControlKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.component_id, self.property)
    }
}

/// Hover or click payload for a single plotted point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointEvent {
    pub x: Scalar,
    pub y: Scalar,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub point_index: Option<usize>,
    #[serde(default)]
    pub curve_number: usize,
}

impl PointEvent {
    #[must_use]
    pub fn new(x: impl Into<Scalar>, y: impl Into<Scalar>) -> Self {
        Self {
            x: x.into(),
            y: y.into(),
            point_index: None,
            curve_number: 0,
        }
    }

    #[must_use]
    pub fn with_point_index(mut self, point_index: usize) -> Self {
        self.point_index = Some(point_index);
        self
    }
}

/// Current value of one control property.
///
/// An unset value (no selection yet, cleared dropdown) is modelled as
/// `Option::None` by the store rather than as a variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ControlValue {
    Number(f64),
    Text(String),
    List(Vec<Scalar>),
    Selection(Selection),
    Point(PointEvent),
}

impl ControlValue {
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(value) => Some(*value),
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

    /// Scalar view of number and text values.
    #[must_use]
    pub fn as_scalar(&self) -> Option<Scalar> {
        match self {
            Self::Number(value) => Some(Scalar::Number(*value)),
            Self::Text(text) => Some(Scalar::Text(text.clone())),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_selection(&self) -> Option<&Selection> {
        match self {
            Self::Selection(selection) => Some(selection),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_point(&self) -> Option<&PointEvent> {
        match self {
            Self::Point(point) => Some(point),
            _ => None,
        }
    }
}

impl fmt::Display for ControlValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(value) => write!(f, "{}", Scalar::Number(*value)),
            Self::Text(text) => f.write_str(text),
            Self::List(values) => {
                let joined: Vec<String> = values.iter().map(ToString::to_string).collect();
                write!(f, "[{}]", joined.join(", "))
            }
            Self::Selection(selection) => write!(f, "{} selected points", selection.points.len()),
            Self::Point(point) => write!(f, "({}, {})", point.x, point.y),
        }
    }
}

impl From<f64> for ControlValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for ControlValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for ControlValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<Scalar> for ControlValue {
    fn from(value: Scalar) -> Self {
        match value {
            Scalar::Number(number) => Self::Number(number),
            Scalar::Text(text) => Self::Text(text),
        }
    }
}

impl From<Selection> for ControlValue {
    fn from(value: Selection) -> Self {
        Self::Selection(value)
    }
}

impl From<PointEvent> for ControlValue {
    fn from(value: PointEvent) -> Self {
        Self::Point(value)
    }
}

/// One control-state change delivered by the hosting UI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeEvent {
    pub key: ControlKey,
    #[serde(default)]
    pub value: Option<ControlValue>,
}

impl ChangeEvent {
    #[must_use]
    pub fn set(key: ControlKey, value: impl Into<ControlValue>) -> Self {
        Self {
            key,
            value: Some(value.into()),
        }
    }

    #[must_use]
    pub fn clear(key: ControlKey) -> Self {
        Self { key, value: None }
    }
}
