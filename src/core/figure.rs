use serde::{Deserialize, Serialize};

use crate::core::Trace;
use crate::error::{ChartError, ChartResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AxisType {
    Linear,
    Log,
    Category,
}

impl AxisType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Linear => "linear",
            Self::Log => "log",
            Self::Category => "category",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Axis {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub axis_type: Option<AxisType>,
    #[serde(default = "default_visible")]
    pub visible: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<(f64, f64)>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tick_count: Option<u32>,
}

fn default_visible() -> bool {
    true
}

impl Default for Axis {
    fn default() -> Self {
        Self {
            title: None,
            axis_type: None,
            visible: true,
            range: None,
            tick_count: None,
        }
    }
}

impl Axis {
    #[must_use]
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn hidden() -> Self {
        Self {
            visible: false,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_type(mut self, axis_type: AxisType) -> Self {
        self.axis_type = Some(axis_type);
        self
    }

    #[must_use]
    pub fn with_range(mut self, min: f64, max: f64) -> Self {
        self.range = Some((min, max));
        self
    }

    #[must_use]
    pub fn with_tick_count(mut self, tick_count: u32) -> Self {
        self.tick_count = Some(tick_count);
        self
    }

    fn validate(&self, label: &str) -> ChartResult<()> {
        if let Some((min, max)) = self.range {
            if !min.is_finite() || !max.is_finite() || min >= max {
                return Err(ChartError::InvalidData(format!(
                    "{label} range must be finite with min < max"
                )));
            }
            if self.axis_type == Some(AxisType::Log) && min <= 0.0 {
                return Err(ChartError::InvalidData(format!(
                    "{label} log range must be > 0"
                )));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HoverMode {
    Closest,
    X,
    Y,
    Disabled,
}

impl HoverMode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Closest => "closest",
            Self::X => "x",
            Self::Y => "y",
            Self::Disabled => "false",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BarMode {
    Group,
    Stack,
    Overlay,
}

impl BarMode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Group => "group",
            Self::Stack => "stack",
            Self::Overlay => "overlay",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubplotGrid {
    pub rows: usize,
    pub cols: usize,
    #[serde(default)]
    pub titles: Vec<String>,
}

/// Presentation metadata shared by all traces of a figure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FigureLayout {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default)]
    pub x_axis: Axis,
    #[serde(default)]
    pub y_axis: Axis,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hover_mode: Option<HoverMode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bar_mode: Option<BarMode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_legend: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub margin_left: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grid: Option<SubplotGrid>,
}

impl FigureLayout {
    #[must_use]
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_x_axis(mut self, axis: Axis) -> Self {
        self.x_axis = axis;
        self
    }

    #[must_use]
    pub fn with_y_axis(mut self, axis: Axis) -> Self {
        self.y_axis = axis;
        self
    }

    #[must_use]
    pub fn with_hover_mode(mut self, hover_mode: HoverMode) -> Self {
        self.hover_mode = Some(hover_mode);
        self
    }

    #[must_use]
    pub fn with_bar_mode(mut self, bar_mode: BarMode) -> Self {
        self.bar_mode = Some(bar_mode);
        self
    }

    #[must_use]
    pub fn with_show_legend(mut self, show_legend: bool) -> Self {
        self.show_legend = Some(show_legend);
        self
    }

    #[must_use]
    pub fn with_height(mut self, height: u32) -> Self {
        self.height = Some(height);
        self
    }

    #[must_use]
    pub fn with_margin_left(mut self, margin_left: u32) -> Self {
        self.margin_left = Some(margin_left);
        self
    }
}

/// Ordered traces plus shared layout, consumed once by a writer or an
/// output publication.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Figure {
    pub traces: Vec<Trace>,
    #[serde(default)]
    pub layout: FigureLayout,
}

impl Figure {
    #[must_use]
    pub fn new(traces: Vec<Trace>) -> Self {
        Self {
            traces,
            layout: FigureLayout::default(),
        }
    }

    /// Empty figure with a `rows x cols` subplot grid.
    pub fn subplots(rows: usize, cols: usize, titles: Vec<String>) -> ChartResult<Self> {
        if rows == 0 || cols == 0 {
            return Err(ChartError::InvalidData(
                "subplot grid must have at least one row and one column".to_owned(),
            ));
        }
        if titles.len() > rows * cols {
            return Err(ChartError::InvalidData(format!(
                "{} subplot titles for {} cells",
                titles.len(),
                rows * cols
            )));
        }
        Ok(Self {
            traces: Vec::new(),
            layout: FigureLayout {
                grid: Some(SubplotGrid { rows, cols, titles }),
                ..FigureLayout::default()
            },
        })
    }

    #[must_use]
    pub fn with_layout(mut self, layout: FigureLayout) -> Self {
        let grid = self.layout.grid.take();
        self.layout = layout;
        if self.layout.grid.is_none() {
            self.layout.grid = grid;
        }
        self
    }

    #[must_use]
    pub fn with_trace(mut self, trace: Trace) -> Self {
        self.traces.push(trace);
        self
    }

    /// Appends a trace placed in a 1-based grid cell.
    pub fn with_trace_at(self, trace: Trace, row: usize, col: usize) -> ChartResult<Self> {
        let Some(grid) = &self.layout.grid else {
            return Err(ChartError::InvalidData(
                "figure has no subplot grid".to_owned(),
            ));
        };
        if row == 0 || col == 0 || row > grid.rows || col > grid.cols {
            return Err(ChartError::InvalidData(format!(
                "subplot cell ({row}, {col}) outside {}x{} grid",
                grid.rows, grid.cols
            )));
        }
        Ok(self.with_trace(trace.in_cell(row, col)))
    }

    #[must_use]
    pub fn trace_count(&self) -> usize {
        self.traces.len()
    }

    #[must_use]
    pub fn point_count(&self) -> usize {
        self.traces.iter().map(Trace::point_count).sum()
    }

    pub fn validate(&self) -> ChartResult<()> {
        self.layout.x_axis.validate("x-axis")?;
        self.layout.y_axis.validate("y-axis")?;
        for trace in &self.traces {
            trace.validate()?;
            if let Some(cell) = trace.subplot {
                let Some(grid) = &self.layout.grid else {
                    return Err(ChartError::InvalidData(
                        "trace placed in a subplot cell but figure has no grid".to_owned(),
                    ));
                };
                if cell.row > grid.rows || cell.col > grid.cols {
                    return Err(ChartError::InvalidData(format!(
                        "subplot cell ({}, {}) outside {}x{} grid",
                        cell.row, cell.col, grid.rows, grid.cols
                    )));
                }
            }
        }
        Ok(())
    }
}
