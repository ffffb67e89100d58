use serde::{Deserialize, Serialize};

use crate::core::{LineStyle, MarkerStyle, Scalar, Series};
use crate::error::{ChartError, ChartResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScatterMode {
    Markers,
    Lines,
    LinesAndMarkers,
}

impl ScatterMode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Markers => "markers",
            Self::Lines => "lines",
            Self::LinesAndMarkers => "lines+markers",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum HistogramNormalization {
    #[default]
    Count,
    ProbabilityDensity,
}

/// Geometry kind of a trace.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TraceKind {
    Scatter {
        mode: ScatterMode,
    },
    Bar,
    /// Samples live in `y`; `x` is empty or carries one category per sample.
    Box,
    /// Samples live in `x`; `y` is always empty.
    Histogram {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        bin_size: Option<f64>,
        /// Fixed `(start, end)` of the binned x range.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        bin_range: Option<(f64, f64)>,
        #[serde(default)]
        normalization: HistogramNormalization,
    },
    /// Flat `(x, y, z)` triplets.
    Heatmap,
}

impl TraceKind {
    #[must_use]
    pub const fn type_name(self) -> &'static str {
        match self {
            Self::Scatter { .. } => "scatter",
            Self::Bar => "bar",
            Self::Box => "box",
            Self::Histogram { .. } => "histogram",
            Self::Heatmap => "heatmap",
        }
    }
}

/// 1-based cell of a subplot grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubplotCell {
    pub row: usize,
    pub col: usize,
}

/// Chart descriptor: data plus visual encoding.
///
/// Builders consume `self`; a recomputation always constructs a new trace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trace {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub kind: TraceKind,
    #[serde(default)]
    pub x: Vec<Scalar>,
    #[serde(default)]
    pub y: Vec<Scalar>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub z: Vec<f64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub text: Vec<String>,
    #[serde(default)]
    pub marker: MarkerStyle,
    #[serde(default)]
    pub line: LineStyle,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subplot: Option<SubplotCell>,
}

impl Trace {
    fn from_parts(name: Option<String>, kind: TraceKind, x: Vec<Scalar>, y: Vec<Scalar>) -> Self {
        Self {
            name,
            kind,
            x,
            y,
            z: Vec::new(),
            text: Vec::new(),
            marker: MarkerStyle::default(),
            line: LineStyle::default(),
            subplot: None,
        }
    }

    /// Scatter trace named after the series. Empty series stay empty plots.
    #[must_use]
    pub fn scatter(series: Series, mode: ScatterMode) -> Self {
        let name = (!series.name.is_empty()).then_some(series.name);
        Self::from_parts(name, TraceKind::Scatter { mode }, series.x, series.y)
    }

    #[must_use]
    pub fn bar(series: Series) -> Self {
        let name = (!series.name.is_empty()).then_some(series.name);
        Self::from_parts(name, TraceKind::Bar, series.x, series.y)
    }

    #[must_use]
    pub fn box_plot(name: impl Into<String>, samples: Vec<Scalar>) -> Self {
        Self::from_parts(Some(name.into()), TraceKind::Box, Vec::new(), samples)
    }

    #[must_use]
    pub fn histogram(name: impl Into<String>, samples: Vec<Scalar>, bin_size: Option<f64>) -> Self {
        Self::from_parts(
            Some(name.into()),
            TraceKind::Histogram {
                bin_size,
                bin_range: None,
                normalization: HistogramNormalization::Count,
            },
            samples,
            Vec::new(),
        )
    }

    pub fn heatmap(
        name: impl Into<String>,
        x: Vec<Scalar>,
        y: Vec<Scalar>,
        z: Vec<f64>,
    ) -> ChartResult<Self> {
        if x.len() != y.len() || x.len() != z.len() {
            return Err(ChartError::InvalidData(format!(
                "heatmap x/y/z lengths differ: {}/{}/{}",
                x.len(),
                y.len(),
                z.len()
            )));
        }
        let mut trace = Self::from_parts(Some(name.into()), TraceKind::Heatmap, x, y);
        trace.z = z;
        Ok(trace)
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn with_marker(mut self, marker: MarkerStyle) -> Self {
        self.marker = marker;
        self
    }

    #[must_use]
    pub fn with_line(mut self, line: LineStyle) -> Self {
        self.line = line;
        self
    }

    #[must_use]
    pub fn with_text(mut self, text: Vec<String>) -> Self {
        self.text = text;
        self
    }

    #[must_use]
    pub fn with_normalization(mut self, normalization: HistogramNormalization) -> Self {
        if let TraceKind::Histogram {
            bin_size,
            bin_range,
            ..
        } = self.kind
        {
            self.kind = TraceKind::Histogram {
                bin_size,
                bin_range,
                normalization,
            };
        }
        self
    }

    /// Pins histogram bins to `start..end`; ignored by other kinds.
    #[must_use]
    pub fn with_bin_range(mut self, start: f64, end: f64) -> Self {
        if let TraceKind::Histogram {
            bin_size,
            normalization,
            ..
        } = self.kind
        {
            self.kind = TraceKind::Histogram {
                bin_size,
                bin_range: Some((start, end)),
                normalization,
            };
        }
        self
    }

    #[must_use]
    pub fn in_cell(mut self, row: usize, col: usize) -> Self {
        self.subplot = Some(SubplotCell { row, col });
        self
    }

    /// Number of plotted samples.
    #[must_use]
    pub fn point_count(&self) -> usize {
        match self.kind {
            TraceKind::Box => self.y.len(),
            TraceKind::Histogram { .. } => self.x.len(),
            TraceKind::Scatter { .. } | TraceKind::Bar | TraceKind::Heatmap => self.x.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.point_count() == 0
    }

    pub fn validate(&self) -> ChartResult<()> {
        match self.kind {
            TraceKind::Scatter { .. } | TraceKind::Bar => {
                if self.x.len() != self.y.len() {
                    return Err(ChartError::InvalidData(format!(
                        "{} trace x/y lengths differ: {} vs {}",
                        self.kind.type_name(),
                        self.x.len(),
                        self.y.len()
                    )));
                }
            }
            TraceKind::Box => {
                if !self.x.is_empty() && self.x.len() != self.y.len() {
                    return Err(ChartError::InvalidData(
                        "box trace categories must match sample count".to_owned(),
                    ));
                }
            }
            TraceKind::Histogram {
                bin_size,
                bin_range,
                ..
            } => {
                if !self.y.is_empty() {
                    return Err(ChartError::InvalidData(
                        "histogram trace samples belong on x".to_owned(),
                    ));
                }
                if let Some(size) = bin_size {
                    if !size.is_finite() || size <= 0.0 {
                        return Err(ChartError::InvalidData(
                            "histogram bin size must be finite and > 0".to_owned(),
                        ));
                    }
                }
                if let Some((start, end)) = bin_range {
                    if !start.is_finite() || !end.is_finite() || start >= end {
                        return Err(ChartError::InvalidData(format!(
                            "histogram bin range must be finite with start < end, got {start}..{end}"
                        )));
                    }
                }
            }
            TraceKind::Heatmap => {
                if self.x.len() != self.y.len() || self.x.len() != self.z.len() {
                    return Err(ChartError::InvalidData(
                        "heatmap x/y/z lengths differ".to_owned(),
                    ));
                }
            }
        }

        if !self.text.is_empty() && self.text.len() != self.point_count() {
            return Err(ChartError::InvalidData(format!(
                "hover text length {} does not match point count {}",
                self.text.len(),
                self.point_count()
            )));
        }
        if let Some(cell) = self.subplot {
            if cell.row == 0 || cell.col == 0 {
                return Err(ChartError::InvalidData(
                    "subplot cells are 1-based".to_owned(),
                ));
            }
        }

        self.marker.validate(self.point_count())?;
        self.line.validate()
    }
}
