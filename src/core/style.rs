use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};

/// RGBA color in normalized 0..=1 channel values.
///
/// Serialized as a CSS color string so figures stay readable as JSON.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub red: f64,
    pub green: f64,
    pub blue: f64,
    pub alpha: f64,
}

impl Color {
    #[must_use]
    pub const fn rgba(red: f64, green: f64, blue: f64, alpha: f64) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    #[must_use]
    pub const fn rgb(red: f64, green: f64, blue: f64) -> Self {
        Self::rgba(red, green, blue, 1.0)
    }

    #[must_use]
    pub fn from_rgb8(red: u8, green: u8, blue: u8) -> Self {
        Self::rgb(
            f64::from(red) / 255.0,
            f64::from(green) / 255.0,
            f64::from(blue) / 255.0,
        )
    }

    pub fn validate(self) -> ChartResult<()> {
        for (channel, value) in [
            ("red", self.red),
            ("green", self.green),
            ("blue", self.blue),
            ("alpha", self.alpha),
        ] {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(ChartError::InvalidData(format!(
                    "color channel `{channel}` must be finite and in [0, 1]"
                )));
            }
        }
        Ok(())
    }

    /// Parses `#rgb`, `#rrggbb`, `rgb(r,g,b)`, `rgba(r,g,b,a)` or a basic
    /// color name.
    pub fn parse_css(input: &str) -> ChartResult<Self> {
        let value = input.trim().to_ascii_lowercase();
        let invalid = || ChartError::InvalidData(format!("unsupported css color `{input}`"));

        if let Some(hex) = value.strip_prefix('#') {
            if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
                return Err(invalid());
            }
            let expanded: String = match hex.len() {
                3 => hex.chars().flat_map(|c| [c, c]).collect(),
                6 => hex.to_owned(),
                _ => return Err(invalid()),
            };
            let channel = |range: std::ops::Range<usize>| {
                u8::from_str_radix(&expanded[range], 16).map_err(|_| invalid())
            };
            return Ok(Self::from_rgb8(channel(0..2)?, channel(2..4)?, channel(4..6)?));
        }

        let functional = value
            .strip_prefix("rgba(")
            .or_else(|| value.strip_prefix("rgb("))
            .and_then(|rest| rest.strip_suffix(')'));
        if let Some(body) = functional {
            let parts: Vec<f64> = body
                .split(',')
                .map(|part| part.trim().parse::<f64>().map_err(|_| invalid()))
                .collect::<ChartResult<_>>()?;
            let (r, g, b, a) = match parts.as_slice() {
                [r, g, b] => (*r, *g, *b, 1.0),
                [r, g, b, a] => (*r, *g, *b, *a),
                _ => return Err(invalid()),
            };
            let color = Self::rgba(r / 255.0, g / 255.0, b / 255.0, a);
            color.validate()?;
            return Ok(color);
        }

        let named = match value.as_str() {
            "black" => Self::rgb(0.0, 0.0, 0.0),
            "white" => Self::rgb(1.0, 1.0, 1.0),
            "red" => Self::rgb(1.0, 0.0, 0.0),
            "green" => Self::from_rgb8(0, 128, 0),
            "blue" => Self::rgb(0.0, 0.0, 1.0),
            "gray" | "grey" => Self::from_rgb8(128, 128, 128),
            "transparent" => Self::rgba(0.0, 0.0, 0.0, 0.0),
            _ => return Err(invalid()),
        };
        Ok(named)
    }

    #[must_use]
    pub fn to_css(self) -> String {
        let channel = |value: f64| (value.clamp(0.0, 1.0) * 255.0).round() as u8;
        if self.alpha >= 1.0 {
            format!(
                "rgb({},{},{})",
                channel(self.red),
                channel(self.green),
                channel(self.blue)
            )
        } else {
            format!(
                "rgba({},{},{},{})",
                channel(self.red),
                channel(self.green),
                channel(self.blue),
                self.alpha
            )
        }
    }
}

impl TryFrom<String> for Color {
    type Error = ChartError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse_css(&value)
    }
}

impl From<Color> for String {
    fn from(value: Color) -> Self {
        value.to_css()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MarkerSymbol {
    Circle,
    Square,
    Diamond,
    Cross,
    Pentagon,
    Hexagram,
    TriangleUp,
}

impl MarkerSymbol {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Circle => "circle",
            Self::Square => "square",
            Self::Diamond => "diamond",
            Self::Cross => "cross",
            Self::Pentagon => "pentagon",
            Self::Hexagram => "hexagram",
            Self::TriangleUp => "triangle-up",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineDash {
    Solid,
    Dash,
    Dot,
    DashDot,
}

impl LineDash {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Solid => "solid",
            Self::Dash => "dash",
            Self::Dot => "dot",
            Self::DashDot => "dashdot",
        }
    }
}

/// Point encoding for scatter, bubble and bar traces.
///
/// `sizes` carries one size per point (bubble charts) and wins over `size`.
/// `color_values` maps one number per point onto a color scale and wins
/// over `color`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MarkerStyle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sizes: Option<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color_values: Option<Vec<f64>>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub show_color_scale: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol: Option<MarkerSymbol>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outline_width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outline_color: Option<Color>,
}

impl MarkerStyle {
    #[must_use]
    pub fn with_size(mut self, size: f64) -> Self {
        self.size = Some(size);
        self
    }

    #[must_use]
    pub fn with_sizes(mut self, sizes: Vec<f64>) -> Self {
        self.sizes = Some(sizes);
        self
    }

    #[must_use]
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    /// Colors each point by `values` on a continuous scale.
    #[must_use]
    pub fn with_color_values(mut self, values: Vec<f64>, show_scale: bool) -> Self {
        self.color_values = Some(values);
        self.show_color_scale = show_scale;
        self
    }

    #[must_use]
    pub fn with_opacity(mut self, opacity: f64) -> Self {
        self.opacity = Some(opacity);
        self
    }

    #[must_use]
    pub fn with_symbol(mut self, symbol: MarkerSymbol) -> Self {
        self.symbol = Some(symbol);
        self
    }

    #[must_use]
    pub fn with_outline(mut self, width: f64, color: Option<Color>) -> Self {
        self.outline_width = Some(width);
        self.outline_color = color;
        self
    }

    pub fn validate(&self, point_count: usize) -> ChartResult<()> {
        if let Some(size) = self.size {
            if !size.is_finite() || size <= 0.0 {
                return Err(ChartError::InvalidData(
                    "marker size must be finite and > 0".to_owned(),
                ));
            }
        }
        if let Some(sizes) = &self.sizes {
            if sizes.len() != point_count {
                return Err(ChartError::InvalidData(format!(
                    "marker sizes length {} does not match point count {point_count}",
                    sizes.len()
                )));
            }
            if sizes.iter().any(|size| !size.is_finite() || *size < 0.0) {
                return Err(ChartError::InvalidData(
                    "marker sizes must be finite and >= 0".to_owned(),
                ));
            }
        }
        if let Some(values) = &self.color_values {
            if values.len() != point_count {
                return Err(ChartError::InvalidData(format!(
                    "marker color values length {} does not match point count {point_count}",
                    values.len()
                )));
            }
            if values.iter().any(|value| !value.is_finite()) {
                return Err(ChartError::InvalidData(
                    "marker color values must be finite".to_owned(),
                ));
            }
        }
        if let Some(opacity) = self.opacity {
            if !opacity.is_finite() || !(0.0..=1.0).contains(&opacity) {
                return Err(ChartError::InvalidData(
                    "marker opacity must be finite and in [0, 1]".to_owned(),
                ));
            }
        }
        if let Some(width) = self.outline_width {
            if !width.is_finite() || width < 0.0 {
                return Err(ChartError::InvalidData(
                    "marker outline width must be finite and >= 0".to_owned(),
                ));
            }
        }
        for color in [self.color, self.outline_color].into_iter().flatten() {
            color.validate()?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LineStyle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dash: Option<LineDash>,
}

impl LineStyle {
    #[must_use]
    pub fn with_width(mut self, width: f64) -> Self {
        self.width = Some(width);
        self
    }

    #[must_use]
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    #[must_use]
    pub fn with_dash(mut self, dash: LineDash) -> Self {
        self.dash = Some(dash);
        self
    }

    pub fn validate(self) -> ChartResult<()> {
        if let Some(width) = self.width {
            if !width.is_finite() || width < 0.0 {
                return Err(ChartError::InvalidData(
                    "line width must be finite and >= 0".to_owned(),
                ));
            }
        }
        if let Some(color) = self.color {
            color.validate()?;
        }
        Ok(())
    }
}
