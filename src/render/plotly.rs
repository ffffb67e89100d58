use serde_json::{Map, Value, json};

use crate::core::{
    Axis, Figure, FigureLayout, HistogramNormalization, HoverMode, LineStyle, MarkerStyle,
    SubplotGrid, Trace, TraceKind,
};

/// Converts a figure into the plotly.js `{data, layout}` object.
///
/// Subplot cells map to axis pairs `x{n}`/`y{n}` numbered row-major from 1.
#[must_use]
pub fn figure_to_plotly(figure: &Figure) -> Value {
    let cols = figure.layout.grid.as_ref().map_or(1, |grid| grid.cols.max(1));
    let data: Vec<Value> = figure
        .traces
        .iter()
        .map(|trace| trace_to_plotly(trace, cols))
        .collect();
    json!({
        "data": data,
        "layout": layout_to_plotly(&figure.layout),
    })
}

fn axis_suffix(index: usize) -> String {
    if index <= 1 {
        String::new()
    } else {
        index.to_string()
    }
}

fn trace_to_plotly(trace: &Trace, cols: usize) -> Value {
    let mut out = Map::new();
    out.insert("type".into(), json!(trace.kind.type_name()));
    if let Some(name) = &trace.name {
        out.insert("name".into(), json!(name));
    }

    match trace.kind {
        TraceKind::Scatter { mode } => {
            out.insert("mode".into(), json!(mode.as_str()));
            out.insert("x".into(), json!(trace.x));
            out.insert("y".into(), json!(trace.y));
        }
        TraceKind::Bar => {
            out.insert("x".into(), json!(trace.x));
            out.insert("y".into(), json!(trace.y));
        }
        TraceKind::Box => {
            if !trace.x.is_empty() {
                out.insert("x".into(), json!(trace.x));
            }
            out.insert("y".into(), json!(trace.y));
        }
        TraceKind::Histogram {
            bin_size,
            bin_range,
            normalization,
        } => {
            out.insert("x".into(), json!(trace.x));
            let mut xbins = Map::new();
            if let Some((start, end)) = bin_range {
                xbins.insert("start".into(), json!(start));
                xbins.insert("end".into(), json!(end));
            }
            if let Some(size) = bin_size {
                xbins.insert("size".into(), json!(size));
            }
            if !xbins.is_empty() {
                out.insert("xbins".into(), Value::Object(xbins));
            }
            if normalization == HistogramNormalization::ProbabilityDensity {
                out.insert("histnorm".into(), json!("probability density"));
            }
        }
        TraceKind::Heatmap => {
            out.insert("x".into(), json!(trace.x));
            out.insert("y".into(), json!(trace.y));
            out.insert("z".into(), json!(trace.z));
        }
    }

    if !trace.text.is_empty() {
        out.insert("text".into(), json!(trace.text));
        out.insert("hoverinfo".into(), json!("text"));
    }
    if let Some(marker) = marker_to_plotly(&trace.marker) {
        out.insert("marker".into(), marker);
    }
    if let Some(line) = line_to_plotly(trace.line) {
        out.insert("line".into(), line);
    }
    if let Some(cell) = trace.subplot {
        let index = cell.row.saturating_sub(1) * cols + cell.col;
        out.insert("xaxis".into(), json!(format!("x{}", axis_suffix(index))));
        out.insert("yaxis".into(), json!(format!("y{}", axis_suffix(index))));
    }
    Value::Object(out)
}

fn marker_to_plotly(marker: &MarkerStyle) -> Option<Value> {
    let mut out = Map::new();
    if let Some(sizes) = &marker.sizes {
        out.insert("size".into(), json!(sizes));
    } else if let Some(size) = marker.size {
        out.insert("size".into(), json!(size));
    }
    if let Some(values) = &marker.color_values {
        out.insert("color".into(), json!(values));
        if marker.show_color_scale {
            out.insert("showscale".into(), json!(true));
        }
    } else if let Some(color) = marker.color {
        out.insert("color".into(), json!(color.to_css()));
    }
    if let Some(opacity) = marker.opacity {
        out.insert("opacity".into(), json!(opacity));
    }
    if let Some(symbol) = marker.symbol {
        out.insert("symbol".into(), json!(symbol.as_str()));
    }
    if marker.outline_width.is_some() || marker.outline_color.is_some() {
        let mut outline = Map::new();
        if let Some(width) = marker.outline_width {
            outline.insert("width".into(), json!(width));
        }
        if let Some(color) = marker.outline_color {
            outline.insert("color".into(), json!(color.to_css()));
        }
        out.insert("line".into(), Value::Object(outline));
    }
    (!out.is_empty()).then_some(Value::Object(out))
}

fn line_to_plotly(line: LineStyle) -> Option<Value> {
    let mut out = Map::new();
    if let Some(width) = line.width {
        out.insert("width".into(), json!(width));
    }
    if let Some(color) = line.color {
        out.insert("color".into(), json!(color.to_css()));
    }
    if let Some(dash) = line.dash {
        out.insert("dash".into(), json!(dash.as_str()));
    }
    (!out.is_empty()).then_some(Value::Object(out))
}

fn axis_to_plotly(axis: &Axis) -> Value {
    let mut out = Map::new();
    if let Some(title) = &axis.title {
        out.insert("title".into(), json!({ "text": title }));
    }
    if let Some(axis_type) = axis.axis_type {
        out.insert("type".into(), json!(axis_type.as_str()));
    }
    if !axis.visible {
        out.insert("visible".into(), json!(false));
    }
    if let Some((min, max)) = axis.range {
        out.insert("range".into(), json!([min, max]));
    }
    if let Some(count) = axis.tick_count {
        out.insert("nticks".into(), json!(count));
    }
    Value::Object(out)
}

/// Titles sit centered above each cell, row-major.
fn subplot_title_annotations(grid: &SubplotGrid) -> Value {
    let rows = grid.rows.max(1) as f64;
    let cols = grid.cols.max(1);
    let annotations: Vec<Value> = grid
        .titles
        .iter()
        .enumerate()
        .map(|(index, title)| {
            let row = (index / cols) as f64;
            let col = (index % cols) as f64;
            json!({
                "text": title,
                "showarrow": false,
                "xref": "paper",
                "yref": "paper",
                "x": (col + 0.5) / cols as f64,
                "y": 1.0 - row / rows,
                "xanchor": "center",
                "yanchor": "bottom",
            })
        })
        .collect();
    Value::Array(annotations)
}

fn layout_to_plotly(layout: &FigureLayout) -> Value {
    let mut out = Map::new();
    if let Some(title) = &layout.title {
        out.insert("title".into(), json!({ "text": title }));
    }
    out.insert("xaxis".into(), axis_to_plotly(&layout.x_axis));
    out.insert("yaxis".into(), axis_to_plotly(&layout.y_axis));
    if let Some(mode) = layout.hover_mode {
        let value = match mode {
            HoverMode::Disabled => json!(false),
            _ => json!(mode.as_str()),
        };
        out.insert("hovermode".into(), value);
    }
    if let Some(mode) = layout.bar_mode {
        out.insert("barmode".into(), json!(mode.as_str()));
    }
    if let Some(show) = layout.show_legend {
        out.insert("showlegend".into(), json!(show));
    }
    if let Some(height) = layout.height {
        out.insert("height".into(), json!(height));
    }
    if let Some(left) = layout.margin_left {
        out.insert("margin".into(), json!({ "l": left }));
    }
    if let Some(grid) = &layout.grid {
        out.insert(
            "grid".into(),
            json!({ "rows": grid.rows, "columns": grid.cols, "pattern": "independent" }),
        );
        if !grid.titles.is_empty() {
            out.insert("annotations".into(), subplot_title_annotations(grid));
        }
    }
    Value::Object(out)
}
