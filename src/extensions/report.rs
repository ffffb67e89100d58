//! Static chart catalogue built from the auto-mpg table.

use crate::core::{
    Axis, AxisType, BarMode, Figure, FigureLayout, HoverMode, MarkerStyle, RecordSet, Scalar,
    ScatterMode, Series, Trace, distribution_figure, project_series,
};
use crate::error::ChartResult;

/// One named figure of the static report.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportFigure {
    pub name: String,
    pub figure: Figure,
}

impl ReportFigure {
    fn new(name: &str, figure: Figure) -> Self {
        Self {
            name: name.to_owned(),
            figure,
        }
    }
}

const HISTOGRAM_BIN_SIZE: f64 = 2.0;
const HISTOGRAM_START: f64 = 0.0;
const HISTOGRAM_END: f64 = 50.0;

/// Builds every report figure. Absent columns produce empty traces.
pub fn report_figures(mpg: &RecordSet) -> ChartResult<Vec<ReportFigure>> {
    let cylinders = mpg.unique("cylinders");
    let mut figures = vec![
        ReportFigure::new("scatter", scatter_figure(mpg)),
        ReportFigure::new("line", line_figure(mpg)?),
        ReportFigure::new("bubble", bubble_figure(mpg)),
        ReportFigure::new("bar", bar_figure(mpg, &cylinders)?),
        ReportFigure::new("box", box_figure(mpg, &cylinders)),
        ReportFigure::new("histogram", histogram_figure(mpg)),
        ReportFigure::new("heatmap", heatmap_figure(mpg, &cylinders)?),
        ReportFigure::new("subplots", subplot_figure(mpg)?),
    ];

    let groups: Vec<(String, Vec<f64>)> = cylinders
        .iter()
        .map(|value| {
            (
                format!("{value} cylinders"),
                mpg.filter_eq("cylinders", value).numeric_column("mpg"),
            )
        })
        .filter(|(_, samples)| !samples.is_empty())
        .collect();
    if !groups.is_empty() {
        let bin_sizes = vec![HISTOGRAM_BIN_SIZE; groups.len()];
        figures.push(ReportFigure::new(
            "distribution",
            distribution_figure(&groups, &bin_sizes)?,
        ));
    }
    Ok(figures)
}

fn axes(title: &str, x: &str, y: &str) -> FigureLayout {
    FigureLayout::titled(title)
        .with_x_axis(Axis::titled(x))
        .with_y_axis(Axis::titled(y))
}

fn scatter_figure(mpg: &RecordSet) -> Figure {
    let series = project_series(mpg, "horsepower", "mpg", "");
    Figure::new(vec![
        Trace::scatter(series, ScatterMode::Markers)
            .with_marker(MarkerStyle::default().with_size(8.0).with_opacity(0.7)),
    ])
    .with_layout(axes("Horsepower vs MPG", "Horsepower", "MPG"))
}

/// Average mpg per model year as three line modes.
fn line_figure(mpg: &RecordSet) -> ChartResult<Figure> {
    let years = mpg.unique("model_year");
    let mut x = Vec::with_capacity(years.len());
    let mut y = Vec::with_capacity(years.len());
    for year in &years {
        let values = mpg.filter_eq("model_year", year).numeric_column("mpg");
        if values.is_empty() {
            continue;
        }
        x.push(year.clone());
        y.push(Scalar::Number(values.iter().sum::<f64>() / values.len() as f64));
    }
    let shifted: Vec<Scalar> = y
        .iter()
        .map(|value| Scalar::Number(value.as_f64().unwrap_or_default() + 5.0))
        .collect();
    let lowered: Vec<Scalar> = y
        .iter()
        .map(|value| Scalar::Number(value.as_f64().unwrap_or_default() - 5.0))
        .collect();

    let trace = |name: &str, values: Vec<Scalar>, mode| -> ChartResult<Trace> {
        Ok(Trace::scatter(Series::new(name, x.clone(), values)?, mode))
    };
    Ok(Figure::new(vec![
        trace("markers", shifted, ScatterMode::Markers)?,
        trace("lines+markers", y.clone(), ScatterMode::LinesAndMarkers)?,
        trace("lines", lowered, ScatterMode::Lines)?,
    ])
    .with_layout(axes("Average MPG by Model Year", "Model Year", "MPG")))
}

/// Marker size follows cylinder count; color follows weight on a scale.
fn bubble_figure(mpg: &RecordSet) -> Figure {
    let series = project_series(mpg, "horsepower", "mpg", "");
    let per_row = |column: &str, default: f64, scale: f64| -> Vec<f64> {
        mpg.rows()
            .iter()
            .map(|row| {
                row.get(column)
                    .and_then(Scalar::as_f64)
                    .map_or(default, |value| value * scale)
            })
            .collect()
    };
    let sizes = per_row("cylinders", 8.0, 2.0);
    let weights = per_row("weight", 0.0, 1.0);
    let names: Vec<String> = mpg
        .column("name")
        .unwrap_or_default()
        .iter()
        .map(ToString::to_string)
        .collect();

    let points = series.len();
    let mut marker = MarkerStyle::default();
    if sizes.len() == points {
        marker = marker.with_sizes(sizes).with_color_values(weights, true);
    }
    let text = if names.len() == points { names } else { Vec::new() };
    Figure::new(vec![
        Trace::scatter(series, ScatterMode::Markers)
            .with_marker(marker)
            .with_text(text),
    ])
    .with_layout(axes("Bubble Chart", "horsepower", "mpg").with_hover_mode(HoverMode::Closest))
}

/// Vehicle count per model year, stacked by cylinder count.
fn bar_figure(mpg: &RecordSet, cylinders: &[Scalar]) -> ChartResult<Figure> {
    let years = mpg.unique("model_year");
    let traces = cylinders
        .iter()
        .map(|value| {
            let subset = mpg.filter_eq("cylinders", value);
            let counts = years
                .iter()
                .map(|year| Scalar::Number(subset.filter_eq("model_year", year).len() as f64))
                .collect();
            Ok(Trace::bar(Series::new(
                format!("{value} cylinders"),
                years.clone(),
                counts,
            )?))
        })
        .collect::<ChartResult<Vec<_>>>()?;
    Ok(Figure::new(traces).with_layout(
        axes("Vehicles per Model Year", "Model Year", "Vehicles").with_bar_mode(BarMode::Stack),
    ))
}

fn box_figure(mpg: &RecordSet, cylinders: &[Scalar]) -> Figure {
    let traces = cylinders
        .iter()
        .map(|value| {
            let samples = mpg
                .filter_eq("cylinders", value)
                .numeric_column("mpg")
                .into_iter()
                .map(Scalar::Number)
                .collect();
            Trace::box_plot(format!("{value} cylinders"), samples)
        })
        .collect();
    Figure::new(traces).with_layout(axes("MPG by Cylinders", "Cylinders", "MPG"))
}

fn histogram_figure(mpg: &RecordSet) -> Figure {
    let samples = mpg.column("mpg").unwrap_or_default();
    Figure::new(vec![
        Trace::histogram("mpg", samples, Some(HISTOGRAM_BIN_SIZE))
            .with_bin_range(HISTOGRAM_START, HISTOGRAM_END),
    ])
    .with_layout(axes("MPG Distribution", "MPG", "Count"))
}

/// Mean mpg per (model year, cylinders) cell; empty cells are left out.
fn heatmap_figure(mpg: &RecordSet, cylinders: &[Scalar]) -> ChartResult<Figure> {
    let years = mpg.unique("model_year");
    let mut x = Vec::new();
    let mut y = Vec::new();
    let mut z = Vec::new();
    for value in cylinders {
        let subset = mpg.filter_eq("cylinders", value);
        for year in &years {
            let samples = subset.filter_eq("model_year", year).numeric_column("mpg");
            if samples.is_empty() {
                continue;
            }
            x.push(year.clone());
            y.push(Scalar::Text(format!("{value} cyl")));
            z.push(samples.iter().sum::<f64>() / samples.len() as f64);
        }
    }
    Ok(Figure::new(vec![Trace::heatmap("mean mpg", x, y, z)?]).with_layout(
        axes("Mean MPG by Year and Cylinders", "Model Year", "Cylinders")
            .with_y_axis(Axis::titled("Cylinders").with_type(AxisType::Category)),
    ))
}

fn subplot_figure(mpg: &RecordSet) -> ChartResult<Figure> {
    let scatter = Trace::scatter(
        project_series(mpg, "weight", "mpg", "weight"),
        ScatterMode::Markers,
    );
    let acceleration = Trace::scatter(
        project_series(mpg, "acceleration", "mpg", "acceleration"),
        ScatterMode::Markers,
    );
    Figure::subplots(
        1,
        2,
        vec!["Weight".to_owned(), "Acceleration".to_owned()],
    )?
    .with_layout(FigureLayout::titled("MPG Drivers").with_show_legend(false))
    .with_trace_at(scatter, 1, 1)?
    .with_trace_at(acceleration, 1, 2)
}
