//! The tutorial dashboard: gapminder year picker, mpg feature explorer,
//! wheels image picker, selection density and mpg hover details.
//!
//! Every figure/text builder here is a pure function of the shared
//! [`DemoData`] and the binding's input snapshot.

use std::path::Path;
use std::sync::Arc;

use crate::api::{
    Binding, BindingError, BindingOutcome, BindingResult, Component, ControlOption, InputSnapshot,
    MissingInputPolicy, OutputTarget, OutputValue, SliderMark,
};
use crate::core::{
    Axis, AxisType, Color, Figure, FigureLayout, HoverMode, LineStyle, MarkerStyle, RecordSet,
    Scalar, ScatterMode, Series, Trace, group_series, project_series,
};
use crate::error::ChartResult;
use crate::extensions::{CsvRecordSetLoader, ImageResolver, RecordImageResolver, RecordSetLoader};
use crate::interaction::{ControlKey, Selection};

pub mod ids {
    pub const LIVE_TEXT: &str = "live-text-update";
    pub const EXAMPLE_GRAPH: &str = "example-graph";
    pub const INTERVAL: &str = "interval-component";
    pub const TEXT_INPUT: &str = "text-input";
    pub const SUBMIT_BUTTON: &str = "submit-button";
    pub const SUBMIT_OUTPUT: &str = "my-div";
    pub const YEAR_GRAPH: &str = "graph";
    pub const YEAR_PICKER: &str = "year-picker";
    pub const X_AXIS: &str = "xaxis";
    pub const Y_AXIS: &str = "yaxis";
    pub const FEATURE_GRAPH: &str = "feature-graphic";
    pub const WHEELS: &str = "wheels";
    pub const WHEELS_OUTPUT: &str = "wheels-output";
    pub const COLORS: &str = "colors";
    pub const COLORS_OUTPUT: &str = "colors-output";
    pub const DISPLAY_IMAGE: &str = "display-img";
    pub const WHEEL_PLOT: &str = "wheel-plot";
    pub const CLICK_IMAGE: &str = "hover-data";
    pub const SELECTION_PLOT: &str = "plot";
    pub const DENSITY: &str = "density";
    pub const MPG_SCATTER: &str = "mpg-scatter";
    pub const MPG_LINE: &str = "mpg-line";
    pub const MPG_STATS: &str = "mpg-stats";
}

pub const GAPMINDER_FILE: &str = "gapminder.csv";
pub const MPG_FILE: &str = "mpg.csv";
pub const WHEELS_FILE: &str = "wheels.csv";
pub const IMAGE_DIR: &str = "images";

/// Read-only data shared by every demo binding, loaded once at startup.
pub struct DemoData {
    pub gapminder: RecordSet,
    pub mpg: RecordSet,
    pub wheels: RecordSet,
    pub images: Box<dyn ImageResolver + Send + Sync>,
}

impl DemoData {
    /// Derives the calendar `year` column of the mpg table from
    /// `model_year` when present.
    pub fn new(
        gapminder: RecordSet,
        mpg: RecordSet,
        wheels: RecordSet,
        images: Box<dyn ImageResolver + Send + Sync>,
    ) -> ChartResult<Self> {
        let mpg = if mpg.has_column("model_year") {
            mpg.with_column("year", |_, row| match row.get("model_year") {
                Some(Scalar::Number(year)) => Scalar::Number(1900.0 + year),
                Some(other) => other.clone(),
                None => Scalar::Text(String::new()),
            })?
        } else {
            mpg
        };
        Ok(Self {
            gapminder,
            mpg,
            wheels,
            images,
        })
    }

    /// Loads `gapminder.csv`, `mpg.csv` and `wheels.csv` from `data_dir`;
    /// wheel images resolve under `data_dir/images`.
    pub fn load(data_dir: &Path) -> ChartResult<Self> {
        let loader = CsvRecordSetLoader::new().with_base_dir(data_dir);
        let gapminder = loader.load(GAPMINDER_FILE)?;
        let mpg = loader.load(MPG_FILE)?;
        let wheels = loader.load(WHEELS_FILE)?;
        let images = RecordImageResolver::new(
            Arc::new(wheels.clone()),
            "image",
            data_dir.join(IMAGE_DIR),
        );
        Self::new(gapminder, mpg, wheels, Box::new(images))
    }
}

/// One marker trace per continent for the given year.
#[must_use]
pub fn year_figure(gapminder: &RecordSet, year: &Scalar) -> Figure {
    let filtered = gapminder.filter_eq("year", year);
    let continents = gapminder.unique("continent");
    let traces = group_series(&filtered, "continent", &continents, "gdpPercap", "lifeExp")
        .into_iter()
        .map(|series| {
            Trace::scatter(series, ScatterMode::Markers)
                .with_marker(MarkerStyle::default().with_size(15.0).with_opacity(0.7))
        })
        .collect();

    Figure::new(traces).with_layout(
        FigureLayout::titled("My Plot")
            .with_x_axis(Axis::titled("GDP per Capita").with_type(AxisType::Log))
            .with_y_axis(Axis::titled("Life Expectancy")),
    )
}

/// Scatter of two mpg columns, hover text from `name`.
#[must_use]
pub fn feature_figure(mpg: &RecordSet, x_column: &str, y_column: &str) -> Figure {
    let series = project_series(mpg, x_column, y_column, format!("{x_column} vs {y_column}"));
    let names: Vec<String> = mpg
        .column("name")
        .unwrap_or_default()
        .iter()
        .map(ToString::to_string)
        .collect();
    let text = if names.len() == series.len() {
        names
    } else {
        Vec::new()
    };

    let trace = Trace::scatter(series, ScatterMode::Markers)
        .with_text(text)
        .with_marker(
            MarkerStyle::default()
                .with_size(15.0)
                .with_opacity(0.5)
                .with_outline(0.5, Some(Color::rgb(1.0, 1.0, 1.0))),
        );

    Figure::new(vec![trace]).with_layout(
        FigureLayout::titled("My Plot2")
            .with_x_axis(Axis::titled(x_column))
            .with_y_axis(Axis::titled(y_column))
            .with_hover_mode(HoverMode::Closest),
    )
}

/// Point density of a box/lasso selection, guarded against empty and
/// zero-area selections.
#[must_use]
pub fn density_text(selection: &Selection) -> String {
    match selection.density() {
        Some(density) => format!("Density is {density:.2}"),
        None => "Density is undefined".to_owned(),
    }
}

fn mpg_number(mpg: &RecordSet, index: usize, column: &str) -> Result<f64, BindingError> {
    mpg.value(index, column)
        .and_then(Scalar::as_f64)
        .ok_or_else(|| BindingError::InvalidData(format!("row {index} has no numeric `{column}`")))
}

/// Acceleration gauge for the hovered car: a line from 0 to miles per
/// minute, scaled against the fastest car.
pub fn hover_line_figure(mpg: &RecordSet, index: usize) -> Result<Figure, BindingError> {
    let acceleration = mpg_number(mpg, index, "acceleration")?;
    if acceleration <= 0.0 {
        return Err(BindingError::InvalidData(format!(
            "row {index} has non-positive acceleration"
        )));
    }
    let cylinders = mpg_number(mpg, index, "cylinders")?;
    let fastest = mpg
        .numeric_column("acceleration")
        .into_iter()
        .filter(|value| *value > 0.0)
        .reduce(f64::min)
        .unwrap_or(acceleration);
    let name = mpg
        .value(index, "name")
        .map(ToString::to_string)
        .unwrap_or_default();

    let series = Series::from_numbers("", &[0.0, 1.0], &[0.0, 60.0 / acceleration])
        .map_err(|e| BindingError::InvalidData(e.to_string()))?;
    let trace = Trace::scatter(series, ScatterMode::Lines)
        .with_line(LineStyle::default().with_width(2.0 * cylinders));

    Ok(Figure::new(vec![trace]).with_layout(
        FigureLayout::titled(name)
            .with_x_axis(Axis::hidden())
            .with_y_axis(Axis::hidden().with_range(0.0, 60.0 / fastest))
            .with_margin_left(0)
            .with_height(300),
    ))
}

pub fn hover_stats(mpg: &RecordSet, index: usize) -> Result<String, BindingError> {
    let cylinders = mpg_number(mpg, index, "cylinders")?;
    let displacement = mpg_number(mpg, index, "displacement")?;
    let acceleration = mpg_number(mpg, index, "acceleration")?;
    Ok(format!(
        "{} cylinders\n{} cc displacement\nFrom 0 to 60 mph in {} seconds",
        Scalar::Number(cylinders),
        Scalar::Number(displacement),
        Scalar::Number(acceleration)
    ))
}

fn scalar_input(snapshot: &InputSnapshot, index: usize) -> Result<Scalar, BindingError> {
    let value = snapshot.require_input(index)?;
    value.as_scalar().ok_or_else(|| BindingError::UnexpectedInput {
        key: snapshot.inputs()[index].0.clone(),
    })
}

fn hovered_index(snapshot: &InputSnapshot) -> Result<usize, BindingError> {
    let value = snapshot.require_input(0)?;
    let point = value.as_point().ok_or_else(|| BindingError::UnexpectedInput {
        key: snapshot.inputs()[0].0.clone(),
    })?;
    point
        .point_index
        .ok_or_else(|| BindingError::InvalidData("hover point carries no index".to_owned()))
}

fn image_for(data: &DemoData, wheels: Scalar, color: Scalar) -> BindingResult {
    let image = data
        .images
        .resolve(&[("wheels", wheels), ("color", color)])
        .map_err(|e| BindingError::MissingImage(e.to_string()))?;
    Ok(BindingOutcome::Publish(OutputValue::Image(image)))
}

fn publish_text(text: String) -> BindingResult {
    Ok(BindingOutcome::Publish(OutputValue::Text(text)))
}

/// All bindings of the tutorial dashboard.
#[must_use]
pub fn demo_bindings() -> Vec<Binding<DemoData>> {
    vec![
        Binding::new(OutputTarget::new(ids::LIVE_TEXT, "children"), |_, snapshot| {
            publish_text(format!("Crash free for {} refreshes.", scalar_input(snapshot, 0)?))
        })
        .with_input(ControlKey::new(ids::INTERVAL, "n_intervals")),
        Binding::new(
            OutputTarget::new(ids::SUBMIT_OUTPUT, "children"),
            |_, snapshot| {
                let clicks = scalar_input(snapshot, 0)?;
                let text = snapshot
                    .state(0)
                    .map(ToString::to_string)
                    .unwrap_or_default();
                publish_text(format!("You entered: {text} and clicked {clicks} times."))
            },
        )
        .with_input(ControlKey::new(ids::SUBMIT_BUTTON, "n_clicks"))
        .with_state(ControlKey::value(ids::TEXT_INPUT)),
        Binding::new(
            OutputTarget::new(ids::YEAR_GRAPH, "figure"),
            |data: &DemoData, snapshot| {
                let year = scalar_input(snapshot, 0)?;
                Ok(BindingOutcome::Publish(OutputValue::Figure(year_figure(
                    &data.gapminder,
                    &year,
                ))))
            },
        )
        .with_input(ControlKey::value(ids::YEAR_PICKER))
        .with_missing_input_policy(MissingInputPolicy::NoUpdate),
        Binding::new(
            OutputTarget::new(ids::FEATURE_GRAPH, "figure"),
            |data: &DemoData, snapshot| {
                let x_column = scalar_input(snapshot, 0)?.to_string();
                let y_column = scalar_input(snapshot, 1)?.to_string();
                Ok(BindingOutcome::Publish(OutputValue::Figure(feature_figure(
                    &data.mpg, &x_column, &y_column,
                ))))
            },
        )
        .with_input(ControlKey::value(ids::X_AXIS))
        .with_input(ControlKey::value(ids::Y_AXIS))
        .with_missing_input_policy(MissingInputPolicy::NoUpdate),
        Binding::new(
            OutputTarget::new(ids::WHEELS_OUTPUT, "children"),
            |_, snapshot| publish_text(format!("You chose {}", scalar_input(snapshot, 0)?)),
        )
        .with_input(ControlKey::value(ids::WHEELS)),
        Binding::new(
            OutputTarget::new(ids::COLORS_OUTPUT, "children"),
            |_, snapshot| publish_text(format!("You chose {}", scalar_input(snapshot, 0)?)),
        )
        .with_input(ControlKey::value(ids::COLORS)),
        Binding::new(
            OutputTarget::new(ids::DISPLAY_IMAGE, "src"),
            |data: &DemoData, snapshot| {
                image_for(data, scalar_input(snapshot, 0)?, scalar_input(snapshot, 1)?)
            },
        )
        .with_input(ControlKey::value(ids::WHEELS))
        .with_input(ControlKey::value(ids::COLORS))
        .with_missing_input_policy(MissingInputPolicy::NoUpdate),
        Binding::new(
            OutputTarget::new(ids::CLICK_IMAGE, "src"),
            |data: &DemoData, snapshot| {
                let value = snapshot.require_input(0)?;
                let point = value.as_point().ok_or_else(|| BindingError::UnexpectedInput {
                    key: snapshot.inputs()[0].0.clone(),
                })?;
                image_for(data, point.y.clone(), point.x.clone())
            },
        )
        .with_input(ControlKey::new(ids::WHEEL_PLOT, "clickData"))
        .with_missing_input_policy(MissingInputPolicy::NoUpdate),
        Binding::new(OutputTarget::new(ids::DENSITY, "children"), |_, snapshot| {
            let value = snapshot.require_input(0)?;
            let selection = value.as_selection().ok_or_else(|| BindingError::UnexpectedInput {
                key: snapshot.inputs()[0].0.clone(),
            })?;
            publish_text(density_text(selection))
        })
        .with_input(ControlKey::new(ids::SELECTION_PLOT, "selectedData"))
        .with_missing_input_policy(MissingInputPolicy::PublishEmpty),
        Binding::new(
            OutputTarget::new(ids::MPG_LINE, "figure"),
            |data: &DemoData, snapshot| {
                let figure = hover_line_figure(&data.mpg, hovered_index(snapshot)?)?;
                Ok(BindingOutcome::Publish(OutputValue::Figure(figure)))
            },
        )
        .with_input(ControlKey::new(ids::MPG_SCATTER, "hoverData"))
        .with_missing_input_policy(MissingInputPolicy::NoUpdate),
        Binding::new(
            OutputTarget::new(ids::MPG_STATS, "children"),
            |data: &DemoData, snapshot| {
                publish_text(hover_stats(&data.mpg, hovered_index(snapshot)?)?)
            },
        )
        .with_input(ControlKey::new(ids::MPG_SCATTER, "hoverData"))
        .with_missing_input_policy(MissingInputPolicy::NoUpdate),
    ]
}

fn selection_figure() -> Figure {
    let x: Vec<f64> = (0..50)
        .map(|i| 0.1 + 0.1 * f64::from(i))
        .chain((0..50).map(|i| 5.1 + 0.1 * f64::from(i)))
        .collect();
    let y: Vec<f64> = (0..100).map(|i| f64::from((i * 37) % 50)).collect();
    let series = Series::from_numbers("", &x, &y).unwrap_or_default();
    Figure::new(vec![Trace::scatter(series, ScatterMode::Markers)]).with_layout(
        FigureLayout::titled("Scatter Plot").with_hover_mode(HoverMode::Closest),
    )
}

/// Static grouped bar chart of two cities.
fn city_bar_figure() -> Figure {
    let x = [1.0, 2.0, 3.0];
    let city = |name: &str, y: &[f64]| {
        Trace::bar(Series::from_numbers(name, &x, y).unwrap_or_default())
    };
    Figure::new(vec![city("SF", &[4.0, 1.0, 2.0]), city("Montréal", &[2.0, 4.0, 5.0])])
        .with_layout(FigureLayout::titled("My Plot"))
}

/// Component tree of the tutorial dashboard.
#[must_use]
pub fn demo_layout(data: &DemoData) -> Component {
    let years = data.gapminder.unique("year");
    let latest_year = data.gapminder.numeric_max("year").map(Scalar::Number);
    let features: Vec<Scalar> = data
        .mpg
        .columns()
        .iter()
        .map(|c| Scalar::from(c.as_str()))
        .collect();
    let wheel_counts = data.wheels.unique("wheels");
    let colors = data.wheels.unique("color");

    let wheel_plot = Figure::new(vec![
        Trace::scatter(
            project_series(&data.wheels, "color", "wheels", ""),
            ScatterMode::Markers,
        )
        .with_marker(MarkerStyle::default().with_size(15.0)),
    ])
    .with_layout(
        FigureLayout::titled("Test")
            .with_x_axis(Axis::titled("Color"))
            .with_y_axis(Axis::titled("Wheels").with_tick_count(3))
            .with_hover_mode(HoverMode::Closest),
    );

    let mpg_scatter = Figure::new(vec![
        Trace::scatter(
            project_series(&data.mpg, "year", "mpg", ""),
            ScatterMode::Markers,
        ),
    ])
    .with_layout(
        FigureLayout::titled("MPG Data")
            .with_x_axis(Axis::titled("Model Year"))
            .with_y_axis(Axis::titled("MPG"))
            .with_hover_mode(HoverMode::Closest),
    );

    Component::div(vec![
        Component::heading(1, "").with_id(ids::LIVE_TEXT),
        Component::interval(ids::INTERVAL, 10_000),
        Component::heading(1, "My First Dashboard").with_style("textAlign", "center"),
        Component::label("Cities"),
        Component::dropdown(
            vec![
                ControlOption::new("New York City", "NYC"),
                ControlOption::new("San Francisco", "SF"),
            ],
            Some(Scalar::from("SF")),
        ),
        Component::label("Slider"),
        Component::slider(-10.0, 10.0, 1.0, 0.0).with_marks(SliderMark::integer_range(-10, 10)),
        Component::paragraph(vec![Component::label("Radio Items")]),
        Component::radio_items(
            vec![
                ControlOption::new("New York City", "NYC"),
                ControlOption::new("San Francisco", "SF"),
            ],
            Some(Scalar::from("SF")),
        ),
        Component::div(vec![
            Component::text_input(ids::TEXT_INPUT, "<insert value>"),
            Component::button(ids::SUBMIT_BUTTON, "Submit here"),
            Component::div(Vec::new()).with_id(ids::SUBMIT_OUTPUT),
        ]),
        Component::div(vec![
            Component::text("DIV - 0 (Text)"),
            Component::div(vec![Component::text("DIV - 1 (Div)")])
                .with_style("textAlign", "center"),
        ])
        .with_style("textAlign", "center"),
        Component::markdown("### My Text"),
        Component::graph(ids::EXAMPLE_GRAPH, Some(city_bar_figure())),
        Component::graph(ids::YEAR_GRAPH, None),
        Component::dropdown(ControlOption::from_values(&years), latest_year)
            .with_id(ids::YEAR_PICKER),
        Component::dropdown(
            ControlOption::from_values(&features),
            Some(Scalar::from("displacement")),
        )
        .with_id(ids::X_AXIS),
        Component::dropdown(ControlOption::from_values(&features), Some(Scalar::from("mpg")))
            .with_id(ids::Y_AXIS),
        Component::graph(ids::FEATURE_GRAPH, None),
        Component::div(vec![
            Component::radio_items(
                ControlOption::from_values(&wheel_counts),
                Some(Scalar::Number(1.0)),
            )
            .with_id(ids::WHEELS),
            Component::div(Vec::new()).with_id(ids::WHEELS_OUTPUT),
            Component::Rule,
            Component::radio_items(ControlOption::from_values(&colors), Some(Scalar::from("blue")))
                .with_id(ids::COLORS),
            Component::div(Vec::new()).with_id(ids::COLORS_OUTPUT),
            Component::image(ids::DISPLAY_IMAGE, Some(300)),
        ]),
        Component::div(vec![
            Component::graph(ids::WHEEL_PLOT, Some(wheel_plot)).with_style("width", "30%"),
            Component::image(ids::CLICK_IMAGE, Some(300)),
        ]),
        Component::div(vec![
            Component::graph(ids::SELECTION_PLOT, Some(selection_figure())),
            Component::heading(1, "").with_id(ids::DENSITY),
        ]),
        Component::div(vec![
            Component::graph(ids::MPG_SCATTER, Some(mpg_scatter)),
            Component::graph(ids::MPG_LINE, None),
            Component::markdown("").with_id(ids::MPG_STATS),
        ]),
    ])
    .with_style("backgroundColor", "#a39d9d")
}
