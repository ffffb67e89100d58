use plotboard::core::{
    Axis, AxisType, BarMode, Color, Figure, FigureLayout, HistogramNormalization, LineDash,
    LineStyle, MarkerStyle, MarkerSymbol, ScatterMode, Series, Trace, TraceKind,
    distribution_figure,
};

fn series() -> Series {
    Series::from_numbers("s", &[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0]).expect("valid series")
}

#[test]
fn scatter_trace_carries_series_name_and_mode() {
    let trace = Trace::scatter(series(), ScatterMode::LinesAndMarkers);
    assert_eq!(trace.name.as_deref(), Some("s"));
    assert_eq!(
        trace.kind,
        TraceKind::Scatter {
            mode: ScatterMode::LinesAndMarkers
        }
    );
    assert_eq!(trace.point_count(), 3);
    trace.validate().expect("valid trace");
}

#[test]
fn bubble_sizes_must_match_point_count() {
    let ok = Trace::scatter(series(), ScatterMode::Markers)
        .with_marker(MarkerStyle::default().with_sizes(vec![10.0, 20.0, 30.0]));
    ok.validate().expect("matching sizes");

    let bad = Trace::scatter(series(), ScatterMode::Markers)
        .with_marker(MarkerStyle::default().with_sizes(vec![10.0]));
    let err = bad.validate().expect_err("size mismatch");
    assert!(format!("{err}").contains("marker sizes"));
}

#[test]
fn marker_and_line_styles_validate_ranges() {
    let marker = MarkerStyle::default()
        .with_size(12.0)
        .with_opacity(0.8)
        .with_symbol(MarkerSymbol::Diamond)
        .with_outline(2.0, Some(Color::parse_css("#fff").expect("hex color")));
    marker.validate(0).expect("valid marker");
    assert!(MarkerStyle::default().with_opacity(1.5).validate(0).is_err());

    let line = LineStyle::default()
        .with_width(4.0)
        .with_dash(LineDash::Dash)
        .with_color(Color::parse_css("rgb(255, 0, 0)").expect("rgb color"));
    line.validate().expect("valid line");
    assert!(LineStyle::default().with_width(-1.0).validate().is_err());
}

#[test]
fn css_colors_round_trip_through_text() {
    let color = Color::parse_css("#a39d9d").expect("hex");
    assert_eq!(color.to_css(), "rgb(163,157,157)");
    assert_eq!(
        Color::parse_css("rgba(0,0,255,0.5)").expect("rgba").to_css(),
        "rgba(0,0,255,0.5)"
    );
    assert!(Color::parse_css("#ééé").is_err());
    assert!(Color::parse_css("chartreuse-ish").is_err());
}

#[test]
fn heatmap_requires_aligned_triplets() {
    let ok = Trace::heatmap(
        "temps",
        vec!["Mon".into(), "Tue".into()],
        vec![1.into(), 1.into()],
        vec![3.5, 4.0],
    )
    .expect("aligned heatmap");
    assert_eq!(ok.point_count(), 2);

    assert!(Trace::heatmap("temps", vec!["Mon".into()], Vec::new(), vec![1.0]).is_err());
}

#[test]
fn histogram_trace_rejects_bad_bin_size() {
    let trace = Trace::histogram("mpg", vec![18.into(), 15.into()], Some(0.0));
    assert!(trace.validate().is_err());
    Trace::histogram("mpg", vec![18.into(), 15.into()], Some(2.0))
        .validate()
        .expect("positive bin size");
}

#[test]
fn layout_builders_compose() {
    let figure = Figure::new(vec![Trace::bar(series()), Trace::bar(series())]).with_layout(
        FigureLayout::titled("Bars")
            .with_x_axis(Axis::titled("x").with_type(AxisType::Category))
            .with_y_axis(Axis::titled("y").with_range(0.0, 10.0))
            .with_bar_mode(BarMode::Stack),
    );
    assert_eq!(figure.trace_count(), 2);
    assert_eq!(figure.point_count(), 6);
    assert_eq!(figure.layout.bar_mode, Some(BarMode::Stack));
    figure.validate().expect("valid figure");

    let inverted = Figure::new(Vec::new())
        .with_layout(FigureLayout::default().with_y_axis(Axis::default().with_range(5.0, 1.0)));
    assert!(inverted.validate().is_err());
}

#[test]
fn subplots_place_traces_in_one_based_cells() {
    let figure = Figure::subplots(2, 2, vec!["a".to_owned(), "b".to_owned()])
        .expect("grid")
        .with_layout(FigureLayout::titled("grid"))
        .with_trace_at(Trace::scatter(series(), ScatterMode::Markers), 2, 1)
        .expect("cell in range");

    let grid = figure.layout.grid.as_ref().expect("grid survives layout");
    assert_eq!((grid.rows, grid.cols), (2, 2));
    assert_eq!(figure.traces[0].subplot.map(|cell| (cell.row, cell.col)), Some((2, 1)));
    figure.validate().expect("valid subplot figure");

    assert!(
        figure
            .clone()
            .with_trace_at(Trace::bar(series()), 3, 1)
            .is_err()
    );
    assert!(Figure::subplots(0, 1, Vec::new()).is_err());
    assert!(Figure::subplots(1, 1, vec!["a".into(), "b".into()]).is_err());
}

#[test]
fn distribution_plot_builds_density_histograms() {
    let groups = vec![
        ("Group 1".to_owned(), vec![0.1, 0.4, -0.3]),
        ("Group 2".to_owned(), vec![2.0, 2.5]),
    ];
    let figure = distribution_figure(&groups, &[0.1, 0.25]).expect("distribution");
    assert_eq!(figure.trace_count(), 2);
    for trace in &figure.traces {
        assert!(matches!(
            trace.kind,
            TraceKind::Histogram {
                normalization: HistogramNormalization::ProbabilityDensity,
                ..
            }
        ));
    }
    assert_eq!(figure.layout.show_legend, Some(true));

    let err = distribution_figure(&groups, &[0.1]).expect_err("bin size mismatch");
    assert!(format!("{err}").contains("2 groups but 1 bin sizes"));
}

#[test]
fn figure_json_contract_round_trips() {
    let figure = Figure::new(vec![Trace::scatter(series(), ScatterMode::Lines)])
        .with_layout(FigureLayout::titled("contract"));
    let json = figure.to_json_contract_v1_pretty().expect("serialize");
    assert!(json.contains("\"schema_version\": 1"));
    let restored = Figure::from_json_compat_str(&json).expect("parse contract");
    assert_eq!(restored, figure);

    let bare = serde_json::to_string(&figure).expect("bare figure");
    assert_eq!(Figure::from_json_compat_str(&bare).expect("bare"), figure);

    let future = json.replace("\"schema_version\": 1", "\"schema_version\": 9");
    assert!(Figure::from_json_compat_str(&future).is_err());
}
