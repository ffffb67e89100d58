use approx::assert_relative_eq;
use plotboard::core::Scalar;
use plotboard::interaction::{
    ChangeEvent, ControlKey, ControlValue, PointEvent, SelectedPoint, Selection, SelectionRegion,
};

#[test]
fn lasso_density_uses_bounding_box_of_outline() {
    let selection = Selection::new(
        (0..8)
            .map(|i| SelectedPoint::new(1.0 + f64::from(i) * 0.1, 2.0, i as usize))
            .collect(),
        Some(SelectionRegion::Lasso {
            x: vec![0.0, 4.0, 4.0, 0.0],
            y: vec![0.0, 0.0, 2.0, 2.0],
        }),
    );
    let bbox = selection.bounding_box().expect("lasso bounding box");
    assert_relative_eq!(bbox.area(), 8.0);
    assert_relative_eq!(selection.density().expect("density"), 1.0);
}

#[test]
fn density_falls_back_to_selected_points() {
    let selection = Selection::new(
        vec![
            SelectedPoint::new(0.0, 0.0, 0),
            SelectedPoint::new(2.0, 1.0, 1),
            SelectedPoint::new(1.0, 0.5, 2),
        ],
        None,
    );
    assert_relative_eq!(selection.density().expect("density"), 1.5);
}

#[test]
fn empty_or_degenerate_selection_has_no_density() {
    assert_eq!(Selection::default().density(), None);

    let collinear = Selection::new(
        vec![SelectedPoint::new(0.0, 1.0, 0), SelectedPoint::new(3.0, 1.0, 1)],
        None,
    );
    assert_eq!(collinear.density(), None);

    let empty_box = Selection::new(
        Vec::new(),
        Some(SelectionRegion::Range {
            x: (0.0, 1.0),
            y: (0.0, 1.0),
        }),
    );
    assert_eq!(empty_box.density(), None);
}

#[test]
fn control_values_expose_typed_views() {
    let number = ControlValue::from(2007.0);
    assert_eq!(number.as_scalar(), Some(Scalar::from(2007)));
    assert_eq!(number.to_string(), "2007");

    let text = ControlValue::from("displacement");
    assert_eq!(text.as_text(), Some("displacement"));

    let point = ControlValue::from(PointEvent::new("red", 2).with_point_index(4));
    assert_eq!(point.as_point().and_then(|p| p.point_index), Some(4));
    assert!(point.as_scalar().is_none());
}

#[test]
fn change_events_round_trip_through_json() {
    let events = vec![
        ChangeEvent::set(ControlKey::value("year-picker"), 1952.0),
        ChangeEvent::set(
            ControlKey::new("plot", "selectedData"),
            Selection::new(vec![SelectedPoint::new(1.0, 2.0, 0)], None),
        ),
        ChangeEvent::clear(ControlKey::new("mpg-scatter", "hoverData")),
    ];
    let json = serde_json::to_string(&events).expect("serialize events");
    let restored: Vec<ChangeEvent> = serde_json::from_str(&json).expect("parse events");
    assert_eq!(restored, events);
    assert_eq!(ControlKey::value("year-picker").to_string(), "year-picker.value");
}
