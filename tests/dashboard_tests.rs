use std::sync::Arc;

use plotboard::api::{
    BasicAuth, Binding, BindingOutcome, Component, ControlOption, Credential, DashboardSnapshot,
    OutputStatus, OutputTarget, OutputValue, SliderMark,
};
use plotboard::core::Scalar;
use plotboard::interaction::{ControlKey, ControlValue};
use plotboard::{ChartError, Dashboard, DashboardConfig};

fn layout() -> Component {
    Component::div(vec![
        Component::heading(1, "Cities"),
        Component::dropdown(
            vec![
                ControlOption::new("New York City", "NYC"),
                ControlOption::new("San Francisco", "SF"),
            ],
            Some(Scalar::from("SF")),
        )
        .with_id("city"),
        Component::slider(-10.0, 10.0, 1.0, 0.0).with_id("offset"),
        Component::div(Vec::new()).with_id("city-output"),
    ])
}

fn city_binding() -> Binding<()> {
    Binding::new(OutputTarget::new("city-output", "children"), |_: &(), snapshot| {
        let city = snapshot.require_input(0)?;
        let offset = snapshot.require_input(1)?;
        Ok(BindingOutcome::Publish(OutputValue::Text(format!(
            "{city} shifted by {offset}"
        ))))
    })
    .with_input(ControlKey::value("city"))
    .with_input(ControlKey::value("offset"))
}

fn dashboard(config: DashboardConfig) -> Dashboard<()> {
    Dashboard::new(config, layout(), Arc::new(()), vec![city_binding()]).expect("dashboard")
}

#[test]
fn initial_controls_come_from_the_tree() {
    let dashboard = dashboard(DashboardConfig::new("Cities"));
    assert_eq!(
        dashboard.control(&ControlKey::value("city")),
        Some(ControlValue::Text("SF".into()))
    );
    assert_eq!(
        dashboard.control(&ControlKey::value("offset")),
        Some(ControlValue::Number(0.0))
    );
    assert_eq!(dashboard.binding_count(), 1);
    assert_eq!(
        dashboard
            .output_value(&OutputTarget::new("city-output", "children"))
            .and_then(|value| value.as_text().map(str::to_owned))
            .as_deref(),
        Some("SF shifted by 0")
    );
}

#[test]
fn evaluate_on_start_can_be_disabled() {
    let dashboard = dashboard(DashboardConfig::new("Cities").with_evaluate_on_start(false));
    let target = OutputTarget::new("city-output", "children");
    let slot = dashboard.output(&target).expect("declared output");
    assert_eq!(slot.status, OutputStatus::Pending);
    assert_eq!(slot.value, None);

    let report = dashboard.refresh_all();
    assert_eq!(report.published_count(), 1);
    assert_eq!(report.trigger, None);
}

#[test]
fn unknown_component_ids_are_rejected_in_strict_mode() {
    let dangling = Binding::new(OutputTarget::new("nowhere", "children"), |_: &(), _| {
        Ok(BindingOutcome::NoUpdate)
    })
    .with_input(ControlKey::value("city"));

    let err = Dashboard::new(
        DashboardConfig::new("Cities"),
        layout(),
        Arc::new(()),
        vec![dangling.clone()],
    )
    .err()
    .expect("unknown output id");
    assert!(matches!(
        err,
        ChartError::UnknownComponent { ref component_id } if component_id == "nowhere"
    ));

    let lenient = Dashboard::new(
        DashboardConfig::new("Cities").with_strict_component_ids(false),
        layout(),
        Arc::new(()),
        vec![dangling],
    )
    .expect("lenient dashboard");
    assert_eq!(lenient.binding_count(), 1);
}

#[test]
fn duplicate_output_bindings_are_rejected() {
    let err = Dashboard::new(
        DashboardConfig::new("Cities"),
        layout(),
        Arc::new(()),
        vec![city_binding(), city_binding()],
    )
    .err()
    .expect("duplicate output");
    assert!(matches!(err, ChartError::DuplicateOutput { .. }));
}

#[test]
fn invalid_layouts_are_rejected() {
    let duplicate_ids = Component::div(vec![
        Component::div(Vec::new()).with_id("same"),
        Component::markdown("x").with_id("same"),
    ]);
    let err = Dashboard::new(
        DashboardConfig::new("Broken"),
        duplicate_ids,
        Arc::new(()),
        Vec::<Binding<()>>::new(),
    )
    .err()
    .expect("duplicate id");
    assert!(format!("{err}").contains("duplicate component id `same`"));

    let bad_slider = Component::slider(5.0, 1.0, 1.0, 2.0).with_id("s");
    assert!(bad_slider.validate().is_err());
    assert!(Component::heading(7, "too deep").validate().is_err());
    assert!(Component::interval("tick", 0).validate().is_err());
}

#[test]
fn basic_auth_gate() {
    let open = dashboard(DashboardConfig::new("Cities"));
    assert!(open.authorize("anyone", "anything"));

    let guarded = dashboard(
        DashboardConfig::new("Cities")
            .with_credential("user1", "123")
            .with_credential("user2", "456"),
    );
    assert!(guarded.authorize("user1", "123"));
    assert!(!guarded.authorize("user1", "456"));
    assert!(!guarded.authorize("user3", "123"));
    assert!(guarded.authorize_header("Basic dXNlcjE6MTIz"));
    assert!(!guarded.authorize_header("Bearer dXNlcjE6MTIz"));
    assert!(!guarded.authorize_header("Basic not-base64!"));

    let err = Dashboard::new(
        DashboardConfig::new("Cities")
            .with_credential("user1", "1")
            .with_credential("user1", "2"),
        layout(),
        Arc::new(()),
        vec![city_binding()],
    )
    .err()
    .expect("duplicate user");
    assert!(format!("{err}").contains("user1"));
}

#[test]
fn config_json_fills_defaults_and_validates() {
    let config = DashboardConfig::from_json_str(r#"{ "title": "My First Dashboard" }"#)
        .expect("minimal config");
    assert!(config.reject_stale_publications);
    assert!(config.evaluate_on_start);
    assert!(config.strict_component_ids);
    assert!(config.credentials.is_empty());

    let full = DashboardConfig::new("Cities")
        .with_credential("user1", "123")
        .with_reject_stale_publications(false);
    let restored =
        DashboardConfig::from_json_str(&full.to_json_pretty().expect("serialize")).expect("parse");
    assert_eq!(restored, full);

    assert!(DashboardConfig::from_json_str(r#"{ "title": "  " }"#).is_err());
    assert!(DashboardConfig::from_json_str("not json").is_err());
}

#[test]
fn snapshot_contract_round_trips() {
    let dashboard = dashboard(DashboardConfig::new("Cities"));
    dashboard.set_control("offset", "value", 3.0);

    let snapshot = dashboard.snapshot();
    assert_eq!(snapshot.title, "Cities");
    assert_eq!(snapshot.revision, 1);
    assert_eq!(snapshot.controls.len(), 2);
    let slot = snapshot
        .output(&OutputTarget::new("city-output", "children"))
        .expect("output entry");
    assert_eq!(slot.value, Some(OutputValue::Text("SF shifted by 3".into())));
    assert_eq!(slot.revision, 1);

    let json = snapshot.to_json_contract_v1_pretty().expect("serialize snapshot");
    let restored = DashboardSnapshot::from_json_compat_str(&json).expect("parse snapshot");
    assert_eq!(restored, snapshot);

    let future = json.replace("\"schema_version\": 1", "\"schema_version\": 2");
    let err = DashboardSnapshot::from_json_compat_str(&future).expect_err("future schema");
    assert!(format!("{err}").contains("unsupported snapshot schema version"));
}

#[test]
fn layout_lookup_by_id() {
    let tree = layout();
    assert_eq!(tree.ids(), vec!["city", "offset", "city-output"]);
    assert!(matches!(tree.find("offset"), Some(Component::Slider { .. })));
    assert!(tree.find("missing").is_none());

    let marked = Component::slider(-2.0, 2.0, 1.0, 0.0)
        .with_marks(SliderMark::integer_range(-2, 2))
        .with_id("marked");
    match marked {
        Component::Slider { marks, .. } => {
            assert_eq!(marks.len(), 5);
            assert_eq!(marks[0].label, "-2");
            assert_eq!(marks[4].value, 2.0);
        }
        other => panic!("expected slider, got {other:?}"),
    }
}

#[test]
fn basic_auth_rejects_malformed_usernames() {
    let credential = |username: &str| Credential {
        username: username.to_owned(),
        password: "pw".to_owned(),
    };
    let auth = BasicAuth::from_credentials(&[credential("a"), credential("b")]).expect("auth");
    assert_eq!(auth.user_count(), 2);
    assert!(auth.is_enabled());

    assert!(BasicAuth::from_credentials(&[credential("")]).is_err());
    assert!(BasicAuth::from_credentials(&[credential("a:b")]).is_err());
    let open = BasicAuth::from_credentials(std::iter::empty::<&Credential>()).expect("empty");
    assert_eq!(open.user_count(), 0);
    assert!(open.verify("anyone", "anything"));
}
