use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;

use plotboard::api::{
    Binding, BindingError, BindingOutcome, BindingRegistry, EvaluationOutcome, Evaluator,
    MissingInputPolicy, OutputStatus, OutputTarget, OutputValue, StateStore,
};
use plotboard::core::{ImageRef, RecordSet, Scalar};
use plotboard::error::{ChartError, ChartResult};
use plotboard::extensions::demo::ids;
use plotboard::extensions::{
    DemoData, ImageResolver, demo_bindings, demo_layout, density_text, feature_figure,
    year_figure,
};
use plotboard::interaction::{
    ChangeEvent, ControlKey, ControlValue, SelectedPoint, Selection, SelectionRegion,
};

#[derive(Default)]
struct Counters {
    calls: AtomicUsize,
}

fn text(value: impl Into<String>) -> BindingOutcome {
    BindingOutcome::Publish(OutputValue::Text(value.into()))
}

fn echo(output: &str, input: &str) -> Binding<Counters> {
    Binding::new(OutputTarget::new(output, "children"), |data: &Counters, snapshot| {
        data.calls.fetch_add(1, Ordering::SeqCst);
        let value = snapshot.require_input(0)?;
        Ok(text(format!("You chose {value}")))
    })
    .with_input(ControlKey::value(input))
}

fn evaluator(
    bindings: Vec<Binding<Counters>>,
    controls: Vec<(ControlKey, ControlValue)>,
) -> Evaluator<Counters> {
    let mut registry = BindingRegistry::new();
    for binding in bindings {
        registry.register(binding).expect("register binding");
    }
    let store = StateStore::with_controls(controls);
    for target in registry.targets() {
        store.declare_output(target.clone());
    }
    Evaluator::new(Arc::new(registry), Arc::new(store), Arc::new(Counters::default()))
}

fn output_text(evaluator: &Evaluator<Counters>, id: &str) -> Option<String> {
    evaluator
        .store()
        .output_value(&OutputTarget::new(id, "children"))
        .and_then(|value| value.as_text().map(str::to_owned))
}

#[test]
fn change_reevaluates_exactly_the_dependent_bindings() {
    let evaluator = evaluator(
        vec![
            echo("wheels-output", "wheels"),
            echo("colors-output", "colors"),
        ],
        vec![
            (ControlKey::value("wheels"), 1.0.into()),
            (ControlKey::value("colors"), "blue".into()),
        ],
    );

    let report = evaluator.handle_event(ChangeEvent::set(ControlKey::value("wheels"), 2.0));
    let targets: Vec<String> = report.evaluated_targets().map(ToString::to_string).collect();
    assert_eq!(targets, ["wheels-output.children"]);
    assert_eq!(evaluator.data().calls.load(Ordering::SeqCst), 1);
    assert_eq!(output_text(&evaluator, "wheels-output").as_deref(), Some("You chose 2"));
    assert_eq!(output_text(&evaluator, "colors-output"), None);
}

#[test]
fn unreferenced_control_triggers_nothing() {
    let evaluator = evaluator(vec![echo("wheels-output", "wheels")], Vec::new());
    let report = evaluator.handle_event(ChangeEvent::set(ControlKey::value("slider"), 3.0));
    assert!(report.is_empty());
    assert_eq!(evaluator.data().calls.load(Ordering::SeqCst), 0);
    assert_eq!(
        evaluator.store().control(&ControlKey::value("slider")),
        Some(ControlValue::Number(3.0))
    );
}

#[test]
fn multi_input_binding_sees_current_value_of_every_input() {
    let binding = Binding::new(
        OutputTarget::new("feature-graphic", "children"),
        |_: &Counters, snapshot| {
            Ok(text(format!(
                "{} vs {}",
                snapshot.require_input(0)?,
                snapshot.require_input(1)?
            )))
        },
    )
    .with_input(ControlKey::value("xaxis"))
    .with_input(ControlKey::value("yaxis"));
    let evaluator = evaluator(
        vec![binding],
        vec![
            (ControlKey::value("xaxis"), "displacement".into()),
            (ControlKey::value("yaxis"), "mpg".into()),
        ],
    );

    evaluator.handle_event(ChangeEvent::set(ControlKey::value("xaxis"), "weight"));
    assert_eq!(
        output_text(&evaluator, "feature-graphic").as_deref(),
        Some("weight vs mpg")
    );
    evaluator.handle_event(ChangeEvent::set(ControlKey::value("yaxis"), "acceleration"));
    assert_eq!(
        output_text(&evaluator, "feature-graphic").as_deref(),
        Some("weight vs acceleration")
    );
}

#[test]
fn failure_keeps_previous_value_and_isolates_other_outputs() {
    let fragile = Binding::new(OutputTarget::new("stats", "children"), |_: &Counters, snapshot| {
        let value = snapshot.require_input(0)?;
        match value.as_f64() {
            Some(v) if v >= 0.0 => Ok(text(format!("ok {v}"))),
            _ => Err(BindingError::InvalidData("negative input".to_owned())),
        }
    })
    .with_input(ControlKey::value("slider"));
    let evaluator = evaluator(
        vec![fragile, echo("echo", "slider")],
        vec![(ControlKey::value("slider"), 1.0.into())],
    );

    evaluator.handle_event(ChangeEvent::set(ControlKey::value("slider"), 4.0));
    let report = evaluator.handle_event(ChangeEvent::set(ControlKey::value("slider"), -1.0));

    assert_eq!(report.failed_count(), 1);
    assert_eq!(report.published_count(), 1);
    assert_eq!(output_text(&evaluator, "stats").as_deref(), Some("ok 4"));
    assert_eq!(output_text(&evaluator, "echo").as_deref(), Some("You chose -1"));

    let slot = evaluator
        .store()
        .output(&OutputTarget::new("stats", "children"))
        .expect("declared output");
    assert!(matches!(slot.status, OutputStatus::NoResult { ref reason } if reason.contains("negative")));
}

#[test]
fn panicking_binding_is_contained() {
    let panicky = Binding::new(OutputTarget::new("boom", "children"), |_: &Counters, _| {
        panic!("division by zero in acceleration")
    })
    .with_input(ControlKey::value("slider"));
    let evaluator = evaluator(
        vec![panicky, echo("echo", "slider")],
        vec![(ControlKey::value("slider"), 1.0.into())],
    );

    let report = evaluator.handle_event(ChangeEvent::set(ControlKey::value("slider"), 0.0));
    match report.outcome_for(&OutputTarget::new("boom", "children")) {
        Some(EvaluationOutcome::Failed { reason }) => {
            assert!(reason.contains("division by zero"));
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
    assert_eq!(output_text(&evaluator, "echo").as_deref(), Some("You chose 0"));
}

#[test]
fn missing_input_policies() {
    let invoke = Binding::new(OutputTarget::new("invoke", "children"), |_: &Counters, snapshot| {
        Ok(text(match snapshot.input(0) {
            Some(value) => format!("hovered {value}"),
            None => "nothing hovered".to_owned(),
        }))
    })
    .with_input(ControlKey::new("plot", "hoverData"));
    let skip = echo("skip", "plot").with_missing_input_policy(MissingInputPolicy::NoUpdate);
    let empty = echo("empty", "plot").with_missing_input_policy(MissingInputPolicy::PublishEmpty);
    let evaluator = evaluator(vec![invoke, skip, empty], Vec::new());

    let report = evaluator.evaluate_all();
    assert_eq!(
        output_text(&evaluator, "invoke").as_deref(),
        Some("nothing hovered")
    );
    assert_eq!(
        report.outcome_for(&OutputTarget::new("skip", "children")),
        Some(&EvaluationOutcome::Declined)
    );
    assert_eq!(
        evaluator
            .store()
            .output_value(&OutputTarget::new("empty", "children")),
        Some(OutputValue::Empty)
    );
    assert_eq!(evaluator.data().calls.load(Ordering::SeqCst), 0);
}

#[test]
fn cleared_control_reads_as_missing() {
    let evaluator = evaluator(
        vec![echo("echo", "slider")],
        vec![(ControlKey::value("slider"), 1.0.into())],
    );
    let report = evaluator.handle_event(ChangeEvent::clear(ControlKey::value("slider")));
    match report.outcome_for(&OutputTarget::new("echo", "children")) {
        Some(EvaluationOutcome::Failed { reason }) => assert!(reason.contains("slider.value")),
        other => panic!("unexpected outcome: {other:?}"),
    }
}

#[test]
fn state_inputs_are_read_but_do_not_trigger() {
    let submit = Binding::new(OutputTarget::new("my-div", "children"), |_: &Counters, snapshot| {
        let clicks = snapshot.require_input(0)?;
        let entered = snapshot.state(0).map(ToString::to_string).unwrap_or_default();
        Ok(text(format!("You entered: {entered} and clicked {clicks} times.")))
    })
    .with_input(ControlKey::new("submit-button", "n_clicks"))
    .with_state(ControlKey::value("text-input"));
    let evaluator = evaluator(
        vec![submit],
        vec![
            (ControlKey::new("submit-button", "n_clicks"), 0.0.into()),
            (ControlKey::value("text-input"), "<insert value>".into()),
        ],
    );

    let report = evaluator.handle_event(ChangeEvent::set(ControlKey::value("text-input"), "hello"));
    assert!(report.is_empty());

    evaluator.handle_event(ChangeEvent::set(
        ControlKey::new("submit-button", "n_clicks"),
        1.0,
    ));
    assert_eq!(
        output_text(&evaluator, "my-div").as_deref(),
        Some("You entered: hello and clicked 1 times.")
    );
}

#[test]
fn stale_publications_are_rejected() {
    let store = StateStore::new();
    let target = OutputTarget::new("graph", "figure");
    store.declare_output(target.clone());

    assert!(store.publish(&target, OutputValue::Text("newer".into()), 5));
    assert!(!store.publish(&target, OutputValue::Text("older".into()), 3));
    assert!(!store.mark_no_result(&target, "late failure".into(), 4));
    assert_eq!(store.output_value(&target), Some(OutputValue::Text("newer".into())));

    let lenient = StateStore::new().with_reject_stale(false);
    assert!(lenient.publish(&target, OutputValue::Text("newer".into()), 5));
    assert!(lenient.publish(&target, OutputValue::Text("older".into()), 3));
    assert_eq!(lenient.output_value(&target), Some(OutputValue::Text("older".into())));
}

#[test]
fn registry_rejects_duplicate_outputs_and_empty_inputs() {
    let mut registry = BindingRegistry::new();
    registry.register(echo("out", "a")).expect("first binding");
    let err = registry.register(echo("out", "b")).expect_err("duplicate output");
    assert!(format!("{err}").contains("out.children"));

    let no_inputs = Binding::new(OutputTarget::new("other", "children"), |_: &Counters, _| {
        Ok(BindingOutcome::NoUpdate)
    });
    assert!(registry.register(no_inputs).is_err());

    assert_eq!(registry.dependents(&ControlKey::value("a")).count(), 1);
    assert!(registry.unregister(&OutputTarget::new("out", "children")));
    assert_eq!(registry.dependents(&ControlKey::value("a")).count(), 0);
    assert!(registry.is_empty());
}

#[test]
fn concurrent_events_leave_outputs_consistent_with_controls() {
    let evaluator = evaluator(
        (0..4)
            .map(|i| echo(&format!("out-{i}"), &format!("in-{i}")))
            .collect(),
        Vec::new(),
    );

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let evaluator = evaluator.clone();
            thread::spawn(move || {
                for step in 0..50 {
                    evaluator.handle_event(ChangeEvent::set(
                        ControlKey::value(format!("in-{i}")),
                        f64::from(step),
                    ));
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().expect("worker thread");
    }

    assert_eq!(evaluator.store().revision(), 200);
    assert_eq!(evaluator.data().calls.load(Ordering::SeqCst), 200);
    for i in 0..4 {
        assert_eq!(
            output_text(&evaluator, &format!("out-{i}")).as_deref(),
            Some("You chose 49")
        );
    }
}

struct NoImages;

impl ImageResolver for NoImages {
    fn resolve(&self, keys: &[(&str, Scalar)]) -> ChartResult<ImageRef> {
        Err(ChartError::MissingImage {
            keys: format!("{} keys", keys.len()),
        })
    }
}

fn demo_data() -> DemoData {
    let gapminder = RecordSet::from_rows(
        &["country", "continent", "year", "gdpPercap", "lifeExp"],
        vec![
            vec!["China".into(), "Asia".into(), 2007.into(), 4959.11.into(), 72.96.into()],
            vec!["France".into(), "Europe".into(), 2007.into(), 30470.02.into(), 80.66.into()],
        ],
    )
    .expect("gapminder");
    let mpg = RecordSet::from_rows(
        &["mpg", "cylinders", "displacement", "weight", "acceleration", "model_year", "name"],
        vec![
            vec![
                18.into(), 8.into(), 307.into(), 3504.into(), 12.into(), 70.into(),
                "chevrolet chevelle malibu".into(),
            ],
            vec![
                24.into(), 4.into(), 113.into(), 2372.into(), 15.into(), 71.into(),
                "toyota corona mark ii".into(),
            ],
        ],
    )
    .expect("mpg");
    let wheels = RecordSet::from_rows(
        &["wheels", "color", "image"],
        vec![vec![1.into(), "blue".into(), "bluewheels1.png".into()]],
    )
    .expect("wheels");
    DemoData::new(gapminder, mpg, wheels, Box::new(NoImages)).expect("demo data")
}

fn demo_evaluator() -> Evaluator<DemoData> {
    let data = demo_data();
    let mut registry = BindingRegistry::new();
    for binding in demo_bindings() {
        registry.register(binding).expect("register demo binding");
    }
    let store = StateStore::with_controls(demo_layout(&data).initial_controls());
    for target in registry.targets() {
        store.declare_output(target.clone());
    }
    Evaluator::new(Arc::new(registry), Arc::new(store), Arc::new(data))
}

#[test]
fn repeated_event_with_same_inputs_publishes_identical_output() {
    let evaluator = demo_evaluator();
    let target = OutputTarget::new(ids::FEATURE_GRAPH, "figure");
    let event = ChangeEvent::set(ControlKey::value(ids::X_AXIS), "weight");

    let report = evaluator.handle_event(event.clone());
    assert_eq!(report.outcome_for(&target), Some(&EvaluationOutcome::Published));
    let first = evaluator.store().output_value(&target).expect("first publication");

    let report = evaluator.handle_event(event);
    assert_eq!(report.outcome_for(&target), Some(&EvaluationOutcome::Published));
    let second = evaluator.store().output_value(&target).expect("second publication");
    assert_eq!(first, second);

    let report = evaluator.evaluate_all();
    assert_eq!(report.outcome_for(&target), Some(&EvaluationOutcome::Published));
    assert_eq!(evaluator.store().output_value(&target), Some(first));
}

#[test]
fn figure_and_text_builders_are_deterministic() {
    let data = demo_data();
    let year = Scalar::from(2007);
    assert_eq!(year_figure(&data.gapminder, &year), year_figure(&data.gapminder, &year));
    assert_eq!(
        feature_figure(&data.mpg, "weight", "mpg"),
        feature_figure(&data.mpg, "weight", "mpg")
    );

    let selection = Selection::new(
        vec![SelectedPoint::new(1.0, 1.0, 0), SelectedPoint::new(2.0, 3.0, 1)],
        Some(SelectionRegion::Range {
            x: (0.0, 2.0),
            y: (0.0, 4.0),
        }),
    );
    assert_eq!(density_text(&selection), density_text(&selection));
    assert_eq!(
        density_text(&Selection::default()),
        density_text(&Selection::default())
    );
}
