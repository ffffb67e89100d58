use std::sync::Arc;

use criterion::{Criterion, criterion_group, criterion_main};
use plotboard::api::{
    Binding, BindingOutcome, BindingRegistry, Evaluator, OutputTarget, OutputValue, StateStore,
};
use plotboard::core::{RecordSet, Scalar, group_series};
use plotboard::interaction::{ChangeEvent, ControlKey};
use std::hint::black_box;

fn gapminder_like(rows: usize) -> RecordSet {
    let continents = ["Africa", "Americas", "Asia", "Europe", "Oceania"];
    let data = (0..rows)
        .map(|i| {
            vec![
                Scalar::from(continents[i % continents.len()]),
                Scalar::from(1952 + 5 * (i % 12) as i64),
                Scalar::from(300.0 + i as f64 * 1.5),
                Scalar::from(40.0 + (i % 40) as f64),
            ]
        })
        .collect();
    RecordSet::from_rows(&["continent", "year", "gdpPercap", "lifeExp"], data)
        .expect("valid generated records")
}

fn year_evaluator(records: RecordSet, fan_out: usize) -> Evaluator<RecordSet> {
    let mut registry = BindingRegistry::new();
    for index in 0..fan_out {
        registry
            .register(
                Binding::new(
                    OutputTarget::new(format!("graph-{index}"), "figure"),
                    |records: &RecordSet, snapshot| {
                        let year = snapshot
                            .require_input(0)?
                            .as_scalar()
                            .unwrap_or(Scalar::Number(0.0));
                        let filtered = records.filter_eq("year", &year);
                        let series = group_series(
                            &filtered,
                            "continent",
                            &records.unique("continent"),
                            "gdpPercap",
                            "lifeExp",
                        );
                        let points: usize = series.iter().map(|s| s.len()).sum();
                        Ok(BindingOutcome::Publish(OutputValue::Text(points.to_string())))
                    },
                )
                .with_input(ControlKey::value("year-picker")),
            )
            .expect("register");
    }
    let store = StateStore::new();
    Evaluator::new(Arc::new(registry), Arc::new(store), Arc::new(records))
}

fn bench_single_dependent_dispatch(c: &mut Criterion) {
    let evaluator = year_evaluator(gapminder_like(1_704), 1);
    let mut year = 1952;
    c.bench_function("dispatch_year_picker_1704_rows", |b| {
        b.iter(|| {
            year = if year >= 2007 { 1952 } else { year + 5 };
            let report = evaluator.handle_event(ChangeEvent::set(
                ControlKey::value("year-picker"),
                f64::from(year),
            ));
            black_box(report);
        })
    });
}

fn bench_fan_out_dispatch(c: &mut Criterion) {
    let evaluator = year_evaluator(gapminder_like(1_704), 16);
    c.bench_function("dispatch_fan_out_16_bindings", |b| {
        b.iter(|| {
            let report = evaluator.handle_event(ChangeEvent::set(
                ControlKey::value("year-picker"),
                black_box(2007.0),
            ));
            black_box(report);
        })
    });
}

fn bench_unrelated_control(c: &mut Criterion) {
    let evaluator = year_evaluator(gapminder_like(1_704), 16);
    c.bench_function("dispatch_unreferenced_control", |b| {
        b.iter(|| {
            let report =
                evaluator.handle_event(ChangeEvent::set(ControlKey::value("slider"), 1.0));
            black_box(report);
        })
    });
}

criterion_group!(
    benches,
    bench_single_dependent_dispatch,
    bench_fan_out_dispatch,
    bench_unrelated_control
);
criterion_main!(benches);
