use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use plotboard::extensions::{DemoData, demo_bindings, demo_layout};
use plotboard::interaction::ChangeEvent;
use plotboard::{Dashboard, DashboardConfig, telemetry};
use tracing::info;

const DEFAULT_DATA_DIR: &str = "data";

struct CliArgs {
    data_dir: PathBuf,
    events_path: Option<PathBuf>,
    config_path: Option<PathBuf>,
}

fn main() {
    let _ = telemetry::init_default_tracing();
    if let Err(err) = run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let args = parse_args()?;
    let config = match &args.config_path {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .map_err(|err| format!("failed to read `{}`: {err}", path.display()))?;
            DashboardConfig::from_json_str(&raw).map_err(|err| err.to_string())?
        }
        None => DashboardConfig::new("My First Dashboard"),
    };
    let events: Vec<ChangeEvent> = match &args.events_path {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .map_err(|err| format!("failed to read `{}`: {err}", path.display()))?;
            serde_json::from_str(&raw).map_err(|err| format!("invalid events json: {err}"))?
        }
        None => Vec::new(),
    };

    let data = DemoData::load(&args.data_dir).map_err(|err| err.to_string())?;
    let layout = demo_layout(&data);
    let dashboard = Dashboard::new(config, layout, Arc::new(data), demo_bindings())
        .map_err(|err| err.to_string())?;

    for event in events {
        let key = event.key.clone();
        let report = dashboard.handle_change(event);
        info!(
            trigger = %key,
            revision = report.revision,
            published = report.published_count(),
            failed = report.failed_count(),
            "replayed event"
        );
    }

    let snapshot = dashboard
        .snapshot()
        .to_json_contract_v1_pretty()
        .map_err(|err| err.to_string())?;
    println!("{snapshot}");
    Ok(())
}

fn parse_args() -> Result<CliArgs, String> {
    let mut data_dir = PathBuf::from(DEFAULT_DATA_DIR);
    let mut events_path = None;
    let mut config_path = None;

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--data-dir" => {
                let value = args
                    .next()
                    .ok_or_else(|| "missing value for --data-dir".to_owned())?;
                data_dir = PathBuf::from(value);
            }
            "--events" => {
                let value = args
                    .next()
                    .ok_or_else(|| "missing value for --events".to_owned())?;
                events_path = Some(PathBuf::from(value));
            }
            "--config" => {
                let value = args
                    .next()
                    .ok_or_else(|| "missing value for --config".to_owned())?;
                config_path = Some(PathBuf::from(value));
            }
            "-h" | "--help" => {
                println!(
                    "Usage: cargo run --bin dashboard_replay -- [--data-dir <dir>] [--events <json>] [--config <json>]"
                );
                std::process::exit(0);
            }
            _ => return Err(format!("unknown argument: {arg}")),
        }
    }

    Ok(CliArgs {
        data_dir,
        events_path,
        config_path,
    })
}
