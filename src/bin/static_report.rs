use std::fs;
use std::path::PathBuf;

use plotboard::extensions::{CsvRecordSetLoader, RecordSetLoader, report_figures};
use plotboard::render::{FigureWriter, HtmlFigureWriter, JsonFigureWriter};
use plotboard::telemetry;
use tracing::info;

const DEFAULT_MPG_PATH: &str = "data/mpg.csv";
const DEFAULT_OUT_DIR: &str = "target/report";

struct CliArgs {
    mpg_path: PathBuf,
    out_dir: PathBuf,
    write_json: bool,
}

fn main() {
    let _ = telemetry::init_tracing("plotboard=debug,info");
    if let Err(err) = run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let args = parse_args()?;
    let mpg = CsvRecordSetLoader::new()
        .load(&args.mpg_path.display().to_string())
        .map_err(|err| err.to_string())?;
    fs::create_dir_all(&args.out_dir)
        .map_err(|err| format!("failed to create `{}`: {err}", args.out_dir.display()))?;

    let figures = report_figures(&mpg).map_err(|err| err.to_string())?;
    for entry in &figures {
        let mut html = HtmlFigureWriter::new(args.out_dir.join(format!("{}.html", entry.name)));
        html.write(&entry.figure)
            .map_err(|err| format!("figure `{}`: {err}", entry.name))?;
        if args.write_json {
            let mut json = JsonFigureWriter::new(args.out_dir.join(format!("{}.json", entry.name)));
            json.write(&entry.figure)
                .map_err(|err| format!("figure `{}`: {err}", entry.name))?;
        }
        info!(
            figure = %entry.name,
            traces = entry.figure.trace_count(),
            "wrote report figure"
        );
    }

    println!(
        "wrote {} figures from {} rows to {}",
        figures.len(),
        mpg.len(),
        args.out_dir.display()
    );
    Ok(())
}

fn parse_args() -> Result<CliArgs, String> {
    let mut mpg_path = PathBuf::from(DEFAULT_MPG_PATH);
    let mut out_dir = PathBuf::from(DEFAULT_OUT_DIR);
    let mut write_json = false;

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--mpg" => {
                let value = args
                    .next()
                    .ok_or_else(|| "missing value for --mpg".to_owned())?;
                mpg_path = PathBuf::from(value);
            }
            "--out" => {
                let value = args
                    .next()
                    .ok_or_else(|| "missing value for --out".to_owned())?;
                out_dir = PathBuf::from(value);
            }
            "--json" => write_json = true,
            "-h" | "--help" => {
                println!(
                    "Usage: cargo run --bin static_report -- [--mpg <csv>] [--out <dir>] [--json]"
                );
                std::process::exit(0);
            }
            _ => return Err(format!("unknown argument: {arg}")),
        }
    }

    Ok(CliArgs {
        mpg_path,
        out_dir,
        write_json,
    })
}
