//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - resolves the input CSV (flag or interactive picker)
//! - drives the session operations (load/train/predict/chart)
//! - prints reports/plots or launches the TUI

use std::path::PathBuf;

use clap::Parser;

use crate::cli::{ChartArgs, Command, DataArgs, PredictArgs, SampleArgs, TrainArgs};
use crate::domain::{TrainConfig, parse_date};
use crate::error::SessionError;
use crate::report::PredictionJson;
use crate::session::Session;

/// Entry point for the `sales` binary.
pub fn run() -> Result<(), SessionError> {
    // We want `sales` and `sales -f data.csv` to behave like `sales tui ...`.
    //
    // Clap requires a subcommand name, so we do a small, explicit rewrite of
    // the argv list before parsing. This preserves a clean clap structure
    // while retaining the requested UX.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Train(args) => handle_train(args),
        Command::Predict(args) => handle_predict(args),
        Command::Chart(args) => handle_chart(args),
        Command::Tui(args) => crate::tui::run(args),
        Command::Sample(args) => handle_sample(args),
    }
}

pub fn train_config_from_args(args: &DataArgs) -> TrainConfig {
    TrainConfig {
        seed: args.seed,
        holdout_frac: args.holdout,
    }
}

/// Resolve the CSV path from the flag, or prompt for one.
pub fn resolve_csv_path(file: Option<&PathBuf>) -> Result<PathBuf, SessionError> {
    match file {
        Some(path) => crate::cli::picker::validate_csv_path(path),
        None => crate::cli::picker::prompt_for_csv_path(),
    }
}

fn handle_train(args: TrainArgs) -> Result<(), SessionError> {
    let path = resolve_csv_path(args.data.file.as_ref())?;
    let mut session = Session::new(train_config_from_args(&args.data));
    session.load(&path)?;
    let report = session.train()?.clone();

    if args.json {
        println!("{}", crate::report::to_json(&report)?);
        return Ok(());
    }

    let dataset = session.dataset().ok_or(SessionError::NoData)?;
    print!("{}", crate::report::format_train_summary(dataset, &report));
    Ok(())
}

fn handle_predict(args: PredictArgs) -> Result<(), SessionError> {
    let path = resolve_csv_path(args.data.file.as_ref())?;
    let mut session = Session::new(train_config_from_args(&args.data));
    session.load(&path)?;
    session.train()?;

    let value = session.predict(&args.date, &args.product)?;

    if args.json {
        let payload = PredictionJson {
            date: &args.date,
            product: &args.product,
            predicted_sales: value,
        };
        println!("{}", crate::report::to_json(&payload)?);
        return Ok(());
    }

    println!("{}", crate::report::format_prediction(&args.date, &args.product, value));
    Ok(())
}

fn handle_chart(args: ChartArgs) -> Result<(), SessionError> {
    let path = resolve_csv_path(args.file.as_ref())?;
    let mut session = Session::new(TrainConfig::default());
    session.load(&path)?;

    let totals = session.aggregate()?;
    if args.table {
        print!("{}", crate::report::format_totals(&totals));
    } else {
        print!("{}", crate::plot::render_ascii_bars(&totals, args.width));
    }
    Ok(())
}

fn handle_sample(args: SampleArgs) -> Result<(), SessionError> {
    let start = parse_date(&args.start).map_err(SessionError::parse)?;
    let products: Vec<String> = args
        .products
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();

    let config = crate::data::SampleConfig {
        products,
        start,
        days: args.days,
        seed: args.seed,
        ..crate::data::SampleConfig::default()
    };

    let rows = crate::data::generate_sample(&config)?;
    crate::data::write_sample_csv(&args.out, &rows)?;
    println!("Wrote {} rows to {}", rows.len(), args.out.display());
    Ok(())
}

/// Rewrite argv so `sales` defaults to `sales tui`.
///
/// Rules:
/// - `sales`                    -> `sales tui`
/// - `sales -f data.csv ...`    -> `sales tui -f data.csv ...`
/// - `sales --help/--version`   -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("tui".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(
        arg1.as_str(),
        "train" | "predict" | "chart" | "tui" | "sample"
    );
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "tui flags".
    if arg1.starts_with('-') {
        argv.insert(1, "tui".to_string());
        return argv;
    }

    // Otherwise, leave as-is.
    argv
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn bare_invocation_defaults_to_tui() {
        assert_eq!(rewrite_args(argv(&["sales"])), argv(&["sales", "tui"]));
        assert_eq!(
            rewrite_args(argv(&["sales", "-f", "d.csv"])),
            argv(&["sales", "tui", "-f", "d.csv"])
        );
    }

    #[test]
    fn subcommands_and_help_pass_through() {
        assert_eq!(
            rewrite_args(argv(&["sales", "train", "-f", "d.csv"])),
            argv(&["sales", "train", "-f", "d.csv"])
        );
        assert_eq!(rewrite_args(argv(&["sales", "--help"])), argv(&["sales", "--help"]));
    }
}
