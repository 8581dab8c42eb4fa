//! Command-line parsing for the sales predictor.
//!
//! The goal of this module is to keep **argument parsing** and **command
//! dispatch** separate from the session/model code.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub mod picker;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "sales", version, about = "Sales predictor (linear regression over date + product)")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Load a sales CSV, fit the regression, and print the train report.
    Train(TrainArgs),
    /// Load + train, then predict sales for a date/product pair.
    Predict(PredictArgs),
    /// Print total sales by product as an ASCII bar chart.
    Chart(ChartArgs),
    /// Launch the interactive TUI.
    ///
    /// This drives the same session operations as the subcommands, but with
    /// an embedded bar chart and editable predict inputs.
    Tui(DataArgs),
    /// Write a synthetic sales CSV for demos and testing.
    Sample(SampleArgs),
}

/// Common data/training options.
#[derive(Debug, Parser, Clone)]
pub struct DataArgs {
    /// Sales CSV with `Date`, `Product`, `Sales` columns. Prompts for a file
    /// if omitted.
    #[arg(short = 'f', long)]
    pub file: Option<PathBuf>,

    /// Random seed for the train/held-out split (reproducible fits).
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Fraction of rows held out from training.
    #[arg(long, default_value_t = 0.2)]
    pub holdout: f64,
}

/// Options for `sales train`.
#[derive(Debug, Parser)]
pub struct TrainArgs {
    #[command(flatten)]
    pub data: DataArgs,

    /// Emit the train report as JSON (for scripting).
    #[arg(long)]
    pub json: bool,
}

/// Options for `sales predict`.
#[derive(Debug, Parser)]
pub struct PredictArgs {
    #[command(flatten)]
    pub data: DataArgs,

    /// Date to predict for (YYYY-MM-DD preferred).
    #[arg(short = 'd', long)]
    pub date: String,

    /// Product to predict for.
    #[arg(short = 'p', long)]
    pub product: String,

    /// Emit the prediction as JSON (for scripting).
    #[arg(long)]
    pub json: bool,
}

/// Options for `sales chart`.
#[derive(Debug, Parser)]
pub struct ChartArgs {
    /// Sales CSV with `Date`, `Product`, `Sales` columns. Prompts for a file
    /// if omitted.
    #[arg(short = 'f', long)]
    pub file: Option<PathBuf>,

    /// Maximum bar width (characters).
    #[arg(long, default_value_t = 50)]
    pub width: usize,

    /// Print a plain totals table instead of bars.
    #[arg(long)]
    pub table: bool,
}

/// Options for `sales sample`.
#[derive(Debug, Parser)]
pub struct SampleArgs {
    /// Output CSV path.
    #[arg(short = 'o', long)]
    pub out: PathBuf,

    /// Comma-separated product names.
    #[arg(long, default_value = "Alpha,Bravo,Charlie")]
    pub products: String,

    /// Number of days to generate, one record per product per day.
    #[arg(long, default_value_t = 90)]
    pub days: u32,

    /// First date (YYYY-MM-DD).
    #[arg(long, default_value = "2023-01-01")]
    pub start: String,

    /// Random seed for the noise.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,
}
