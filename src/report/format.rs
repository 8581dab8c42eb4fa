//! Formatted terminal output and JSON payloads.
//!
//! We keep formatting code in one place so:
//! - the fitting code stays clean and testable
//! - output changes are localized (important for golden tests)

use serde::Serialize;

use crate::domain::{Dataset, ProductTotal, TrainReport};
use crate::error::SessionError;

/// Format the train summary (dataset stats + fit diagnostics).
///
/// The headline MSE is computed on the training partition; the held-out MSE
/// is shown alongside so the difference stays visible.
pub fn format_train_summary(dataset: &Dataset, report: &TrainReport) -> String {
    let stats = dataset.stats();
    let mut out = String::new();

    out.push_str("=== sales - Linear Sales Model ===\n");
    out.push_str(&format!("File: {}\n", dataset.path.display()));
    out.push_str(&format!(
        "Rows: {} | products: {} | sales=[{:.2}, {:.2}]\n",
        stats.n_rows, stats.n_products, stats.sales_min, stats.sales_max
    ));
    if let (Some(min), Some(max)) = (stats.date_min, stats.date_max) {
        out.push_str(&format!("Dates: {min} to {max}\n"));
    }
    out.push_str(&format!(
        "Split: train={} | held-out={} (seed={})\n",
        report.n_train, report.n_holdout, report.seed
    ));
    out.push_str(&format!("Columns: [{}]\n", report.columns.join(", ")));
    out.push_str(&format!("MSE (training partition): {:.2}\n", report.mse_train));
    match report.mse_holdout {
        Some(mse) => out.push_str(&format!("MSE (held-out partition): {mse:.2}\n")),
        None => out.push_str("MSE (held-out partition): n/a (no held-out rows)\n"),
    }

    out
}

/// Format a single prediction (two decimal places, no rounding elsewhere).
pub fn format_prediction(date: &str, product: &str, value: f64) -> String {
    format!("Predicted sales for {product} on {date}: {value:.2}")
}

/// Format the per-product totals table.
pub fn format_totals(totals: &[ProductTotal]) -> String {
    let mut out = String::new();
    out.push_str("Total sales by product:\n");
    out.push_str(&format!("{:<20} {:>12}\n", "product", "total"));
    out.push_str(&format!("{:-<20} {:-<12}\n", "", ""));
    for t in totals {
        out.push_str(&format!("{:<20} {:>12.2}\n", truncate(&t.product, 20), t.total));
    }
    out
}

/// JSON payload for `predict --json`.
#[derive(Debug, Clone, Serialize)]
pub struct PredictionJson<'a> {
    pub date: &'a str,
    pub product: &'a str,
    pub predicted_sales: f64,
}

pub fn to_json<T: Serialize>(value: &T) -> Result<String, SessionError> {
    serde_json::to_string_pretty(value)
        .map_err(|e| SessionError::terminal(format!("Failed to serialize JSON output: {e}")))
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out = String::new();
    for (i, ch) in s.chars().enumerate() {
        if i + 1 >= max {
            break;
        }
        out.push(ch);
    }
    out.push('.');
    out
}
