//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can
//! be used in-memory by the session and emitted as JSON for scripting.

use std::path::PathBuf;

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

/// A single loaded sales record.
///
/// The date is kept as the raw string from the file: normalization to an
/// ordinal happens at train time, and a malformed date is a *train* failure,
/// not a load failure. Sales values are validated numerically at load so a
/// load is all-or-nothing.
#[derive(Debug, Clone)]
pub struct SalesRow {
    pub date_raw: String,
    pub product: String,
    pub sales: f64,
}

/// The loaded dataset: ordered records plus the derived product list.
///
/// Created by load, replaced wholesale by a subsequent load, never partially
/// mutated.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub path: PathBuf,
    pub rows: Vec<SalesRow>,
    /// Distinct product values, lexically sorted.
    pub products: Vec<String>,
}

impl Dataset {
    pub fn from_rows(path: PathBuf, rows: Vec<SalesRow>) -> Self {
        let mut products: Vec<String> = rows.iter().map(|r| r.product.clone()).collect();
        products.sort();
        products.dedup();
        Self { path, rows, products }
    }

    /// Summary stats over the loaded rows. Min/max are taken over finite
    /// sales values only (non-finite values are rejected at train time);
    /// the date span covers the rows whose raw date parses.
    pub fn stats(&self) -> DatasetStats {
        let mut sales_min = f64::INFINITY;
        let mut sales_max = f64::NEG_INFINITY;
        let mut date_min: Option<NaiveDate> = None;
        let mut date_max: Option<NaiveDate> = None;
        for r in &self.rows {
            if r.sales.is_finite() {
                sales_min = sales_min.min(r.sales);
                sales_max = sales_max.max(r.sales);
            }
            if let Ok(d) = parse_date(&r.date_raw) {
                date_min = Some(date_min.map_or(d, |cur| cur.min(d)));
                date_max = Some(date_max.map_or(d, |cur| cur.max(d)));
            }
        }
        if sales_min > sales_max {
            sales_min = f64::NAN;
            sales_max = f64::NAN;
        }
        DatasetStats {
            n_rows: self.rows.len(),
            n_products: self.products.len(),
            sales_min,
            sales_max,
            date_min,
            date_max,
        }
    }
}

/// Summary stats about the loaded rows.
#[derive(Debug, Clone, Serialize)]
pub struct DatasetStats {
    pub n_rows: usize,
    pub n_products: usize,
    pub sales_min: f64,
    pub sales_max: f64,
    /// Earliest/latest parseable dates, `None` if no date parses.
    pub date_min: Option<NaiveDate>,
    pub date_max: Option<NaiveDate>,
}

/// Training configuration.
#[derive(Debug, Clone, Copy)]
pub struct TrainConfig {
    /// Seed for the deterministic train/held-out shuffle.
    pub seed: u64,
    /// Fraction of rows held out from training (0.0..1.0).
    pub holdout_frac: f64,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            holdout_frac: 0.2,
        }
    }
}

/// Outcome summary of a training run.
#[derive(Debug, Clone, Serialize)]
pub struct TrainReport {
    pub n_rows: usize,
    pub n_train: usize,
    pub n_holdout: usize,
    /// MSE on the training partition. This is the headline metric, matching
    /// the documented behavior of evaluating on the data the model was fit on.
    pub mse_train: f64,
    /// MSE on the held-out partition, when one exists.
    pub mse_holdout: Option<f64>,
    /// Feature columns in fit order.
    pub columns: Vec<String>,
    pub seed: u64,
}

/// Total sales for one product.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductTotal {
    pub product: String,
    pub total: f64,
}

/// Parse a calendar date from a small set of common formats.
///
/// ISO (`YYYY-MM-DD`) is recommended, but sales exports often use `DD/MM/YYYY`
/// variants. The list is fixed so parsing stays deterministic.
pub fn parse_date(s: &str) -> Result<NaiveDate, String> {
    const FMTS: [&str; 4] = ["%Y-%m-%d", "%d/%m/%Y", "%d-%m-%Y", "%Y/%m/%d"];
    for fmt in FMTS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Ok(d);
        }
    }
    Err(format!(
        "Invalid date '{s}'. Expected one of: YYYY-MM-DD, DD/MM/YYYY, DD-MM-YYYY, YYYY/MM/DD."
    ))
}

/// Convert a date to its ordinal: days since 0001-01-01 in the proleptic
/// Gregorian calendar (0001-01-01 is day 1), the regression's date feature.
pub fn date_ordinal(d: NaiveDate) -> i64 {
    i64::from(d.num_days_from_ce())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_date_accepts_common_formats() {
        let expected = NaiveDate::from_ymd_opt(2023, 1, 2).unwrap();
        for s in ["2023-01-02", "02/01/2023", "02-01-2023", "2023/01/02"] {
            assert_eq!(parse_date(s).unwrap(), expected, "format: {s}");
        }
        assert!(parse_date("yesterday").is_err());
        assert!(parse_date("").is_err());
    }

    #[test]
    fn ordinal_counts_days_from_ce() {
        let d = NaiveDate::from_ymd_opt(1, 1, 1).unwrap();
        assert_eq!(date_ordinal(d), 1);

        let a = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
        let b = NaiveDate::from_ymd_opt(2023, 1, 3).unwrap();
        assert_eq!(date_ordinal(b) - date_ordinal(a), 2);
    }

    #[test]
    fn dataset_products_sorted_distinct() {
        let rows = vec![
            SalesRow { date_raw: "2023-01-01".into(), product: "B".into(), sales: 1.0 },
            SalesRow { date_raw: "2023-01-02".into(), product: "A".into(), sales: 2.0 },
            SalesRow { date_raw: "2023-01-03".into(), product: "B".into(), sales: 3.0 },
        ];
        let ds = Dataset::from_rows(PathBuf::from("x.csv"), rows);
        assert_eq!(ds.products, vec!["A".to_string(), "B".to_string()]);
    }

    #[test]
    fn stats_cover_sales_range_and_date_span() {
        let rows = vec![
            SalesRow { date_raw: "2023-01-05".into(), product: "A".into(), sales: 7.0 },
            SalesRow { date_raw: "2023-01-02".into(), product: "B".into(), sales: 3.0 },
            SalesRow { date_raw: "garbled".into(), product: "B".into(), sales: f64::NAN },
        ];
        let stats = Dataset::from_rows(PathBuf::from("x.csv"), rows).stats();

        assert_eq!(stats.n_rows, 3);
        assert!((stats.sales_min - 3.0).abs() < 1e-12);
        assert!((stats.sales_max - 7.0).abs() < 1e-12);
        assert_eq!(stats.date_min, NaiveDate::from_ymd_opt(2023, 1, 2));
        assert_eq!(stats.date_max, NaiveDate::from_ymd_opt(2023, 1, 5));
    }
}
