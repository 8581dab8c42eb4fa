//! Seeded synthetic sales CSV generation.
//!
//! Produces one record per product per day:
//!
//! ```text
//! sales = base + gap * product_index + trend * day_index + noise * z
//! ```
//!
//! with `z ~ N(0, 1)`, floored at zero. The generator is deterministic for a
//! given seed, so demo files and tests are reproducible.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use chrono::{Duration, NaiveDate};
use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::Normal;

use crate::domain::SalesRow;
use crate::error::SessionError;

#[derive(Debug, Clone)]
pub struct SampleConfig {
    pub products: Vec<String>,
    pub start: NaiveDate,
    pub days: u32,
    /// Baseline daily sales for the first product on day 0.
    pub base: f64,
    /// Per-day drift applied to every product.
    pub trend: f64,
    /// Level offset between successive products.
    pub gap: f64,
    /// Standard deviation of the Gaussian noise.
    pub noise: f64,
    pub seed: u64,
}

impl Default for SampleConfig {
    fn default() -> Self {
        Self {
            products: vec!["Alpha".into(), "Bravo".into(), "Charlie".into()],
            start: NaiveDate::from_ymd_opt(2023, 1, 1).unwrap_or_default(),
            days: 90,
            base: 120.0,
            trend: 0.8,
            gap: 45.0,
            noise: 12.0,
            seed: 42,
        }
    }
}

/// Generate synthetic sales rows.
pub fn generate_sample(config: &SampleConfig) -> Result<Vec<SalesRow>, SessionError> {
    if config.products.is_empty() {
        return Err(SessionError::load("Sample needs at least one product."));
    }
    if config.days == 0 {
        return Err(SessionError::load("Sample needs at least one day."));
    }
    if !(config.noise.is_finite() && config.noise >= 0.0) {
        return Err(SessionError::load("Sample noise must be finite and >= 0."));
    }
    if !(config.base.is_finite() && config.trend.is_finite() && config.gap.is_finite()) {
        return Err(SessionError::load("Sample levels must be finite."));
    }

    let mut rng = StdRng::seed_from_u64(config.seed);
    let normal = Normal::new(0.0, 1.0)
        .map_err(|e| SessionError::load(format!("Noise distribution error: {e}")))?;

    let mut rows = Vec::with_capacity(config.days as usize * config.products.len());
    for day in 0..config.days {
        let date = config.start + Duration::days(i64::from(day));
        for (p_idx, product) in config.products.iter().enumerate() {
            let z = normal.sample(&mut rng);
            let level = config.base + config.gap * p_idx as f64 + config.trend * f64::from(day);
            let sales = (level + config.noise * z).max(0.0);

            rows.push(SalesRow {
                date_raw: date.format("%Y-%m-%d").to_string(),
                product: product.clone(),
                sales,
            });
        }
    }

    Ok(rows)
}

/// Write sales rows as a CSV with the standard header.
pub fn write_sample_csv(path: &Path, rows: &[SalesRow]) -> Result<(), SessionError> {
    let mut file = File::create(path).map_err(|e| {
        SessionError::load(format!("Failed to create sample CSV '{}': {e}", path.display()))
    })?;

    writeln!(file, "Date,Product,Sales")
        .map_err(|e| SessionError::load(format!("Failed to write sample CSV header: {e}")))?;

    for row in rows {
        writeln!(file, "{},{},{:.2}", row.date_raw, row.product, row.sales)
            .map_err(|e| SessionError::load(format!("Failed to write sample CSV row: {e}")))?;
    }

    Ok(())
}
