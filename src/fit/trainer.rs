//! Training: date normalization, deterministic split, OLS fit, diagnostics.
//!
//! Given a loaded `Dataset` we:
//!
//! - parse each raw date and convert it to an ordinal (days since 0001-01-01)
//! - one-hot encode products (lexically first category dropped)
//! - shuffle row indices with a seeded RNG and hold out a fraction
//! - fit ordinary least squares on the training partition
//! - compute MSE on the training partition (the headline metric) and on the
//!   held-out partition (reported alongside)
//!
//! Re-training with the same dataset and seed yields bit-identical
//! coefficients.

use nalgebra::{DMatrix, DVector};
use rand::prelude::*;
use rand::rngs::StdRng;

use crate::domain::{Dataset, TrainConfig, TrainReport, date_ordinal, parse_date};
use crate::error::SessionError;
use crate::math::solve_least_squares;
use crate::models::{FeatureEncoding, SalesModel};

/// All outputs of a single training run.
#[derive(Debug, Clone)]
pub struct TrainOutcome {
    pub model: SalesModel,
    pub report: TrainReport,
}

/// A row normalized for fitting.
#[derive(Debug, Clone)]
struct Observation {
    ordinal: f64,
    product: String,
    sales: f64,
}

/// Fit the sales regression on the dataset.
pub fn train_model(dataset: &Dataset, config: &TrainConfig) -> Result<TrainOutcome, SessionError> {
    if dataset.rows.is_empty() {
        return Err(SessionError::train("Dataset has no rows."));
    }
    if !(0.0..1.0).contains(&config.holdout_frac) {
        return Err(SessionError::train(format!(
            "Invalid holdout fraction {} (expected 0.0 <= f < 1.0).",
            config.holdout_frac
        )));
    }

    let observations = normalize_rows(dataset)?;
    let encoding = FeatureEncoding::from_products(&dataset.products)
        .map_err(SessionError::train)?;

    let (train_idx, holdout_idx) =
        split_indices(observations.len(), config.holdout_frac, config.seed);

    let width = encoding.width();
    let n_train = train_idx.len();

    let mut x_data = vec![0.0; n_train * width];
    let mut y_data = vec![0.0; n_train];
    for (r, &i) in train_idx.iter().enumerate() {
        let obs = &observations[i];
        encoding.fill_design_row(obs.ordinal, &obs.product, &mut x_data[r * width..(r + 1) * width]);
        y_data[r] = obs.sales;
    }

    let x = DMatrix::from_row_slice(n_train, width, &x_data);
    let y = DVector::from_row_slice(&y_data);

    let betas = solve_least_squares(&x, &y).ok_or_else(|| {
        SessionError::train("Least-squares system is too ill-conditioned to solve.")
    })?;

    let model = SalesModel::new(encoding, betas.iter().copied().collect());

    let mse_train = mean_squared_error(&model, &observations, &train_idx)
        .ok_or_else(|| SessionError::train("Non-finite prediction while computing MSE."))?;
    let mse_holdout = if holdout_idx.is_empty() {
        None
    } else {
        Some(
            mean_squared_error(&model, &observations, &holdout_idx)
                .ok_or_else(|| SessionError::train("Non-finite prediction while computing MSE."))?,
        )
    };

    let report = TrainReport {
        n_rows: observations.len(),
        n_train,
        n_holdout: holdout_idx.len(),
        mse_train,
        mse_holdout,
        columns: model.columns(),
        seed: config.seed,
    };

    Ok(TrainOutcome { model, report })
}

/// Deterministic seeded split of `0..n` into (training, held-out) indices.
///
/// The held-out size is `ceil(frac * n)`, capped at `n - 1` so training
/// always retains at least one row.
pub fn split_indices(n: usize, holdout_frac: f64, seed: u64) -> (Vec<usize>, Vec<usize>) {
    let mut idx: Vec<usize> = (0..n).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    idx.shuffle(&mut rng);

    let mut n_holdout = ((n as f64) * holdout_frac).ceil() as usize;
    if n > 0 && n_holdout >= n {
        n_holdout = n - 1;
    }

    let holdout = idx[..n_holdout].to_vec();
    let train = idx[n_holdout..].to_vec();
    (train, holdout)
}

fn normalize_rows(dataset: &Dataset) -> Result<Vec<Observation>, SessionError> {
    let mut out = Vec::with_capacity(dataset.rows.len());
    for (i, row) in dataset.rows.iter().enumerate() {
        let date = parse_date(&row.date_raw)
            .map_err(|e| SessionError::train(format!("Row {}: {e}", i + 1)))?;
        if !row.sales.is_finite() {
            return Err(SessionError::train(format!(
                "Row {}: non-finite `sales` value.",
                i + 1
            )));
        }
        out.push(Observation {
            ordinal: date_ordinal(date) as f64,
            product: row.product.clone(),
            sales: row.sales,
        });
    }
    Ok(out)
}

fn mean_squared_error(model: &SalesModel, obs: &[Observation], idx: &[usize]) -> Option<f64> {
    if idx.is_empty() {
        return Some(0.0);
    }
    let mut sum = 0.0;
    for &i in idx {
        let o = &obs[i];
        let pred = model.predict_at(o.ordinal, &o.product);
        if !pred.is_finite() {
            return None;
        }
        let r = o.sales - pred;
        sum += r * r;
    }
    Some(sum / idx.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SalesRow;
    use std::path::PathBuf;

    fn dataset(rows: &[(&str, &str, f64)]) -> Dataset {
        let rows = rows
            .iter()
            .map(|(d, p, s)| SalesRow {
                date_raw: d.to_string(),
                product: p.to_string(),
                sales: *s,
            })
            .collect();
        Dataset::from_rows(PathBuf::from("test.csv"), rows)
    }

    #[test]
    fn split_is_deterministic_and_partitions() {
        let (t1, h1) = split_indices(10, 0.2, 42);
        let (t2, h2) = split_indices(10, 0.2, 42);
        assert_eq!(t1, t2);
        assert_eq!(h1, h2);
        assert_eq!(t1.len(), 8);
        assert_eq!(h1.len(), 2);

        let mut all: Vec<usize> = t1.iter().chain(h1.iter()).copied().collect();
        all.sort_unstable();
        assert_eq!(all, (0..10).collect::<Vec<_>>());

        let (t3, _) = split_indices(10, 0.2, 43);
        assert_ne!(t1, t3, "different seeds should shuffle differently");
    }

    #[test]
    fn split_keeps_at_least_one_training_row() {
        let (t, h) = split_indices(1, 0.2, 42);
        assert_eq!(t.len(), 1);
        assert!(h.is_empty());

        let (t, h) = split_indices(3, 0.2, 42);
        assert_eq!(t.len(), 2);
        assert_eq!(h.len(), 1);
    }

    #[test]
    fn train_scenario_three_rows() {
        let ds = dataset(&[
            ("2023-01-01", "A", 100.0),
            ("2023-01-02", "B", 200.0),
            ("2023-01-03", "A", 150.0),
        ]);
        let outcome = train_model(&ds, &TrainConfig::default()).unwrap();

        assert!(outcome.report.mse_train >= 0.0);
        assert_eq!(outcome.report.n_rows, 3);
        assert_eq!(outcome.report.n_train + outcome.report.n_holdout, 3);
        assert_eq!(outcome.report.columns, vec!["Date", "Product_B"]);

        let d = crate::domain::parse_date("2023-01-01").unwrap();
        let pred = outcome.model.predict_at(date_ordinal(d) as f64, "A");
        assert!(pred.is_finite());
    }

    #[test]
    fn retrain_same_seed_is_bit_identical() {
        let ds = dataset(&[
            ("2023-01-01", "A", 100.0),
            ("2023-01-02", "B", 200.0),
            ("2023-01-03", "A", 150.0),
            ("2023-01-04", "C", 50.0),
            ("2023-01-05", "B", 210.0),
            ("2023-01-06", "A", 160.0),
        ]);
        let cfg = TrainConfig::default();
        let a = train_model(&ds, &cfg).unwrap();
        let b = train_model(&ds, &cfg).unwrap();

        assert_eq!(a.model.intercept().to_bits(), b.model.intercept().to_bits());
        for (wa, wb) in a.model.weights().iter().zip(b.model.weights()) {
            assert_eq!(wa.to_bits(), wb.to_bits());
        }
        assert_eq!(a.report.mse_train.to_bits(), b.report.mse_train.to_bits());
    }

    #[test]
    fn recovers_exact_linear_relationship() {
        // sales = 10 + 1*(days since 2023-01-01) + 100*[product == B]
        // Generated noise-free, so both MSEs should be ~0 and the fit exact.
        let mut rows = Vec::new();
        for day in 0..10 {
            let date = format!("2023-01-{:02}", day + 1);
            rows.push((date.clone(), "A".to_string(), 10.0 + day as f64));
            rows.push((date, "B".to_string(), 110.0 + day as f64));
        }
        let sales_rows: Vec<SalesRow> = rows
            .into_iter()
            .map(|(d, p, s)| SalesRow { date_raw: d, product: p, sales: s })
            .collect();
        let ds = Dataset::from_rows(PathBuf::from("t.csv"), sales_rows);

        // Raw date ordinals are ~7e5, so the design matrix is poorly
        // conditioned and "exact" recovery carries some f64 noise.
        let outcome = train_model(&ds, &TrainConfig::default()).unwrap();
        assert!(outcome.report.mse_train < 1e-6, "mse={}", outcome.report.mse_train);
        if let Some(h) = outcome.report.mse_holdout {
            assert!(h < 1e-6, "holdout mse={h}");
        }

        let d = crate::domain::parse_date("2023-01-05").unwrap();
        let ord = date_ordinal(d) as f64;
        let pa = outcome.model.predict_at(ord, "A");
        let pb = outcome.model.predict_at(ord, "B");
        assert!((pa - 14.0).abs() < 1e-3, "A: {pa}");
        assert!((pb - 114.0).abs() < 1e-3, "B: {pb}");
    }

    #[test]
    fn unparseable_date_is_train_error() {
        let ds = dataset(&[("not-a-date", "A", 1.0), ("2023-01-02", "B", 2.0)]);
        let err = train_model(&ds, &TrainConfig::default()).unwrap_err();
        assert_eq!(err.exit_code(), 3);
        assert!(err.to_string().contains("Row 1"), "got: {err}");
    }

    #[test]
    fn non_finite_sales_is_train_error() {
        let ds = dataset(&[("2023-01-01", "A", f64::NAN), ("2023-01-02", "B", 2.0)]);
        let err = train_model(&ds, &TrainConfig::default()).unwrap_err();
        assert!(err.to_string().contains("non-finite"), "got: {err}");
    }
}
