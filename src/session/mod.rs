//! The interactive session: dataset + model + the four operations.
//!
//! The session is a plain struct with synchronous methods so the CLI
//! subcommands and the TUI drive the exact same logic. State machine:
//!
//! ```text
//! Empty → Loaded → Trained → (Predicting | Charting)*
//! ```
//!
//! - `predict` requires a trained model; `aggregate` requires only data
//! - a fresh `load` replaces the dataset and discards the model
//! - a fresh `train` replaces the model only
//! - a failed operation leaves the session in its prior valid state
//!   (validation happens before any assignment, and assignments are whole
//!   replacements)

use std::path::Path;

use crate::domain::{Dataset, ProductTotal, TrainConfig, TrainReport, date_ordinal, parse_date};
use crate::error::SessionError;
use crate::fit::train_model;
use crate::io::ingest::load_sales_csv;
use crate::models::SalesModel;
use crate::report::aggregate_by_product;

#[derive(Debug, Clone, Default)]
pub struct Session {
    config: TrainConfig,
    dataset: Option<Dataset>,
    model: Option<SalesModel>,
    last_report: Option<TrainReport>,
}

impl Session {
    pub fn new(config: TrainConfig) -> Self {
        Self {
            config,
            dataset: None,
            model: None,
            last_report: None,
        }
    }

    pub fn config(&self) -> &TrainConfig {
        &self.config
    }

    pub fn dataset(&self) -> Option<&Dataset> {
        self.dataset.as_ref()
    }

    pub fn model(&self) -> Option<&SalesModel> {
        self.model.as_ref()
    }

    pub fn last_report(&self) -> Option<&TrainReport> {
        self.last_report.as_ref()
    }

    /// Distinct products of the loaded dataset (empty before a load).
    pub fn products(&self) -> &[String] {
        self.dataset.as_ref().map(|d| d.products.as_slice()).unwrap_or(&[])
    }

    /// Load a sales CSV, replacing any previous dataset and model.
    pub fn load(&mut self, path: &Path) -> Result<&Dataset, SessionError> {
        let ingest = load_sales_csv(path)?;
        self.model = None;
        self.last_report = None;
        Ok(self.dataset.insert(ingest.dataset))
    }

    /// Fit the regression on the loaded dataset, replacing any previous model.
    pub fn train(&mut self) -> Result<&TrainReport, SessionError> {
        let dataset = self
            .dataset
            .as_ref()
            .ok_or_else(|| SessionError::train("No dataset loaded."))?;

        let outcome = train_model(dataset, &self.config)?;
        self.model = Some(outcome.model);
        Ok(self.last_report.insert(outcome.report))
    }

    /// Predict sales for a date string and product.
    pub fn predict(&self, date: &str, product: &str) -> Result<f64, SessionError> {
        let model = self.model.as_ref().ok_or(SessionError::NotTrained)?;
        let parsed = parse_date(date).map_err(SessionError::parse)?;
        Ok(model.predict_at(date_ordinal(parsed) as f64, product))
    }

    /// Total sales per product for the loaded dataset.
    pub fn aggregate(&self) -> Result<Vec<ProductTotal>, SessionError> {
        let dataset = self.dataset.as_ref().ok_or(SessionError::NoData)?;
        Ok(aggregate_by_product(dataset))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use std::path::PathBuf;

    fn write_temp_csv(name: &str, content: &str) -> PathBuf {
        let mut path = std::env::temp_dir();
        path.push(format!("sales-session-{name}-{}.csv", std::process::id()));
        let mut f = File::create(&path).unwrap();
        f.write_all(content.as_bytes()).unwrap();
        path
    }

    const SCENARIO: &str =
        "Date,Product,Sales\n2023-01-01,A,100\n2023-01-02,B,200\n2023-01-03,A,150\n";

    #[test]
    fn full_scenario_load_train_predict_chart() {
        let path = write_temp_csv("scenario", SCENARIO);
        let mut session = Session::new(TrainConfig::default());

        session.load(&path).unwrap();
        assert_eq!(session.products(), &["A".to_string(), "B".to_string()]);

        let report = session.train().unwrap().clone();
        assert!(report.mse_train >= 0.0);

        let pred = session.predict("2023-01-01", "A").unwrap();
        assert!(pred.is_finite());

        let totals = session.aggregate().unwrap();
        assert_eq!(totals.len(), 2);
        assert!((totals[0].total - 250.0).abs() < 1e-9);
        assert!((totals[1].total - 200.0).abs() < 1e-9);

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn predict_before_train_is_not_trained() {
        let path = write_temp_csv("notrain", SCENARIO);
        let mut session = Session::new(TrainConfig::default());
        session.load(&path).unwrap();
        std::fs::remove_file(&path).ok();

        let err = session.predict("2023-01-01", "A").unwrap_err();
        assert!(matches!(err, SessionError::NotTrained));
    }

    #[test]
    fn chart_before_load_is_no_data() {
        let session = Session::new(TrainConfig::default());
        let err = session.aggregate().unwrap_err();
        assert!(matches!(err, SessionError::NoData));
    }

    #[test]
    fn train_before_load_fails_without_corrupting_state() {
        let mut session = Session::new(TrainConfig::default());
        assert!(session.train().is_err());
        assert!(session.dataset().is_none());
        assert!(session.model().is_none());
    }

    #[test]
    fn failed_load_preserves_previous_dataset() {
        let good = write_temp_csv("good", SCENARIO);
        let mut session = Session::new(TrainConfig::default());
        session.load(&good).unwrap();
        session.train().unwrap();
        std::fs::remove_file(&good).ok();

        let err = session.load(Path::new("/no/such/file.csv")).unwrap_err();
        assert_eq!(err.exit_code(), 2);

        // Prior valid state survives the failed action.
        assert!(session.dataset().is_some());
        assert!(session.model().is_some());
    }

    #[test]
    fn reload_resets_model() {
        let path = write_temp_csv("reload", SCENARIO);
        let mut session = Session::new(TrainConfig::default());
        session.load(&path).unwrap();
        session.train().unwrap();
        assert!(session.model().is_some());

        session.load(&path).unwrap();
        assert!(session.model().is_none());
        assert!(session.last_report().is_none());
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn malformed_predict_date_is_parse_error() {
        let path = write_temp_csv("badpred", SCENARIO);
        let mut session = Session::new(TrainConfig::default());
        session.load(&path).unwrap();
        session.train().unwrap();
        std::fs::remove_file(&path).ok();

        let err = session.predict("01 Jan 2023", "A").unwrap_err();
        assert!(matches!(err, SessionError::Parse(_)));
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn reference_and_unknown_product_predict_identically() {
        let path = write_temp_csv("refunk", SCENARIO);
        let mut session = Session::new(TrainConfig::default());
        session.load(&path).unwrap();
        session.train().unwrap();
        std::fs::remove_file(&path).ok();

        // "A" is the lexically first (dropped) category.
        let reference = session.predict("2023-01-02", "A").unwrap();
        let unknown = session.predict("2023-01-02", "DoesNotExist").unwrap();
        assert_eq!(reference.to_bits(), unknown.to_bits());
    }
}
