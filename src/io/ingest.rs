//! CSV ingest and validation.
//!
//! This module turns a sales CSV into a clean `Dataset` that is safe to hand
//! to training and charting.
//!
//! Design goals:
//! - **Strict schema** for the required columns (clear errors + exit code 2)
//! - **Atomic loads**: a bad row fails the whole load, so the session never
//!   observes a partially loaded dataset
//! - **Deterministic behavior** (no hidden randomness)
//! - **Separation of concerns**: no fitting logic here; dates stay raw
//!   strings until train time

use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

use csv::StringRecord;

use crate::domain::{Dataset, DatasetStats, SalesRow};
use crate::error::SessionError;

/// Ingest output: the dataset plus summary stats.
#[derive(Debug, Clone)]
pub struct IngestedData {
    pub dataset: Dataset,
    pub stats: DatasetStats,
    pub rows_read: usize,
}

/// Load and validate a sales CSV.
///
/// Required header columns (case-insensitive): `Date`, `Product`, `Sales`.
/// Every row must carry a non-empty date and product and a numeric sales
/// value; the first offending row fails the load.
pub fn load_sales_csv(path: &Path) -> Result<IngestedData, SessionError> {
    let file = File::open(path).map_err(|e| {
        SessionError::load(format!("Failed to open CSV '{}': {e}", path.display()))
    })?;

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(file);

    let headers = reader
        .headers()
        .map_err(|e| SessionError::load(format!("Failed to read CSV headers: {e}")))?
        .clone();

    let header_map = build_header_map(&headers);
    ensure_required_columns_exist(&header_map)?;

    let mut rows = Vec::new();
    let mut rows_read = 0usize;

    for (idx, result) in reader.records().enumerate() {
        // +2 because:
        // - records() starts at line 1 after headers
        // - CSV is 1-based line numbers
        let line = idx + 2;
        rows_read += 1;

        let record = result
            .map_err(|e| SessionError::load(format!("Line {line}: CSV parse error: {e}")))?;

        let row = parse_row(&record, &header_map)
            .map_err(|e| SessionError::load(format!("Line {line}: {e}")))?;
        rows.push(row);
    }

    if rows.is_empty() {
        return Err(SessionError::load("CSV contains no data rows."));
    }

    let dataset = Dataset::from_rows(path.to_path_buf(), rows);
    let stats = dataset.stats();

    Ok(IngestedData {
        dataset,
        stats,
        rows_read,
    })
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (normalize_header_name(name), idx))
        .collect()
}

fn normalize_header_name(name: &str) -> String {
    // Excel and other tools sometimes emit UTF-8 CSVs with a BOM prefix on the
    // first header (e.g. "﻿Date"). If we don't strip it, schema validation
    // will incorrectly report missing columns.
    let name = name.trim().trim_start_matches('\u{feff}');
    name.to_ascii_lowercase()
}

fn ensure_required_columns_exist(header_map: &HashMap<String, usize>) -> Result<(), SessionError> {
    for col in ["date", "product", "sales"] {
        if !header_map.contains_key(col) {
            return Err(SessionError::load(format!("Missing required column: `{col}`")));
        }
    }
    Ok(())
}

fn parse_row(record: &StringRecord, header_map: &HashMap<String, usize>) -> Result<SalesRow, String> {
    let date_raw = get_required(record, header_map, "date")?.to_string();
    let product = get_required(record, header_map, "product")?.to_string();

    let sales_raw = get_required(record, header_map, "sales")?;
    let sales = sales_raw
        .parse::<f64>()
        .map_err(|_| format!("Non-numeric `sales` value: '{sales_raw}'"))?;

    Ok(SalesRow { date_raw, product, sales })
}

fn get_required<'a>(
    record: &'a StringRecord,
    header_map: &HashMap<String, usize>,
    name: &str,
) -> Result<&'a str, String> {
    let idx = header_map
        .get(name)
        .ok_or_else(|| format!("Missing required column: `{name}`"))?;
    record
        .get(*idx)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| format!("Missing required value: `{name}`"))
}
