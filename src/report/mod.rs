//! Reporting utilities: per-product aggregates and formatted terminal output.

pub mod format;

pub use format::*;

use std::collections::BTreeMap;

use crate::domain::{Dataset, ProductTotal};

/// Group records by product and sum sales per group.
///
/// Output is sorted by product name, so it is stable across runs and lines up
/// with the chart's bar order.
pub fn aggregate_by_product(dataset: &Dataset) -> Vec<ProductTotal> {
    let mut totals: BTreeMap<&str, f64> = BTreeMap::new();
    for row in &dataset.rows {
        *totals.entry(row.product.as_str()).or_insert(0.0) += row.sales;
    }

    totals
        .into_iter()
        .map(|(product, total)| ProductTotal {
            product: product.to_string(),
            total,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SalesRow;
    use std::path::PathBuf;

    #[test]
    fn aggregate_sums_per_product() {
        let rows = vec![
            SalesRow { date_raw: "2023-01-01".into(), product: "A".into(), sales: 100.0 },
            SalesRow { date_raw: "2023-01-02".into(), product: "B".into(), sales: 200.0 },
            SalesRow { date_raw: "2023-01-03".into(), product: "A".into(), sales: 150.0 },
        ];
        let ds = Dataset::from_rows(PathBuf::from("x.csv"), rows);

        let totals = aggregate_by_product(&ds);
        assert_eq!(totals.len(), 2);
        assert_eq!(totals[0].product, "A");
        assert!((totals[0].total - 250.0).abs() < 1e-12);
        assert_eq!(totals[1].product, "B");
        assert!((totals[1].total - 200.0).abs() < 1e-12);
    }
}
