//! ASCII bar chart for terminal output.
//!
//! This is intentionally "dumb" (fixed-width bars), optimized for:
//! - quick visual sanity checks in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! One horizontal bar per product, scaled to the widest total:
//!
//! ```text
//! Total sales by product | total=[0.00, 250.00]
//! A        | #################### 250.00
//! B        | ################ 200.00
//! ```

use crate::domain::ProductTotal;

/// Render per-product totals as a horizontal bar chart.
///
/// `width` is the maximum bar length in characters. Bars are scaled against
/// the largest positive total; non-positive totals get no bar but their value
/// is still printed.
pub fn render_ascii_bars(totals: &[ProductTotal], width: usize) -> String {
    let width = width.max(10);

    let max_total = totals
        .iter()
        .map(|t| t.total)
        .filter(|v| v.is_finite())
        .fold(0.0_f64, f64::max);

    let label_width = totals
        .iter()
        .map(|t| t.product.chars().count().min(MAX_LABEL))
        .max()
        .unwrap_or(1)
        .max(1);

    let mut out = String::new();
    out.push_str(&format!(
        "Total sales by product | total=[0.00, {max_total:.2}]\n"
    ));

    for t in totals {
        let bar_len = if max_total > 0.0 && t.total > 0.0 {
            let u = (t.total / max_total).clamp(0.0, 1.0);
            ((u * width as f64).round() as usize).max(1)
        } else {
            0
        };

        out.push_str(&format!(
            "{:<label_width$} | {} {:.2}\n",
            truncate(&t.product, MAX_LABEL),
            "#".repeat(bar_len),
            t.total,
        ));
    }

    out
}

const MAX_LABEL: usize = 20;

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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bars_golden_snapshot_small() {
        let totals = vec![
            ProductTotal { product: "A".into(), total: 250.0 },
            ProductTotal { product: "B".into(), total: 200.0 },
        ];

        let txt = render_ascii_bars(&totals, 10);
        let expected = concat!(
            "Total sales by product | total=[0.00, 250.00]\n",
            "A | ########## 250.00\n",
            "B | ######## 200.00\n",
        );
        assert_eq!(txt, expected);
    }

    #[test]
    fn non_positive_totals_get_no_bar() {
        let totals = vec![
            ProductTotal { product: "A".into(), total: 100.0 },
            ProductTotal { product: "B".into(), total: -5.0 },
        ];
        let txt = render_ascii_bars(&totals, 10);
        assert!(txt.contains("B |  -5.00"), "got:\n{txt}");
    }

    #[test]
    fn long_product_names_truncated() {
        let totals = vec![ProductTotal {
            product: "A-very-long-product-name-indeed".into(),
            total: 1.0,
        }];
        let txt = render_ascii_bars(&totals, 10);
        let line = txt.lines().nth(1).unwrap();
        assert!(line.starts_with("A-very-long-product."), "got: {line}");
    }
}
