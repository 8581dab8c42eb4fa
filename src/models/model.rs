//! Feature encoding and the fitted linear model.
//!
//! The trainer relies on two primitive operations:
//! - build a design row for a given date ordinal and product (for OLS)
//! - predict sales given the fitted coefficients (for MSE/predictions)
//!
//! The column set is fixed when the encoding is built and must be reused
//! identically, in the same order, at prediction time. Product columns are
//! matched by **string equality** against the stored category list, never by
//! substring containment (a product named "A" must not match a column for
//! "Alpha").

/// One-hot feature encoding for the sales regression.
///
/// Columns, in order: `Date` (ordinal), then one indicator column per product
/// category except the lexically first, which is dropped as the reference
/// level (its effect folds into the intercept).
///
/// The dropped reference category and an unknown product both encode to
/// all-zero indicators and are therefore indistinguishable to the model.
/// This mirrors the documented ambiguity of the original tool.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureEncoding {
    reference: String,
    /// Dummy-coded categories, lexically sorted. Column index of category
    /// `dummies[i]` in a design row is `2 + i` (after intercept and date).
    dummies: Vec<String>,
}

impl FeatureEncoding {
    /// Build an encoding from the distinct product values.
    ///
    /// The input need not be sorted or deduplicated.
    pub fn from_products(products: &[String]) -> Result<Self, String> {
        let mut cats: Vec<String> = products.to_vec();
        cats.sort();
        cats.dedup();

        if cats.is_empty() {
            return Err("No product categories to encode.".to_string());
        }

        let reference = cats.remove(0);
        Ok(Self { reference, dummies: cats })
    }

    /// The dropped reference category.
    pub fn reference(&self) -> &str {
        &self.reference
    }

    /// Number of design-row entries: intercept + date + dummies.
    pub fn width(&self) -> usize {
        2 + self.dummies.len()
    }

    /// Feature column names in fit order (intercept is implicit).
    pub fn column_names(&self) -> Vec<String> {
        let mut out = Vec::with_capacity(1 + self.dummies.len());
        out.push("Date".to_string());
        for d in &self.dummies {
            out.push(format!("Product_{d}"));
        }
        out
    }

    /// Column index of a product's indicator within a design row, if the
    /// product is dummy-coded. Equality lookup; the reference category and
    /// unknown products return `None`.
    pub fn dummy_index(&self, product: &str) -> Option<usize> {
        self.dummies
            .binary_search_by(|d| d.as_str().cmp(product))
            .ok()
            .map(|i| 2 + i)
    }

    /// Fill a design row for the given date ordinal and product.
    ///
    /// The row includes the constant term first (intercept).
    ///
    /// # Panics
    /// Panics if `out` does not have length `self.width()`. Callers should
    /// size the row from the encoding.
    pub fn fill_design_row(&self, ordinal: f64, product: &str, out: &mut [f64]) {
        assert_eq!(out.len(), self.width(), "design row sized from a different encoding");
        out.fill(0.0);
        out[0] = 1.0;
        out[1] = ordinal;
        if let Some(idx) = self.dummy_index(product) {
            out[idx] = 1.0;
        }
    }
}

/// A fitted linear regression: coefficient vector plus the encoding that
/// produced its columns.
///
/// `betas[0]` is the intercept; `betas[1..]` line up with
/// `encoding.column_names()`.
#[derive(Debug, Clone)]
pub struct SalesModel {
    encoding: FeatureEncoding,
    betas: Vec<f64>,
}

impl SalesModel {
    /// # Panics
    /// Panics if the coefficient count does not match the encoding width.
    pub fn new(encoding: FeatureEncoding, betas: Vec<f64>) -> Self {
        assert_eq!(betas.len(), encoding.width(), "coefficients do not match encoding");
        Self { encoding, betas }
    }

    pub fn encoding(&self) -> &FeatureEncoding {
        &self.encoding
    }

    pub fn intercept(&self) -> f64 {
        self.betas[0]
    }

    /// Feature weights (date first, then dummies), excluding the intercept.
    pub fn weights(&self) -> &[f64] {
        &self.betas[1..]
    }

    /// Feature column names in fit order.
    pub fn columns(&self) -> Vec<String> {
        self.encoding.column_names()
    }

    /// Predict sales for a date ordinal and product.
    pub fn predict_at(&self, ordinal: f64, product: &str) -> f64 {
        let mut row = vec![0.0; self.encoding.width()];
        self.encoding.fill_design_row(ordinal, product, &mut row);
        row.iter().zip(&self.betas).map(|(x, b)| x * b).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encoding(products: &[&str]) -> FeatureEncoding {
        let owned: Vec<String> = products.iter().map(|s| s.to_string()).collect();
        FeatureEncoding::from_products(&owned).unwrap()
    }

    #[test]
    fn drops_lexically_first_category() {
        let enc = encoding(&["B", "A", "C", "B"]);
        assert_eq!(enc.reference(), "A");
        assert_eq!(enc.column_names(), vec!["Date", "Product_B", "Product_C"]);
        assert_eq!(enc.width(), 4);
    }

    #[test]
    fn design_row_matches_column_order() {
        let enc = encoding(&["A", "B", "C"]);
        let mut row = vec![0.0; enc.width()];

        enc.fill_design_row(5.0, "C", &mut row);
        assert_eq!(row, vec![1.0, 5.0, 0.0, 1.0]);

        enc.fill_design_row(5.0, "B", &mut row);
        assert_eq!(row, vec![1.0, 5.0, 1.0, 0.0]);
    }

    #[test]
    fn reference_and_unknown_encode_identically() {
        let enc = encoding(&["A", "B"]);
        let mut ref_row = vec![0.0; enc.width()];
        let mut unk_row = vec![0.0; enc.width()];

        enc.fill_design_row(7.0, "A", &mut ref_row);
        enc.fill_design_row(7.0, "ZZZ", &mut unk_row);
        assert_eq!(ref_row, unk_row);
    }

    #[test]
    fn equality_lookup_not_substring() {
        // "A" is a substring of "Alpha"; it must not match Alpha's column.
        let enc = encoding(&["Alpha", "Beta", "A"]);
        assert_eq!(enc.reference(), "A");
        assert_eq!(enc.dummy_index("A"), None);
        assert!(enc.dummy_index("Alpha").is_some());
        assert_ne!(enc.dummy_index("Alpha"), enc.dummy_index("Beta"));
    }

    #[test]
    fn predict_applies_linear_function() {
        let enc = encoding(&["A", "B"]);
        // intercept 10, date weight 2, Product_B weight 5
        let model = SalesModel::new(enc, vec![10.0, 2.0, 5.0]);
        assert!((model.predict_at(3.0, "B") - 21.0).abs() < 1e-12);
        assert!((model.predict_at(3.0, "A") - 16.0).abs() < 1e-12);
        // Unknown product behaves like the reference.
        assert!((model.predict_at(3.0, "X") - 16.0).abs() < 1e-12);
        assert!((model.intercept() - 10.0).abs() < 1e-12);
        assert_eq!(model.weights(), &[2.0, 5.0]);
    }
}
