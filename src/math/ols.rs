//! Ordinary least squares solver.
//!
//! Training solves a single linear regression:
//!
//! ```text
//! minimize Σ (y_i - x_i^T β)^2
//! ```
//!
//! Implementation choices:
//! - SVD is used to solve the least-squares problem robustly for tall design
//!   matrices (more rows than columns). Nalgebra's `QR::solve` is intended
//!   for square systems and will panic for non-square matrices.
//! - Dummy-coded product columns can be collinear with the intercept when a
//!   product appears in every training row (or a column is all zeros after
//!   the split), so the solve tolerates near-singular matrices. SVD returns
//!   the minimum-norm solution in that case, which keeps predictions finite.
//! - The parameter dimension is tiny (date + a handful of product columns),
//!   so SVD performance is a non-issue.

use nalgebra::{DMatrix, DVector};

/// Solve a least squares problem using SVD.
///
/// Returns `None` if the system is too ill-conditioned to solve robustly.
pub fn solve_least_squares(x: &DMatrix<f64>, y: &DVector<f64>) -> Option<DVector<f64>> {
    let svd = x.clone().svd(true, true);

    // Try progressively looser tolerances if the strict solve fails.
    for &tol in &[1e-10, 1e-8, 1e-6] {
        if let Ok(beta) = svd.solve(y, tol) {
            if beta.iter().all(|v| v.is_finite()) {
                return Some(beta);
            }
        }
    }

    None
}
