//! Linear least squares via SVD.
//!
//! Used for every damped step of the Levenberg–Marquardt iteration, where the
//! system is the Jacobian stacked on top of a diagonal damping block, so it is
//! always tall (more rows than columns).
//!
//! Nalgebra's `QR::solve` is intended for square systems; SVD handles tall and
//! rank-deficient matrices and returns the minimum-norm solution when some
//! singular values vanish (e.g. a parameter the model does not depend on).

use nalgebra::{DMatrix, DVector};

/// Solve `min ‖x β - y‖²` using SVD.
///
/// Returns `None` if no tolerance yields a finite solution.
pub fn solve_least_squares(x: &DMatrix<f64>, y: &DVector<f64>) -> Option<DVector<f64>> {
    let svd = x.clone().svd(true, true);

    // Try progressively looser tolerances if strict solve fails.
    for &tol in &[1e-10, 1e-8, 1e-6] {
        if let Ok(beta) = svd.solve(y, tol) {
            if beta.iter().all(|v| v.is_finite()) {
                return Some(beta);
            }
        }
    }

    None
}
