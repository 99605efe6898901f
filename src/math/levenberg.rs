//! Levenberg–Marquardt for small nonlinear least-squares problems.
//!
//! We minimize `Σ r_i(x)^2` for a residual function `r: R^p -> R^n`:
//!
//! - the Jacobian is built by forward differences, one column per parameter,
//!   columns evaluated in parallel
//! - each damped Gauss–Newton step solves the augmented system
//!   `[J; sqrt(λ D)] δ = [-r; 0]` with the SVD solver from `ols`
//! - `D` is Marquardt's diagonal scaling (running max of `‖J_j‖²`)
//!
//! A parameter the residuals do not depend on has a zero Jacobian column and
//! is left at its starting value.

use nalgebra::{DMatrix, DVector};
use rayon::prelude::*;

use crate::error::AppError;
use crate::math::solve_least_squares;

/// Stopping criteria.
#[derive(Debug, Clone)]
pub struct LmOptions {
    pub max_iterations: usize,
    /// Relative reduction of the sum of squares below which we stop.
    pub ftol: f64,
    /// Relative step size below which we stop.
    pub xtol: f64,
    /// Max-norm of the gradient below which we stop.
    pub gtol: f64,
    pub initial_lambda: f64,
}

impl Default for LmOptions {
    fn default() -> Self {
        Self {
            max_iterations: 200,
            ftol: 1.49012e-8,
            xtol: 1.49012e-8,
            gtol: 0.0,
            initial_lambda: 1e-3,
        }
    }
}

/// Outcome of a fit.
#[derive(Debug, Clone)]
pub struct LmReport {
    pub params: Vec<f64>,
    /// Final sum of squared residuals.
    pub cost: f64,
    pub iterations: usize,
    pub evaluations: usize,
    pub converged: bool,
    pub message: String,
}

/// Sum of squares of a residual vector.
pub fn sum_of_squares(r: &[f64]) -> f64 {
    r.iter().map(|v| v * v).sum()
}

/// Minimize `Σ residuals(x)^2` starting at `x0`.
pub fn levenberg_marquardt<F>(residuals: F, x0: &[f64], opts: &LmOptions) -> Result<LmReport, AppError>
where
    F: Fn(&[f64]) -> Vec<f64> + Sync,
{
    if x0.is_empty() {
        return Err(AppError::output("Least squares needs at least one parameter."));
    }

    let p = x0.len();
    let mut x = x0.to_vec();
    let mut r = residuals(&x);
    let mut evaluations = 1usize;
    let n = r.len();

    if n == 0 {
        return Err(AppError::output("Least squares needs at least one residual."));
    }
    if r.iter().any(|v| !v.is_finite()) {
        return Err(AppError::output("Residuals are not finite at the starting point."));
    }

    let mut cost = sum_of_squares(&r);
    let mut lambda = opts.initial_lambda;
    let mut scale = vec![0.0_f64; p];

    for iteration in 1..=opts.max_iterations {
        let jac = forward_jacobian(&residuals, &x, &r);
        evaluations += p;

        let gradient = jac.transpose() * DVector::from_column_slice(&r);
        let g_max = gradient.iter().fold(0.0_f64, |m, v| m.max(v.abs()));
        if g_max <= opts.gtol {
            return Ok(report(x, cost, iteration, evaluations, true, "gradient below tolerance"));
        }

        for (j, d) in scale.iter_mut().enumerate() {
            *d = d.max(jac.column(j).norm_squared()).max(1e-12);
        }

        loop {
            let mut a = DMatrix::<f64>::zeros(n + p, p);
            a.view_mut((0, 0), (n, p)).copy_from(&jac);
            for j in 0..p {
                a[(n + j, j)] = (lambda * scale[j]).sqrt();
            }
            let mut b = DVector::<f64>::zeros(n + p);
            for i in 0..n {
                b[i] = -r[i];
            }

            let Some(step) = solve_least_squares(&a, &b) else {
                lambda *= 10.0;
                if lambda > 1e16 {
                    return Ok(report(x, cost, iteration, evaluations, false, "damped system is singular"));
                }
                continue;
            };

            let trial: Vec<f64> = x.iter().zip(step.iter()).map(|(xi, di)| xi + di).collect();
            let r_trial = residuals(&trial);
            evaluations += 1;
            let cost_trial = if r_trial.iter().all(|v| v.is_finite()) {
                sum_of_squares(&r_trial)
            } else {
                f64::INFINITY
            };

            if cost_trial < cost {
                let reduction = (cost - cost_trial) / cost.max(f64::MIN_POSITIVE);
                let x_norm = x.iter().map(|v| v * v).sum::<f64>().sqrt();
                let small_step = step.norm() <= opts.xtol * (x_norm + opts.xtol);

                x = trial;
                r = r_trial;
                cost = cost_trial;
                lambda = (lambda / 10.0).max(1e-12);

                tracing::trace!(iteration, cost, lambda, "accepted step");

                if reduction <= opts.ftol {
                    return Ok(report(x, cost, iteration, evaluations, true, "relative reduction below ftol"));
                }
                if small_step {
                    return Ok(report(x, cost, iteration, evaluations, true, "step size below xtol"));
                }
                break;
            }

            lambda *= 10.0;
            if lambda > 1e16 {
                return Ok(report(x, cost, iteration, evaluations, true, "no further reduction possible"));
            }
        }
    }

    Ok(report(
        x,
        cost,
        opts.max_iterations,
        evaluations,
        false,
        "iteration limit reached",
    ))
}

fn forward_jacobian<F>(residuals: &F, x: &[f64], r0: &[f64]) -> DMatrix<f64>
where
    F: Fn(&[f64]) -> Vec<f64> + Sync,
{
    let n = r0.len();
    let columns: Vec<Vec<f64>> = (0..x.len())
        .into_par_iter()
        .map(|j| {
            let h = f64::EPSILON.sqrt() * x[j].abs().max(1.0);
            let mut shifted = x.to_vec();
            shifted[j] += h;
            let r = residuals(&shifted);
            (0..n)
                .map(|i| {
                    let d = (r.get(i).copied().unwrap_or(f64::NAN) - r0[i]) / h;
                    if d.is_finite() { d } else { 0.0 }
                })
                .collect()
        })
        .collect();

    DMatrix::from_fn(n, x.len(), |i, j| columns[j][i])
}

fn report(
    params: Vec<f64>,
    cost: f64,
    iterations: usize,
    evaluations: usize,
    converged: bool,
    message: &str,
) -> LmReport {
    LmReport {
        params,
        cost,
        iterations,
        evaluations,
        converged,
        message: message.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recovers_exponential_decay() {
        let t: Vec<f64> = (0..30).map(|i| i as f64 * 0.1).collect();
        let y: Vec<f64> = t.iter().map(|t| 2.5 * (-1.3 * t).exp()).collect();
        let f = |x: &[f64]| -> Vec<f64> {
            t.iter()
                .zip(&y)
                .map(|(t, y)| x[0] * (-x[1] * t).exp() - y)
                .collect()
        };

        let out = levenberg_marquardt(f, &[1.0, 0.5], &LmOptions::default()).unwrap();
        assert!(out.converged, "{}", out.message);
        assert!((out.params[0] - 2.5).abs() < 1e-6, "{:?}", out.params);
        assert!((out.params[1] - 1.3).abs() < 1e-6, "{:?}", out.params);
        assert!(out.cost < 1e-12);
    }

    #[test]
    fn unused_parameter_keeps_its_start_value() {
        let x_data = [0.0, 1.0, 2.0, 3.0];
        let f = |p: &[f64]| -> Vec<f64> {
            x_data
                .iter()
                .map(|x| p[0] + p[1] * x - (1.0 + 2.0 * x))
                .collect()
        };
        let out = levenberg_marquardt(f, &[0.0, 0.0, 3.0], &LmOptions::default()).unwrap();
        assert!((out.params[0] - 1.0).abs() < 1e-8);
        assert!((out.params[1] - 2.0).abs() < 1e-8);
        assert!((out.params[2] - 3.0).abs() < 1e-9, "{:?}", out.params);
    }

    #[test]
    fn rejects_non_finite_start() {
        let f = |_: &[f64]| vec![f64::NAN];
        assert!(levenberg_marquardt(f, &[1.0], &LmOptions::default()).is_err());
    }
}
