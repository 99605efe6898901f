//! Least-squares fit of the ansatz to the Monte Carlo tables.

use serde::Serialize;

use crate::error::AppError;
use crate::math::levenberg::{LmOptions, levenberg_marquardt, sum_of_squares};
use crate::symbolic::Compiled;

use super::ansatz::{N_PARAMS, eval_model};
use super::data::McData;

/// Starting point: 16 kappas then alpha.
pub const INITIAL_GUESS: [f64; N_PARAMS] = [
    0.68, 0.16, 0.79, 1e-3, 2e-4, 3e-3, 1e-3, 2e-4, 3e-3, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 3.0,
];

#[derive(Debug, Clone)]
pub struct FitOptions {
    /// Only radii strictly below this enter the residuals.
    pub r_cut: f64,
    /// Decimals kept in the reported parameters.
    pub digits: u32,
    pub lm: LmOptions,
}

impl Default for FitOptions {
    fn default() -> Self {
        Self {
            r_cut: 6.0,
            digits: 3,
            lm: LmOptions::default(),
        }
    }
}

/// Fitted parameters and goodness-of-fit summary.
#[derive(Debug, Clone, Serialize)]
pub struct GhsFit {
    /// Rounded to `digits` decimals; every statistic below uses these.
    pub params: Vec<f64>,
    pub unrounded: Vec<f64>,
    pub chi2_initial: f64,
    pub chi2: f64,
    pub max_error: f64,
    pub eta_max_error: f64,
    pub r_max_error: f64,
    pub r_cut: f64,
    pub iterations: usize,
    pub converged: bool,
    pub message: String,
}

impl GhsFit {
    /// `kappa_ij` with 1-based `i`, `j`.
    pub fn kappa(&self, i: usize, j: usize) -> f64 {
        self.params[(i - 1) * 4 + (j - 1)]
    }

    pub fn alpha(&self) -> f64 {
        self.params[N_PARAMS - 1]
    }
}

/// `model - mc` for every data set (outer) and every `r < r_cut` (inner).
pub fn residuals(model: &Compiled, data: &[McData], r_cut: f64, params: &[f64]) -> Vec<f64> {
    data.iter()
        .flat_map(|set| {
            set.r
                .iter()
                .zip(&set.g)
                .filter(move |(r, _)| **r < r_cut)
                .map(move |(&r, &g)| eval_model(model, params, set.g_sigma, r) - g)
        })
        .collect()
}

/// Model values on a data set's full radial grid.
pub fn model_curve(model: &Compiled, params: &[f64], g_sigma: f64, r: &[f64]) -> Vec<f64> {
    r.iter().map(|&r| eval_model(model, params, g_sigma, r)).collect()
}

pub fn round_to(v: f64, digits: u32) -> f64 {
    let scale = 10f64.powi(digits as i32);
    (v * scale).round() / scale
}

pub fn fit_ghs(model: &Compiled, data: &[McData], opts: &FitOptions) -> Result<GhsFit, AppError> {
    let objective = |x: &[f64]| residuals(model, data, opts.r_cut, x);

    let initial = objective(&INITIAL_GUESS);
    if initial.is_empty() {
        return Err(AppError::data(format!(
            "No Monte Carlo points below the fit cutoff r < {}",
            opts.r_cut
        )));
    }
    let chi2_initial = sum_of_squares(&initial);
    tracing::info!(chi2 = chi2_initial, points = initial.len(), "beginning least squares fit");

    let report = levenberg_marquardt(objective, &INITIAL_GUESS, &opts.lm)?;
    tracing::info!(
        iterations = report.iterations,
        evaluations = report.evaluations,
        converged = report.converged,
        message = %report.message,
        "least squares fit finished"
    );

    let params: Vec<f64> = report.params.iter().map(|&v| round_to(v, opts.digits)).collect();
    let diff = residuals(model, data, opts.r_cut, &params);
    let chi2 = sum_of_squares(&diff);

    // Last occurrence of the largest deviation, walking η then r.
    let mut max_error = 0.0;
    let mut eta_max_error = 0.0;
    let mut r_max_error = 0.0;
    let r_cut = opts.r_cut;
    let located = data.iter().flat_map(move |set| {
        set.r
            .iter()
            .filter(move |r| **r < r_cut)
            .map(move |&r| (set.eta, r))
    });
    for (d, (eta, r)) in diff.iter().zip(located) {
        if d.abs() >= max_error {
            max_error = d.abs();
            eta_max_error = eta;
            r_max_error = r;
        }
    }

    Ok(GhsFit {
        params,
        unrounded: report.params,
        chi2_initial,
        chi2,
        max_error,
        eta_max_error,
        r_max_error,
        r_cut: opts.r_cut,
        iterations: report.iterations,
        converged: report.converged,
        message: report.message,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ghs::ansatz::{Ansatz, compile_model, unwrap, unwrapped_ghs};
    use crate::ghs::data::contact_value;

    fn model() -> Compiled {
        let defs = Ansatz::default().definitions();
        compile_model(&unwrapped_ghs(&unwrap(&defs)).unwrap()).unwrap()
    }

    fn synthetic(model: &Compiled, truth: &[f64]) -> Vec<McData> {
        let r: Vec<f64> = (0..60).map(|i| 2.0 + 0.05 * f64::from(i)).collect();
        [0.4, 0.3, 0.2, 0.1]
            .iter()
            .enumerate()
            .map(|(index, &eta)| {
                let g_sigma = contact_value(eta);
                McData {
                    index,
                    eta,
                    g_sigma,
                    g: model_curve(model, truth, g_sigma, &r),
                    r: r.clone(),
                }
            })
            .collect()
    }

    #[test]
    fn residuals_respect_cutoff() {
        let model = model();
        let data = synthetic(&model, &INITIAL_GUESS);
        let res = residuals(&model, &data, 2.5, &INITIAL_GUESS);
        assert_eq!(res.len(), 4 * 10);
        assert!(res.iter().all(|v| v.abs() < 1e-12));
    }

    #[test]
    fn recovers_exact_parameters() {
        let model = model();
        let mut truth = [0.0; N_PARAMS];
        truth[0] = 0.5;
        truth[1] = -0.4;
        truth[4] = 0.1;
        truth[16] = 3.0;
        let data = synthetic(&model, &truth);

        let fit = fit_ghs(&model, &data, &FitOptions::default()).unwrap();
        assert!(fit.chi2 < fit.chi2_initial);
        assert!((fit.kappa(1, 1) - 0.5).abs() < 2e-3, "{:?}", fit.params);
        assert!((fit.kappa(1, 2) + 0.4).abs() < 2e-3, "{:?}", fit.params);
        // alpha never enters the model, so it stays at its starting value.
        assert_eq!(fit.alpha(), 3.0);
        assert!(fit.max_error < 1e-2);
    }

    #[test]
    fn max_error_location_is_reported() {
        let model = model();
        let mut data = synthetic(&model, &INITIAL_GUESS);
        data[2].g[7] += 0.5;
        let opts = FitOptions {
            lm: LmOptions {
                max_iterations: 1,
                ..LmOptions::default()
            },
            ..FitOptions::default()
        };
        let fit = fit_ghs(&model, &data, &opts).unwrap();
        assert_eq!(fit.eta_max_error, 0.2);
        assert!((fit.r_max_error - 2.35).abs() < 1e-12);
    }

    #[test]
    fn empty_fit_window_is_a_data_error() {
        let model = model();
        let data = synthetic(&model, &INITIAL_GUESS);
        let opts = FitOptions {
            r_cut: 1.0,
            ..FitOptions::default()
        };
        assert_eq!(fit_ghs(&model, &data, &opts).unwrap_err().exit_code(), 3);
    }

    #[test]
    fn rounding() {
        assert_eq!(round_to(0.12345, 3), 0.123);
        assert_eq!(round_to(-2.0006, 3), -2.001);
    }
}
