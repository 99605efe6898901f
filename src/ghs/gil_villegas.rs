//! Gil-Villegas et al. square-well reference g(r), used for comparison plots.

use std::f64::consts::PI;

const MATRIX: [[f64; 3]; 3] = [
    [2.25855, -1.50349, 0.249434],
    [-0.669270, 1.40049, -0.827739],
    [10.1576, -15.0427, 5.30827],
];

/// `[η, η², η³] · M · v`.
fn contract(eta: f64, v: [f64; 3]) -> f64 {
    let powers = [eta, eta * eta, eta * eta * eta];
    powers
        .iter()
        .zip(MATRIX.iter())
        .map(|(p, row)| p * row.iter().zip(v).map(|(m, x)| m * x).sum::<f64>())
        .sum()
}

/// Effective packing fraction at reduced distance `x = r/σ`.
pub fn eta_effective(eta: f64, x: f64) -> f64 {
    contract(eta, [1.0, x, x * x])
}

/// `d η_eff / d x`.
pub fn eta_effective_prime(eta: f64, x: f64) -> f64 {
    contract(eta, [0.0, 1.0, 2.0 * x])
}

/// Reference g at distance `r` for filling fraction `eta` and diameter `sigma`.
pub fn g_gil_villegas(eta: f64, r: f64, sigma: f64) -> f64 {
    let x = r / sigma;
    let eta_eff = eta_effective(eta, x);
    let eta_eff_prime = eta_effective_prime(eta, x);
    let g_sigma = (1.0 - eta_eff / 2.0) / (1.0 - eta_eff).powi(3);
    let g_sigma_prime = eta_eff_prime * (5.0 - 2.0 * eta_eff) / (2.0 * (1.0 - eta_eff).powi(4));

    let rho = eta / (PI / 6.0 * sigma.powi(3));
    2.0 * eta / PI / rho / sigma.powi(3) * (3.0 * g_sigma + (x.powi(3) - 1.0) / (x * x) * g_sigma_prime)
}
