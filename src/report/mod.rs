//! Terminal reports.
//!
//! Formatting lives here so the numerical modules stay free of presentation
//! and the output can be asserted on directly.

use crate::ghs::{GhsFit, IntegralComparison};
use crate::report::printf::g;
use crate::sweep::SweepResult;

pub mod printf;

fn list(values: &[f64]) -> String {
    let items: Vec<String> = values.iter().map(|v| g(*v)).collect();
    format!("[{}]", items.join(", "))
}

/// Filling fractions, success ratios and free energies of one sweep.
pub fn format_sweep_summary(result: &SweepResult) -> String {
    let mut out = String::new();
    out.push_str(&format!("=== free energy sweep (N = {}) ===\n", result.spheres));
    out.push_str(&format!("filling fractions: {}\n", list(&result.filling_fractions())));
    out.push_str(&format!("success ratios:    {}\n", list(&result.ratios())));
    out.push_str(&format!("F/NkT:             {}\n", list(&result.free_energy)));
    out
}

/// χ², fitted parameters against the starting guess, and the worst point.
pub fn format_fit_summary(fit: &GhsFit, initial: &[f64], digits: usize) -> String {
    let mut out = String::new();
    out.push_str("=== short-range g(r) fit ===\n");
    out.push_str(&format!("chi^2 initial: {}\n", g(fit.chi2_initial)));
    out.push_str(&format!("chi^2 fitted:  {}\n", g(fit.chi2)));
    out.push_str(&format!(
        "iterations: {} ({})\n",
        fit.iterations, fit.message
    ));
    for (i, (v, x)) in fit.params.iter().zip(initial).enumerate() {
        out.push_str(&format!("vals[{i}]: {v:.digits$}\t x[{i}]: {}\n", g(*x)));
    }
    out.push_str(&format!(
        "max |error| {} at eta = {}, r = {}\n",
        g(fit.max_error),
        g(fit.eta_max_error),
        g(fit.r_max_error)
    ));
    out
}

/// `Int_mc`, `Int_ours` and their difference for each filling fraction.
pub fn format_integrals(integrals: &[IntegralComparison]) -> String {
    integrals
        .iter()
        .map(|c| {
            format!(
                "eta = {:.2}  Int_mc: {:6.3}, Int_ours: {:6.3}, Diff: {:6.3}\n",
                c.eta,
                c.mc,
                c.fit,
                c.difference()
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sweep::StepRecord;

    #[test]
    fn sweep_summary_lists_values() {
        let result = SweepResult {
            spheres: 10,
            records: vec![StepRecord {
                ff: 0.0,
                ff_small: 0.05,
                total_checks: 10.0,
                valid_checks: 9.0,
                ratio: 0.9,
            }],
            free_energy: vec![0.0105361],
        };
        let text = format_sweep_summary(&result);
        assert!(text.contains("filling fractions: [0.05]\n"));
        assert!(text.contains("success ratios:    [0.9]\n"));
        assert!(text.contains("F/NkT:             [0.0105361]\n"));
    }

    #[test]
    fn integral_lines_are_fixed_width() {
        let text = format_integrals(&[IntegralComparison {
            eta: 0.4,
            mc: 1.0,
            fit: 1.25,
        }]);
        assert_eq!(text, "eta = 0.40  Int_mc:  1.000, Int_ours:  1.250, Diff:  0.250\n");
    }

    #[test]
    fn fit_summary_shows_rounded_values() {
        let fit = GhsFit {
            params: vec![0.68, 3.0],
            unrounded: vec![0.6801, 3.0],
            chi2_initial: 2.5,
            chi2: 0.25,
            max_error: 0.1,
            eta_max_error: 0.45,
            r_max_error: 2.05,
            r_cut: 6.0,
            iterations: 4,
            converged: true,
            message: "relative reduction below ftol".to_string(),
        };
        let text = format_fit_summary(&fit, &[0.7, 3.0], 3);
        assert!(text.contains("vals[0]: 0.680\t x[0]: 0.7\n"));
        assert!(text.contains("chi^2 fitted:  0.25\n"));
        assert!(text.contains("at eta = 0.45, r = 2.05"));
    }
}
