//! Machine-readable exports of sweep records and fit parameters.
//!
//! Sweeps go to CSV (one row per step), fits to pretty-printed JSON. Both
//! carry enough context to be consumed without the figures.

use std::fs::File;
use std::path::Path;

use chrono::{DateTime, Local};
use serde::Serialize;

use crate::error::AppError;
use crate::ghs::GhsFit;
use crate::ghs::ansatz::{ALPHA, KAPPAS};
use crate::sweep::SweepResult;

#[derive(Debug, Serialize)]
struct SweepRow {
    spheres: u32,
    step: usize,
    ff: f64,
    ff_small: f64,
    total_checks: f64,
    valid_checks: f64,
    ratio: f64,
    free_energy: f64,
}

/// Write every step of every sweep as CSV.
pub fn write_sweep_csv(path: &Path, results: &[SweepResult]) -> Result<(), AppError> {
    let mut writer = csv::Writer::from_path(path)
        .map_err(|e| AppError::output(format!("Failed to create export CSV '{}': {e}", path.display())))?;

    for result in results {
        for (step, (rec, f)) in result.records.iter().zip(&result.free_energy).enumerate() {
            writer
                .serialize(SweepRow {
                    spheres: result.spheres,
                    step,
                    ff: rec.ff,
                    ff_small: rec.ff_small,
                    total_checks: rec.total_checks,
                    valid_checks: rec.valid_checks,
                    ratio: rec.ratio,
                    free_energy: *f,
                })
                .map_err(|e| AppError::output(format!("Failed to write export CSV row: {e}")))?;
        }
    }
    writer
        .flush()
        .map_err(|e| AppError::output(format!("Failed to flush export CSV: {e}")))?;
    tracing::info!(path = %path.display(), "wrote sweep CSV");
    Ok(())
}

#[derive(Debug, Serialize)]
struct FitFile<'a> {
    tool: &'static str,
    generated_at: DateTime<Local>,
    names: Vec<&'static str>,
    #[serde(flatten)]
    fit: &'a GhsFit,
}

/// Write the fitted parameters (with names) and fit statistics as JSON.
pub fn write_fit_json(path: &Path, fit: &GhsFit, generated_at: DateTime<Local>) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::output(format!("Failed to create fit JSON '{}': {e}", path.display())))?;

    let mut names: Vec<&'static str> = KAPPAS.to_vec();
    names.push(ALPHA);
    let payload = FitFile {
        tool: "smc fit-ghs",
        generated_at,
        names,
        fit,
    };
    serde_json::to_writer_pretty(file, &payload)
        .map_err(|e| AppError::output(format!("Failed to write fit JSON: {e}")))?;
    tracing::info!(path = %path.display(), "wrote fit JSON");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sweep::StepRecord;

    #[test]
    fn sweep_csv_has_header_and_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sweep.csv");
        let result = SweepResult {
            spheres: 10,
            records: vec![StepRecord {
                ff: 0.0,
                ff_small: 0.05,
                total_checks: 1000.0,
                valid_checks: 500.0,
                ratio: 0.5,
            }],
            free_energy: vec![0.0693],
        };
        write_sweep_csv(&path, &[result]).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("spheres,step,ff,ff_small,total_checks,valid_checks,ratio,free_energy")
        );
        assert_eq!(lines.next(), Some("10,0,0.0,0.05,1000.0,500.0,0.5,0.0693"));
    }

    #[test]
    fn fit_json_names_parameters() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fit.json");
        let fit = GhsFit {
            params: vec![0.5; 17],
            unrounded: vec![0.5; 17],
            chi2_initial: 2.0,
            chi2: 1.0,
            max_error: 0.1,
            eta_max_error: 0.45,
            r_max_error: 2.0,
            r_cut: 6.0,
            iterations: 3,
            converged: true,
            message: "ok".to_string(),
        };
        write_fit_json(&path, &fit, Local::now()).unwrap();

        let value: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["names"][0], "kappa_11");
        assert_eq!(value["names"][16], "alpha");
        assert_eq!(value["params"].as_array().map(Vec::len), Some(17));
        assert_eq!(value["chi2"], 1.0);
        assert_eq!(value["tool"], "smc fit-ghs");
    }
}
