//! Monte Carlo g(r) tables, one per filling fraction.

use std::path::PathBuf;

use crate::error::AppError;
use crate::io::table::load_table;

/// Filling fractions with Monte Carlo data, densest first.
pub const FILLING_FRACTIONS: [f64; 9] = [0.45, 0.4, 0.35, 0.3, 0.25, 0.2, 0.15, 0.1, 0.05];

/// Carnahan–Starling contact value `(1 - η/2)/(1 - η)³`.
pub fn contact_value(eta: f64) -> f64 {
    (1.0 - eta / 2.0) / (1.0 - eta).powi(3)
}

#[derive(Debug, Clone, PartialEq)]
pub struct McData {
    /// Position in the filling-fraction list this set was loaded for.
    pub index: usize,
    pub eta: f64,
    pub g_sigma: f64,
    pub r: Vec<f64>,
    pub g: Vec<f64>,
}

/// `BASE-η.dat` with η printed as `%4.2f`.
pub fn data_path(base: &str, eta: f64) -> PathBuf {
    PathBuf::from(format!("{base}-{eta:4.2}.dat"))
}

/// Load every available filling fraction.
///
/// Column 0 is r, column 1 the number density n; `g = n/η`. Missing files are
/// skipped with a warning, but at least one must load and all must share the
/// same radial grid length.
pub fn load_mc_data(base: &str, etas: &[f64]) -> Result<Vec<McData>, AppError> {
    let mut out: Vec<McData> = Vec::new();
    for (index, &eta) in etas.iter().enumerate() {
        let path = data_path(base, eta);
        if !path.is_file() {
            tracing::warn!(path = %path.display(), "file does not exist; skipping");
            continue;
        }
        let table = load_table(&path)?;
        let r = table.column(0)?;
        let n = table.column(1)?;
        tracing::info!(path = %path.display(), eta, "using Monte Carlo data");

        if let Some(first) = out.first()
            && first.r.len() != r.len()
        {
            return Err(AppError::data(format!(
                "'{}' has {} radial points but '{}' has {}",
                path.display(),
                r.len(),
                data_path(base, first.eta).display(),
                first.r.len()
            )));
        }

        out.push(McData {
            index,
            eta,
            g_sigma: contact_value(eta),
            g: n.iter().map(|v| v / eta).collect(),
            r,
        });
    }

    if out.is_empty() {
        return Err(AppError::input(format!(
            "No Monte Carlo g(r) files found for base '{base}'"
        )));
    }
    Ok(out)
}
