//! Short-range hard-sphere g(r) fit.
//!
//! The ansatz is built symbolically, unwrapped into a single expression,
//! fitted to the Monte Carlo tables and written out as LaTeX, a C header and
//! two comparison figures.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::error::AppError;
use crate::plot::{Figure, write_svg};

pub mod ansatz;
pub mod codegen;
pub mod data;
pub mod figures;
pub mod fit;
pub mod gil_villegas;
pub mod integral;
pub mod smoothing;

pub use ansatz::{Ansatz, Definition};
pub use data::{FILLING_FRACTIONS, McData};
pub use fit::{FitOptions, GhsFit};
pub use integral::IntegralComparison;

#[derive(Debug, Clone)]
pub struct GhsOptions {
    /// Data files are `BASE-η.dat`.
    pub data_base: String,
    pub out_dir: PathBuf,
    pub prefix: String,
    pub ansatz: Ansatz,
    pub fit: FitOptions,
    pub skip_every_other: bool,
    pub pdflatex: bool,
    /// Timestamp written into generated-file headers.
    pub stamp: String,
}

impl Default for GhsOptions {
    fn default() -> Self {
        Self {
            data_base: "figs/gr".to_string(),
            out_dir: PathBuf::from("figs"),
            prefix: "short-range".to_string(),
            ansatz: Ansatz::default(),
            fit: FitOptions::default(),
            skip_every_other: true,
            pdflatex: false,
            stamp: String::new(),
        }
    }
}

impl GhsOptions {
    pub fn output(&self, suffix: &str) -> PathBuf {
        self.out_dir.join(format!("{}-{suffix}", self.prefix))
    }
}

/// Everything a `fit-ghs` run produced.
#[derive(Debug, Clone)]
pub struct GhsRun {
    pub fit: GhsFit,
    pub integrals: Vec<IntegralComparison>,
    pub figures: Vec<(PathBuf, Figure)>,
    pub written: Vec<PathBuf>,
}

pub fn run(opts: &GhsOptions) -> Result<GhsRun, AppError> {
    let definitions = opts.ansatz.definitions();
    let unwrapped = ansatz::unwrap(&definitions);
    let ghs = ansatz::unwrapped_ghs(&unwrapped)?;
    tracing::debug!(symbols = ?ghs.free_symbols(), "unwrapped g_HS");
    let model = ansatz::compile_model(&ghs)?;

    let mc = data::load_mc_data(&opts.data_base, &FILLING_FRACTIONS)?;
    let fit = fit::fit_ghs(&model, &mc, &opts.fit)?;

    let fitted: Vec<Vec<f64>> = mc
        .iter()
        .map(|set| fit::model_curve(&model, &fit.params, set.g_sigma, &set.r))
        .collect();

    let sigma = opts.ansatz.sigma;
    let integrals = mc
        .iter()
        .zip(&fitted)
        .filter_map(|(set, g_fit)| {
            Some(IntegralComparison {
                eta: set.eta,
                mc: integral::excess_integral(&set.r, &set.g, sigma)?,
                fit: integral::excess_integral(&set.r, g_fit, sigma)?,
            })
        })
        .collect();

    fs::create_dir_all(&opts.out_dir)
        .map_err(|e| AppError::output(format!("Failed to create '{}': {e}", opts.out_dir.display())))?;

    let mut written = Vec::new();
    let tex = opts.output("ghs-analytics.tex");
    write_text(&tex, &codegen::analytics_tex(&definitions, &unwrapped, &fit, opts.fit.digits, &opts.stamp))?;
    written.push(tex.clone());

    let header = opts.output("ghs-analytics.h");
    write_text(&header, &codegen::analytics_header(&ghs, sigma, &fit, opts.fit.digits, &opts.stamp))?;
    written.push(header);

    let params = opts.output("fit-parameters.tex");
    write_text(&params, &codegen::fit_parameters_tex(&fit))?;
    written.push(params);

    let layout = figures::PanelLayout::new(&figures::PANEL_RANGES, FILLING_FRACTIONS.len(), opts.skip_every_other);
    let panels = layout.as_ref().map(|l| l.indexes.clone()).unwrap_or_default();

    let mut figs = vec![(
        opts.output("ghs.svg"),
        figures::overview_figure(&mc, &fitted, &panels, sigma),
    )];
    match &layout {
        Some(layout) => figs.push((
            opts.output("ghs-alt.svg"),
            figures::stacked_figure(&mc, &fitted, layout, opts.fit.r_cut, sigma),
        )),
        None => tracing::warn!("panel ranges do not match the filling fractions; skipping stacked figure"),
    }
    for (path, fig) in &figs {
        write_svg(fig, path)?;
        written.push(path.clone());
    }

    if opts.pdflatex {
        run_pdflatex(&tex)?;
    }

    Ok(GhsRun {
        fit,
        integrals,
        figures: figs,
        written,
    })
}

fn write_text(path: &Path, contents: &str) -> Result<(), AppError> {
    tracing::info!(path = %path.display(), "writing");
    fs::write(path, contents).map_err(|e| AppError::output(format!("Failed to write '{}': {e}", path.display())))
}

fn run_pdflatex(tex: &Path) -> Result<(), AppError> {
    let dir = tex.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or(Path::new("."));
    let name = tex
        .file_name()
        .ok_or_else(|| AppError::input(format!("'{}' has no file name", tex.display())))?;
    tracing::info!(file = %tex.display(), "running pdflatex");
    let status = Command::new("pdflatex")
        .arg(name)
        .current_dir(dir)
        .status()
        .map_err(|e| AppError::external(format!("Failed to start pdflatex: {e}")))?;
    if !status.success() {
        return Err(AppError::external(format!("pdflatex exited with {status}")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ghs::data::contact_value;

    /// Exact at three decimals, so rounding the fit cannot move it.
    const TRUE_PARAMS: [f64; ansatz::N_PARAMS] = [
        0.6, 0.2, 0.79, 0.001, 0.0, 0.003, 0.001, 0.0, 0.003, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 3.0,
    ];

    #[test]
    fn end_to_end_writes_every_output() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().join("gr").display().to_string();

        let defs = Ansatz::default().definitions();
        let ghs = ansatz::unwrapped_ghs(&ansatz::unwrap(&defs)).unwrap();
        let model = ansatz::compile_model(&ghs).unwrap();
        for &eta in &FILLING_FRACTIONS[..4] {
            let mut rows = String::new();
            for i in 0..30 {
                let r = 2.0 + 0.05 * f64::from(i);
                let g = ansatz::eval_model(&model, &TRUE_PARAMS, contact_value(eta), r);
                rows.push_str(&format!("{r} {}\n", g * eta));
            }
            fs::write(data::data_path(&base, eta), rows).unwrap();
        }

        let opts = GhsOptions {
            data_base: base,
            out_dir: dir.path().join("out"),
            stamp: "test".to_string(),
            ..GhsOptions::default()
        };
        let run = run(&opts).unwrap();

        assert_eq!(run.written.len(), 5);
        for path in &run.written {
            assert!(path.is_file(), "{}", path.display());
        }
        assert!(opts.output("ghs-alt.svg").is_file());
        assert_eq!(run.integrals.len(), 4);
        for (got, want) in run.fit.params.iter().zip(TRUE_PARAMS) {
            assert!((got - want).abs() < 1e-3 + 1e-12, "{:?}", run.fit.params);
        }
        assert!(run.fit.chi2 < 1e-6, "chi2 = {}", run.fit.chi2);
        assert!(run.fit.chi2 < run.fit.chi2_initial);
        assert!(
            run.integrals.iter().all(|c| c.difference().abs() < 0.1),
            "{:?}",
            run.integrals
        );
        let header = fs::read_to_string(opts.output("ghs-analytics.h")).unwrap();
        assert!(header.contains("const double kappa_11 = 0.600;"));
        assert!(header.contains("const double alpha = 3.000;"));
    }
}
