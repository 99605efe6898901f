//! Parameter-sweep launcher for `soft-monte-carlo`.
//!
//! Every (density, temperature) pair becomes one backgrounded `srun` call.
//! Nothing is awaited: the scheduler owns the jobs once submitted.

use std::path::{Path, PathBuf};

use crate::error::AppError;
use crate::settings::Settings;

pub mod job;
pub mod runner;

pub use job::{SoftJob, SrunJob};
pub use runner::{DryRun, JobRunner, ShellRunner};

/// Output and binary directories for a launch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dirs {
    pub figs_dir: PathBuf,
    pub bin_dir: PathBuf,
}

impl Dirs {
    /// Pick directories relative to `cwd`.
    ///
    /// Inside a paper's `figs` parent, outputs go to `figs/` and the binaries
    /// live two levels up; from the repository root they go to
    /// `papers/fuzzy-fmt/figs/` with binaries in `.`. Explicit values (CLI,
    /// then environment) replace either half.
    pub fn resolve(
        cwd: &Path,
        figs_dir: Option<PathBuf>,
        bin_dir: Option<PathBuf>,
        settings: &Settings,
    ) -> Self {
        let (default_figs, default_bin) = if cwd.join("figs").is_dir() {
            (PathBuf::from("figs"), PathBuf::from("../.."))
        } else {
            (PathBuf::from("papers/fuzzy-fmt/figs"), PathBuf::from("."))
        };
        Self {
            figs_dir: figs_dir
                .or_else(|| settings.figs_dir.clone())
                .unwrap_or(default_figs),
            bin_dir: bin_dir
                .or_else(|| settings.bin_dir.clone())
                .unwrap_or(default_bin),
        }
    }
}

/// Sphere count for a periodic 30³ cell at reduced density `n_reduced`.
pub fn sphere_count_bulk(n_reduced: f64) -> u32 {
    (n_reduced * 2f64.powf(-2.5) * 30f64.powi(3)).round() as u32
}

/// Sphere count for a 30×30×32 wall cell, unless `spheres` is given.
pub fn sphere_count_walls(n_reduced: f64, spheres: u32) -> u32 {
    if spheres == 0 {
        (n_reduced * 2f64.powf(-2.5) * 30f64.powi(2) * 32.0).round() as u32
    } else {
        spheres
    }
}

/// Submit `make(density, temperature)` for every pair, density outermost.
///
/// Returns the number of submitted jobs.
pub fn submit_grid<R, F>(
    runner: &mut R,
    dirs: &Dirs,
    mem_mb: u32,
    densities: &[f64],
    temperatures: &[f64],
    make: F,
) -> Result<usize, AppError>
where
    R: JobRunner + ?Sized,
    F: Fn(f64, f64) -> SoftJob,
{
    if densities.is_empty() || temperatures.is_empty() {
        return Err(AppError::input(
            "At least one reduced density and one temperature are required.",
        ));
    }
    let mut submitted = 0;
    for &n in densities {
        for &t in temperatures {
            let srun = make(n, t).to_srun(dirs, mem_mb);
            tracing::debug!(job = %srun.name, stem = %srun.stem, "built job");
            runner.submit(&srun.to_string())?;
            submitted += 1;
        }
    }
    tracing::info!(submitted, "launch complete");
    Ok(submitted)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sphere_counts() {
        assert_eq!(sphere_count_bulk(0.42), 2005);
        assert_eq!(sphere_count_walls(0.5, 0), 2546);
        assert_eq!(sphere_count_walls(0.5, 17), 17);
    }

    #[test]
    fn directory_rule_follows_figs_presence() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::default();
        let dirs = Dirs::resolve(dir.path(), None, None, &settings);
        assert_eq!(dirs.figs_dir, PathBuf::from("papers/fuzzy-fmt/figs"));
        assert_eq!(dirs.bin_dir, PathBuf::from("."));

        std::fs::create_dir(dir.path().join("figs")).unwrap();
        let dirs = Dirs::resolve(dir.path(), None, None, &settings);
        assert_eq!(dirs.figs_dir, PathBuf::from("figs"));
        assert_eq!(dirs.bin_dir, PathBuf::from("../.."));
    }

    #[test]
    fn cli_beats_environment_beats_rule() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings {
            figs_dir: Some(PathBuf::from("env-figs")),
            bin_dir: Some(PathBuf::from("/env/bin")),
            ..Settings::default()
        };
        let dirs = Dirs::resolve(dir.path(), Some(PathBuf::from("cli-figs")), None, &settings);
        assert_eq!(dirs.figs_dir, PathBuf::from("cli-figs"));
        assert_eq!(dirs.bin_dir, PathBuf::from("/env/bin"));
    }

    #[test]
    fn grid_is_density_major() {
        let dirs = Dirs {
            figs_dir: PathBuf::from("figs"),
            bin_dir: PathBuf::from("."),
        };
        let mut runner = DryRun {
            quiet: true,
            ..DryRun::default()
        };
        let count = submit_grid(&mut runner, &dirs, 60, &[0.2, 0.5], &[0.2, 1.0], |n, t| {
            SoftJob::Walls {
                reduced_density: n,
                spheres: 0,
                temperature: t,
            }
        })
        .unwrap();
        assert_eq!(count, 4);
        let names: Vec<&str> = runner
            .commands
            .iter()
            .map(|c| c.split_whitespace().nth(3).unwrap())
            .collect();
        assert_eq!(
            names,
            vec![
                "softwalls-0.2000-0.2000",
                "softwalls-0.2000-1.0000",
                "softwalls-0.5000-0.2000",
                "softwalls-0.5000-1.0000",
            ]
        );
    }

    #[test]
    fn empty_grid_is_rejected() {
        let dirs = Dirs {
            figs_dir: PathBuf::from("figs"),
            bin_dir: PathBuf::from("."),
        };
        let mut runner = DryRun::default();
        let err = submit_grid(&mut runner, &dirs, 60, &[], &[1.0], |n, t| SoftJob::Homogeneous {
            reduced_density: n,
            temperature: t,
            potential: String::new(),
        })
        .unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}
