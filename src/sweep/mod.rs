//! Free-energy convergence sweep.
//!
//! Each step inserts a slightly larger "small cell" into the configuration
//! sampled at the previous filling fraction. The fraction of valid insertions
//! is a probability ratio, and the running sum of their logarithms is the
//! excess free energy. Steps are cached on disk: a step whose output file
//! already exists is read back instead of being re-simulated.

use std::path::PathBuf;

use crate::error::AppError;
use crate::io::header::read_meta_header;

pub mod energy;
pub mod schedule;
pub mod simulator;

pub use energy::{carnahan_starling, cumulative_free_energy, free_energy_figure};
pub use schedule::{StepPlan, plan_step};
pub use simulator::{ProcessSimulator, Simulator};

pub const KEY_FF_SMALL: &str = "ff_small";
pub const KEY_TOTAL_CHECKS: &str = "total checks of small cell";
pub const KEY_VALID_CHECKS: &str = "total valid small checks";

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SweepFlavor {
    /// Periodic cell; the first step uses the infinite-case binary.
    Periodic,
    /// Fixed box of edge `box_length` holding spheres of `radius`, submitted
    /// through `srun` and filed by renormalization `level`.
    Absolute {
        well_width: f64,
        box_length: f64,
        level: u32,
        radius: f64,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct SweepConfig {
    pub steps: usize,
    /// Starting filling fraction (periodic flavor only).
    pub initial_ff: f64,
    pub step_size: f64,
    pub halve_every: usize,
    pub spheres: u32,
    pub iterations: u64,
    pub seed: u64,
    pub data_dir: PathBuf,
    pub bin_dir: PathBuf,
    pub flavor: SweepFlavor,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            steps: 20,
            initial_ff: 0.0,
            step_size: 0.05,
            halve_every: 4,
            spheres: 10,
            iterations: 1_000_000,
            seed: 0,
            data_dir: PathBuf::from("data"),
            bin_dir: PathBuf::from("../.."),
            flavor: SweepFlavor::Periodic,
        }
    }
}

/// Outcome of one step, read back from the data file header.
#[derive(Debug, Clone, PartialEq)]
pub struct StepRecord {
    pub ff: f64,
    pub ff_small: f64,
    pub total_checks: f64,
    pub valid_checks: f64,
    pub ratio: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SweepResult {
    pub spheres: u32,
    pub records: Vec<StepRecord>,
    /// `F/NkT` after each step.
    pub free_energy: Vec<f64>,
}

impl SweepResult {
    pub fn filling_fractions(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.ff_small).collect()
    }

    pub fn ratios(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.ratio).collect()
    }
}

/// Run (or read back) every step of the sweep.
pub fn run_sweep<S: Simulator + ?Sized>(config: &SweepConfig, simulator: &mut S) -> Result<SweepResult, AppError> {
    if config.spheres == 0 && config.flavor == SweepFlavor::Periodic {
        return Err(AppError::input("The periodic sweep needs at least one sphere."));
    }

    let data_dir = schedule::data_dir(config);
    std::fs::create_dir_all(&data_dir)
        .map_err(|e| AppError::output(format!("Failed to create '{}': {e}", data_dir.display())))?;

    let mut ff = schedule::initial_ff(config);
    let mut records = Vec::with_capacity(config.steps);

    for i in 0..config.steps {
        let plan = plan_step(config, i, ff);
        let path = plan.output_path();

        if path.is_file() {
            tracing::info!(step = i, path = %path.display(), "cache hit");
        } else {
            tracing::info!(step = i, path = %path.display(), "cache miss");
            simulator.run(&plan.argv)?;
        }

        let record = read_step(&plan)?;
        tracing::debug!(step = i, ff_small = record.ff_small, ratio = record.ratio, "step done");
        ff = record.ff_small;
        records.push(record);
    }

    let ratios: Vec<f64> = records.iter().map(|r| r.ratio).collect();
    Ok(SweepResult {
        spheres: config.spheres,
        free_energy: cumulative_free_energy(&ratios, config.spheres),
        records,
    })
}

fn read_step(plan: &StepPlan) -> Result<StepRecord, AppError> {
    let path = plan.output_path();
    let header = read_meta_header(&path)?;
    let ff_small = header.number(KEY_FF_SMALL, &path)?;
    let total_checks = header.number(KEY_TOTAL_CHECKS, &path)?;
    let valid_checks = header.number(KEY_VALID_CHECKS, &path)?;

    if total_checks <= 0.0 {
        return Err(AppError::data(format!(
            "'{}' reports no small-cell checks",
            path.display()
        )));
    }
    if valid_checks <= 0.0 {
        return Err(AppError::data(format!(
            "'{}' reports no valid small-cell checks; the free energy diverges",
            path.display()
        )));
    }

    Ok(StepRecord {
        ff: plan.ff,
        ff_small,
        total_checks,
        valid_checks,
        ratio: valid_checks / total_checks,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;

    /// Writes the data file the real binary would produce.
    struct FakeSimulator {
        calls: Vec<Vec<String>>,
        total: u64,
        valid: u64,
    }

    impl FakeSimulator {
        fn new(valid: u64) -> Self {
            Self::with_counts(1000, valid)
        }

        fn with_counts(total: u64, valid: u64) -> Self {
            Self {
                calls: Vec::new(),
                total,
                valid,
            }
        }
    }

    fn arg<'a>(argv: &'a [String], flag: &str) -> &'a str {
        let i = argv.iter().position(|a| a == flag).unwrap();
        &argv[i + 1]
    }

    impl Simulator for FakeSimulator {
        fn run(&mut self, argv: &[String]) -> Result<(), AppError> {
            self.calls.push(argv.to_vec());
            let dir = Path::new(arg(argv, "--data_dir"));
            let name = arg(argv, "--filename");
            let ff_small = arg(argv, "--ff_small");
            fs::write(
                dir.join(format!("{name}-g.dat")),
                format!(
                    "# ff_small: {ff_small}\n# total checks of small cell: {}\n# total valid small checks: {}\n0 0\n",
                    self.total, self.valid
                ),
            )
            .unwrap();
            Ok(())
        }
    }

    fn config(dir: &Path, steps: usize) -> SweepConfig {
        SweepConfig {
            steps,
            data_dir: dir.join("data"),
            ..SweepConfig::default()
        }
    }

    #[test]
    fn sweep_runs_each_step_and_chains_ff() {
        let dir = tempfile::tempdir().unwrap();
        let mut sim = FakeSimulator::new(500);
        let result = run_sweep(&config(dir.path(), 6), &mut sim).unwrap();

        assert_eq!(sim.calls.len(), 6);
        assert!(sim.calls[0][0].ends_with("free-energy-monte-carlo-infinite-case"));
        assert!(sim.calls[1][0].ends_with("free-energy-monte-carlo"));
        assert_eq!(arg(&sim.calls[1], "--ff"), "0.05");

        let ffs = result.filling_fractions();
        let expected = [0.05, 0.1, 0.15, 0.2, 0.225, 0.25];
        for (a, b) in ffs.iter().zip(expected) {
            assert!((a - b).abs() < 1e-9, "{ffs:?}");
        }
        let ln2 = 2f64.ln();
        assert!((result.free_energy[5] - 6.0 * ln2 / 10.0).abs() < 1e-12);
    }

    #[test]
    fn cached_steps_are_not_rerun() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = config(dir.path(), 3);
        run_sweep(&cfg, &mut FakeSimulator::new(900)).unwrap();

        let mut again = FakeSimulator::new(900);
        let result = run_sweep(&cfg, &mut again).unwrap();
        assert!(again.calls.is_empty());
        assert_eq!(result.records.len(), 3);
        assert!((result.records[0].ratio - 0.9).abs() < 1e-12);
    }

    #[test]
    fn zero_valid_checks_is_a_data_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = run_sweep(&config(dir.path(), 1), &mut FakeSimulator::new(0)).unwrap_err();
        assert_eq!(err.exit_code(), 3);
        assert!(err.message().contains("periodic-ff0-ff_small0.05"));
    }

    #[test]
    fn zero_total_checks_is_a_data_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut sim = FakeSimulator::with_counts(0, 0);
        let err = run_sweep(&config(dir.path(), 1), &mut sim).unwrap_err();
        assert_eq!(err.exit_code(), 3);
        let file = "periodic-ff0-ff_small0.05-N10-iterations1000000-seed0-g.dat";
        assert!(err.message().contains(file), "{}", err.message());
        assert!(err.message().contains("no small-cell checks"));
    }

    #[test]
    fn missing_header_key_names_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = config(dir.path(), 1);
        let plan = plan_step(&cfg, 0, 0.0);
        fs::create_dir_all(&plan.data_dir).unwrap();
        fs::write(plan.output_path(), "# ff_small: 0.05\n").unwrap();

        let err = run_sweep(&cfg, &mut FakeSimulator::new(1)).unwrap_err();
        assert_eq!(err.exit_code(), 3);
        assert!(err.message().contains("total checks of small cell"));
    }

    struct FailingSimulator;

    impl Simulator for FailingSimulator {
        fn run(&mut self, _argv: &[String]) -> Result<(), AppError> {
            Err(AppError::external("boom"))
        }
    }

    #[test]
    fn simulator_failure_aborts() {
        let dir = tempfile::tempdir().unwrap();
        let err = run_sweep(&config(dir.path(), 3), &mut FailingSimulator).unwrap_err();
        assert_eq!(err.exit_code(), 5);
    }
}
