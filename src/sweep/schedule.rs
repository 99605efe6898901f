//! Per-step file names and argument lists for the free-energy sweep.

use std::f64::consts::PI;
use std::path::PathBuf;

use crate::report::printf::{fmt_g, g};

use super::{SweepConfig, SweepFlavor};

/// Everything needed to run (or find the cached output of) one step.
#[derive(Debug, Clone, PartialEq)]
pub struct StepPlan {
    pub index: usize,
    pub ff: f64,
    pub ff_small: f64,
    /// Name passed as `--filename`; the binary appends `-g.dat`.
    pub filename: String,
    pub data_dir: PathBuf,
    pub argv: Vec<String>,
}

impl StepPlan {
    /// Output file the simulator leaves behind for this step.
    pub fn output_path(&self) -> PathBuf {
        self.data_dir.join(format!("{}-g.dat", self.filename))
    }
}

/// Step size in effect at step `index`: halved every `halve_every` steps.
pub fn step_size_at(config: &SweepConfig, index: usize) -> f64 {
    let halvings = if config.halve_every == 0 {
        0
    } else {
        index / config.halve_every
    };
    config.step_size * 0.5f64.powi(halvings as i32)
}

/// Filling fraction of the first step.
pub fn initial_ff(config: &SweepConfig) -> f64 {
    match config.flavor {
        SweepFlavor::Periodic => config.initial_ff,
        SweepFlavor::Absolute {
            box_length, radius, ..
        } => 4.0 / 3.0 * PI * radius.powi(3) / box_length.powi(3),
    }
}

/// Directory the flavor writes its data files into.
pub fn data_dir(config: &SweepConfig) -> PathBuf {
    match config.flavor {
        SweepFlavor::Periodic => config.data_dir.clone(),
        SweepFlavor::Absolute { level, .. } => config
            .data_dir
            .join(format!("scrunched/i{level}/N{:03}/absolute", config.spheres)),
    }
}

/// Self-consistency period for the absolute runs: `max(10, N²/10)`.
pub fn sc_period(spheres: u32) -> u64 {
    (u64::from(spheres) * u64::from(spheres) / 10).max(10)
}

/// Build step `index` starting from filling fraction `ff`.
pub fn plan_step(config: &SweepConfig, index: usize, ff: f64) -> StepPlan {
    let step = step_size_at(config, index);
    let ff_small = ff + step;
    let dir = data_dir(config);
    let bin = config.bin_dir.display();

    let (filename, argv) = match config.flavor {
        SweepFlavor::Periodic => {
            let filename = format!(
                "periodic-ff{}-ff_small{}-N{}-iterations{}-seed{}",
                g(ff),
                g(ff_small),
                config.spheres,
                config.iterations,
                config.seed
            );
            let mut argv = if ff == 0.0 {
                vec![format!("{bin}/free-energy-monte-carlo-infinite-case")]
            } else {
                vec![
                    format!("{bin}/free-energy-monte-carlo"),
                    "--ff".to_string(),
                    fmt_g(ff, 12),
                ]
            };
            argv.extend([
                "--iterations".to_string(),
                config.iterations.to_string(),
                "--filename".to_string(),
                filename.clone(),
                "--data_dir".to_string(),
                dir.display().to_string(),
                "--ff_small".to_string(),
                fmt_g(ff_small, 12),
            ]);
            (filename, argv)
        }
        SweepFlavor::Absolute {
            well_width,
            box_length,
            ..
        } => {
            let filename = format!(
                "absolute-ww{well_width:4.2}-L{box_length:04.2}-N{:03}",
                config.spheres
            );
            let argv = vec![
                "srun".to_string(),
                "-J".to_string(),
                filename.clone(),
                format!("{bin}/free-energy-monte-carlo"),
                "--ff".to_string(),
                g(ff),
                "--sc_period".to_string(),
                sc_period(config.spheres).to_string(),
                "--iterations".to_string(),
                config.iterations.to_string(),
                "--filename".to_string(),
                filename.clone(),
                "--data_dir".to_string(),
                dir.display().to_string(),
                "--ff_small".to_string(),
                g(ff_small),
                "--N".to_string(),
                config.spheres.to_string(),
            ];
            (filename, argv)
        }
    };

    StepPlan {
        index,
        ff,
        ff_small,
        filename,
        data_dir: dir,
        argv,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_size_halves_every_four_steps() {
        let config = SweepConfig::default();
        let sizes: Vec<f64> = (0..9).map(|i| step_size_at(&config, i)).collect();
        assert_eq!(
            sizes,
            vec![0.05, 0.05, 0.05, 0.05, 0.025, 0.025, 0.025, 0.025, 0.0125]
        );
    }

    #[test]
    fn first_periodic_step_uses_infinite_case_binary() {
        let config = SweepConfig::default();
        let plan = plan_step(&config, 0, 0.0);
        assert_eq!(plan.filename, "periodic-ff0-ff_small0.05-N10-iterations1000000-seed0");
        assert_eq!(
            plan.argv,
            vec![
                "../../free-energy-monte-carlo-infinite-case",
                "--iterations",
                "1000000",
                "--filename",
                "periodic-ff0-ff_small0.05-N10-iterations1000000-seed0",
                "--data_dir",
                "data",
                "--ff_small",
                "0.05",
            ]
        );
        assert_eq!(
            plan.output_path(),
            PathBuf::from("data/periodic-ff0-ff_small0.05-N10-iterations1000000-seed0-g.dat")
        );
    }

    #[test]
    fn later_periodic_steps_pass_ff() {
        let config = SweepConfig::default();
        let plan = plan_step(&config, 5, 0.2);
        assert_eq!(&plan.argv[..3], &["../../free-energy-monte-carlo", "--ff", "0.2"]);
        assert_eq!(plan.argv.last().map(String::as_str), Some("0.225"));
        assert_eq!(plan.filename, "periodic-ff0.2-ff_small0.225-N10-iterations1000000-seed0");
    }

    #[test]
    fn absolute_flavor_names_and_arguments() {
        let config = SweepConfig {
            flavor: SweepFlavor::Absolute {
                well_width: 1.3,
                box_length: 5.0,
                level: 0,
                radius: 1.0,
            },
            spheres: 40,
            data_dir: PathBuf::from("."),
            bin_dir: PathBuf::from("../../.."),
            ..SweepConfig::default()
        };
        let ff = initial_ff(&config);
        assert!((ff - 4.0 / 3.0 * PI / 125.0).abs() < 1e-15);

        let plan = plan_step(&config, 0, ff);
        assert_eq!(plan.filename, "absolute-ww1.30-L5.00-N040");
        assert_eq!(plan.data_dir, PathBuf::from("./scrunched/i0/N040/absolute"));
        assert_eq!(
            plan.argv.join(" "),
            "srun -J absolute-ww1.30-L5.00-N040 ../../../free-energy-monte-carlo --ff 0.0335103 \
             --sc_period 160 --iterations 1000000 --filename absolute-ww1.30-L5.00-N040 \
             --data_dir ./scrunched/i0/N040/absolute --ff_small 0.0835103 --N 40"
        );
    }

    #[test]
    fn sc_period_has_a_floor() {
        assert_eq!(sc_period(0), 10);
        assert_eq!(sc_period(9), 10);
        assert_eq!(sc_period(11), 12);
    }
}
