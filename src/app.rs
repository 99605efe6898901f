//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments and environment settings
//! - dispatches to the launch / sweep / fit / density modules
//! - prints reports and ASCII previews
//! - writes figures and optional exports

use std::path::PathBuf;

use clap::Parser;

use crate::cli::{Cli, Command, FitGhsArgs, FreeEnergyArgs, GridArgs, LaunchKind, PlotDensityArgs};
use crate::error::AppError;
use crate::launch::{Dirs, DryRun, JobRunner, ShellRunner, SoftJob};
use crate::plot::{Figure, render_ascii, write_svg};
use crate::settings::Settings;
use crate::sweep::{ProcessSimulator, SweepConfig, SweepFlavor};

/// Terminal preview options shared by every subcommand.
#[derive(Debug, Clone, Copy)]
struct Preview {
    show: bool,
    width: usize,
    height: usize,
}

impl Preview {
    fn emit(&self, fig: &Figure) {
        if self.show {
            println!("{}", render_ascii(fig, self.width, self.height));
        }
    }
}

/// Entry point for the `smc` binary.
pub fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let settings = Settings::from_env()?;
    let preview = Preview {
        show: cli.show,
        width: cli.width,
        height: cli.height,
    };

    match cli.command {
        Command::Launch(args) => handle_launch(args.kind, &settings),
        Command::FreeEnergy(args) => handle_free_energy(args, &settings, preview),
        Command::FitGhs(args) => handle_fit_ghs(args, &settings, preview),
        Command::PlotDensity(args) => handle_plot_density(args, preview),
    }
}

fn handle_launch(kind: LaunchKind, settings: &Settings) -> Result<(), AppError> {
    let grid: &GridArgs = match &kind {
        LaunchKind::Homogeneous { grid, .. }
        | LaunchKind::Walls { grid, .. }
        | LaunchKind::SoftWalls { grid, .. }
        | LaunchKind::TestParticle { grid, .. } => grid,
    };

    let cwd = std::env::current_dir()
        .map_err(|e| AppError::input(format!("Cannot read the working directory: {e}")))?;
    let dirs = Dirs::resolve(&cwd, grid.figs_dir.clone(), grid.bin_dir.clone(), settings);
    let mem = grid.mem.unwrap_or(settings.srun_mem);
    tracing::info!(figs = %dirs.figs_dir.display(), bin = %dirs.bin_dir.display(), mem, "launch directories");

    let make = |n: f64, t: f64| match &kind {
        LaunchKind::Homogeneous { potential, .. } => SoftJob::Homogeneous {
            reduced_density: n,
            temperature: t,
            potential: potential.clone(),
        },
        LaunchKind::Walls { spheres, .. } => SoftJob::Walls {
            reduced_density: n,
            spheres: *spheres,
            temperature: t,
        },
        LaunchKind::SoftWalls { spheres, .. } => SoftJob::SoftWalls {
            reduced_density: n,
            spheres: *spheres,
            temperature: t,
        },
        LaunchKind::TestParticle {
            sigma,
            epsilon,
            potential,
            ..
        } => SoftJob::TestParticle {
            reduced_density: n,
            temperature: t,
            sigma: *sigma,
            epsilon: *epsilon,
            potential: potential.clone(),
        },
    };

    let mut runner: Box<dyn JobRunner> = if grid.dry_run {
        Box::new(DryRun::default())
    } else {
        Box::new(ShellRunner)
    };
    crate::launch::submit_grid(runner.as_mut(), &dirs, mem, &grid.densities, &grid.temperatures, make)?;
    Ok(())
}

fn sweep_configs(args: &FreeEnergyArgs, settings: &Settings) -> Vec<SweepConfig> {
    let (flavor, default_data, default_bin) = match args.flavor {
        crate::cli::Flavor::Periodic => (SweepFlavor::Periodic, "data", "../.."),
        crate::cli::Flavor::Absolute => (
            SweepFlavor::Absolute {
                well_width: args.well_width,
                box_length: args.box_length,
                level: args.level,
                radius: args.radius,
            },
            ".",
            "../../..",
        ),
    };
    let data_dir = args
        .data_dir
        .clone()
        .or_else(|| settings.data_dir.clone())
        .unwrap_or_else(|| PathBuf::from(default_data));
    let bin_dir = args
        .bin_dir
        .clone()
        .or_else(|| settings.bin_dir.clone())
        .unwrap_or_else(|| PathBuf::from(default_bin));

    args.spheres
        .iter()
        .map(|&spheres| SweepConfig {
            steps: args.steps,
            initial_ff: args.initial_ff,
            step_size: args.step_size,
            halve_every: args.halve_every,
            spheres,
            iterations: args.iterations,
            seed: args.seed,
            data_dir: data_dir.clone(),
            bin_dir: bin_dir.clone(),
            flavor,
        })
        .collect()
}

fn handle_free_energy(args: FreeEnergyArgs, settings: &Settings, preview: Preview) -> Result<(), AppError> {
    let mut simulator = ProcessSimulator;
    let mut results = Vec::new();
    for config in sweep_configs(&args, settings) {
        let result = crate::sweep::run_sweep(&config, &mut simulator)?;
        println!("{}", crate::report::format_sweep_summary(&result));
        results.push(result);
    }

    let fig = crate::sweep::free_energy_figure(&results);
    write_svg(&fig, &args.output)?;
    preview.emit(&fig);

    if let Some(path) = &args.export {
        crate::io::export::write_sweep_csv(path, &results)?;
    }
    Ok(())
}

fn handle_fit_ghs(args: FitGhsArgs, settings: &Settings, preview: Preview) -> Result<(), AppError> {
    let now = chrono::Local::now();
    let mut opts = crate::ghs::GhsOptions {
        data_base: args.data_base,
        out_dir: args
            .out_dir
            .or_else(|| settings.figs_dir.clone())
            .unwrap_or_else(|| PathBuf::from("figs")),
        prefix: args.prefix,
        skip_every_other: !args.all_panels,
        pdflatex: args.pdflatex,
        stamp: now.format("%Y-%m-%d %H:%M:%S").to_string(),
        ..crate::ghs::GhsOptions::default()
    };
    opts.ansatz.sigma = args.sigma;
    opts.fit.r_cut = args.fit_rcutoff;
    opts.fit.digits = args.digits;

    let run = crate::ghs::run(&opts)?;

    println!(
        "{}",
        crate::report::format_fit_summary(&run.fit, &crate::ghs::fit::INITIAL_GUESS, opts.fit.digits as usize)
    );
    print!("{}", crate::report::format_integrals(&run.integrals));
    for path in &run.written {
        println!("wrote {}", path.display());
    }
    for (_, fig) in &run.figures {
        preview.emit(fig);
    }

    if let Some(path) = &args.export_json {
        crate::io::export::write_fit_json(path, &run.fit, now)?;
    }
    Ok(())
}

fn handle_plot_density(args: PlotDensityArgs, preview: Preview) -> Result<(), AppError> {
    for file in &args.files {
        let fig = crate::density::density_figure(file)?;
        let out = crate::density::figure_path(file, args.out_dir.as_deref());
        write_svg(&fig, &out)?;
        println!("wrote {}", out.display());
        preview.emit(&fig);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Flavor;

    fn parse_free_energy(argv: &[&str]) -> FreeEnergyArgs {
        let cli = Cli::parse_from(argv);
        match cli.command {
            Command::FreeEnergy(args) => args,
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn periodic_sweep_defaults() {
        let args = parse_free_energy(&["smc", "free-energy"]);
        let configs = sweep_configs(&args, &Settings::default());
        assert_eq!(configs, vec![SweepConfig::default()]);
    }

    #[test]
    fn absolute_sweep_per_sphere_count() {
        let args = parse_free_energy(&["smc", "free-energy", "--flavor", "absolute", "-N", "2", "3"]);
        assert_eq!(args.flavor, Flavor::Absolute);
        let settings = Settings {
            bin_dir: Some(PathBuf::from("/opt/mc")),
            ..Settings::default()
        };
        let configs = sweep_configs(&args, &settings);
        assert_eq!(configs.len(), 2);
        assert_eq!(configs[1].spheres, 3);
        assert_eq!(configs[0].data_dir, PathBuf::from("."));
        assert_eq!(configs[0].bin_dir, PathBuf::from("/opt/mc"));
        assert!(matches!(configs[0].flavor, SweepFlavor::Absolute { level: 0, .. }));
    }

    #[test]
    fn data_dir_flag_beats_environment() {
        let args = parse_free_energy(&["smc", "free-energy", "--data-dir", "cli"]);
        let settings = Settings {
            data_dir: Some(PathBuf::from("env")),
            ..Settings::default()
        };
        assert_eq!(sweep_configs(&args, &settings)[0].data_dir, PathBuf::from("cli"));
    }
}
