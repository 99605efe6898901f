//! Command-line parsing for the Monte Carlo run tooling.
//!
//! The goal of this module is to keep **argument parsing** separate from the
//! launch/sweep/fit code, which only sees plain config structs.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "smc", version, about = "Launch, sweep and post-process hard/soft-sphere Monte Carlo runs")]
pub struct Cli {
    /// Print an ASCII preview of every figure on stdout.
    #[arg(long, global = true)]
    pub show: bool,

    /// Preview width (columns).
    #[arg(long, global = true, default_value_t = 100)]
    pub width: usize,

    /// Preview height (rows).
    #[arg(long, global = true, default_value_t = 25)]
    pub height: usize,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Submit `soft-monte-carlo` jobs for a grid of densities and temperatures.
    Launch(LaunchArgs),
    /// Run (or read back) a free-energy convergence sweep and plot it.
    FreeEnergy(FreeEnergyArgs),
    /// Fit the short-range g(r) ansatz and generate LaTeX, C and figures.
    FitGhs(FitGhsArgs),
    /// Plot contact-density profiles, one figure per file.
    PlotDensity(PlotDensityArgs),
}

#[derive(Debug, Args)]
pub struct LaunchArgs {
    #[command(subcommand)]
    pub kind: LaunchKind,
}

#[derive(Debug, Subcommand)]
pub enum LaunchKind {
    /// Periodic bulk fluid.
    Homogeneous {
        #[command(flatten)]
        grid: GridArgs,
        /// Potential name passed to the simulation (quoted verbatim).
        #[arg(long, default_value = "")]
        potential: String,
    },
    /// Hard walls in z.
    Walls {
        #[command(flatten)]
        grid: GridArgs,
        /// Sphere count; 0 derives it from the density.
        #[arg(long, default_value_t = 0)]
        spheres: u32,
    },
    /// Soft (WCA) walls in z.
    SoftWalls {
        #[command(flatten)]
        grid: GridArgs,
        /// Sphere count; 0 derives it from the density.
        #[arg(long, default_value_t = 0)]
        spheres: u32,
    },
    /// Bulk fluid with a test particle.
    TestParticle {
        #[command(flatten)]
        grid: GridArgs,
        /// Test particle diameter.
        #[arg(long)]
        sigma: f64,
        /// Test particle well depth.
        #[arg(long)]
        epsilon: f64,
        #[arg(long, default_value = "")]
        potential: String,
    },
}

/// Options shared by every launch kind.
#[derive(Debug, Args, Clone)]
pub struct GridArgs {
    /// Reduced densities (outer loop).
    #[arg(short = 'n', long = "density", num_args = 1.., required = true)]
    pub densities: Vec<f64>,

    /// Reduced temperatures (inner loop).
    #[arg(short = 't', long = "temperature", num_args = 1.., required = true)]
    pub temperatures: Vec<f64>,

    /// Where simulation outputs go (overrides SMC_FIGS_DIR).
    #[arg(long)]
    pub figs_dir: Option<PathBuf>,

    /// Where `soft-monte-carlo` lives (overrides SMC_BIN_DIR).
    #[arg(long)]
    pub bin_dir: Option<PathBuf>,

    /// Memory per job in MB (overrides SMC_SRUN_MEM).
    #[arg(long)]
    pub mem: Option<u32>,

    /// Print the commands instead of running them.
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Flavor {
    /// Periodic cell, run locally.
    Periodic,
    /// Fixed box, each step submitted with `srun`.
    Absolute,
}

#[derive(Debug, Args)]
pub struct FreeEnergyArgs {
    #[arg(long, value_enum, default_value_t = Flavor::Periodic)]
    pub flavor: Flavor,

    /// Number of steps.
    #[arg(long, default_value_t = 20)]
    pub steps: usize,

    /// Starting filling fraction (periodic only).
    #[arg(long, default_value_t = 0.0)]
    pub initial_ff: f64,

    /// Initial filling-fraction increment.
    #[arg(long, default_value_t = 0.05)]
    pub step_size: f64,

    /// Halve the increment every this many steps.
    #[arg(long, default_value_t = 4)]
    pub halve_every: usize,

    /// Sphere counts; each gets its own sweep.
    #[arg(short = 'N', long = "spheres", num_args = 1.., default_values_t = [10])]
    pub spheres: Vec<u32>,

    #[arg(long, default_value_t = 1_000_000)]
    pub iterations: u64,

    #[arg(long, default_value_t = 0)]
    pub seed: u64,

    /// Cache directory (overrides SMC_DATA_DIR).
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// Directory holding the simulation binaries (overrides SMC_BIN_DIR).
    #[arg(long)]
    pub bin_dir: Option<PathBuf>,

    /// Square-well width (absolute only).
    #[arg(long, default_value_t = 1.3)]
    pub well_width: f64,

    /// Box edge length (absolute only).
    #[arg(long, default_value_t = 5.0)]
    pub box_length: f64,

    /// Renormalization recursion level (absolute only).
    #[arg(long, default_value_t = 0)]
    pub level: u32,

    /// Sphere radius (absolute only).
    #[arg(long, default_value_t = 1.0)]
    pub radius: f64,

    /// Output figure.
    #[arg(short, long, default_value = "free-energy.svg")]
    pub output: PathBuf,

    /// Export per-step records to CSV.
    #[arg(long)]
    pub export: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct FitGhsArgs {
    /// Monte Carlo data base name; files are `BASE-0.45.dat` etc.
    #[arg(long, default_value = "figs/gr")]
    pub data_base: String,

    /// Output directory (overrides SMC_FIGS_DIR; default `figs`).
    #[arg(long)]
    pub out_dir: Option<PathBuf>,

    /// Output file prefix.
    #[arg(long, default_value = "short-range")]
    pub prefix: String,

    /// Hard-sphere diameter.
    #[arg(long, default_value_t = 2.0)]
    pub sigma: f64,

    /// Only radii below this enter the fit.
    #[arg(long, default_value_t = 6.0)]
    pub fit_rcutoff: f64,

    /// Decimals kept in the fitted parameters.
    #[arg(long, default_value_t = 3)]
    pub digits: u32,

    /// Give every filling fraction a panel in the stacked figure.
    #[arg(long)]
    pub all_panels: bool,

    /// Run pdflatex on the analytics document afterwards.
    #[arg(long)]
    pub pdflatex: bool,

    /// Export the fitted parameters to JSON.
    #[arg(long)]
    pub export_json: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct PlotDensityArgs {
    /// Radial profile files.
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Directory for the SVGs (default: next to each input).
    #[arg(long)]
    pub out_dir: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn launch_grid_parses_lists() {
        let cli = Cli::parse_from([
            "smc", "launch", "walls", "-n", "0.2", "0.5", "-t", "1.0", "--dry-run",
        ]);
        let Command::Launch(LaunchArgs {
            kind: LaunchKind::Walls { grid, spheres },
        }) = cli.command
        else {
            panic!("expected launch walls");
        };
        assert_eq!(grid.densities, vec![0.2, 0.5]);
        assert_eq!(grid.temperatures, vec![1.0]);
        assert_eq!(spheres, 0);
        assert!(grid.dry_run);
    }

    #[test]
    fn show_is_global() {
        let cli = Cli::parse_from(["smc", "plot-density", "a.dat", "--show"]);
        assert!(cli.show);
    }

    #[test]
    fn free_energy_defaults() {
        let cli = Cli::parse_from(["smc", "free-energy"]);
        let Command::FreeEnergy(args) = cli.command else {
            panic!("expected free-energy");
        };
        assert_eq!(args.flavor, Flavor::Periodic);
        assert_eq!(args.spheres, vec![10]);
        assert_eq!(args.steps, 20);
        assert_eq!(args.output, PathBuf::from("free-energy.svg"));
    }
}
