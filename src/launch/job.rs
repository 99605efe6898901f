//! Command lines for `soft-monte-carlo` submissions.

use std::fmt;

use crate::report::printf::{fmt_f, g};

use super::{Dirs, sphere_count_bulk, sphere_count_walls};

/// Box edge length (in σ) of every soft-sphere simulation cell.
const CELL: u32 = 30;

/// One scheduler submission: `srun --mem=MEM -J NAME time nice -19 PROGRAM ARGS > STEM.out 2>&1 &`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SrunJob {
    pub name: String,
    pub mem_mb: u32,
    pub program: String,
    pub args: Vec<String>,
    pub stem: String,
}

impl fmt::Display for SrunJob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "srun --mem={} -J {} time nice -19 {}",
            self.mem_mb, self.name, self.program
        )?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        write!(f, " > {}.out 2>&1 &", self.stem)
    }
}

/// A single `soft-monte-carlo` run.
#[derive(Debug, Clone, PartialEq)]
pub enum SoftJob {
    Homogeneous {
        reduced_density: f64,
        temperature: f64,
        potential: String,
    },
    Walls {
        reduced_density: f64,
        /// `0` picks a count from the density.
        spheres: u32,
        temperature: f64,
    },
    SoftWalls {
        reduced_density: f64,
        spheres: u32,
        temperature: f64,
    },
    TestParticle {
        reduced_density: f64,
        temperature: f64,
        sigma: f64,
        epsilon: f64,
        potential: String,
    },
}

impl SoftJob {
    pub fn reduced_density(&self) -> f64 {
        match self {
            SoftJob::Homogeneous { reduced_density, .. }
            | SoftJob::Walls { reduced_density, .. }
            | SoftJob::SoftWalls { reduced_density, .. }
            | SoftJob::TestParticle { reduced_density, .. } => *reduced_density,
        }
    }

    pub fn temperature(&self) -> f64 {
        match self {
            SoftJob::Homogeneous { temperature, .. }
            | SoftJob::Walls { temperature, .. }
            | SoftJob::SoftWalls { temperature, .. }
            | SoftJob::TestParticle { temperature, .. } => *temperature,
        }
    }

    pub fn to_srun(&self, dirs: &Dirs, mem_mb: u32) -> SrunJob {
        let n = self.reduced_density();
        let t = self.temperature();
        let tag = format!("{}-{}", fmt_f(n, 4), fmt_f(t, 4));
        let figs = dirs.figs_dir.display();

        let (name, stem, spheres, tail) = match self {
            SoftJob::Homogeneous { potential, .. } => (
                format!("soft-{tag}"),
                format!("{figs}/mc{potential}-{tag}"),
                sphere_count_bulk(n),
                vec![
                    "periodxyz".to_string(),
                    CELL.to_string(),
                    "kT".to_string(),
                    g(t),
                    "potential".to_string(),
                    quoted(potential),
                ],
            ),
            SoftJob::Walls { spheres, .. } => {
                let spheres = sphere_count_walls(n, *spheres);
                (
                    format!("softwalls-{tag}"),
                    format!("{figs}/mcwalls-{tag}-{spheres}"),
                    spheres,
                    vec![
                        "periodxy".to_string(),
                        CELL.to_string(),
                        "wallz".to_string(),
                        CELL.to_string(),
                        "kT".to_string(),
                        g(t),
                    ],
                )
            }
            SoftJob::SoftWalls { spheres, .. } => {
                let spheres = sphere_count_walls(n, *spheres);
                (
                    format!("wcawalls-{tag}"),
                    format!("{figs}/mc-soft-wall-{tag}-{spheres}"),
                    spheres,
                    vec![
                        "periodxy".to_string(),
                        CELL.to_string(),
                        "softwallz".to_string(),
                        "1".to_string(),
                        "kT".to_string(),
                        g(t),
                    ],
                )
            }
            SoftJob::TestParticle {
                sigma,
                epsilon,
                potential,
                ..
            } => (
                format!("soft-testp-{tag}"),
                format!("{figs}/mc_testp_{potential}-{tag}"),
                sphere_count_bulk(n),
                vec![
                    "periodxyz".to_string(),
                    CELL.to_string(),
                    "kT".to_string(),
                    g(t),
                    "TestP".to_string(),
                    fmt_f(*sigma, 6),
                    "testp_eps".to_string(),
                    fmt_f(*epsilon, 6),
                    "potential".to_string(),
                    quoted(potential),
                ],
            ),
        };

        let mut args = vec![
            spheres.to_string(),
            "0.01".to_string(),
            "0.001".to_string(),
            format!("{stem}.dat"),
        ];
        args.extend(tail);

        SrunJob {
            name,
            mem_mb,
            program: format!("{}/soft-monte-carlo", dirs.bin_dir.display()),
            args,
            stem,
        }
    }
}

fn quoted(potential: &str) -> String {
    format!("'{potential}'")
}
