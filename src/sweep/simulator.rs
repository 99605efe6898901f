//! Synchronous invocation of the free-energy simulation.

use std::process::Command;

use crate::error::AppError;

/// Runs one simulation step to completion.
pub trait Simulator {
    fn run(&mut self, argv: &[String]) -> Result<(), AppError>;
}

/// Spawns `argv[0]` with the remaining arguments and waits for it.
#[derive(Debug, Default)]
pub struct ProcessSimulator;

impl Simulator for ProcessSimulator {
    fn run(&mut self, argv: &[String]) -> Result<(), AppError> {
        let Some((program, args)) = argv.split_first() else {
            return Err(AppError::input("Empty simulator command line."));
        };
        tracing::info!(command = %argv.join(" "), "running simulation");
        let status = Command::new(program)
            .args(args)
            .status()
            .map_err(|e| AppError::external(format!("Failed to start '{program}': {e}")))?;
        if !status.success() {
            return Err(AppError::external(format!("'{program}' exited with {status}")));
        }
        Ok(())
    }
}
