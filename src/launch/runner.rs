//! Where launch command lines end up.

use std::process::Command;

use crate::error::AppError;

/// Receives fully-formed shell command lines.
pub trait JobRunner {
    fn submit(&mut self, command: &str) -> Result<(), AppError>;
}

/// Hands each command to `sh -c`. Commands end in `&`, so this returns as
/// soon as the scheduler call is backgrounded.
#[derive(Debug, Default)]
pub struct ShellRunner;

impl JobRunner for ShellRunner {
    fn submit(&mut self, command: &str) -> Result<(), AppError> {
        tracing::info!(%command, "submitting job");
        let status = Command::new("sh")
            .arg("-c")
            .arg(command)
            .status()
            .map_err(|e| AppError::external(format!("Failed to start `sh -c`: {e}")))?;
        if !status.success() {
            tracing::warn!(%status, %command, "shell reported failure");
        }
        Ok(())
    }
}

/// Prints commands to stdout instead of running them.
#[derive(Debug, Default)]
pub struct DryRun {
    pub commands: Vec<String>,
    pub quiet: bool,
}

impl JobRunner for DryRun {
    fn submit(&mut self, command: &str) -> Result<(), AppError> {
        if !self.quiet {
            println!("{command}");
        }
        self.commands.push(command.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dry_run_records_commands() {
        let mut runner = DryRun {
            quiet: true,
            ..DryRun::default()
        };
        runner.submit("echo a &").unwrap();
        runner.submit("echo b &").unwrap();
        assert_eq!(runner.commands, vec!["echo a &", "echo b &"]);
    }

    #[test]
    fn shell_runner_runs_through_sh() {
        let dir = tempfile::tempdir().unwrap();
        let marker = dir.path().join("ran");
        ShellRunner
            .submit(&format!("touch '{}'", marker.display()))
            .unwrap();
        assert!(marker.exists());
    }
}
