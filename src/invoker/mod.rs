//! # Report Invoker
//!
//! @title Analyzer Invocation
//! @author Ramprasad
//!
//! Copies a contract's source into the output directory and runs the
//! external analyzer on it. The analyzer call is described by an
//! [`AnalysisCommand`] and executed through a [`CommandRunner`], so the
//! process boundary can be replaced in tests.
//!
//! ## Key Types
//!
//! - [`AnalysisCommand`] - Program, ordered arguments and working directory
//! - [`CommandRunner`] - Executes a command and captures its output
//! - [`ReportInvoker`] - Copy + invoke for a single contract

use crate::config::ContractRef;
use crate::depth::{Depth, DepthTable};
use crate::error::{Result, RunnerError};
use std::path::{Path, PathBuf};
use std::process::Command;

/// Default analyzer executable, looked up on `PATH`.
pub const DEFAULT_ANALYZER: &str = "solsa";

/// A fully described analyzer invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisCommand {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: PathBuf,
}

impl AnalysisCommand {
    /// Space-joined command line, for logs.
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Captured result of a finished process.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommandOutput {
    /// Exit code, `None` if the process was killed by a signal.
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Runs an [`AnalysisCommand`] to completion with captured output.
///
/// An `Err` means the process could not be started at all.
pub trait CommandRunner {
    fn run(&self, command: &AnalysisCommand) -> std::io::Result<CommandOutput>;
}

impl<R: CommandRunner + ?Sized> CommandRunner for &R {
    fn run(&self, command: &AnalysisCommand) -> std::io::Result<CommandOutput> {
        (**self).run(command)
    }
}

/// Spawns real processes and blocks until they exit.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, command: &AnalysisCommand) -> std::io::Result<CommandOutput> {
        let output = Command::new(&command.program)
            .args(&command.args)
            .current_dir(&command.cwd)
            .output()?;

        Ok(CommandOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

/// What happened to a single contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvocationOutcome {
    Succeeded,
    Failed {
        code: Option<i32>,
        stdout: String,
        stderr: String,
    },
}

/// Copies contract sources and runs the analyzer on them.
pub struct ReportInvoker<R> {
    runner: R,
    program: String,
    depths: DepthTable,
    output_dir: PathBuf,
}

impl<R: CommandRunner> ReportInvoker<R> {
    /// # Arguments
    ///
    /// * `runner` - Process runner
    /// * `program` - Analyzer executable
    /// * `depths` - Depth hint table
    /// * `output_dir` - Absolute directory receiving sources and reports
    pub fn new(runner: R, program: impl Into<String>, depths: DepthTable, output_dir: PathBuf) -> Self {
        Self {
            runner,
            program: program.into(),
            depths,
            output_dir,
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Where the copied source of `contract` lands.
    pub fn source_path(&self, contract: &ContractRef) -> PathBuf {
        self.output_dir.join(contract.basename())
    }

    /// Where the analyzer is told to write the report for `contract`.
    pub fn report_path(&self, contract: &ContractRef) -> PathBuf {
        self.output_dir.join(contract.report_name())
    }

    pub fn depth_for(&self, contract: &ContractRef) -> Depth {
        self.depths.depth_for(contract.basename())
    }

    /// Describes the analyzer call for `contract`, run from `base_dir`.
    pub fn command_for(&self, base_dir: &Path, contract: &ContractRef) -> AnalysisCommand {
        AnalysisCommand {
            program: self.program.clone(),
            args: vec![
                "-d".to_string(),
                self.depth_for(contract).as_arg().to_string(),
                "-f".to_string(),
                contract.as_str().to_string(),
                "-o".to_string(),
                self.report_path(contract).display().to_string(),
                "-i".to_string(),
            ],
            cwd: base_dir.to_path_buf(),
        }
    }

    /// Copies the source of `contract` into the output directory.
    ///
    /// Contracts sharing a basename overwrite each other's copy.
    pub fn copy_source(&self, base_dir: &Path, contract: &ContractRef) -> Result<PathBuf> {
        let from = contract.resolve(base_dir);
        let to = self.source_path(contract);

        std::fs::copy(&from, &to).map_err(|source| RunnerError::CopySource {
            from: from.clone(),
            to: to.clone(),
            source,
        })?;

        Ok(to)
    }

    /// Copies the source, then runs the analyzer and waits for it.
    ///
    /// # Errors
    ///
    /// Fails if the copy fails or the analyzer cannot be launched. A
    /// non-zero exit is reported as [`InvocationOutcome::Failed`].
    pub fn invoke(&self, base_dir: &Path, contract: &ContractRef) -> Result<InvocationOutcome> {
        self.copy_source(base_dir, contract)?;

        let command = self.command_for(base_dir, contract);
        log::debug!("running `{}` in {}", command.command_line(), command.cwd.display());

        let output = self.runner.run(&command).map_err(|source| RunnerError::Spawn {
            program: command.program.clone(),
            source,
        })?;

        if output.success() {
            Ok(InvocationOutcome::Succeeded)
        } else {
            Ok(InvocationOutcome::Failed {
                code: output.code,
                stdout: output.stdout,
                stderr: output.stderr,
            })
        }
    }
}
