//! # Batch Pipeline
//!
//! @title Report Generation Pipeline
//! @author Ramprasad
//!
//! Drives a whole run:
//! 1. Creates the output directory
//! 2. Probes git for the run header
//! 3. Loads each config and, for every contract not yet in the cache,
//!    copies its source and runs the analyzer
//! 4. Writes `index.html` for every contract processed
//!
//! Configs and contracts are handled strictly one after another. An analyzer
//! failure is reported and the batch continues; any other error aborts the
//! run before the index is written.

use crate::cache::AnalysisCache;
use crate::config::{load_config, ConfigContracts, ContractRef};
use crate::depth::DepthTable;
use crate::error::{Result, RunnerError};
use crate::index::IndexRenderer;
use crate::invoker::{CommandRunner, InvocationOutcome, ReportInvoker};
use crate::metadata::RunHeader;
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Knobs for a [`Pipeline`].
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    /// Directory receiving sources, reports and the index.
    pub output_dir: PathBuf,

    /// Analyzer executable.
    pub analyzer: String,

    /// Depth hints per contract basename.
    pub depths: DepthTable,

    /// Whether to probe git for the run header.
    pub probe_git: bool,

    /// Whether to print per-contract progress to stdout.
    pub progress: bool,
}

/// A contract whose analysis exited unsuccessfully.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedContract {
    pub contract: ContractRef,
    pub code: Option<i32>,
}

/// Outcome of a complete run.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub output_dir: PathBuf,
    pub index_path: PathBuf,
    pub header: RunHeader,
    pub configs: usize,
    /// Every contract listed in the index, sorted by path.
    pub processed: Vec<ContractRef>,
    pub failed: Vec<FailedContract>,
}

/// Sequential batch runner owning the run-scoped cache.
pub struct Pipeline<R> {
    invoker: ReportInvoker<R>,
    cache: AnalysisCache,
    renderer: IndexRenderer,
    probe_git: bool,
    progress: bool,
}

impl<R: CommandRunner> Pipeline<R> {
    /// Creates the output directory and prepares the renderer.
    pub fn new(runner: R, options: PipelineOptions) -> Result<Self> {
        let output_dir = prepare_output_dir(&options.output_dir)?;
        log::debug!("output directory: {}", output_dir.display());

        Ok(Self {
            invoker: ReportInvoker::new(runner, options.analyzer, options.depths, output_dir),
            cache: AnalysisCache::new(),
            renderer: IndexRenderer::new()?,
            probe_git: options.probe_git,
            progress: options.progress,
        })
    }

    pub fn output_dir(&self) -> &Path {
        self.invoker.output_dir()
    }

    pub fn cache(&self) -> &AnalysisCache {
        &self.cache
    }

    /// Processes every config in order, then writes the index.
    pub fn run(&mut self, configs: &[PathBuf]) -> Result<RunSummary> {
        let header = if self.probe_git {
            RunHeader::probe(configs)
        } else {
            RunHeader::unavailable()
        };

        let mut failed = Vec::new();
        for path in configs {
            let config = load_config(path)?;
            log::info!(
                "{}: {} contract(s) referenced",
                config.path.display(),
                config.contracts.len()
            );
            failed.extend(self.process_config(&config)?);
        }

        let index_path = self
            .renderer
            .write(self.output_dir(), &header, self.cache.processed())?;

        Ok(RunSummary {
            output_dir: self.output_dir().to_path_buf(),
            index_path,
            header,
            configs: configs.len(),
            processed: self.cache.processed().cloned().collect(),
            failed,
        })
    }

    /// Analyzes the uncached contracts of one config.
    ///
    /// Returns the contracts whose analysis failed.
    pub fn process_config(&mut self, config: &ConfigContracts) -> Result<Vec<FailedContract>> {
        let mut failed = Vec::new();

        for contract in &config.contracts {
            if !self.cache.claim(contract) {
                log::debug!("{} already analyzed, skipping", contract);
                continue;
            }

            if let Some(failure) = self.analyze(&config.base_dir, contract)? {
                failed.push(failure);
            }
        }

        Ok(failed)
    }

    fn analyze(&self, base_dir: &Path, contract: &ContractRef) -> Result<Option<FailedContract>> {
        let report = self.invoker.report_path(contract);
        let depth = self.invoker.depth_for(contract);
        log::debug!("{} -> {} (depth {})", contract, report.display(), depth);

        let outcome = if self.progress {
            println!(
                "{} {} report to {}",
                "[*] Writing".green().bold(),
                contract.to_string().yellow(),
                report.display()
            );
            let spinner = spinner(contract, depth.as_arg());
            let outcome = self.invoker.invoke(base_dir, contract);
            spinner.finish_and_clear();
            outcome?
        } else {
            log::info!("Writing {} report to {}", contract, report.display());
            self.invoker.invoke(base_dir, contract)?
        };

        let InvocationOutcome::Failed { code, stdout, stderr } = outcome else {
            return Ok(None);
        };

        let code_label = code.map_or_else(|| "signal".to_string(), |c| c.to_string());
        log::warn!("analysis of {} exited with {}", contract, code_label);
        if self.progress {
            println!(
                "{} {} (exit {})",
                "[!] Analysis failed for".red().bold(),
                contract.to_string().yellow(),
                code_label
            );
            println!("{}", stdout);
            println!("{}", stderr);
        } else {
            log::warn!("stdout:\n{}", stdout);
            log::warn!("stderr:\n{}", stderr);
        }

        Ok(Some(FailedContract {
            contract: contract.clone(),
            code,
        }))
    }
}

fn prepare_output_dir(dir: &Path) -> Result<PathBuf> {
    let to_err = |source: std::io::Error| RunnerError::OutputDir {
        path: dir.to_path_buf(),
        source,
    };

    std::fs::create_dir_all(dir).map_err(to_err)?;
    std::fs::canonicalize(dir).map_err(to_err)
}

fn spinner(contract: &ContractRef, depth: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("{spinner:.green} [{elapsed_precise}] {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(format!("Analyzing {} (depth {})", contract.basename(), depth));
    pb.enable_steady_tick(Duration::from_millis(120));
    pb
}
