//! # CLI Module
//!
//! @title Command Line Interface
//! @author Ramprasad
//!
//! This module defines the command-line interface for solsa-runner using
//! the `clap` derive macros for declarative argument parsing.
//!
//! ```text
//! solsa-runner [--output-dir DIR] CONFIG [CONFIG ...]
//! ```

use crate::depth::Depth;
use crate::invoker::DEFAULT_ANALYZER;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// solsa-runner command-line interface.
///
/// Runs the solsa analyzer over every contract referenced by the given
/// deployment configs and builds an HTML index of the reports.
#[derive(Parser, Debug)]
#[command(name = "solsa-runner")]
#[command(author = "RamprasadGoud")]
#[command(version)]
#[command(about = "Batch solsa analysis of contracts referenced by deployment configs")]
#[command(long_about = None)]
pub struct Cli {
    /// Deployment YAML configs, each located one directory below its
    /// project root.
    #[arg(value_name = "CONFIG", required = true, num_args = 1..)]
    pub configs: Vec<PathBuf>,

    /// Directory to output reports to. Created if missing.
    #[arg(short, long, value_name = "DIR", default_value = "out")]
    pub output_dir: PathBuf,

    /// Analyzer executable to invoke.
    #[arg(long, value_name = "PATH", env = "SOLSA_BIN", default_value = DEFAULT_ANALYZER)]
    pub solsa_bin: String,

    /// Depth used for contracts without an override.
    #[arg(short = 'd', long, value_enum, default_value_t = Depth::Deepest)]
    pub default_depth: Depth,

    /// YAML file mapping contract basenames to depths, merged over the
    /// built-in overrides.
    #[arg(long, value_name = "FILE")]
    pub depth_table: Option<PathBuf>,

    /// Format of the final run summary.
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Terminal)]
    pub format: OutputFormat,

    /// Do not read git metadata for the index header.
    #[arg(long)]
    pub no_git: bool,
}

/// How the run summary is printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Colorized console output.
    Terminal,
    /// Machine-readable JSON.
    Json,
}
