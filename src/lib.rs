//! # solsa-runner Library
//!
//! @title solsa-runner - Batch Contract Analysis
//! @author Ramprasad
//!
//! Runs the external `solsa` analyzer over every Solidity contract referenced
//! by a set of deployment configs, at most once per contract, and renders a
//! static HTML index of the resulting reports.
//!
//! ## Modules
//!
//! - [`cli`] - Command-line interface definitions and argument parsing
//! - [`config`] - Deployment YAML loading and contract references
//! - [`cache`] - Run-scoped record of analyzed contracts
//! - [`depth`] - Analyzer depth hints and the override table
//! - [`invoker`] - Source copying and analyzer invocation
//! - [`index`] - HTML index rendering
//! - [`metadata`] - Git information for the index header
//! - [`pipeline`] - The end-to-end batch run
//!
//! ## Example
//!
//! ```rust,ignore
//! use solsa_runner::{Pipeline, PipelineOptions, SystemRunner, DepthTable};
//!
//! let options = PipelineOptions {
//!     output_dir: "out".into(),
//!     analyzer: "solsa".into(),
//!     depths: DepthTable::default(),
//!     probe_git: true,
//!     progress: true,
//! };
//! let summary = Pipeline::new(SystemRunner, options)?.run(&configs)?;
//! ```

pub mod cache;
pub mod cli;
pub mod config;
pub mod depth;
pub mod error;
pub mod index;
pub mod invoker;
pub mod metadata;
pub mod pipeline;

pub use cache::AnalysisCache;
pub use cli::Cli;
pub use config::{ConfigContracts, ContractRef};
pub use depth::{Depth, DepthTable};
pub use error::RunnerError;
pub use invoker::{AnalysisCommand, CommandRunner, SystemRunner};
pub use metadata::RunHeader;
pub use pipeline::{Pipeline, PipelineOptions, RunSummary};
