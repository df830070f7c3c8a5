//! # Error Types
//!
//! @title Runner Errors
//! @author Ramprasad
//!
//! Fatal errors that abort a batch run. Per-contract analysis failures are
//! not errors; they are reported through [`crate::invoker::InvocationOutcome`].

use std::path::PathBuf;
use thiserror::Error;

/// Errors that terminate a run.
#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("failed to read config {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed YAML in {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("{path}: contract `{entry}` under network `{network}` has no contract_file")]
    MissingContractFile {
        path: PathBuf,
        network: String,
        entry: String,
    },

    #[error("{path}: contract_file of `{entry}` under network `{network}` is not a string")]
    InvalidContractFile {
        path: PathBuf,
        network: String,
        entry: String,
    },

    #[error("{path}: cannot determine project base directory")]
    NoBaseDir { path: PathBuf },

    #[error("failed to create output directory {path}: {source}")]
    OutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to copy {from} to {to}: {source}")]
    CopySource {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to launch `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to load depth table {path}: {reason}")]
    DepthTable { path: PathBuf, reason: String },

    #[error("invalid report index template: {0}")]
    IndexTemplate(#[from] handlebars::TemplateError),

    #[error("failed to render report index: {0}")]
    IndexRender(#[from] handlebars::RenderError),

    #[error("failed to write {path}: {source}")]
    IndexWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result alias used across the library.
pub type Result<T> = std::result::Result<T, RunnerError>;
