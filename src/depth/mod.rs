//! # Depth Hints
//!
//! @title Analyzer Depth Table
//! @author Ramprasad
//!
//! The analyzer accepts a depth hint bounding how hard it tries. Some
//! contracts make it consume memory without bound at the deepest setting, so
//! a lookup table keyed by contract basename lowers the depth for them.
//!
//! Override files are plain YAML mappings:
//!
//! ```yaml
//! GnosisWallet.sol: shallow
//! BurnableCrowdsaleToken.sol: deep
//! ```

use crate::error::{Result, RunnerError};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

/// Analyzer depth, from cheapest to most thorough.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Depth {
    Shallow,
    Deep,
    #[default]
    Deepest,
}

impl Depth {
    /// Value passed to the analyzer's `-d` flag.
    pub fn as_arg(&self) -> &'static str {
        match self {
            Depth::Shallow => "shallow",
            Depth::Deep => "deep",
            Depth::Deepest => "deepest",
        }
    }
}

impl fmt::Display for Depth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_arg())
    }
}

/// Contracts known to blow up the analyzer at full depth.
const BUILTIN_OVERRIDES: &[(&str, Depth)] = &[
    ("GnosisWallet.sol", Depth::Shallow),
    ("BurnableCrowdsaleToken.sol", Depth::Deep),
];

/// Per-basename depth overrides with a fallback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepthTable {
    default: Depth,
    overrides: BTreeMap<String, Depth>,
}

impl DepthTable {
    /// A table with no overrides.
    pub fn new(default: Depth) -> Self {
        Self {
            default,
            overrides: BTreeMap::new(),
        }
    }

    /// A table preloaded with the known-heavy contracts.
    pub fn builtin(default: Depth) -> Self {
        let mut table = Self::new(default);
        for (name, depth) in BUILTIN_OVERRIDES {
            table.set(*name, *depth);
        }
        table
    }

    pub fn set(&mut self, basename: impl Into<String>, depth: Depth) {
        self.overrides.insert(basename.into(), depth);
    }

    /// Merges overrides from a YAML file over the current entries.
    pub fn merge_file(&mut self, path: &Path) -> Result<()> {
        let text = std::fs::read_to_string(path).map_err(|e| RunnerError::DepthTable {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        if text.trim().is_empty() {
            return Ok(());
        }

        let entries: Option<BTreeMap<String, Depth>> =
            serde_yaml::from_str(&text).map_err(|e| RunnerError::DepthTable {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;

        for (name, depth) in entries.unwrap_or_default() {
            log::debug!("depth override: {} -> {}", name, depth);
            self.set(name, depth);
        }
        Ok(())
    }

    /// Depth to use for a contract with the given basename.
    pub fn depth_for(&self, basename: &str) -> Depth {
        self.overrides.get(basename).copied().unwrap_or(self.default)
    }
}

impl Default for DepthTable {
    fn default() -> Self {
        Self::builtin(Depth::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_builtin_overrides() {
        let table = DepthTable::default();
        assert_eq!(table.depth_for("GnosisWallet.sol"), Depth::Shallow);
        assert_eq!(table.depth_for("BurnableCrowdsaleToken.sol"), Depth::Deep);
        assert_eq!(table.depth_for("Token.sol"), Depth::Deepest);
    }

    #[test]
    fn test_default_depth_applies_to_unlisted() {
        let table = DepthTable::builtin(Depth::Deep);
        assert_eq!(table.depth_for("Token.sol"), Depth::Deep);
        assert_eq!(table.depth_for("GnosisWallet.sol"), Depth::Shallow);
    }

    #[test]
    fn test_merge_file_overrides_builtin() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "GnosisWallet.sol: deep\nHeavy.sol: shallow").unwrap();

        let mut table = DepthTable::default();
        table.merge_file(file.path()).unwrap();

        assert_eq!(table.depth_for("GnosisWallet.sol"), Depth::Deep);
        assert_eq!(table.depth_for("Heavy.sol"), Depth::Shallow);
        assert_eq!(table.depth_for("BurnableCrowdsaleToken.sol"), Depth::Deep);
    }

    #[test]
    fn test_merge_file_rejects_unknown_depth() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "Heavy.sol: bottomless").unwrap();

        let err = DepthTable::default().merge_file(file.path()).unwrap_err();
        assert!(matches!(err, RunnerError::DepthTable { .. }));
    }

    #[test]
    fn test_empty_file_is_no_op() {
        let file = NamedTempFile::new().unwrap();
        let mut table = DepthTable::default();
        table.merge_file(file.path()).unwrap();
        assert_eq!(table, DepthTable::default());
    }
}
