//! # Analysis Cache
//!
//! @title Run-Scoped Analysis Cache
//! @author Ramprasad
//!
//! Records which contracts have already been handed to the analyzer during
//! the current run. The analyzer is slow and writes into the shared output
//! directory, so a contract must be claimed before it is copied or analyzed
//! and is never processed twice, no matter how many configs reference it.

use crate::config::ContractRef;
use std::collections::BTreeMap;

/// Mapping from contract to "already processed".
///
/// Keys are kept sorted, which is the order the report index lists them in.
#[derive(Debug, Default, Clone)]
pub struct AnalysisCache {
    entries: BTreeMap<ContractRef, bool>,
}

impl AnalysisCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns whether `contract` was already processed. Unknown contracts
    /// are simply unseen.
    pub fn seen(&self, contract: &ContractRef) -> bool {
        self.entries.get(contract).copied().unwrap_or(false)
    }

    /// Marks `contract` as processed.
    pub fn mark(&mut self, contract: &ContractRef) {
        self.entries.insert(contract.clone(), true);
    }

    /// Marks `contract` and returns `true` if this is its first sighting.
    ///
    /// Callers must claim before doing any work for the contract.
    pub fn claim(&mut self, contract: &ContractRef) -> bool {
        if self.seen(contract) {
            return false;
        }
        self.mark(contract);
        true
    }

    /// Processed contracts, sorted by path.
    pub fn processed(&self) -> impl Iterator<Item = &ContractRef> {
        self.entries
            .iter()
            .filter(|(_, done)| **done)
            .map(|(contract, _)| contract)
    }
}
