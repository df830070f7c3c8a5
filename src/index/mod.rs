//! # Index Renderer
//!
//! @title Report Index Generator
//! @author Ramprasad
//!
//! Renders `index.html`, a static page with one card per processed contract
//! linking to its report and its copied source. The page is rebuilt from
//! scratch on every run.

mod templates;

use crate::config::ContractRef;
use crate::error::{Result, RunnerError};
use crate::metadata::RunHeader;
use handlebars::Handlebars;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// File name of the generated index inside the output directory.
pub const INDEX_FILE: &str = "index.html";

/// Title shown in the browser tab and page header.
pub const INDEX_TITLE: &str = "Solsa Reports";

/// A single card on the index page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndexEntry {
    pub label: String,
    pub report_href: String,
    pub source_href: String,
}

impl From<&ContractRef> for IndexEntry {
    fn from(contract: &ContractRef) -> Self {
        Self {
            label: contract.label().to_string(),
            report_href: contract.report_name(),
            source_href: contract.basename().to_string(),
        }
    }
}

#[derive(Serialize)]
struct IndexPage<'a> {
    title: &'a str,
    header: &'a RunHeader,
    entries: Vec<IndexEntry>,
}

/// Handlebars-backed renderer for the index page.
pub struct IndexRenderer {
    handlebars: Handlebars<'static>,
}

impl IndexRenderer {
    pub fn new() -> Result<Self> {
        let mut handlebars = Handlebars::new();
        handlebars.set_strict_mode(false);
        handlebars.register_template_string(templates::CARD, templates::CARD_TEMPLATE)?;
        handlebars.register_template_string(templates::INDEX, templates::INDEX_TEMPLATE)?;

        Ok(Self { handlebars })
    }

    /// Renders the page. Entries are listed sorted by contract path.
    pub fn render<'a, I>(&self, header: &RunHeader, contracts: I) -> Result<String>
    where
        I: IntoIterator<Item = &'a ContractRef>,
    {
        let mut contracts: Vec<&ContractRef> = contracts.into_iter().collect();
        contracts.sort();
        contracts.dedup();

        let page = IndexPage {
            title: INDEX_TITLE,
            header,
            entries: contracts.into_iter().map(IndexEntry::from).collect(),
        };

        Ok(self.handlebars.render(templates::INDEX, &page)?)
    }

    /// Renders and writes `<output_dir>/index.html`, replacing any old file.
    pub fn write<'a, I>(&self, output_dir: &Path, header: &RunHeader, contracts: I) -> Result<PathBuf>
    where
        I: IntoIterator<Item = &'a ContractRef>,
    {
        let html = self.render(header, contracts)?;
        let path = output_dir.join(INDEX_FILE);

        std::fs::write(&path, html).map_err(|source| RunnerError::IndexWrite {
            path: path.clone(),
            source,
        })?;

        Ok(path)
    }
}
