//! # Config Loader
//!
//! @title Deployment Config Loader
//! @author Ramprasad
//!
//! Reads deployment YAML configs and extracts the contract source files they
//! reference. A config maps network names to network definitions; only
//! definitions that are mappings with a `contracts` key are consulted, and
//! every entry under `contracts` must name its `contract_file`.
//!
//! ```yaml
//! mainnet:
//!   contracts:
//!     token:
//!       contract_file: Token.sol
//! ```
//!
//! Configs live one directory below the project root, and contract files are
//! resolved under `<project root>/contracts/`.

use crate::error::{Result, RunnerError};
use serde::Serialize;
use serde_yaml::{Mapping, Value};
use std::fmt;
use std::path::{Component, Path, PathBuf};

/// Directory, relative to the project root, holding contract sources.
pub const CONTRACTS_DIR: &str = "contracts";

/// Relative path to a contract source file, always rooted at `contracts/`.
///
/// Two references are the same contract iff their normalized path strings
/// are equal.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct ContractRef(String);

impl ContractRef {
    /// Builds a reference from a `contract_file` value taken from a config.
    pub fn from_contract_file(file: &str) -> Self {
        Self(normalize(&format!("{}/{}", CONTRACTS_DIR, file)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Final path component, used to name the copied source and its report.
    pub fn basename(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or(&self.0)
    }

    /// File name of the generated report, `<basename>.html`.
    pub fn report_name(&self) -> String {
        format!("{}.html", self.basename())
    }

    /// Basename without its extension, used as a human label.
    pub fn label(&self) -> &str {
        let base = self.basename();
        match base.rfind('.') {
            Some(0) | None => base,
            Some(i) => &base[..i],
        }
    }

    /// Absolute location of the source under the given project base directory.
    pub fn resolve(&self, base_dir: &Path) -> PathBuf {
        base_dir.join(&self.0)
    }
}

impl fmt::Display for ContractRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Drops empty and `.` segments so `contracts/./A.sol` and
/// `contracts//A.sol` name the same contract as `contracts/A.sol`.
fn normalize(path: &str) -> String {
    path.split('/')
        .filter(|seg| !seg.is_empty() && *seg != ".")
        .collect::<Vec<_>>()
        .join("/")
}

/// Contracts referenced by a single config file.
#[derive(Debug, Clone)]
pub struct ConfigContracts {
    /// The config file that was read.
    pub path: PathBuf,

    /// Project root: the parent of the directory containing the config.
    pub base_dir: PathBuf,

    /// Referenced contracts in config order, without duplicates.
    pub contracts: Vec<ContractRef>,
}

/// Reads and parses a config file.
///
/// # Errors
///
/// Fails when the file cannot be read, is not valid YAML, or has a contract
/// entry without a string `contract_file`.
pub fn load_config(path: &Path) -> Result<ConfigContracts> {
    let source = std::fs::read_to_string(path).map_err(|source| RunnerError::ConfigRead {
        path: path.to_path_buf(),
        source,
    })?;

    let base_dir = project_base_dir(path)?;
    let contracts = parse_contracts(path, &source)?;

    log::debug!(
        "{} references {} contract(s), base dir {}",
        path.display(),
        contracts.len(),
        base_dir.display()
    );

    Ok(ConfigContracts {
        path: path.to_path_buf(),
        base_dir,
        contracts,
    })
}

/// Returns the parent of the directory containing `config`.
///
/// The path is made absolute lexically; symlinks are not followed.
pub fn project_base_dir(config: &Path) -> Result<PathBuf> {
    let absolute = std::path::absolute(config).map_err(|source| RunnerError::ConfigRead {
        path: config.to_path_buf(),
        source,
    })?;

    absolute
        .parent()
        .map(|dir| lexical_normalize(&dir.join("..")))
        .ok_or_else(|| RunnerError::NoBaseDir {
            path: config.to_path_buf(),
        })
}

/// Resolves `.` and `..` components without touching the filesystem.
/// `..` above the root stays at the root.
fn lexical_normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => out.push(component),
            },
            other => out.push(other),
        }
    }
    out
}

/// Extracts contract references from YAML text.
///
/// `path` is only used for error messages.
pub fn parse_contracts(path: &Path, source: &str) -> Result<Vec<ContractRef>> {
    if source.trim().is_empty() {
        return Ok(Vec::new());
    }

    let to_err = |err: serde_yaml::Error| RunnerError::ConfigParse {
        path: path.to_path_buf(),
        source: err,
    };
    let mut doc: Value = serde_yaml::from_str(source).map_err(to_err)?;
    doc.apply_merge().map_err(to_err)?;

    let networks = match doc {
        Value::Mapping(map) => map,
        Value::Null => return Ok(Vec::new()),
        _ => {
            log::warn!("{}: top level is not a mapping, ignoring", path.display());
            return Ok(Vec::new());
        }
    };

    let mut contracts: Vec<ContractRef> = Vec::new();

    for (network, definition) in &networks {
        let Value::Mapping(definition) = definition else {
            continue;
        };
        let Some(entries) = definition.get("contracts") else {
            continue;
        };

        let entries = match entries {
            Value::Mapping(entries) => entries,
            Value::Null => continue,
            _ => {
                log::warn!(
                    "{}: `contracts` of network `{}` is not a mapping, ignoring",
                    path.display(),
                    key_label(network)
                );
                continue;
            }
        };

        for file in contract_files(path, network, entries)? {
            let contract = ContractRef::from_contract_file(&file);
            if !contracts.contains(&contract) {
                contracts.push(contract);
            }
        }
    }

    Ok(contracts)
}

fn contract_files(path: &Path, network: &Value, entries: &Mapping) -> Result<Vec<String>> {
    entries
        .iter()
        .map(|(entry, body)| {
            let file = match body {
                Value::Mapping(body) => body.get("contract_file"),
                _ => None,
            };

            match file {
                Some(Value::String(file)) => Ok(file.clone()),
                Some(_) => Err(RunnerError::InvalidContractFile {
                    path: path.to_path_buf(),
                    network: key_label(network),
                    entry: key_label(entry),
                }),
                None => Err(RunnerError::MissingContractFile {
                    path: path.to_path_buf(),
                    network: key_label(network),
                    entry: key_label(entry),
                }),
            }
        })
        .collect()
}

fn key_label(key: &Value) -> String {
    match key {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        other => serde_yaml::to_string(other)
            .map(|s| s.trim().to_string())
            .unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn parse(yaml: &str) -> Result<Vec<ContractRef>> {
        parse_contracts(Path::new("test.yaml"), yaml)
    }

    fn names(refs: &[ContractRef]) -> Vec<&str> {
        refs.iter().map(ContractRef::as_str).collect()
    }

    #[test]
    fn test_single_contract() {
        let refs = parse("mainnet:\n  contracts:\n    a:\n      contract_file: Foo.sol\n").unwrap();
        assert_eq!(names(&refs), vec!["contracts/Foo.sol"]);
    }

    #[test]
    fn test_collects_across_networks_in_order() {
        let yaml = r#"
mainnet:
  contracts:
    token:
      contract_file: Token.sol
    sale:
      contract_file: Sale.sol
ropsten:
  contracts:
    wallet:
      contract_file: wallets/Multisig.sol
"#;
        let refs = parse(yaml).unwrap();
        assert_eq!(
            names(&refs),
            vec![
                "contracts/Token.sol",
                "contracts/Sale.sol",
                "contracts/wallets/Multisig.sol"
            ]
        );
    }

    #[test]
    fn test_duplicates_within_config_collapse() {
        let yaml = r#"
mainnet:
  contracts:
    a:
      contract_file: Foo.sol
    b:
      contract_file: ./Foo.sol
kovan:
  contracts:
    c:
      contract_file: Foo.sol
"#;
        let refs = parse(yaml).unwrap();
        assert_eq!(names(&refs), vec!["contracts/Foo.sol"]);
    }

    #[test]
    fn test_non_mapping_networks_are_ignored() {
        let yaml = r#"
version: "1.2"
owners:
  - alice
  - bob
mainnet:
  rpc: https://example.invalid
kovan:
  contracts:
"#;
        assert!(parse(yaml).unwrap().is_empty());
    }

    #[test]
    fn test_empty_document() {
        assert!(parse("").unwrap().is_empty());
    }

    #[test]
    fn test_missing_contract_file_is_fatal() {
        let err = parse("mainnet:\n  contracts:\n    a:\n      address: '0x0'\n").unwrap_err();
        assert!(matches!(
            err,
            RunnerError::MissingContractFile { ref network, ref entry, .. }
                if network == "mainnet" && entry == "a"
        ));
    }

    #[test]
    fn test_non_string_contract_file_is_fatal() {
        let err = parse("mainnet:\n  contracts:\n    a:\n      contract_file: [1, 2]\n").unwrap_err();
        assert!(matches!(err, RunnerError::InvalidContractFile { .. }));
    }

    #[test]
    fn test_malformed_yaml_is_fatal() {
        let err = parse("mainnet: [unclosed").unwrap_err();
        assert!(matches!(err, RunnerError::ConfigParse { .. }));
    }

    #[test]
    fn test_contract_ref_names() {
        let r = ContractRef::from_contract_file("tokens/Burnable.Token.sol");
        assert_eq!(r.as_str(), "contracts/tokens/Burnable.Token.sol");
        assert_eq!(r.basename(), "Burnable.Token.sol");
        assert_eq!(r.report_name(), "Burnable.Token.sol.html");
        assert_eq!(r.label(), "Burnable.Token");
    }

    #[test]
    fn test_load_config_resolves_base_dir() {
        let root = TempDir::new().unwrap();
        std::fs::create_dir(root.path().join("config")).unwrap();
        let cfg = root.path().join("config").join("mainnet.yaml");
        std::fs::write(&cfg, "mainnet:\n  contracts:\n    a:\n      contract_file: Foo.sol\n").unwrap();

        let loaded = load_config(&cfg).unwrap();
        assert_eq!(loaded.base_dir, root.path());
        assert_eq!(
            loaded.contracts[0].resolve(&loaded.base_dir),
            loaded.base_dir.join("contracts/Foo.sol")
        );
    }

    #[test]
    fn test_merge_keys_are_resolved() {
        let yaml = r#"
templates:
  common: &common
    contracts:
      t:
        contract_file: T.sol
mainnet:
  <<: *common
"#;
        let refs = parse(yaml).unwrap();
        assert_eq!(names(&refs), vec!["contracts/T.sol"]);
    }

    #[test]
    fn test_local_contracts_shadow_merged_ones() {
        let yaml = r#"
templates:
  base: &base
    contracts:
      a:
        contract_file: A.sol
kovan:
  <<: *base
  contracts:
    b:
      contract_file: B.sol
"#;
        let refs = parse(yaml).unwrap();
        assert_eq!(names(&refs), vec!["contracts/B.sol"]);
    }

    #[test]
    fn test_base_dir_at_filesystem_root() {
        assert_eq!(project_base_dir(Path::new("/x.yaml")).unwrap(), PathBuf::from("/"));
    }

    #[test]
    fn test_base_dir_is_lexical() {
        assert_eq!(
            project_base_dir(Path::new("/srv/project/./config/../config/net.yaml")).unwrap(),
            PathBuf::from("/srv/project")
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_base_dir_does_not_follow_symlinks() {
        let root = TempDir::new().unwrap();
        let elsewhere = root.path().join("shared").join("configs");
        std::fs::create_dir_all(&elsewhere).unwrap();
        std::fs::write(elsewhere.join("net.yaml"), "{}").unwrap();

        let project = root.path().join("project");
        std::fs::create_dir(&project).unwrap();
        std::os::unix::fs::symlink(&elsewhere, project.join("config")).unwrap();

        let base = project_base_dir(&project.join("config").join("net.yaml")).unwrap();
        assert_eq!(base, project);
    }

    #[test]
    fn test_load_config_missing_file() {
        let err = load_config(Path::new("/nonexistent/config/x.yaml")).unwrap_err();
        assert!(matches!(err, RunnerError::ConfigRead { .. }));
    }
}
