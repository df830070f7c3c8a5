//! # Repository Metadata Probe
//!
//! @title Git Run Header
//! @author Ramprasad
//!
//! Stamps the report index with the commit, branch and origin of the
//! repository holding the configs. The information is only trustworthy when
//! the working tree matches the commit, so the probe gives up if tracked
//! files are modified or any config or `.sol` file is untracked.
//!
//! Nothing here can fail a run: every problem degrades to [`NOT_AVAILABLE`].

use serde::Serialize;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Placeholder for fields that could not be determined.
pub const NOT_AVAILABLE: &str = "N/A";

/// Informational header rendered at the top of the index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunHeader {
    pub date: String,
    pub git_commit: String,
    pub git_ref: String,
    pub git_origin_url: String,
}

impl RunHeader {
    /// Today's date with every git field set to [`NOT_AVAILABLE`].
    pub fn unavailable() -> Self {
        Self {
            date: chrono::Local::now().date_naive().to_string(),
            git_commit: NOT_AVAILABLE.to_string(),
            git_ref: NOT_AVAILABLE.to_string(),
            git_origin_url: NOT_AVAILABLE.to_string(),
        }
    }

    /// Probes the repository enclosing the first config.
    pub fn probe(configs: &[PathBuf]) -> Self {
        let mut header = Self::unavailable();

        let Some(first) = configs.first() else {
            return header;
        };
        let Ok(dir) = crate::config::project_base_dir(first) else {
            log::warn!("cannot resolve {}, skipping git info", first.display());
            return header;
        };

        match Repo::open(&dir) {
            Some(repo) if repo.is_clean(configs) => {
                if let Some(commit) = repo.head_commit() {
                    header.git_commit = commit;
                }
                if let Some(branch) = repo.head_branch() {
                    header.git_ref = branch;
                }
                if let Some(url) = repo.origin_url() {
                    header.git_origin_url = url;
                }
            }
            Some(_) => log::warn!("working tree at {} is not clean, skipping git info", dir.display()),
            None => log::warn!("{} is not inside a git work tree, skipping git info", dir.display()),
        }

        header
    }
}

/// Thin wrapper over the `git` executable.
struct Repo {
    toplevel: PathBuf,
}

impl Repo {
    /// Opens the non-bare work tree containing `dir`.
    fn open(dir: &Path) -> Option<Self> {
        let bare = git(dir, &["rev-parse", "--is-bare-repository"])?;
        if bare == "true" {
            return None;
        }
        let toplevel = git(dir, &["rev-parse", "--show-toplevel"])?;
        let toplevel = std::fs::canonicalize(&toplevel).unwrap_or_else(|_| PathBuf::from(toplevel));
        Some(Self { toplevel })
    }

    fn run(&self, args: &[&str]) -> Option<String> {
        git(&self.toplevel, args)
    }

    fn is_dirty(&self) -> bool {
        match self.run(&["status", "--porcelain", "--untracked-files=no"]) {
            Some(status) => !status.is_empty(),
            None => true,
        }
    }

    /// NUL-separated so paths come back unquoted.
    fn untracked_files(&self) -> Option<Vec<PathBuf>> {
        self.run(&["ls-files", "-z", "--others", "--exclude-standard", "--full-name"])
            .map(|out| {
                out.split('\0')
                    .filter(|path| !path.is_empty())
                    .map(PathBuf::from)
                    .collect()
            })
    }

    fn is_clean(&self, configs: &[PathBuf]) -> bool {
        if self.is_dirty() {
            return false;
        }
        let Some(untracked) = self.untracked_files() else {
            return false;
        };

        let configs: Vec<PathBuf> = configs
            .iter()
            .filter_map(|c| std::fs::canonicalize(c).ok())
            .filter_map(|c| pathdiff::diff_paths(c, &self.toplevel))
            .collect();

        !untracked_blocks_probe(&untracked, &configs)
    }

    fn head_commit(&self) -> Option<String> {
        self.run(&["rev-parse", "HEAD"])
    }

    /// `None` on a detached HEAD.
    fn head_branch(&self) -> Option<String> {
        self.run(&["symbolic-ref", "--short", "-q", "HEAD"])
    }

    fn origin_url(&self) -> Option<String> {
        self.run(&["remote", "get-url", "origin"])
    }
}

/// True if any untracked path is a config or a Solidity source.
fn untracked_blocks_probe(untracked: &[PathBuf], configs: &[PathBuf]) -> bool {
    untracked.iter().any(|path| {
        configs.contains(path) || path.extension().map_or(false, |ext| ext == "sol")
    })
}

/// Runs `git -C dir args...`, returning trimmed stdout on success.
fn git(dir: &Path, args: &[&str]) -> Option<String> {
    let output = Command::new("git")
        .arg("-C")
        .arg(dir)
        .args(args)
        .output()
        .map_err(|e| log::debug!("git unavailable: {}", e))
        .ok()?;

    if !output.status.success() {
        log::debug!(
            "git {} failed: {}",
            args.join(" "),
            String::from_utf8_lossy(&output.stderr).trim()
        );
        return None;
    }

    let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
    Some(stdout)
}
