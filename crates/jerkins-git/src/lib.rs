//! Git working-copy probe.
//!
//! Runs read-only `git` queries in a working copy and implements
//! [`VersionControl`] on top of them.

use async_trait::async_trait;
use jerkins_core::{VcsError, VersionControl};
use std::path::PathBuf;
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

/// Probe backed by the `git` binary.
pub struct GitProbe {
    /// Directory the queries run in
    repo_dir: PathBuf,
}

impl GitProbe {
    pub fn new(repo_dir: impl Into<PathBuf>) -> Self {
        Self {
            repo_dir: repo_dir.into(),
        }
    }

    /// Run a git query and return its trimmed stdout.
    async fn run_git(&self, args: &[&str]) -> Result<String, VcsError> {
        let command = format!("git {}", args.join(" "));
        debug!(command = %command, dir = %self.repo_dir.display(), "Running git query");

        let output = Command::new("git")
            .args(args)
            .current_dir(&self.repo_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|source| VcsError::Spawn {
                command: command.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(VcsError::Failed {
                command,
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

#[async_trait]
impl VersionControl for GitProbe {
    async fn current_branch(&self) -> Result<String, VcsError> {
        self.run_git(&["rev-parse", "--abbrev-ref", "HEAD"]).await
    }

    async fn uncommitted_change_count(&self) -> Result<usize, VcsError> {
        let status = self.run_git(&["status", "--porcelain=v1"]).await?;
        Ok(count_status_lines(&status))
    }

    async fn short_commit_id(&self, branch: &str) -> Result<String, VcsError> {
        self.run_git(&["rev-parse", "--short", "--verify", "--end-of-options", branch])
            .await
    }
}

/// Number of paths listed in porcelain status output.
fn count_status_lines(status: &str) -> usize {
    status.lines().filter(|l| !l.trim().is_empty()).count()
}
