//! Version-control probe trait.
//!
//! Probes run read-only queries against a local working copy.

use async_trait::async_trait;
use serde::Serialize;

use crate::VcsError;

/// Snapshot of the working copy, computed fresh for every run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepositoryState {
    pub branch: String,
    pub short_commit_id: String,
    pub uncommitted_changes: usize,
}

/// Trait for version-control probes.
#[async_trait]
pub trait VersionControl: Send + Sync {
    /// Abbreviated name of the currently checked out ref.
    async fn current_branch(&self) -> Result<String, VcsError>;

    /// Number of changed or untracked paths in the working tree.
    async fn uncommitted_change_count(&self) -> Result<usize, VcsError>;

    /// Abbreviated, verified revision id of `branch`.
    async fn short_commit_id(&self, branch: &str) -> Result<String, VcsError>;

    /// Query all three values at once.
    async fn state(&self) -> Result<RepositoryState, VcsError> {
        let branch = self.current_branch().await?;
        let short_commit_id = self.short_commit_id(&branch).await?;
        let uncommitted_changes = self.uncommitted_change_count().await?;
        Ok(RepositoryState {
            branch,
            short_commit_id,
            uncommitted_changes,
        })
    }
}
