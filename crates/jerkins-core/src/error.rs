//! Error types for jerkins.

use thiserror::Error;

/// A version-control query that could not be run or did not succeed.
#[derive(Debug, Error)]
pub enum VcsError {
    #[error("failed to run `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`{command}` exited with {status}: {stderr}")]
    Failed {
        command: String,
        status: String,
        stderr: String,
    },
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("version control query failed: {0}")]
    Vcs(#[from] VcsError),

    #[error("failed to resolve job parameters: {0}")]
    Resolution(#[source] VcsError),

    #[error("submission failed: {0}")]
    Submission(String),

    #[error("poll failed: {0}")]
    Poll(String),
}

pub type Result<T> = std::result::Result<T, Error>;
