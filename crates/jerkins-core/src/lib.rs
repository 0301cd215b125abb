//! Core domain types and traits for jerkins.
//!
//! This crate contains:
//! - Job parameters and the recognized parameter keys
//! - The version-control probe trait and repository state
//! - The remote job-queue and build-handle traits
//! - Build results and outcomes
//! - The error taxonomy shared by every other crate

pub mod error;
pub mod id;
pub mod outcome;
pub mod params;
pub mod queue;
pub mod vcs;

pub use error::{Error, Result, VcsError};
pub use id::{BuildNumber, QueueId};
pub use outcome::{BuildOutcome, BuildResult, job_path};
pub use params::{ParamKey, Parameter, ParameterSet};
pub use queue::{BuildHandle, JobQueue};
pub use vcs::{RepositoryState, VersionControl};
