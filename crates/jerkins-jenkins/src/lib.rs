//! Jenkins job-queue client for jerkins.
//!
//! Implements [`JobQueue`] and [`BuildHandle`] over the Jenkins REST API:
//! - `buildWithParameters` to enqueue a job
//! - `queue/item/{id}` to wait for a build number
//! - `job/.../{number}/api/json` to track the build

pub mod build;
pub mod client;
pub mod error;
mod models;

pub use build::JenkinsBuild;
pub use client::JenkinsClient;
pub use error::JenkinsError;
pub use jerkins_core::{BuildHandle, JobQueue};
