//! Remote job-queue traits.
//!
//! A job is enqueued with its parameters, which yields a [`QueueId`]. Once the
//! remote server schedules the item, a [`BuildHandle`] tracks the concrete
//! build until it reaches a terminal state.

use async_trait::async_trait;

use crate::{BuildNumber, BuildResult, ParameterSet, QueueId, Result};

/// Trait for remote job queues.
#[async_trait]
pub trait JobQueue: Send + Sync {
    /// Verify the remote server is reachable and prepare the session.
    async fn initialize(&self) -> Result<()>;

    /// Enqueue a build of `job` with the given parameters.
    async fn enqueue(&self, job: &str, params: &ParameterSet) -> Result<QueueId>;

    /// Wait for the queue item to become a build and return a handle to it.
    async fn handle_from_queue_id(&self, queue_id: QueueId) -> Result<Box<dyn BuildHandle>>;
}

/// Handle to a submitted build.
///
/// `is_running`, `result` and `build_number` read the state captured by the
/// last fetch; only `refresh` talks to the remote server.
#[async_trait]
pub trait BuildHandle: Send {
    fn is_running(&self) -> bool;

    async fn refresh(&mut self) -> Result<()>;

    /// Result code of the build. Only meaningful once `is_running` is false.
    fn result(&self) -> BuildResult;

    fn build_number(&self) -> BuildNumber;
}
