//! Build orchestrator - submits a job and waits for its build to finish.

use crate::events::{BuildEvent, EventSink};
use jerkins_core::{BuildOutcome, JobQueue, ParameterSet, Result, VersionControl};
use std::sync::Arc;
use std::time::Duration;
use tracing::instrument;

/// Delay between two refreshes of a running build.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(3);

/// Drives a build from submission to its terminal state.
///
/// The wait is unbounded: a build that never finishes keeps the caller
/// blocked, and aborting the process leaves the remote build running.
pub struct BuildOrchestrator {
    queue: Arc<dyn JobQueue>,
    vcs: Arc<dyn VersionControl>,
    sink: Arc<dyn EventSink>,
    poll_interval: Duration,
}

impl BuildOrchestrator {
    pub fn new(
        queue: Arc<dyn JobQueue>,
        vcs: Arc<dyn VersionControl>,
        sink: Arc<dyn EventSink>,
    ) -> Self {
        Self {
            queue,
            vcs,
            sink,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// Submit `job_name` with `params` and block until the build terminates.
    #[instrument(skip(self, params), fields(params = params.len()))]
    pub async fn submit_and_await(
        &self,
        job_name: &str,
        params: &ParameterSet,
    ) -> Result<BuildOutcome> {
        self.warn_on_uncommitted_changes().await?;

        // Submitted
        let queue_id = self.queue.enqueue(job_name, params).await?;
        self.sink.emit(BuildEvent::Submitted {
            job: job_name.to_string(),
            queue_id,
        });

        let mut build = self.queue.handle_from_queue_id(queue_id).await?;
        let build_number = build.build_number();
        self.sink.emit(BuildEvent::Started {
            job: job_name.to_string(),
            build_number,
        });

        // Tracking
        while build.is_running() {
            self.sink.emit(BuildEvent::StillBuilding { build_number });
            tokio::time::sleep(self.poll_interval).await;
            build.refresh().await?;
        }

        // Terminal
        Ok(BuildOutcome {
            job_name: job_name.to_string(),
            build_number,
            result: build.result(),
        })
    }

    /// Uncommitted changes never block a submission.
    async fn warn_on_uncommitted_changes(&self) -> Result<()> {
        let count = self.vcs.uncommitted_change_count().await?;
        if count > 0 {
            let branch = self.vcs.current_branch().await.unwrap_or_default();
            self.sink.emit(BuildEvent::UncommittedChanges { branch, count });
        }
        Ok(())
    }
}
