//! Progress events and where they go.

use jerkins_core::{BuildNumber, BuildResult, QueueId};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Something worth telling the user about while a build is triggered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildEvent {
    ParameterResolved { name: String, value: String },
    UncommittedChanges { branch: String, count: usize },
    Submitted { job: String, queue_id: QueueId },
    Started { job: String, build_number: BuildNumber },
    StillBuilding { build_number: BuildNumber },
    Finished { job: String, build_number: BuildNumber, result: BuildResult },
    ConsoleLink { url: String },
}

/// Receiver of build events.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: BuildEvent);
}

/// Writes events as tracing records.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn emit(&self, event: BuildEvent) {
        match event {
            BuildEvent::ParameterResolved { name, value } => {
                debug!(name = %name, value = %value, "Resolved job parameter");
            }
            BuildEvent::UncommittedChanges { branch, count } => {
                warn!(branch = %branch, len = count, "You have uncommitted changes on your current branch");
            }
            BuildEvent::Submitted { job, queue_id } => {
                debug!(job = %job, queue_id = %queue_id, "Build queued");
            }
            BuildEvent::Started { job, build_number } => {
                info!(job = %job, build = %build_number, "Build started");
            }
            BuildEvent::StillBuilding { build_number } => {
                debug!(build = %build_number, "Still building");
            }
            BuildEvent::Finished { job, build_number, result } => {
                info!(job = %job, build = %build_number, result = %result, "Build done");
            }
            BuildEvent::ConsoleLink { url } => {
                info!(link = %url, "Logs");
            }
        }
    }
}

/// Forwards events to a channel; a closed receiver drops them.
impl EventSink for mpsc::UnboundedSender<BuildEvent> {
    fn emit(&self, event: BuildEvent) {
        let _ = self.send(event);
    }
}
