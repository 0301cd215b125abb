//! Jenkins client errors.

use jerkins_core::QueueId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum JenkinsError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("{url} returned {status}: {body}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("unexpected response: {0}")]
    Parse(String),

    #[error("response did not include a queue item location")]
    MissingLocation,

    #[error("queue item {id} was cancelled: {reason}")]
    Cancelled { id: QueueId, reason: String },

    #[error("queue item {0} was not enqueued by this client")]
    UnknownQueueItem(QueueId),
}

impl JenkinsError {
    pub fn into_submission(self) -> jerkins_core::Error {
        jerkins_core::Error::Submission(self.to_string())
    }

    pub fn into_poll(self) -> jerkins_core::Error {
        jerkins_core::Error::Poll(self.to_string())
    }
}
