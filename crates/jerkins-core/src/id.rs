//! Identifiers handed out by the remote job queue.

use derive_more::{Display, From};
use serde::{Deserialize, Serialize};

/// Identifier of a pending item in the remote job queue.
///
/// Only meaningful until the queue schedules a concrete build.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display, From,
)]
#[display("{_0}")]
pub struct QueueId(u64);

impl QueueId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn get(&self) -> u64 {
        self.0
    }
}

impl std::str::FromStr for QueueId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self(s.parse()?))
    }
}

/// Sequential number the remote server assigns to a build of a job.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display, From,
)]
#[display("{_0}")]
pub struct BuildNumber(u64);

impl BuildNumber {
    pub fn new(number: u64) -> Self {
        Self(number)
    }

    pub fn get(&self) -> u64 {
        self.0
    }
}
