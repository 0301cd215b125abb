//! Build results and outcomes.

use derive_more::Display;
use serde::{Deserialize, Serialize};

use crate::BuildNumber;

/// Terminal result code reported by the remote server.
///
/// Parsing is case-sensitive; codes outside the known vocabulary are kept
/// verbatim in [`BuildResult::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum BuildResult {
    #[display("SUCCESS")]
    Success,
    #[display("FAILURE")]
    Failure,
    #[display("UNSTABLE")]
    Unstable,
    #[display("ABORTED")]
    Aborted,
    #[display("NOT_BUILT")]
    NotBuilt,
    #[display("{_0}")]
    Other(String),
}

impl BuildResult {
    pub fn from_code(code: &str) -> Self {
        match code {
            "SUCCESS" => BuildResult::Success,
            "FAILURE" => BuildResult::Failure,
            "UNSTABLE" => BuildResult::Unstable,
            "ABORTED" => BuildResult::Aborted,
            "NOT_BUILT" => BuildResult::NotBuilt,
            other => BuildResult::Other(other.to_string()),
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, BuildResult::Failure)
    }
}

/// What a finished build ended up as.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildOutcome {
    pub job_name: String,
    pub build_number: BuildNumber,
    pub result: BuildResult,
}

impl BuildOutcome {
    /// Console log link for this build under `base_url`.
    pub fn console_url(&self, base_url: &str) -> String {
        format!(
            "{}/{}/{}/console",
            base_url,
            job_path(&self.job_name),
            self.build_number
        )
    }
}

/// Path of a job below the server root. Folder jobs (`team/nightly`) nest as
/// `job/team/job/nightly`; a flat job is just `job/nightly`.
pub fn job_path(job: &str) -> String {
    job.split('/')
        .filter(|segment| !segment.is_empty())
        .map(|segment| format!("job/{}", urlencoding::encode(segment)))
        .collect::<Vec<_>>()
        .join("/")
}
