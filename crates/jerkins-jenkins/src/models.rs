//! Response bodies of the Jenkins JSON API, trimmed to the fields in use.

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Crumb {
    pub crumb: String,
    pub crumb_request_field: String,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct QueueItem {
    #[serde(default)]
    pub cancelled: bool,
    pub why: Option<String>,
    pub executable: Option<Executable>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct Executable {
    pub number: u64,
    pub url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct BuildInfo {
    pub number: u64,
    #[serde(default)]
    pub building: bool,
    pub result: Option<String>,
}
