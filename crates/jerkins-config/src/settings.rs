//! Remote server settings.

use crate::{ConfigError, ConfigResult};
use std::path::PathBuf;
use url::Url;

/// Validated settings for a single run.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Server base URL without a trailing slash.
    pub base_url: String,
    pub username: Option<String>,
    pub password: Option<String>,
    /// Job name, folders separated by `/`.
    pub job: String,
    /// Path to the job parameter declaration.
    pub job_params: PathBuf,
}

impl Settings {
    pub fn new(
        base_url: &str,
        username: Option<String>,
        password: Option<String>,
        job: &str,
        job_params: impl Into<PathBuf>,
    ) -> ConfigResult<Self> {
        let parsed = Url::parse(base_url).map_err(|e| ConfigError::InvalidValue {
            field: "jenkins-base".to_string(),
            message: e.to_string(),
        })?;

        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidValue {
                field: "jenkins-base".to_string(),
                message: format!("unsupported scheme: {}", parsed.scheme()),
            });
        }

        let job = job.trim_matches('/');
        if job.is_empty() {
            return Err(ConfigError::MissingField("jenkins-job".to_string()));
        }

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            username: username.filter(|u| !u.is_empty()),
            password: password.filter(|p| !p.is_empty()),
            job: job.to_string(),
            job_params: job_params.into(),
        })
    }

    /// Credentials for basic auth, if a user is configured.
    pub fn credentials(&self) -> Option<(&str, Option<&str>)> {
        self.username
            .as_deref()
            .map(|user| (user, self.password.as_deref()))
    }
}
