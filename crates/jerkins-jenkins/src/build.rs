//! Handle to a scheduled Jenkins build.

use crate::client::Http;
use crate::error::JenkinsError;
use crate::models::BuildInfo;
use async_trait::async_trait;
use jerkins_core::{BuildHandle, BuildNumber, BuildResult};
use tracing::debug;

/// A Jenkins build, tracked through its `api/json` endpoint.
pub struct JenkinsBuild {
    http: Http,
    api_url: String,
    info: BuildInfo,
}

impl JenkinsBuild {
    /// Fetch the current state of the build at `build_url`.
    pub(crate) async fn fetch(http: Http, build_url: &str) -> Result<Self, JenkinsError> {
        let api_url = format!("{}/api/json", build_url.trim_end_matches('/'));
        let info = http.get_json(&api_url).await?;
        Ok(Self {
            http,
            api_url,
            info,
        })
    }
}

#[async_trait]
impl BuildHandle for JenkinsBuild {
    fn is_running(&self) -> bool {
        self.info.building
    }

    async fn refresh(&mut self) -> jerkins_core::Result<()> {
        self.info = self
            .http
            .get_json(&self.api_url)
            .await
            .map_err(JenkinsError::into_poll)?;
        debug!(number = self.info.number, building = self.info.building, "Refreshed build");
        Ok(())
    }

    fn result(&self) -> BuildResult {
        BuildResult::from_code(self.info.result.as_deref().unwrap_or_default())
    }

    fn build_number(&self) -> BuildNumber {
        BuildNumber::new(self.info.number)
    }
}
