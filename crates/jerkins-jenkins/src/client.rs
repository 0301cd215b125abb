//! Jenkins REST client.

use crate::build::JenkinsBuild;
use crate::error::JenkinsError;
use crate::models::{Crumb, QueueItem};
use async_trait::async_trait;
use jerkins_core::{BuildHandle, JobQueue, ParameterSet, QueueId, job_path};
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::debug;

/// How often a pending queue item is checked for a build number.
pub const DEFAULT_QUEUE_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// HTTP client plus the credentials every request is sent with.
#[derive(Clone)]
pub(crate) struct Http {
    client: reqwest::Client,
    credentials: Option<(String, Option<String>)>,
}

impl Http {
    fn authed(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.credentials {
            Some((user, password)) => request.basic_auth(user, password.as_deref()),
            None => request,
        }
    }

    pub(crate) async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, JenkinsError> {
        let response = self.authed(self.client.get(url)).send().await?;
        let response = check_status(url, response).await?;
        response
            .json()
            .await
            .map_err(|e| JenkinsError::Parse(format!("{}: {}", url, e)))
    }
}

async fn check_status(url: &str, response: Response) -> Result<Response, JenkinsError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(JenkinsError::Status {
        url: url.to_string(),
        status,
        body,
    })
}

/// Jenkins server client.
pub struct JenkinsClient {
    http: Http,
    /// Server base URL without a trailing slash
    base_url: String,
    /// CSRF crumb, fetched by `initialize` when the server issues one
    crumb: RwLock<Option<Crumb>>,
    /// Job name of every item this client enqueued
    queued: RwLock<HashMap<QueueId, String>>,
    queue_poll_interval: Duration,
}

impl JenkinsClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        // Crumbs are bound to the session that requested them.
        let client = reqwest::Client::builder()
            .cookie_store(true)
            .build()
            .unwrap_or_default();
        Self {
            http: Http {
                client,
                credentials: None,
            },
            base_url,
            crumb: RwLock::new(None),
            queued: RwLock::new(HashMap::new()),
            queue_poll_interval: DEFAULT_QUEUE_POLL_INTERVAL,
        }
    }

    pub fn with_credentials(mut self, user: impl Into<String>, password: Option<String>) -> Self {
        self.http.credentials = Some((user.into(), password));
        self
    }

    pub fn with_queue_poll_interval(mut self, interval: Duration) -> Self {
        self.queue_poll_interval = interval;
        self
    }

    /// URL of a job. Folder jobs (`team/nightly`) nest as `job/team/job/nightly`.
    pub fn job_url(&self, job: &str) -> String {
        format!("{}/{}", self.base_url, job_path(job))
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, JenkinsError> {
        self.http.get_json(url).await
    }

    async fn connect(&self) -> Result<(), JenkinsError> {
        let url = format!("{}/api/json", self.base_url);
        let _: serde_json::Value = self.get_json(&url).await?;

        let crumb = self.fetch_crumb().await?;
        debug!(crumb = crumb.is_some(), "Connected to Jenkins");
        *self.crumb.write().await = crumb;
        Ok(())
    }

    async fn fetch_crumb(&self) -> Result<Option<Crumb>, JenkinsError> {
        let url = format!("{}/crumbIssuer/api/json", self.base_url);
        match self.get_json::<Crumb>(&url).await {
            Ok(crumb) => Ok(Some(crumb)),
            // CSRF protection is disabled on this server
            Err(JenkinsError::Status { status, .. }) if status == StatusCode::NOT_FOUND => {
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    async fn build_job(&self, job: &str, params: &ParameterSet) -> Result<QueueId, JenkinsError> {
        let url = if params.is_empty() {
            format!("{}/build", self.job_url(job))
        } else {
            format!("{}/buildWithParameters", self.job_url(job))
        };

        let mut request = self.http.authed(self.http.client.post(&url));
        if let Some(crumb) = self.crumb.read().await.as_ref() {
            request = request.header(crumb.crumb_request_field.as_str(), crumb.crumb.as_str());
        }
        if !params.is_empty() {
            request = request.form(&params.as_pairs());
        }

        let response = request.send().await?;
        let response = check_status(&url, response).await?;

        response
            .headers()
            .get(reqwest::header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .and_then(queue_id_from_location)
            .ok_or(JenkinsError::MissingLocation)
    }

    /// Wait for a queue item to be scheduled and fetch its build.
    ///
    /// The build is addressed under the configured base URL, never the `url`
    /// the queue item reports.
    async fn wait_for_build(&self, queue_id: QueueId) -> Result<JenkinsBuild, JenkinsError> {
        let job = self
            .queued
            .read()
            .await
            .get(&queue_id)
            .cloned()
            .ok_or(JenkinsError::UnknownQueueItem(queue_id))?;
        let url = format!("{}/queue/item/{}/api/json", self.base_url, queue_id);

        loop {
            let item: QueueItem = self.get_json(&url).await?;

            if item.cancelled {
                return Err(JenkinsError::Cancelled {
                    id: queue_id,
                    reason: item.why.unwrap_or_else(|| "no reason given".to_string()),
                });
            }

            if let Some(executable) = item.executable {
                debug!(
                    queue_id = %queue_id,
                    number = executable.number,
                    reported_url = %executable.url,
                    "Queue item scheduled"
                );
                let build_url = format!("{}/{}", self.job_url(&job), executable.number);
                return JenkinsBuild::fetch(self.http.clone(), &build_url).await;
            }

            debug!(queue_id = %queue_id, why = ?item.why, "Waiting in queue");
            tokio::time::sleep(self.queue_poll_interval).await;
        }
    }
}

/// Extract the queue id from a `.../queue/item/{id}/` location.
pub fn queue_id_from_location(location: &str) -> Option<QueueId> {
    location
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .and_then(|segment| segment.parse().ok())
}

#[async_trait]
impl JobQueue for JenkinsClient {
    async fn initialize(&self) -> jerkins_core::Result<()> {
        self.connect().await.map_err(JenkinsError::into_submission)
    }

    async fn enqueue(&self, job: &str, params: &ParameterSet) -> jerkins_core::Result<QueueId> {
        let queue_id = self
            .build_job(job, params)
            .await
            .map_err(JenkinsError::into_submission)?;
        self.queued
            .write()
            .await
            .insert(queue_id, job.to_string());
        debug!(job = %job, queue_id = %queue_id, "Job enqueued");
        Ok(queue_id)
    }

    async fn handle_from_queue_id(
        &self,
        queue_id: QueueId,
    ) -> jerkins_core::Result<Box<dyn BuildHandle>> {
        let build = self
            .wait_for_build(queue_id)
            .await
            .map_err(JenkinsError::into_poll)?;
        Ok(Box::new(build))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::{Form, Path, State};
    use axum::http::{HeaderMap, StatusCode as HttpStatus, header};
    use axum::response::IntoResponse;
    use axum::routing::{get, post};
    use axum::{Json, Router};
    use jerkins_core::{BuildNumber, BuildResult};
    use serde_json::json;
    use std::collections::HashMap;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use tokio::net::TcpListener;

    /// In-process stand-in for a Jenkins server.
    #[derive(Clone, Default)]
    struct FakeJenkins {
        base: Arc<Mutex<String>>,
        crumbs: bool,
        /// Crumbs are only accepted together with the session cookie
        sessions: bool,
        /// Queue items report build URLs under an unreachable root
        misreported_root: bool,
        cancel_queue: bool,
        queue_polls: Arc<AtomicUsize>,
        build_polls: Arc<AtomicUsize>,
        received: Arc<Mutex<Vec<(String, HashMap<String, String>)>>>,
    }

    impl FakeJenkins {
        fn base(&self) -> String {
            self.base.lock().unwrap().clone()
        }
    }

    async fn root() -> impl IntoResponse {
        Json(json!({ "mode": "NORMAL", "nodeName": "" }))
    }

    async fn crumb_issuer(State(fake): State<FakeJenkins>) -> impl IntoResponse {
        if fake.crumbs {
            let crumb = Json(json!({ "crumb": "c0ffee", "crumbRequestField": "Jenkins-Crumb" }));
            (
                [(header::SET_COOKIE, "JSESSIONID.1=s3ss10n; Path=/; HttpOnly")],
                crumb,
            )
                .into_response()
        } else {
            HttpStatus::NOT_FOUND.into_response()
        }
    }

    async fn build_with_parameters(
        State(fake): State<FakeJenkins>,
        Path(job): Path<String>,
        headers: HeaderMap,
        Form(form): Form<HashMap<String, String>>,
    ) -> impl IntoResponse {
        if fake.crumbs && headers.get("Jenkins-Crumb").and_then(|v| v.to_str().ok()) != Some("c0ffee") {
            return HttpStatus::FORBIDDEN.into_response();
        }
        let session = headers
            .get(header::COOKIE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.contains("JSESSIONID.1=s3ss10n"));
        if fake.sessions && !session {
            return HttpStatus::FORBIDDEN.into_response();
        }
        fake.received.lock().unwrap().push((job, form));
        let location = format!("{}/queue/item/7/", fake.base());
        (HttpStatus::CREATED, [(header::LOCATION, location)]).into_response()
    }

    async fn queue_item(
        State(fake): State<FakeJenkins>,
        Path(id): Path<u64>,
    ) -> impl IntoResponse {
        assert_eq!(id, 7);
        if fake.cancel_queue {
            return Json(json!({ "cancelled": true, "why": "duplicate build" }));
        }
        let polls = fake.queue_polls.fetch_add(1, Ordering::SeqCst);
        if polls == 0 {
            Json(json!({ "why": "Waiting for next available executor", "executable": null }))
        } else {
            let root = if fake.misreported_root {
                "http://127.0.0.1:9".to_string()
            } else {
                fake.base()
            };
            let url = format!("{}/job/nightly/42/", root);
            Json(json!({ "executable": { "number": 42, "url": url } }))
        }
    }

    async fn build_info(State(fake): State<FakeJenkins>) -> impl IntoResponse {
        let polls = fake.build_polls.fetch_add(1, Ordering::SeqCst);
        if polls < 2 {
            Json(json!({ "number": 42, "building": true, "result": null }))
        } else {
            Json(json!({ "number": 42, "building": false, "result": "FAILURE" }))
        }
    }

    async fn spawn_fake(fake: FakeJenkins) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());
        *fake.base.lock().unwrap() = base.clone();

        let app = Router::new()
            .route("/api/json", get(root))
            .route("/crumbIssuer/api/json", get(crumb_issuer))
            .route("/job/{job}/buildWithParameters", post(build_with_parameters))
            .route("/queue/item/{id}/api/json", get(queue_item))
            .route("/job/nightly/42/api/json", get(build_info))
            .route("/job/team/job/nightly/42/api/json", get(build_info))
            .route("/job/team/job/{job}/buildWithParameters", post(build_with_parameters))
            .with_state(fake);

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        base
    }

    fn client(base: &str) -> JenkinsClient {
        JenkinsClient::new(base).with_queue_poll_interval(Duration::from_millis(10))
    }

    #[test]
    fn test_job_url_nests_folders() {
        let client = JenkinsClient::new("https://ci.example/");
        assert_eq!(client.job_url("nightly"), "https://ci.example/job/nightly");
        assert_eq!(
            client.job_url("team/release build"),
            "https://ci.example/job/team/job/release%20build"
        );
    }

    #[test]
    fn test_queue_id_from_location() {
        assert_eq!(
            queue_id_from_location("https://ci.example/queue/item/1287/"),
            Some(QueueId::new(1287))
        );
        assert_eq!(
            queue_id_from_location("https://ci.example/queue/item/55"),
            Some(QueueId::new(55))
        );
        assert_eq!(queue_id_from_location("https://ci.example/job/nightly/"), None);
    }

    #[tokio::test]
    async fn test_submit_and_track_build() {
        let fake = FakeJenkins {
            crumbs: true,
            ..Default::default()
        };
        let base = spawn_fake(fake.clone()).await;
        let client = client(&base);

        client.initialize().await.unwrap();

        let params: ParameterSet = [("branch", "feature-x"), ("tag", "a1b2c3d")]
            .into_iter()
            .collect();
        let queue_id = client.enqueue("nightly", &params).await.unwrap();
        assert_eq!(queue_id, QueueId::new(7));

        {
            let received = fake.received.lock().unwrap();
            assert_eq!(received.len(), 1);
            assert_eq!(received[0].0, "nightly");
            assert_eq!(received[0].1.get("branch").map(String::as_str), Some("feature-x"));
            assert_eq!(received[0].1.get("tag").map(String::as_str), Some("a1b2c3d"));
        }

        let mut build = client.handle_from_queue_id(queue_id).await.unwrap();
        assert_eq!(fake.queue_polls.load(Ordering::SeqCst), 2);
        assert_eq!(build.build_number(), BuildNumber::new(42));
        assert!(build.is_running());

        build.refresh().await.unwrap();
        assert!(build.is_running());
        build.refresh().await.unwrap();
        assert!(!build.is_running());
        assert_eq!(build.result(), BuildResult::Failure);
    }

    #[tokio::test]
    async fn test_build_is_tracked_under_configured_base() {
        let fake = FakeJenkins {
            misreported_root: true,
            ..Default::default()
        };
        let base = spawn_fake(fake.clone()).await;
        let client = client(&base);

        let params: ParameterSet = [("env", "prod")].into_iter().collect();
        let queue_id = client.enqueue("nightly", &params).await.unwrap();
        let mut build = client.handle_from_queue_id(queue_id).await.unwrap();
        assert_eq!(build.build_number(), BuildNumber::new(42));

        build.refresh().await.unwrap();
        build.refresh().await.unwrap();
        assert!(!build.is_running());
        assert_eq!(fake.build_polls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_folder_build_is_tracked_under_nested_job_path() {
        let fake = FakeJenkins::default();
        let base = spawn_fake(fake.clone()).await;
        let client = client(&base);

        let params: ParameterSet = [("env", "prod")].into_iter().collect();
        let queue_id = client.enqueue("team/nightly", &params).await.unwrap();
        let build = client.handle_from_queue_id(queue_id).await.unwrap();

        assert_eq!(build.build_number(), BuildNumber::new(42));
        assert_eq!(fake.build_polls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_session_cookie_accompanies_crumb() {
        let fake = FakeJenkins {
            crumbs: true,
            sessions: true,
            ..Default::default()
        };
        let base = spawn_fake(fake.clone()).await;
        let client = client(&base);

        client.initialize().await.unwrap();
        let params: ParameterSet = [("env", "prod")].into_iter().collect();
        assert_eq!(
            client.enqueue("nightly", &params).await.unwrap(),
            QueueId::new(7)
        );
    }

    #[tokio::test]
    async fn test_foreign_queue_item_is_poll_error() {
        let base = spawn_fake(FakeJenkins::default()).await;
        let client = client(&base);

        let err = client
            .handle_from_queue_id(QueueId::new(7))
            .await
            .err()
            .unwrap();
        assert!(matches!(err, jerkins_core::Error::Poll(_)));
    }

    #[tokio::test]
    async fn test_missing_crumb_issuer_is_not_an_error() {
        let base = spawn_fake(FakeJenkins::default()).await;
        let client = client(&base);

        client.initialize().await.unwrap();
        assert!(client.crumb.read().await.is_none());

        let params: ParameterSet = [("env", "prod")].into_iter().collect();
        assert!(client.enqueue("nightly", &params).await.is_ok());
    }

    #[tokio::test]
    async fn test_cancelled_queue_item_is_poll_error() {
        let fake = FakeJenkins {
            cancel_queue: true,
            ..Default::default()
        };
        let base = spawn_fake(fake).await;
        let client = client(&base);

        let params: ParameterSet = [("env", "prod")].into_iter().collect();
        let queue_id = client.enqueue("nightly", &params).await.unwrap();
        let err = client
            .handle_from_queue_id(queue_id)
            .await
            .err()
            .unwrap();
        assert!(matches!(err, jerkins_core::Error::Poll(_)));
        assert!(err.to_string().contains("duplicate build"));
    }

    #[tokio::test]
    async fn test_unknown_job_is_submission_error() {
        let base = spawn_fake(FakeJenkins::default()).await;
        let client = client(&base);

        let params: ParameterSet = [("env", "prod")].into_iter().collect();
        let err = client.enqueue("ops/missing", &params).await.unwrap_err();
        assert!(matches!(err, jerkins_core::Error::Submission(_)));
    }

    #[tokio::test]
    async fn test_unreachable_server_fails_initialize() {
        let client = client("http://127.0.0.1:9");
        let err = client.initialize().await.unwrap_err();
        assert!(matches!(err, jerkins_core::Error::Submission(_)));
    }
}
