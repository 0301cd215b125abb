//! Trigger a job and wait for its build.

use anyhow::{Context, Result};
use jerkins_config::{Settings, load_parameters};
use jerkins_core::{JobQueue, ParameterSet, RepositoryState, VersionControl};
use jerkins_git::GitProbe;
use jerkins_jenkins::JenkinsClient;
use jerkins_scheduler::{
    BuildOrchestrator, EventSink, OutcomeReporter, ParameterResolver, TracingSink,
};
use std::path::Path;
use std::sync::Arc;

/// Resolve the declared parameters, trigger the job and report its outcome.
pub async fn run(settings: &Settings, repo: &Path, dry_run: bool) -> Result<()> {
    let sink: Arc<dyn EventSink> = Arc::new(TracingSink);
    let vcs: Arc<dyn VersionControl> = Arc::new(GitProbe::new(repo));

    let mut client = JenkinsClient::new(settings.base_url.as_str());
    if let Some((user, password)) = settings.credentials() {
        client = client.with_credentials(user, password.map(str::to_string));
    }
    let queue: Arc<dyn JobQueue> = Arc::new(client);

    if !dry_run {
        queue
            .initialize()
            .await
            .with_context(|| format!("Failed to connect to {}", settings.base_url))?;
    }

    let params = load_parameters(&settings.job_params).with_context(|| {
        format!(
            "Failed to load job parameters: {}",
            settings.job_params.display()
        )
    })?;

    let params = ParameterResolver::new(vcs.clone(), sink.clone())
        .resolve(params)
        .await
        .context("Failed to resolve job parameters")?;

    if dry_run {
        let repository = vcs
            .state()
            .await
            .context("Failed to read the working copy")?;
        let report = dry_run_report(&repository, &params);
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let outcome = BuildOrchestrator::new(queue, vcs, sink.clone())
        .submit_and_await(&settings.job, &params)
        .await
        .with_context(|| format!("Build of {} did not complete", settings.job))?;

    OutcomeReporter::new(sink).report(&outcome, &settings.base_url);

    Ok(())
}

/// What a dry run would have submitted, next to the working copy it saw.
fn dry_run_report(repository: &RepositoryState, params: &ParameterSet) -> serde_json::Value {
    serde_json::json!({
        "repository": repository,
        "parameters": params,
    })
}
