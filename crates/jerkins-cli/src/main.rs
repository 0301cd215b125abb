//! jerkins CLI tool.

use clap::Parser;
use std::path::PathBuf;
use tracing::warn;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "jerkins")]
#[command(
    about = "Trigger a Jenkins job with parameters from your working copy and wait for it",
    long_about = None
)]
struct Cli {
    /// Jenkins server base URL
    #[arg(long, env = "JENKINS_BASE", default_value = "https://jenkins.example.net")]
    jenkins_base: String,

    /// Jenkins username
    #[arg(long, env = "JENKINS_USER")]
    jenkins_user: Option<String>,

    /// Jenkins password or API token
    #[arg(long, env = "JENKINS_PASS", hide_env_values = true)]
    jenkins_pass: Option<String>,

    /// Job to trigger, folders separated by '/'
    #[arg(long, env = "JENKINS_JOB", default_value = "test-pipeline")]
    jenkins_job: String,

    /// File declaring the job parameters (KDL, or JSON by extension)
    #[arg(long, env = "JOB_PARAMS", default_value = "jerkins.kdl")]
    job_params: PathBuf,

    /// Working copy to read branch and commit from
    #[arg(long, env = "JERKINS_REPO", default_value = ".")]
    repo: PathBuf,

    /// Set logging to debug
    #[arg(long, env = "DEBUG")]
    debug: bool,

    /// Print the resolved parameters instead of triggering a build
    #[arg(long)]
    dry_run: bool,
}

fn init_tracing(debug: bool) {
    let default_level = if debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env has to be in place before flags fall back to the environment
    let dotenv = dotenvy::dotenv();

    let cli = Cli::parse();
    init_tracing(cli.debug);

    if let Err(e) = dotenv {
        warn!(error = %e, "Could not load .env file");
    }

    let settings = jerkins_config::Settings::new(
        &cli.jenkins_base,
        cli.jenkins_user,
        cli.jenkins_pass,
        &cli.jenkins_job,
        cli.job_params,
    )?;

    commands::trigger::run(&settings, &cli.repo, cli.dry_run).await
}
