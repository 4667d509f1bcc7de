//! Resolve the template's dependents and dispatch the sync event to each.

use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Args;
use colored::Colorize;

use downstream_core::{
    DependentPredicate, HasTopic, NamePrefix, RepositorySlug, DEFAULT_DEPENDENT_PREFIX,
};
use downstream_sync::{
    client::DEFAULT_API_URL, pipeline, DispatchOutcome, DispatchReport, GitHubApi, GitHubClient,
    RunConfig, RunOutcome, DEFAULT_EVENT_TYPE,
};

/// Arguments for `trigger-downstream-sync`.
#[derive(Args, Debug)]
pub struct TriggerArgs {
    /// Template repository as `owner/name`.
    #[arg(long, env = "GITHUB_REPOSITORY")]
    pub repository: RepositorySlug,

    /// Token used for every API call.
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Base URL of the GitHub REST API.
    #[arg(long, env = "GITHUB_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// Repositories whose name starts with this prefix are dependents.
    #[arg(long, env = "DOWNSTREAM_PREFIX", default_value = DEFAULT_DEPENDENT_PREFIX)]
    pub prefix: String,

    /// Select dependents by repository topic instead of name prefix.
    #[arg(long, env = "DOWNSTREAM_TOPIC", conflicts_with = "prefix")]
    pub topic: Option<String>,

    /// Event type sent with each repository dispatch.
    #[arg(long, env = "DOWNSTREAM_EVENT_TYPE", default_value = DEFAULT_EVENT_TYPE)]
    pub event_type: String,

    /// List the dependents that would be notified without dispatching.
    #[arg(long)]
    pub dry_run: bool,

    /// Exit non-zero when any dispatch failed (all dispatches still run).
    #[arg(long)]
    pub fail_on_dispatch_error: bool,
}

impl TriggerArgs {
    pub fn run(self) -> Result<()> {
        let predicate: Box<dyn DependentPredicate> = match &self.topic {
            Some(topic) => Box::new(HasTopic(topic.clone())),
            None => Box::new(NamePrefix(self.prefix.clone())),
        };
        let config = RunConfig {
            repository: self.repository.clone(),
            predicate,
            event_type: self.event_type.clone(),
            dry_run: self.dry_run,
        };
        let api: Arc<dyn GitHubApi> = Arc::new(GitHubClient::new(&self.api_url, self.token));

        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .context("failed to start async runtime")?;
        let outcome = runtime
            .block_on(pipeline::run(api, &config))
            .with_context(|| format!("downstream sync failed for '{}'", config.repository))?;

        print_outcome(&config.repository, &outcome);

        if let RunOutcome::Dispatched(report) = &outcome {
            if self.fail_on_dispatch_error && !report.is_clean() {
                bail!(
                    "{} of {} dispatches failed",
                    report.failed(),
                    report.results.len()
                );
            }
        }
        Ok(())
    }
}

fn print_outcome(repository: &RepositorySlug, outcome: &RunOutcome) {
    match outcome {
        RunOutcome::NotTemplate => {
            println!(
                "{} '{repository}' is not a template repository; nothing to do",
                "✓".green()
            );
        }
        RunOutcome::NoDependents { inventory } => {
            println!(
                "{} no repositories to update ({inventory} repositories checked)",
                "✓".green()
            );
        }
        RunOutcome::DryRun {
            account,
            dependents,
        } => {
            println!(
                "[dry-run] {} would notify {} repositories owned by {} '{}'",
                "✓".green(),
                dependents.len(),
                account.kind,
                account.name
            );
            for repo in dependents {
                println!("  ~  {}/{repo}", account.name);
            }
        }
        RunOutcome::Dispatched(report) => print_report(report),
    }
}

fn print_report(report: &DispatchReport) {
    let mark = if report.is_clean() {
        "✓".green()
    } else {
        "!".yellow()
    };
    println!(
        "{mark} dispatched '{}' to {} repositories ({} failed)",
        report.event_type,
        report.delivered(),
        report.failed()
    );
    for result in &report.results {
        match &result.outcome {
            DispatchOutcome::Delivered => println!("  ✎  {}", result.repository),
            DispatchOutcome::Failed { reason } => {
                println!("  {}  {}: {reason}", "✗".red(), result.repository)
            }
        }
    }
}
