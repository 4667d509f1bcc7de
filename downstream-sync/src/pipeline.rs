//! Discovery-and-notify entrypoint used by the CLI.
//!
//! `Start → Resolve → (Skip) | (Filter → Dispatch-all)`; no retries and no
//! state carried between runs.

use std::sync::Arc;

use downstream_core::{select_dependents, Account, DependentPredicate, RepositorySlug};

use crate::api::GitHubApi;
use crate::dispatcher::{dispatch_all, DispatchReport};
use crate::error::SyncError;
use crate::resolver::{resolve, Resolution};

/// Everything a run needs, threaded explicitly from `main`.
pub struct RunConfig {
    /// The template repository whose workflow triggered the run.
    pub repository: RepositorySlug,
    pub predicate: Box<dyn DependentPredicate>,
    pub event_type: String,
    /// Resolve and report dependents without dispatching.
    pub dry_run: bool,
}

/// Terminal state of a run. Every variant is a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    NotTemplate,
    NoDependents {
        inventory: usize,
    },
    DryRun {
        account: Account,
        dependents: Vec<String>,
    },
    Dispatched(DispatchReport),
}

/// Run one discovery-and-notify pass.
///
/// Resolver errors are returned; dispatch failures are only recorded in the
/// [`DispatchReport`].
pub async fn run(api: Arc<dyn GitHubApi>, config: &RunConfig) -> Result<RunOutcome, SyncError> {
    let resolution = {
        let api = Arc::clone(&api);
        let slug = config.repository.clone();
        tokio::task::spawn_blocking(move || resolve(api.as_ref(), &slug))
            .await
            .map_err(|e| SyncError::Join(e.to_string()))??
    };

    let (account, repositories) = match resolution {
        Resolution::Skip => return Ok(RunOutcome::NotTemplate),
        Resolution::Inventory {
            account,
            repositories,
        } => (account, repositories),
    };

    let dependents = select_dependents(&repositories, config.predicate.as_ref());
    tracing::info!(
        rule = %config.predicate.describe(),
        "found {} repositories marked as dependents",
        dependents.len()
    );

    if dependents.is_empty() {
        tracing::info!("✅ no repositories to update");
        return Ok(RunOutcome::NoDependents {
            inventory: repositories.len(),
        });
    }

    if config.dry_run {
        for repo in &dependents {
            tracing::info!("[dry-run] would sync repository \"{repo}\"");
        }
        return Ok(RunOutcome::DryRun {
            account,
            dependents,
        });
    }

    let report = dispatch_all(api, &account, &dependents, &config.event_type).await;
    tracing::info!(
        event_type = %report.event_type,
        delivered = report.delivered(),
        failed = report.failed(),
        "dispatch complete"
    );
    Ok(RunOutcome::Dispatched(report))
}
