//! Dependent fan-out.
//!
//! One `repository_dispatch` per dependent, each on its own blocking task.
//! Targets are independent: a failed dispatch is recorded and the others
//! still go out. Every task is awaited before the report is returned so no
//! request is dropped when the process exits.

use std::sync::Arc;

use tokio::task::JoinSet;

use downstream_core::Account;

use crate::api::GitHubApi;

/// Event type the sandbox template's dependents listen for.
pub const DEFAULT_EVENT_TYPE: &str = "trigger-crs-sandbox-template-sync";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    Delivered,
    Failed { reason: String },
}

/// Outcome for one dependent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetResult {
    pub repository: String,
    pub outcome: DispatchOutcome,
}

/// Per-target results of a fan-out, in dependent order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchReport {
    pub event_type: String,
    pub results: Vec<TargetResult>,
}

impl DispatchReport {
    pub fn delivered(&self) -> usize {
        self.results
            .iter()
            .filter(|r| r.outcome == DispatchOutcome::Delivered)
            .count()
    }

    pub fn failed(&self) -> usize {
        self.results.len() - self.delivered()
    }

    pub fn failures(&self) -> impl Iterator<Item = (&str, &str)> {
        self.results.iter().filter_map(|r| match &r.outcome {
            DispatchOutcome::Failed { reason } => Some((r.repository.as_str(), reason.as_str())),
            DispatchOutcome::Delivered => None,
        })
    }

    pub fn is_clean(&self) -> bool {
        self.failed() == 0
    }
}

/// Send `event_type` to every repository in `dependents`, owned by `account`.
pub async fn dispatch_all(
    api: Arc<dyn GitHubApi>,
    account: &Account,
    dependents: &[String],
    event_type: &str,
) -> DispatchReport {
    let mut tasks = JoinSet::new();

    for (index, repo) in dependents.iter().enumerate() {
        tracing::info!("🔄 syncing repository \"{repo}\"");
        let api = Arc::clone(&api);
        let owner = account.name.clone();
        let repo = repo.clone();
        let event_type = event_type.to_owned();
        tasks.spawn_blocking(move || {
            let outcome = match api.create_dispatch_event(&owner, &repo, &event_type) {
                Ok(()) => DispatchOutcome::Delivered,
                Err(err) => DispatchOutcome::Failed {
                    reason: err.to_string(),
                },
            };
            (index, repo, outcome)
        });
    }

    let mut slots: Vec<Option<TargetResult>> = vec![None; dependents.len()];
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((index, repository, outcome)) => {
                match &outcome {
                    DispatchOutcome::Delivered => {
                        tracing::debug!(%repository, "dispatch delivered");
                    }
                    DispatchOutcome::Failed { reason } => {
                        tracing::warn!(%repository, %reason, "dispatch failed");
                    }
                }
                slots[index] = Some(TargetResult {
                    repository,
                    outcome,
                });
            }
            Err(err) => tracing::error!("dispatch task join failure: {err}"),
        }
    }

    let results = slots
        .into_iter()
        .zip(dependents)
        .map(|(slot, repository)| {
            slot.unwrap_or_else(|| TargetResult {
                repository: repository.clone(),
                outcome: DispatchOutcome::Failed {
                    reason: "dispatch task did not complete".into(),
                },
            })
        })
        .collect();

    DispatchReport {
        event_type: event_type.to_owned(),
        results,
    }
}
