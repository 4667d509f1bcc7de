//! Repository inventory resolution.
//!
//! 1. Read the triggering repository's metadata; stop if it is not a template.
//! 2. Classify the owner (user or organization) from the same response.
//! 3. Walk every page of the owner's listing, strictly in order.
//! 4. Drop archived repositories.
//!
//! Any API failure is fatal: a partial inventory could silently miss
//! dependents, so none is ever returned.

use downstream_core::{Account, RepositoryDescriptor, RepositorySlug};

use crate::api::{GitHubApi, InventoryScope, PageCursor};
use crate::error::SyncError;

/// Result of inventory resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The triggering repository is not a template; nothing to do.
    Skip,
    /// Non-archived repositories of `account`, in listing order.
    Inventory {
        account: Account,
        repositories: Vec<RepositoryDescriptor>,
    },
}

pub fn resolve(api: &dyn GitHubApi, slug: &RepositorySlug) -> Result<Resolution, SyncError> {
    let metadata = api
        .get_repository(slug)
        .map_err(|source| SyncError::Metadata {
            repository: slug.to_string(),
            source,
        })?;

    if !metadata.is_template {
        tracing::info!(repository = %slug, "action executed on non template repository");
        return Ok(Resolution::Skip);
    }

    let account = metadata.account_for(slug);
    let scope = InventoryScope::for_account(&account);
    let listed = fetch_inventory(api, &scope)?;
    let total = listed.len();
    let repositories: Vec<_> = listed.into_iter().filter(|r| !r.archived).collect();

    tracing::info!(
        owner = %account.name,
        archived = total - repositories.len(),
        "repo owner type is \"{}\" with {} repositories",
        account.kind,
        repositories.len()
    );

    Ok(Resolution::Inventory {
        account,
        repositories,
    })
}

/// Every entry of the listing for `scope`, concatenated in page order.
///
/// Page k+1 is requested only after page k has been received.
pub fn fetch_inventory(
    api: &dyn GitHubApi,
    scope: &InventoryScope,
) -> Result<Vec<RepositoryDescriptor>, SyncError> {
    let mut repositories = Vec::new();
    let mut cursor: Option<PageCursor> = None;
    let mut page = 1usize;

    loop {
        let batch = api
            .list_repositories(scope, cursor.as_ref())
            .map_err(|source| SyncError::Inventory { page, source })?;
        tracing::debug!(%scope, page, entries = batch.repositories.len(), "fetched inventory page");
        repositories.extend(batch.repositories);

        match batch.next {
            Some(next) => {
                cursor = Some(next);
                page += 1;
            }
            None => break,
        }
    }

    Ok(repositories)
}
