//! The GitHub REST surface the resolver and dispatcher depend on.

use std::fmt;

use downstream_core::{
    Account, AccountName, OwnerKind, RepositoryDescriptor, RepositorySlug, TemplateMetadata,
};

use crate::error::ApiError;

/// Which listing endpoint holds the account's repositories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InventoryScope {
    /// `GET /user/repos`: repositories owned by the authenticated user.
    AuthenticatedUser,
    /// `GET /orgs/{org}/repos`.
    Organization(AccountName),
}

impl InventoryScope {
    pub fn for_account(account: &Account) -> Self {
        match account.kind {
            OwnerKind::User => InventoryScope::AuthenticatedUser,
            OwnerKind::Organization => InventoryScope::Organization(account.name.clone()),
        }
    }
}

impl fmt::Display for InventoryScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InventoryScope::AuthenticatedUser => write!(f, "user repositories"),
            InventoryScope::Organization(org) => write!(f, "organization '{org}' repositories"),
        }
    }
}

/// Opaque position of the next listing page, as handed out by the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageCursor(pub String);

/// One page of a repository listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepositoryPage {
    pub repositories: Vec<RepositoryDescriptor>,
    /// `None` once the provider reports no further pages.
    pub next: Option<PageCursor>,
}

/// Calls made against the hosting provider.
///
/// Implementations are blocking; async callers run them on
/// `spawn_blocking` tasks.
pub trait GitHubApi: Send + Sync {
    /// `GET /repos/{owner}/{repo}`.
    fn get_repository(&self, slug: &RepositorySlug) -> Result<TemplateMetadata, ApiError>;

    /// One page of the listing for `scope`; `cursor` is `None` for the first
    /// page and the previous page's `next` afterwards.
    fn list_repositories(
        &self,
        scope: &InventoryScope,
        cursor: Option<&PageCursor>,
    ) -> Result<RepositoryPage, ApiError>;

    /// `POST /repos/{owner}/{repo}/dispatches`.
    fn create_dispatch_event(
        &self,
        owner: &AccountName,
        repo: &str,
        event_type: &str,
    ) -> Result<(), ApiError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scope_follows_owner_kind() {
        let user = Account {
            name: AccountName::from("octocat"),
            kind: OwnerKind::User,
        };
        let org = Account {
            name: AccountName::from("aixcc-sc"),
            kind: OwnerKind::Organization,
        };
        assert_eq!(
            InventoryScope::for_account(&user),
            InventoryScope::AuthenticatedUser
        );
        assert_eq!(
            InventoryScope::for_account(&org),
            InventoryScope::Organization(AccountName::from("aixcc-sc"))
        );
    }
}
