//! In-memory [`GitHubApi`] that records every call, for unit tests.

use std::collections::HashSet;
use std::sync::Mutex;

use downstream_core::{
    AccountName, OwnerInfo, OwnerKind, RepositoryDescriptor, RepositorySlug, TemplateMetadata,
};

use crate::api::{GitHubApi, InventoryScope, PageCursor, RepositoryPage};
use crate::error::ApiError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Call {
    GetRepository(String),
    ListPage {
        scope: InventoryScope,
        cursor: Option<String>,
    },
    Dispatch {
        owner: String,
        repo: String,
        event_type: String,
    },
}

pub(crate) struct FakeGitHub {
    is_template: bool,
    kind: OwnerKind,
    pages: Vec<Vec<RepositoryDescriptor>>,
    metadata_fails: bool,
    failing_page: Option<usize>,
    failing_dispatches: HashSet<String>,
    calls: Mutex<Vec<Call>>,
}

impl FakeGitHub {
    pub(crate) fn template(kind: OwnerKind) -> Self {
        Self {
            is_template: true,
            kind,
            pages: vec![Vec::new()],
            metadata_fails: false,
            failing_page: None,
            failing_dispatches: HashSet::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn not_template() -> Self {
        Self {
            is_template: false,
            ..Self::template(OwnerKind::Organization)
        }
    }

    pub(crate) fn with_pages(mut self, pages: Vec<Vec<RepositoryDescriptor>>) -> Self {
        self.pages = pages;
        self
    }

    pub(crate) fn failing_metadata(mut self) -> Self {
        self.metadata_fails = true;
        self
    }

    /// Zero-based index of the page that answers with HTTP 502.
    pub(crate) fn failing_page(mut self, index: usize) -> Self {
        self.failing_page = Some(index);
        self
    }

    pub(crate) fn failing_dispatch(mut self, repo: &str) -> Self {
        self.failing_dispatches.insert(repo.to_owned());
        self
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.calls.lock().expect("calls lock").clone()
    }

    pub(crate) fn page_requests(&self) -> Vec<Option<String>> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::ListPage { cursor, .. } => Some(cursor),
                _ => None,
            })
            .collect()
    }

    pub(crate) fn dispatched(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Dispatch { repo, .. } => Some(repo),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: Call) {
        self.calls.lock().expect("calls lock").push(call);
    }
}

fn server_error(url: &str) -> ApiError {
    ApiError::Status {
        status: 502,
        url: url.to_owned(),
        body: "bad gateway".into(),
    }
}

impl GitHubApi for FakeGitHub {
    fn get_repository(&self, slug: &RepositorySlug) -> Result<TemplateMetadata, ApiError> {
        self.record(Call::GetRepository(slug.to_string()));
        if self.metadata_fails {
            return Err(server_error("/repos"));
        }
        Ok(TemplateMetadata {
            is_template: self.is_template,
            owner: OwnerInfo { kind: self.kind },
        })
    }

    fn list_repositories(
        &self,
        scope: &InventoryScope,
        cursor: Option<&PageCursor>,
    ) -> Result<RepositoryPage, ApiError> {
        self.record(Call::ListPage {
            scope: scope.clone(),
            cursor: cursor.map(|c| c.0.clone()),
        });
        let index = match cursor {
            None => 0,
            Some(PageCursor(c)) => c
                .strip_prefix("page-")
                .and_then(|n| n.parse().ok())
                .unwrap_or(usize::MAX),
        };
        if self.failing_page == Some(index) {
            return Err(server_error("/repos?page"));
        }
        let repositories = self.pages.get(index).cloned().unwrap_or_default();
        let next = (index.saturating_add(1) < self.pages.len())
            .then(|| PageCursor(format!("page-{}", index + 1)));
        Ok(RepositoryPage { repositories, next })
    }

    fn create_dispatch_event(
        &self,
        owner: &AccountName,
        repo: &str,
        event_type: &str,
    ) -> Result<(), ApiError> {
        self.record(Call::Dispatch {
            owner: owner.to_string(),
            repo: repo.to_owned(),
            event_type: event_type.to_owned(),
        });
        if self.failing_dispatches.contains(repo) {
            return Err(ApiError::Status {
                status: 404,
                url: format!("/repos/{owner}/{repo}/dispatches"),
                body: "Not Found".into(),
            });
        }
        Ok(())
    }
}
