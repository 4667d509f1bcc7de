//! Blocking GitHub REST client built on `ureq`.
//!
//! Pagination follows the `Link` response header: the `rel="next"` URL is
//! handed back as the [`PageCursor`] and requested verbatim, provided it
//! stays under the client's base URL.

use std::fmt;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde_json::json;

use downstream_core::{AccountName, RepositoryDescriptor, RepositorySlug, TemplateMetadata};

use crate::api::{GitHubApi, InventoryScope, PageCursor, RepositoryPage};
use crate::error::ApiError;

pub const DEFAULT_API_URL: &str = "https://api.github.com";
pub const PAGE_SIZE: u32 = 100;

const ACCEPT: &str = "application/vnd.github+json";
const API_VERSION: &str = "2022-11-28";
const USER_AGENT: &str = concat!("trigger-downstream-sync/", env!("CARGO_PKG_VERSION"));
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const MAX_ERROR_BODY: usize = 512;

/// GitHub REST client. Cheap to share behind an `Arc`; `ureq::Agent` pools
/// connections internally.
#[derive(Clone)]
pub struct GitHubClient {
    agent: ureq::Agent,
    base_url: String,
    token: Option<String>,
}

impl fmt::Debug for GitHubClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GitHubClient")
            .field("base_url", &self.base_url)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl GitHubClient {
    pub fn new(base_url: impl Into<String>, token: Option<String>) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout_connect(CONNECT_TIMEOUT)
            .timeout(REQUEST_TIMEOUT)
            .user_agent(USER_AGENT)
            .build();
        let base_url = base_url.into().trim_end_matches('/').to_owned();
        Self {
            agent,
            base_url,
            token: token.filter(|t| !t.is_empty()),
        }
    }

    fn request(&self, method: &str, url: &str) -> ureq::Request {
        let request = self
            .agent
            .request(method, url)
            .set("Accept", ACCEPT)
            .set("X-GitHub-Api-Version", API_VERSION);
        match &self.token {
            Some(token) => request.set("Authorization", &format!("Bearer {token}")),
            None => request,
        }
    }

    /// Whether `url` addresses this client's API host and base path.
    fn is_own_url(&self, url: &str) -> bool {
        url.strip_prefix(&self.base_url)
            .is_some_and(|rest| rest.starts_with('/') || rest.starts_with('?'))
    }

    fn first_page_url(&self, scope: &InventoryScope) -> String {
        match scope {
            InventoryScope::AuthenticatedUser => format!("{}/user/repos", self.base_url),
            InventoryScope::Organization(org) => format!("{}/orgs/{org}/repos", self.base_url),
        }
    }
}

impl GitHubApi for GitHubClient {
    fn get_repository(&self, slug: &RepositorySlug) -> Result<TemplateMetadata, ApiError> {
        let url = format!("{}/repos/{}/{}", self.base_url, slug.owner, slug.name);
        tracing::debug!(%url, "fetching template metadata");
        let response = self
            .request("GET", &url)
            .call()
            .map_err(|e| call_err(&url, e))?;
        decode(&url, response)
    }

    fn list_repositories(
        &self,
        scope: &InventoryScope,
        cursor: Option<&PageCursor>,
    ) -> Result<RepositoryPage, ApiError> {
        let (url, request) = match cursor {
            Some(PageCursor(next)) => {
                if !self.is_own_url(next) {
                    return Err(ApiError::ForeignCursor {
                        base: self.base_url.clone(),
                        url: next.clone(),
                    });
                }
                (next.clone(), self.request("GET", next))
            }
            None => {
                let url = self.first_page_url(scope);
                let request = self
                    .request("GET", &url)
                    .query("per_page", &PAGE_SIZE.to_string())
                    .query("affiliation", "owner");
                (url, request)
            }
        };
        tracing::debug!(%url, "fetching inventory page");
        let response = request.call().map_err(|e| call_err(&url, e))?;
        let next = response
            .header("link")
            .and_then(parse_next_link)
            .map(PageCursor);
        let repositories: Vec<RepositoryDescriptor> = decode(&url, response)?;
        Ok(RepositoryPage { repositories, next })
    }

    fn create_dispatch_event(
        &self,
        owner: &AccountName,
        repo: &str,
        event_type: &str,
    ) -> Result<(), ApiError> {
        let url = format!("{}/repos/{owner}/{repo}/dispatches", self.base_url);
        self.request("POST", &url)
            .send_json(json!({ "event_type": event_type }))
            .map_err(|e| call_err(&url, e))?;
        Ok(())
    }
}

/// Extract the `rel="next"` target from an RFC 8288 `Link` header.
pub fn parse_next_link(header: &str) -> Option<String> {
    header.split(',').find_map(|entry| {
        let mut parts = entry.split(';');
        let target = parts
            .next()?
            .trim()
            .strip_prefix('<')?
            .strip_suffix('>')?;
        let is_next = parts.any(|param| {
            let Some((key, value)) = param.split_once('=') else {
                return false;
            };
            key.trim().eq_ignore_ascii_case("rel")
                && value
                    .trim()
                    .trim_matches('"')
                    .split_whitespace()
                    .any(|rel| rel == "next")
        });
        is_next.then(|| target.to_owned())
    })
}

fn decode<T: DeserializeOwned>(url: &str, response: ureq::Response) -> Result<T, ApiError> {
    response.into_json().map_err(|source| ApiError::Decode {
        url: url.to_owned(),
        source,
    })
}

fn call_err(url: &str, err: ureq::Error) -> ApiError {
    match err {
        ureq::Error::Status(status, response) => {
            let mut body = response.into_string().unwrap_or_default();
            if body.len() > MAX_ERROR_BODY {
                let mut cut = MAX_ERROR_BODY;
                while !body.is_char_boundary(cut) {
                    cut -= 1;
                }
                body.truncate(cut);
            }
            ApiError::Status {
                status,
                url: url.to_owned(),
                body,
            }
        }
        ureq::Error::Transport(transport) => ApiError::Transport {
            url: url.to_owned(),
            message: transport.to_string(),
        },
    }
}
