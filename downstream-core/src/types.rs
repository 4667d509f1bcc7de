//! Domain types for template discovery and fan-out.
//!
//! Everything here is immutable once built: the slug and account are derived
//! once per run, descriptors are produced by the inventory walk and only read
//! afterwards.

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use crate::error::IdentityError;

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// The login of a user or organization owning repositories.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
pub struct AccountName(pub String);

impl fmt::Display for AccountName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for AccountName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for AccountName {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl AsRef<str> for AccountName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// `owner/name` of the repository whose workflow triggered the run.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepositorySlug {
    pub owner: AccountName,
    pub name: String,
}

impl RepositorySlug {
    pub fn new(owner: impl Into<AccountName>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for RepositorySlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

impl FromStr for RepositorySlug {
    type Err = IdentityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s.trim();
        let Some((owner, name)) = value.split_once('/') else {
            return Err(IdentityError::MalformedSlug {
                value: value.to_owned(),
            });
        };
        if name.contains('/') {
            return Err(IdentityError::MalformedSlug {
                value: value.to_owned(),
            });
        }
        if owner.is_empty() {
            return Err(IdentityError::EmptyPart {
                value: value.to_owned(),
                part: "owner",
            });
        }
        if name.is_empty() {
            return Err(IdentityError::EmptyPart {
                value: value.to_owned(),
                part: "name",
            });
        }
        Ok(Self::new(owner, name))
    }
}

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Classification of the account that owns the template.
///
/// Any owner type other than `User` is listed through the organization
/// endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
pub enum OwnerKind {
    User,
    #[serde(other)]
    Organization,
}

impl fmt::Display for OwnerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OwnerKind::User => write!(f, "User"),
            OwnerKind::Organization => write!(f, "Organization"),
        }
    }
}

// ---------------------------------------------------------------------------
// Domain structs
// ---------------------------------------------------------------------------

/// The owner of the template and of every repository in the inventory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub name: AccountName,
    pub kind: OwnerKind,
}

/// Owner block of the single-repository metadata response.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OwnerInfo {
    #[serde(rename = "type")]
    pub kind: OwnerKind,
}

/// The subset of `GET /repos/{owner}/{repo}` the resolver reads.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TemplateMetadata {
    #[serde(default)]
    pub is_template: bool,
    pub owner: OwnerInfo,
}

impl TemplateMetadata {
    /// Account identity for the run: the slug's owner, classified by the
    /// metadata's owner type.
    pub fn account_for(&self, slug: &RepositorySlug) -> Account {
        Account {
            name: slug.owner.clone(),
            kind: self.owner.kind,
        }
    }
}

/// One entry of an account's repository listing.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RepositoryDescriptor {
    pub name: String,
    #[serde(default)]
    pub archived: bool,
    #[serde(default)]
    pub topics: Vec<String>,
}

impl RepositoryDescriptor {
    pub fn new(name: impl Into<String>, archived: bool) -> Self {
        Self {
            name: name.into(),
            archived,
            topics: Vec::new(),
        }
    }

    pub fn with_topics<I, S>(mut self, topics: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.topics = topics.into_iter().map(Into::into).collect();
        self
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
