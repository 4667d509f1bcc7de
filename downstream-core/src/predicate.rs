//! Deciding which repositories were derived from the template.
//!
//! The fan-out never looks at names or topics directly; it asks a
//! [`DependentPredicate`]. Archived repositories are excluded by
//! [`select_dependents`] before any predicate is consulted.

use crate::types::RepositoryDescriptor;

/// Naming convention used by sandboxes created from the CRS template.
pub const DEFAULT_DEPENDENT_PREFIX: &str = "asc-crs-";

/// A capability check answering "does this repository follow the template?".
pub trait DependentPredicate: Send + Sync {
    fn is_dependent(&self, repo: &RepositoryDescriptor) -> bool;

    /// Human-readable rule, used in log lines.
    fn describe(&self) -> String;
}

/// Matches repositories whose name starts with a fixed literal prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamePrefix(pub String);

impl Default for NamePrefix {
    fn default() -> Self {
        Self(DEFAULT_DEPENDENT_PREFIX.to_owned())
    }
}

impl DependentPredicate for NamePrefix {
    fn is_dependent(&self, repo: &RepositoryDescriptor) -> bool {
        repo.name.starts_with(&self.0)
    }

    fn describe(&self) -> String {
        format!("name prefix '{}'", self.0)
    }
}

/// Matches repositories tagged with a topic. Topic comparison is
/// case-insensitive; GitHub stores topics lowercased.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HasTopic(pub String);

impl DependentPredicate for HasTopic {
    fn is_dependent(&self, repo: &RepositoryDescriptor) -> bool {
        repo.topics.iter().any(|t| t.eq_ignore_ascii_case(&self.0))
    }

    fn describe(&self) -> String {
        format!("topic '{}'", self.0)
    }
}

/// Names of non-archived repositories accepted by `predicate`, in inventory
/// order.
pub fn select_dependents(
    inventory: &[RepositoryDescriptor],
    predicate: &dyn DependentPredicate,
) -> Vec<String> {
    inventory
        .iter()
        .filter(|repo| !repo.archived && predicate.is_dependent(repo))
        .map(|repo| repo.name.clone())
        .collect()
}
