//! Downstream core library: account identity, repository descriptors and
//! the predicates that decide which repositories follow a template.
//!
//! - [`types`]: slugs, accounts, inventory entries
//! - [`predicate`]: [`DependentPredicate`] and its implementations
//! - [`error`]: [`IdentityError`]

pub mod error;
pub mod predicate;
pub mod types;

pub use error::IdentityError;
pub use predicate::{
    select_dependents, DependentPredicate, HasTopic, NamePrefix, DEFAULT_DEPENDENT_PREFIX,
};
pub use types::{
    Account, AccountName, OwnerInfo, OwnerKind, RepositoryDescriptor, RepositorySlug,
    TemplateMetadata,
};
