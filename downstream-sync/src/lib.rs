//! # downstream-sync
//!
//! Template dependent discovery and dispatch fan-out.
//!
//! Call [`pipeline::run`] with a [`GitHubApi`] implementation to resolve the
//! template owner's inventory, select dependents, and notify each of them
//! with a `repository_dispatch` event.

pub mod api;
pub mod client;
pub mod dispatcher;
pub mod error;
pub mod pipeline;
pub mod resolver;

#[cfg(test)]
pub(crate) mod fake;

pub use api::{GitHubApi, InventoryScope, PageCursor, RepositoryPage};
pub use client::GitHubClient;
pub use dispatcher::{
    dispatch_all, DispatchOutcome, DispatchReport, TargetResult, DEFAULT_EVENT_TYPE,
};
pub use error::{ApiError, SyncError};
pub use pipeline::{RunConfig, RunOutcome};
pub use resolver::{resolve, Resolution};
