//! Error types for downstream-sync.

use thiserror::Error;

/// Failure of a single GitHub REST call.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced an HTTP response (DNS, TLS, timeout, ...).
    #[error("request to {url} failed: {message}")]
    Transport { url: String, message: String },

    /// The provider answered with a non-success status.
    #[error("{url} returned HTTP {status}: {body}")]
    Status {
        status: u16,
        url: String,
        body: String,
    },

    /// A pagination link pointed outside the configured API base URL.
    #[error("refusing to follow pagination link outside {base}: {url}")]
    ForeignCursor { base: String, url: String },

    /// The response body was not the expected JSON shape.
    #[error("could not decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: std::io::Error,
    },
}

/// Fatal errors of a discovery run. Dispatch failures are never reported
/// through this type; they are collected in a `DispatchReport`.
#[derive(Debug, Error)]
pub enum SyncError {
    /// The template repository's own metadata could not be read.
    #[error("failed to fetch metadata for {repository}: {source}")]
    Metadata {
        repository: String,
        #[source]
        source: ApiError,
    },

    /// A page of the account's repository listing could not be read.
    #[error("failed to fetch repository inventory page {page}: {source}")]
    Inventory {
        page: usize,
        #[source]
        source: ApiError,
    },

    /// A background task panicked or was cancelled.
    #[error("task join failure: {0}")]
    Join(String),
}
