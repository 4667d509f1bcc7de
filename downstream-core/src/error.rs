//! Error types for downstream-core.

use thiserror::Error;

/// Errors raised while reading the triggering repository's identity.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum IdentityError {
    /// The value was not of the form `owner/name`.
    #[error("invalid repository slug '{value}': expected 'owner/name'")]
    MalformedSlug { value: String },

    /// One side of the `owner/name` pair was empty.
    #[error("invalid repository slug '{value}': {part} must not be empty")]
    EmptyPart { value: String, part: &'static str },
}
