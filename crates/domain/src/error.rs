//! Typed error type for the domain crate.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("invalid input: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("unknown generation status: {0}")]
    UnknownStatus(String),

    #[error("unknown platform: {0}")]
    UnknownPlatform(String),

    /// A piece of ad copy is longer than the platform accepts.
    #[error("{field} #{index} is {len} chars, limit is {limit}")]
    AdLimit {
        field: &'static str,
        index: usize,
        len: usize,
        limit: usize,
    },
}
