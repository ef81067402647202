//! Delivery error types.

use thiserror::Error;

/// Why a single POST attempt failed.  Every variant is retryable.
#[derive(Debug, Error)]
pub enum AttemptError {
    /// The underlying HTTP request failed (network, DNS, timeout, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The callback answered with a non-2xx status code.
    #[error("callback returned HTTP {0}")]
    HttpStatus(u16),
}

/// Errors surfaced by [`crate::Delivery::deliver`].
#[derive(Debug, Error)]
pub enum DeliveryError {
    /// The payload could not be encoded as JSON; nothing was sent.
    #[error("payload is not serialisable: {0}")]
    Encode(#[from] serde_json::Error),

    /// Every attempt failed.
    #[error("callback delivery failed after {attempts} attempts: {last}")]
    Exhausted { attempts: u32, last: AttemptError },
}
