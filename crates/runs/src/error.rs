//! Run-client error type.

use std::time::Duration;

use thiserror::Error;

/// Errors returned while triggering or reading a run.
#[derive(Debug, Error)]
pub enum RunError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The job API answered with a non-2xx status.
    #[error("job API error ({status}): {body}")]
    Api { status: u16, body: String },

    /// A 2xx body did not have the expected shape.
    #[error("unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),

    /// The run did not reach a terminal status in time.
    #[error("run '{run_id}' still not finished after {waited:?}")]
    Timeout { run_id: String, waited: Duration },
}

impl RunError {
    /// Whether a poll loop should read the run again after this error.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Request(_) => true,
            Self::Api { status, .. } => *status == 429 || *status >= 500,
            Self::Decode(_) | Self::Timeout { .. } => false,
        }
    }
}
