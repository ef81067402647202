//! Engine-level error types.

use thiserror::Error;

use runs::RunError;
use webhook::DeliveryError;

/// Errors produced while submitting, watching, or delivering a job.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The job system refused to start the run.
    #[error("failed to trigger run: {0}")]
    Trigger(#[source] RunError),

    /// The run could not be watched to a terminal state.  A failure
    /// notification has already been attempted.
    #[error("failed to watch run '{run_id}': {source}")]
    Watch {
        run_id: String,
        #[source]
        source: RunError,
    },

    /// The result could not be delivered to the callback.
    #[error(transparent)]
    Delivery(#[from] DeliveryError),
}
