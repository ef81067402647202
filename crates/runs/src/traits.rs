//! The `RunClient` trait: the contract every job-system backend must fulfil.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::{RunError, RunStatus};

/// Handle returned when a run is accepted by the job system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriggeredRun {
    pub id: String,
}

/// A single observation of a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunOutcome {
    pub run_id: String,
    pub status: RunStatus,
    /// Task return value; only present on success.
    pub output: Option<Value>,
    /// Failure detail reported by the job system, if any.
    pub error: Option<String>,
}

/// How often and for how long to poll a run.
#[derive(Debug, Clone)]
pub struct PollOptions {
    /// Pause between two status reads.
    pub interval: Duration,
    /// Give up once the run has been watched this long.
    pub timeout: Duration,
    /// Consecutive transient read errors tolerated before giving up.
    pub max_consecutive_errors: u32,
}

impl Default for PollOptions {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(2),
            timeout: Duration::from_secs(60 * 60),
            max_consecutive_errors: 3,
        }
    }
}

/// Access to an external job system.
#[async_trait]
pub trait RunClient: Send + Sync {
    /// Start a run of `task_id` with `payload` as its input.
    async fn trigger(&self, task_id: &str, payload: &Value) -> Result<TriggeredRun, RunError>;

    /// Read the current state of a run once.
    async fn retrieve(&self, run_id: &str) -> Result<RunOutcome, RunError>;

    /// Read the run every `opts.interval` until it reaches a terminal status.
    ///
    /// # Errors
    /// - [`RunError::Timeout`] once `opts.timeout` has elapsed.
    /// - Any non-transient read error, or the last transient one after
    ///   `opts.max_consecutive_errors` in a row.
    async fn poll_until_terminal(
        &self,
        run_id: &str,
        opts: &PollOptions,
    ) -> Result<RunOutcome, RunError> {
        let started = Instant::now();
        let deadline = started + opts.timeout;
        let mut consecutive_errors = 0u32;

        loop {
            match self.retrieve(run_id).await {
                Ok(outcome) if outcome.status.is_terminal() => return Ok(outcome),
                Ok(outcome) => {
                    consecutive_errors = 0;
                    debug!(run_id, status = %outcome.status, "run not finished yet");
                }
                Err(e) if e.is_transient() && consecutive_errors < opts.max_consecutive_errors => {
                    consecutive_errors += 1;
                    warn!(run_id, error = %e, consecutive_errors, "transient error reading run");
                }
                Err(e) => return Err(e),
            }

            if Instant::now() + opts.interval >= deadline {
                return Err(RunError::Timeout {
                    run_id: run_id.to_owned(),
                    waited: started.elapsed(),
                });
            }
            tokio::time::sleep(opts.interval).await;
        }
    }
}
