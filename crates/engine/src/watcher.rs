//! Job watcher.
//!
//! `Watcher` is the central orchestrator:
//! 1. Triggers a run of the configured task with the job's input.
//! 2. Polls the run until it reaches a terminal status.
//! 3. Builds the callback body from the outcome.
//! 4. Delivers it with bounded retry.
//! 5. If the run cannot be watched, sends a best-effort `failed` body to
//!    the same callback instead.
//!
//! Each job runs independently; watchers share only their clients.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{error, info, instrument, warn};

use runs::{PollOptions, RunClient, TriggeredRun};
use webhook::{CallbackTarget, Delivery, RetryPolicy, Transport};

use crate::models::{CallbackPayload, JobMetadata, JobRequest};
use crate::EngineError;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Tuning knobs for the watcher.
#[derive(Debug, Clone)]
pub struct WatcherConfig {
    /// Task identifier runs are triggered for.
    pub task_id: String,
    /// Polling cadence and overall watch timeout.
    pub poll: PollOptions,
    /// Callback attempts and backoff.
    pub retry: RetryPolicy,
}

impl WatcherConfig {
    /// Default polling and retry settings for `task_id`.
    pub fn new(task_id: impl Into<String>) -> Self {
        Self {
            task_id: task_id.into(),
            poll: PollOptions::default(),
            retry: RetryPolicy::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Submission
// ---------------------------------------------------------------------------

/// A run that was accepted and is now being watched in the background.
#[derive(Debug)]
pub struct Submission {
    pub run: TriggeredRun,
    /// The background watch; dropping it does not cancel the watch.
    pub task: JoinHandle<()>,
}

// ---------------------------------------------------------------------------
// Watcher
// ---------------------------------------------------------------------------

/// Orchestrates trigger → poll → deliver for individual jobs.
#[derive(Clone)]
pub struct Watcher {
    runs: Arc<dyn RunClient>,
    delivery: Delivery,
    config: WatcherConfig,
}

impl Watcher {
    /// Create a new watcher.
    pub fn new(runs: Arc<dyn RunClient>, transport: Arc<dyn Transport>, config: WatcherConfig) -> Self {
        let delivery = Delivery::new(transport, config.retry.clone());
        Self { runs, delivery, config }
    }

    pub fn config(&self) -> &WatcherConfig {
        &self.config
    }

    /// Trigger the run and watch it on a background task.
    ///
    /// Returns as soon as the job system has accepted the run.  The watch
    /// itself is fire-and-forget: its final error is only logged.
    ///
    /// # Errors
    /// Returns [`EngineError::Trigger`] if the run could not be started;
    /// nothing is sent to the callback in that case.
    #[instrument(skip(self, request), fields(job_id = %request.job_id))]
    pub async fn submit(&self, request: JobRequest) -> Result<Submission, EngineError> {
        let run = self.trigger(&request).await?;

        let watcher = self.clone();
        let run_id = run.id.clone();
        let task = tokio::spawn(async move {
            let JobRequest { job_id, callback, metadata, .. } = request;
            if let Err(e) = watcher
                .watch_and_deliver(&job_id, &run_id, &metadata, &callback)
                .await
            {
                error!(job_id = %job_id, run_id = %run_id, error = %e, "background job ended with an error");
            }
        });

        Ok(Submission { run, task })
    }

    /// Trigger the run and watch it to completion on the current task.
    #[instrument(skip(self, request), fields(job_id = %request.job_id))]
    pub async fn run_to_completion(&self, request: &JobRequest) -> Result<TriggeredRun, EngineError> {
        let run = self.trigger(request).await?;
        self.watch_and_deliver(&request.job_id, &run.id, &request.metadata, &request.callback)
            .await?;
        Ok(run)
    }

    /// Poll `run_id` to a terminal status and deliver the outcome.
    ///
    /// # Errors
    /// - [`EngineError::Watch`] if polling failed or timed out.  A `failed`
    ///   body has already been sent to `callback` on a best-effort basis.
    /// - [`EngineError::Delivery`] if the outcome could not be delivered.
    #[instrument(skip(self, metadata, callback))]
    pub async fn watch_and_deliver(
        &self,
        job_id: &str,
        run_id: &str,
        metadata: &JobMetadata,
        callback: &CallbackTarget,
    ) -> Result<(), EngineError> {
        let outcome = match self.runs.poll_until_terminal(run_id, &self.config.poll).await {
            Ok(outcome) => outcome,
            Err(source) => {
                error!(error = %source, "could not watch run to completion");
                let payload = CallbackPayload::failure(job_id, run_id, metadata, source.to_string());
                self.notify_failure(callback, &payload).await;
                return Err(EngineError::Watch { run_id: run_id.to_owned(), source });
            }
        };

        info!(status = %outcome.status, "run reached a terminal status");
        let payload = CallbackPayload::from_outcome(job_id, metadata, &outcome);
        let attempts = self.delivery.deliver(callback, &payload).await?;
        info!(attempts, status = ?payload.status, "job result delivered");
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Internal helpers.
    // -----------------------------------------------------------------------

    async fn trigger(&self, request: &JobRequest) -> Result<TriggeredRun, EngineError> {
        let run = self
            .runs
            .trigger(&self.config.task_id, &request.input)
            .await
            .map_err(EngineError::Trigger)?;
        info!(run_id = %run.id, task_id = %self.config.task_id, "run accepted");
        Ok(run)
    }

    /// Deliver a failure body, logging (not returning) any error.
    async fn notify_failure(&self, callback: &CallbackTarget, payload: &CallbackPayload) {
        if let Err(e) = self.delivery.deliver(callback, payload).await {
            warn!(error = %e, "failure notification could not be delivered");
        }
    }
}
