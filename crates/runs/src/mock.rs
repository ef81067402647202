//! `MockRunClient`: a test double for `RunClient`.
//!
//! Useful wherever the watcher must be driven through a run's lifecycle
//! without a real job system.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;

use crate::{RunClient, RunError, RunOutcome, RunStatus, TriggeredRun};

/// One scripted answer to `retrieve`.
#[derive(Debug, Clone)]
pub enum MockStep {
    /// Report this status with the given output / error.
    Status {
        status: RunStatus,
        output: Option<Value>,
        error: Option<String>,
    },
    /// Fail the read with an API error carrying this HTTP status.
    Fail(u16),
}

/// A mock job system that replays scripted run states.
///
/// The last step is repeated once the script is exhausted.
pub struct MockRunClient {
    run_id: String,
    trigger_error: Option<u16>,
    steps: Mutex<VecDeque<MockStep>>,
    last: Mutex<Option<MockStep>>,
    /// Every payload passed to `trigger` (in call order).
    pub triggered: Arc<Mutex<Vec<Value>>>,
    retrievals: Mutex<usize>,
}

impl MockRunClient {
    /// Create a mock whose run goes through `steps` in order.
    pub fn scripted(run_id: impl Into<String>, steps: Vec<MockStep>) -> Self {
        Self {
            run_id: run_id.into(),
            trigger_error: None,
            steps: Mutex::new(steps.into()),
            last: Mutex::new(None),
            triggered: Arc::new(Mutex::new(Vec::new())),
            retrievals: Mutex::new(0),
        }
    }

    /// A run that completes immediately with `output`.
    pub fn completing(run_id: impl Into<String>, output: Value) -> Self {
        Self::scripted(run_id, vec![MockStep::status(RunStatus::Completed, Some(output), None)])
    }

    /// A run that ends immediately in `status` with an optional error message.
    pub fn ending(run_id: impl Into<String>, status: RunStatus, error: Option<&str>) -> Self {
        Self::scripted(run_id, vec![MockStep::status(status, None, error.map(str::to_owned))])
    }

    /// Make `trigger` fail with an API error carrying `status`.
    pub fn with_trigger_error(mut self, status: u16) -> Self {
        self.trigger_error = Some(status);
        self
    }

    /// Number of times `retrieve` has been called.
    pub fn retrieve_count(&self) -> usize {
        *self.retrievals.lock().unwrap()
    }

    /// Number of times `trigger` has been called.
    pub fn trigger_count(&self) -> usize {
        self.triggered.lock().unwrap().len()
    }
}

impl MockStep {
    pub fn status(status: RunStatus, output: Option<Value>, error: Option<String>) -> Self {
        Self::Status { status, output, error }
    }
}

#[async_trait]
impl RunClient for MockRunClient {
    async fn trigger(&self, _task_id: &str, payload: &Value) -> Result<TriggeredRun, RunError> {
        self.triggered.lock().unwrap().push(payload.clone());
        if let Some(status) = self.trigger_error {
            return Err(RunError::Api { status, body: "mock trigger failure".into() });
        }
        Ok(TriggeredRun { id: self.run_id.clone() })
    }

    async fn retrieve(&self, run_id: &str) -> Result<RunOutcome, RunError> {
        *self.retrievals.lock().unwrap() += 1;

        let step = {
            let mut last = self.last.lock().unwrap();
            match self.steps.lock().unwrap().pop_front() {
                Some(step) => {
                    *last = Some(step.clone());
                    step
                }
                None => last
                    .clone()
                    .unwrap_or_else(|| MockStep::status(RunStatus::Queued, None, None)),
            }
        };

        match step {
            MockStep::Status { status, output, error } => Ok(RunOutcome {
                run_id: run_id.to_owned(),
                status,
                output,
                error,
            }),
            MockStep::Fail(status) => Err(RunError::Api { status, body: "mock read failure".into() }),
        }
    }
}
