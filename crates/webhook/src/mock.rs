//! `MockTransport`: a test double for `Transport`.
//!
//! Records every body it is asked to POST and answers with a
//! programmer-specified outcome per attempt.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;

use crate::{AttemptError, CallbackTarget, Transport};

/// Behaviour injected into `MockTransport` at construction time.
pub enum MockBehaviour {
    /// Every attempt succeeds.
    Succeed,
    /// Every attempt fails with this HTTP status.
    FailStatus(u16),
    /// Attempts fail with HTTP 500 until attempt `n` (1-based), which succeeds.
    SucceedOn(u32),
}

/// A mock callback receiver.
pub struct MockTransport {
    pub behaviour: MockBehaviour,
    /// Every (target, body) pair seen (in call order).
    pub calls: Arc<Mutex<Vec<(CallbackTarget, Value)>>>,
}

impl MockTransport {
    fn with(behaviour: MockBehaviour) -> Self {
        Self {
            behaviour,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn succeeding() -> Self {
        Self::with(MockBehaviour::Succeed)
    }

    pub fn failing_with_status(status: u16) -> Self {
        Self::with(MockBehaviour::FailStatus(status))
    }

    pub fn succeeding_on(attempt: u32) -> Self {
        Self::with(MockBehaviour::SucceedOn(attempt))
    }

    /// Number of POST attempts received.
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Bodies received, in order.
    pub fn bodies(&self) -> Vec<Value> {
        self.calls.lock().unwrap().iter().map(|(_, body)| body.clone()).collect()
    }

    /// Targets received, in order.
    pub fn targets(&self) -> Vec<CallbackTarget> {
        self.calls.lock().unwrap().iter().map(|(t, _)| t.clone()).collect()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn post_json(&self, target: &CallbackTarget, body: &Value) -> Result<(), AttemptError> {
        let attempt = {
            let mut calls = self.calls.lock().unwrap();
            calls.push((target.clone(), body.clone()));
            calls.len() as u32
        };

        match self.behaviour {
            MockBehaviour::Succeed => Ok(()),
            MockBehaviour::FailStatus(status) => Err(AttemptError::HttpStatus(status)),
            MockBehaviour::SucceedOn(n) if attempt >= n => Ok(()),
            MockBehaviour::SucceedOn(_) => Err(AttemptError::HttpStatus(500)),
        }
    }
}
