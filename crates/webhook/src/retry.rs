//! Callback delivery with linear-backoff retry.
//!
//! After failed attempt `n` the next attempt waits `n * base_delay`, so
//! the default policy sleeps 1 s then 2 s.  There is no idempotency key:
//! if an attempt succeeded but its response was lost, the receiver sees
//! the same payload again.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tracing::{error, info, instrument, warn};

use crate::{AttemptError, CallbackTarget, DeliveryError, Transport};

/// How many times to try a callback and how long to wait in between.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first.  `0` behaves like `1`.
    pub max_attempts: u32,
    /// Delay unit; the wait after attempt `n` is `n * base_delay`.
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    /// Wait before the attempt following failed attempt `attempt` (1-based).
    pub fn delay_after(&self, attempt: u32) -> Duration {
        self.base_delay * attempt
    }

    fn attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }
}

/// Delivers JSON payloads to callback targets.
#[derive(Clone)]
pub struct Delivery {
    transport: Arc<dyn Transport>,
    policy: RetryPolicy,
}

impl Delivery {
    pub fn new(transport: Arc<dyn Transport>, policy: RetryPolicy) -> Self {
        Self { transport, policy }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// POST `payload` to `target`, retrying until one attempt gets a 2xx.
    ///
    /// Returns the number of attempts it took.
    ///
    /// # Errors
    /// - [`DeliveryError::Encode`] if `payload` cannot be turned into JSON.
    /// - [`DeliveryError::Exhausted`] once every attempt has failed.
    #[instrument(skip(self, target, payload), fields(url = %target.url))]
    pub async fn deliver<T>(&self, target: &CallbackTarget, payload: &T) -> Result<u32, DeliveryError>
    where
        T: Serialize + ?Sized,
    {
        let body = serde_json::to_value(payload)?;
        let max_attempts = self.policy.attempts();
        let mut attempt = 1u32;

        loop {
            let err: AttemptError = match self.transport.post_json(target, &body).await {
                Ok(()) => {
                    info!(attempt, "callback delivered");
                    return Ok(attempt);
                }
                Err(e) => e,
            };

            if attempt >= max_attempts {
                error!(attempt, error = %err, "callback delivery failed after all attempts");
                return Err(DeliveryError::Exhausted { attempts: attempt, last: err });
            }

            let delay = self.policy.delay_after(attempt);
            warn!(
                attempt,
                max_attempts,
                error = %err,
                "callback attempt failed, retrying in {:?}", delay
            );
            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }
}
