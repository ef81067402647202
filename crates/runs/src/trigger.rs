//! Trigger.dev REST client.
//!
//! Wraps the two endpoints the watcher needs (task trigger and run
//! retrieval) using [`reqwest`].

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

use crate::{RunClient, RunError, RunOutcome, RunStatus, TriggeredRun};

/// Default Trigger.dev cloud endpoint.
pub const DEFAULT_API_URL: &str = "https://api.trigger.dev";

/// HTTP timeout for a single API call.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP client for a Trigger.dev project, authenticated with its secret key.
pub struct TriggerClient {
    client: reqwest::Client,
    api_url: String,
    secret_key: String,
}

#[derive(Debug, Deserialize)]
struct TriggerResponse {
    id: String,
}

#[derive(Debug, Deserialize)]
struct RetrieveResponse {
    id: String,
    status: RunStatus,
    #[serde(default)]
    output: Option<Value>,
    #[serde(default)]
    error: Option<ErrorBody>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
}

impl TriggerClient {
    /// Create a client with its own connection pool.
    ///
    /// * `api_url` - Base URL, e.g. `https://api.trigger.dev`.
    pub fn new(api_url: impl Into<String>, secret_key: impl Into<String>) -> Result<Self, RunError> {
        let client = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self::with_client(client, api_url, secret_key))
    }

    /// Create a client reusing an existing [`reqwest::Client`].
    pub fn with_client(
        client: reqwest::Client,
        api_url: impl Into<String>,
        secret_key: impl Into<String>,
    ) -> Self {
        Self {
            client,
            api_url: api_url.into().trim_end_matches('/').to_owned(),
            secret_key: secret_key.into(),
        }
    }

    fn trigger_url(&self, task_id: &str) -> String {
        format!("{}/api/v1/tasks/{}/trigger", self.api_url, task_id)
    }

    fn run_url(&self, run_id: &str) -> String {
        format!("{}/api/v3/runs/{}", self.api_url, run_id)
    }

    // ---- private helpers ----

    /// Turn a non-2xx response into [`RunError::Api`], otherwise return
    /// the body text.
    async fn read_body(response: reqwest::Response) -> Result<String, RunError> {
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(RunError::Api { status: status.as_u16(), body });
        }
        Ok(body)
    }
}

#[async_trait]
impl RunClient for TriggerClient {
    async fn trigger(&self, task_id: &str, payload: &Value) -> Result<TriggeredRun, RunError> {
        let response = self
            .client
            .post(self.trigger_url(task_id))
            .bearer_auth(&self.secret_key)
            .json(&serde_json::json!({ "payload": payload }))
            .send()
            .await?;

        let body = Self::read_body(response).await?;
        let parsed: TriggerResponse = serde_json::from_str(&body)?;
        tracing::info!(task_id, run_id = %parsed.id, "run triggered");
        Ok(TriggeredRun { id: parsed.id })
    }

    async fn retrieve(&self, run_id: &str) -> Result<RunOutcome, RunError> {
        let response = self
            .client
            .get(self.run_url(run_id))
            .bearer_auth(&self.secret_key)
            .send()
            .await?;

        let body = Self::read_body(response).await?;
        let parsed: RetrieveResponse = serde_json::from_str(&body)?;
        Ok(RunOutcome {
            run_id: parsed.id,
            status: parsed.status,
            output: parsed.output,
            error: parsed.error.and_then(|e| e.message),
        })
    }
}
