//! The `Transport` trait and its reqwest implementation.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::AttemptError;

/// Header carrying the caller's callback credential.
pub const API_KEY_HEADER: &str = "x-api-key";

/// HTTP request timeout for a single delivery attempt.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Where to deliver a result.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallbackTarget {
    pub url: String,
    /// Sent as `x-api-key` when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

impl CallbackTarget {
    pub fn new(url: impl Into<String>, api_key: Option<String>) -> Self {
        Self { url: url.into(), api_key }
    }
}

// Keep the credential out of logs and panic messages.
impl std::fmt::Debug for CallbackTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallbackTarget")
            .field("url", &self.url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Performs one POST attempt.  Retry policy lives in [`crate::Delivery`].
#[async_trait]
pub trait Transport: Send + Sync {
    async fn post_json(&self, target: &CallbackTarget, body: &Value) -> Result<(), AttemptError>;
}

/// [`Transport`] backed by a pooled [`reqwest::Client`].
#[derive(Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// Create a transport with a pre-configured HTTP client.
    pub fn new() -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self { client })
    }

    /// Reuse an existing client (and its connection pool).
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post_json(&self, target: &CallbackTarget, body: &Value) -> Result<(), AttemptError> {
        let mut request = self.client.post(&target.url).json(body);
        if let Some(key) = &target.api_key {
            request = request.header(API_KEY_HEADER, key);
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(AttemptError::HttpStatus(response.status().as_u16()));
        }
        Ok(())
    }
}
