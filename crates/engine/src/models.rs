//! Job requests and the callback wire format.
//!
//! [`CallbackPayload`] is the exact JSON body POSTed to the caller.
//! Optional fields are omitted entirely rather than sent as `null`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use webhook::CallbackTarget;

// ---------------------------------------------------------------------------
// JobMetadata
// ---------------------------------------------------------------------------

/// Caller-supplied identifiers echoed back at the top level of the callback.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deliverable_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contract_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

// ---------------------------------------------------------------------------
// JobRequest
// ---------------------------------------------------------------------------

/// Everything needed to run one job and report on it.
#[derive(Debug, Clone)]
pub struct JobRequest {
    /// Caller-side identifier, echoed as `job_id`.
    pub job_id: String,
    pub callback: CallbackTarget,
    pub metadata: JobMetadata,
    /// Passed verbatim to the job system as the run's payload.
    pub input: Value,
}

// ---------------------------------------------------------------------------
// CallbackPayload
// ---------------------------------------------------------------------------

/// Final state reported to the callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryStatus {
    Completed,
    Failed,
}

/// Result block of a completed job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayloadOutput {
    /// The run's full output object.
    pub structured: Value,
    /// The rendered document, or `""` if the run produced none.
    pub content_raw: String,
}

/// JSON body POSTed to the callback URL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallbackPayload {
    pub job_id: String,
    pub trigger_run_id: String,
    pub status: DeliveryStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<PayloadOutput>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(flatten)]
    pub metadata: JobMetadata,
}
