//! Building the callback body from a run outcome.
//!
//! Rules:
//! 1. A `COMPLETED` run reports `completed` with its output.
//! 2. Any other terminal status reports `failed` with a non-empty `error`.
//! 3. Metadata fields are copied through unchanged.

use serde_json::{json, Value};

use runs::RunOutcome;

use crate::models::{CallbackPayload, DeliveryStatus, JobMetadata, PayloadOutput};

/// Field of the run output holding the rendered document.
pub const CONTENT_FIELD: &str = "full_document_markdown";

impl CallbackPayload {
    /// Build the callback body for a run that reached a terminal status.
    pub fn from_outcome(job_id: &str, metadata: &JobMetadata, outcome: &RunOutcome) -> Self {
        if outcome.status.is_success() {
            let structured = outcome.output.clone().unwrap_or_else(|| json!({}));
            let content_raw = content_of(&structured);
            return Self {
                job_id: job_id.to_owned(),
                trigger_run_id: outcome.run_id.clone(),
                status: DeliveryStatus::Completed,
                output: Some(PayloadOutput { structured, content_raw }),
                error: None,
                metadata: metadata.clone(),
            };
        }

        let message = match outcome.error.as_deref().map(str::trim) {
            Some(msg) if !msg.is_empty() => msg.to_owned(),
            _ => format!("run finished with status {}", outcome.status),
        };
        Self::failure(job_id, &outcome.run_id, metadata, message)
    }

    /// Build a `failed` body carrying `message`.
    ///
    /// A blank message is replaced so that `error` is never empty.
    pub fn failure(
        job_id: &str,
        run_id: &str,
        metadata: &JobMetadata,
        message: impl Into<String>,
    ) -> Self {
        let mut message = message.into();
        if message.trim().is_empty() {
            message = "job failed".to_owned();
        }
        Self {
            job_id: job_id.to_owned(),
            trigger_run_id: run_id.to_owned(),
            status: DeliveryStatus::Failed,
            output: None,
            error: Some(message),
            metadata: metadata.clone(),
        }
    }
}

fn content_of(output: &Value) -> String {
    output
        .get(CONTENT_FIELD)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_owned()
}

// ============================================================
// Unit tests
// ============================================================
#[cfg(test)]
mod tests {
    use runs::RunStatus;

    use super::*;

    fn outcome(status: RunStatus, output: Option<Value>, error: Option<&str>) -> RunOutcome {
        RunOutcome {
            run_id: "run_abc".into(),
            status,
            output,
            error: error.map(str::to_owned),
        }
    }

    fn full_metadata() -> JobMetadata {
        JobMetadata {
            deliverable_id: Some("del_1".into()),
            contract_id: Some("con_1".into()),
            title: Some("Market report".into()),
        }
    }

    #[test]
    fn completed_run_carries_raw_and_structured_output() {
        let output = json!({ "full_document_markdown": "# Report", "sections": 3 });
        let payload = CallbackPayload::from_outcome(
            "job_1",
            &JobMetadata::default(),
            &outcome(RunStatus::Completed, Some(output.clone()), None),
        );

        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["status"], "completed");
        assert_eq!(json["job_id"], "job_1");
        assert_eq!(json["trigger_run_id"], "run_abc");
        assert_eq!(json["output"]["content_raw"], "# Report");
        assert_eq!(json["output"]["structured"], output);
        assert!(json.get("error").is_none());
    }

    #[test]
    fn completed_run_without_document_has_empty_raw_content() {
        let payload = CallbackPayload::from_outcome(
            "job_1",
            &JobMetadata::default(),
            &outcome(RunStatus::Completed, None, None),
        );
        let output = payload.output.expect("completed payload has output");
        assert_eq!(output.content_raw, "");
        assert_eq!(output.structured, json!({}));
    }

    #[test]
    fn every_other_terminal_status_is_reported_as_failed() {
        for status in [
            RunStatus::Canceled,
            RunStatus::Failed,
            RunStatus::Crashed,
            RunStatus::Interrupted,
            RunStatus::SystemFailure,
            RunStatus::Expired,
            RunStatus::TimedOut,
        ] {
            for error in [None, Some(""), Some("   "), Some("model quota exceeded")] {
                let payload = CallbackPayload::from_outcome(
                    "job_1",
                    &JobMetadata::default(),
                    &outcome(status.clone(), None, error),
                );
                let json = serde_json::to_value(&payload).unwrap();
                assert_eq!(json["status"], "failed");
                assert!(
                    !json["error"].as_str().unwrap_or_default().trim().is_empty(),
                    "{status} with {error:?} produced an empty error"
                );
                assert!(json.get("output").is_none());
            }
        }
    }

    #[test]
    fn failure_message_prefers_run_error() {
        let payload = CallbackPayload::from_outcome(
            "job_1",
            &JobMetadata::default(),
            &outcome(RunStatus::Crashed, None, Some("out of memory")),
        );
        assert_eq!(payload.error.as_deref(), Some("out of memory"));

        let payload = CallbackPayload::from_outcome(
            "job_1",
            &JobMetadata::default(),
            &outcome(RunStatus::Expired, None, None),
        );
        assert_eq!(payload.error.as_deref(), Some("run finished with status EXPIRED"));
    }

    #[test]
    fn metadata_is_flattened_when_present() {
        let payload = CallbackPayload::from_outcome(
            "job_1",
            &full_metadata(),
            &outcome(RunStatus::Completed, Some(json!({})), None),
        );
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["deliverable_id"], "del_1");
        assert_eq!(json["contract_id"], "con_1");
        assert_eq!(json["title"], "Market report");
        assert!(json.get("metadata").is_none());
    }

    #[test]
    fn metadata_is_absent_when_not_supplied() {
        let metadata = JobMetadata { title: Some("Only a title".into()), ..Default::default() };
        let payload = CallbackPayload::failure("job_1", "run_abc", &metadata, "boom");
        let json = serde_json::to_value(&payload).unwrap();

        assert_eq!(json["title"], "Only a title");
        assert!(json.get("deliverable_id").is_none());
        assert!(json.get("contract_id").is_none());
    }

    #[test]
    fn blank_failure_message_is_replaced() {
        let payload = CallbackPayload::failure("job_1", "", &JobMetadata::default(), "");
        assert_eq!(payload.error.as_deref(), Some("job failed"));
    }

    #[test]
    fn payload_decodes_back_with_metadata() {
        let json = json!({
            "job_id": "job_1",
            "trigger_run_id": "run_abc",
            "status": "failed",
            "error": "boom",
            "contract_id": "con_1"
        });
        let payload: CallbackPayload = serde_json::from_value(json).unwrap();
        assert_eq!(payload.status, DeliveryStatus::Failed);
        assert_eq!(payload.metadata.contract_id.as_deref(), Some("con_1"));
        assert!(payload.metadata.title.is_none());
    }
}
