//! Tests for the trigger → poll → deliver pipeline.
//!
//! These use `MockRunClient` and `MockTransport` so no job system or
//! callback server is required.  Time is paused, so poll intervals and
//! retry backoff cost nothing.

use std::sync::Arc;
use std::time::Duration;

use serde_json::{json, Value};

use runs::mock::{MockRunClient, MockStep};
use runs::{PollOptions, RunStatus};
use webhook::mock::MockTransport;
use webhook::{CallbackTarget, RetryPolicy, API_KEY_HEADER};

use crate::{EngineError, JobMetadata, JobRequest, Watcher, WatcherConfig};

fn config(max_attempts: u32) -> WatcherConfig {
    WatcherConfig {
        task_id: "generate-report".into(),
        poll: PollOptions {
            interval: Duration::from_secs(5),
            timeout: Duration::from_secs(60),
            max_consecutive_errors: 0,
        },
        retry: RetryPolicy { max_attempts, base_delay: Duration::from_millis(500) },
    }
}

fn request(metadata: JobMetadata) -> JobRequest {
    JobRequest {
        job_id: "job_42".into(),
        callback: CallbackTarget::new("https://caller.example/hooks/report", Some("key-1".into())),
        metadata,
        input: json!({ "company": "Acme" }),
    }
}

fn watcher(runs: &Arc<MockRunClient>, transport: &Arc<MockTransport>, max_attempts: u32) -> Watcher {
    Watcher::new(runs.clone(), transport.clone(), config(max_attempts))
}

fn only_body(transport: &MockTransport) -> Value {
    let bodies = transport.bodies();
    assert_eq!(bodies.len(), 1, "expected exactly one delivery");
    bodies.into_iter().next().unwrap()
}

// ============================================================
// Happy path
// ============================================================

#[tokio::test(start_paused = true)]
async fn completed_run_delivers_completed_payload() {
    let runs = Arc::new(MockRunClient::scripted(
        "run_1",
        vec![
            MockStep::status(RunStatus::Queued, None, None),
            MockStep::status(RunStatus::Executing, None, None),
            MockStep::status(
                RunStatus::Completed,
                Some(json!({ "full_document_markdown": "# Report" })),
                None,
            ),
        ],
    ));
    let transport = Arc::new(MockTransport::succeeding());

    let run = watcher(&runs, &transport, 3)
        .run_to_completion(&request(JobMetadata::default()))
        .await
        .expect("job should succeed");

    assert_eq!(run.id, "run_1");
    assert_eq!(runs.trigger_count(), 1);
    assert_eq!(runs.triggered.lock().unwrap()[0], json!({ "company": "Acme" }));
    assert_eq!(runs.retrieve_count(), 3);

    let body = only_body(&transport);
    assert_eq!(body["status"], "completed");
    assert_eq!(body["job_id"], "job_42");
    assert_eq!(body["trigger_run_id"], "run_1");
    assert_eq!(body["output"]["content_raw"], "# Report");
    assert_eq!(body["output"]["structured"]["full_document_markdown"], "# Report");
}

#[tokio::test(start_paused = true)]
async fn callback_credential_travels_with_every_attempt() {
    let runs = Arc::new(MockRunClient::completing("run_1", json!({})));
    let transport = Arc::new(MockTransport::succeeding_on(2));

    watcher(&runs, &transport, 3)
        .run_to_completion(&request(JobMetadata::default()))
        .await
        .unwrap();

    let targets = transport.targets();
    assert_eq!(targets.len(), 2);
    for target in targets {
        assert_eq!(target.url, "https://caller.example/hooks/report");
        assert_eq!(target.api_key.as_deref(), Some("key-1"), "{API_KEY_HEADER} must be sent");
    }
}

#[tokio::test(start_paused = true)]
async fn metadata_is_echoed_at_top_level() {
    let runs = Arc::new(MockRunClient::completing("run_1", json!({})));
    let transport = Arc::new(MockTransport::succeeding());
    let metadata = JobMetadata {
        deliverable_id: Some("del_7".into()),
        contract_id: None,
        title: Some("Competitor scan".into()),
    };

    watcher(&runs, &transport, 3)
        .run_to_completion(&request(metadata))
        .await
        .unwrap();

    let body = only_body(&transport);
    assert_eq!(body["deliverable_id"], "del_7");
    assert_eq!(body["title"], "Competitor scan");
    assert!(body.get("contract_id").is_none());
}

// ============================================================
// Failed runs
// ============================================================

#[tokio::test(start_paused = true)]
async fn failed_run_delivers_failed_payload_with_error() {
    let runs = Arc::new(MockRunClient::ending("run_1", RunStatus::Crashed, None));
    let transport = Arc::new(MockTransport::succeeding());

    watcher(&runs, &transport, 3)
        .run_to_completion(&request(JobMetadata::default()))
        .await
        .expect("a failed run is still a successful delivery");

    let body = only_body(&transport);
    assert_eq!(body["status"], "failed");
    assert_eq!(body["error"], "run finished with status CRASHED");
    assert!(body.get("output").is_none());
}

#[tokio::test]
async fn trigger_failure_is_returned_without_any_callback() {
    let runs = Arc::new(MockRunClient::completing("run_1", json!({})).with_trigger_error(401));
    let transport = Arc::new(MockTransport::succeeding());

    let err = watcher(&runs, &transport, 3)
        .submit(request(JobMetadata::default()))
        .await
        .unwrap_err();

    assert!(matches!(err, EngineError::Trigger(_)));
    assert_eq!(runs.retrieve_count(), 0);
    assert_eq!(transport.call_count(), 0);
}

// ============================================================
// Watch errors become failure notifications
// ============================================================

#[tokio::test(start_paused = true)]
async fn poll_timeout_sends_failure_notification() {
    let runs = Arc::new(MockRunClient::scripted(
        "run_1",
        vec![MockStep::status(RunStatus::Executing, None, None)],
    ));
    let transport = Arc::new(MockTransport::succeeding());

    let err = watcher(&runs, &transport, 3)
        .watch_and_deliver("job_42", "run_1", &JobMetadata::default(), &request(JobMetadata::default()).callback)
        .await
        .unwrap_err();

    assert!(matches!(err, EngineError::Watch { ref run_id, .. } if run_id == "run_1"));
    let body = only_body(&transport);
    assert_eq!(body["status"], "failed");
    assert_eq!(body["trigger_run_id"], "run_1");
    assert!(body["error"].as_str().unwrap().contains("still not finished"));
}

#[tokio::test(start_paused = true)]
async fn poll_error_with_dead_callback_still_returns_watch_error() {
    let runs = Arc::new(MockRunClient::scripted("run_1", vec![MockStep::Fail(404)]));
    let transport = Arc::new(MockTransport::failing_with_status(500));

    let err = watcher(&runs, &transport, 2)
        .run_to_completion(&request(JobMetadata::default()))
        .await
        .unwrap_err();

    assert!(matches!(err, EngineError::Watch { .. }));
    // The failure notification used the normal retry budget.
    assert_eq!(transport.call_count(), 2);
}

// ============================================================
// Delivery exhaustion
// ============================================================

#[tokio::test(start_paused = true)]
async fn exhausted_delivery_is_attempted_exactly_max_attempts() {
    let runs = Arc::new(MockRunClient::completing("run_1", json!({})));
    let transport = Arc::new(MockTransport::failing_with_status(503));

    let err = watcher(&runs, &transport, 4)
        .run_to_completion(&request(JobMetadata::default()))
        .await
        .unwrap_err();

    assert!(matches!(err, EngineError::Delivery(_)));
    assert_eq!(transport.call_count(), 4);
    // Exhaustion is not followed by a second, failure-shaped round.
    assert!(transport.bodies().iter().all(|b| b["status"] == "completed"));
}

// ============================================================
// Fire-and-forget submission
// ============================================================

#[tokio::test(start_paused = true)]
async fn submit_returns_run_id_and_delivers_in_background() {
    let runs = Arc::new(MockRunClient::scripted(
        "run_bg",
        vec![
            MockStep::status(RunStatus::Executing, None, None),
            MockStep::status(RunStatus::Completed, Some(json!({ "full_document_markdown": "done" })), None),
        ],
    ));
    let transport = Arc::new(MockTransport::succeeding());

    let submission = watcher(&runs, &transport, 3)
        .submit(request(JobMetadata::default()))
        .await
        .unwrap();
    assert_eq!(submission.run.id, "run_bg");

    submission.task.await.expect("background task should not panic");
    assert_eq!(only_body(&transport)["output"]["content_raw"], "done");
}

#[tokio::test(start_paused = true)]
async fn background_failure_does_not_panic_the_task() {
    let runs = Arc::new(MockRunClient::completing("run_bg", json!({})));
    let transport = Arc::new(MockTransport::failing_with_status(500));

    let submission = watcher(&runs, &transport, 3)
        .submit(request(JobMetadata::default()))
        .await
        .unwrap();

    // The delivery error is logged, not propagated.
    assert!(submission.task.await.is_ok());
    assert_eq!(transport.call_count(), 3);
}

#[tokio::test(start_paused = true)]
async fn concurrent_jobs_do_not_interfere() {
    let transport = Arc::new(MockTransport::succeeding());
    let mut tasks = Vec::new();

    for i in 0..5 {
        let runs = Arc::new(MockRunClient::completing(
            format!("run_{i}"),
            json!({ "full_document_markdown": format!("doc {i}") }),
        ));
        let mut req = request(JobMetadata::default());
        req.job_id = format!("job_{i}");
        let submission = watcher(&runs, &transport, 3).submit(req).await.unwrap();
        tasks.push(submission.task);
    }
    for task in tasks {
        task.await.unwrap();
    }

    let mut seen: Vec<(String, String)> = transport
        .bodies()
        .iter()
        .map(|b| {
            (
                b["job_id"].as_str().unwrap().to_owned(),
                b["output"]["content_raw"].as_str().unwrap().to_owned(),
            )
        })
        .collect();
    seen.sort();
    let expected: Vec<(String, String)> =
        (0..5).map(|i| (format!("job_{i}"), format!("doc {i}"))).collect();
    assert_eq!(seen, expected);
}
