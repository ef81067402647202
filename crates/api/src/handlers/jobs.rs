use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{error, info};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use super::AppState;
use engine::{EngineError, JobMetadata, JobRequest};
use webhook::CallbackTarget;

#[derive(Debug, Deserialize, Validate)]
pub struct SubmitJobDto {
    /// Generated when omitted.
    #[serde(default)]
    pub job_id: Option<String>,
    #[validate(url, custom(function = "http_scheme"))]
    pub callback_url: String,
    #[serde(default)]
    pub callback_api_key: Option<String>,
    #[serde(flatten)]
    pub metadata: JobMetadata,
    /// Run input; an empty object when omitted.
    #[serde(default = "empty_object")]
    pub input: Value,
}

fn empty_object() -> Value {
    Value::Object(Default::default())
}

/// Callbacks are POSTed with reqwest, so only http(s) targets are usable.
fn http_scheme(url: &str) -> Result<(), ValidationError> {
    let scheme = url.trim_start().split_once("://").map(|(scheme, _)| scheme);
    match scheme {
        Some(s) if s.eq_ignore_ascii_case("http") || s.eq_ignore_ascii_case("https") => Ok(()),
        _ => Err(ValidationError::new("http_scheme")
            .with_message("callback_url must be an http(s) URL".into())),
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SubmitJobResponse {
    pub job_id: String,
    pub trigger_run_id: String,
}

type ApiError = (StatusCode, Json<Value>);

fn api_error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (status, Json(json!({ "error": message.into() })))
}

/// Trigger a run and watch it in the background.
///
/// Responds `202` as soon as the job system has accepted the run; the
/// result arrives later at `callback_url`.
pub async fn submit(
    State(state): State<AppState>,
    Json(payload): Json<SubmitJobDto>,
) -> Result<(StatusCode, Json<SubmitJobResponse>), ApiError> {
    if let Err(e) = payload.validate() {
        return Err(api_error(StatusCode::BAD_REQUEST, format!("invalid request: {e}")));
    }

    let job_id = payload
        .job_id
        .filter(|id| !id.trim().is_empty())
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    let request = JobRequest {
        job_id: job_id.clone(),
        callback: CallbackTarget::new(payload.callback_url.trim(), payload.callback_api_key),
        metadata: payload.metadata,
        input: payload.input,
    };

    match state.watcher.submit(request).await {
        Ok(submission) => {
            info!(job_id = %job_id, run_id = %submission.run.id, "job accepted");
            Ok((
                StatusCode::ACCEPTED,
                Json(SubmitJobResponse { job_id, trigger_run_id: submission.run.id }),
            ))
        }
        Err(e @ EngineError::Trigger(_)) => {
            error!(job_id = %job_id, error = %e, "job system rejected the run");
            Err(api_error(StatusCode::BAD_GATEWAY, e.to_string()))
        }
        Err(e) => {
            error!(job_id = %job_id, error = %e, "job submission failed");
            Err(api_error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))
        }
    }
}
