//! Event endpoint handler.
//!
//! Accepts a notification envelope, runs it through the processor, logs the
//! per-entry report and returns its summary. Entry-level failures do not
//! change the status code; they are visible in the summary and the logs.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tracing::{debug, error};

use super::AppState;
use crate::processor::ReportSummary;

/// Errors that can occur when handling an event request.
#[derive(Debug, Error)]
pub enum EventsError {
    /// The blocking processing task panicked or was cancelled.
    #[error("event processing task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

impl IntoResponse for EventsError {
    fn into_response(self) -> Response {
        error!(error = %self, "Event processing aborted");
        (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()).into_response()
    }
}

/// Event handler.
///
/// # Request
///
/// - Method: POST
/// - Body: the envelope JSON (or the placeholder body)
///
/// # Response
///
/// - 200 OK with a [`ReportSummary`] body
/// - 400 Bad Request if the body is not UTF-8
/// - 500 Internal Server Error if processing panicked
///
/// # Example
///
/// ```ignore
/// POST /events HTTP/1.1
/// Content-Type: application/json
///
/// {"headers": {"X-GitHub-Event": ["issues"]}, "content": "eyJhY3Rpb24iOi..."}
///
/// HTTP/1.1 200 OK
///
/// {"placeholder": false, "entries": [{"key": "headers", "status": "event_type"}, ...]}
/// ```
pub async fn events_handler(
    State(app_state): State<AppState>,
    body: String,
) -> Result<Json<ReportSummary>, EventsError> {
    debug!(bytes = body.len(), "Received event envelope");

    // The labeler may block on the prediction service.
    let processor = app_state.processor();
    let report = tokio::task::spawn_blocking(move || processor.process(&body)).await?;

    report.log();
    Ok(Json(report.summary()))
}
