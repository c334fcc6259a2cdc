//! Finding intake: runs the alert pipeline for one event.

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use tracing::Instrument;
use uuid::Uuid;

use guardwire_core::alert::AlertReport;
use guardwire_types::finding::FindingEvent;

use crate::http::error::AppError;
use crate::state::AppState;

/// POST /findings - Enrich, format and deliver an alert.
///
/// Delivery failures are reported in the body, never as an error status.
pub async fn receive_finding(
    State(state): State<AppState>,
    payload: Result<Json<FindingEvent>, JsonRejection>,
) -> Result<Json<AlertReport>, AppError> {
    let Json(event) = payload?;
    let span = tracing::info_span!("finding", request_id = %Uuid::now_v7());

    let report = state
        .alert_pipeline
        .process(&event.detail)
        .instrument(span)
        .await;
    Ok(Json(report))
}
