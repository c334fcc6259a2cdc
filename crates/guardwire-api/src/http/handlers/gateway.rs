//! Proxy-integration variant of the Slack endpoint.
//!
//! An upstream gateway forwards the original request wrapped in a JSON
//! envelope, possibly with the body base64-encoded. The pipeline outcome is
//! returned inside the reply body with HTTP 200.

use std::collections::HashMap;

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use serde::Deserialize;
use tracing::Instrument;
use uuid::Uuid;

use guardwire_types::webhook::InboundRequest;

use crate::http::error::AppError;
use crate::http::response::GatewayReply;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayEnvelope {
    #[serde(default)]
    pub headers: Option<HashMap<String, String>>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub is_base64_encoded: bool,
}

impl GatewayEnvelope {
    pub fn into_request(self) -> InboundRequest {
        let headers = self.headers.unwrap_or_default().into_iter().collect();
        InboundRequest::new(headers, self.body.unwrap_or_default())
            .base64_encoded(self.is_base64_encoded)
    }
}

/// POST /gateway/slack-actions - Envelope form of `/slack/actions`.
pub async fn gateway_actions(
    State(state): State<AppState>,
    payload: Result<Json<GatewayEnvelope>, JsonRejection>,
) -> Result<Json<GatewayReply>, AppError> {
    let Json(envelope) = payload?;
    let request = envelope.into_request();
    let span = tracing::info_span!(
        "gateway_action",
        request_id = %Uuid::now_v7(),
        base64 = request.is_base64_encoded
    );

    let response = state
        .action_pipeline
        .handle(&request)
        .instrument(span)
        .await;
    Ok(Json(GatewayReply::from(response)))
}
