//! Direct Slack interactivity endpoint.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::HeaderMap;
use tracing::Instrument;
use uuid::Uuid;

use guardwire_types::webhook::InboundRequest;

use crate::http::response::ActionReply;
use crate::state::AppState;

/// Copy headers into the transport-neutral form. Non-UTF-8 values are dropped;
/// a mangled signature header would fail verification anyway.
pub fn collect_headers(headers: &HeaderMap) -> Vec<(String, String)> {
    headers
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|v| (name.as_str().to_string(), v.to_string()))
        })
        .collect()
}

/// POST /slack/actions - Verify and execute a quarantine button click.
///
/// The body is taken as raw bytes: the signature covers exactly what was sent.
pub async fn slack_actions(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> ActionReply {
    let request = InboundRequest::new(collect_headers(&headers), body.to_vec());
    let span = tracing::info_span!("slack_action", request_id = %Uuid::now_v7());

    let response = state
        .action_pipeline
        .handle(&request)
        .instrument(span)
        .await;
    ActionReply(response)
}
