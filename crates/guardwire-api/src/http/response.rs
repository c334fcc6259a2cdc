//! Response shapes for the action endpoints.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use guardwire_types::action::ActionResponse;

/// Pipeline outcome rendered as a plain-text HTTP response.
#[derive(Debug)]
pub struct ActionReply(pub ActionResponse);

impl IntoResponse for ActionReply {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.0.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (
            status,
            [(axum::http::header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            self.0.body,
        )
            .into_response()
    }
}

/// Proxy-integration reply: the outcome travels in the JSON body and the
/// gateway maps `statusCode` onto the client response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayReply {
    pub status_code: u16,
    pub body: String,
}

impl From<ActionResponse> for GatewayReply {
    fn from(response: ActionResponse) -> Self {
        Self {
            status_code: response.status,
            body: response.body,
        }
    }
}
