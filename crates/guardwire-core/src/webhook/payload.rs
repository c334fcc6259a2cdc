//! Transport decoding and form-container parsing.
//!
//! The provider posts `application/x-www-form-urlencoded` bodies whose
//! `payload` field holds a JSON document. Some transports additionally wrap
//! the whole body in base64 and set a flag; that layer is removed first so
//! that signature verification sees the bytes the provider actually signed.

use std::borrow::Cow;

use base64::Engine;

use guardwire_types::error::ActionError;
use guardwire_types::webhook::InboundRequest;

/// Name of the form field carrying the JSON document.
pub const PAYLOAD_FIELD: &str = "payload";

/// Remove the transport encoding, if any, returning the signed bytes.
///
/// A body flagged as base64 that does not decode cannot be authenticated, so
/// it is rejected as [`ActionError::Unauthenticated`].
pub fn decode_transport_body(request: &InboundRequest) -> Result<Cow<'_, [u8]>, ActionError> {
    if !request.is_base64_encoded {
        return Ok(Cow::Borrowed(&request.body));
    }

    base64::engine::general_purpose::STANDARD
        .decode(&request.body)
        .map(Cow::Owned)
        .map_err(|e| {
            tracing::debug!(error = %e, "transport body is not valid base64");
            ActionError::Unauthenticated
        })
}

/// Locate the `payload` form field and parse it as JSON.
pub fn decode_payload(body: &[u8]) -> Result<serde_json::Value, ActionError> {
    let fields: Vec<(String, String)> = serde_urlencoded::from_bytes(body)
        .map_err(|e| ActionError::MalformedPayload(format!("form decoding failed: {e}")))?;

    let raw = fields
        .into_iter()
        .find(|(key, _)| key == PAYLOAD_FIELD)
        .map(|(_, value)| value)
        .ok_or_else(|| ActionError::MalformedPayload("missing payload field".to_string()))?;

    serde_json::from_str(&raw)
        .map_err(|e| ActionError::MalformedPayload(format!("payload is not valid JSON: {e}")))
}
