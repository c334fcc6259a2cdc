//! Acknowledgments posted to an interaction's `response_url`.

use serde_json::json;

use guardwire_core::action::AcknowledgmentSender;
use guardwire_types::error::CollaboratorError;

use crate::http::{status_error, transport_error};

/// Posts `{ text, replace_original: false }` so the original alert stays in
/// the channel with the confirmation beneath it.
pub struct ResponseUrlAcknowledger {
    http: reqwest::Client,
}

impl ResponseUrlAcknowledger {
    pub fn new(http: reqwest::Client) -> Self {
        Self { http }
    }
}

impl AcknowledgmentSender for ResponseUrlAcknowledger {
    async fn post_acknowledgment(&self, callback_url: &str, text: &str) -> Result<(), CollaboratorError> {
        let response = self
            .http
            .post(callback_url)
            .json(&json!({ "text": text, "replace_original": false }))
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(status_error(status, &body));
        }
        Ok(())
    }
}
