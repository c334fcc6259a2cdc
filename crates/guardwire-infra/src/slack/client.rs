//! `chat.postMessage` client.
//!
//! The bot token is wrapped in [`SecretString`] and only exposed when building
//! the `Authorization` header.

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::Value;

use guardwire_core::alert::ChatNotifier;
use guardwire_types::error::CollaboratorError;

use crate::http::{status_error, transport_error};

pub const DEFAULT_API_BASE: &str = "https://slack.com/api";

/// Web API envelope. HTTP 200 with `ok: false` is still a failure.
#[derive(Debug, Deserialize)]
struct ApiResponse {
    ok: bool,
    #[serde(default)]
    error: Option<String>,
}

pub struct SlackClient {
    http: reqwest::Client,
    token: SecretString,
    api_base: String,
}

impl SlackClient {
    pub fn new(http: reqwest::Client, token: SecretString) -> Self {
        Self {
            http,
            token,
            api_base: DEFAULT_API_BASE.to_string(),
        }
    }

    /// Override the API base URL (testing or proxies).
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    fn url(&self, method: &str) -> String {
        format!("{}/{method}", self.api_base)
    }
}

impl ChatNotifier for SlackClient {
    async fn post_message(&self, message: &Value) -> Result<(), CollaboratorError> {
        let response = self
            .http
            .post(self.url("chat.postMessage"))
            .bearer_auth(self.token.expose_secret())
            .json(message)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(status_error(status, &body));
        }

        let api: ApiResponse = response.json().await.map_err(|e| {
            CollaboratorError::Deserialization(format!("failed to parse chat.postMessage response: {e}"))
        })?;
        if !api.ok {
            return Err(CollaboratorError::Api {
                code: api.error.unwrap_or_else(|| "unknown_error".to_string()),
                message: "chat.postMessage rejected the message".to_string(),
            });
        }
        Ok(())
    }
}
