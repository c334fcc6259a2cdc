//! Shared outbound HTTP client construction.

use std::time::Duration;

use guardwire_types::error::CollaboratorError;

const USER_AGENT: &str = concat!("guardwire/", env!("CARGO_PKG_VERSION"));

/// Upper bound on response text carried into an error summary.
const MAX_ERROR_BODY_CHARS: usize = 200;

/// Build the client used by every adapter. One instance is shared process-wide.
pub fn build_client(timeout: Duration) -> Result<reqwest::Client, CollaboratorError> {
    reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .build()
        .map_err(|e| CollaboratorError::Configuration(format!("failed to create HTTP client: {e}")))
}

pub(crate) fn transport_error(e: reqwest::Error) -> CollaboratorError {
    if e.is_timeout() {
        CollaboratorError::Transport("request timed out".to_string())
    } else {
        CollaboratorError::Transport(format!("HTTP request failed: {}", e.without_url()))
    }
}

/// Status-code error with a bounded excerpt of the response body.
pub(crate) fn status_error(status: reqwest::StatusCode, body: &str) -> CollaboratorError {
    CollaboratorError::Api {
        code: format!("HTTP {}", status.as_u16()),
        message: body.trim().chars().take(MAX_ERROR_BODY_CHARS).collect(),
    }
}
