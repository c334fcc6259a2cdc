use thiserror::Error;

/// Terminal failure states of the action pipeline.
///
/// Every variant maps to exactly one response status via [`ActionError::status`].
/// Only [`ActionError::ExecutionFailed`] carries collaborator detail, and that
/// detail is redacted before it is stored here.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionError {
    /// Signature or timestamp header missing, unparsable, or signature mismatch.
    #[error("request signature missing or invalid")]
    Unauthenticated,

    /// Timestamp outside the freshness window.
    #[error("request timestamp outside the freshness window")]
    ReplayRejected,

    /// Body could not be decoded into an action payload.
    #[error("malformed payload: {0}")]
    MalformedPayload(String),

    /// The action carried the "no target" sentinel.
    #[error("no instance attached to the action")]
    NoTarget,

    /// The isolation collaborator reported a failure.
    #[error("failed to quarantine instance {resource_id}: {detail}")]
    ExecutionFailed { resource_id: String, detail: String },
}

impl ActionError {
    /// Response status for this failure.
    pub fn status(&self) -> u16 {
        match self {
            ActionError::Unauthenticated | ActionError::ReplayRejected => 401,
            ActionError::MalformedPayload(_) | ActionError::NoTarget => 400,
            ActionError::ExecutionFailed { .. } => 500,
        }
    }

    /// Taxonomy label, used as a structured log field.
    pub fn kind(&self) -> &'static str {
        match self {
            ActionError::Unauthenticated => "UNAUTHENTICATED",
            ActionError::ReplayRejected => "REPLAY_REJECTED",
            ActionError::MalformedPayload(_) => "MALFORMED_PAYLOAD",
            ActionError::NoTarget => "NO_TARGET",
            ActionError::ExecutionFailed { .. } => "EXECUTION_FAILED",
        }
    }

    /// Client-facing body. Verifier and decoder failures never echo detail.
    pub fn response_body(&self) -> String {
        match self {
            ActionError::Unauthenticated | ActionError::ReplayRejected => {
                "Unauthorized Slack request".to_string()
            }
            ActionError::MalformedPayload(_) => "Malformed action payload".to_string(),
            ActionError::NoTarget => "No EC2 instance to quarantine".to_string(),
            ActionError::ExecutionFailed { resource_id, detail } => {
                format!("Failed to quarantine instance {resource_id}: {detail}")
            }
        }
    }
}

/// Errors raised by outbound collaborators (cloud APIs, chat provider).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CollaboratorError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("{code}: {message}")]
    Api { code: String, message: String },

    #[error("deserialization error: {0}")]
    Deserialization(String),

    #[error("configuration error: {0}")]
    Configuration(String),
}

/// Errors raised while loading startup configuration.
///
/// These are fatal: the process never starts serving with an invalid config.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required setting: {0}")]
    Missing(&'static str),

    #[error("invalid value for {key}: {message}")]
    Invalid { key: &'static str, message: String },

    #[error("failed to read config file {path}: {message}")]
    Unreadable { path: String, message: String },

    #[error("failed to parse config file {path}: {message}")]
    Parse { path: String, message: String },
}
