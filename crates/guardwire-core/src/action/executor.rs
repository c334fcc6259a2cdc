//! Collaborator traits for the action pipeline.
//!
//! Implementations live in guardwire-infra (EC2 isolation, Slack
//! `response_url` acknowledgment).

use guardwire_types::error::CollaboratorError;

/// Moves a compute instance into an isolated network posture.
///
/// Called at most once per inbound request. Implementations must not retry
/// internally; the caller re-submits the signed request if it needs another
/// attempt.
pub trait IsolationExecutor: Send + Sync {
    fn isolate(
        &self,
        resource_id: &str,
        policy_id: &str,
    ) -> impl std::future::Future<Output = Result<(), CollaboratorError>> + Send;
}

/// Posts a short confirmation to the callback address of an interaction.
///
/// Failures are reported but never change the outcome of the request.
pub trait AcknowledgmentSender: Send + Sync {
    fn post_acknowledgment(
        &self,
        callback_url: &str,
        text: &str,
    ) -> impl std::future::Future<Output = Result<(), CollaboratorError>> + Send;
}
