//! Outbound notification sinks.

use serde_json::Value;

use guardwire_types::error::CollaboratorError;

/// Topic-style bus taking a subject and a plain-text body.
pub trait NotificationBus: Send + Sync {
    fn publish(
        &self,
        subject: &str,
        message: &str,
    ) -> impl std::future::Future<Output = Result<(), CollaboratorError>> + Send;
}

/// Chat channel poster. The message is a provider-specific JSON document.
pub trait ChatNotifier: Send + Sync {
    fn post_message(
        &self,
        message: &Value,
    ) -> impl std::future::Future<Output = Result<(), CollaboratorError>> + Send;
}
