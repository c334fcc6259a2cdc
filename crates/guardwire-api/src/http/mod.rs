//! HTTP layer: the Slack interactivity endpoints, the gateway envelope
//! variant, finding intake and liveness.

pub mod error;
pub mod handlers;
pub mod response;
pub mod router;
