//! Outcome of a best-effort side call.
//!
//! Chat posts, bus publishes and acknowledgments never affect the outcome of
//! the request that triggered them. Their result is reported as a
//! [`Delivery`] that callers are free to discard.

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "reason", rename_all = "snake_case")]
pub enum Delivery {
    Delivered,
    /// The sink is not configured.
    Skipped,
    Failed(String),
}

impl Delivery {
    pub fn is_delivered(&self) -> bool {
        matches!(self, Delivery::Delivered)
    }
}
