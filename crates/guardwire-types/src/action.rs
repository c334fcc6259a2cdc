//! Action payload, target resolution and pipeline outcomes.

use serde::{Deserialize, Serialize};

/// Reserved action value meaning "no actionable target".
pub const NO_TARGET_SENTINEL: &str = "no-instance";

/// Action id carried by the quarantine button.
pub const QUARANTINE_ACTION_ID: &str = "quarantine_instance";

/// The action the operator triggered, parsed from a verified body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionPayload {
    pub action_id: Option<String>,
    /// Target instance id, or [`NO_TARGET_SENTINEL`].
    pub value: String,
    pub response_url: Option<String>,
    /// Operator who clicked the button, when the provider reports one.
    pub user: Option<String>,
}

impl ActionPayload {
    pub fn target(&self) -> ActionTarget {
        if self.value == NO_TARGET_SENTINEL {
            ActionTarget::NoTarget
        } else {
            ActionTarget::Resource(self.value.clone())
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionTarget {
    Resource(String),
    NoTarget,
}

/// Result of a single isolation attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IsolationOutcome {
    pub resource_id: String,
    pub success: bool,
    pub error_detail: Option<String>,
}

impl IsolationOutcome {
    pub fn succeeded(resource_id: impl Into<String>) -> Self {
        Self {
            resource_id: resource_id.into(),
            success: true,
            error_detail: None,
        }
    }

    pub fn failed(resource_id: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            resource_id: resource_id.into(),
            success: false,
            error_detail: Some(detail.into()),
        }
    }
}

/// Transport-neutral response produced by the action pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionResponse {
    pub status: u16,
    pub body: String,
}

impl ActionResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(value: &str) -> ActionPayload {
        ActionPayload {
            action_id: Some(QUARANTINE_ACTION_ID.to_string()),
            value: value.to_string(),
            response_url: None,
            user: None,
        }
    }

    #[test]
    fn test_sentinel_maps_to_no_target() {
        assert_eq!(payload("no-instance").target(), ActionTarget::NoTarget);
    }

    #[test]
    fn test_instance_id_maps_to_resource() {
        assert_eq!(
            payload("i-0abc123").target(),
            ActionTarget::Resource("i-0abc123".to_string())
        );
    }

    #[test]
    fn test_sentinel_match_is_exact() {
        // Only the exact sentinel short-circuits.
        assert_eq!(
            payload("No-Instance").target(),
            ActionTarget::Resource("No-Instance".to_string())
        );
    }
}
