//! Action extraction from a decoded interaction payload.

use serde_json::Value;

use guardwire_types::action::{ActionPayload, ActionTarget};
use guardwire_types::error::ActionError;

/// Read the first action entry and the surrounding callback metadata.
///
/// Only `actions[0].value` is required. `response_url`, the action id and the
/// operator identity are optional and used for acknowledgment and audit logs.
pub fn extract_action(payload: &Value) -> Result<ActionPayload, ActionError> {
    let first = payload
        .get("actions")
        .and_then(Value::as_array)
        .and_then(|actions| actions.first())
        .ok_or_else(|| ActionError::MalformedPayload("missing or empty actions list".to_string()))?;

    let value = first
        .get("value")
        .and_then(Value::as_str)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ActionError::MalformedPayload("first action has no value".to_string()))?;

    let user = payload.get("user").and_then(|u| {
        u.get("username")
            .or_else(|| u.get("name"))
            .or_else(|| u.get("id"))
            .and_then(Value::as_str)
            .map(str::to_string)
    });

    Ok(ActionPayload {
        action_id: first
            .get("action_id")
            .and_then(Value::as_str)
            .map(str::to_string),
        value: value.to_string(),
        response_url: payload
            .get("response_url")
            .and_then(Value::as_str)
            .filter(|url| !url.is_empty())
            .map(str::to_string),
        user,
    })
}

/// Resolve the isolation target, short-circuiting on the sentinel.
pub fn resolve_target(action: &ActionPayload) -> Result<String, ActionError> {
    match action.target() {
        ActionTarget::Resource(id) => Ok(id),
        ActionTarget::NoTarget => Err(ActionError::NoTarget),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_extract_minimal_payload() {
        let action = extract_action(&json!({"actions": [{"value": "i-0abc123"}]})).unwrap();
        assert_eq!(action.value, "i-0abc123");
        assert!(action.response_url.is_none());
        assert!(action.action_id.is_none());
        assert!(action.user.is_none());
    }

    #[test]
    fn test_extract_full_payload() {
        let payload = json!({
            "type": "block_actions",
            "user": {"id": "U123", "username": "alice"},
            "response_url": "https://hooks.slack.com/actions/T1/1/abc",
            "actions": [
                {"action_id": "quarantine_instance", "value": "i-0abc123"},
                {"action_id": "other", "value": "ignored"}
            ]
        });
        let action = extract_action(&payload).unwrap();
        assert_eq!(action.value, "i-0abc123");
        assert_eq!(action.action_id.as_deref(), Some("quarantine_instance"));
        assert_eq!(
            action.response_url.as_deref(),
            Some("https://hooks.slack.com/actions/T1/1/abc")
        );
        assert_eq!(action.user.as_deref(), Some("alice"));
    }

    #[test]
    fn test_missing_actions_is_malformed() {
        assert!(matches!(
            extract_action(&json!({"response_url": "x"})),
            Err(ActionError::MalformedPayload(_))
        ));
    }

    #[test]
    fn test_empty_actions_is_malformed() {
        assert!(matches!(
            extract_action(&json!({"actions": []})),
            Err(ActionError::MalformedPayload(_))
        ));
    }

    #[test]
    fn test_actions_not_a_list_is_malformed() {
        assert!(matches!(
            extract_action(&json!({"actions": {"value": "i-1"}})),
            Err(ActionError::MalformedPayload(_))
        ));
    }

    #[test]
    fn test_non_string_value_is_malformed() {
        assert!(matches!(
            extract_action(&json!({"actions": [{"value": 42}]})),
            Err(ActionError::MalformedPayload(_))
        ));
        assert!(matches!(
            extract_action(&json!({"actions": [{"value": ""}]})),
            Err(ActionError::MalformedPayload(_))
        ));
    }

    #[test]
    fn test_payload_not_an_object_is_malformed() {
        assert!(matches!(
            extract_action(&json!(["i-1"])),
            Err(ActionError::MalformedPayload(_))
        ));
    }

    #[test]
    fn test_resolve_target_sentinel() {
        let action = extract_action(&json!({"actions": [{"value": "no-instance"}]})).unwrap();
        assert_eq!(resolve_target(&action), Err(ActionError::NoTarget));
    }

    #[test]
    fn test_resolve_target_instance() {
        let action = extract_action(&json!({"actions": [{"value": "i-0abc123"}]})).unwrap();
        assert_eq!(resolve_target(&action).unwrap(), "i-0abc123");
    }
}
