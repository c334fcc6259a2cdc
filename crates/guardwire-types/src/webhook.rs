//! Inbound interactive request as received from the chat provider.

use std::fmt;

/// Raw inbound request, constructed per request and discarded after handling.
///
/// Header names keep whatever casing the transport delivered; lookups via
/// [`InboundRequest::header`] are case-insensitive.
#[derive(Debug, Clone, Default)]
pub struct InboundRequest {
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
    /// Set when the transport delivered the body base64-encoded.
    pub is_base64_encoded: bool,
}

impl InboundRequest {
    pub fn new(headers: Vec<(String, String)>, body: impl Into<Vec<u8>>) -> Self {
        Self {
            headers,
            body: body.into(),
            is_base64_encoded: false,
        }
    }

    /// Mark the body as base64-encoded by the transport.
    pub fn base64_encoded(mut self, encoded: bool) -> Self {
        self.is_base64_encoded = encoded;
        self
    }

    /// Case-insensitive header lookup. The first matching header wins.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Values derived from a request for signature verification. Never persisted.
#[derive(Clone, PartialEq, Eq)]
pub struct SignatureContext {
    pub timestamp: i64,
    pub claimed_signature: String,
    pub computed_signature: String,
}

impl fmt::Debug for SignatureContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignatureContext")
            .field("timestamp", &self.timestamp)
            .field("claimed_signature", &"[REDACTED]")
            .field("computed_signature", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_lookup_ignores_case() {
        let req = InboundRequest::new(
            vec![("x-slack-signature".to_string(), "v0=abc".to_string())],
            "body",
        );
        assert_eq!(req.header("X-Slack-Signature"), Some("v0=abc"));
        assert_eq!(req.header("X-SLACK-SIGNATURE"), Some("v0=abc"));
        assert_eq!(req.header("X-Slack-Request-Timestamp"), None);
    }

    #[test]
    fn test_signature_context_debug_redacts() {
        let ctx = SignatureContext {
            timestamp: 1,
            claimed_signature: "v0=claimed".to_string(),
            computed_signature: "v0=computed".to_string(),
        };
        let debug = format!("{ctx:?}");
        assert!(!debug.contains("v0=claimed"));
        assert!(!debug.contains("v0=computed"));
        assert!(debug.contains("[REDACTED]"));
    }
}
