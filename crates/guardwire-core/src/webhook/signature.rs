//! Request signature verification for chat-provider callbacks.
//!
//! The provider signs every callback with HMAC-SHA256 over
//! `v0:{timestamp}:{body}` using the shared signing secret, and sends the
//! result as `v0=<hex>` alongside the timestamp:
//!
//! - `X-Slack-Request-Timestamp`: integer seconds since the epoch
//! - `X-Slack-Signature`: `v0=` followed by the lowercase hex digest
//!
//! The body must be the exact byte sequence the provider signed: decoded
//! from transport base64 if the transport flagged it, never re-encoded.

use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;

use guardwire_types::error::ActionError;
use guardwire_types::webhook::{InboundRequest, SignatureContext};

use super::compare::constant_time_eq;

type HmacSha256 = Hmac<Sha256>;

pub const TIMESTAMP_HEADER: &str = "X-Slack-Request-Timestamp";
pub const SIGNATURE_HEADER: &str = "X-Slack-Signature";

/// Signature scheme version, used both in the base string and as the prefix.
pub const SIGNATURE_VERSION: &str = "v0";

pub const DEFAULT_FRESHNESS_WINDOW_SECS: u64 = 300;

/// Verifies signed callbacks against the shared signing secret.
///
/// Holds only immutable configuration and is shared across concurrent
/// requests. The secret never appears in `Debug` output or logs.
pub struct SignatureVerifier {
    secret: SecretString,
    freshness_window_secs: u64,
}

impl SignatureVerifier {
    pub fn new(secret: SecretString) -> Self {
        Self {
            secret,
            freshness_window_secs: DEFAULT_FRESHNESS_WINDOW_SECS,
        }
    }

    pub fn with_freshness_window(mut self, secs: u64) -> Self {
        self.freshness_window_secs = secs;
        self
    }

    pub fn freshness_window_secs(&self) -> u64 {
        self.freshness_window_secs
    }

    /// Verify a request whose body has already been transport-decoded.
    ///
    /// Check order: headers present, timestamp parses, timestamp fresh,
    /// signature matches. Missing or invalid values yield
    /// [`ActionError::Unauthenticated`]; a stale timestamp yields
    /// [`ActionError::ReplayRejected`] regardless of signature validity.
    pub fn verify(
        &self,
        request: &InboundRequest,
        body: &[u8],
        now: i64,
    ) -> Result<SignatureContext, ActionError> {
        let raw_timestamp = request
            .header(TIMESTAMP_HEADER)
            .ok_or(ActionError::Unauthenticated)?;
        let claimed = request
            .header(SIGNATURE_HEADER)
            .ok_or(ActionError::Unauthenticated)?;

        let timestamp: i64 = raw_timestamp
            .parse()
            .map_err(|_| ActionError::Unauthenticated)?;

        if !is_fresh(timestamp, now, self.freshness_window_secs) {
            tracing::debug!(
                timestamp,
                now,
                window = self.freshness_window_secs,
                "request timestamp outside freshness window"
            );
            return Err(ActionError::ReplayRejected);
        }

        let computed = compute_signature(self.secret.expose_secret().as_bytes(), raw_timestamp, body)?;
        let context = SignatureContext {
            timestamp,
            claimed_signature: claimed.to_string(),
            computed_signature: computed,
        };

        if constant_time_eq(
            context.computed_signature.as_bytes(),
            context.claimed_signature.as_bytes(),
        ) {
            Ok(context)
        } else {
            Err(ActionError::Unauthenticated)
        }
    }

    /// Boolean verdict for callers that do not need the failure kind.
    pub fn is_authentic(&self, request: &InboundRequest, body: &[u8], now: i64) -> bool {
        self.verify(request, body, now).is_ok()
    }

    /// Sign a body with this verifier's secret. Used by operator tooling.
    pub fn sign(&self, timestamp: i64, body: &[u8]) -> Result<String, ActionError> {
        compute_signature(
            self.secret.expose_secret().as_bytes(),
            &timestamp.to_string(),
            body,
        )
    }

    /// Replace every occurrence of the signing secret in `text`.
    pub fn redact(&self, text: &str) -> String {
        let secret = self.secret.expose_secret();
        if secret.is_empty() {
            text.to_string()
        } else {
            text.replace(secret, "[REDACTED]")
        }
    }
}

/// True when `timestamp` is at most `window_secs` away from `now`, in either direction.
pub fn is_fresh(timestamp: i64, now: i64, window_secs: u64) -> bool {
    now.abs_diff(timestamp) <= window_secs
}

/// Build the base string the provider signs: `v0:{timestamp}:{body}`.
pub fn signing_base_string(timestamp: &str, body: &[u8]) -> Vec<u8> {
    let mut base = Vec::with_capacity(SIGNATURE_VERSION.len() + timestamp.len() + body.len() + 2);
    base.extend_from_slice(SIGNATURE_VERSION.as_bytes());
    base.push(b':');
    base.extend_from_slice(timestamp.as_bytes());
    base.push(b':');
    base.extend_from_slice(body);
    base
}

/// Compute the expected `v0=<hex>` signature for a timestamp and body.
pub fn compute_signature(secret: &[u8], timestamp: &str, body: &[u8]) -> Result<String, ActionError> {
    let mut mac = HmacSha256::new_from_slice(secret).map_err(|_| ActionError::Unauthenticated)?;
    mac.update(&signing_base_string(timestamp, body));
    let digest = mac.finalize().into_bytes();
    Ok(format!("{SIGNATURE_VERSION}={}", hex_encode(&digest)))
}

/// Encode bytes to a lowercase hex string.
fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}
