//! Inbound webhook protocol: signature verification and payload decoding.

pub mod compare;
pub mod extract;
pub mod payload;
pub mod signature;

pub use compare::constant_time_eq;
pub use extract::{extract_action, resolve_target};
pub use payload::{decode_payload, decode_transport_body};
pub use signature::{SignatureVerifier, compute_signature};
