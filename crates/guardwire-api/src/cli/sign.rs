//! `gwire sign` - compute the headers a provider would send for a body.

use guardwire_core::webhook::SignatureVerifier;
use guardwire_core::webhook::signature::{SIGNATURE_HEADER, TIMESTAMP_HEADER};
use guardwire_infra::config::signing_secret;

pub fn run_sign(timestamp: Option<i64>, body: &str, json: bool) -> anyhow::Result<()> {
    let secret = signing_secret(|key| std::env::var(key).ok())?;
    let verifier = SignatureVerifier::new(secret);
    let timestamp = timestamp.unwrap_or_else(|| chrono::Utc::now().timestamp());
    let signature = verifier.sign(timestamp, body.as_bytes())?;

    if json {
        let out = serde_json::json!({
            "timestamp": timestamp,
            "signature": signature,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        println!("{TIMESTAMP_HEADER}: {timestamp}");
        println!("{SIGNATURE_HEADER}: {signature}");
    }
    Ok(())
}
