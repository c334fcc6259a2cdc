//! AWS Signature Version 4 request signing.
//!
//! Only what the query APIs need: header-based signing of a request whose
//! path is already canonical. Credentials are held as [`SecretString`] and
//! exposed only while deriving the signing key.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use sha2::{Digest, Sha256};

use guardwire_types::error::CollaboratorError;

type HmacSha256 = Hmac<Sha256>;

pub const ALGORITHM: &str = "AWS4-HMAC-SHA256";

/// One set of credentials, long-lived or temporary.
pub struct AwsCredentials {
    pub access_key_id: String,
    pub secret_access_key: SecretString,
    pub session_token: Option<SecretString>,
}

impl AwsCredentials {
    pub fn new(access_key_id: impl Into<String>, secret_access_key: SecretString) -> Self {
        Self {
            access_key_id: access_key_id.into(),
            secret_access_key,
            session_token: None,
        }
    }

    pub fn with_session_token(mut self, token: SecretString) -> Self {
        self.session_token = Some(token);
        self
    }
}

impl fmt::Debug for AwsCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AwsCredentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"[REDACTED]")
            .field("session_token", &self.session_token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

/// A request about to be sent, as seen by the signer.
pub struct SignableRequest<'a> {
    pub method: &'a str,
    pub url: &'a reqwest::Url,
    /// Headers to include in the signature besides `host` and `x-amz-date`.
    pub headers: &'a [(&'a str, &'a str)],
    pub body: &'a [u8],
}

/// Signs for one region and service. Credentials are supplied per request
/// so that rotated temporary credentials take effect immediately.
pub struct SigV4Signer {
    region: String,
    service: &'static str,
}

impl SigV4Signer {
    pub fn new(region: impl Into<String>, service: &'static str) -> Self {
        Self {
            region: region.into(),
            service,
        }
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    /// Compute the headers to attach: `x-amz-date`, `authorization` and,
    /// for temporary credentials, `x-amz-security-token`.
    pub fn sign(
        &self,
        credentials: &AwsCredentials,
        request: &SignableRequest<'_>,
        now: DateTime<Utc>,
    ) -> Result<Vec<(String, String)>, CollaboratorError> {
        let amz_date = now.format("%Y%m%dT%H%M%SZ").to_string();
        let date = now.format("%Y%m%d").to_string();

        let mut headers: BTreeMap<String, String> = request
            .headers
            .iter()
            .map(|(k, v)| (k.to_ascii_lowercase(), normalize_header_value(v)))
            .collect();
        headers.insert("host".to_string(), host_header(request.url)?);
        headers.insert("x-amz-date".to_string(), amz_date.clone());
        let token = credentials
            .session_token
            .as_ref()
            .map(|t| t.expose_secret().to_string());
        if let Some(token) = &token {
            headers.insert("x-amz-security-token".to_string(), token.clone());
        }

        let signed_headers = headers.keys().cloned().collect::<Vec<_>>().join(";");
        let canonical = canonical_request(
            request.method,
            request.url,
            &headers,
            &signed_headers,
            &hex(&Sha256::digest(request.body)),
        );

        let scope = format!("{date}/{}/{}/aws4_request", self.region, self.service);
        let string_to_sign = format!(
            "{ALGORITHM}\n{amz_date}\n{scope}\n{}",
            hex(&Sha256::digest(canonical.as_bytes()))
        );
        let key = signing_key(
            credentials.secret_access_key.expose_secret(),
            &date,
            &self.region,
            self.service,
        )?;
        let signature = hex(&hmac_sha256(&key, string_to_sign.as_bytes())?);

        let authorization = format!(
            "{ALGORITHM} Credential={}/{scope}, SignedHeaders={signed_headers}, Signature={signature}",
            credentials.access_key_id
        );

        let mut out = vec![
            ("x-amz-date".to_string(), amz_date),
            ("authorization".to_string(), authorization),
        ];
        if let Some(token) = token {
            out.push(("x-amz-security-token".to_string(), token));
        }
        Ok(out)
    }
}

/// `host[:port]` exactly as the HTTP client will send it.
fn host_header(url: &reqwest::Url) -> Result<String, CollaboratorError> {
    let host = url
        .host_str()
        .ok_or_else(|| CollaboratorError::Configuration(format!("endpoint has no host: {url}")))?;
    Ok(match url.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    })
}

fn normalize_header_value(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}

pub(crate) fn canonical_request(
    method: &str,
    url: &reqwest::Url,
    headers: &BTreeMap<String, String>,
    signed_headers: &str,
    payload_hash: &str,
) -> String {
    let canonical_headers: String = headers.iter().map(|(k, v)| format!("{k}:{v}\n")).collect();
    format!(
        "{method}\n{}\n{}\n{canonical_headers}\n{signed_headers}\n{payload_hash}",
        url.path(),
        canonical_query(url)
    )
}

fn canonical_query(url: &reqwest::Url) -> String {
    let mut pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| (uri_encode(&k), uri_encode(&v)))
        .collect();
    pairs.sort();
    pairs
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&")
}

/// RFC 3986 encoding: unreserved characters pass, everything else is `%XX`.
pub(crate) fn uri_encode(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for byte in input.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}

pub(crate) fn signing_key(
    secret: &str,
    date: &str,
    region: &str,
    service: &str,
) -> Result<Vec<u8>, CollaboratorError> {
    let k_date = hmac_sha256(format!("AWS4{secret}").as_bytes(), date.as_bytes())?;
    let k_region = hmac_sha256(&k_date, region.as_bytes())?;
    let k_service = hmac_sha256(&k_region, service.as_bytes())?;
    hmac_sha256(&k_service, b"aws4_request")
}

fn hmac_sha256(key: &[u8], data: &[u8]) -> Result<Vec<u8>, CollaboratorError> {
    let mut mac = HmacSha256::new_from_slice(key)
        .map_err(|e| CollaboratorError::Configuration(format!("invalid signing key: {e}")))?;
    mac.update(data);
    Ok(mac.finalize().into_bytes().to_vec())
}

pub(crate) fn hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}
