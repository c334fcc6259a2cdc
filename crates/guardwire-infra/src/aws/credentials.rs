//! AWS credential resolution.
//!
//! Follows the SDK default chain for the sources a server deployment uses:
//! static keys in the environment, web identity federation, the container
//! credentials endpoint, and the EC2 instance metadata service. Temporary
//! credentials are cached and refreshed shortly before they expire, so a
//! fetch failure surfaces on the call that needed them rather than at startup.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tokio::sync::Mutex;

use guardwire_types::error::{CollaboratorError, ConfigError};

use super::query::{FORM_CONTENT_TYPE, child_text, parse_document, parse_error};
use super::sigv4::AwsCredentials;
use crate::http::{status_error, transport_error};

pub const ACCESS_KEY_ENV: &str = "AWS_ACCESS_KEY_ID";
pub const SECRET_KEY_ENV: &str = "AWS_SECRET_ACCESS_KEY";
pub const SESSION_TOKEN_ENV: &str = "AWS_SESSION_TOKEN";
pub const WEB_IDENTITY_TOKEN_FILE_ENV: &str = "AWS_WEB_IDENTITY_TOKEN_FILE";
pub const ROLE_ARN_ENV: &str = "AWS_ROLE_ARN";
pub const ROLE_SESSION_NAME_ENV: &str = "AWS_ROLE_SESSION_NAME";
pub const CONTAINER_RELATIVE_URI_ENV: &str = "AWS_CONTAINER_CREDENTIALS_RELATIVE_URI";
pub const CONTAINER_FULL_URI_ENV: &str = "AWS_CONTAINER_CREDENTIALS_FULL_URI";
pub const CONTAINER_TOKEN_ENV: &str = "AWS_CONTAINER_AUTHORIZATION_TOKEN";
pub const CONTAINER_TOKEN_FILE_ENV: &str = "AWS_CONTAINER_AUTHORIZATION_TOKEN_FILE";
pub const IMDS_ENDPOINT_ENV: &str = "AWS_EC2_METADATA_SERVICE_ENDPOINT";
pub const IMDS_DISABLED_ENV: &str = "AWS_EC2_METADATA_DISABLED";

const CONTAINER_HOST: &str = "http://169.254.170.2";
const IMDS_DEFAULT_ENDPOINT: &str = "http://169.254.169.254";
const IMDS_TOKEN_TTL_SECS: &str = "21600";
const STS_API_VERSION: &str = "2011-06-15";
const DEFAULT_SESSION_NAME: &str = "guardwire";

/// Temporary credentials are replaced once they are this close to expiry.
const REFRESH_MARGIN_SECS: i64 = 300;

pub fn default_sts_endpoint(region: &str) -> String {
    format!("https://sts.{region}.amazonaws.com/")
}

/// Where credentials come from. Selected once at startup.
#[derive(Debug)]
pub enum CredentialSource {
    Static(Arc<AwsCredentials>),
    WebIdentity {
        role_arn: String,
        token_file: PathBuf,
        session_name: String,
        sts_endpoint: String,
    },
    Container {
        url: String,
        authorization: Option<SecretString>,
        authorization_file: Option<PathBuf>,
    },
    InstanceMetadata {
        endpoint: String,
    },
}

impl CredentialSource {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Static(_) => "static",
            Self::WebIdentity { .. } => "web-identity",
            Self::Container { .. } => "container",
            Self::InstanceMetadata { .. } => "instance-metadata",
        }
    }

    /// Pick the first source the environment configures.
    ///
    /// Static keys win, then web identity, then the container endpoint.
    /// The instance metadata service is the fallback unless
    /// `AWS_EC2_METADATA_DISABLED=true`, in which case no source exists.
    pub fn from_env<F>(env: F, sts_endpoint: &str) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        match (env(ACCESS_KEY_ENV), env(SECRET_KEY_ENV)) {
            (Some(id), Some(secret)) => {
                let mut creds = AwsCredentials::new(id, SecretString::from(secret));
                if let Some(token) = env(SESSION_TOKEN_ENV) {
                    creds = creds.with_session_token(SecretString::from(token));
                }
                return Ok(Self::Static(Arc::new(creds)));
            }
            (Some(_), None) => return Err(ConfigError::Missing(SECRET_KEY_ENV)),
            (None, Some(_)) => return Err(ConfigError::Missing(ACCESS_KEY_ENV)),
            (None, None) => {}
        }

        if let Some(token_file) = env(WEB_IDENTITY_TOKEN_FILE_ENV) {
            return Ok(Self::WebIdentity {
                role_arn: env(ROLE_ARN_ENV).ok_or(ConfigError::Missing(ROLE_ARN_ENV))?,
                token_file: PathBuf::from(token_file),
                session_name: env(ROLE_SESSION_NAME_ENV)
                    .unwrap_or_else(|| DEFAULT_SESSION_NAME.to_string()),
                sts_endpoint: sts_endpoint.to_string(),
            });
        }

        let container_url = env(CONTAINER_RELATIVE_URI_ENV)
            .map(|uri| format!("{CONTAINER_HOST}{uri}"))
            .or_else(|| env(CONTAINER_FULL_URI_ENV));
        if let Some(url) = container_url {
            return Ok(Self::Container {
                url,
                authorization: env(CONTAINER_TOKEN_ENV).map(SecretString::from),
                authorization_file: env(CONTAINER_TOKEN_FILE_ENV).map(PathBuf::from),
            });
        }

        if env(IMDS_DISABLED_ENV).is_some_and(|v| v.eq_ignore_ascii_case("true")) {
            return Err(ConfigError::Missing(ACCESS_KEY_ENV));
        }
        Ok(Self::InstanceMetadata {
            endpoint: env(IMDS_ENDPOINT_ENV).unwrap_or_else(|| IMDS_DEFAULT_ENDPOINT.to_string()),
        })
    }
}

struct CachedCredentials {
    credentials: Arc<AwsCredentials>,
    expires_at: Option<DateTime<Utc>>,
}

impl CachedCredentials {
    fn usable_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at
            .is_none_or(|expires_at| now + Duration::seconds(REFRESH_MARGIN_SECS) < expires_at)
    }
}

/// Resolves and caches credentials for every AWS adapter.
///
/// Shared behind an `Arc` so that EC2 and SNS refresh through one cache.
pub struct CredentialsProvider {
    http: reqwest::Client,
    source: CredentialSource,
    cache: Mutex<Option<CachedCredentials>>,
}

impl CredentialsProvider {
    pub fn new(http: reqwest::Client, source: CredentialSource) -> Self {
        let cache = match &source {
            CredentialSource::Static(credentials) => Some(CachedCredentials {
                credentials: Arc::clone(credentials),
                expires_at: None,
            }),
            _ => None,
        };
        Self {
            http,
            source,
            cache: Mutex::new(cache),
        }
    }

    pub fn source(&self) -> &CredentialSource {
        &self.source
    }

    pub async fn credentials(&self) -> Result<Arc<AwsCredentials>, CollaboratorError> {
        self.credentials_at(Utc::now()).await
    }

    pub(crate) async fn credentials_at(
        &self,
        now: DateTime<Utc>,
    ) -> Result<Arc<AwsCredentials>, CollaboratorError> {
        let mut cache = self.cache.lock().await;
        if let Some(cached) = cache.as_ref().filter(|c| c.usable_at(now)) {
            return Ok(Arc::clone(&cached.credentials));
        }

        let fresh = self.fetch().await?;
        tracing::debug!(
            source = self.source.name(),
            expires_at = ?fresh.expires_at,
            "AWS credentials refreshed"
        );
        let credentials = Arc::clone(&fresh.credentials);
        *cache = Some(fresh);
        Ok(credentials)
    }

    async fn fetch(&self) -> Result<CachedCredentials, CollaboratorError> {
        match &self.source {
            CredentialSource::Static(credentials) => Ok(CachedCredentials {
                credentials: Arc::clone(credentials),
                expires_at: None,
            }),
            CredentialSource::WebIdentity {
                role_arn,
                token_file,
                session_name,
                sts_endpoint,
            } => {
                self.assume_role_with_web_identity(role_arn, token_file, session_name, sts_endpoint)
                    .await
            }
            CredentialSource::Container {
                url,
                authorization,
                authorization_file,
            } => {
                self.fetch_container(url, authorization.as_ref(), authorization_file.as_deref())
                    .await
            }
            CredentialSource::InstanceMetadata { endpoint } => {
                self.fetch_instance_metadata(endpoint).await
            }
        }
    }

    async fn assume_role_with_web_identity(
        &self,
        role_arn: &str,
        token_file: &Path,
        session_name: &str,
        sts_endpoint: &str,
    ) -> Result<CachedCredentials, CollaboratorError> {
        let token = read_token_file(token_file).await?;
        let body = serde_urlencoded::to_string([
            ("Action", "AssumeRoleWithWebIdentity"),
            ("Version", STS_API_VERSION),
            ("RoleArn", role_arn),
            ("RoleSessionName", session_name),
            ("WebIdentityToken", token.as_str()),
        ])
        .map_err(|e| CollaboratorError::Configuration(format!("failed to encode request: {e}")))?;

        let response = self
            .http
            .post(sts_endpoint)
            .header("content-type", FORM_CONTENT_TYPE)
            .body(body)
            .send()
            .await
            .map_err(transport_error)?;
        let status = response.status();
        let text = response.text().await.map_err(transport_error)?;
        if !status.is_success() {
            return Err(parse_error(status, &text));
        }
        parse_sts_credentials(&text)
    }

    async fn fetch_container(
        &self,
        url: &str,
        authorization: Option<&SecretString>,
        authorization_file: Option<&Path>,
    ) -> Result<CachedCredentials, CollaboratorError> {
        // The token file is re-read on every refresh; it rotates.
        let token = match (authorization_file, authorization) {
            (Some(path), _) => Some(read_token_file(path).await?),
            (None, Some(token)) => Some(token.expose_secret().to_string()),
            (None, None) => None,
        };

        let mut request = self.http.get(url);
        if let Some(token) = token {
            request = request.header("authorization", token);
        }
        let body = success_text(request).await?;
        parse_json_credentials(&body)
    }

    /// IMDSv2: session token, then role name, then the role's credentials.
    async fn fetch_instance_metadata(
        &self,
        endpoint: &str,
    ) -> Result<CachedCredentials, CollaboratorError> {
        let base = endpoint.trim_end_matches('/');
        let token = success_text(
            self.http
                .put(format!("{base}/latest/api/token"))
                .header("x-aws-ec2-metadata-token-ttl-seconds", IMDS_TOKEN_TTL_SECS),
        )
        .await?;

        let roles_url = format!("{base}/latest/meta-data/iam/security-credentials/");
        let roles = success_text(
            self.http
                .get(&roles_url)
                .header("x-aws-ec2-metadata-token", token.trim()),
        )
        .await?;
        let role = roles
            .lines()
            .map(str::trim)
            .find(|line| !line.is_empty())
            .ok_or_else(|| {
                CollaboratorError::Deserialization("instance profile has no role".to_string())
            })?;

        let body = success_text(
            self.http
                .get(format!("{roles_url}{role}"))
                .header("x-aws-ec2-metadata-token", token.trim()),
        )
        .await?;
        parse_json_credentials(&body)
    }
}

async fn success_text(request: reqwest::RequestBuilder) -> Result<String, CollaboratorError> {
    let response = request.send().await.map_err(transport_error)?;
    let status = response.status();
    let text = response.text().await.map_err(transport_error)?;
    if !status.is_success() {
        return Err(status_error(status, &text));
    }
    Ok(text)
}

async fn read_token_file(path: &Path) -> Result<String, CollaboratorError> {
    let content = tokio::fs::read_to_string(path).await.map_err(|e| {
        CollaboratorError::Configuration(format!(
            "failed to read token file {}: {e}",
            path.display()
        ))
    })?;
    Ok(content.trim().to_string())
}

/// Shape served by both the container endpoint and IMDS.
#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct CredentialDocument {
    #[serde(default)]
    code: Option<String>,
    access_key_id: String,
    secret_access_key: String,
    #[serde(default)]
    token: Option<String>,
    #[serde(default)]
    expiration: Option<DateTime<Utc>>,
}

fn parse_json_credentials(body: &str) -> Result<CachedCredentials, CollaboratorError> {
    let doc: CredentialDocument = serde_json::from_str(body).map_err(|e| {
        CollaboratorError::Deserialization(format!("invalid credentials document: {e}"))
    })?;
    if let Some(code) = doc.code.as_deref().filter(|code| *code != "Success") {
        return Err(CollaboratorError::Api {
            code: code.to_string(),
            message: "credential endpoint refused the request".to_string(),
        });
    }

    let mut credentials =
        AwsCredentials::new(doc.access_key_id, SecretString::from(doc.secret_access_key));
    if let Some(token) = doc.token {
        credentials = credentials.with_session_token(SecretString::from(token));
    }
    Ok(CachedCredentials {
        credentials: Arc::new(credentials),
        expires_at: doc.expiration,
    })
}

fn parse_sts_credentials(body: &str) -> Result<CachedCredentials, CollaboratorError> {
    let doc = parse_document(body)?;
    let node = doc
        .descendants()
        .find(|n| n.is_element() && n.tag_name().name() == "Credentials")
        .ok_or_else(|| {
            CollaboratorError::Deserialization("STS response without Credentials".to_string())
        })?;
    let field = |name: &str| {
        child_text(node, name).ok_or_else(|| {
            CollaboratorError::Deserialization(format!("STS credentials without {name}"))
        })
    };

    let credentials = AwsCredentials::new(
        field("AccessKeyId")?,
        SecretString::from(field("SecretAccessKey")?),
    )
    .with_session_token(SecretString::from(field("SessionToken")?));
    let expires_at = child_text(node, "Expiration")
        .map(|raw| DateTime::parse_from_rfc3339(&raw).map(|t| t.with_timezone(&Utc)))
        .transpose()
        .map_err(|e| CollaboratorError::Deserialization(format!("invalid Expiration: {e}")))?;

    Ok(CachedCredentials {
        credentials: Arc::new(credentials),
        expires_at,
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use chrono::TimeZone;
    use mockito::Matcher;
    use secrecy::ExposeSecret;
    use tempfile::TempDir;

    use super::*;

    const STS: &str = "https://sts.us-east-1.amazonaws.com/";

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    fn credential_json(expiration: &str) -> String {
        format!(
            r#"{{"Code":"Success","Type":"AWS-HMAC","AccessKeyId":"ASIATEMP","SecretAccessKey":"temp-secret","Token":"temp-token","Expiration":"{expiration}"}}"#
        )
    }

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 4, 1, hour, 0, 0).unwrap()
    }

    #[test]
    fn from_env_prefers_static_keys() {
        let env = env_of(&[
            ("AWS_ACCESS_KEY_ID", "AKIDTEST"),
            ("AWS_SECRET_ACCESS_KEY", "secret"),
            ("AWS_SESSION_TOKEN", "token"),
            ("AWS_CONTAINER_CREDENTIALS_RELATIVE_URI", "/v2/credentials/x"),
        ]);
        match CredentialSource::from_env(env, STS).unwrap() {
            CredentialSource::Static(creds) => {
                assert_eq!(creds.access_key_id, "AKIDTEST");
                assert!(creds.session_token.is_some());
            }
            other => panic!("expected static source, got {other:?}"),
        }
    }

    #[test]
    fn from_env_half_static_keys_is_fatal() {
        let err = CredentialSource::from_env(env_of(&[("AWS_ACCESS_KEY_ID", "AKIDTEST")]), STS)
            .unwrap_err();
        assert!(matches!(err, ConfigError::Missing("AWS_SECRET_ACCESS_KEY")));
    }

    #[test]
    fn from_env_web_identity() {
        let env = env_of(&[
            ("AWS_WEB_IDENTITY_TOKEN_FILE", "/var/run/secrets/token"),
            ("AWS_ROLE_ARN", "arn:aws:iam::123456789012:role/guardwire"),
        ]);
        match CredentialSource::from_env(env, STS).unwrap() {
            CredentialSource::WebIdentity {
                role_arn,
                token_file,
                session_name,
                sts_endpoint,
            } => {
                assert_eq!(role_arn, "arn:aws:iam::123456789012:role/guardwire");
                assert_eq!(token_file, PathBuf::from("/var/run/secrets/token"));
                assert_eq!(session_name, "guardwire");
                assert_eq!(sts_endpoint, STS);
            }
            other => panic!("expected web identity source, got {other:?}"),
        }
    }

    #[test]
    fn from_env_web_identity_requires_role() {
        let env = env_of(&[("AWS_WEB_IDENTITY_TOKEN_FILE", "/var/run/secrets/token")]);
        let err = CredentialSource::from_env(env, STS).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("AWS_ROLE_ARN")));
    }

    #[test]
    fn from_env_container_relative_uri() {
        let env = env_of(&[("AWS_CONTAINER_CREDENTIALS_RELATIVE_URI", "/v2/credentials/abc")]);
        match CredentialSource::from_env(env, STS).unwrap() {
            CredentialSource::Container { url, authorization, .. } => {
                assert_eq!(url, "http://169.254.170.2/v2/credentials/abc");
                assert!(authorization.is_none());
            }
            other => panic!("expected container source, got {other:?}"),
        }
    }

    #[test]
    fn from_env_falls_back_to_instance_metadata() {
        match CredentialSource::from_env(env_of(&[]), STS).unwrap() {
            CredentialSource::InstanceMetadata { endpoint } => {
                assert_eq!(endpoint, "http://169.254.169.254");
            }
            other => panic!("expected instance metadata source, got {other:?}"),
        }
    }

    #[test]
    fn from_env_with_metadata_disabled_has_no_source() {
        let err = CredentialSource::from_env(env_of(&[("AWS_EC2_METADATA_DISABLED", "true")]), STS)
            .unwrap_err();
        assert!(matches!(err, ConfigError::Missing("AWS_ACCESS_KEY_ID")));
    }

    #[tokio::test]
    async fn static_credentials_need_no_network() {
        let creds = Arc::new(AwsCredentials::new("AKIDTEST", SecretString::from("secret")));
        let provider =
            CredentialsProvider::new(reqwest::Client::new(), CredentialSource::Static(creds));
        assert_eq!(provider.credentials().await.unwrap().access_key_id, "AKIDTEST");
        assert_eq!(provider.source().name(), "static");
    }

    #[tokio::test]
    async fn container_credentials_are_cached_until_near_expiry() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/v2/credentials/abc")
            .match_header("authorization", "container-token")
            .with_status(200)
            .with_body(credential_json("2024-04-01T12:00:00Z"))
            .expect(1)
            .create_async()
            .await;

        let provider = CredentialsProvider::new(
            reqwest::Client::new(),
            CredentialSource::Container {
                url: format!("{}/v2/credentials/abc", server.url()),
                authorization: Some(SecretString::from("container-token")),
                authorization_file: None,
            },
        );

        let first = provider.credentials_at(at(10)).await.unwrap();
        assert_eq!(first.access_key_id, "ASIATEMP");
        assert_eq!(
            first.session_token.as_ref().map(|t| t.expose_secret().to_string()),
            Some("temp-token".to_string())
        );
        provider.credentials_at(at(11)).await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn expiring_credentials_are_refreshed() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/creds")
            .with_status(200)
            .with_body(credential_json("2024-04-01T12:00:00Z"))
            .expect(2)
            .create_async()
            .await;

        let provider = CredentialsProvider::new(
            reqwest::Client::new(),
            CredentialSource::Container {
                url: format!("{}/creds", server.url()),
                authorization: None,
                authorization_file: None,
            },
        );

        provider.credentials_at(at(10)).await.unwrap();
        // Inside the refresh margin of the 12:00 expiry.
        let near_expiry = Utc.with_ymd_and_hms(2024, 4, 1, 11, 58, 0).unwrap();
        provider.credentials_at(near_expiry).await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn container_token_file_is_sent() {
        let tmp = TempDir::new().unwrap();
        let token_path = tmp.path().join("token");
        tokio::fs::write(&token_path, "file-token\n").await.unwrap();

        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/creds")
            .match_header("authorization", "file-token")
            .with_status(200)
            .with_body(credential_json("2024-04-01T12:00:00Z"))
            .create_async()
            .await;

        let provider = CredentialsProvider::new(
            reqwest::Client::new(),
            CredentialSource::Container {
                url: format!("{}/creds", server.url()),
                authorization: Some(SecretString::from("ignored")),
                authorization_file: Some(token_path),
            },
        );
        provider.credentials_at(at(10)).await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn container_error_status_fails() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/creds")
            .with_status(403)
            .with_body("forbidden")
            .create_async()
            .await;

        let provider = CredentialsProvider::new(
            reqwest::Client::new(),
            CredentialSource::Container {
                url: format!("{}/creds", server.url()),
                authorization: None,
                authorization_file: None,
            },
        );
        let err = provider.credentials_at(at(10)).await.unwrap_err();
        assert_eq!(err.to_string(), "HTTP 403: forbidden");
    }

    #[tokio::test]
    async fn instance_metadata_uses_session_token() {
        let mut server = mockito::Server::new_async().await;
        let token = server
            .mock("PUT", "/latest/api/token")
            .match_header("x-aws-ec2-metadata-token-ttl-seconds", "21600")
            .with_status(200)
            .with_body("imds-session")
            .create_async()
            .await;
        let roles = server
            .mock("GET", "/latest/meta-data/iam/security-credentials/")
            .match_header("x-aws-ec2-metadata-token", "imds-session")
            .with_status(200)
            .with_body("guardwire-role\n")
            .create_async()
            .await;
        let creds = server
            .mock("GET", "/latest/meta-data/iam/security-credentials/guardwire-role")
            .match_header("x-aws-ec2-metadata-token", "imds-session")
            .with_status(200)
            .with_body(credential_json("2024-04-01T12:00:00Z"))
            .create_async()
            .await;

        let provider = CredentialsProvider::new(
            reqwest::Client::new(),
            CredentialSource::InstanceMetadata {
                endpoint: server.url(),
            },
        );
        let resolved = provider.credentials_at(at(10)).await.unwrap();
        assert_eq!(resolved.access_key_id, "ASIATEMP");
        token.assert_async().await;
        roles.assert_async().await;
        creds.assert_async().await;
    }

    #[tokio::test]
    async fn web_identity_assumes_role() {
        let tmp = TempDir::new().unwrap();
        let token_path = tmp.path().join("token");
        tokio::fs::write(&token_path, "oidc-token").await.unwrap();

        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/")
            .match_body(Matcher::AllOf(vec![
                Matcher::UrlEncoded("Action".to_string(), "AssumeRoleWithWebIdentity".to_string()),
                Matcher::UrlEncoded("RoleArn".to_string(), "arn:aws:iam::1:role/gw".to_string()),
                Matcher::UrlEncoded("RoleSessionName".to_string(), "guardwire".to_string()),
                Matcher::UrlEncoded("WebIdentityToken".to_string(), "oidc-token".to_string()),
            ]))
            .with_status(200)
            .with_body(
                r#"<AssumeRoleWithWebIdentityResponse xmlns="https://sts.amazonaws.com/doc/2011-06-15/">
  <AssumeRoleWithWebIdentityResult>
    <Credentials>
      <AccessKeyId>ASIAWEB</AccessKeyId>
      <SecretAccessKey>web-secret</SecretAccessKey>
      <SessionToken>web-token</SessionToken>
      <Expiration>2024-04-01T12:00:00Z</Expiration>
    </Credentials>
  </AssumeRoleWithWebIdentityResult>
</AssumeRoleWithWebIdentityResponse>"#,
            )
            .create_async()
            .await;

        let provider = CredentialsProvider::new(
            reqwest::Client::new(),
            CredentialSource::WebIdentity {
                role_arn: "arn:aws:iam::1:role/gw".to_string(),
                token_file: token_path,
                session_name: "guardwire".to_string(),
                sts_endpoint: format!("{}/", server.url()),
            },
        );
        let resolved = provider.credentials_at(at(10)).await.unwrap();
        assert_eq!(resolved.access_key_id, "ASIAWEB");
        assert!(resolved.session_token.is_some());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn web_identity_missing_token_file_fails() {
        let provider = CredentialsProvider::new(
            reqwest::Client::new(),
            CredentialSource::WebIdentity {
                role_arn: "arn:aws:iam::1:role/gw".to_string(),
                token_file: PathBuf::from("/nonexistent/guardwire/token"),
                session_name: "guardwire".to_string(),
                sts_endpoint: STS.to_string(),
            },
        );
        assert!(matches!(
            provider.credentials_at(at(10)).await,
            Err(CollaboratorError::Configuration(_))
        ));
    }

    #[test]
    fn parse_refused_metadata_document() {
        let body = r#"{"Code":"AssumeRoleUnauthorizedAccess","AccessKeyId":"","SecretAccessKey":""}"#;
        assert!(matches!(
            parse_json_credentials(body),
            Err(CollaboratorError::Api { .. })
        ));
    }
}
