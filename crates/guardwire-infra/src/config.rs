//! Startup configuration loader.
//!
//! Reads the optional `guardwire.toml` into [`ServiceConfig`], then applies
//! environment overrides and pulls secrets from the environment. Unlike
//! alert delivery, configuration problems are fatal: the service refuses to
//! start without a signing secret and a quarantine group.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use secrecy::SecretString;

use guardwire_types::config::ServiceConfig;
use guardwire_types::error::ConfigError;

use crate::aws::CredentialSource;
use crate::aws::credentials::default_sts_endpoint;

/// Read when no `--config` path is given. Absence is not an error.
pub const DEFAULT_CONFIG_FILE: &str = "guardwire.toml";

pub const SIGNING_SECRET_ENV: &str = "SLACK_SIGNING_SECRET";
pub const QUARANTINE_GROUP_ENV: &str = "QUARANTINE_SG_ID";
pub const SNS_TOPIC_ENV: &str = "SNS_TOPIC_ARN";
pub const BOT_TOKEN_ENV: &str = "SLACK_BOT_TOKEN";
pub const CHANNEL_ENV: &str = "SLACK_CHANNEL";
pub const REGION_ENV: &str = "AWS_REGION";

/// Fully resolved configuration. Secrets never appear in `Debug` output.
pub struct RuntimeConfig {
    pub signing_secret: SecretString,
    pub quarantine_group_id: String,
    pub slack_bot_token: Option<SecretString>,
    pub aws_credentials: CredentialSource,
    pub service: ServiceConfig,
}

impl RuntimeConfig {
    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.service.http_timeout_secs)
    }
}

impl fmt::Debug for RuntimeConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuntimeConfig")
            .field("signing_secret", &"[REDACTED]")
            .field("quarantine_group_id", &self.quarantine_group_id)
            .field("slack_bot_token", &self.slack_bot_token.as_ref().map(|_| "[REDACTED]"))
            .field("aws_credentials", &self.aws_credentials)
            .field("service", &self.service)
            .finish()
    }
}

/// Load configuration from `path` (or [`DEFAULT_CONFIG_FILE`]) and the
/// process environment.
pub async fn load_config(path: Option<&Path>) -> Result<RuntimeConfig, ConfigError> {
    let service = read_service_config(path).await?;
    resolve(service, |key| std::env::var(key).ok())
}

/// Read the TOML layer. A missing default file yields defaults; a missing
/// explicit file is an error.
pub async fn read_service_config(path: Option<&Path>) -> Result<ServiceConfig, ConfigError> {
    let (path, explicit) = match path {
        Some(p) => (p.to_path_buf(), true),
        None => (PathBuf::from(DEFAULT_CONFIG_FILE), false),
    };

    let content = match tokio::fs::read_to_string(&path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound && !explicit => {
            tracing::debug!("No {} found, using defaults", path.display());
            return Ok(ServiceConfig::default());
        }
        Err(err) => {
            return Err(ConfigError::Unreadable {
                path: path.display().to_string(),
                message: err.to_string(),
            });
        }
    };

    toml::from_str(&content).map_err(|err| ConfigError::Parse {
        path: path.display().to_string(),
        message: err.to_string(),
    })
}

/// The signing secret alone, for tools that only sign or verify.
pub fn signing_secret<F>(lookup: F) -> Result<SecretString, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(SIGNING_SECRET_ENV)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .map(SecretString::from)
        .ok_or(ConfigError::Missing(SIGNING_SECRET_ENV))
}

/// Apply environment overrides and secrets on top of the file layer.
///
/// `lookup` abstracts the environment so tests never mutate process state.
/// Blank values count as unset.
pub fn resolve<F>(mut service: ServiceConfig, lookup: F) -> Result<RuntimeConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let env = |key: &str| {
        lookup(key)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    if let Some(v) = env(QUARANTINE_GROUP_ENV) {
        service.quarantine_group_id = Some(v);
    }
    if let Some(v) = env(SNS_TOPIC_ENV) {
        service.sns_topic_arn = Some(v);
    }
    if let Some(v) = env(CHANNEL_ENV) {
        service.slack_channel = v;
    }
    if let Some(v) = env(REGION_ENV) {
        service.region = v;
    }

    let signing_secret = signing_secret(&lookup)?;

    let quarantine_group_id = service
        .quarantine_group_id
        .clone()
        .filter(|id| !id.trim().is_empty())
        .ok_or(ConfigError::Missing(QUARANTINE_GROUP_ENV))?;
    if !quarantine_group_id.starts_with("sg-") {
        return Err(ConfigError::Invalid {
            key: QUARANTINE_GROUP_ENV,
            message: format!("expected a security group id, got {quarantine_group_id}"),
        });
    }

    if service.freshness_window_secs == 0 {
        return Err(ConfigError::Invalid {
            key: "freshness_window_secs",
            message: "must be greater than zero".to_string(),
        });
    }
    if service.http_timeout_secs == 0 {
        return Err(ConfigError::Invalid {
            key: "http_timeout_secs",
            message: "must be greater than zero".to_string(),
        });
    }

    let sts_endpoint = service
        .sts_endpoint
        .clone()
        .unwrap_or_else(|| default_sts_endpoint(&service.region));
    let aws_credentials = CredentialSource::from_env(&env, &sts_endpoint)?;

    Ok(RuntimeConfig {
        signing_secret,
        quarantine_group_id,
        slack_bot_token: env(BOT_TOKEN_ENV).map(SecretString::from),
        aws_credentials,
        service,
    })
}
