//! Non-secret service settings.
//!
//! `ServiceConfig` is the shape of the optional `guardwire.toml` file. Secrets
//! (signing secret, bot token, cloud credentials) are never read from the file;
//! the infra loader takes them from the environment.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Security group every quarantined instance is moved into.
    #[serde(default)]
    pub quarantine_group_id: Option<String>,

    /// Notification topic for alert text. Bus delivery is skipped when unset.
    #[serde(default)]
    pub sns_topic_arn: Option<String>,

    #[serde(default = "default_slack_channel")]
    pub slack_channel: String,

    #[serde(default = "default_region")]
    pub region: String,

    /// Maximum accepted distance between request timestamp and now.
    #[serde(default = "default_freshness_window_secs")]
    pub freshness_window_secs: u64,

    /// Timeout applied to every outbound collaborator call.
    #[serde(default = "default_http_timeout_secs")]
    pub http_timeout_secs: u64,

    #[serde(default)]
    pub ec2_endpoint: Option<String>,

    #[serde(default)]
    pub sns_endpoint: Option<String>,

    /// STS endpoint for web identity federation.
    #[serde(default)]
    pub sts_endpoint: Option<String>,

    #[serde(default)]
    pub slack_api_base: Option<String>,
}

fn default_slack_channel() -> String {
    "#alert-notifications".to_string()
}

fn default_region() -> String {
    "us-east-1".to_string()
}

fn default_freshness_window_secs() -> u64 {
    300
}

fn default_http_timeout_secs() -> u64 {
    60
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            quarantine_group_id: None,
            sns_topic_arn: None,
            slack_channel: default_slack_channel(),
            region: default_region(),
            freshness_window_secs: default_freshness_window_secs(),
            http_timeout_secs: default_http_timeout_secs(),
            ec2_endpoint: None,
            sns_endpoint: None,
            sts_endpoint: None,
            slack_api_base: None,
        }
    }
}
