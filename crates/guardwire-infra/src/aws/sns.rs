//! SNS adapter: alert text onto a notification topic.

use std::sync::Arc;

use guardwire_core::alert::NotificationBus;
use guardwire_types::error::CollaboratorError;

use super::query::QueryClient;
use super::credentials::CredentialsProvider;
use super::sigv4::SigV4Signer;

pub const SNS_API_VERSION: &str = "2010-03-31";

pub fn default_endpoint(region: &str) -> String {
    format!("https://sns.{region}.amazonaws.com/")
}

pub struct SnsPublisher {
    query: QueryClient,
    topic_arn: String,
}

impl SnsPublisher {
    pub fn new(
        http: reqwest::Client,
        credentials: Arc<CredentialsProvider>,
        region: &str,
        endpoint: Option<&str>,
        topic_arn: impl Into<String>,
    ) -> Result<Self, CollaboratorError> {
        let endpoint = endpoint.map_or_else(|| default_endpoint(region), str::to_string);
        let signer = SigV4Signer::new(region, "sns");
        Ok(Self {
            query: QueryClient::new(http, credentials, signer, &endpoint, SNS_API_VERSION)?,
            topic_arn: topic_arn.into(),
        })
    }

    pub fn topic_arn(&self) -> &str {
        &self.topic_arn
    }
}

impl NotificationBus for SnsPublisher {
    async fn publish(&self, subject: &str, message: &str) -> Result<(), CollaboratorError> {
        self.query
            .call(
                "Publish",
                &[
                    ("TopicArn", self.topic_arn.as_str()),
                    ("Subject", subject),
                    ("Message", message),
                ],
            )
            .await?;
        tracing::debug!(topic_arn = %self.topic_arn, "alert published");
        Ok(())
    }
}
