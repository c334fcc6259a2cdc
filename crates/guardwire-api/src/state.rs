//! Application state wiring the pipelines to concrete adapters.
//!
//! The pipelines are generic over collaborator traits; AppState pins them to
//! the infra implementations.

use std::sync::Arc;

use guardwire_core::action::ActionPipeline;
use guardwire_core::alert::AlertPipeline;
use guardwire_core::webhook::SignatureVerifier;
use guardwire_infra::aws::{CredentialsProvider, Ec2Client, SnsPublisher};
use guardwire_infra::config::RuntimeConfig;
use guardwire_infra::http::build_client;
use guardwire_infra::slack::{ResponseUrlAcknowledger, SlackClient};

pub type ConcreteActionPipeline = ActionPipeline<Ec2Client, ResponseUrlAcknowledger>;

pub type ConcreteAlertPipeline = AlertPipeline<Ec2Client, SnsPublisher, SlackClient>;

/// Shared application state, used by both CLI commands and HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    pub action_pipeline: Arc<ConcreteActionPipeline>,
    pub alert_pipeline: Arc<ConcreteAlertPipeline>,
}

impl AppState {
    /// Build every adapter from resolved configuration.
    pub fn from_config(config: RuntimeConfig) -> anyhow::Result<Self> {
        let http = build_client(config.http_timeout())?;
        let credentials = Arc::new(CredentialsProvider::new(http.clone(), config.aws_credentials));
        tracing::info!(source = credentials.source().name(), "AWS credential source selected");
        let service = &config.service;

        let verifier = SignatureVerifier::new(config.signing_secret)
            .with_freshness_window(service.freshness_window_secs);
        let action_pipeline = ActionPipeline::new(
            verifier,
            Ec2Client::new(
                http.clone(),
                Arc::clone(&credentials),
                &service.region,
                service.ec2_endpoint.as_deref(),
            )?,
            ResponseUrlAcknowledger::new(http.clone()),
            config.quarantine_group_id,
        );

        let bus = match &service.sns_topic_arn {
            Some(topic) => Some(SnsPublisher::new(
                http.clone(),
                Arc::clone(&credentials),
                &service.region,
                service.sns_endpoint.as_deref(),
                topic.clone(),
            )?),
            None => {
                tracing::info!("SNS_TOPIC_ARN not set, bus delivery disabled");
                None
            }
        };
        let chat = match config.slack_bot_token {
            Some(token) => {
                let client = SlackClient::new(http.clone(), token);
                Some(match &service.slack_api_base {
                    Some(base) => client.with_api_base(base.clone()),
                    None => client,
                })
            }
            None => {
                tracing::info!("SLACK_BOT_TOKEN not set, chat delivery disabled");
                None
            }
        };
        let alert_pipeline = AlertPipeline::new(
            Ec2Client::new(
                http,
                credentials,
                &service.region,
                service.ec2_endpoint.as_deref(),
            )?,
            bus,
            chat,
            service.slack_channel.clone(),
        );

        Ok(Self {
            action_pipeline: Arc::new(action_pipeline),
            alert_pipeline: Arc::new(alert_pipeline),
        })
    }
}
