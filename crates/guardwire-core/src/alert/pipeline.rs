//! Alert pipeline: one finding in, independent best-effort deliveries out.

use serde::Serialize;

use guardwire_types::delivery::Delivery;
use guardwire_types::finding::Finding;

use super::blocks::chat_message;
use super::enrichment::{ResourceMetadataSource, enrich};
use super::formatter::{render_message, subject};
use super::sink::{ChatNotifier, NotificationBus};

/// What happened to a single finding.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlertReport {
    pub subject: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance_id: Option<String>,
    pub bus: Delivery,
    pub chat: Delivery,
}

pub struct AlertPipeline<M, B, C> {
    metadata: M,
    bus: Option<B>,
    chat: Option<C>,
    channel: String,
}

impl<M, B, C> AlertPipeline<M, B, C>
where
    M: ResourceMetadataSource,
    B: NotificationBus,
    C: ChatNotifier,
{
    /// Sinks left as `None` are reported as [`Delivery::Skipped`].
    pub fn new(metadata: M, bus: Option<B>, chat: Option<C>, channel: impl Into<String>) -> Self {
        Self {
            metadata,
            bus,
            chat,
            channel: channel.into(),
        }
    }

    pub fn channel(&self) -> &str {
        &self.channel
    }

    pub async fn process(&self, finding: &Finding) -> AlertReport {
        let enrichment = enrich(&self.metadata, finding).await.render();
        let subject = subject(finding);
        tracing::info!(
            finding_id = %finding.id,
            finding_type = %finding.finding_type,
            severity = finding.severity,
            "processing finding"
        );

        let bus = match &self.bus {
            Some(bus) => {
                let message = render_message(finding, &enrichment);
                match bus.publish(&subject, &message).await {
                    Ok(()) => Delivery::Delivered,
                    Err(e) => {
                        tracing::warn!(error = %e, "bus publish failed");
                        Delivery::Failed(e.to_string())
                    }
                }
            }
            None => Delivery::Skipped,
        };

        let chat = match &self.chat {
            Some(chat) => {
                let message = chat_message(&self.channel, &subject, finding, &enrichment);
                match chat.post_message(&message).await {
                    Ok(()) => Delivery::Delivered,
                    Err(e) => {
                        tracing::warn!(error = %e, "chat notification failed");
                        Delivery::Failed(e.to_string())
                    }
                }
            }
            None => Delivery::Skipped,
        };

        AlertReport {
            subject,
            instance_id: finding.instance_id().map(str::to_string),
            bus,
            chat,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use serde_json::Value;

    use guardwire_types::error::CollaboratorError;
    use guardwire_types::finding::FindingEvent;
    use guardwire_types::resource::InstanceMetadata;

    use super::*;

    #[derive(Default)]
    struct FakeMetadata {
        fail: bool,
    }

    impl ResourceMetadataSource for FakeMetadata {
        async fn describe_instance(
            &self,
            instance_id: &str,
        ) -> Result<Option<InstanceMetadata>, CollaboratorError> {
            if self.fail {
                return Err(CollaboratorError::Transport("unreachable".to_string()));
            }
            let mut meta = InstanceMetadata::new(instance_id);
            meta.instance_type = Some("t3.micro".to_string());
            Ok(Some(meta))
        }
    }

    #[derive(Default)]
    struct RecordingBus {
        published: Mutex<Vec<(String, String)>>,
        fail: bool,
    }

    impl NotificationBus for RecordingBus {
        async fn publish(&self, subject: &str, message: &str) -> Result<(), CollaboratorError> {
            self.published
                .lock()
                .unwrap()
                .push((subject.to_string(), message.to_string()));
            if self.fail {
                Err(CollaboratorError::Api {
                    code: "AuthorizationError".to_string(),
                    message: "denied".to_string(),
                })
            } else {
                Ok(())
            }
        }
    }

    #[derive(Default)]
    struct RecordingChat {
        posted: Mutex<Vec<Value>>,
    }

    impl ChatNotifier for RecordingChat {
        async fn post_message(&self, message: &Value) -> Result<(), CollaboratorError> {
            self.posted.lock().unwrap().push(message.clone());
            Ok(())
        }
    }

    fn finding() -> Finding {
        let event: FindingEvent = serde_json::from_str(
            r#"{"detail": {
                "title": "SSH brute force",
                "severity": 8,
                "region": "us-east-1",
                "resource": {"instanceDetails": {"instanceId": "i-0abc123"}}
            }}"#,
        )
        .unwrap();
        event.detail
    }

    #[tokio::test]
    async fn test_delivers_to_both_sinks() {
        let pipeline = AlertPipeline::new(
            FakeMetadata::default(),
            Some(RecordingBus::default()),
            Some(RecordingChat::default()),
            "#alert-notifications",
        );
        let report = pipeline.process(&finding()).await;

        assert_eq!(report.subject, "GuardDuty Alert: SSH brute force");
        assert_eq!(report.instance_id.as_deref(), Some("i-0abc123"));
        assert_eq!(report.bus, Delivery::Delivered);
        assert_eq!(report.chat, Delivery::Delivered);

        let published = pipeline.bus.as_ref().unwrap().published.lock().unwrap().clone();
        assert_eq!(published.len(), 1);
        assert!(published[0].1.contains("- Type: t3.micro"));

        let posted = pipeline.chat.as_ref().unwrap().posted.lock().unwrap().clone();
        assert_eq!(posted[0]["channel"], "#alert-notifications");
        assert_eq!(posted[0]["blocks"][1]["elements"][0]["value"], "i-0abc123");
    }

    #[tokio::test]
    async fn test_unconfigured_sinks_are_skipped() {
        let pipeline: AlertPipeline<FakeMetadata, RecordingBus, RecordingChat> =
            AlertPipeline::new(FakeMetadata::default(), None, None, "#c");
        let report = pipeline.process(&finding()).await;
        assert_eq!(report.bus, Delivery::Skipped);
        assert_eq!(report.chat, Delivery::Skipped);
    }

    #[tokio::test]
    async fn test_bus_failure_does_not_block_chat() {
        let pipeline = AlertPipeline::new(
            FakeMetadata::default(),
            Some(RecordingBus {
                fail: true,
                ..RecordingBus::default()
            }),
            Some(RecordingChat::default()),
            "#c",
        );
        let report = pipeline.process(&finding()).await;
        assert!(matches!(report.bus, Delivery::Failed(ref r) if r.contains("AuthorizationError")));
        assert_eq!(report.chat, Delivery::Delivered);
    }

    #[tokio::test]
    async fn test_enrichment_failure_still_alerts() {
        let pipeline = AlertPipeline::new(
            FakeMetadata { fail: true },
            Some(RecordingBus::default()),
            None::<RecordingChat>,
            "#c",
        );
        let report = pipeline.process(&finding()).await;
        assert_eq!(report.bus, Delivery::Delivered);
        let published = pipeline.bus.as_ref().unwrap().published.lock().unwrap().clone();
        assert!(!published[0].1.contains("EC2 Enrichment"));
    }

    #[test]
    fn test_report_serializes() {
        let report = AlertReport {
            subject: "GuardDuty Alert: x".to_string(),
            instance_id: None,
            bus: Delivery::Delivered,
            chat: Delivery::Skipped,
        };
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["bus"]["status"], "delivered");
        assert_eq!(json["chat"]["status"], "skipped");
        assert!(json.get("instance_id").is_none());
    }
}
