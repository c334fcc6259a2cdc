//! Instance enrichment for alerts.

use guardwire_types::error::CollaboratorError;
use guardwire_types::finding::Finding;
use guardwire_types::resource::InstanceMetadata;

/// Looks up descriptive attributes for a compute instance.
pub trait ResourceMetadataSource: Send + Sync {
    /// `Ok(None)` when the instance does not exist.
    fn describe_instance(
        &self,
        instance_id: &str,
    ) -> impl std::future::Future<Output = Result<Option<InstanceMetadata>, CollaboratorError>> + Send;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Enrichment {
    /// The finding names no instance.
    NotApplicable,
    Resolved(InstanceMetadata),
    /// Lookup failed or found nothing. The alert goes out without the block.
    Unavailable,
}

impl Enrichment {
    /// Text block appended to the alert, empty unless resolved.
    pub fn render(&self) -> String {
        let Enrichment::Resolved(meta) = self else {
            return String::new();
        };
        let or = |v: Option<&str>, fallback: &'static str| v.unwrap_or(fallback).to_string();
        [
            "EC2 Enrichment:".to_string(),
            format!("- Instance ID: {}", meta.instance_id),
            format!("- Name: {}", or(meta.name(), "N/A")),
            format!("- Owner: {}", or(meta.owner(), "N/A")),
            format!("- Environment: {}", or(meta.environment(), "N/A")),
            format!("- Type: {}", or(meta.instance_type.as_deref(), "Unknown")),
            format!("- Private IP: {}", or(meta.private_ip.as_deref(), "Unknown")),
            format!("- Public IP: {}", or(meta.public_ip.as_deref(), "N/A")),
            format!("- VPC: {}", or(meta.vpc_id.as_deref(), "Unknown")),
            format!("- Subnet: {}", or(meta.subnet_id.as_deref(), "Unknown")),
            format!("- Launch Time: {}", or(meta.launch_time.as_deref(), "Unknown")),
        ]
        .join("\n")
    }
}

/// Resolve enrichment for a finding. Never fails; errors are logged.
pub async fn enrich<M: ResourceMetadataSource>(source: &M, finding: &Finding) -> Enrichment {
    let Some(instance_id) = finding.instance_id() else {
        return Enrichment::NotApplicable;
    };

    match source.describe_instance(instance_id).await {
        Ok(Some(meta)) => Enrichment::Resolved(meta),
        Ok(None) => {
            tracing::warn!(resource_id = instance_id, "instance not found for enrichment");
            Enrichment::Unavailable
        }
        Err(e) => {
            tracing::warn!(resource_id = instance_id, error = %e, "instance enrichment failed");
            Enrichment::Unavailable
        }
    }
}
