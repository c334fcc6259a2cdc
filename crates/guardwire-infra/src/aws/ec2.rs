//! EC2 adapter: quarantine by security-group replacement, and instance lookup
//! for alert enrichment.

use std::collections::BTreeMap;
use std::sync::Arc;

use guardwire_core::action::IsolationExecutor;
use guardwire_core::alert::ResourceMetadataSource;
use guardwire_types::error::CollaboratorError;
use guardwire_types::resource::InstanceMetadata;

use super::query::{QueryClient, child_text, parse_document};
use super::credentials::CredentialsProvider;
use super::sigv4::SigV4Signer;

pub const EC2_API_VERSION: &str = "2016-11-15";

const NOT_FOUND_CODE: &str = "InvalidInstanceID.NotFound";

pub fn default_endpoint(region: &str) -> String {
    format!("https://ec2.{region}.amazonaws.com/")
}

pub struct Ec2Client {
    query: QueryClient,
}

impl Ec2Client {
    pub fn new(
        http: reqwest::Client,
        credentials: Arc<CredentialsProvider>,
        region: &str,
        endpoint: Option<&str>,
    ) -> Result<Self, CollaboratorError> {
        let endpoint = endpoint.map_or_else(|| default_endpoint(region), str::to_string);
        let signer = SigV4Signer::new(region, "ec2");
        Ok(Self {
            query: QueryClient::new(http, credentials, signer, &endpoint, EC2_API_VERSION)?,
        })
    }
}

impl IsolationExecutor for Ec2Client {
    /// Replace every security group on the instance's primary interface with
    /// `policy_id`.
    async fn isolate(&self, resource_id: &str, policy_id: &str) -> Result<(), CollaboratorError> {
        let body = self
            .query
            .call(
                "ModifyInstanceAttribute",
                &[("InstanceId", resource_id), ("GroupId.1", policy_id)],
            )
            .await?;

        // Only an explicit confirmation counts as isolated.
        let doc = parse_document(&body)?;
        match child_text(doc.root_element(), "return").as_deref() {
            Some("true") => Ok(()),
            None => Err(CollaboratorError::Deserialization(
                "ModifyInstanceAttribute response without return".to_string(),
            )),
            Some(other) => Err(CollaboratorError::Api {
                code: "ModifyInstanceAttribute".to_string(),
                message: format!("service returned {other}"),
            }),
        }
    }
}

impl ResourceMetadataSource for Ec2Client {
    async fn describe_instance(
        &self,
        instance_id: &str,
    ) -> Result<Option<InstanceMetadata>, CollaboratorError> {
        match self
            .query
            .call("DescribeInstances", &[("InstanceId.1", instance_id)])
            .await
        {
            Ok(body) => parse_instance(&body),
            Err(CollaboratorError::Api { code, .. }) if code == NOT_FOUND_CODE => Ok(None),
            Err(e) => Err(e),
        }
    }
}

/// First instance of the first reservation, if any.
pub(crate) fn parse_instance(body: &str) -> Result<Option<InstanceMetadata>, CollaboratorError> {
    let doc = parse_document(body)?;
    let instance = doc
        .descendants()
        .find(|n| n.is_element() && n.tag_name().name() == "instancesSet")
        .and_then(|set| {
            set.children()
                .find(|c| c.is_element() && c.tag_name().name() == "item")
        });
    let Some(instance) = instance else {
        return Ok(None);
    };

    let instance_id = child_text(instance, "instanceId").ok_or_else(|| {
        CollaboratorError::Deserialization("instance entry without instanceId".to_string())
    })?;

    let tags: BTreeMap<String, String> = instance
        .children()
        .find(|c| c.is_element() && c.tag_name().name() == "tagSet")
        .map(|set| {
            set.children()
                .filter(|c| c.is_element() && c.tag_name().name() == "item")
                .filter_map(|item| {
                    Some((child_text(item, "key")?, child_text(item, "value").unwrap_or_default()))
                })
                .collect()
        })
        .unwrap_or_default();

    Ok(Some(InstanceMetadata {
        instance_id,
        instance_type: child_text(instance, "instanceType"),
        launch_time: child_text(instance, "launchTime"),
        private_ip: child_text(instance, "privateIpAddress"),
        public_ip: child_text(instance, "ipAddress"),
        vpc_id: child_text(instance, "vpcId"),
        subnet_id: child_text(instance, "subnetId"),
        tags,
    }))
}
