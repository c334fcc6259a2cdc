//! Threat-detection finding as delivered by the internal event system.
//!
//! Findings arrive wrapped in an event envelope (`{"detail": {...}}`). Every
//! field is optional on the wire; absent fields take the same placeholder
//! values the alert text has always shown ("Unknown", "N/A", ...).

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Event envelope carrying a finding in its `detail` field.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FindingEvent {
    #[serde(default)]
    pub detail: Finding,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Finding {
    #[serde(rename = "type", default = "unknown")]
    pub finding_type: String,

    #[serde(default, deserialize_with = "lenient_severity")]
    pub severity: Option<f64>,

    #[serde(default = "default_description")]
    pub description: String,

    #[serde(default = "unknown")]
    pub region: String,

    #[serde(default = "unknown")]
    pub account_id: String,

    #[serde(default = "unknown")]
    pub updated_at: String,

    #[serde(default = "default_title")]
    pub title: String,

    #[serde(default = "not_available")]
    pub id: String,

    #[serde(default)]
    pub resource: Option<FindingResource>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FindingResource {
    #[serde(default)]
    pub instance_details: Option<InstanceDetails>,
    #[serde(default)]
    pub instance_id: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstanceDetails {
    #[serde(default)]
    pub instance_id: Option<String>,
}

fn unknown() -> String {
    "Unknown".to_string()
}

fn not_available() -> String {
    "N/A".to_string()
}

fn default_description() -> String {
    "No description provided".to_string()
}

fn default_title() -> String {
    "GuardDuty Finding".to_string()
}

/// Accept severities sent as numbers or numeric strings; anything else is absent.
fn lenient_severity<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::Number(n)) => n.as_f64(),
        Some(serde_json::Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

impl Default for Finding {
    fn default() -> Self {
        Self {
            finding_type: unknown(),
            severity: None,
            description: default_description(),
            region: unknown(),
            account_id: unknown(),
            updated_at: unknown(),
            title: default_title(),
            id: not_available(),
            resource: None,
        }
    }
}

impl Finding {
    /// Instance targeted by the finding, preferring `instanceDetails.instanceId`.
    pub fn instance_id(&self) -> Option<&str> {
        let resource = self.resource.as_ref()?;
        resource
            .instance_details
            .as_ref()
            .and_then(|d| d.instance_id.as_deref())
            .filter(|id| !id.is_empty())
            .or_else(|| resource.instance_id.as_deref().filter(|id| !id.is_empty()))
    }

    pub fn severity_band(&self) -> Option<SeverityBand> {
        self.severity.map(SeverityBand::from_score)
    }

    /// Severity as shown in alerts, e.g. `8 (High)`.
    pub fn severity_display(&self) -> String {
        match self.severity {
            Some(score) => format!("{score} ({})", SeverityBand::from_score(score)),
            None => unknown(),
        }
    }
}

/// GuardDuty severity bands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum SeverityBand {
    Low,
    Medium,
    High,
    Critical,
}

impl SeverityBand {
    pub fn from_score(score: f64) -> Self {
        if score >= 9.0 {
            SeverityBand::Critical
        } else if score >= 7.0 {
            SeverityBand::High
        } else if score >= 4.0 {
            SeverityBand::Medium
        } else {
            SeverityBand::Low
        }
    }
}

impl fmt::Display for SeverityBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SeverityBand::Low => "Low",
            SeverityBand::Medium => "Medium",
            SeverityBand::High => "High",
            SeverityBand::Critical => "Critical",
        };
        f.write_str(label)
    }
}
