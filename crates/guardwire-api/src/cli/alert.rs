//! `gwire alert` - run the alert pipeline for a finding stored on disk.

use std::path::Path;

use anyhow::Context;

use guardwire_core::alert::AlertReport;
use guardwire_types::delivery::Delivery;
use guardwire_types::finding::FindingEvent;

use crate::state::AppState;

/// How the report is shown once the pipeline has run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Text,
    Json,
    /// Only failed deliveries, on stderr.
    Quiet,
}

impl ReportFormat {
    pub fn from_flags(json: bool, quiet: bool) -> Self {
        match (quiet, json) {
            (true, _) => Self::Quiet,
            (false, true) => Self::Json,
            (false, false) => Self::Text,
        }
    }
}

pub async fn run_alert(state: &AppState, file: &Path, format: ReportFormat) -> anyhow::Result<()> {
    let content = tokio::fs::read_to_string(file)
        .await
        .with_context(|| format!("failed to read {}", file.display()))?;
    let event: FindingEvent = serde_json::from_str(&content)
        .with_context(|| format!("{} is not a finding event", file.display()))?;

    let report = state.alert_pipeline.process(&event.detail).await;

    match format {
        ReportFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        ReportFormat::Text => print_report(&report),
        ReportFormat::Quiet => {
            for failure in failures(&report) {
                eprintln!("{failure}");
            }
        }
    }
    Ok(())
}

fn describe(delivery: &Delivery) -> String {
    match delivery {
        Delivery::Delivered => "delivered".to_string(),
        Delivery::Skipped => "skipped (not configured)".to_string(),
        Delivery::Failed(reason) => format!("failed: {reason}"),
    }
}

fn failures(report: &AlertReport) -> Vec<String> {
    [("bus", &report.bus), ("chat", &report.chat)]
        .into_iter()
        .filter(|(_, delivery)| matches!(delivery, Delivery::Failed(_)))
        .map(|(sink, delivery)| format!("{sink}: {}", describe(delivery)))
        .collect()
}

fn print_report(report: &AlertReport) {
    println!("{}", report.subject);
    if let Some(id) = &report.instance_id {
        println!("  instance: {id}");
    }
    println!("  bus:      {}", describe(&report.bus));
    println!("  chat:     {}", describe(&report.chat));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_delivery() {
        assert_eq!(describe(&Delivery::Skipped), "skipped (not configured)");
        assert_eq!(describe(&Delivery::Failed("timeout".into())), "failed: timeout");
    }

    #[test]
    fn test_quiet_wins_over_json() {
        assert_eq!(ReportFormat::from_flags(true, true), ReportFormat::Quiet);
        assert_eq!(ReportFormat::from_flags(true, false), ReportFormat::Json);
        assert_eq!(ReportFormat::from_flags(false, false), ReportFormat::Text);
    }

    #[test]
    fn test_quiet_report_lists_only_failures() {
        let report = AlertReport {
            subject: "GuardDuty Alert: x".to_string(),
            instance_id: None,
            bus: Delivery::Delivered,
            chat: Delivery::Failed("HTTP 500".into()),
        };
        assert_eq!(failures(&report), vec!["chat: failed: HTTP 500".to_string()]);

        let clean = AlertReport {
            chat: Delivery::Skipped,
            ..report
        };
        assert!(failures(&clean).is_empty());
    }
}
