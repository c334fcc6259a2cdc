//! Chat message layout: a summary section plus the quarantine button.

use serde_json::{Value, json};

use guardwire_types::action::{NO_TARGET_SENTINEL, QUARANTINE_ACTION_ID};
use guardwire_types::finding::Finding;

use super::formatter::console_link;

/// Section text limit enforced by the chat provider.
const MAX_SECTION_TEXT: usize = 3000;

const QUARANTINE_BUTTON_LABEL: &str = "\u{1f6d1} Quarantine EC2";

/// Escape the three characters mrkdwn treats as control sequences.
fn escape_mrkdwn(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn section_text(subject: &str, finding: &Finding, enrichment: &str) -> String {
    let mut text = format!(
        "*{}*\n*Severity:* {}\n*Region:* {}\n*Type:* {}\n*Description:* {}",
        escape_mrkdwn(subject),
        finding.severity_display(),
        escape_mrkdwn(&finding.region),
        escape_mrkdwn(&finding.finding_type),
        escape_mrkdwn(&finding.description),
    );
    if !enrichment.is_empty() {
        text.push_str("\n\n");
        text.push_str(&escape_mrkdwn(enrichment));
    }

    let link = format!("\n\n<{}|View in Console>", console_link(finding));
    let budget = MAX_SECTION_TEXT.saturating_sub(link.chars().count());
    if text.chars().count() > budget {
        text = text.chars().take(budget).collect();
        // Never leave half an entity behind.
        if let Some(amp) = text.rfind('&') {
            if !text[amp..].contains(';') {
                text.truncate(amp);
            }
        }
    }
    text.push_str(&link);
    text
}

/// Build the `chat.postMessage` body for a finding.
///
/// The button carries the instance id, or the no-target sentinel when the
/// finding names no instance.
pub fn chat_message(channel: &str, subject: &str, finding: &Finding, enrichment: &str) -> Value {
    let target = finding.instance_id().unwrap_or(NO_TARGET_SENTINEL);
    json!({
        "channel": channel,
        "text": subject,
        "blocks": [
            {
                "type": "section",
                "text": {
                    "type": "mrkdwn",
                    "text": section_text(subject, finding, enrichment),
                }
            },
            {
                "type": "actions",
                "elements": [
                    {
                        "type": "button",
                        "text": {"type": "plain_text", "text": QUARANTINE_BUTTON_LABEL},
                        "style": "danger",
                        "value": target,
                        "action_id": QUARANTINE_ACTION_ID,
                    }
                ]
            }
        ]
    })
}

#[cfg(test)]
mod tests {
    use guardwire_types::finding::FindingResource;

    use super::*;

    fn finding_with_instance() -> Finding {
        Finding {
            title: "SSH brute force".to_string(),
            severity: Some(8.0),
            region: "us-east-1".to_string(),
            id: "f-1".to_string(),
            resource: Some(FindingResource {
                instance_details: None,
                instance_id: Some("i-0abc123".to_string()),
            }),
            ..Finding::default()
        }
    }

    #[test]
    fn test_button_targets_instance() {
        let msg = chat_message("#alerts", "GuardDuty Alert: x", &finding_with_instance(), "");
        let button = &msg["blocks"][1]["elements"][0];
        assert_eq!(msg["channel"], "#alerts");
        assert_eq!(button["value"], "i-0abc123");
        assert_eq!(button["action_id"], "quarantine_instance");
        assert_eq!(button["style"], "danger");
    }

    #[test]
    fn test_button_uses_sentinel_without_instance() {
        let msg = chat_message("#alerts", "s", &Finding::default(), "");
        assert_eq!(msg["blocks"][1]["elements"][0]["value"], "no-instance");
    }

    #[test]
    fn test_section_text() {
        let msg = chat_message("#alerts", "GuardDuty Alert: SSH", &finding_with_instance(), "EC2 Enrichment:");
        let text = msg["blocks"][0]["text"]["text"].as_str().unwrap();
        assert!(text.starts_with("*GuardDuty Alert: SSH*\n*Severity:* 8 (High)"));
        assert!(text.contains("\n\nEC2 Enrichment:\n\n<https://us-east-1.console.aws.amazon.com/"));
        assert!(text.ends_with("|View in Console>"));
    }

    #[test]
    fn test_section_escapes_markup() {
        let mut f = finding_with_instance();
        f.description = "<script> & <!channel>".to_string();
        let msg = chat_message("#alerts", "s", &f, "");
        let text = msg["blocks"][0]["text"]["text"].as_str().unwrap();
        assert!(text.contains("&lt;script&gt; &amp; &lt;!channel&gt;"));
    }

    #[test]
    fn test_section_is_bounded_and_keeps_link() {
        let mut f = finding_with_instance();
        f.description = "d".repeat(10_000);
        let msg = chat_message("#alerts", "s", &f, "");
        let text = msg["blocks"][0]["text"]["text"].as_str().unwrap();
        assert_eq!(text.chars().count(), MAX_SECTION_TEXT);
        assert!(text.ends_with("|View in Console>"));
    }

    #[test]
    fn test_truncation_never_splits_an_entity() {
        // Each escaped `&` is five characters wide, so one of these offsets
        // lands the cut inside an entity.
        for pad in 0..5 {
            let mut f = finding_with_instance();
            f.description = format!("{}{}", "x".repeat(pad), "&".repeat(2_000));
            let msg = chat_message("#alerts", "s", &f, "");
            let text = msg["blocks"][0]["text"]["text"].as_str().unwrap();
            assert!(text.chars().count() <= MAX_SECTION_TEXT);

            let body = text.split("\n\n<https://").next().unwrap();
            assert!(body.ends_with("&amp;"), "pad {pad}: {}", &body[body.len() - 8..]);
        }
    }
}
