//! Plain-text alert rendering for the notification bus.

use guardwire_types::finding::Finding;

pub const SUBJECT_PREFIX: &str = "GuardDuty Alert: ";

/// Upper bound the bus places on subjects.
pub const MAX_SUBJECT_LEN: usize = 100;

const RECOMMENDATION: &str =
    "Please review the finding in the AWS GuardDuty console and take appropriate action.";

/// Keep printable ASCII only and cut the title so that prefix plus title
/// fits in [`MAX_SUBJECT_LEN`].
pub fn sanitize_subject(title: &str) -> String {
    title
        .chars()
        .filter(|c| c.is_ascii() && !c.is_ascii_control())
        .take(MAX_SUBJECT_LEN - SUBJECT_PREFIX.len())
        .collect()
}

pub fn subject(finding: &Finding) -> String {
    format!("{SUBJECT_PREFIX}{}", sanitize_subject(&finding.title))
}

/// Deep link to the finding in the regional console.
pub fn console_link(finding: &Finding) -> String {
    let region = &finding.region;
    format!(
        "https://{region}.console.aws.amazon.com/guardduty/home?region={region}#/findings?macros=current&fId={}",
        finding.id
    )
}

/// Full alert text. `enrichment` is omitted when empty.
pub fn render_message(finding: &Finding, enrichment: &str) -> String {
    let mut sections = vec![
        "GuardDuty Finding Alert".to_string(),
        format!(
            "Title: {}\nType: {}\nSeverity: {}\nAccount ID: {}\nRegion: {}\nTime: {}",
            finding.title,
            finding.finding_type,
            finding.severity_display(),
            finding.account_id,
            finding.region,
            finding.updated_at,
        ),
        format!("Description:\n{}", finding.description),
    ];
    if !enrichment.trim().is_empty() {
        sections.push(enrichment.trim().to_string());
    }
    sections.push(format!("Recommendation:\n{RECOMMENDATION}"));
    sections.push(format!("Link to Finding:\n{}", console_link(finding)));
    sections.join("\n\n")
}
