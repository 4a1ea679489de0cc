use std::collections::BTreeMap;

use crate::models::{AutoTag, TaggedTicket, TicketRecord};

/// Process automation ideas shown next to the tagging preview.
pub const AUTOMATION_IDEAS: [&str; 4] = [
    "Automated ticket tagging using keyword matching or NLP.",
    "Real-time SLA breach alerts with email/Slack notifications.",
    "Scheduled data quality audits with automatic anomaly detection.",
    "Automated escalation of pending tickets via chatbot integrations.",
];

// First matching rule wins.
const RULES: [(AutoTag, &[&str]); 3] = [
    (AutoTag::PlacementRelated, &["placement"]),
    (AutoTag::ProjectRelated, &["project", "assignment"]),
    (AutoTag::SupportRelated, &["support", "ta"]),
];

/// Keyword tag for a ticket remark. Matching is plain substring containment,
/// so short keywords such as "ta" also match inside longer words.
pub fn tag(remark: Option<&str>) -> AutoTag {
    let Some(remark) = remark else {
        return AutoTag::General;
    };
    let remark = remark.to_lowercase();

    RULES
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|keyword| remark.contains(keyword)))
        .map(|(tag, _)| *tag)
        .unwrap_or(AutoTag::General)
}

pub fn tag_records(records: &[TicketRecord], limit: usize) -> Vec<TaggedTicket> {
    records
        .iter()
        .take(limit)
        .map(|record| TaggedTicket {
            ticket_no: record.ticket_no.clone(),
            remarks: record.remarks.clone(),
            tag: tag(record.remarks.as_deref()),
        })
        .collect()
}

/// Tag counts over every record, including categories with no tickets.
pub fn tag_counts(records: &[TicketRecord]) -> BTreeMap<AutoTag, usize> {
    let mut counts: BTreeMap<AutoTag, usize> = AutoTag::ALL.iter().map(|tag| (*tag, 0)).collect();
    for record in records {
        *counts.entry(tag(record.remarks.as_deref())).or_insert(0) += 1;
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fixtures::ticket;

    #[test]
    fn keyword_categories() {
        assert_eq!(tag(Some("Had a placement issue")), AutoTag::PlacementRelated);
        assert_eq!(tag(Some("Project deadline too short")), AutoTag::ProjectRelated);
        assert_eq!(tag(Some("Late ASSIGNMENT grading")), AutoTag::ProjectRelated);
        assert_eq!(tag(Some("Needed TA support")), AutoTag::SupportRelated);
        assert_eq!(tag(Some("General query")), AutoTag::General);
    }

    #[test]
    fn priority_order_wins() {
        assert_eq!(
            tag(Some("placement blocked by project review")),
            AutoTag::PlacementRelated
        );
        assert_eq!(tag(Some("project support needed")), AutoTag::ProjectRelated);
    }

    #[test]
    fn substring_matching_catches_embedded_keywords() {
        assert_eq!(tag(Some("Wrong data in portal")), AutoTag::SupportRelated);
    }

    #[test]
    fn absent_remark_is_general() {
        assert_eq!(tag(None), AutoTag::General);
        // Absent values rendered as text never matched a keyword either.
        assert_eq!(tag(Some("nan")), AutoTag::General);
    }

    #[test]
    fn tagging_respects_limit_and_counts_everything() {
        let mut placement = ticket("T-2");
        placement.remarks = Some("placement drive".to_string());
        let mut silent = ticket("T-3");
        silent.remarks = None;
        let records = vec![ticket("T-1"), placement, silent];

        let tagged = tag_records(&records, 2);
        assert_eq!(tagged.len(), 2);
        assert_eq!(tagged[0].tag, AutoTag::ProjectRelated);
        assert_eq!(tagged[1].tag, AutoTag::PlacementRelated);

        let counts = tag_counts(&records);
        assert_eq!(counts[&AutoTag::ProjectRelated], 1);
        assert_eq!(counts[&AutoTag::PlacementRelated], 1);
        assert_eq!(counts[&AutoTag::General], 1);
        assert_eq!(counts[&AutoTag::SupportRelated], 0);
    }
}
