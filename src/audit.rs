use std::collections::HashMap;

use serde::Serialize;

use crate::models::TicketRecord;
use crate::schema::status;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QualityCheck {
    MissingCritical,
    Duplicates,
    StatusInconsistency,
    InvertedTimeline,
}

impl QualityCheck {
    pub const ALL: [QualityCheck; 4] = [
        QualityCheck::MissingCritical,
        QualityCheck::Duplicates,
        QualityCheck::StatusInconsistency,
        QualityCheck::InvertedTimeline,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            QualityCheck::MissingCritical => "Tickets with Missing Critical Information",
            QualityCheck::Duplicates => "Duplicate Ticket Records",
            QualityCheck::StatusInconsistency => "Status and Sub-status Logical Inconsistencies",
            QualityCheck::InvertedTimeline => "Tickets with Resolution Date Before Created Date",
        }
    }

    pub fn recommendation(&self) -> &'static str {
        match self {
            QualityCheck::MissingCritical => {
                "Make Created Date, Resolved Date, Assigned To and Status mandatory, and have the \
                 ticketing system fill Resolved Date when a ticket moves to Completed."
            }
            QualityCheck::Duplicates => {
                "Enforce uniqueness on Ticket No with a primary key or unique constraint."
            }
            QualityCheck::StatusInconsistency => {
                "Offer only the Sub Status options that are valid for the selected Status."
            }
            QualityCheck::InvertedTimeline => {
                "Reject records that violate CHECK (Resolved_Date >= Created_Date)."
            }
        }
    }

    pub fn run(&self, records: &[TicketRecord]) -> Vec<TicketRecord> {
        match self {
            QualityCheck::MissingCritical => keep(records, is_missing_critical),
            QualityCheck::Duplicates => duplicate_tickets(records),
            QualityCheck::StatusInconsistency => keep(records, is_status_inconsistent),
            QualityCheck::InvertedTimeline => keep(records, is_inverted_timeline),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckResult {
    pub check: QualityCheck,
    pub title: &'static str,
    pub recommendation: &'static str,
    pub count: usize,
    pub records: Vec<TicketRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QualityAudit {
    pub checks: Vec<CheckResult>,
}

impl QualityAudit {
    pub fn get(&self, check: QualityCheck) -> Option<&CheckResult> {
        self.checks.iter().find(|result| result.check == check)
    }
}

pub fn audit(records: &[TicketRecord]) -> QualityAudit {
    let checks = QualityCheck::ALL
        .iter()
        .map(|check| {
            let offending = check.run(records);
            CheckResult {
                check: *check,
                title: check.title(),
                recommendation: check.recommendation(),
                count: offending.len(),
                records: offending,
            }
        })
        .collect();
    QualityAudit { checks }
}

fn keep(records: &[TicketRecord], predicate: fn(&TicketRecord) -> bool) -> Vec<TicketRecord> {
    records.iter().filter(|record| predicate(record)).cloned().collect()
}

pub fn is_missing_critical(record: &TicketRecord) -> bool {
    record.created_at.is_none()
        || record.resolved_at.is_none()
        || record.assigned_to.is_none()
        || record.status.is_none()
}

/// Every occurrence of a ticket number that appears more than once. Empty
/// ticket numbers are not treated as a shared value, unlike a keep-all
/// `duplicated()` pass that would pair every blank ticket number together.
pub fn duplicate_tickets(records: &[TicketRecord]) -> Vec<TicketRecord> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for ticket_no in records.iter().filter_map(|r| r.ticket_no.as_deref()) {
        *counts.entry(ticket_no).or_insert(0) += 1;
    }

    records
        .iter()
        .filter(|record| {
            record
                .ticket_no
                .as_deref()
                .and_then(|ticket_no| counts.get(ticket_no))
                .is_some_and(|count| *count >= 2)
        })
        .cloned()
        .collect()
}

pub fn is_status_inconsistent(record: &TicketRecord) -> bool {
    let sub_status = record.sub_status.as_deref();
    match record.status.as_deref() {
        Some(status::COMPLETED) => sub_status != Some(status::SUCCESS),
        Some(status::ESCALATED) => {
            !sub_status.is_some_and(|sub| status::ESCALATED_SUB_STATUSES.contains(&sub))
        }
        Some(status::OPEN) => sub_status == Some(status::SUCCESS),
        _ => false,
    }
}

pub fn is_inverted_timeline(record: &TicketRecord) -> bool {
    match (record.created_at, record.resolved_at) {
        (Some(created), Some(resolved)) => resolved < created,
        _ => false,
    }
}
