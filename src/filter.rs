use std::collections::HashSet;

use crate::models::TicketRecord;

/// Selected values for the two filter dimensions. `None` stands for records
/// where the field is empty, so the default selection keeps them too.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterSelection {
    pub issue_types: HashSet<Option<String>>,
    pub programs: HashSet<Option<String>>,
}

impl FilterSelection {
    /// Every distinct issue type and program present in `records`.
    pub fn all(records: &[TicketRecord]) -> Self {
        Self {
            issue_types: distinct_values(records, |r| r.issue_type.as_deref())
                .into_iter()
                .collect(),
            programs: distinct_values(records, |r| r.program_name.as_deref())
                .into_iter()
                .collect(),
        }
    }

    /// Restricts the default selection to the requested values. An empty
    /// request leaves that dimension unfiltered.
    pub fn from_requested(records: &[TicketRecord], issues: &[String], programs: &[String]) -> Self {
        let mut selection = Self::all(records);
        if !issues.is_empty() {
            selection.issue_types = issues.iter().cloned().map(Some).collect();
        }
        if !programs.is_empty() {
            selection.programs = programs.iter().cloned().map(Some).collect();
        }
        selection
    }

    pub fn matches(&self, record: &TicketRecord) -> bool {
        self.issue_types.contains(&record.issue_type) && self.programs.contains(&record.program_name)
    }
}

pub fn filter(records: &[TicketRecord], selection: &FilterSelection) -> Vec<TicketRecord> {
    records
        .iter()
        .filter(|record| selection.matches(record))
        .cloned()
        .collect()
}

/// Distinct values of a column in first-seen order.
pub fn distinct_values<F>(records: &[TicketRecord], field: F) -> Vec<Option<String>>
where
    F: Fn(&TicketRecord) -> Option<&str>,
{
    let mut seen = HashSet::new();
    let mut values = Vec::new();
    for record in records {
        let value = field(record).map(str::to_string);
        if seen.insert(value.clone()) {
            values.push(value);
        }
    }
    values
}
