use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use crate::models::TicketRecord;

/// Flow layers, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Issue,
    Program,
    Agent,
    Status,
}

impl Stage {
    pub const ORDER: [Stage; 4] = [Stage::Issue, Stage::Program, Stage::Agent, Stage::Status];

    pub fn prefix(&self) -> &'static str {
        match self {
            Stage::Issue => "issue",
            Stage::Program => "program",
            Stage::Agent => "agent",
            Stage::Status => "status",
        }
    }

    fn value<'a>(&self, record: &'a TicketRecord) -> Option<&'a str> {
        match self {
            Stage::Issue => record.issue_type.as_deref(),
            Stage::Program => record.program_name.as_deref(),
            Stage::Agent => record.assigned_to.as_deref(),
            Stage::Status => record.status.as_deref(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SankeyOptions {
    /// Prefix labels with their stage so equal strings in different
    /// columns become separate nodes.
    pub namespaced: bool,
}

/// Node labels plus three parallel edge arrays indexing into `labels`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SankeyFlow {
    pub labels: Vec<String>,
    pub sources: Vec<usize>,
    pub targets: Vec<usize>,
    pub weights: Vec<usize>,
}

impl SankeyFlow {
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn edge_count(&self) -> usize {
        self.sources.len()
    }
}

fn stage_values(record: &TicketRecord) -> Option<[&str; 4]> {
    Some([
        Stage::Issue.value(record)?,
        Stage::Program.value(record)?,
        Stage::Agent.value(record)?,
        Stage::Status.value(record)?,
    ])
}

/// Records that have a value for every stage.
pub fn complete_records(records: &[TicketRecord]) -> usize {
    records.iter().filter_map(stage_values).count()
}

pub fn build_flow(records: &[TicketRecord], options: SankeyOptions) -> SankeyFlow {
    let complete: Vec<[&str; 4]> = records.iter().filter_map(stage_values).collect();

    let mut flow = SankeyFlow::default();
    if complete.is_empty() {
        return flow;
    }

    let label = |stage: Stage, value: &str| -> String {
        if options.namespaced {
            format!("{}:{}", stage.prefix(), value)
        } else {
            value.to_string()
        }
    };

    let mut index: HashMap<String, usize> = HashMap::new();
    for (column, stage) in Stage::ORDER.iter().enumerate() {
        for row in &complete {
            let name = label(*stage, row[column]);
            if !index.contains_key(&name) {
                index.insert(name.clone(), flow.labels.len());
                flow.labels.push(name);
            }
        }
    }

    for pair in 0..Stage::ORDER.len() - 1 {
        let (source_stage, target_stage) = (Stage::ORDER[pair], Stage::ORDER[pair + 1]);
        let mut links: BTreeMap<(&str, &str), usize> = BTreeMap::new();
        for row in &complete {
            *links.entry((row[pair], row[pair + 1])).or_insert(0) += 1;
        }

        for ((source, target), weight) in links {
            flow.sources.push(index[&label(source_stage, source)]);
            flow.targets.push(index[&label(target_stage, target)]);
            flow.weights.push(weight);
        }
    }

    flow
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fixtures::ticket;
    use pretty_assertions::assert_eq;

    fn routed(issue: &str, program: &str, agent: &str, status: &str) -> TicketRecord {
        let mut record = ticket("T");
        record.issue_type = Some(issue.to_string());
        record.program_name = Some(program.to_string());
        record.assigned_to = Some(agent.to_string());
        record.status = Some(status.to_string());
        record
    }

    #[test]
    fn builds_labels_and_weighted_edges() {
        let records = vec![
            routed("Placement", "DS", "Priya", "Open"),
            routed("Placement", "DS", "Arjun", "Completed"),
            routed("Projects", "DS", "Priya", "Completed"),
        ];

        let flow = build_flow(&records, SankeyOptions::default());
        assert_eq!(
            flow.labels,
            vec!["Placement", "Projects", "DS", "Priya", "Arjun", "Open", "Completed"]
        );
        assert_eq!(flow.sources, vec![0, 1, 2, 2, 4, 3, 3]);
        assert_eq!(flow.targets, vec![2, 2, 4, 3, 6, 6, 5]);
        assert_eq!(flow.weights, vec![2, 1, 1, 2, 1, 1, 1]);
    }

    #[test]
    fn weights_per_stage_pair_sum_to_complete_records() {
        let mut partial = routed("Placement", "DS", "Priya", "Open");
        partial.status = None;
        let records = vec![
            routed("Placement", "DS", "Priya", "Open"),
            routed("Projects", "Web", "Arjun", "Open"),
            routed("Projects", "Web", "Arjun", "Escalated"),
            partial,
        ];

        let flow = build_flow(&records, SankeyOptions { namespaced: true });
        for stage in &Stage::ORDER[..3] {
            let total: usize = flow
                .sources
                .iter()
                .zip(&flow.weights)
                .filter(|(source, _)| flow.labels[**source].starts_with(stage.prefix()))
                .map(|(_, weight)| *weight)
                .sum();
            assert_eq!(total, 3);
        }
    }

    #[test]
    fn shared_strings_collapse_unless_namespaced() {
        let records = vec![routed("Open", "DS", "Priya", "Open")];

        let shared = build_flow(&records, SankeyOptions::default());
        assert_eq!(shared.labels.len(), 3);
        assert_eq!(shared.targets.last(), Some(&0));

        let namespaced = build_flow(&records, SankeyOptions { namespaced: true });
        assert_eq!(
            namespaced.labels,
            vec!["issue:Open", "program:DS", "agent:Priya", "status:Open"]
        );
        assert_eq!(namespaced.sources, vec![0, 1, 2]);
        assert_eq!(namespaced.targets, vec![1, 2, 3]);
    }

    #[test]
    fn no_complete_records_gives_empty_flow() {
        let mut partial = routed("Placement", "DS", "Priya", "Open");
        partial.program_name = None;

        let flow = build_flow(std::slice::from_ref(&partial), SankeyOptions::default());
        assert!(flow.is_empty());
        assert_eq!(complete_records(&[partial]), 0);
        assert_eq!(flow.edge_count(), 0);
        assert!(flow.weights.is_empty());
    }
}
