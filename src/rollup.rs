use std::collections::HashMap;

use crate::models::{AgentPerformance, Distribution, IssueSummary, TicketRecord};

pub fn summarize_by_issue(records: &[TicketRecord]) -> Vec<IssueSummary> {
    #[derive(Default)]
    struct Acc {
        count: usize,
        ratings: Vec<f64>,
        days: Vec<f64>,
    }

    let mut order: Vec<Option<String>> = Vec::new();
    let mut groups: HashMap<Option<String>, Acc> = HashMap::new();

    for record in records {
        let entry = groups.entry(record.issue_type.clone()).or_insert_with(|| {
            order.push(record.issue_type.clone());
            Acc::default()
        });
        entry.count += 1;
        entry.ratings.extend(record.nps_rating);
        entry.days.extend(record.resolution_days.map(|days| days as f64));
    }

    let mut summaries: Vec<IssueSummary> = order
        .into_iter()
        .filter_map(|issue_type| {
            let acc = groups.remove(&issue_type)?;
            Some(IssueSummary {
                issue_type,
                ticket_count: acc.count,
                avg_nps_rating: mean(&acc.ratings).map(round2),
                avg_resolution_days: mean(&acc.days).map(round2),
            })
        })
        .collect();

    // stable: equal counts keep first-seen order
    summaries.sort_by(|a, b| b.ticket_count.cmp(&a.ticket_count));
    summaries
}

/// The issue to fix first: the highest ticket count, then the lowest
/// average NPS among equal counts.
pub fn headline_issue(issues: &[IssueSummary]) -> Option<&IssueSummary> {
    issues.iter().reduce(|best, candidate| {
        let more_tickets = candidate.ticket_count > best.ticket_count;
        let same_tickets = candidate.ticket_count == best.ticket_count;
        let lower_nps = match (candidate.avg_nps_rating, best.avg_nps_rating) {
            (Some(candidate), Some(best)) => candidate < best,
            (Some(_), None) => true,
            _ => false,
        };
        if more_tickets || (same_tickets && lower_nps) {
            candidate
        } else {
            best
        }
    })
}

/// Mean NPS rating and mean resolution days over every record, rounded.
pub fn overall_means(records: &[TicketRecord]) -> (Option<f64>, Option<f64>) {
    let ratings: Vec<f64> = records.iter().filter_map(|r| r.nps_rating).collect();
    let days: Vec<f64> = records
        .iter()
        .filter_map(|r| r.resolution_days.map(|days| days as f64))
        .collect();
    (mean(&ratings).map(round2), mean(&days).map(round2))
}

pub fn team_performance(records: &[TicketRecord]) -> Vec<AgentPerformance> {
    let mut order: Vec<String> = Vec::new();
    let mut groups: HashMap<String, (usize, Vec<i64>)> = HashMap::new();

    for record in records {
        let Some(agent) = record.assigned_to.as_ref() else {
            continue;
        };
        let entry = groups.entry(agent.clone()).or_insert_with(|| {
            order.push(agent.clone());
            (0, Vec::new())
        });
        entry.0 += 1;
        entry.1.extend(record.resolution_days);
    }

    let mut values: Vec<AgentPerformance> = order
        .into_iter()
        .filter_map(|agent| {
            let (ticket_count, resolution_days) = groups.remove(&agent)?;
            let as_f64: Vec<f64> = resolution_days.iter().map(|days| *days as f64).collect();
            Some(AgentPerformance {
                assigned_to: agent,
                ticket_count,
                avg_resolution_days: mean(&as_f64),
                distribution: distribution(&as_f64),
                resolution_days,
            })
        })
        .collect();

    values.sort_by(|a, b| match (a.avg_resolution_days, b.avg_resolution_days) {
        (Some(a), Some(b)) => a.partial_cmp(&b).unwrap_or(std::cmp::Ordering::Equal),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    });
    values
}

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub fn distribution(values: &[f64]) -> Option<Distribution> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    Some(Distribution {
        min: sorted[0],
        q1: quantile(&sorted, 0.25),
        median: quantile(&sorted, 0.5),
        q3: quantile(&sorted, 0.75),
        max: sorted[sorted.len() - 1],
    })
}

// Linear interpolation between closest ranks; `sorted` must be non-empty.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let position = q * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let fraction = position - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * fraction
}
