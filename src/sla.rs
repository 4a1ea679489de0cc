use std::collections::{BTreeMap, BTreeSet};

use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;

use crate::models::TicketRecord;

pub const DEFAULT_SLA_THRESHOLD_DAYS: i64 = 3;

/// Breach counts per agent (rows) and week (columns). Every cell is present;
/// weeks absent from the data are not added.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SlaMatrix {
    pub threshold_days: i64,
    pub agents: Vec<String>,
    pub weeks: Vec<String>,
    pub cells: Vec<Vec<usize>>,
}

impl SlaMatrix {
    pub fn is_empty(&self) -> bool {
        self.agents.is_empty() || self.weeks.is_empty()
    }

    pub fn cell(&self, agent: &str, week: &str) -> Option<usize> {
        let row = self.agents.iter().position(|a| a == agent)?;
        let column = self.weeks.iter().position(|w| w == week)?;
        Some(self.cells[row][column])
    }

    pub fn agent_totals(&self) -> Vec<usize> {
        self.cells.iter().map(|row| row.iter().sum()).collect()
    }

    pub fn week_totals(&self) -> Vec<usize> {
        (0..self.weeks.len())
            .map(|column| self.cells.iter().map(|row| row[column]).sum())
            .collect()
    }
}

pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_monday() as i64)
}

pub fn breach_matrix(records: &[TicketRecord], threshold_days: i64) -> SlaMatrix {
    let mut weeks: BTreeSet<String> = BTreeSet::new();
    let mut breaches: BTreeMap<String, BTreeMap<String, usize>> = BTreeMap::new();

    for record in records {
        let (Some(created_at), Some(days), Some(agent)) = (
            record.created_at,
            record.resolution_days,
            record.assigned_to.as_ref(),
        ) else {
            continue;
        };

        let week = week_start(created_at.date()).format("%Y-%m-%d").to_string();
        weeks.insert(week.clone());
        let count = breaches
            .entry(agent.clone())
            .or_default()
            .entry(week)
            .or_insert(0);
        if days > threshold_days {
            *count += 1;
        }
    }

    let weeks: Vec<String> = weeks.into_iter().collect();
    let mut matrix = SlaMatrix {
        threshold_days,
        ..SlaMatrix::default()
    };
    for (agent, by_week) in breaches {
        let row = weeks
            .iter()
            .map(|week| by_week.get(week).copied().unwrap_or(0))
            .collect();
        matrix.agents.push(agent);
        matrix.cells.push(row);
    }
    matrix.weeks = weeks;
    matrix
}
