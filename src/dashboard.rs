use serde::Serialize;

use crate::audit::{self, QualityAudit};
use crate::config::DashboardConfig;
use crate::models::{AgentPerformance, AutoTag, IssueSummary, TaggedTicket, TermCount, TicketRecord};
use crate::rollup;
use crate::sankey::{self, SankeyFlow};
use crate::sla::{self, SlaMatrix};
use crate::tagger;
use crate::terms;

/// The eight dashboard views, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Overview,
    TeamPerformance,
    RootCauseAnalysis,
    TicketFlowSankey,
    SlaBreachHeatmap,
    DataQualityChecks,
    AllRecords,
    AutomationSuggestions,
}

impl View {
    pub const ALL: [View; 8] = [
        View::Overview,
        View::TeamPerformance,
        View::RootCauseAnalysis,
        View::TicketFlowSankey,
        View::SlaBreachHeatmap,
        View::DataQualityChecks,
        View::AllRecords,
        View::AutomationSuggestions,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            View::Overview => "Overview",
            View::TeamPerformance => "Team Performance",
            View::RootCauseAnalysis => "Root Cause Analysis",
            View::TicketFlowSankey => "Ticket Flow Sankey",
            View::SlaBreachHeatmap => "SLA Breach Heatmap",
            View::DataQualityChecks => "Data Quality Checks",
            View::AllRecords => "All Records",
            View::AutomationSuggestions => "Automation Suggestions",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TagCount {
    pub tag: AutoTag,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum ViewPayload {
    Overview {
        ticket_count: usize,
        issues: Vec<IssueSummary>,
        headline: Option<IssueSummary>,
        avg_nps_rating: Option<f64>,
        avg_resolution_days: Option<f64>,
    },
    TeamPerformance {
        agents: Vec<AgentPerformance>,
    },
    RootCauseAnalysis {
        remark_count: usize,
        terms: Vec<TermCount>,
    },
    TicketFlowSankey {
        complete_records: usize,
        flow: SankeyFlow,
    },
    SlaBreachHeatmap {
        matrix: SlaMatrix,
    },
    DataQualityChecks {
        audit: QualityAudit,
    },
    AllRecords {
        total: usize,
        records: Vec<TicketRecord>,
    },
    AutomationSuggestions {
        ideas: Vec<String>,
        preview: Vec<TaggedTicket>,
        counts: Vec<TagCount>,
    },
}

impl ViewPayload {
    pub fn view(&self) -> View {
        match self {
            ViewPayload::Overview { .. } => View::Overview,
            ViewPayload::TeamPerformance { .. } => View::TeamPerformance,
            ViewPayload::RootCauseAnalysis { .. } => View::RootCauseAnalysis,
            ViewPayload::TicketFlowSankey { .. } => View::TicketFlowSankey,
            ViewPayload::SlaBreachHeatmap { .. } => View::SlaBreachHeatmap,
            ViewPayload::DataQualityChecks { .. } => View::DataQualityChecks,
            ViewPayload::AllRecords { .. } => View::AllRecords,
            ViewPayload::AutomationSuggestions { .. } => View::AutomationSuggestions,
        }
    }
}

/// Computes the data behind one view from the filtered records.
pub fn build_view(view: View, records: &[TicketRecord], config: &DashboardConfig) -> ViewPayload {
    log::debug!("building {} over {} records", view.title(), records.len());
    match view {
        View::Overview => {
            let issues = rollup::summarize_by_issue(records);
            let headline = rollup::headline_issue(&issues).cloned();
            let (avg_nps_rating, avg_resolution_days) = rollup::overall_means(records);
            ViewPayload::Overview {
                ticket_count: records.len(),
                issues,
                headline,
                avg_nps_rating,
                avg_resolution_days,
            }
        }
        View::TeamPerformance => ViewPayload::TeamPerformance {
            agents: rollup::team_performance(records),
        },
        View::RootCauseAnalysis => ViewPayload::RootCauseAnalysis {
            remark_count: records.iter().filter(|r| r.remarks.is_some()).count(),
            terms: terms::remark_terms(records, config.max_words),
        },
        View::TicketFlowSankey => ViewPayload::TicketFlowSankey {
            complete_records: sankey::complete_records(records),
            flow: sankey::build_flow(records, config.sankey),
        },
        View::SlaBreachHeatmap => ViewPayload::SlaBreachHeatmap {
            matrix: sla::breach_matrix(records, config.sla_threshold_days),
        },
        View::DataQualityChecks => ViewPayload::DataQualityChecks {
            audit: audit::audit(records),
        },
        View::AllRecords => ViewPayload::AllRecords {
            total: records.len(),
            records: records
                .iter()
                .take(config.record_limit.unwrap_or(records.len()))
                .enumerate()
                .map(|(index, record)| TicketRecord {
                    row: index + 1,
                    ..record.clone()
                })
                .collect(),
        },
        View::AutomationSuggestions => ViewPayload::AutomationSuggestions {
            ideas: tagger::AUTOMATION_IDEAS.iter().map(|idea| idea.to_string()).collect(),
            preview: tagger::tag_records(records, config.tag_preview),
            counts: tagger::tag_counts(records)
                .into_iter()
                .map(|(tag, count)| TagCount { tag, count })
                .collect(),
        },
    }
}
