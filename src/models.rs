use chrono::NaiveDateTime;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TicketRecord {
    pub row: usize,
    pub ticket_no: Option<String>,
    pub created_at: Option<NaiveDateTime>,
    pub resolved_at: Option<NaiveDateTime>,
    pub resolution_days: Option<i64>,
    pub issue_type: Option<String>,
    pub program_name: Option<String>,
    pub assigned_to: Option<String>,
    pub status: Option<String>,
    pub sub_status: Option<String>,
    pub nps_rating: Option<f64>,
    pub remarks: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    pub records: Vec<TicketRecord>,
    pub skipped_rows: usize,
}

impl Dataset {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IssueSummary {
    pub issue_type: Option<String>,
    pub ticket_count: usize,
    pub avg_nps_rating: Option<f64>,
    pub avg_resolution_days: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Distribution {
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgentPerformance {
    pub assigned_to: String,
    pub ticket_count: usize,
    pub avg_resolution_days: Option<f64>,
    pub resolution_days: Vec<i64>,
    pub distribution: Option<Distribution>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TermCount {
    pub term: String,
    pub count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum AutoTag {
    PlacementRelated,
    ProjectRelated,
    SupportRelated,
    General,
}

impl AutoTag {
    pub const ALL: [AutoTag; 4] = [
        AutoTag::PlacementRelated,
        AutoTag::ProjectRelated,
        AutoTag::SupportRelated,
        AutoTag::General,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            AutoTag::PlacementRelated => "Placement Related",
            AutoTag::ProjectRelated => "Project Related",
            AutoTag::SupportRelated => "Support Related",
            AutoTag::General => "General",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaggedTicket {
    pub ticket_no: Option<String>,
    pub remarks: Option<String>,
    pub tag: AutoTag,
}
