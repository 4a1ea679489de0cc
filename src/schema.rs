// Column names of the NPS tracker export.
pub const TICKET_NO: &str = "Ticket No";
pub const CREATED_DATE: &str = "Created Date";
pub const RESOLVED_DATE: &str = "Resolved Date";
pub const ISSUE_TYPE: &str = "Issue 2 - NPS";
pub const PROGRAM_NAME: &str = "Program Name";
pub const ASSIGNED_TO: &str = "Assigned To";
pub const STATUS: &str = "Status";
pub const SUB_STATUS: &str = "Sub Status";
pub const NPS_RATING: &str = "NPS Rating";
pub const REMARKS: &str = "Ticket All Remarks";

pub const DEFAULT_SOURCE_FILE: &str = "Assignment Data_ NPS Tracker_2025 - Sheet1.csv";

/// Status and sub-status values the consistency audit knows about.
pub mod status {
    pub const COMPLETED: &str = "Completed";
    pub const ESCALATED: &str = "Escalated";
    pub const OPEN: &str = "Open";

    pub const SUCCESS: &str = "Success";
    pub const PENDING_CUSTOMER: &str = "Pending Customer";
    pub const IN_PROGRESS: &str = "In Progress";

    pub const ESCALATED_SUB_STATUSES: [&str; 2] = [PENDING_CUSTOMER, IN_PROGRESS];
}

/// Cell contents read as a missing value, matching the usual spreadsheet and
/// dataframe export sentinels.
pub const NA_VALUES: [&str; 19] = [
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];
