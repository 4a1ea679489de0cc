use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::Path;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use log::{debug, info, warn};
use serde::Deserialize;

use crate::error::LoadError;
use crate::models::{Dataset, TicketRecord};
use crate::schema;

const SECONDS_PER_DAY: i64 = 86_400;

const DATETIME_FORMATS: [&str; 6] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%Y-%m-%dT%H:%M:%S%.f",
];

const DATE_FORMATS: [&str; 7] = [
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%m-%d-%Y",
    "%d %b %Y",
    "%b %d, %Y",
    "%d-%b-%Y",
];

#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(rename = "Ticket No")]
    ticket_no: Option<String>,
    #[serde(rename = "Created Date")]
    created_date: Option<String>,
    #[serde(rename = "Resolved Date")]
    resolved_date: Option<String>,
    #[serde(rename = "Issue 2 - NPS")]
    issue_type: Option<String>,
    #[serde(rename = "Program Name")]
    program_name: Option<String>,
    #[serde(rename = "Assigned To")]
    assigned_to: Option<String>,
    #[serde(rename = "Status")]
    status: Option<String>,
    #[serde(rename = "Sub Status")]
    sub_status: Option<String>,
    #[serde(rename = "NPS Rating")]
    nps_rating: Option<String>,
    #[serde(rename = "Ticket All Remarks")]
    remarks: Option<String>,
}

/// Reads the tracker export at `path`.
///
/// A file that does not exist is reported as [`LoadError::MissingSourceFile`]
/// so callers can fall back to an empty dataset. Rows the CSV reader rejects
/// are skipped and counted instead of failing the whole load.
pub fn load_tickets(path: &Path) -> Result<Dataset, LoadError> {
    let file = File::open(path).map_err(|source| match source.kind() {
        ErrorKind::NotFound => LoadError::MissingSourceFile {
            path: path.to_path_buf(),
        },
        _ => LoadError::Io {
            path: path.to_path_buf(),
            source,
        },
    })?;

    let dataset = read_tickets(file)?;
    info!(
        "loaded {} tickets from {} ({} rows skipped)",
        dataset.records.len(),
        path.display(),
        dataset.skipped_rows
    );
    Ok(dataset)
}

pub fn read_tickets<R: Read>(input: R) -> Result<Dataset, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(input);

    let headers = reader.headers()?.clone();
    for column in [
        schema::TICKET_NO,
        schema::CREATED_DATE,
        schema::RESOLVED_DATE,
        schema::ISSUE_TYPE,
        schema::PROGRAM_NAME,
        schema::ASSIGNED_TO,
        schema::STATUS,
        schema::SUB_STATUS,
        schema::NPS_RATING,
        schema::REMARKS,
    ] {
        if !headers.iter().any(|header| header == column) {
            warn!("column '{column}' is missing, treating it as empty");
        }
    }

    let mut dataset = Dataset::default();

    for (index, result) in reader.deserialize::<CsvRow>().enumerate() {
        let row = index + 1;
        match result {
            Ok(raw) => dataset.records.push(to_record(row, raw)),
            Err(err) => {
                warn!("skipping row {row}: {err}");
                dataset.skipped_rows += 1;
            }
        }
    }

    Ok(dataset)
}

fn to_record(row: usize, raw: CsvRow) -> TicketRecord {
    let created_at = parse_cell_timestamp(row, schema::CREATED_DATE, raw.created_date);
    let resolved_at = parse_cell_timestamp(row, schema::RESOLVED_DATE, raw.resolved_date);
    let nps_rating = clean(raw.nps_rating).and_then(|value| match value.parse::<f64>() {
        Ok(rating) if rating.is_finite() => Some(rating),
        _ => {
            warn!("row {row}: '{value}' is not a valid {}", schema::NPS_RATING);
            None
        }
    });

    TicketRecord {
        row,
        ticket_no: clean(raw.ticket_no),
        created_at,
        resolved_at,
        resolution_days: resolution_days(created_at, resolved_at),
        issue_type: clean(raw.issue_type),
        program_name: clean(raw.program_name),
        assigned_to: clean(raw.assigned_to),
        status: clean(raw.status),
        sub_status: clean(raw.sub_status),
        nps_rating,
        remarks: clean(raw.remarks),
    }
}

fn clean(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !schema::NA_VALUES.contains(&value.as_str()))
}

fn parse_cell_timestamp(row: usize, column: &str, value: Option<String>) -> Option<NaiveDateTime> {
    let value = clean(value)?;
    let parsed = parse_timestamp(&value);
    if parsed.is_none() {
        warn!("row {row}: could not parse {column} '{value}'");
    }
    parsed
}

/// Parses the date formats seen in tracker exports. Ambiguous day/month
/// strings are read month first.
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.naive_utc());
    }

    for format in DATETIME_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(value, format) {
            return Some(parsed);
        }
    }

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(value, format) {
            return date.and_hms_opt(0, 0, 0);
        }
    }

    debug!("no known date format matches '{value}'");
    None
}

/// Whole days between the two timestamps, rounded towards negative infinity.
pub fn resolution_days(
    created_at: Option<NaiveDateTime>,
    resolved_at: Option<NaiveDateTime>,
) -> Option<i64> {
    let elapsed = resolved_at? - created_at?;
    Some(elapsed.num_seconds().div_euclid(SECONDS_PER_DAY))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fixtures::at;
    use std::io::Write;

    const HEADER: &str = "Ticket No,Created Date,Resolved Date,Issue 2 - NPS,Program Name,Assigned To,Status,Sub Status,NPS Rating,Ticket All Remarks";

    #[test]
    fn parses_rows_and_derives_resolution_days() {
        let csv = format!(
            "{HEADER}\n\
             T-1,2025-01-06 10:00:00,2025-01-09 09:00:00,Placement,Data Science,Priya,Completed,Success,8,Needs placement help\n\
             T-2,2025-01-07,,Projects,Web Dev,Arjun,Open,In Progress,,\n"
        );

        let dataset = read_tickets(csv.as_bytes()).unwrap();
        assert_eq!(dataset.records.len(), 2);
        assert_eq!(dataset.skipped_rows, 0);

        let first = &dataset.records[0];
        assert_eq!(first.row, 1);
        assert_eq!(first.ticket_no.as_deref(), Some("T-1"));
        assert_eq!(first.resolution_days, Some(2));
        assert_eq!(first.nps_rating, Some(8.0));

        let second = &dataset.records[1];
        assert_eq!(second.created_at, Some(at(2025, 1, 7) - chrono::Duration::hours(9)));
        assert_eq!(second.resolved_at, None);
        assert_eq!(second.resolution_days, None);
        assert_eq!(second.nps_rating, None);
        assert_eq!(second.remarks, None);
    }

    #[test]
    fn unparseable_cells_become_absent() {
        let csv = format!("{HEADER}\nT-1,not a date,2025-01-09,Placement,DS,Priya,Open,Success,great,\n");

        let dataset = read_tickets(csv.as_bytes()).unwrap();
        let record = &dataset.records[0];
        assert_eq!(record.created_at, None);
        assert_eq!(record.resolution_days, None);
        assert_eq!(record.nps_rating, None);
    }

    #[test]
    fn na_tokens_and_non_finite_ratings_are_absent() {
        let csv = format!(
            "{HEADER}\n\
             T-1,2025-01-06,2025-01-08,Placement,DS,Priya,Completed,Success,8,ok\n\
             T-2,2025-01-06,2025-01-08,Placement,DS,N/A,null,NA,NaN,nan\n\
             T-3,2025-01-06,2025-01-08,Placement,DS,#N/A,None,n/a,inf,<NA>\n"
        );

        let dataset = read_tickets(csv.as_bytes()).unwrap();
        for record in &dataset.records[1..] {
            assert_eq!(record.assigned_to, None);
            assert_eq!(record.status, None);
            assert_eq!(record.sub_status, None);
            assert_eq!(record.nps_rating, None);
            assert_eq!(record.remarks, None);
        }

        let issues = crate::rollup::summarize_by_issue(&dataset.records);
        assert_eq!(issues[0].avg_nps_rating, Some(8.0));
        assert_eq!(
            dataset.records.iter().filter(|r| crate::audit::is_missing_critical(r)).count(),
            2
        );
    }

    #[test]
    fn missing_columns_are_treated_as_empty() {
        let csv = "Ticket No,Status\nT-9,Open\n";

        let dataset = read_tickets(csv.as_bytes()).unwrap();
        assert_eq!(dataset.records.len(), 1);
        assert_eq!(dataset.records[0].status.as_deref(), Some("Open"));
        assert_eq!(dataset.records[0].assigned_to, None);
    }

    #[test]
    fn missing_file_is_reported_as_missing_source() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_tickets(&dir.path().join("absent.csv")).unwrap_err();
        assert!(err.is_missing_source());
    }

    #[test]
    fn loads_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "{HEADER}").unwrap();
        writeln!(file, "T-1,01/10/2025,01/12/2025,Placement,DS,Priya,Completed,Success,9,ok").unwrap();

        let dataset = load_tickets(file.path()).unwrap();
        assert_eq!(dataset.records.len(), 1);
        assert_eq!(dataset.records[0].created_at, Some(at(2025, 1, 10) - chrono::Duration::hours(9)));
        assert_eq!(dataset.records[0].resolution_days, Some(2));
    }

    #[test]
    fn timestamp_formats_cover_common_exports() {
        let midnight = |y, m, d| NaiveDate::from_ymd_opt(y, m, d).unwrap().and_hms_opt(0, 0, 0);
        assert_eq!(parse_timestamp("2025-03-04"), midnight(2025, 3, 4));
        assert_eq!(parse_timestamp("03/04/2025"), midnight(2025, 3, 4));
        assert_eq!(parse_timestamp("4 Mar 2025"), midnight(2025, 3, 4));
        assert_eq!(parse_timestamp("Mar 04, 2025"), midnight(2025, 3, 4));
        assert_eq!(
            parse_timestamp("2025-03-04T10:15:00Z"),
            NaiveDate::from_ymd_opt(2025, 3, 4).unwrap().and_hms_opt(10, 15, 0)
        );
        assert_eq!(parse_timestamp("yesterday"), None);
    }

    #[test]
    fn resolution_days_floor_partial_days() {
        let created = at(2025, 1, 10);
        assert_eq!(resolution_days(Some(created), Some(created + chrono::Duration::hours(36))), Some(1));
        assert_eq!(resolution_days(Some(created), Some(created - chrono::Duration::hours(12))), Some(-1));
        assert_eq!(resolution_days(Some(created), Some(at(2025, 1, 5))), Some(-5));
        assert_eq!(resolution_days(None, Some(created)), None);
    }
}
