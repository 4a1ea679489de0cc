use std::fmt::Write;

use chrono::NaiveDateTime;

use crate::audit::QualityAudit;
use crate::dashboard::{TagCount, ViewPayload};
use crate::models::{AgentPerformance, IssueSummary, TaggedTicket, TermCount, TicketRecord};
use crate::sankey::SankeyFlow;
use crate::sla::SlaMatrix;

const MISSING: &str = "-";

pub fn render_view(payload: &ViewPayload) -> String {
    let mut output = String::new();
    let _ = writeln!(output, "## {}", payload.view().title());
    let _ = writeln!(output);

    match payload {
        ViewPayload::Overview {
            ticket_count,
            issues,
            headline,
            avg_nps_rating,
            avg_resolution_days,
        } => {
            render_overview(&mut output, *ticket_count, issues);
            render_headline(&mut output, headline.as_ref(), *avg_nps_rating, *avg_resolution_days);
        }
        ViewPayload::TeamPerformance { agents } => render_team(&mut output, agents),
        ViewPayload::RootCauseAnalysis {
            remark_count,
            terms,
        } => render_terms(&mut output, *remark_count, terms),
        ViewPayload::TicketFlowSankey {
            complete_records,
            flow,
        } => render_flow(&mut output, *complete_records, flow),
        ViewPayload::SlaBreachHeatmap { matrix } => render_sla(&mut output, matrix),
        ViewPayload::DataQualityChecks { audit } => render_quality(&mut output, audit),
        ViewPayload::AllRecords { total, records } => render_records(&mut output, *total, records),
        ViewPayload::AutomationSuggestions {
            ideas,
            preview,
            counts,
        } => {
            render_ideas(&mut output, ideas);
            render_tags(&mut output, preview, counts);
        }
    }

    output
}

/// Full Markdown report: optional load notice, filter summary, then every
/// view in display order.
pub fn build_report(notice: Option<&str>, filters: &str, payloads: &[ViewPayload]) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "# NPS Tracker Dashboard");
    if let Some(notice) = notice {
        let _ = writeln!(output);
        let _ = writeln!(output, "> **Warning:** {notice}");
    }
    let _ = writeln!(output);
    let _ = writeln!(output, "Filters: {filters}");

    for payload in payloads {
        let _ = writeln!(output);
        output.push_str(&render_view(payload));
    }

    output
}

fn render_overview(output: &mut String, ticket_count: usize, issues: &[IssueSummary]) {
    let _ = writeln!(output, "Displaying insights for {ticket_count} tickets.");
    let _ = writeln!(output);
    let _ = writeln!(output, "### Strategic Issue Prioritisation");
    let _ = writeln!(output);
    let _ = writeln!(
        output,
        "This table identifies critical issues by combining ticket volume (Frequency) with learner sentiment (NPS Impact) and operational drag (Resolution Time Impact)."
    );
    let _ = writeln!(output);

    if issues.is_empty() {
        let _ = writeln!(output, "No data to display based on current filters.");
        return;
    }

    let _ = writeln!(output, "| Issue | Ticket Count | Avg NPS Rating | Avg Resolution Time (days) |");
    let _ = writeln!(output, "|---|---:|---:|---:|");
    for issue in issues {
        let _ = writeln!(
            output,
            "| {} | {} | {} | {} |",
            label(issue.issue_type.as_deref()),
            issue.ticket_count,
            decimal(issue.avg_nps_rating),
            decimal(issue.avg_resolution_days)
        );
    }
}

fn render_headline(
    output: &mut String,
    headline: Option<&IssueSummary>,
    avg_nps_rating: Option<f64>,
    avg_resolution_days: Option<f64>,
) {
    let _ = writeln!(output);
    let _ = writeln!(output, "### Recommendation: The Single Biggest Fix");
    let _ = writeln!(output);

    let Some(issue) = headline else {
        let _ = writeln!(output, "Not enough data to recommend a fix.");
        return;
    };

    let name = label(issue.issue_type.as_deref());
    let _ = writeln!(output, "**Analysis:** Based on the data, **'{name}'** is the most critical issue.");
    let _ = writeln!(output);
    let _ = writeln!(
        output,
        "- **Frequency:** {} tickets, the highest volume of any issue.",
        issue.ticket_count
    );
    let _ = writeln!(
        output,
        "- **Impact:** average NPS {} against {} overall, average resolution {} days against {} overall.",
        decimal(issue.avg_nps_rating),
        decimal(avg_nps_rating),
        decimal(issue.avg_resolution_days),
        decimal(avg_resolution_days)
    );
    let _ = writeln!(output);
    let _ = writeln!(
        output,
        "**Conclusion:** Focusing resources on '{name}' would provide the largest positive impact on learner satisfaction and reduce operational load."
    );
}

fn render_team(output: &mut String, agents: &[AgentPerformance]) {
    if agents.is_empty() {
        let _ = writeln!(output, "No data to display.");
        return;
    }

    let _ = writeln!(
        output,
        "| Team Member | Tickets | Avg Resolution (days) | Min | Q1 | Median | Q3 | Max |"
    );
    let _ = writeln!(output, "|---|---:|---:|---:|---:|---:|---:|---:|");
    for agent in agents {
        let stats = agent.distribution;
        let _ = writeln!(
            output,
            "| {} | {} | {} | {} | {} | {} | {} | {} |",
            agent.assigned_to,
            agent.ticket_count,
            decimal(agent.avg_resolution_days),
            decimal(stats.map(|s| s.min)),
            decimal(stats.map(|s| s.q1)),
            decimal(stats.map(|s| s.median)),
            decimal(stats.map(|s| s.q3)),
            decimal(stats.map(|s| s.max))
        );
    }
}

fn render_terms(output: &mut String, remark_count: usize, terms: &[TermCount]) {
    if terms.is_empty() {
        let _ = writeln!(output, "No remarks available for word cloud.");
        return;
    }

    let _ = writeln!(output, "Most frequent terms across {remark_count} ticket remarks:");
    let _ = writeln!(output);
    for term in terms {
        let _ = writeln!(output, "- {} ({})", term.term, term.count);
    }
}

fn render_flow(output: &mut String, complete_records: usize, flow: &SankeyFlow) {
    if flow.is_empty() {
        let _ = writeln!(output, "Not enough data to generate a Sankey diagram.");
        return;
    }

    let _ = writeln!(
        output,
        "{} nodes and {} links from {complete_records} complete tickets.",
        flow.labels.len(),
        flow.edge_count()
    );
    let _ = writeln!(output);
    let _ = writeln!(output, "| Source | Target | Tickets |");
    let _ = writeln!(output, "|---|---|---:|");
    for ((source, target), weight) in flow.sources.iter().zip(&flow.targets).zip(&flow.weights) {
        let _ = writeln!(
            output,
            "| {} | {} | {} |",
            flow.labels[*source], flow.labels[*target], weight
        );
    }
}

fn render_sla(output: &mut String, matrix: &SlaMatrix) {
    if matrix.is_empty() {
        let _ = writeln!(output, "Not enough data to generate SLA Breach Heatmap.");
        return;
    }

    let _ = writeln!(
        output,
        "Tickets resolved in more than {} days, by team member and week.",
        matrix.threshold_days
    );
    let _ = writeln!(output);

    let mut header = String::from("| Team Member |");
    let mut divider = String::from("|---|");
    for week in &matrix.weeks {
        let _ = write!(header, " {week} |");
        divider.push_str("---:|");
    }
    header.push_str(" Total |");
    divider.push_str("---:|");
    let _ = writeln!(output, "{header}");
    let _ = writeln!(output, "{divider}");

    for ((agent, row), total) in matrix.agents.iter().zip(&matrix.cells).zip(matrix.agent_totals()) {
        let mut line = format!("| {agent} |");
        for cell in row {
            let _ = write!(line, " {cell} |");
        }
        let _ = writeln!(output, "{line} {total} |");
    }
}

fn render_quality(output: &mut String, audit: &QualityAudit) {
    for check in &audit.checks {
        let _ = writeln!(output, "### {}", check.title);
        let _ = writeln!(output);
        let _ = writeln!(output, "Count: {}", check.count);
        if !check.records.is_empty() {
            let _ = writeln!(output);
            write_record_table(output, &check.records);
        }
        let _ = writeln!(output);
        let _ = writeln!(output, "_Recommendation:_ {}", check.recommendation);
        let _ = writeln!(output);
    }
}

fn render_records(output: &mut String, total: usize, records: &[TicketRecord]) {
    if records.is_empty() {
        let _ = writeln!(output, "No records match the current filters.");
        return;
    }

    if records.len() < total {
        let _ = writeln!(output, "Showing {} of {total} records.", records.len());
    } else {
        let _ = writeln!(output, "{total} records.");
    }
    let _ = writeln!(output);
    write_record_table(output, records);
}

fn render_ideas(output: &mut String, ideas: &[String]) {
    let _ = writeln!(output, "Here are some automation ideas to improve operational efficiency:");
    let _ = writeln!(output);
    for idea in ideas {
        let _ = writeln!(output, "- {idea}");
    }
    let _ = writeln!(output);
}

fn render_tags(output: &mut String, preview: &[TaggedTicket], counts: &[TagCount]) {
    if preview.is_empty() {
        let _ = writeln!(output, "No data to tag.");
        return;
    }

    let _ = writeln!(output, "### Example: Auto Ticket Tagging");
    let _ = writeln!(output);
    let _ = writeln!(output, "| Ticket No | Remarks | Auto Tag |");
    let _ = writeln!(output, "|---|---|---|");
    for ticket in preview {
        let _ = writeln!(
            output,
            "| {} | {} | {} |",
            label(ticket.ticket_no.as_deref()),
            cell(ticket.remarks.as_deref()),
            ticket.tag.label()
        );
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "Tag distribution:");
    for count in counts {
        let _ = writeln!(output, "- {}: {}", count.tag.label(), count.count);
    }
}

fn write_record_table(output: &mut String, records: &[TicketRecord]) {
    let _ = writeln!(
        output,
        "| # | Ticket No | Created | Resolved | Days | Issue | Program | Assigned To | Status | Sub Status | NPS | Remarks |"
    );
    let _ = writeln!(output, "|---:|---|---|---|---:|---|---|---|---|---|---:|---|");
    for record in records {
        let _ = writeln!(
            output,
            "| {} | {} | {} | {} | {} | {} | {} | {} | {} | {} | {} | {} |",
            record.row,
            label(record.ticket_no.as_deref()),
            timestamp(record.created_at),
            timestamp(record.resolved_at),
            record
                .resolution_days
                .map(|days| days.to_string())
                .unwrap_or_else(|| MISSING.to_string()),
            label(record.issue_type.as_deref()),
            label(record.program_name.as_deref()),
            label(record.assigned_to.as_deref()),
            label(record.status.as_deref()),
            label(record.sub_status.as_deref()),
            record
                .nps_rating
                .map(|rating| format!("{rating}"))
                .unwrap_or_else(|| MISSING.to_string()),
            cell(record.remarks.as_deref())
        );
    }
}

fn label(value: Option<&str>) -> String {
    value.map(escape).unwrap_or_else(|| MISSING.to_string())
}

fn cell(value: Option<&str>) -> String {
    value
        .map(|text| escape(&text.replace(['\r', '\n'], " ")))
        .unwrap_or_else(|| MISSING.to_string())
}

fn escape(value: &str) -> String {
    value.replace('|', "\\|")
}

fn decimal(value: Option<f64>) -> String {
    value
        .map(|value| format!("{value:.2}"))
        .unwrap_or_else(|| MISSING.to_string())
}

fn timestamp(value: Option<NaiveDateTime>) -> String {
    value
        .map(|value| value.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| MISSING.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DashboardConfig;
    use crate::dashboard::{build_view, View};
    use crate::models::fixtures::ticket;

    #[test]
    fn empty_views_render_no_data_notices() {
        let config = DashboardConfig::default();
        let rendered: Vec<String> = View::ALL
            .iter()
            .map(|view| render_view(&build_view(*view, &[], &config)))
            .collect();

        assert!(rendered[0].contains("No data to display based on current filters."));
        assert!(rendered[1].contains("No data to display."));
        assert!(rendered[2].contains("No remarks available for word cloud."));
        assert!(rendered[3].contains("Not enough data to generate a Sankey diagram."));
        assert!(rendered[4].contains("Not enough data to generate SLA Breach Heatmap."));
        assert!(rendered[5].contains("Count: 0"));
        assert!(rendered[6].contains("No records match the current filters."));
        assert!(rendered[7].contains("No data to tag."));
    }

    #[test]
    fn overview_lists_issue_rows() {
        let records = vec![ticket("T-1"), ticket("T-2")];
        let output = render_view(&build_view(View::Overview, &records, &DashboardConfig::default()));

        assert!(output.starts_with("## Overview"));
        assert!(output.contains("Displaying insights for 2 tickets."));
        assert!(output.contains("| Projects & Assignment Related Concern (NPS) | 2 | 7.00 | 2.00 |"));
    }

    #[test]
    fn overview_recommends_the_headline_issue() {
        let mut placement = ticket("T-3");
        placement.issue_type = Some("Placement".to_string());
        let mut other = ticket("T-4");
        other.issue_type = Some("Placement".to_string());
        other.nps_rating = Some(3.0);
        let records = vec![ticket("T-1"), placement, other];
        let output = render_view(&build_view(View::Overview, &records, &DashboardConfig::default()));

        assert!(output.contains("combining ticket volume (Frequency)"));
        assert!(output.contains("### Recommendation: The Single Biggest Fix"));
        assert!(output.contains("**'Placement'** is the most critical issue."));
        assert!(output.contains("average NPS 5.00 against 5.67 overall"));

        let empty = render_view(&build_view(View::Overview, &[], &DashboardConfig::default()));
        assert!(empty.contains("### Recommendation: The Single Biggest Fix"));
        assert!(empty.contains("Not enough data to recommend a fix."));
    }

    #[test]
    fn automation_view_lists_ideas_before_the_preview() {
        let output = render_view(&build_view(
            View::AutomationSuggestions,
            &[ticket("T-1")],
            &DashboardConfig::default(),
        ));

        let ideas = output.find("- Automated ticket tagging").unwrap();
        let preview = output.find("### Example: Auto Ticket Tagging").unwrap();
        assert!(ideas < preview);
        assert!(output.contains("- Automated escalation of pending tickets via chatbot integrations."));

        let empty = render_view(&build_view(View::AutomationSuggestions, &[], &DashboardConfig::default()));
        assert!(empty.contains("- Real-time SLA breach alerts"));
        assert!(empty.contains("No data to tag."));
    }

    #[test]
    fn record_table_numbers_rows_from_the_payload() {
        let mut records = vec![ticket("T-1"), ticket("T-2")];
        records[0].row = 7;
        records[1].row = 9;
        let output = render_view(&build_view(View::AllRecords, &records, &DashboardConfig::default()));

        assert!(output.contains("| 1 | T-1 |"));
        assert!(output.contains("| 2 | T-2 |"));
        assert!(!output.contains("| 9 |"));
    }

    #[test]
    fn report_includes_notice_and_every_view() {
        let config = DashboardConfig::default();
        let payloads: Vec<ViewPayload> = View::ALL
            .iter()
            .map(|view| build_view(*view, &[], &config))
            .collect();

        let report = build_report(Some("data file missing"), "all issues, all programs", &payloads);
        assert!(report.contains("> **Warning:** data file missing"));
        for view in View::ALL {
            assert!(report.contains(&format!("## {}", view.title())));
        }
    }

    #[test]
    fn table_cells_escape_pipes_and_newlines() {
        assert_eq!(cell(Some("a|b\nc")), "a\\|b c");
        assert_eq!(label(None), "-");
    }
}
