//! Print/export renderer.
//!
//! Maps the two report documents into a standalone, printable HTML document.
//! The renderer is a pure function of its inputs plus an injectable
//! "generated at" timestamp; it never consults live application state.
//!
//! Status vocabularies are modeled as enums here, at the color-mapping
//! boundary only. The documents themselves keep plain strings, so values the
//! dropdowns never offer still round-trip untouched and render as plain
//! badges.

use chrono::{DateTime, NaiveDate, Utc};

use crate::models::{ReportDocument, ReportDomain, WEEKDAYS};

/// Colors for one status badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusStyle {
    pub background: &'static str,
    pub text: &'static str,
    pub border: &'static str,
}

const GREEN: StatusStyle = StatusStyle {
    background: "#10b981",
    text: "#ffffff",
    border: "#059669",
};
const AMBER: StatusStyle = StatusStyle {
    background: "#f59e0b",
    text: "#000000",
    border: "#d97706",
};
const RED: StatusStyle = StatusStyle {
    background: "#ef4444",
    text: "#ffffff",
    border: "#dc2626",
};
const BLUE: StatusStyle = StatusStyle {
    background: "#3b82f6",
    text: "#ffffff",
    border: "#2563eb",
};
const GRAY: StatusStyle = StatusStyle {
    background: "#6b7280",
    text: "#ffffff",
    border: "#4b5563",
};
const PLAIN: StatusStyle = StatusStyle {
    background: "#ffffff",
    text: "#000000",
    border: "#cccccc",
};

/// Vocabulary of the cloud "Status" column and cloud weekday columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloudStatus {
    Automatic,
    Manual,
    Failed,
    InProgress,
    Online,
    Maintenance,
    Offline,
    NotApplicable,
}

impl CloudStatus {
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_uppercase().as_str() {
            "AUTOMATIC" => Some(CloudStatus::Automatic),
            "MANUAL" => Some(CloudStatus::Manual),
            "FAILED" => Some(CloudStatus::Failed),
            "IN PROGRESS" => Some(CloudStatus::InProgress),
            "ONLINE" => Some(CloudStatus::Online),
            "MAINTENANCE" => Some(CloudStatus::Maintenance),
            "OFFLINE" => Some(CloudStatus::Offline),
            "N/A" => Some(CloudStatus::NotApplicable),
            _ => None,
        }
    }

    pub fn style(&self) -> StatusStyle {
        match self {
            CloudStatus::Automatic | CloudStatus::Online => GREEN,
            CloudStatus::Manual | CloudStatus::Maintenance => AMBER,
            CloudStatus::Failed | CloudStatus::Offline => RED,
            CloudStatus::InProgress => BLUE,
            CloudStatus::NotApplicable => GRAY,
        }
    }
}

/// Vocabulary of the backup "SERVER STATUS" column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerStatus {
    Online,
    Offline,
}

impl ServerStatus {
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_uppercase().as_str() {
            "ONLINE" => Some(ServerStatus::Online),
            "OFFLINE" => Some(ServerStatus::Offline),
            _ => None,
        }
    }

    pub fn style(&self) -> StatusStyle {
        match self {
            ServerStatus::Online => GREEN,
            ServerStatus::Offline => RED,
        }
    }
}

/// Vocabulary of backup weekday columns (cronjob outcomes).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CronStatus {
    Running,
    NotRunning,
    NotApplicable,
}

impl CronStatus {
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_uppercase().as_str() {
            "RUNNING" => Some(CronStatus::Running),
            "NOT RUNNING" => Some(CronStatus::NotRunning),
            "N/A" => Some(CronStatus::NotApplicable),
            _ => None,
        }
    }

    pub fn style(&self) -> StatusStyle {
        match self {
            CronStatus::Running => GREEN,
            CronStatus::NotRunning => RED,
            CronStatus::NotApplicable => GRAY,
        }
    }
}

/// How a cell is interpreted, driven by the column name. Interpretation only:
/// the model stores any string regardless of kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellKind {
    /// Cloud status vocabulary (the "Status" column and cloud weekdays)
    CloudStatus,
    /// Backup "SERVER STATUS" column
    ServerStatus,
    /// Backup weekday columns
    CronStatus,
    /// "SSL Expiry" column
    Date,
    /// Any column whose name contains "remark"
    Remarks,
    /// Everything else
    Text,
}

/// Classify a column name for one domain. `columns` stays the single source
/// of truth for iteration order; this only decides presentation.
pub fn classify_column(domain: ReportDomain, column: &str) -> CellKind {
    let is_weekday = WEEKDAYS.contains(&column);
    match domain {
        ReportDomain::Cloud => {
            if column == "Status" || is_weekday {
                CellKind::CloudStatus
            } else if column == "SSL Expiry" {
                CellKind::Date
            } else if column.to_lowercase().contains("remark") {
                CellKind::Remarks
            } else {
                CellKind::Text
            }
        }
        ReportDomain::Backup => {
            if column == "SERVER STATUS" {
                CellKind::ServerStatus
            } else if is_weekday {
                CellKind::CronStatus
            } else if column.to_lowercase().contains("remark") {
                CellKind::Remarks
            } else {
                CellKind::Text
            }
        }
    }
}

/// Style for a status cell value; unrecognized values render as plain badges.
fn status_style(kind: CellKind, value: &str) -> StatusStyle {
    match kind {
        CellKind::CloudStatus => CloudStatus::parse(value)
            .map(|s| s.style())
            .unwrap_or(PLAIN),
        CellKind::ServerStatus => ServerStatus::parse(value)
            .map(|s| s.style())
            .unwrap_or(PLAIN),
        CellKind::CronStatus => CronStatus::parse(value)
            .map(|s| s.style())
            .unwrap_or(PLAIN),
        _ => PLAIN,
    }
}

/// Minimal HTML escaping for text that lands in element content or
/// double-quoted attribute values.
fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Format an ISO date for the report header ("January 5, 2025"). Unparseable
/// input is shown as-is.
fn format_date(value: &str) -> String {
    match NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        Ok(date) => date.format("%B %-d, %Y").to_string(),
        Err(_) => value.to_string(),
    }
}

fn render_badge(value: &str, style: StatusStyle, min_width: u32) -> String {
    let shown = if value.is_empty() { "N/A" } else { value };
    format!(
        "<span style=\"background-color: {}; color: {}; border: 2px solid {}; \
         padding: 6px 10px; border-radius: 8px; font-weight: bold; font-size: 11px; \
         display: inline-block; min-width: {}px;\">{}</span>",
        style.background,
        style.text,
        style.border,
        min_width,
        escape_html(shown)
    )
}

fn render_cell(domain: ReportDomain, column: &str, value: &str) -> String {
    match classify_column(domain, column) {
        kind @ CellKind::CloudStatus => {
            let badge = render_badge(value, status_style(kind, value), 90);
            format!("<td style=\"text-align: center; padding: 8px 4px;\">{}</td>", badge)
        }
        kind @ CellKind::ServerStatus => {
            let badge = render_badge(value, status_style(kind, value), 80);
            format!("<td style=\"text-align: center; padding: 8px 4px;\">{}</td>", badge)
        }
        kind @ CellKind::CronStatus => {
            let badge = render_badge(value, status_style(kind, value), 80);
            format!("<td style=\"text-align: center; padding: 8px 4px;\">{}</td>", badge)
        }
        CellKind::Date => format!(
            "<td style=\"padding: 8px 4px; text-align: left;\">{}</td>",
            escape_html(&format_date(value))
        ),
        CellKind::Remarks | CellKind::Text => format!(
            "<td style=\"padding: 8px 4px; text-align: left;\">{}</td>",
            escape_html(value)
        ),
    }
}

fn render_table(domain: ReportDomain, doc: &ReportDocument) -> String {
    let mut html = String::new();
    html.push_str("<table class=\"report-table\">\n<thead>\n<tr>");
    for column in &doc.columns {
        html.push_str(&format!("<th>{}</th>", escape_html(column)));
    }
    html.push_str("</tr>\n</thead>\n<tbody>\n");
    for row in &doc.rows {
        html.push_str("<tr>");
        for column in &doc.columns {
            let value = row.get(column).map(String::as_str).unwrap_or("");
            html.push_str(&render_cell(domain, column, value));
        }
        html.push_str("</tr>\n");
    }
    html.push_str("</tbody>\n</table>\n");
    html
}

const REPORT_CSS: &str = r#"
body { font-family: Arial, sans-serif; margin: 0; padding: 20px; color: #000; background: #fff; line-height: 1.4; }
.report-header { text-align: center; margin-bottom: 30px; border-bottom: 3px solid #000; padding-bottom: 20px; }
.report-title { font-size: 32px; font-weight: bold; margin-bottom: 12px; color: #000; }
.report-subtitle { font-size: 20px; margin-bottom: 8px; color: #333; font-weight: 600; }
.report-date { font-size: 14px; margin-bottom: 5px; color: #666; font-style: italic; }
.total-space { font-size: 16px; margin-top: 10px; font-weight: bold; color: #2563eb; background: #eff6ff; padding: 8px 16px; border-radius: 8px; display: inline-block; }
.section-header { font-size: 22px; font-weight: bold; margin: 40px 0 20px 0; padding: 12px 16px; background: #e5e7eb; border-left: 6px solid #2563eb; border-radius: 8px; }
.report-table { width: 100%; border-collapse: collapse; margin-bottom: 40px; font-size: 11px; }
.report-table th, .report-table td { border: 1px solid #d1d5db; padding: 10px 6px; text-align: left; vertical-align: middle; }
.report-table th { background: #1f2937; color: white; font-weight: bold; text-transform: uppercase; font-size: 10px; letter-spacing: 0.5px; text-align: center; }
.report-table tbody tr:nth-child(even) { background-color: #f9fafb; }
.report-footer { text-align: center; margin-top: 40px; font-size: 12px; color: #666; border-top: 2px solid #e5e7eb; padding: 20px; background: #f9fafb; border-radius: 8px; }
@page { size: A4 landscape; margin: 15mm; }
@media print { body { margin: 0; } .report-table { page-break-inside: avoid; } .section-header { page-break-after: avoid; } }
"#;

/// Render the two documents into a standalone printable HTML page using the
/// current wall-clock time as the "generated at" stamp.
pub fn render_report(cloud: &ReportDocument, backup: &ReportDocument) -> String {
    render_report_at(cloud, backup, Utc::now())
}

/// Render with an explicit "generated at" timestamp. Output is byte-identical
/// for identical inputs.
pub fn render_report_at(
    cloud: &ReportDocument,
    backup: &ReportDocument,
    generated_at: DateTime<Utc>,
) -> String {
    let cloud_title = escape_html(&cloud.report_title);
    let backup_title = escape_html(&backup.report_title);

    let mut html = String::new();
    html.push_str("<!DOCTYPE html>\n<html>\n<head>\n");
    html.push_str("<title>Cloud Infrastructure Status Report</title>\n");
    html.push_str("<style>");
    html.push_str(REPORT_CSS);
    html.push_str("</style>\n</head>\n<body>\n");

    html.push_str("<div class=\"report-header\">\n");
    html.push_str("<div class=\"report-title\">Cloud Infrastructure Status Report</div>\n");
    html.push_str(&format!("<div class=\"report-subtitle\">{}</div>\n", cloud_title));
    html.push_str(&format!("<div class=\"report-subtitle\">{}</div>\n", backup_title));
    html.push_str(&format!(
        "<div class=\"report-date\">Cloud Services: {} - {}</div>\n",
        escape_html(&format_date(&cloud.report_dates.start_date)),
        escape_html(&format_date(&cloud.report_dates.end_date))
    ));
    html.push_str(&format!(
        "<div class=\"report-date\">Backup Servers: {} - {}</div>\n",
        escape_html(&format_date(&backup.report_dates.start_date)),
        escape_html(&format_date(&backup.report_dates.end_date))
    ));
    if let Some(total) = cloud.total_space_used.as_deref().filter(|t| !t.is_empty()) {
        html.push_str(&format!(
            "<div class=\"total-space\">Total Space Used: {}</div>\n",
            escape_html(total)
        ));
    }
    html.push_str("</div>\n");

    html.push_str(&format!("<div class=\"section-header\">{}</div>\n", cloud_title));
    html.push_str(&render_table(ReportDomain::Cloud, cloud));

    html.push_str(&format!("<div class=\"section-header\">{}</div>\n", backup_title));
    html.push_str(&render_table(ReportDomain::Backup, backup));

    html.push_str("<div class=\"report-footer\">\n");
    html.push_str(&format!(
        "<p><strong>Generated on:</strong> {}</p>\n",
        generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    html.push_str(&format!(
        "<p><strong>Summary:</strong> Cloud Services: {} | Backup Servers: {}</p>\n",
        cloud.rows.len(),
        backup.rows.len()
    ));
    html.push_str("</div>\n</body>\n</html>\n");
    html
}
