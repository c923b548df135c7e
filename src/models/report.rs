//! Report document model matching the dashboard wire format.

use std::collections::BTreeMap;

use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Weekday column names shared by both report domains.
pub const WEEKDAYS: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

/// One of the two independent report types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReportDomain {
    Cloud,
    Backup,
}

impl ReportDomain {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportDomain::Cloud => "cloud",
            ReportDomain::Backup => "backup",
        }
    }

    /// Title used when the store has never been saved.
    pub fn default_title(&self) -> &'static str {
        match self {
            ReportDomain::Cloud => "Cloud Status Report",
            ReportDomain::Backup => "Backup Server Cronjob Status",
        }
    }

    /// Column set used when the store has never been saved. Order is the
    /// display order and is persisted independently afterwards.
    pub fn default_columns(&self) -> Vec<String> {
        let mut columns: Vec<String> = vec!["Server".to_string()];
        columns.push(
            match self {
                ReportDomain::Cloud => "Status",
                ReportDomain::Backup => "SERVER STATUS",
            }
            .to_string(),
        );
        columns.extend(WEEKDAYS.iter().map(|d| d.to_string()));
        if let ReportDomain::Cloud = self {
            columns.push("SSL Expiry".to_string());
            columns.push("Space Used".to_string());
        }
        columns.push("Remarks".to_string());
        columns
    }

    /// REST path the document is fetched from.
    pub fn data_path(&self) -> &'static str {
        match self {
            ReportDomain::Cloud => "/api/cloud-report/data",
            ReportDomain::Backup => "/api/backup-server/data",
        }
    }

    /// REST path the document is saved to.
    pub fn save_path(&self) -> &'static str {
        match self {
            ReportDomain::Cloud => "/api/cloud-report/save",
            ReportDomain::Backup => "/api/backup-server/save",
        }
    }
}

impl std::fmt::Display for ReportDomain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Calendar range a report covers, as plain ISO date strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportDates {
    #[serde(default)]
    pub start_date: String,
    #[serde(default)]
    pub end_date: String,
}

impl ReportDates {
    /// Today's date for both ends, the default for a never-saved report.
    pub fn today() -> Self {
        let today = Utc::now().date_naive().to_string();
        Self {
            start_date: today.clone(),
            end_date: today,
        }
    }
}

/// A single row: column name to string value. Values are deliberately
/// permissive — status columns carry a conventional vocabulary but the model
/// never rejects other strings.
pub type RowFields = BTreeMap<String, String>;

/// The persisted record for one domain. Saves replace it wholesale; there is
/// no partial patch and no delete.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportDocument {
    pub report_title: String,
    #[serde(default)]
    pub report_dates: ReportDates,
    #[serde(default)]
    pub columns: Vec<String>,
    #[serde(default)]
    pub rows: Vec<RowFields>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_space_used: Option<String>,
    /// Server-assigned on save; absent in save payloads.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl ReportDocument {
    /// Document returned by `GET /data` when the domain has never been saved.
    pub fn default_for(domain: ReportDomain) -> Self {
        Self {
            report_title: domain.default_title().to_string(),
            report_dates: ReportDates::today(),
            columns: domain.default_columns(),
            rows: Vec::new(),
            total_space_used: match domain {
                ReportDomain::Cloud => Some(String::new()),
                ReportDomain::Backup => None,
            },
            updated_at: Some(Utc::now().to_rfc3339()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_cloud_columns() {
        let columns = ReportDomain::Cloud.default_columns();
        assert_eq!(
            columns,
            vec![
                "Server",
                "Status",
                "Monday",
                "Tuesday",
                "Wednesday",
                "Thursday",
                "Friday",
                "Saturday",
                "Sunday",
                "SSL Expiry",
                "Space Used",
                "Remarks",
            ]
        );
    }

    #[test]
    fn default_backup_columns() {
        let columns = ReportDomain::Backup.default_columns();
        assert_eq!(columns[0], "Server");
        assert_eq!(columns[1], "SERVER STATUS");
        assert_eq!(columns.last().unwrap(), "Remarks");
        assert_eq!(columns.len(), 10);
    }

    #[test]
    fn save_payload_omits_updated_at() {
        let mut doc = ReportDocument::default_for(ReportDomain::Backup);
        doc.updated_at = None;
        let json = serde_json::to_value(&doc).unwrap();
        assert!(json.get("updatedAt").is_none());
        assert!(json.get("totalSpaceUsed").is_none());
        assert_eq!(json["reportTitle"], "Backup Server Cronjob Status");
    }
}
