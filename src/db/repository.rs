//! Database repository for report documents.
//!
//! Every save is a wholesale replacement of the stored document; the
//! repository never merges or patches.

use chrono::Utc;
use sqlx::{Row, SqlitePool};

use crate::errors::AppError;
use crate::models::{ReportDates, ReportDocument, ReportDomain, RowFields};

/// Database repository for all data operations.
#[derive(Clone)]
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Get the stored document for a domain, or `None` if it has never been saved.
    pub async fn get_report(
        &self,
        domain: ReportDomain,
    ) -> Result<Option<ReportDocument>, AppError> {
        let row = sqlx::query(
            "SELECT report_title, start_date, end_date, columns, rows, total_space_used, updated_at \
             FROM reports WHERE domain = ?",
        )
        .bind(domain.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|row| report_from_row(&row)).transpose()
    }

    /// Replace the stored document for a domain wholesale. The previous
    /// content is discarded entirely; `updated_at` is assigned here.
    pub async fn save_report(
        &self,
        domain: ReportDomain,
        payload: &ReportDocument,
    ) -> Result<ReportDocument, AppError> {
        let now = Utc::now().to_rfc3339();
        let columns_json = serde_json::to_string(&payload.columns)?;
        let rows_json = serde_json::to_string(&payload.rows)?;

        // Backup reports never carry a total-space summary.
        let total_space_used = match domain {
            ReportDomain::Cloud => payload.total_space_used.clone(),
            ReportDomain::Backup => None,
        };

        sqlx::query(
            r#"
            INSERT INTO reports (domain, report_title, start_date, end_date, columns, rows, total_space_used, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(domain) DO UPDATE SET
                report_title = excluded.report_title,
                start_date = excluded.start_date,
                end_date = excluded.end_date,
                columns = excluded.columns,
                rows = excluded.rows,
                total_space_used = excluded.total_space_used,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(domain.as_str())
        .bind(&payload.report_title)
        .bind(&payload.report_dates.start_date)
        .bind(&payload.report_dates.end_date)
        .bind(&columns_json)
        .bind(&rows_json)
        .bind(&total_space_used)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        Ok(ReportDocument {
            report_title: payload.report_title.clone(),
            report_dates: payload.report_dates.clone(),
            columns: payload.columns.clone(),
            rows: payload.rows.clone(),
            total_space_used,
            updated_at: Some(now),
        })
    }
}

fn report_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<ReportDocument, AppError> {
    let columns_json: String = row.get("columns");
    let rows_json: String = row.get("rows");

    let columns: Vec<String> = serde_json::from_str(&columns_json)
        .map_err(|e| AppError::Internal(format!("Corrupt columns payload: {}", e)))?;
    let rows: Vec<RowFields> = serde_json::from_str(&rows_json)
        .map_err(|e| AppError::Internal(format!("Corrupt rows payload: {}", e)))?;

    Ok(ReportDocument {
        report_title: row.get("report_title"),
        report_dates: ReportDates {
            start_date: row.get("start_date"),
            end_date: row.get("end_date"),
        },
        columns,
        rows,
        total_space_used: row.get("total_space_used"),
        updated_at: Some(row.get("updated_at")),
    })
}
