//! Report document endpoints.
//!
//! Each domain exposes exactly two operations: fetch the whole document and
//! replace it wholesale. There is no partial patch and no delete.

use axum::{extract::State, Json};

use super::{success, ApiResult};
use crate::errors::AppError;
use crate::models::{ReportDocument, ReportDomain};
use crate::AppState;

/// GET /api/cloud-report/data - Fetch the cloud report document.
pub async fn get_cloud_report(State(state): State<AppState>) -> ApiResult<ReportDocument> {
    get_report(state, ReportDomain::Cloud).await
}

/// POST /api/cloud-report/save - Replace the cloud report document.
pub async fn save_cloud_report(
    State(state): State<AppState>,
    Json(payload): Json<ReportDocument>,
) -> ApiResult<ReportDocument> {
    save_report(state, ReportDomain::Cloud, payload).await
}

/// GET /api/backup-server/data - Fetch the backup server report document.
pub async fn get_backup_report(State(state): State<AppState>) -> ApiResult<ReportDocument> {
    get_report(state, ReportDomain::Backup).await
}

/// POST /api/backup-server/save - Replace the backup server report document.
pub async fn save_backup_report(
    State(state): State<AppState>,
    Json(payload): Json<ReportDocument>,
) -> ApiResult<ReportDocument> {
    save_report(state, ReportDomain::Backup, payload).await
}

async fn get_report(state: AppState, domain: ReportDomain) -> ApiResult<ReportDocument> {
    let doc = match state.repo.get_report(domain).await? {
        Some(doc) => doc,
        // Never saved: answer with the per-domain defaults.
        None => ReportDocument::default_for(domain),
    };
    success(doc)
}

async fn save_report(
    state: AppState,
    domain: ReportDomain,
    payload: ReportDocument,
) -> ApiResult<ReportDocument> {
    validate_columns(&payload.columns)?;

    let saved = state.repo.save_report(domain, &payload).await?;
    tracing::info!(
        domain = domain.as_str(),
        rows = saved.rows.len(),
        "report saved"
    );
    success(saved)
}

/// A document without columns (or with ambiguous ones) cannot be rendered or
/// edited, so reject it before it replaces the stored copy.
fn validate_columns(columns: &[String]) -> Result<(), AppError> {
    if columns.is_empty() {
        return Err(AppError::Validation(
            "At least one column is required".to_string(),
        ));
    }
    for (i, name) in columns.iter().enumerate() {
        if name.trim().is_empty() {
            return Err(AppError::Validation(
                "Column names must not be empty".to_string(),
            ));
        }
        if columns[..i].contains(name) {
            return Err(AppError::Validation(format!(
                "Duplicate column name: {}",
                name
            )));
        }
    }
    Ok(())
}
