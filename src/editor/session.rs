//! Editing session: both tables, one dirty flag, manual save orchestration.
//!
//! Nothing is persisted automatically. Every mutation raises the session-wide
//! dirty flag and only an explicit `save` (or a print request while dirty)
//! sends anything to the store.

use crate::client::{ReportStore, StoreError};
use crate::models::{ReportDates, ReportDomain, ReportDocument};
use crate::render;

use super::table::{EditError, TableModel};

/// One editing session over both report tables.
///
/// The dirty flag is session-wide, not per-domain: the two tables are always
/// saved together, so a single flag is what the save button reflects.
#[derive(Debug)]
pub struct EditorSession {
    cloud: TableModel,
    backup: TableModel,
    dirty: bool,
}

impl Default for EditorSession {
    fn default() -> Self {
        Self::new()
    }
}

impl EditorSession {
    /// Session with the per-domain defaults, clean.
    pub fn new() -> Self {
        Self {
            cloud: TableModel::with_defaults(ReportDomain::Cloud),
            backup: TableModel::with_defaults(ReportDomain::Backup),
            dirty: false,
        }
    }

    pub fn table(&self, domain: ReportDomain) -> &TableModel {
        match domain {
            ReportDomain::Cloud => &self.cloud,
            ReportDomain::Backup => &self.backup,
        }
    }

    fn table_mut(&mut self, domain: ReportDomain) -> &mut TableModel {
        match domain {
            ReportDomain::Cloud => &mut self.cloud,
            ReportDomain::Backup => &mut self.backup,
        }
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    // ==================== MUTATIONS ====================
    //
    // Each wrapper delegates to the table model and raises the dirty flag
    // only when the mutation actually applied.

    pub fn add_column(&mut self, domain: ReportDomain, name: &str) -> Result<(), EditError> {
        self.table_mut(domain).add_column(name)?;
        self.dirty = true;
        Ok(())
    }

    pub fn remove_column(&mut self, domain: ReportDomain, index: usize) -> Result<(), EditError> {
        self.table_mut(domain).remove_column(index)?;
        self.dirty = true;
        Ok(())
    }

    pub fn reorder_column(
        &mut self,
        domain: ReportDomain,
        from: usize,
        to: usize,
    ) -> Result<(), EditError> {
        // Dropping a column on itself is a no-op, not an edit.
        if from == to {
            return Ok(());
        }
        self.table_mut(domain).reorder_column(from, to)?;
        self.dirty = true;
        Ok(())
    }

    pub fn add_row(&mut self, domain: ReportDomain) -> String {
        let id = self.table_mut(domain).add_row();
        self.dirty = true;
        id
    }

    pub fn remove_row(&mut self, domain: ReportDomain, index: usize) -> Result<(), EditError> {
        self.table_mut(domain).remove_row(index)?;
        self.dirty = true;
        Ok(())
    }

    pub fn set_cell(&mut self, domain: ReportDomain, row_index: usize, column: &str, value: &str) {
        if self.table_mut(domain).set_cell(row_index, column, value) {
            self.dirty = true;
        }
    }

    pub fn set_report_title(&mut self, domain: ReportDomain, title: &str) {
        self.table_mut(domain).report_title = title.to_string();
        self.dirty = true;
    }

    pub fn set_report_dates(&mut self, domain: ReportDomain, dates: ReportDates) {
        self.table_mut(domain).report_dates = dates;
        self.dirty = true;
    }

    pub fn set_total_space_used(&mut self, value: &str) {
        self.cloud.total_space_used = Some(value.to_string());
        self.dirty = true;
    }

    // ==================== STORE ORCHESTRATION ====================

    /// Fetch both documents concurrently and replace the models, clearing the
    /// dirty flag. On any failure the models are left exactly as they were.
    pub async fn refresh<S: ReportStore>(&mut self, store: &S) -> Result<(), StoreError> {
        let (cloud, backup) = tokio::join!(
            store.fetch(ReportDomain::Cloud),
            store.fetch(ReportDomain::Backup)
        );
        let (cloud, backup) = (cloud?, backup?);

        self.cloud.load(cloud);
        self.backup.load(backup);
        self.dirty = false;
        Ok(())
    }

    /// Save both tables: two independent writes issued concurrently and
    /// joined. There is no cross-document transaction — one domain's write is
    /// not rolled back when the other fails, so a failure can leave the store
    /// half-updated. The dirty flag clears only when both writes land; a
    /// follow-up refresh picks up the server-assigned timestamps (best
    /// effort, logged on failure).
    pub async fn save<S: ReportStore>(&mut self, store: &S) -> Result<(), StoreError> {
        let cloud_payload = self.cloud.serialize();
        let backup_payload = self.backup.serialize();

        let (cloud_result, backup_result) = tokio::join!(
            store.save(ReportDomain::Cloud, &cloud_payload),
            store.save(ReportDomain::Backup, &backup_payload)
        );
        cloud_result?;
        backup_result?;

        self.dirty = false;

        if let Err(e) = self.refresh(store).await {
            tracing::warn!("post-save refresh failed: {}", e);
        }
        Ok(())
    }

    /// Render the printable report. Unsaved edits force a save first;
    /// rendering proceeds only if it succeeds.
    pub async fn print_preview<S: ReportStore>(&mut self, store: &S) -> Result<String, StoreError> {
        if self.dirty {
            self.save(store).await?;
        }
        let cloud = self.cloud.serialize();
        let backup = self.backup.serialize();
        Ok(render::render_report(&cloud, &backup))
    }

    /// Documents for rendering or inspection without touching the store.
    pub fn documents(&self) -> (ReportDocument, ReportDocument) {
        (self.cloud.serialize(), self.backup.serialize())
    }
}
