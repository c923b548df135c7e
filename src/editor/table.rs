//! In-memory editing model for one report table.
//!
//! The model mirrors the persisted document plus an ephemeral client id per
//! row. `columns` is the single source of truth for iteration order; every
//! mutation keeps each row's key set consistent with it.

use chrono::Utc;
use uuid::Uuid;

use crate::models::{ReportDates, ReportDocument, ReportDomain, RowFields};

/// Validation failures for table mutations. All are rejected locally, before
/// any network call, and leave the model unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditError {
    /// Column name was empty or whitespace-only
    EmptyColumnName,
    /// Column with that name already exists
    DuplicateColumn(String),
    /// The last remaining column cannot be removed
    LastColumn,
    /// Row index is out of range
    RowOutOfRange(usize),
    /// Column index is out of range
    ColumnOutOfRange(usize),
}

impl std::fmt::Display for EditError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EditError::EmptyColumnName => write!(f, "Please enter a valid column name"),
            EditError::DuplicateColumn(name) => write!(f, "Column \"{}\" already exists", name),
            EditError::LastColumn => write!(f, "Cannot remove the last column"),
            EditError::RowOutOfRange(index) => write!(f, "Row index {} is out of range", index),
            EditError::ColumnOutOfRange(index) => {
                write!(f, "Column index {} is out of range", index)
            }
        }
    }
}

impl std::error::Error for EditError {}

/// One editable row: persisted fields plus a client-generated identifier used
/// only for list identity. The id never reaches the store.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientRow {
    id: String,
    fields: RowFields,
}

impl ClientRow {
    fn new(fields: RowFields) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            fields,
        }
    }

    fn empty(columns: &[String]) -> Self {
        let fields = columns
            .iter()
            .map(|c| (c.clone(), String::new()))
            .collect();
        Self::new(fields)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields.get(column).map(String::as_str)
    }

    pub fn fields(&self) -> &RowFields {
        &self.fields
    }
}

/// Editing-time representation of one report document.
#[derive(Debug, Clone, PartialEq)]
pub struct TableModel {
    domain: ReportDomain,
    pub report_title: String,
    pub report_dates: ReportDates,
    columns: Vec<String>,
    rows: Vec<ClientRow>,
    pub total_space_used: Option<String>,
}

impl TableModel {
    /// Fresh model with the domain defaults and no rows.
    pub fn with_defaults(domain: ReportDomain) -> Self {
        Self {
            domain,
            report_title: domain.default_title().to_string(),
            report_dates: ReportDates::today(),
            columns: domain.default_columns(),
            rows: Vec::new(),
            total_space_used: match domain {
                ReportDomain::Cloud => Some(String::new()),
                ReportDomain::Backup => None,
            },
        }
    }

    pub fn domain(&self) -> ReportDomain {
        self.domain
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[ClientRow] {
        &self.rows
    }

    /// Replace all fields from a freshly fetched document. Rows are
    /// back-filled so every declared column has a value, and each row gets a
    /// fresh client id. Missing title/columns/dates fall back to defaults.
    pub fn load(&mut self, doc: ReportDocument) {
        self.report_title = if doc.report_title.trim().is_empty() {
            self.domain.default_title().to_string()
        } else {
            doc.report_title
        };

        self.report_dates = ReportDates {
            start_date: normalize_date(&doc.report_dates.start_date),
            end_date: normalize_date(&doc.report_dates.end_date),
        };

        self.columns = if doc.columns.is_empty() {
            self.domain.default_columns()
        } else {
            doc.columns
        };

        self.rows = doc
            .rows
            .into_iter()
            .map(|mut fields| {
                for column in &self.columns {
                    fields.entry(column.clone()).or_default();
                }
                ClientRow::new(fields)
            })
            .collect();

        self.total_space_used = match self.domain {
            ReportDomain::Cloud => Some(doc.total_space_used.unwrap_or_default()),
            ReportDomain::Backup => None,
        };
    }

    /// Document-shaped payload for saving: client ids stripped, everything
    /// else passed through unchanged, no `updatedAt`.
    pub fn serialize(&self) -> ReportDocument {
        ReportDocument {
            report_title: self.report_title.clone(),
            report_dates: self.report_dates.clone(),
            columns: self.columns.clone(),
            rows: self.rows.iter().map(|row| row.fields.clone()).collect(),
            total_space_used: self.total_space_used.clone(),
            updated_at: None,
        }
    }

    /// Append a column and give every existing row an empty value for it.
    pub fn add_column(&mut self, name: &str) -> Result<(), EditError> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(EditError::EmptyColumnName);
        }
        if self.columns.iter().any(|c| c == trimmed) {
            return Err(EditError::DuplicateColumn(trimmed.to_string()));
        }

        self.columns.push(trimmed.to_string());
        for row in &mut self.rows {
            row.fields.insert(trimmed.to_string(), String::new());
        }
        Ok(())
    }

    /// Remove a column and delete its key from every row (removed, not
    /// blanked). The last remaining column is protected.
    pub fn remove_column(&mut self, index: usize) -> Result<(), EditError> {
        if self.columns.len() <= 1 {
            return Err(EditError::LastColumn);
        }
        if index >= self.columns.len() {
            return Err(EditError::ColumnOutOfRange(index));
        }

        let removed = self.columns.remove(index);
        for row in &mut self.rows {
            row.fields.remove(&removed);
        }
        Ok(())
    }

    /// Move the column at `from` to position `to`; row data is untouched
    /// since column order is display metadata only. Equal indices are a
    /// no-op.
    pub fn reorder_column(&mut self, from: usize, to: usize) -> Result<(), EditError> {
        if from >= self.columns.len() {
            return Err(EditError::ColumnOutOfRange(from));
        }
        if to >= self.columns.len() {
            return Err(EditError::ColumnOutOfRange(to));
        }
        if from == to {
            return Ok(());
        }

        let column = self.columns.remove(from);
        self.columns.insert(to, column);
        Ok(())
    }

    /// Append a new row whose keys are exactly `columns`, all empty. Returns
    /// the new row's client id.
    pub fn add_row(&mut self) -> String {
        let row = ClientRow::empty(&self.columns);
        let id = row.id.clone();
        self.rows.push(row);
        id
    }

    /// Delete a row entirely.
    pub fn remove_row(&mut self, index: usize) -> Result<(), EditError> {
        if index >= self.rows.len() {
            return Err(EditError::RowOutOfRange(index));
        }
        self.rows.remove(index);
        Ok(())
    }

    /// Set one cell. Any string is accepted, status columns included — the
    /// dropdowns restrict input at the UI layer, not here. An out-of-range
    /// row index is logged and ignored; returns whether the edit applied.
    pub fn set_cell(&mut self, row_index: usize, column: &str, value: &str) -> bool {
        let Some(row) = self.rows.get_mut(row_index) else {
            tracing::warn!(
                domain = self.domain.as_str(),
                row_index,
                column,
                "cell edit ignored: row index out of range"
            );
            return false;
        };
        row.fields.insert(column.to_string(), value.to_string());
        true
    }
}

/// Dates arrive as ISO date strings, sometimes with a time component from
/// older saves. Keep the date part; empty means today.
fn normalize_date(value: &str) -> String {
    let date_part = value.split('T').next().unwrap_or("");
    if date_part.is_empty() {
        Utc::now().date_naive().to_string()
    } else {
        date_part.to_string()
    }
}
