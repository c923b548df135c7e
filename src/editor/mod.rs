//! Dual-table editing workflow.
//!
//! `TableModel` holds one report in memory and owns the column/row mutation
//! rules; `EditorSession` pairs the two tables with a single dirty flag and
//! the manual save/refresh/print orchestration.

mod session;
mod table;

pub use session::*;
pub use table::*;
