//! Data models for the operations dashboard.
//!
//! These models match the dashboard wire format exactly so the editing
//! workflow and the store agree on every field name.

mod report;

pub use report::*;
