//! # Storage Traits
//!
//! Storage abstractions used by the domain layer. Local device state (marks
//! and payroll settings) and the remote settlement table sit behind separate
//! traits so that either side can be replaced in tests.

use anyhow::Result;
use async_trait::async_trait;
use shared::{Marks, PayrollConfig, Settlement};

use crate::backend::domain::models::SettlementDraft;

/// Whole-map persistence of attendance marks
pub trait MarksStorage: Send + Sync {
    /// Load the last persisted marks.
    ///
    /// A missing or unreadable slot yields an empty map instead of an error.
    fn load_marks(&self) -> Marks;

    /// Replace the persisted marks with `marks`
    fn save_marks(&self, marks: &Marks) -> Result<()>;
}

/// Persistence of the user's payroll settings
pub trait PayrollConfigStorage: Send + Sync {
    /// Load the settings, falling back to defaults for missing or invalid slots
    fn load_payroll_config(&self) -> PayrollConfig;

    fn save_payroll_config(&self, config: &PayrollConfig) -> Result<()>;
}

/// Finalized monthly settlements, unique per (year, month)
#[async_trait]
pub trait SettlementStorage: Send + Sync {
    /// Insert the settlement or overwrite the existing row for the same (year, month)
    async fn upsert_settlement(&self, draft: &SettlementDraft) -> Result<Settlement>;

    /// Settlements of `year`, ordered by month ascending
    async fn list_settlements(&self, year: i32) -> Result<Vec<Settlement>>;
}
