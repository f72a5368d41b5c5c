//! Settlement payload written to the settlement store.
use serde::{Deserialize, Serialize};

/// Column values of a settlement row before the store assigns its id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettlementDraft {
    pub year: i32,
    pub month: u32,
    pub base_salary: f64,
    pub target_days: u32,
    pub worked_days: u32,
    pub amount: f64,
    /// RFC 3339 timestamp
    pub settled_at: String,
}
