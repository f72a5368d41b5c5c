//! # Storage Module
//!
//! Handles all data persistence for the wall calendar.
//!
//! - **json**: device-local slots in the data directory (attendance marks,
//!   payroll settings)
//! - **remote**: the hosted settlement table, reached over HTTP
//!
//! The domain layer only sees the traits in [`traits`], so the local store
//! and the settlement store can each be swapped for test doubles.

pub mod json;
pub mod remote;
pub mod traits;

#[cfg(test)]
pub mod test_utils;

pub use json::{JsonConnection, MarksRepository, PayrollConfigRepository};
pub use remote::{RemoteConfig, RemoteError, RemoteSettlementRepository};
pub use traits::*;
