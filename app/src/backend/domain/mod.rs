//! # Domain Module
//!
//! Business logic of the holiday overtime wall calendar.
//!
//! ## Module Organization
//!
//! - **calendar**: Monday-first month pages with holiday-pay annotations
//! - **attendance_service**: per-day worked marks, export and import
//! - **payroll_service**: worked-day counts, amounts, eligibility and settlements
//! - **models**: date keys, the special day table and settlement payloads
//!
//! ## Business Rules
//!
//! - Only the configured year is displayed and markable
//! - A month can be settled once its worked days reach the target
//! - Settling a month again replaces the earlier settlement
//! - Nothing here knows whether storage is local, remote or in memory

pub mod attendance_service;
pub mod calendar;
pub mod models;
pub mod payroll_service;

pub use attendance_service::*;
pub use calendar::*;
pub use payroll_service::*;
