//! Holiday overtime wall calendar.
//!
//! Serves the calendar pages, attendance marks and monthly payroll
//! settlements of one year over a local JSON API.

pub mod backend;
pub mod config;
pub mod logging;
