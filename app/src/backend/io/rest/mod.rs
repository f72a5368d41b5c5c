//! # REST API Interface Layer
//!
//! HTTP endpoints of the wall calendar. Every handler is a thin translation
//! between JSON and a domain service call; errors go through [`ApiError`],
//! which picks the status code from the domain error type.
//!
//! ```text
//! /api/calendar/*      month pages, year view, weekday labels
//! /api/special-days    the holiday-pay table
//! /api/marks/*         attendance marks, reset, export, import
//! /api/payroll/*       settings, monthly summaries, settling
//! /api/settlements     recorded settlements
//! /api/status          year and remote availability
//! ```

pub mod calendar_apis;
pub mod error;
pub mod marks_apis;
pub mod payroll_apis;
pub mod status_apis;

use axum::{routing::get, Router};

use crate::backend::AppState;

pub use error::ApiError;

/// All API routes, relative to the `/api` prefix
pub fn api_router() -> Router<AppState> {
    Router::new()
        .nest("/calendar", calendar_apis::router())
        .route("/special-days", get(calendar_apis::get_special_days))
        .nest("/marks", marks_apis::router())
        .nest("/payroll", payroll_apis::router())
        .route("/settlements", get(payroll_apis::list_settlements))
        .merge(status_apis::router())
}
