//! Mapping of domain errors onto HTTP responses.
//!
//! | error | status |
//! |---|---|
//! | invalid month, date key, import file, payroll setting | 400 |
//! | settling below target | 422 |
//! | settlement store request failed | 502 |
//! | settlement store not configured | 503 |
//! | anything else | 500 |

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use shared::ErrorResponse;
use tracing::{error, warn};

use crate::backend::domain::{AttendanceError, CalendarError, ImportError, PayrollError};
use crate::backend::storage::RemoteError;

/// Error returned by every handler
#[derive(Debug)]
pub struct ApiError(anyhow::Error);

impl<E: Into<anyhow::Error>> From<E> for ApiError {
    fn from(err: E) -> Self {
        ApiError(err.into())
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        if self.0.downcast_ref::<CalendarError>().is_some()
            || self.0.downcast_ref::<AttendanceError>().is_some()
            || self.0.downcast_ref::<ImportError>().is_some()
        {
            return StatusCode::BAD_REQUEST;
        }
        if let Some(payroll) = self.0.downcast_ref::<PayrollError>() {
            return match payroll {
                PayrollError::InvalidMonth(_)
                | PayrollError::InvalidBaseSalary(_)
                | PayrollError::InvalidTargetDays(_) => StatusCode::BAD_REQUEST,
                PayrollError::BelowTarget { .. } => StatusCode::UNPROCESSABLE_ENTITY,
                PayrollError::RemoteUnavailable => StatusCode::SERVICE_UNAVAILABLE,
                PayrollError::SettlementStore(_) => StatusCode::BAD_GATEWAY,
            };
        }
        if self.0.downcast_ref::<RemoteError>().is_some() {
            return StatusCode::BAD_GATEWAY;
        }
        StatusCode::INTERNAL_SERVER_ERROR
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = format!("{:#}", self.0);
        if status.is_server_error() {
            error!("❌ {} {}", status, message);
        } else {
            warn!("Rejected request ({}): {}", status, message);
        }
        (status, Json(ErrorResponse { error: message })).into_response()
    }
}
