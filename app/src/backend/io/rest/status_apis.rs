use axum::{extract::State, response::Json, routing::get, Router};
use shared::StatusResponse;

use crate::backend::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/status", get(get_status))
}

/// Calendar year and whether settlements can be recorded
async fn get_status(State(state): State<AppState>) -> Json<StatusResponse> {
    Json(StatusResponse {
        year: state.calendar_service.year(),
        remote_enabled: state.payroll_service.remote_enabled(),
    })
}
