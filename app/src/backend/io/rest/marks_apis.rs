//! # REST API for Attendance Marks
//!
//! Toggle, clear, export and import of the per-day worked marks. Import
//! takes the raw file body so that parse errors are reported with the
//! same 400 response as validation errors.

use axum::{
    extract::State,
    http::{header, HeaderValue},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use shared::{
    ImportMarksResponse, MarksResponse, ResetMarksRequest, ResetMarksResponse, ToggleMarkRequest,
    ToggleMarkResponse,
};
use tracing::info;

use super::ApiError;
use crate::backend::AppState;

/// ASCII name for clients that ignore `filename*`
const FALLBACK_EXPORT_FILENAME: &str = "calendar-marks.json";

/// Create a router for attendance mark APIs
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_marks))
        .route("/toggle", post(toggle_mark))
        .route("/reset", post(reset_marks))
        .route("/export", get(export_marks))
        .route("/import", post(import_marks))
}

async fn get_marks(State(state): State<AppState>) -> Json<MarksResponse> {
    info!("GET /api/marks");
    Json(state.attendance_service.marks())
}

async fn toggle_mark(
    State(state): State<AppState>,
    Json(request): Json<ToggleMarkRequest>,
) -> Result<Json<ToggleMarkResponse>, ApiError> {
    info!("POST /api/marks/toggle - {}", request.date_key);
    Ok(Json(state.attendance_service.toggle(&request.date_key)?))
}

async fn reset_marks(
    State(state): State<AppState>,
    Json(request): Json<ResetMarksRequest>,
) -> Result<Json<ResetMarksResponse>, ApiError> {
    info!("POST /api/marks/reset - confirm: {}", request.confirm);
    Ok(Json(state.attendance_service.reset_all(request.confirm)?))
}

fn content_disposition(filename: &str) -> Result<HeaderValue, ApiError> {
    let encoded: String = url::form_urlencoded::byte_serialize(filename.as_bytes()).collect();
    let value = format!(
        "attachment; filename=\"{}\"; filename*=UTF-8''{}",
        FALLBACK_EXPORT_FILENAME, encoded
    );
    Ok(HeaderValue::from_str(&value)?)
}

/// Download the marks as a pretty-printed JSON file
async fn export_marks(State(state): State<AppState>) -> Result<Response, ApiError> {
    info!("GET /api/marks/export");
    let exported = state.attendance_service.export_snapshot();
    let body = serde_json::to_string_pretty(&exported.snapshot)?;

    Ok((
        [
            (header::CONTENT_TYPE, HeaderValue::from_static("application/json")),
            (header::CONTENT_DISPOSITION, content_disposition(&exported.filename)?),
        ],
        body,
    )
        .into_response())
}

async fn import_marks(
    State(state): State<AppState>,
    body: String,
) -> Result<Json<ImportMarksResponse>, ApiError> {
    info!("POST /api/marks/import - {} bytes", body.len());
    Ok(Json(state.attendance_service.import_snapshot(&body)?))
}
