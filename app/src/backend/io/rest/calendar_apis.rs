use axum::{
    extract::{Query, State},
    response::Json,
    routing::get,
    Router,
};
use serde::Deserialize;
use shared::{CalendarMonth, CalendarYearResponse, SpecialDaysResponse, WeekdayLabelsResponse};
use tracing::info;

use super::ApiError;
use crate::backend::AppState;

// Query parameters for calendar month API
#[derive(Debug, Deserialize)]
pub struct CalendarMonthQuery {
    pub month: u32,
}

/// Create a router for calendar related APIs
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/month", get(get_calendar_month))
        .route("/year", get(get_calendar_year))
        .route("/weekdays", get(get_weekday_labels))
}

/// One month page of the configured year
async fn get_calendar_month(
    State(state): State<AppState>,
    Query(query): Query<CalendarMonthQuery>,
) -> Result<Json<CalendarMonth>, ApiError> {
    info!("GET /api/calendar/month - query: {:?}", query);
    Ok(Json(state.calendar_service.month(query.month)?))
}

/// Every displayed month page
async fn get_calendar_year(State(state): State<AppState>) -> Result<Json<CalendarYearResponse>, ApiError> {
    info!("GET /api/calendar/year");
    Ok(Json(state.calendar_service.year_view()?))
}

async fn get_weekday_labels(State(state): State<AppState>) -> Json<WeekdayLabelsResponse> {
    Json(WeekdayLabelsResponse {
        labels: state.calendar_service.weekday_labels(),
    })
}

pub async fn get_special_days(State(state): State<AppState>) -> Json<SpecialDaysResponse> {
    info!("GET /api/special-days");
    Json(state.calendar_service.special_days())
}
