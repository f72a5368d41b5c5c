use axum::{
    extract::State,
    response::Json,
    routing::{get, post},
    Router,
};
use shared::{
    PayrollConfig, PayrollSummaryResponse, SettleMonthRequest, SettleMonthResponse,
    SettlementListResponse, UpdatePayrollConfigRequest, UpdatePayrollConfigResponse,
};
use tracing::info;

use super::ApiError;
use crate::backend::AppState;

/// Create a router for payroll related APIs
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/config", get(get_payroll_config).put(update_payroll_config))
        .route("/summary", get(get_payroll_summary))
        .route("/settle", post(settle_month))
}

async fn get_payroll_config(State(state): State<AppState>) -> Json<PayrollConfig> {
    Json(state.payroll_service.get_config())
}

async fn update_payroll_config(
    State(state): State<AppState>,
    Json(request): Json<UpdatePayrollConfigRequest>,
) -> Result<Json<UpdatePayrollConfigResponse>, ApiError> {
    info!("PUT /api/payroll/config - request: {:?}", request);
    Ok(Json(state.payroll_service.update_config(request)?))
}

/// Worked days, amount and settlement state of each displayed month
async fn get_payroll_summary(State(state): State<AppState>) -> Result<Json<PayrollSummaryResponse>, ApiError> {
    info!("GET /api/payroll/summary");
    Ok(Json(state.payroll_service.summaries().await?))
}

async fn settle_month(
    State(state): State<AppState>,
    Json(request): Json<SettleMonthRequest>,
) -> Result<Json<SettleMonthResponse>, ApiError> {
    info!("POST /api/payroll/settle - month: {}", request.month);
    Ok(Json(state.payroll_service.settle(request.month).await?))
}

pub async fn list_settlements(State(state): State<AppState>) -> Result<Json<SettlementListResponse>, ApiError> {
    info!("GET /api/settlements");
    Ok(Json(state.payroll_service.list_settlements().await?))
}
