//! # Backend Module
//!
//! Contains all non-UI logic for the holiday overtime wall calendar.
//!
//! - **Domain**: calendar pages, attendance marks, payroll rules
//! - **Storage**: local JSON slots and the remote settlement table
//! - **IO**: the REST API consumed by the calendar page
//!
//! ## Architecture
//!
//! ```text
//! Calendar page (browser)
//!     ↓
//! IO Layer (REST API, handlers)
//!     ↓
//! Domain Layer (business logic, services)
//!     ↓
//! Storage Layer (JSON slots, remote settlement table)
//! ```

pub mod domain;
pub mod io;
pub mod storage;

use anyhow::Result;
use axum::{
    http::{header, Method},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::config::AppConfig;
use domain::models::SpecialDayTable;
use domain::{AttendanceService, CalendarService, GridLayout, PayrollService};
use storage::{
    JsonConnection, MarksRepository, PayrollConfigRepository, RemoteSettlementRepository,
    SettlementStorage,
};

/// Main application state that holds all services
#[derive(Clone)]
pub struct AppState {
    pub calendar_service: CalendarService,
    pub attendance_service: AttendanceService,
    pub payroll_service: PayrollService,
}

impl AppState {
    /// Wire the services over a data directory and an optional settlement store
    pub fn from_parts(
        connection: JsonConnection,
        table: SpecialDayTable,
        layout: GridLayout,
        first_display_month: u32,
        settlements: Option<Arc<dyn SettlementStorage>>,
    ) -> Self {
        let table = Arc::new(table);
        let year = table.year();

        let calendar_service = CalendarService::new(table.clone(), layout, first_display_month);
        let attendance_service = AttendanceService::new(
            Arc::new(MarksRepository::new(connection.clone(), year)),
            table,
        );
        let payroll_service = PayrollService::new(
            Arc::new(PayrollConfigRepository::new(connection)),
            attendance_service.clone(),
            calendar_service.clone(),
            settlements,
        );

        Self {
            calendar_service,
            attendance_service,
            payroll_service,
        }
    }
}

/// Initialize the backend with all required services
pub fn initialize_backend(config: &AppConfig) -> Result<AppState> {
    info!("Setting up data directory {}", config.data_dir.display());
    let connection = JsonConnection::new(&config.data_dir)?;

    let settlements: Option<Arc<dyn SettlementStorage>> = match &config.remote {
        Some(remote) => {
            info!("🌐 Settlements go to {}", remote.base_url);
            Some(Arc::new(RemoteSettlementRepository::new(remote.clone())?))
        }
        None => {
            warn!("Remote settlement store not configured, running local-only");
            None
        }
    };

    info!(
        "Setting up calendar {} ({} special days, {} layout, from month {})",
        config.table.year(),
        config.table.len(),
        config.grid_layout,
        config.first_month
    );
    Ok(AppState::from_parts(
        connection,
        config.table.clone(),
        config.grid_layout,
        config.first_month,
        settlements,
    ))
}

/// Create the Axum router with all routes configured
pub fn create_router(app_state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT])
        .allow_headers(Any)
        .expose_headers([header::CONTENT_DISPOSITION]);

    Router::new()
        .nest("/api", io::rest::api_router())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(app_state)
}
