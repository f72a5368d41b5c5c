//! Test utilities shared by the storage, domain and REST tests.
//!
//! - `TestEnvironment`: RAII temp data directory, removed on drop even if
//!   the test panics
//! - `InMemorySettlementRepository`: settlement store double that counts calls
//! - `FakeSettlementServer`: local HTTP server speaking the PostgREST subset
//!   used by the remote repository

use anyhow::Result;
use async_trait::async_trait;
use axum::{
    extract::{Query, State},
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use shared::Settlement;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use tokio::net::TcpListener;

use super::json::JsonConnection;
use super::remote::RemoteConfig;
use super::SettlementStorage;
use crate::backend::domain::models::SettlementDraft;

pub struct TestEnvironment {
    /// Kept alive so the directory survives until the environment is dropped
    _temp_dir: TempDir,
    pub connection: JsonConnection,
    pub base_path: PathBuf,
}

impl TestEnvironment {
    pub fn new() -> Result<Self> {
        let temp_dir = TempDir::new()?;
        let base_path = temp_dir.path().to_path_buf();
        let connection = JsonConnection::new(&base_path)?;

        Ok(TestEnvironment {
            _temp_dir: temp_dir,
            connection,
            base_path,
        })
    }

    pub fn base_directory(&self) -> &Path {
        &self.base_path
    }
}

fn apply_draft(rows: &mut Vec<Settlement>, draft: &SettlementDraft, next_id: &AtomicU64) -> Settlement {
    let existing = rows
        .iter_mut()
        .find(|row| row.year == draft.year && row.month == draft.month);

    match existing {
        Some(row) => {
            row.base_salary = draft.base_salary;
            row.target_days = draft.target_days;
            row.worked_days = draft.worked_days;
            row.amount = draft.amount;
            row.settled_at = draft.settled_at.clone();
            row.clone()
        }
        None => {
            let row = Settlement {
                id: next_id.fetch_add(1, Ordering::SeqCst).to_string(),
                year: draft.year,
                month: draft.month,
                base_salary: draft.base_salary,
                target_days: draft.target_days,
                worked_days: draft.worked_days,
                amount: draft.amount,
                settled_at: draft.settled_at.clone(),
            };
            rows.push(row.clone());
            row
        }
    }
}

fn rows_for_year(rows: &[Settlement], year: i32) -> Vec<Settlement> {
    let mut rows: Vec<Settlement> = rows.iter().filter(|r| r.year == year).cloned().collect();
    rows.sort_by_key(|r| r.month);
    rows
}

/// In-memory settlement store with the same (year, month) upsert key as the remote table
#[derive(Default)]
pub struct InMemorySettlementRepository {
    rows: Mutex<Vec<Settlement>>,
    next_id: AtomicU64,
    upsert_calls: AtomicUsize,
    fail: AtomicBool,
}

impl InMemorySettlementRepository {
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            ..Default::default()
        }
    }

    pub fn upsert_calls(&self) -> usize {
        self.upsert_calls.load(Ordering::SeqCst)
    }

    pub fn rows(&self) -> Vec<Settlement> {
        self.rows.lock().unwrap().clone()
    }

    /// Make every following call fail like an unreachable remote
    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl SettlementStorage for InMemorySettlementRepository {
    async fn upsert_settlement(&self, draft: &SettlementDraft) -> Result<Settlement> {
        self.upsert_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail.load(Ordering::SeqCst) {
            anyhow::bail!("connection refused");
        }
        let mut rows = self.rows.lock().unwrap();
        Ok(apply_draft(&mut rows, draft, &self.next_id))
    }

    async fn list_settlements(&self, year: i32) -> Result<Vec<Settlement>> {
        if self.fail.load(Ordering::SeqCst) {
            anyhow::bail!("connection refused");
        }
        Ok(rows_for_year(&self.rows.lock().unwrap(), year))
    }
}

pub const FAKE_API_KEY: &str = "test-anon-key";

#[derive(Clone)]
struct FakeState {
    rows: Arc<Mutex<Vec<Settlement>>>,
    next_id: Arc<AtomicU64>,
    fail: Arc<AtomicBool>,
}

/// Local stand-in for the hosted settlement table
pub struct FakeSettlementServer {
    addr: SocketAddr,
    state: FakeState,
}

impl FakeSettlementServer {
    pub async fn start() -> Self {
        let state = FakeState {
            rows: Arc::new(Mutex::new(Vec::new())),
            next_id: Arc::new(AtomicU64::new(100)),
            fail: Arc::new(AtomicBool::new(false)),
        };
        let app = Router::new()
            .route("/rest/v1/salary_settlements", get(fake_list).post(fake_upsert))
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { addr, state }
    }

    pub fn config(&self) -> RemoteConfig {
        RemoteConfig::from_parts(
            Some(format!("http://{}", self.addr)),
            Some(FAKE_API_KEY.to_string()),
        )
        .unwrap()
    }

    pub fn fail_next_requests(&self, fail: bool) {
        self.state.fail.store(fail, Ordering::SeqCst);
    }

    pub fn rows(&self) -> Vec<Settlement> {
        self.state.rows.lock().unwrap().clone()
    }
}

fn check_request(state: &FakeState, headers: &HeaderMap) -> Option<Response> {
    let api_key = headers.get("apikey").and_then(|v| v.to_str().ok());
    let bearer = headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok());
    let expected_bearer = format!("Bearer {}", FAKE_API_KEY);
    if api_key != Some(FAKE_API_KEY) || bearer != Some(expected_bearer.as_str()) {
        return Some((StatusCode::UNAUTHORIZED, "invalid api key").into_response());
    }
    if state.fail.load(Ordering::SeqCst) {
        return Some((StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response());
    }
    None
}

async fn fake_list(
    State(state): State<FakeState>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    if let Some(rejection) = check_request(&state, &headers) {
        return rejection;
    }
    let year = params
        .get("year")
        .and_then(|v| v.strip_prefix("eq."))
        .and_then(|v| v.parse::<i32>().ok());
    let Some(year) = year else {
        return (StatusCode::BAD_REQUEST, "missing year filter").into_response();
    };
    if params.get("order").map(String::as_str) != Some("month.asc") {
        return (StatusCode::BAD_REQUEST, "missing order").into_response();
    }
    Json(rows_for_year(&state.rows.lock().unwrap(), year)).into_response()
}

async fn fake_upsert(
    State(state): State<FakeState>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
    Json(drafts): Json<Vec<SettlementDraft>>,
) -> Response {
    if let Some(rejection) = check_request(&state, &headers) {
        return rejection;
    }
    let merge = headers
        .get("Prefer")
        .and_then(|v| v.to_str().ok())
        .map(|v| v.contains("resolution=merge-duplicates"))
        .unwrap_or(false);
    if params.get("on_conflict").map(String::as_str) != Some("year,month") || !merge {
        return (StatusCode::CONFLICT, "duplicate key value violates unique constraint").into_response();
    }

    let mut rows = state.rows.lock().unwrap();
    let written: Vec<Settlement> = drafts
        .iter()
        .map(|draft| apply_draft(&mut rows, draft, &state.next_id))
        .collect();
    (StatusCode::CREATED, Json(written)).into_response()
}
