//! # Remote Settlement Repository
//!
//! Talks to the hosted settlement table through its PostgREST interface.
//!
//! - list: `GET  rest/v1/salary_settlements?select=*&year=eq.{year}&order=month.asc`
//! - upsert: `POST rest/v1/salary_settlements?on_conflict=year,month` with
//!   `Prefer: resolution=merge-duplicates,return=representation`
//!
//! The table has a unique constraint on (year, month), so a repeated upsert
//! overwrites the existing row. Calls are made once and never retried.

use anyhow::Result;
use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use shared::Settlement;
use thiserror::Error;
use tracing::{debug, error, info};
use url::Url;

use super::config::RemoteConfig;
use crate::backend::domain::models::SettlementDraft;
use crate::backend::storage::SettlementStorage;

pub const SETTLEMENT_TABLE_PATH: &str = "rest/v1/salary_settlements";

#[derive(Error, Debug)]
pub enum RemoteError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("JSON processing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("remote store error: Status={status}, Message='{message}'")]
    Api { status: StatusCode, message: String },

    #[error("remote store returned no row for {context}")]
    EmptyResponse { context: String },
}

/// Row shape returned by the table. Depending on the column type the id
/// arrives as a number or as a uuid string.
#[derive(Debug, Deserialize)]
struct SettlementRow {
    #[serde(deserialize_with = "id_as_string")]
    id: String,
    year: i32,
    month: u32,
    base_salary: f64,
    target_days: u32,
    worked_days: u32,
    amount: f64,
    settled_at: String,
}

fn id_as_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number id, got {}",
            other
        ))),
    }
}

impl From<SettlementRow> for Settlement {
    fn from(row: SettlementRow) -> Self {
        Settlement {
            id: row.id,
            year: row.year,
            month: row.month,
            base_salary: row.base_salary,
            target_days: row.target_days,
            worked_days: row.worked_days,
            amount: row.amount,
            settled_at: row.settled_at,
        }
    }
}

#[derive(Clone)]
pub struct RemoteSettlementRepository {
    http_client: Client,
    config: RemoteConfig,
}

impl RemoteSettlementRepository {
    pub fn new(config: RemoteConfig) -> Result<Self, RemoteError> {
        let http_client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            http_client,
            config,
        })
    }

    fn table_url(&self) -> Result<Url, RemoteError> {
        Ok(self.config.base_url.join(SETTLEMENT_TABLE_PATH)?)
    }

    fn build_request(&self, method: Method, url: Url) -> RequestBuilder {
        self.http_client
            .request(method, url)
            .header("apikey", self.config.api_key.as_str())
            .header(AUTHORIZATION, format!("Bearer {}", self.config.api_key))
            .header(ACCEPT, "application/json")
            .header(CONTENT_TYPE, "application/json")
    }

    async fn send_and_deserialize<T: DeserializeOwned>(
        &self,
        request_builder: RequestBuilder,
        context_msg: &str,
    ) -> Result<T, RemoteError> {
        let response = request_builder.send().await.map_err(|e| {
            error!("Request for '{}' failed: {}", context_msg, e);
            RemoteError::Request(e)
        })?;

        let status = response.status();
        info!("Received response for '{}': Status={}", context_msg, status);

        let body = response.text().await?;
        if !status.is_success() {
            error!("Remote store error for '{}': {} {}", context_msg, status, body);
            return Err(RemoteError::Api {
                status,
                message: body,
            });
        }

        debug!("Raw response body for '{}': {}", context_msg, body);
        Ok(serde_json::from_str::<T>(&body)?)
    }

    pub async fn fetch_settlements(&self, year: i32) -> Result<Vec<Settlement>, RemoteError> {
        let mut url = self.table_url()?;
        url.query_pairs_mut()
            .append_pair("select", "*")
            .append_pair("year", &format!("eq.{}", year))
            .append_pair("order", "month.asc");

        let context = format!("list settlements {}", year);
        let rows: Vec<SettlementRow> = self
            .send_and_deserialize(self.build_request(Method::GET, url), &context)
            .await?;

        let mut settlements: Vec<Settlement> = rows.into_iter().map(Settlement::from).collect();
        settlements.sort_by_key(|s| s.month);
        Ok(settlements)
    }

    pub async fn write_settlement(&self, draft: &SettlementDraft) -> Result<Settlement, RemoteError> {
        let mut url = self.table_url()?;
        url.query_pairs_mut().append_pair("on_conflict", "year,month");

        let context = format!("upsert settlement {}-{:02}", draft.year, draft.month);
        let request = self
            .build_request(Method::POST, url)
            .header("Prefer", "resolution=merge-duplicates,return=representation")
            .json(&[draft]);

        let rows: Vec<SettlementRow> = self.send_and_deserialize(request, &context).await?;
        rows.into_iter()
            .next()
            .map(Settlement::from)
            .ok_or(RemoteError::EmptyResponse { context })
    }
}

#[async_trait]
impl SettlementStorage for RemoteSettlementRepository {
    async fn upsert_settlement(&self, draft: &SettlementDraft) -> Result<Settlement> {
        Ok(self.write_settlement(draft).await?)
    }

    async fn list_settlements(&self, year: i32) -> Result<Vec<Settlement>> {
        Ok(self.fetch_settlements(year).await?)
    }
}
