//! # JSON Marks Repository
//!
//! Stores the attendance marks of one calendar year as a single JSON object
//! in the slot `calendar-{year}-marks-v1.json`:
//!
//! ```json
//! { "2026-02-16": true, "2026-02-17": false }
//! ```
//!
//! The whole map is rewritten after every mutation.

use anyhow::Result;
use serde_json::Value;
use shared::Marks;
use tracing::{debug, warn};

use super::connection::JsonConnection;
use crate::backend::storage::MarksStorage;

#[derive(Clone)]
pub struct MarksRepository {
    connection: JsonConnection,
    slot: String,
}

impl MarksRepository {
    pub fn new(connection: JsonConnection, year: i32) -> Self {
        Self {
            connection,
            slot: format!("calendar-{}-marks-v1.json", year),
        }
    }

    pub fn slot(&self) -> &str {
        &self.slot
    }
}

/// Interpret persisted JSON as marks. Anything that is not an object yields
/// an empty map and non-boolean entries are skipped.
fn parse_marks(raw: &str) -> Option<Marks> {
    match serde_json::from_str::<Value>(raw).ok()? {
        Value::Object(entries) => Some(
            entries
                .into_iter()
                .filter_map(|(key, value)| value.as_bool().map(|marked| (key, marked)))
                .collect(),
        ),
        _ => None,
    }
}

impl MarksStorage for MarksRepository {
    fn load_marks(&self) -> Marks {
        let raw = match self.connection.read_slot(&self.slot) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!("No marks saved yet in '{}'", self.slot);
                return Marks::new();
            }
            Err(e) => {
                warn!("⚠️ Failed to read marks slot '{}': {}. Starting empty.", self.slot, e);
                return Marks::new();
            }
        };

        match parse_marks(&raw) {
            Some(marks) => {
                debug!("Loaded {} marks from '{}'", marks.len(), self.slot);
                marks
            }
            None => {
                warn!("⚠️ Marks slot '{}' is malformed. Starting empty.", self.slot);
                Marks::new()
            }
        }
    }

    fn save_marks(&self, marks: &Marks) -> Result<()> {
        let json = serde_json::to_string(marks)?;
        self.connection.write_slot(&self.slot, &json)
    }
}
