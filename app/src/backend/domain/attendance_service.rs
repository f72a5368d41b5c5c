//! Attendance marks: toggling, clearing, export and import.
//!
//! Every mutation reloads the persisted map, applies the change and writes
//! the whole map back before returning. A mutex serialises these sequences
//! so concurrent requests never interleave their writes.

use anyhow::{anyhow, Result};
use chrono::{Datelike, Utc};
use serde_json::Value;
use shared::{
    ExportSnapshot, ImportMarksResponse, Marks, MarksResponse, MarksSummary, ResetMarksResponse,
    ToggleMarkResponse,
};
use std::sync::{Arc, Mutex, MutexGuard};
use thiserror::Error;
use tracing::{info, warn};

use super::models::{parse_date_key, SpecialDayTable};
use crate::backend::storage::MarksStorage;

pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AttendanceError {
    #[error("'{key}' is not a valid date in {year}")]
    InvalidDateKey { key: String, year: i32 },
    #[error("clearing all marks requires confirmation")]
    ConfirmationRequired,
}

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("import file is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("import file has no 'marks' field")]
    MissingMarks,
    #[error("'marks' must be an object")]
    MarksNotObject,
    #[error("mark for '{0}' must be true or false")]
    NonBooleanMark(String),
    #[error("'{0}' is not a valid YYYY-MM-DD date")]
    InvalidDateKey(String),
}

/// Export document plus the suggested download name
#[derive(Debug, Clone, PartialEq)]
pub struct ExportedMarks {
    pub filename: String,
    pub snapshot: ExportSnapshot,
}

/// Parse an import document. Only the `marks` field is read.
pub fn parse_import(raw: &str) -> Result<Marks, ImportError> {
    let document: Value = serde_json::from_str(raw)?;
    let marks = match document.get("marks") {
        Some(Value::Object(marks)) => marks,
        Some(_) => return Err(ImportError::MarksNotObject),
        None => return Err(ImportError::MissingMarks),
    };

    let mut parsed = Marks::new();
    for (key, value) in marks {
        if parse_date_key(key).is_none() {
            return Err(ImportError::InvalidDateKey(key.clone()));
        }
        let marked = value
            .as_bool()
            .ok_or_else(|| ImportError::NonBooleanMark(key.clone()))?;
        parsed.insert(key.clone(), marked);
    }
    Ok(parsed)
}

#[derive(Clone)]
pub struct AttendanceService {
    storage: Arc<dyn MarksStorage>,
    table: Arc<SpecialDayTable>,
    write_lock: Arc<Mutex<()>>,
}

impl AttendanceService {
    pub fn new(storage: Arc<dyn MarksStorage>, table: Arc<SpecialDayTable>) -> Self {
        Self {
            storage,
            table,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    fn year(&self) -> i32 {
        self.table.year()
    }

    fn lock(&self) -> Result<MutexGuard<'_, ()>> {
        self.write_lock
            .lock()
            .map_err(|_| anyhow!("marks store lock poisoned"))
    }

    /// Marks as last persisted
    pub fn load(&self) -> Marks {
        self.storage.load_marks()
    }

    pub fn summarize(&self, marks: &Marks) -> MarksSummary {
        let marked = || marks.iter().filter(|(_, marked)| **marked);
        MarksSummary {
            total: marked().count(),
            special_marked: marked().filter(|(key, _)| self.table.is_special(key)).count(),
        }
    }

    pub fn marks(&self) -> MarksResponse {
        let marks = self.load();
        let summary = self.summarize(&marks);
        MarksResponse { marks, summary }
    }

    /// Flip the mark of one day and persist the whole map
    pub fn toggle(&self, date_key: &str) -> Result<ToggleMarkResponse> {
        let in_year = parse_date_key(date_key).is_some_and(|d| d.year() == self.year());
        if !in_year {
            return Err(AttendanceError::InvalidDateKey {
                key: date_key.to_string(),
                year: self.year(),
            }
            .into());
        }

        let _guard = self.lock()?;
        let mut marks = self.storage.load_marks();
        let marked = !marks.get(date_key).copied().unwrap_or(false);
        marks.insert(date_key.to_string(), marked);
        self.storage.save_marks(&marks)?;

        info!("✅ Toggled {} -> {}", date_key, marked);
        Ok(ToggleMarkResponse {
            date_key: date_key.to_string(),
            marked,
            summary: self.summarize(&marks),
        })
    }

    /// Clear every mark. Nothing happens unless `confirm` is set.
    pub fn reset_all(&self, confirm: bool) -> Result<ResetMarksResponse> {
        if !confirm {
            warn!("Refusing to clear marks without confirmation");
            return Err(AttendanceError::ConfirmationRequired.into());
        }

        let _guard = self.lock()?;
        self.storage.save_marks(&Marks::new())?;
        info!("🧹 Cleared all marks");
        Ok(ResetMarksResponse {
            success_message: "All marks cleared".to_string(),
        })
    }

    pub fn export_snapshot(&self) -> ExportedMarks {
        let now = Utc::now();
        let marks = self.load();
        info!("📄 EXPORT: {} marks for {}", marks.len(), self.year());
        ExportedMarks {
            filename: format!("{}挂历标记-{}.json", self.year(), now.format("%Y-%m-%d")),
            snapshot: ExportSnapshot {
                version: SNAPSHOT_VERSION,
                year: self.year(),
                exported_at: now.to_rfc3339(),
                marks,
            },
        }
    }

    /// Replace all marks with the ones in `raw`. Invalid input changes nothing.
    pub fn import_snapshot(&self, raw: &str) -> Result<ImportMarksResponse> {
        let marks = parse_import(raw).map_err(|e| {
            warn!("❌ IMPORT: rejected: {}", e);
            e
        })?;

        let _guard = self.lock()?;
        self.storage.save_marks(&marks)?;
        info!("✅ IMPORT: replaced marks with {} entries", marks.len());

        Ok(ImportMarksResponse {
            imported: marks.len(),
            summary: self.summarize(&marks),
            success_message: "Import succeeded, local marks were replaced".to_string(),
        })
    }
}
