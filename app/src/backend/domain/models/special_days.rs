//! # Special Day Table
//!
//! Hand-curated mapping of dates to holiday-pay classification for one
//! calendar year. Holiday dates move every year and are published by
//! decree, so the table is data: a built-in copy for 2026 ships with the
//! binary and any other year is loaded from a YAML file.
//!
//! ## YAML Format
//!
//! ```yaml
//! year: 2026
//! days:
//!   "2026-02-16": { pay: triple, festival: 春节 }
//!   "2026-10-01": { pay: double, festival: 国庆 }
//! ```

use chrono::Datelike;
use serde::{Deserialize, Serialize};
use shared::{PayMultiplier, SpecialDay, SpecialDayEntry};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::info;

use super::date_key::parse_date_key;

#[derive(Debug, Error)]
pub enum SpecialDayTableError {
    #[error("failed to read special day file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid special day YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("'{0}' is not a valid YYYY-MM-DD date")]
    InvalidDateKey(String),
    #[error("'{key}' is outside the table year {year}")]
    OutsideYear { key: String, year: i32 },
}

const BUILTIN_2026: [(&str, PayMultiplier, &str); 13] = [
    // 除夕 through 初三
    ("2026-02-16", PayMultiplier::Triple, "春节"),
    ("2026-02-17", PayMultiplier::Triple, "春节"),
    ("2026-02-18", PayMultiplier::Triple, "春节"),
    ("2026-02-19", PayMultiplier::Triple, "春节"),
    ("2026-01-01", PayMultiplier::Double, "元旦"),
    ("2026-04-05", PayMultiplier::Double, "清明"),
    ("2026-05-01", PayMultiplier::Double, "劳动节"),
    ("2026-05-02", PayMultiplier::Double, "劳动节"),
    ("2026-06-19", PayMultiplier::Double, "端午"),
    ("2026-09-25", PayMultiplier::Double, "中秋"),
    ("2026-10-01", PayMultiplier::Double, "国庆"),
    ("2026-10-02", PayMultiplier::Double, "国庆"),
    ("2026-10-03", PayMultiplier::Double, "国庆"),
];

/// Holiday-pay dates of a single year
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpecialDayTable {
    year: i32,
    days: BTreeMap<String, SpecialDay>,
}

impl SpecialDayTable {
    /// Build a table, checking that every key is a valid date inside `year`
    pub fn new(year: i32, days: BTreeMap<String, SpecialDay>) -> Result<Self, SpecialDayTableError> {
        for key in days.keys() {
            let date = parse_date_key(key)
                .ok_or_else(|| SpecialDayTableError::InvalidDateKey(key.clone()))?;
            if date.year() != year {
                return Err(SpecialDayTableError::OutsideYear {
                    key: key.clone(),
                    year,
                });
            }
        }
        Ok(Self { year, days })
    }

    /// The statutory overtime days of 2026
    pub fn builtin_2026() -> Self {
        let days = BUILTIN_2026
            .iter()
            .map(|(key, pay, festival)| {
                (
                    key.to_string(),
                    SpecialDay {
                        pay: *pay,
                        festival: festival.to_string(),
                    },
                )
            })
            .collect();
        Self { year: 2026, days }
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self, SpecialDayTableError> {
        let table: SpecialDayTable = serde_yaml::from_str(yaml)?;
        Self::new(table.year, table.days)
    }

    pub fn load_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self, SpecialDayTableError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| SpecialDayTableError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let table = Self::from_yaml_str(&content)?;
        info!(
            "📅 Loaded {} special days for {} from {}",
            table.len(),
            table.year,
            path.display()
        );
        Ok(table)
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn get(&self, date_key: &str) -> Option<&SpecialDay> {
        self.days.get(date_key)
    }

    pub fn is_special(&self, date_key: &str) -> bool {
        self.days.contains_key(date_key)
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// Entries in date order
    pub fn entries(&self) -> Vec<SpecialDayEntry> {
        self.days
            .iter()
            .map(|(key, day)| SpecialDayEntry {
                date_key: key.clone(),
                pay: day.pay,
                festival: day.festival.clone(),
            })
            .collect()
    }
}
