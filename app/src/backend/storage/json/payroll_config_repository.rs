//! # JSON Payroll Config Repository
//!
//! Base salary and target days live in two independent slots,
//! `payroll-base-salary.json` and `payroll-target-days.json`, each holding a
//! bare JSON number. A slot that is missing or holds an unusable value falls
//! back to the default for that field only.

use anyhow::Result;
use shared::PayrollConfig;
use tracing::warn;

use super::connection::JsonConnection;
use crate::backend::storage::PayrollConfigStorage;

pub const BASE_SALARY_SLOT: &str = "payroll-base-salary.json";
pub const TARGET_DAYS_SLOT: &str = "payroll-target-days.json";

#[derive(Clone)]
pub struct PayrollConfigRepository {
    connection: JsonConnection,
}

impl PayrollConfigRepository {
    pub fn new(connection: JsonConnection) -> Self {
        Self { connection }
    }

    fn read_number<T: serde::de::DeserializeOwned>(&self, slot: &str) -> Option<T> {
        match self.connection.read_slot(slot) {
            Ok(Some(raw)) => match serde_json::from_str::<T>(raw.trim()) {
                Ok(value) => Some(value),
                Err(e) => {
                    warn!("⚠️ Ignoring malformed payroll slot '{}': {}", slot, e);
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                warn!("⚠️ Failed to read payroll slot '{}': {}", slot, e);
                None
            }
        }
    }
}

impl PayrollConfigStorage for PayrollConfigRepository {
    fn load_payroll_config(&self) -> PayrollConfig {
        let defaults = PayrollConfig::default();

        let base_salary = self
            .read_number::<f64>(BASE_SALARY_SLOT)
            .filter(|v| v.is_finite() && *v > 0.0)
            .unwrap_or(defaults.base_salary);
        let target_days = self
            .read_number::<u32>(TARGET_DAYS_SLOT)
            .filter(|v| *v > 0)
            .unwrap_or(defaults.target_days);

        PayrollConfig {
            base_salary,
            target_days,
        }
    }

    fn save_payroll_config(&self, config: &PayrollConfig) -> Result<()> {
        self.connection
            .write_slot(BASE_SALARY_SLOT, &serde_json::to_string(&config.base_salary)?)?;
        self.connection
            .write_slot(TARGET_DAYS_SLOT, &serde_json::to_string(&config.target_days)?)?;
        Ok(())
    }
}
