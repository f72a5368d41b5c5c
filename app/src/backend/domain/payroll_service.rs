//! # Payroll Service
//!
//! Derives per-month worked days from the attendance marks, checks them
//! against the configured target and records settlements in the remote
//! store.
//!
//! ## Amount
//!
//! `amount = round(base_salary / target_days * worked_days, 2)`. Working more
//! days than the target pays more than the base salary.
//!
//! ## Settling
//!
//! A month can be settled once its worked days reach the target. The check
//! is repeated at request time and a month below target is rejected before
//! any network call. Settling a month again overwrites its row.

use anyhow::Result;
use chrono::{Datelike, Utc};
use shared::{
    Marks, MonthPayrollSummary, PayrollConfig, PayrollSummaryResponse, SettleMonthResponse,
    Settlement, SettlementListResponse, UpdatePayrollConfigRequest, UpdatePayrollConfigResponse,
};
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info, warn};

use super::attendance_service::AttendanceService;
use super::calendar::CalendarService;
use super::models::{parse_date_key, SettlementDraft};
use crate::backend::storage::{PayrollConfigStorage, SettlementStorage};

#[derive(Debug, Error)]
pub enum PayrollError {
    #[error("invalid month {0}, expected 1-12")]
    InvalidMonth(u32),

    #[error("base salary must be a positive number, got {0}")]
    InvalidBaseSalary(f64),

    #[error("target days must be at least 1, got {0}")]
    InvalidTargetDays(u32),

    #[error("month {month} has {worked_days} worked days, {target_days} are needed before it can be settled")]
    BelowTarget {
        month: u32,
        worked_days: u32,
        target_days: u32,
    },

    #[error("remote settlement store is not configured")]
    RemoteUnavailable,

    #[error("settlement store request failed: {0:#}")]
    SettlementStore(anyhow::Error),
}

/// Marked days that fall in `month` of `year`
pub fn worked_days(marks: &Marks, year: i32, month: u32) -> u32 {
    worked_dates(marks, year, month).count() as u32
}

fn worked_dates<'a>(marks: &'a Marks, year: i32, month: u32) -> impl Iterator<Item = &'a str> {
    marks
        .iter()
        .filter(|(_, marked)| **marked)
        .filter(move |(key, _)| {
            parse_date_key(key).is_some_and(|date| date.year() == year && date.month() == month)
        })
        .map(|(key, _)| key.as_str())
}

/// Pro-rata amount rounded to cents
pub fn compute_amount(config: &PayrollConfig, worked_days: u32) -> f64 {
    let raw = config.base_salary / config.target_days as f64 * worked_days as f64;
    (raw * 100.0).round() / 100.0
}

pub fn eligible(config: &PayrollConfig, worked_days: u32, settlement: Option<&Settlement>) -> bool {
    worked_days >= config.target_days && settlement.is_none()
}

fn validate_config(config: &PayrollConfig) -> Result<(), PayrollError> {
    if !config.base_salary.is_finite() || config.base_salary <= 0.0 {
        return Err(PayrollError::InvalidBaseSalary(config.base_salary));
    }
    if config.target_days < 1 {
        return Err(PayrollError::InvalidTargetDays(config.target_days));
    }
    Ok(())
}

#[derive(Clone)]
pub struct PayrollService {
    config_storage: Arc<dyn PayrollConfigStorage>,
    attendance: AttendanceService,
    calendar: CalendarService,
    settlements: Option<Arc<dyn SettlementStorage>>,
}

impl PayrollService {
    pub fn new(
        config_storage: Arc<dyn PayrollConfigStorage>,
        attendance: AttendanceService,
        calendar: CalendarService,
        settlements: Option<Arc<dyn SettlementStorage>>,
    ) -> Self {
        Self {
            config_storage,
            attendance,
            calendar,
            settlements,
        }
    }

    pub fn remote_enabled(&self) -> bool {
        self.settlements.is_some()
    }

    pub fn get_config(&self) -> PayrollConfig {
        self.config_storage.load_payroll_config()
    }

    pub fn update_config(&self, request: UpdatePayrollConfigRequest) -> Result<UpdatePayrollConfigResponse> {
        let config = PayrollConfig {
            base_salary: request.base_salary,
            target_days: request.target_days,
        };
        validate_config(&config)?;
        self.config_storage.save_payroll_config(&config)?;

        info!(
            "💰 Payroll config updated: base salary {:.2}, target {} days",
            config.base_salary, config.target_days
        );
        Ok(UpdatePayrollConfigResponse {
            config,
            success_message: "Payroll settings saved".to_string(),
        })
    }

    /// Recorded settlements of the fixed year. Empty when no remote store is configured.
    pub async fn list_settlements(&self) -> Result<SettlementListResponse> {
        let year = self.calendar.year();
        let settlements = match &self.settlements {
            Some(store) => store
                .list_settlements(year)
                .await
                .map_err(PayrollError::SettlementStore)?,
            None => Vec::new(),
        };
        Ok(SettlementListResponse { year, settlements })
    }

    /// One summary per displayed month
    pub async fn summaries(&self) -> Result<PayrollSummaryResponse> {
        let year = self.calendar.year();
        let config = self.get_config();
        let marks = self.attendance.load();
        let settlements = self.list_settlements().await?.settlements;
        let table = self.calendar.table();

        let months = self
            .calendar
            .display_months()
            .map(|month| {
                let worked = worked_days(&marks, year, month);
                let special = worked_dates(&marks, year, month)
                    .filter(|key| table.is_special(key))
                    .count() as u32;
                let settlement = settlements.iter().find(|s| s.month == month).cloned();
                MonthPayrollSummary {
                    month,
                    worked_days: worked,
                    special_worked_days: special,
                    target_days: config.target_days,
                    amount: compute_amount(&config, worked),
                    eligible: eligible(&config, worked, settlement.as_ref()),
                    settlement,
                }
            })
            .collect();

        Ok(PayrollSummaryResponse {
            year,
            config,
            remote_enabled: self.remote_enabled(),
            months,
        })
    }

    /// Record the settlement of `month` from the current marks and settings
    pub async fn settle(&self, month: u32) -> Result<SettleMonthResponse> {
        if !(1..=12).contains(&month) {
            return Err(PayrollError::InvalidMonth(month).into());
        }

        let year = self.calendar.year();
        let config = self.get_config();
        let worked = worked_days(&self.attendance.load(), year, month);

        if worked < config.target_days {
            warn!(
                "Refusing to settle {}-{:02}: {} of {} days",
                year, month, worked, config.target_days
            );
            return Err(PayrollError::BelowTarget {
                month,
                worked_days: worked,
                target_days: config.target_days,
            }
            .into());
        }

        let store = self.settlements.as_ref().ok_or(PayrollError::RemoteUnavailable)?;

        let draft = SettlementDraft {
            year,
            month,
            base_salary: config.base_salary,
            target_days: config.target_days,
            worked_days: worked,
            amount: compute_amount(&config, worked),
            settled_at: Utc::now().to_rfc3339(),
        };

        let settlement = store.upsert_settlement(&draft).await.map_err(|e| {
            error!("❌ Settlement of {}-{:02} failed: {:#}", year, month, e);
            PayrollError::SettlementStore(e)
        })?;

        info!(
            "✅ Settled {}-{:02}: {} days, amount {:.2}",
            year, month, settlement.worked_days, settlement.amount
        );
        Ok(SettleMonthResponse {
            success_message: format!("Month {} settled, amount {:.2}", month, settlement.amount),
            settlement,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::domain::calendar::GridLayout;
    use crate::backend::domain::models::{days_in_month, SpecialDayTable};
    use crate::backend::storage::test_utils::{InMemorySettlementRepository, TestEnvironment};
    use crate::backend::storage::{MarksRepository, PayrollConfigRepository};

    struct Fixture {
        _env: TestEnvironment,
        attendance: AttendanceService,
        remote: Arc<InMemorySettlementRepository>,
        service: PayrollService,
    }

    fn fixture(with_remote: bool) -> Fixture {
        let env = TestEnvironment::new().unwrap();
        let table = Arc::new(SpecialDayTable::builtin_2026());
        let attendance = AttendanceService::new(
            Arc::new(MarksRepository::new(env.connection.clone(), 2026)),
            table.clone(),
        );
        let calendar = CalendarService::new(table, GridLayout::SixRows, 2);
        let remote = Arc::new(InMemorySettlementRepository::new());
        let settlements: Option<Arc<dyn SettlementStorage>> = if with_remote {
            Some(remote.clone() as Arc<dyn SettlementStorage>)
        } else {
            None
        };
        let service = PayrollService::new(
            Arc::new(PayrollConfigRepository::new(env.connection.clone())),
            attendance.clone(),
            calendar,
            settlements,
        );
        Fixture {
            _env: env,
            attendance,
            remote,
            service,
        }
    }

    fn mark_days(attendance: &AttendanceService, month: u32, days: u32) {
        mark_days_from(attendance, month, 1, days);
    }

    fn mark_days_from(attendance: &AttendanceService, month: u32, from: u32, to: u32) {
        for day in from..=to {
            attendance.toggle(&format!("2026-{:02}-{:02}", month, day)).unwrap();
        }
    }

    #[test]
    fn test_amount_is_pro_rata_and_rounded() {
        let config = PayrollConfig {
            base_salary: 9000.0,
            target_days: 26,
        };
        assert_eq!(compute_amount(&config, 26), 9000.00);
        assert_eq!(compute_amount(&config, 13), 4500.00);
        assert_eq!(compute_amount(&config, 30), 10384.62);
        assert_eq!(compute_amount(&config, 0), 0.0);
    }

    #[test]
    fn test_worked_days_only_counts_true_marks_in_month() {
        let mut marks = Marks::new();
        marks.insert("2026-03-01".to_string(), true);
        marks.insert("2026-03-02".to_string(), false);
        marks.insert("2026-03-31".to_string(), true);
        marks.insert("2026-04-01".to_string(), true);
        marks.insert("2025-03-05".to_string(), true);

        assert_eq!(worked_days(&marks, 2026, 3), 2);
        assert_eq!(worked_days(&marks, 2026, 4), 1);
        assert_eq!(worked_days(&marks, 2026, 5), 0);
    }

    #[test]
    fn test_worked_days_never_exceed_days_in_month() {
        let mut marks = Marks::new();
        for month in 1..=12 {
            for day in 1..=31 {
                marks.insert(format!("2026-{:02}-{:02}", month, day), true);
            }
        }
        for month in 1..=12 {
            let worked = worked_days(&marks, 2026, month);
            assert!(worked <= days_in_month(2026, month).unwrap(), "month {month}");
        }
        assert_eq!(worked_days(&marks, 2026, 2), 28);
    }

    #[test]
    fn test_eligibility() {
        let config = PayrollConfig::default();
        assert!(!eligible(&config, 25, None));
        assert!(eligible(&config, 26, None));
        assert!(eligible(&config, 27, None));

        let settled = Settlement {
            id: "1".to_string(),
            year: 2026,
            month: 3,
            base_salary: 9000.0,
            target_days: 26,
            worked_days: 26,
            amount: 9000.0,
            settled_at: "2026-04-01T00:00:00+00:00".to_string(),
        };
        assert!(!eligible(&config, 26, Some(&settled)));
    }

    #[test]
    fn test_update_config_validates_and_persists() {
        let f = fixture(false);

        for (base_salary, target_days) in [(0.0, 26), (-1.0, 26), (f64::NAN, 26), (9000.0, 0)] {
            let result = f.service.update_config(UpdatePayrollConfigRequest {
                base_salary,
                target_days,
            });
            assert!(result.unwrap_err().downcast_ref::<PayrollError>().is_some());
        }
        assert_eq!(f.service.get_config(), PayrollConfig::default());

        let response = f
            .service
            .update_config(UpdatePayrollConfigRequest {
                base_salary: 12000.0,
                target_days: 22,
            })
            .unwrap();
        assert_eq!(response.config.target_days, 22);
        assert_eq!(f.service.get_config().base_salary, 12000.0);
    }

    #[tokio::test]
    async fn test_settle_below_target_makes_no_remote_call() {
        let f = fixture(true);
        mark_days(&f.attendance, 3, 25);

        let err = f.service.settle(3).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<PayrollError>(),
            Some(PayrollError::BelowTarget {
                worked_days: 25,
                target_days: 26,
                ..
            })
        ));
        assert_eq!(f.remote.upsert_calls(), 0);
    }

    #[tokio::test]
    async fn test_settle_without_remote_is_unavailable() {
        let f = fixture(false);
        mark_days(&f.attendance, 3, 26);

        let err = f.service.settle(3).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<PayrollError>(),
            Some(PayrollError::RemoteUnavailable)
        ));

        // reads still work
        let summary = f.service.summaries().await.unwrap();
        assert!(!summary.remote_enabled);
        assert!(summary.months.iter().all(|m| m.settlement.is_none()));
        assert!(f.service.list_settlements().await.unwrap().settlements.is_empty());
    }

    #[tokio::test]
    async fn test_settle_twice_overwrites_the_month() {
        let f = fixture(true);
        mark_days(&f.attendance, 3, 26);

        let first = f.service.settle(3).await.unwrap();
        assert_eq!(first.settlement.amount, 9000.0);

        mark_days_from(&f.attendance, 3, 27, 28);
        let second = f.service.settle(3).await.unwrap();
        assert_eq!(second.settlement.worked_days, 28);
        assert_eq!(second.settlement.amount, 9692.31);

        let rows = f.remote.rows();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, first.settlement.id);
        assert_eq!(rows[0].worked_days, 28);
        assert_eq!(f.remote.upsert_calls(), 2);
    }

    #[tokio::test]
    async fn test_settle_rejects_invalid_month() {
        let f = fixture(true);
        for month in [0, 13] {
            let err = f.service.settle(month).await.unwrap_err();
            assert!(matches!(
                err.downcast_ref::<PayrollError>(),
                Some(PayrollError::InvalidMonth(_))
            ));
        }
    }

    #[tokio::test]
    async fn test_remote_failure_is_reported() {
        let f = fixture(true);
        mark_days(&f.attendance, 3, 26);
        f.remote.set_failing(true);

        let err = f.service.settle(3).await.unwrap_err();
        let payroll_err = err.downcast_ref::<PayrollError>().unwrap();
        assert!(matches!(payroll_err, PayrollError::SettlementStore(_)));
        assert!(payroll_err.to_string().contains("connection refused"));

        assert!(f.service.summaries().await.is_err());
    }

    #[tokio::test]
    async fn test_summaries_cover_displayed_months() {
        let f = fixture(true);
        mark_days(&f.attendance, 2, 26);
        f.attendance.toggle("2026-01-05").unwrap();
        f.service.settle(2).await.unwrap();
        mark_days(&f.attendance, 10, 3);

        let summary = f.service.summaries().await.unwrap();
        assert!(summary.remote_enabled);
        assert_eq!(summary.year, 2026);
        let months: Vec<u32> = summary.months.iter().map(|m| m.month).collect();
        assert_eq!(months, (2..=12).collect::<Vec<_>>());

        let february = &summary.months[0];
        assert_eq!(february.worked_days, 26);
        assert_eq!(february.special_worked_days, 4);
        assert!(!february.eligible);
        assert!(february.settlement.is_some());

        let october = summary.months.iter().find(|m| m.month == 10).unwrap();
        assert_eq!(october.worked_days, 3);
        assert_eq!(october.special_worked_days, 3);
        assert_eq!(october.amount, 1038.46);
        assert!(!october.eligible);
    }
}
