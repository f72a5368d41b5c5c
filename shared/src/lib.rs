use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Attendance marks keyed by `YYYY-MM-DD`. `true` means the day was worked.
pub type Marks = BTreeMap<String, bool>;

/// Monday-first weekday header labels for a calendar page
pub const WEEKDAY_LABELS: [&str; 7] = ["周一", "周二", "周三", "周四", "周五", "周六", "周日"];

/// Pay classification of a statutory holiday
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PayMultiplier {
    /// Statutory holiday paying twice the daily rate
    Double,
    /// Spring Festival window paying three times the daily rate
    Triple,
}

impl PayMultiplier {
    /// Numeric multiplier applied to the daily rate
    pub fn factor(&self) -> u32 {
        match self {
            PayMultiplier::Double => 2,
            PayMultiplier::Triple => 3,
        }
    }

    /// Label printed on the calendar tag
    pub fn label(&self) -> &'static str {
        match self {
            PayMultiplier::Double => "双薪",
            PayMultiplier::Triple => "三薪",
        }
    }
}

/// A holiday-pay date from the special day table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecialDay {
    pub pay: PayMultiplier,
    pub festival: String,
}

/// One day of a calendar page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    /// Canonical `YYYY-MM-DD` key
    pub date_key: String,
    /// Day of month, 1-based
    pub day: u32,
    pub special: Option<SpecialDay>,
}

/// A slot of the 7-column calendar grid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CalendarSlot {
    /// Empty padding before the first day of the month
    PaddingBefore,
    /// Actual day within the month
    Day(Cell),
    /// Empty padding after the last day, completing the grid
    PaddingAfter,
}

impl CalendarSlot {
    pub fn cell(&self) -> Option<&Cell> {
        match self {
            CalendarSlot::Day(cell) => Some(cell),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.cell().is_none()
    }
}

/// One calendar page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarMonth {
    pub year: i32,
    pub month: u32,
    /// Column of the first day, Monday = 0 ... Sunday = 6
    pub first_weekday: u32,
    pub slots: Vec<CalendarSlot>,
}

/// Every page shown on the wall calendar
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarYearResponse {
    pub year: i32,
    pub months: Vec<CalendarMonth>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeekdayLabelsResponse {
    pub labels: Vec<String>,
}

/// Flattened special day table entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpecialDayEntry {
    pub date_key: String,
    pub pay: PayMultiplier,
    pub festival: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpecialDaysResponse {
    pub year: i32,
    pub days: Vec<SpecialDayEntry>,
}

/// Counters shown in the page header
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarksSummary {
    /// Days marked as worked
    pub total: usize,
    /// Marked days that fall on a double- or triple-pay date
    pub special_marked: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarksResponse {
    pub marks: Marks,
    pub summary: MarksSummary,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToggleMarkRequest {
    pub date_key: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToggleMarkResponse {
    pub date_key: String,
    pub marked: bool,
    pub summary: MarksSummary,
}

/// Clearing every mark needs an explicit confirmation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResetMarksRequest {
    #[serde(default)]
    pub confirm: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResetMarksResponse {
    pub success_message: String,
}

/// Backup document written by export and accepted by import
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportSnapshot {
    pub version: u32,
    pub year: i32,
    /// RFC 3339 timestamp of the export
    #[serde(rename = "exportedAt")]
    pub exported_at: String,
    pub marks: Marks,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportMarksResponse {
    pub imported: usize,
    pub summary: MarksSummary,
    pub success_message: String,
}

/// Salary settings used by the payroll calculation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PayrollConfig {
    pub base_salary: f64,
    pub target_days: u32,
}

impl Default for PayrollConfig {
    fn default() -> Self {
        Self {
            base_salary: 9000.0,
            target_days: 26,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdatePayrollConfigRequest {
    pub base_salary: f64,
    pub target_days: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdatePayrollConfigResponse {
    pub config: PayrollConfig,
    pub success_message: String,
}

/// A finalized monthly payroll record, unique per (year, month)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settlement {
    pub id: String,
    pub year: i32,
    pub month: u32,
    pub base_salary: f64,
    pub target_days: u32,
    pub worked_days: u32,
    pub amount: f64,
    /// RFC 3339 timestamp of the latest settlement
    pub settled_at: String,
}

/// Payroll state of one month as shown next to the calendar page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthPayrollSummary {
    pub month: u32,
    pub worked_days: u32,
    pub special_worked_days: u32,
    pub target_days: u32,
    pub amount: f64,
    pub eligible: bool,
    pub settlement: Option<Settlement>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayrollSummaryResponse {
    pub year: i32,
    pub config: PayrollConfig,
    pub remote_enabled: bool,
    pub months: Vec<MonthPayrollSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettleMonthRequest {
    pub month: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettleMonthResponse {
    pub settlement: Settlement,
    pub success_message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettlementListResponse {
    pub year: i32,
    pub settlements: Vec<Settlement>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusResponse {
    pub year: i32,
    pub remote_enabled: bool,
}

/// Body of every non-2xx API response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
