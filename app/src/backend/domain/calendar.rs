//! Calendar domain logic for the wall calendar.
//!
//! Builds Monday-first month pages annotated with holiday-pay metadata.
//! Pages are recomputed on every request from (year, month) and the special
//! day table; nothing here is cached or persisted.

use chrono::{Datelike, NaiveDate};
use shared::{CalendarMonth, CalendarSlot, CalendarYearResponse, Cell, SpecialDaysResponse, WEEKDAY_LABELS};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

use super::models::{date_key, days_in_month, SpecialDayTable};

const SIX_ROW_SLOTS: usize = 42;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CalendarError {
    #[error("invalid month {month} for year {year}, expected 1-12")]
    InvalidMonth { year: i32, month: u32 },
}

/// How far the trailing padding of a page extends
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GridLayout {
    /// Stop at the end of the last week (28, 35 or 42 slots)
    CompleteWeeks,
    /// Always 42 slots so every page has six rows
    #[default]
    SixRows,
}

impl FromStr for GridLayout {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "complete-weeks" | "complete_weeks" => Ok(GridLayout::CompleteWeeks),
            "six-rows" | "six_rows" => Ok(GridLayout::SixRows),
            other => Err(format!(
                "unknown grid layout '{}', expected 'complete-weeks' or 'six-rows'",
                other
            )),
        }
    }
}

impl fmt::Display for GridLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GridLayout::CompleteWeeks => write!(f, "complete-weeks"),
            GridLayout::SixRows => write!(f, "six-rows"),
        }
    }
}

/// Build one calendar page.
///
/// The page starts with `first_weekday` padding slots (Monday = 0), then one
/// cell per day carrying any matching special day, then trailing padding up
/// to a whole number of weeks.
pub fn build_month(
    year: i32,
    month: u32,
    table: &SpecialDayTable,
    layout: GridLayout,
) -> Result<CalendarMonth, CalendarError> {
    let invalid = || CalendarError::InvalidMonth { year, month };
    let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(invalid)?;
    let dim = days_in_month(year, month).ok_or_else(invalid)?;
    let first_weekday = first.weekday().num_days_from_monday();

    let mut slots = Vec::with_capacity(SIX_ROW_SLOTS);
    slots.extend((0..first_weekday).map(|_| CalendarSlot::PaddingBefore));

    for day in 1..=dim {
        let key = date_key(year, month, day);
        let special = table.get(&key).cloned();
        slots.push(CalendarSlot::Day(Cell {
            date_key: key,
            day,
            special,
        }));
    }

    while slots.len() % 7 != 0 {
        slots.push(CalendarSlot::PaddingAfter);
    }
    if layout == GridLayout::SixRows {
        while slots.len() < SIX_ROW_SLOTS {
            slots.push(CalendarSlot::PaddingAfter);
        }
    }

    Ok(CalendarMonth {
        year,
        month,
        first_weekday,
        slots,
    })
}

/// Calendar service bound to the configured year and special day table
#[derive(Clone)]
pub struct CalendarService {
    table: Arc<SpecialDayTable>,
    layout: GridLayout,
    first_display_month: u32,
}

impl CalendarService {
    pub fn new(table: Arc<SpecialDayTable>, layout: GridLayout, first_display_month: u32) -> Self {
        Self {
            table,
            layout,
            first_display_month: first_display_month.clamp(1, 12),
        }
    }

    /// The fixed calendar year
    pub fn year(&self) -> i32 {
        self.table.year()
    }

    pub fn table(&self) -> &SpecialDayTable {
        &self.table
    }

    pub fn layout(&self) -> GridLayout {
        self.layout
    }

    /// Build the page for `month` of the fixed year
    pub fn month(&self, month: u32) -> Result<CalendarMonth, CalendarError> {
        debug!("🗓️ Building calendar page {}/{}", month, self.year());
        build_month(self.year(), month, &self.table, self.layout)
    }

    /// Months printed on the wall calendar, from the first displayed month to December
    pub fn display_months(&self) -> impl Iterator<Item = u32> {
        self.first_display_month..=12
    }

    /// Every page of the wall calendar
    pub fn year_view(&self) -> Result<CalendarYearResponse, CalendarError> {
        let months = self
            .display_months()
            .map(|month| self.month(month))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(CalendarYearResponse {
            year: self.year(),
            months,
        })
    }

    pub fn special_days(&self) -> SpecialDaysResponse {
        SpecialDaysResponse {
            year: self.year(),
            days: self.table.entries(),
        }
    }

    pub fn weekday_labels(&self) -> Vec<String> {
        WEEKDAY_LABELS.iter().map(|label| label.to_string()).collect()
    }
}
