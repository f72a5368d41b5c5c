pub mod date_key;
pub mod settlement;
pub mod special_days;

pub use date_key::{date_key, days_in_month, parse_date_key};
pub use settlement::SettlementDraft;
pub use special_days::{SpecialDayTable, SpecialDayTableError};
