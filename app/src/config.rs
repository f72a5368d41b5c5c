//! Startup configuration.
//!
//! Every option can be given on the command line or through a `CALENDAR_*`
//! environment variable (a `.env` file is loaded first). The remote
//! settlement store is configured only through `CALENDAR_REMOTE_URL` and
//! `CALENDAR_REMOTE_KEY`, see [`RemoteConfig::from_env`].

use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use thiserror::Error;
use tracing::info;

use crate::backend::domain::models::{SpecialDayTable, SpecialDayTableError};
use crate::backend::domain::GridLayout;
use crate::backend::storage::{JsonConnection, RemoteConfig};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not load special days: {0}")]
    SpecialDays(#[from] SpecialDayTableError),

    #[error("special day table is for {table}, but the calendar year is {configured}")]
    YearMismatch { table: i32, configured: i32 },

    #[error("could not determine a data directory: {0:#}")]
    DataDirectory(anyhow::Error),
}

#[derive(Debug, Parser)]
#[command(name = "holiday-calendar", version, about = "Holiday overtime wall calendar")]
pub struct AppArgs {
    /// Directory holding the marks and payroll setting files
    #[arg(long, env = "CALENDAR_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    #[arg(long, env = "CALENDAR_BIND", default_value = "127.0.0.1:3000")]
    pub bind: SocketAddr,

    /// Calendar year; must match the special day table
    #[arg(long, env = "CALENDAR_YEAR", default_value_t = 2026)]
    pub year: i32,

    /// YAML special day table replacing the built-in 2026 table
    #[arg(long, env = "CALENDAR_SPECIAL_DAYS")]
    pub special_days: Option<PathBuf>,

    /// `six-rows` or `complete-weeks`
    #[arg(long, env = "CALENDAR_GRID_LAYOUT", default_value_t = GridLayout::SixRows)]
    pub grid_layout: GridLayout,

    /// First month printed on the calendar
    #[arg(
        long,
        env = "CALENDAR_FIRST_MONTH",
        default_value_t = 2,
        value_parser = clap::value_parser!(u32).range(1..=12)
    )]
    pub first_month: u32,
}

/// Resolved configuration the backend is built from
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub bind: SocketAddr,
    pub table: SpecialDayTable,
    pub grid_layout: GridLayout,
    pub first_month: u32,
    pub remote: Option<RemoteConfig>,
}

impl AppConfig {
    pub fn from_args(args: AppArgs, remote: Option<RemoteConfig>) -> Result<Self, ConfigError> {
        let table = match &args.special_days {
            Some(path) => SpecialDayTable::load_yaml_file(path)?,
            None => SpecialDayTable::builtin_2026(),
        };
        if table.year() != args.year {
            return Err(ConfigError::YearMismatch {
                table: table.year(),
                configured: args.year,
            });
        }

        let data_dir = match args.data_dir {
            Some(dir) => dir,
            None => JsonConnection::default_directory().map_err(ConfigError::DataDirectory)?,
        };

        info!("📂 Data directory: {}", data_dir.display());
        Ok(Self {
            data_dir,
            bind: args.bind,
            table,
            grid_layout: args.grid_layout,
            first_month: args.first_month,
            remote,
        })
    }
}
