//! CLI argument parsing types.
//!
//! This module provides the command-line interface structure for the zaptecapi binary.

use chrono::{DateTime, NaiveDate, Utc};
use clap::{Args, Parser, Subcommand};

use crate::dates::DateRange;
use crate::error::{Result, ZaptecError};

/// Zaptec API command-line interface.
#[derive(Parser, Debug)]
#[command(name = "zaptecapi", about = "Zaptec API CLI", version)]
pub struct Cli {
    /// Output results as JSON instead of a table.
    #[arg(long, global = true, default_value = "false")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// List charging sessions of the installation.
    Sessions(RangeArgs),

    /// Show per-user totals for the installation.
    Report(RangeArgs),

    /// List chargers.
    Chargers,

    /// List installations.
    Installations,
}

/// Date range selection.
#[derive(Args, Debug, Clone)]
pub struct RangeArgs {
    /// Range start (YYYY-MM-DD or RFC 3339).
    #[arg(long, requires = "to", conflicts_with = "previous_month")]
    pub from: Option<String>,

    /// Range end (YYYY-MM-DD, inclusive, or RFC 3339).
    #[arg(long, requires = "from")]
    pub to: Option<String>,

    /// Use the previous calendar month (default when no range is given).
    #[arg(long)]
    pub previous_month: bool,
}

impl RangeArgs {
    /// Resolve to a range, relative to `today` for the previous-month default.
    ///
    /// # Errors
    ///
    /// Returns [`ZaptecError::InvalidArgument`] for unparseable dates or a
    /// reversed range.
    pub fn resolve(&self, today: NaiveDate) -> Result<DateRange> {
        match (&self.from, &self.to) {
            (Some(from), Some(to)) => {
                DateRange::new(parse_bound(from, false)?, parse_bound(to, true)?)
            }
            _ => Ok(DateRange::previous_month(today)),
        }
    }
}

/// Parse a date bound; a bare end date covers the whole day.
fn parse_bound(value: &str, end_of_day: bool) -> Result<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.with_timezone(&Utc));
    }

    let date = NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| ZaptecError::InvalidArgument(format!("invalid date '{value}'")))?;
    let time = if end_of_day {
        date.and_hms_milli_opt(23, 59, 59, 999)
    } else {
        date.and_hms_opt(0, 0, 0)
    };

    time.map(|t| t.and_utc())
        .ok_or_else(|| ZaptecError::InvalidArgument(format!("invalid date '{value}'")))
}
