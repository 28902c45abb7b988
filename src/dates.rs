//! Date ranges for history queries.

use chrono::{DateTime, Datelike, NaiveDate, TimeDelta, Utc};

use crate::error::{Result, ZaptecError};

const ZULU_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";
const LOCAL_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f";

/// An inclusive `[from, to]` time range with `from <= to`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    from: DateTime<Utc>,
    to: DateTime<Utc>,
}

impl DateRange {
    /// # Errors
    ///
    /// Returns [`ZaptecError::InvalidArgument`] if `from` is after `to`.
    pub fn new(from: DateTime<Utc>, to: DateTime<Utc>) -> Result<Self> {
        if from > to {
            return Err(ZaptecError::InvalidArgument(format!(
                "range start {from} is after range end {to}"
            )));
        }
        Ok(Self { from, to })
    }

    /// The calendar month before the one containing `today`: from the first
    /// day at 00:00:00.001 to the last day at 23:59:59.999.
    pub fn previous_month(today: NaiveDate) -> Self {
        let first_of_current = today.with_day(1).unwrap_or(today);
        let last_of_previous = first_of_current - TimeDelta::days(1);
        let first_of_previous = last_of_previous.with_day(1).unwrap_or(last_of_previous);

        let from = first_of_previous
            .and_hms_milli_opt(0, 0, 0, 1)
            .unwrap_or_default()
            .and_utc();
        let to = last_of_previous
            .and_hms_milli_opt(23, 59, 59, 999)
            .unwrap_or_default()
            .and_utc();

        Self { from, to }
    }

    pub fn from(&self) -> DateTime<Utc> {
        self.from
    }

    pub fn to(&self) -> DateTime<Utc> {
        self.to
    }

    /// English name of the month the range starts in.
    pub fn month_name(&self) -> String {
        self.from.format("%B").to_string()
    }

    /// `from` as `YYYY-MM-DDThh:mm:ss.sssZ`.
    pub fn from_zulu(&self) -> String {
        self.from.format(ZULU_FORMAT).to_string()
    }

    pub fn to_zulu(&self) -> String {
        self.to.format(ZULU_FORMAT).to_string()
    }

    /// `from` as `YYYY-MM-DDThh:mm:ss.sss`, without zone suffix.
    pub fn from_local(&self) -> String {
        self.from.format(LOCAL_FORMAT).to_string()
    }

    pub fn to_local(&self) -> String {
        self.to.format(LOCAL_FORMAT).to_string()
    }
}
