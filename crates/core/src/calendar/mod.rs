//! Business dates in the 8-digit `YYYYMMDD` form.
//!
//! All ledger dates (registration, trade, interest boundaries) are whole
//! calendar days with no time zone. Day counts come in two flavours that
//! must not be mixed up:
//!
//! - [`BizDate::days_between`] is an exclusive delta: `from + delta == to`.
//! - [`BizDate::span_days`] is an inclusive count of days in `[from, to]`.

use chrono::{Datelike, Duration, Local, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from date parsing and arithmetic.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DateError {
    /// Input is not an existing calendar date in `YYYYMMDD` form.
    #[error("Invalid date format: {0:?} (expected YYYYMMDD)")]
    InvalidDateFormat(String),

    /// Arithmetic left the supported year range 0001-9999.
    #[error("Date out of range: {date} {days:+} days")]
    OutOfRange {
        /// Starting date.
        date: BizDate,
        /// Days that were added.
        days: i64,
    },
}

/// A calendar date serialized as `YYYYMMDD`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BizDate(NaiveDate);

const MIN_YEAR: i32 = 1;
const MAX_YEAR: i32 = 9999;

impl BizDate {
    /// `99991231`, used as the open end of validity windows.
    pub const MAX: Self = match NaiveDate::from_ymd_opt(MAX_YEAR, 12, 31) {
        Some(date) => Self(date),
        None => panic!("9999-12-31 is a valid date"),
    };

    /// Creates a date from its components.
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Result<Self, DateError> {
        NaiveDate::from_ymd_opt(year, month, day)
            .filter(|_| (MIN_YEAR..=MAX_YEAR).contains(&year))
            .map(Self)
            .ok_or_else(|| DateError::InvalidDateFormat(format!("{year:04}{month:02}{day:02}")))
    }

    /// Parses an 8-digit `YYYYMMDD` string.
    pub fn parse(value: &str) -> Result<Self, DateError> {
        let invalid = || DateError::InvalidDateFormat(value.to_string());

        if value.len() != 8 || !value.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }

        let year = value[0..4].parse().map_err(|_| invalid())?;
        let month = value[4..6].parse().map_err(|_| invalid())?;
        let day = value[6..8].parse().map_err(|_| invalid())?;

        Self::from_ymd(year, month, day).map_err(|_| invalid())
    }

    /// Today's date in the local time zone.
    #[must_use]
    pub fn today() -> Self {
        Self(Local::now().date_naive())
    }

    /// Adds (or, for negative `days`, subtracts) calendar days.
    pub fn add_days(self, days: i64) -> Result<Self, DateError> {
        Duration::try_days(days)
            .and_then(|delta| self.0.checked_add_signed(delta))
            .filter(|date| (MIN_YEAR..=MAX_YEAR).contains(&date.year()))
            .map(Self)
            .ok_or(DateError::OutOfRange { date: self, days })
    }

    /// Exclusive day delta: `self.add_days(self.days_between(to)) == to`.
    #[must_use]
    pub fn days_between(self, to: Self) -> i64 {
        (to.0 - self.0).num_days()
    }

    /// Inclusive number of days in `[from, to]`; zero when `to < from`.
    #[must_use]
    pub fn span_days(from: Self, to: Self) -> i64 {
        (from.days_between(to) + 1).max(0)
    }

    /// The calendar year.
    #[must_use]
    pub fn year(self) -> i32 {
        self.0.year()
    }

    /// January 1st of this date's year.
    #[must_use]
    pub fn year_start(self) -> Self {
        Self(self.0.with_ordinal(1).unwrap_or(self.0))
    }

    /// December 31st of this date's year.
    #[must_use]
    pub fn year_end(self) -> Self {
        Self(
            NaiveDate::from_ymd_opt(self.0.year(), 12, 31)
                .unwrap_or(self.0),
        )
    }

    /// Returns the underlying `chrono` date.
    #[must_use]
    pub const fn as_naive(self) -> NaiveDate {
        self.0
    }
}

impl std::fmt::Display for BizDate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:04}{:02}{:02}",
            self.0.year(),
            self.0.month(),
            self.0.day()
        )
    }
}

impl std::str::FromStr for BizDate {
    type Err = DateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for BizDate {
    type Error = DateError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<BizDate> for String {
    fn from(value: BizDate) -> Self {
        value.to_string()
    }
}
