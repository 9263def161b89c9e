//! Calendar-year segmentation of an accrual window.

use serde::{Deserialize, Serialize};

use crate::calendar::BizDate;
use crate::ledger::LedgerError;

/// A contiguous run of days inside one calendar year, bounds inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccrualSegment {
    /// First day.
    pub from_date: BizDate,
    /// Last day.
    pub to_date: BizDate,
}

impl AccrualSegment {
    /// Inclusive day count.
    #[must_use]
    pub fn days(&self) -> i64 {
        BizDate::span_days(self.from_date, self.to_date)
    }
}

/// Splits `(last_interest_date, to_date]` at calendar-year boundaries.
///
/// The first segment starts the day after `last_interest_date`, middle
/// segments cover whole years and the last one is clipped to `to_date`.
pub fn year_segments(
    last_interest_date: BizDate,
    to_date: BizDate,
) -> Result<Vec<AccrualSegment>, LedgerError> {
    if to_date <= last_interest_date {
        return Err(LedgerError::NoAccrualPeriod {
            last_interest_date,
            to_date,
        });
    }

    let mut segments = Vec::new();
    let mut from_date = last_interest_date.add_days(1)?;

    loop {
        let end = from_date.year_end().min(to_date);
        segments.push(AccrualSegment {
            from_date,
            to_date: end,
        });
        if end == to_date {
            break;
        }
        from_date = end.add_days(1)?;
    }

    Ok(segments)
}
