//! Simple interest accrual over calendar-year segments.
//!
//! An accrual window `(last_interest_date, to_date]` is split at year
//! boundaries. Each segment is charged simple interest on the balance the
//! account held at the segment's first day, using an actual/365 day count.

pub mod calculator;
pub mod segment;
pub mod types;

#[cfg(test)]
mod segment_props;

pub use calculator::{DAY_COUNT_BASIS, InterestCalculator};
pub use segment::{AccrualSegment, year_segments};
pub use types::{Accrual, Interest, InterestDetail, PeriodType};
