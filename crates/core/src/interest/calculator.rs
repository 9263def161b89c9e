//! Interest calculator.

use openbank_shared::types::{Money, MoneyError, RoundingPolicy};
use rust_decimal::Decimal;

use super::segment::year_segments;
use super::types::{Accrual, InterestDetail, PeriodType};
use crate::calendar::BizDate;
use crate::ledger::{LedgerError, Trade, balance_as_of};

/// Day-count denominator. Leap years are not special-cased, so a full leap
/// year accrues 366/365 of the nominal rate.
pub const DAY_COUNT_BASIS: i64 = 365;

/// Computes segmented simple interest from an account's trade history.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InterestCalculator {
    rounding: RoundingPolicy,
}

impl InterestCalculator {
    /// Creates a calculator posting amounts rounded with `rounding`.
    #[must_use]
    pub const fn new(rounding: RoundingPolicy) -> Self {
        Self { rounding }
    }

    /// The rounding policy applied to the posted total.
    #[must_use]
    pub const fn rounding(&self) -> RoundingPolicy {
        self.rounding
    }

    /// `balance * rate% * days / 365`, unrounded.
    ///
    /// The numerator is formed before dividing so whole-year segments come
    /// out exact.
    pub fn segment_interest(
        balance: Money,
        basic_rate: Decimal,
        days: i64,
    ) -> Result<Decimal, LedgerError> {
        let denominator = Decimal::from(100 * DAY_COUNT_BASIS);

        balance
            .to_decimal()
            .checked_mul(basic_rate)
            .and_then(|v| v.checked_mul(Decimal::from(days)))
            .and_then(|v| v.checked_div(denominator))
            .ok_or(LedgerError::AmountOverflow(MoneyError::Overflow))
    }

    /// Accrues interest over `(last_interest_date, to_date]`.
    ///
    /// Each segment is charged on the balance after the last trade dated on
    /// or before the segment's first day; balance changes inside a segment
    /// are not prorated.
    ///
    /// # Errors
    ///
    /// `NoAccrualPeriod` when `to_date <= last_interest_date`.
    pub fn accrue(
        &self,
        trades: &[Trade],
        basic_rate: Decimal,
        last_interest_date: BizDate,
        to_date: BizDate,
    ) -> Result<Accrual, LedgerError> {
        let segments = year_segments(last_interest_date, to_date)?;

        let mut details = Vec::with_capacity(segments.len());
        let mut accrued = Decimal::ZERO;

        for segment in &segments {
            let balance = balance_as_of(trades, segment.from_date);
            let days = segment.days();
            let interest = Self::segment_interest(balance, basic_rate, days)?;

            accrued = accrued
                .checked_add(interest)
                .ok_or(LedgerError::AmountOverflow(MoneyError::Overflow))?;

            details.push(InterestDetail {
                from_date: segment.from_date,
                to_date: segment.to_date,
                balance,
                days,
                months: 0,
                interest,
            });
        }

        Ok(Accrual {
            from_date: segments[0].from_date,
            to_date,
            basic_rate,
            period_type: PeriodType::Daily,
            details,
            accrued,
            amount: Money::from_decimal(accrued, self.rounding)?,
        })
    }
}
