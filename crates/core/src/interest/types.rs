//! Interest domain types.

use openbank_shared::types::{AccountId, InterestId, Money};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calendar::BizDate;
use crate::ledger::Trade;

/// How the accrual period is counted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PeriodType {
    /// Actual days over a 365-day year.
    Daily,
    /// Whole months. Reserved; not produced by the calculator yet.
    Monthly,
}

/// Interest computed for one calendar-year segment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterestDetail {
    /// First day of the segment (inclusive).
    pub from_date: BizDate,
    /// Last day of the segment (inclusive).
    pub to_date: BizDate,
    /// Balance the segment is charged on.
    pub balance: Money,
    /// Inclusive day count.
    pub days: i64,
    /// Month count; always 0 under [`PeriodType::Daily`].
    pub months: u32,
    /// Unrounded interest for the segment.
    pub interest: Decimal,
}

/// Result of an accrual computation, not yet posted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Accrual {
    /// First accrued day (the day after the last interest date).
    pub from_date: BizDate,
    /// Last accrued day.
    pub to_date: BizDate,
    /// Annual rate in percent.
    pub basic_rate: Decimal,
    /// Period counting scheme.
    pub period_type: PeriodType,
    /// One entry per calendar year touched, in date order.
    pub details: Vec<InterestDetail>,
    /// Exact sum of the detail interests.
    pub accrued: Decimal,
    /// `accrued` reduced to minor units; the amount that gets posted.
    pub amount: Money,
}

/// A posted interest record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interest {
    /// Unique identifier.
    pub id: InterestId,
    /// Owning account.
    pub account_id: AccountId,
    /// Per-account posting counter, starting at 1.
    pub sequence: u64,
    /// Sequence of the INTEREST trade that posted this record.
    pub trade_sequence: u64,
    /// Posting date.
    pub trade_date: BizDate,
    /// Annual rate in percent.
    pub basic_rate: Decimal,
    /// Period counting scheme.
    pub period_type: PeriodType,
    /// First accrued day.
    pub from_date: BizDate,
    /// Last accrued day.
    pub to_date: BizDate,
    /// Exact accrued interest.
    pub accrued: Decimal,
    /// Posted amount.
    pub amount: Money,
    /// Per-segment breakdown.
    pub details: Vec<InterestDetail>,
}

impl Interest {
    /// Records `accrual` as posted by `trade`.
    #[must_use]
    pub fn posted(accrual: Accrual, sequence: u64, trade: &Trade) -> Self {
        Self {
            id: InterestId::new(),
            account_id: trade.account_id,
            sequence,
            trade_sequence: trade.sequence,
            trade_date: trade.trade_date,
            basic_rate: accrual.basic_rate,
            period_type: accrual.period_type,
            from_date: accrual.from_date,
            to_date: accrual.to_date,
            accrued: accrual.accrued,
            amount: accrual.amount,
            details: accrual.details,
        }
    }
}
