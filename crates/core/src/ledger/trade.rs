//! Trades: the append-only, sequenced ledger entries of an account.

use openbank_shared::types::{AccountId, Money, TradeId};
use serde::{Deserialize, Serialize};

use super::error::LedgerError;
use crate::calendar::BizDate;

/// Kind of balance movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TradeCode {
    /// Opening entry; never moves the balance.
    Open,
    /// Cash in.
    Deposit,
    /// Cash out.
    Withdraw,
    /// Interest posting.
    Interest,
}

impl TradeCode {
    /// Applies `amount` to `before` according to this code's sign.
    pub fn apply(self, before: Money, amount: Money) -> Result<Money, LedgerError> {
        match self {
            Self::Open => Ok(before),
            Self::Deposit | Self::Interest => Ok(before.checked_add(amount)?),
            Self::Withdraw => Ok(before.checked_sub(amount)?),
        }
    }
}

impl std::fmt::Display for TradeCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Open => write!(f, "OPEN"),
            Self::Deposit => write!(f, "DEPOSIT"),
            Self::Withdraw => write!(f, "WITHDRAW"),
            Self::Interest => write!(f, "INTEREST"),
        }
    }
}

/// One immutable ledger entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trade {
    /// Unique identifier.
    pub id: TradeId,
    /// Owning account.
    pub account_id: AccountId,
    /// Per-account sequence, starting at 1 for the opening entry.
    pub sequence: u64,
    /// Kind of movement.
    pub code: TradeCode,
    /// Business date of the trade.
    pub trade_date: BizDate,
    /// Balance before the trade.
    pub balance_before: Money,
    /// Unsigned magnitude of the movement.
    pub amount: Money,
    /// Balance after the trade.
    pub balance_after: Money,
}

impl Trade {
    /// Builds the opening entry of an account.
    #[must_use]
    pub fn opening(account_id: AccountId, trade_date: BizDate) -> Self {
        Self {
            id: TradeId::new(),
            account_id,
            sequence: 1,
            code: TradeCode::Open,
            trade_date,
            balance_before: Money::ZERO,
            amount: Money::ZERO,
            balance_after: Money::ZERO,
        }
    }

    /// Checks this entry on its own: the amount explains the balance
    /// movement and the result is non-negative.
    pub fn verify(&self) -> Result<(), LedgerError> {
        let expected = self.code.apply(self.balance_before, self.amount)?;
        if expected != self.balance_after || self.amount.is_negative() {
            return Err(LedgerError::BalanceMismatch {
                sequence: self.sequence,
            });
        }
        if self.balance_after.is_negative() {
            return Err(LedgerError::NegativeBalance {
                sequence: self.sequence,
                balance: self.balance_after,
            });
        }
        Ok(())
    }

    /// Checks that this entry directly follows `previous`.
    pub fn verify_follows(&self, previous: &Self) -> Result<(), LedgerError> {
        if self.sequence != previous.sequence + 1 {
            return Err(LedgerError::SequenceGap {
                expected: previous.sequence + 1,
                actual: self.sequence,
            });
        }
        if self.balance_before != previous.balance_after {
            return Err(LedgerError::BalanceChainBroken {
                sequence: self.sequence,
                expected: previous.balance_after,
                actual: self.balance_before,
            });
        }
        self.verify()
    }
}

/// Balance immediately after the last trade dated on or before `date`.
///
/// `trades` must be in sequence order, which also keeps them date-ordered.
/// Dates before the first trade have a zero balance.
#[must_use]
pub fn balance_as_of(trades: &[Trade], date: BizDate) -> Money {
    let idx = trades.partition_point(|trade| trade.trade_date <= date);
    idx.checked_sub(1)
        .map_or(Money::ZERO, |last| trades[last].balance_after)
}
