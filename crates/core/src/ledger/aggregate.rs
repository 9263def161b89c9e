//! The account aggregate: header, trade log and interest postings.
//!
//! All mutations go through [`AccountLedger`] so the three stay consistent:
//! `account.balance == trades.last().balance_after`, trade sequences are
//! `1..=N`, and every interest record points at its INTEREST trade.

use openbank_shared::types::{Money, TradeId};
use serde::{Deserialize, Serialize};

use super::account::{Account, AccountStatus};
use super::error::LedgerError;
use super::trade::{Trade, TradeCode, balance_as_of};
use crate::calendar::BizDate;
use crate::interest::{Accrual, Interest};

/// An account together with its ledger history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountLedger {
    account: Account,
    trades: Vec<Trade>,
    interests: Vec<Interest>,
}

/// State captured before a mutation so it can be undone.
#[derive(Debug, Clone)]
pub struct Savepoint {
    account: Account,
    trade_count: usize,
    interest_count: usize,
}

impl AccountLedger {
    /// Opens the ledger of a freshly created account with its OPEN entry.
    pub fn open(account: Account) -> Result<Self, LedgerError> {
        let opening = Trade::opening(account.id, account.reg_date);
        if account.balance != opening.balance_after {
            return Err(LedgerError::BalanceMismatch { sequence: 1 });
        }

        Ok(Self {
            account,
            trades: vec![opening],
            interests: Vec::new(),
        })
    }

    /// The account header.
    #[must_use]
    pub fn account(&self) -> &Account {
        &self.account
    }

    /// All trades in sequence order.
    #[must_use]
    pub fn trades(&self) -> &[Trade] {
        &self.trades
    }

    /// All interest postings in posting order.
    #[must_use]
    pub fn interests(&self) -> &[Interest] {
        &self.interests
    }

    /// Current balance.
    #[must_use]
    pub fn balance(&self) -> Money {
        self.account.balance
    }

    /// Balance at the end of `date`.
    #[must_use]
    pub fn balance_as_of(&self, date: BizDate) -> Money {
        balance_as_of(&self.trades, date)
    }

    fn last_trade(&self) -> Result<&Trade, LedgerError> {
        self.trades.last().ok_or(LedgerError::SequenceGap {
            expected: 1,
            actual: 0,
        })
    }

    /// Appends a DEPOSIT, WITHDRAW or INTEREST trade.
    ///
    /// Either the trade is appended and the balance updated, or nothing
    /// changes.
    pub fn append_trade(
        &mut self,
        code: TradeCode,
        trade_date: BizDate,
        amount: Money,
    ) -> Result<Trade, LedgerError> {
        self.account.ensure_active()?;

        match code {
            TradeCode::Open => return Err(LedgerError::InvalidTradeCode(code)),
            TradeCode::Interest if amount.is_negative() => {
                return Err(LedgerError::InvalidAmount(amount));
            }
            TradeCode::Deposit | TradeCode::Withdraw if !amount.is_positive() => {
                return Err(LedgerError::InvalidAmount(amount));
            }
            _ => {}
        }

        let previous = self.last_trade()?;
        if trade_date < previous.trade_date {
            return Err(LedgerError::BackdatedTrade {
                last_trade_date: previous.trade_date,
                trade_date,
            });
        }

        let balance_before = previous.balance_after;
        if code == TradeCode::Withdraw && amount > balance_before {
            return Err(LedgerError::InsufficientBalance {
                balance: balance_before,
                requested: amount,
            });
        }

        let trade = Trade {
            id: TradeId::new(),
            account_id: self.account.id,
            sequence: previous.sequence + 1,
            code,
            trade_date,
            balance_before,
            amount,
            balance_after: code.apply(balance_before, amount)?,
        };
        trade.verify_follows(previous)?;

        self.account.balance = trade.balance_after;
        self.account.last_trade_date = trade_date;
        self.trades.push(trade.clone());

        Ok(trade)
    }

    /// Posts a computed accrual as an INTEREST trade plus its interest record
    /// and advances the last interest date.
    pub fn post_interest(
        &mut self,
        accrual: Accrual,
        trade_date: BizDate,
    ) -> Result<(Trade, Interest), LedgerError> {
        let last_interest_date = self.account.last_interest_date;
        if accrual.from_date != last_interest_date.add_days(1)? {
            return Err(LedgerError::AccrualWindowMismatch {
                from_date: accrual.from_date,
                last_interest_date,
            });
        }
        if accrual.to_date > trade_date {
            return Err(LedgerError::AccrualAfterPosting {
                to_date: accrual.to_date,
                trade_date,
            });
        }

        let to_date = accrual.to_date;
        let trade = self.append_trade(TradeCode::Interest, trade_date, accrual.amount)?;
        let interest = Interest::posted(accrual, self.interests.len() as u64 + 1, &trade);

        self.account.last_interest_date = to_date;
        self.interests.push(interest.clone());

        Ok((trade, interest))
    }

    /// Closes an account holding no funds.
    pub fn close(&mut self, close_date: BizDate) -> Result<(), LedgerError> {
        self.account.ensure_active()?;

        if !self.account.balance.is_zero() {
            return Err(LedgerError::NonZeroBalance(self.account.balance));
        }
        if close_date < self.account.last_trade_date {
            return Err(LedgerError::BackdatedTrade {
                last_trade_date: self.account.last_trade_date,
                trade_date: close_date,
            });
        }

        self.account.status = AccountStatus::Closed;
        self.account.close_date = Some(close_date);
        Ok(())
    }

    /// Replaces the stored password hash.
    pub fn set_password_hash(&mut self, hash: String) {
        self.account.password_hash = Some(hash);
    }

    /// Captures the current state.
    #[must_use]
    pub fn savepoint(&self) -> Savepoint {
        Savepoint {
            account: self.account.clone(),
            trade_count: self.trades.len(),
            interest_count: self.interests.len(),
        }
    }

    /// Restores the state captured by `savepoint`.
    pub fn rollback_to(&mut self, savepoint: Savepoint) {
        self.trades.truncate(savepoint.trade_count);
        self.interests.truncate(savepoint.interest_count);
        self.account = savepoint.account;
    }

    /// Checks every trade appended since `savepoint` and the header.
    pub fn verify_since(&self, savepoint: &Savepoint) -> Result<(), LedgerError> {
        self.verify_from(savepoint.trade_count.max(1))
    }

    /// Checks the whole trade log and the header.
    pub fn verify(&self) -> Result<(), LedgerError> {
        let first = self.trades.first().ok_or(LedgerError::SequenceGap {
            expected: 1,
            actual: 0,
        })?;
        if first.sequence != 1 || first.code != TradeCode::Open {
            return Err(LedgerError::SequenceGap {
                expected: 1,
                actual: first.sequence,
            });
        }
        first.verify()?;
        self.verify_from(1)
    }

    fn verify_from(&self, start: usize) -> Result<(), LedgerError> {
        for pair in self.trades[start.saturating_sub(1)..].windows(2) {
            pair[1].verify_follows(&pair[0])?;
        }

        let last = self.last_trade()?;
        if self.account.balance != last.balance_after {
            return Err(LedgerError::BalanceMismatch {
                sequence: last.sequence,
            });
        }
        Ok(())
    }

    /// Runs `op` as one unit: if it fails, or leaves the ledger violating its
    /// invariants, every change it made is rolled back.
    pub fn apply<T, F>(&mut self, op: F) -> Result<T, LedgerError>
    where
        F: FnOnce(&mut Self) -> Result<T, LedgerError>,
    {
        let savepoint = self.savepoint();

        let outcome = op(self).and_then(|value| {
            self.verify_since(&savepoint)?;
            Ok(value)
        });

        if outcome.is_err() {
            self.rollback_to(savepoint);
        }
        outcome
    }
}
