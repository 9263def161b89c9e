//! Persistence contract for account ledgers.

use async_trait::async_trait;
use openbank_shared::types::{AccountId, Money};

use super::account::{Account, AccountNumber};
use super::aggregate::AccountLedger;
use super::error::LedgerError;
use super::trade::{Trade, TradeCode};
use crate::calendar::BizDate;
use crate::product::SubjectCode;

/// Storage of account ledgers with per-account serialization.
///
/// Implementations must run [`LedgerStore::update`] closures for the same
/// account one at a time and must only persist the ledger when the closure
/// succeeds.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// Hands out the next account serial for `subject`, starting at 1.
    async fn allocate_serial(&self, subject: SubjectCode) -> Result<u64, LedgerError>;

    /// Stores a newly opened ledger.
    ///
    /// Fails with `DuplicateAccount` if the number is already taken.
    async fn insert(&self, ledger: AccountLedger) -> Result<(), LedgerError>;

    /// Maps an account number to its id.
    async fn resolve(&self, number: &AccountNumber) -> Result<Option<AccountId>, LedgerError>;

    /// Reads the account header.
    async fn account(&self, id: AccountId) -> Result<Option<Account>, LedgerError>;

    /// Reads a consistent copy of the whole ledger.
    async fn snapshot(&self, id: AccountId) -> Result<Option<AccountLedger>, LedgerError>;

    /// Runs `op` against the ledger under the account's lock as one
    /// all-or-nothing unit.
    async fn update<F, T>(&self, id: AccountId, op: F) -> Result<T, LedgerError>
    where
        F: FnOnce(&mut AccountLedger) -> Result<T, LedgerError> + Send + 'static,
        T: Send + 'static;

    /// Appends one trade under the account's lock.
    async fn append_trade(
        &self,
        id: AccountId,
        code: TradeCode,
        trade_date: BizDate,
        amount: Money,
    ) -> Result<Trade, LedgerError> {
        self.update(id, move |ledger| ledger.append_trade(code, trade_date, amount))
            .await
    }
}
