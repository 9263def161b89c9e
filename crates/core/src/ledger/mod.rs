//! Account ledger logic.
//!
//! This module implements the core bookkeeping of deposit accounts:
//! - Account headers and account numbers
//! - Sequenced trades with chained balances
//! - The `AccountLedger` aggregate and its all-or-nothing mutations
//! - The storage contract
//! - Error types for ledger operations

pub mod account;
pub mod aggregate;
pub mod error;
pub mod store;
pub mod trade;

#[cfg(test)]
mod ledger_props;

pub use account::{Account, AccountNumber, AccountStatus, MAX_SERIAL, TaxationCode};
pub use aggregate::{AccountLedger, Savepoint};
pub use error::{ErrorKind, LedgerError};
pub use store::LedgerStore;
pub use trade::{Trade, TradeCode, balance_as_of};
