//! Account service: the operations callers use to open and run accounts.
//!
//! [`AccountService`] composes the ledger store, the product catalog and the
//! interest calculator. Every mutating operation runs as one locked,
//! all-or-nothing unit against a single account.

mod service;
mod types;

pub use service::AccountService;
pub use types::{
    CloseAccountRequest, OpenAccountRequest, PayInterestRequest, SetPasswordRequest, TradeRequest,
};
