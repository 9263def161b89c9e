//! Account ledger and interest accrual engine for OpenBank deposit accounts.
//!
//! This crate contains pure business logic with NO storage engine or web
//! dependencies. Persistence and product reference data are reached through
//! the [`ledger::LedgerStore`] and [`product::ProductCatalog`] traits.
//!
//! # Modules
//!
//! - `calendar` - 8-digit business dates and day arithmetic
//! - `product` - Product reference data and catalog contract
//! - `ledger` - Account aggregate, append-only trade log, store contract
//! - `interest` - Calendar-year segmented simple interest accrual
//! - `account` - Account service orchestrating the operations above
//! - `auth` - Account password hashing

pub mod account;
pub mod auth;
pub mod calendar;
pub mod interest;
pub mod ledger;
pub mod product;
