//! In-memory ledger store and product catalog.
//!
//! This crate provides:
//! - [`MemoryLedgerStore`], a [`LedgerStore`](openbank_core::ledger::LedgerStore)
//!   that serializes mutations per account behind an async read-write lock
//! - [`MemoryProductCatalog`], a [`ProductCatalog`](openbank_core::product::ProductCatalog)
//!   keyed by product code

pub mod catalog;
pub mod ledger;

pub use catalog::MemoryProductCatalog;
pub use ledger::MemoryLedgerStore;
