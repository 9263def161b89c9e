//! Product reference data.
//!
//! Products are immutable once registered. The ledger consumes them through
//! the [`ProductCatalog`] trait and never owns them.

pub mod catalog;
pub mod error;
pub mod types;

pub use catalog::{ProductCatalog, default_products};
pub use error::ProductError;
pub use types::{NewProduct, Product, ProductCode, SubjectCode};
