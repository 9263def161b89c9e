//! Product validation errors.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::calendar::BizDate;

/// Errors raised while parsing or registering products.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProductError {
    /// Product codes are exactly six ASCII digits.
    #[error("Invalid product code: {0:?}")]
    InvalidCode(String),

    /// Subject code is not one of the known classifications.
    #[error("Unknown subject code: {0:?}")]
    UnknownSubject(String),

    /// Product display name is empty.
    #[error("Product name cannot be empty")]
    EmptyName,

    /// Basic rate cannot be negative.
    #[error("Basic rate cannot be negative: {0}")]
    NegativeRate(Decimal),

    /// Validity window ends before it starts.
    #[error("Invalid validity window: {start} to {end}")]
    InvalidValidity {
        /// Validity start date.
        start: BizDate,
        /// Validity end date.
        end: BizDate,
    },

    /// A product with this code is already registered.
    #[error("Product code already registered: {0}")]
    DuplicateCode(String),
}
