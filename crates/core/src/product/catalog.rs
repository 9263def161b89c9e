//! Product catalog contract.

use async_trait::async_trait;
use rust_decimal::Decimal;

use super::types::{NewProduct, Product, ProductCode, SubjectCode};
use crate::calendar::BizDate;
use crate::ledger::LedgerError;

/// Read-mostly lookup of products by code.
#[async_trait]
pub trait ProductCatalog: Send + Sync {
    /// Finds a product by its code.
    async fn find_by_code(&self, code: &ProductCode) -> Result<Option<Product>, LedgerError>;

    /// Validates and registers a new product.
    ///
    /// Fails with `ProductError::DuplicateCode` if the code is taken.
    async fn register(&self, product: NewProduct) -> Result<Product, LedgerError>;
}

/// The standard product line-up, valid from `start_date` with no end.
#[must_use]
pub fn default_products(start_date: BizDate) -> Vec<NewProduct> {
    let product = |code: &str, subject, name: &str, basic_rate| NewProduct {
        code: ProductCode(code.to_string()),
        subject,
        name: name.to_string(),
        basic_rate,
        start_date,
        end_date: None,
    };

    vec![
        product(
            "130999",
            SubjectCode::Regular,
            "Online Regular Savings",
            Decimal::new(12, 1),
        ),
        product(
            "140001",
            SubjectCode::FixedDeposit,
            "Fixed Deposit",
            Decimal::new(25, 1),
        ),
        product(
            "150001",
            SubjectCode::Installment,
            "Installment Savings",
            Decimal::new(35, 1),
        ),
    ]
}
