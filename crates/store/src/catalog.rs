//! Product catalog held in memory.

use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tracing::debug;

use openbank_core::calendar::BizDate;
use openbank_core::ledger::LedgerError;
use openbank_core::product::{
    NewProduct, Product, ProductCatalog, ProductCode, ProductError, default_products,
};

/// Products keyed by code.
#[derive(Debug, Default)]
pub struct MemoryProductCatalog {
    products: DashMap<ProductCode, Product>,
}

impl MemoryProductCatalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a catalog holding the standard products, valid from
    /// `start_date`.
    pub fn seeded(start_date: BizDate) -> Result<Self, LedgerError> {
        let catalog = Self::new();
        for product in default_products(start_date) {
            catalog.insert(product)?;
        }
        Ok(catalog)
    }

    fn insert(&self, product: NewProduct) -> Result<Product, LedgerError> {
        let product = product.validate()?;

        match self.products.entry(product.code.clone()) {
            Entry::Occupied(_) => Err(ProductError::DuplicateCode(product.code.to_string()).into()),
            Entry::Vacant(slot) => {
                debug!(product_code = %product.code, "Product stored");
                Ok(slot.insert(product).clone())
            }
        }
    }

    /// Number of registered products.
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Returns true if no product is registered.
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

#[async_trait]
impl ProductCatalog for MemoryProductCatalog {
    async fn find_by_code(&self, code: &ProductCode) -> Result<Option<Product>, LedgerError> {
        Ok(self.products.get(code).map(|entry| entry.value().clone()))
    }

    async fn register(&self, product: NewProduct) -> Result<Product, LedgerError> {
        self.insert(product)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use openbank_core::product::SubjectCode;

    fn d(s: &str) -> BizDate {
        BizDate::parse(s).unwrap()
    }

    #[tokio::test]
    async fn test_seeded_catalog() {
        let catalog = MemoryProductCatalog::seeded(d("20000101")).unwrap();
        assert_eq!(catalog.len(), 3);

        let regular = catalog
            .find_by_code(&ProductCode::parse("130999").unwrap())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(regular.subject, SubjectCode::Regular);
        assert_eq!(regular.basic_rate.to_string(), "1.2");
        assert_eq!(regular.end_date, BizDate::MAX);
    }

    #[tokio::test]
    async fn test_register_rejects_duplicates() {
        let catalog = MemoryProductCatalog::seeded(d("20000101")).unwrap();
        let duplicate = default_products(d("20100101")).remove(0);

        let err = catalog.register(duplicate).await.unwrap_err();
        assert!(matches!(
            err,
            LedgerError::Product(ProductError::DuplicateCode(ref code)) if code == "130999"
        ));
        assert_eq!(catalog.len(), 3);
    }

    #[tokio::test]
    async fn test_unknown_code_is_absent() {
        let catalog = MemoryProductCatalog::new();
        assert!(catalog.is_empty());
        assert!(
            catalog
                .find_by_code(&ProductCode::parse("999999").unwrap())
                .await
                .unwrap()
                .is_none()
        );
    }
}
