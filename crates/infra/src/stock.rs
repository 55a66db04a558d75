//! Stock gateway: the only component that reads or writes product stock on
//! behalf of orders.
//!
//! Adjustments go through [`CatalogStore::modify_stock`] so the read, the
//! sufficiency check and the write happen under one record lock. Batch
//! validation only reads.

use catalog_core::{CatalogError, CatalogResult, ProductId};
use catalog_products::{OrderItem, consume, ensure_available, ensure_valid_quantity};

use crate::store::CatalogStore;

#[derive(Debug, Clone)]
pub struct StockGateway<S> {
    store: S,
}

impl<S> StockGateway<S>
where
    S: CatalogStore,
{
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Take `quantity` units out of a product's stock.
    ///
    /// Fails with `InsufficientStock` when the result would go below zero; the
    /// stored stock is then unchanged.
    pub async fn adjust(&self, product_id: ProductId, quantity: i64) -> CatalogResult<()> {
        ensure_valid_quantity(product_id, quantity)?;

        let new_stock = self
            .store
            .modify_stock(product_id, &|current: i64| consume(product_id, current, quantity))
            .await?;

        tracing::info!(%product_id, quantity, new_stock, "stock adjusted");
        Ok(())
    }

    /// Check that every item could be fulfilled from current stock.
    ///
    /// Items are checked in order and the first failure is returned; later
    /// items are not looked up. Nothing is reserved or written.
    pub async fn validate_batch(&self, items: &[OrderItem]) -> CatalogResult<()> {
        for item in items {
            ensure_valid_quantity(item.product_id, item.quantity)?;

            let product = self
                .store
                .find_product_by_id(item.product_id)
                .await?
                .ok_or(CatalogError::ProductNotFound(item.product_id))?;

            ensure_available(item.product_id, product.stock, item.quantity)?;
        }
        Ok(())
    }
}
