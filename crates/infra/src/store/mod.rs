//! Catalog record store boundary.
//!
//! `CatalogStore` is the capability set the services need from persistence.
//! Backends map their own failures (SQL errors, poisoned locks) to
//! `CatalogError::Unexpected` before returning.

use std::sync::Arc;

use async_trait::async_trait;

use catalog_core::{CatalogResult, CategoryId, ProductId};
use catalog_products::{Category, NewCategory, Product, ProductInput};

pub mod in_memory;
pub mod postgres;

#[cfg(test)]
pub(crate) mod recording;

pub use in_memory::InMemoryCatalogStore;
pub use postgres::PostgresCatalogStore;

/// Decision applied to a product's current stock inside [`CatalogStore::modify_stock`].
///
/// Returns the stock to persist, or an error that aborts the write.
pub type StockRule<'a> = &'a (dyn Fn(i64) -> CatalogResult<i64> + Send + Sync);

#[async_trait]
pub trait CatalogStore: Send + Sync {
    async fn find_product_by_id(&self, id: ProductId) -> CatalogResult<Option<Product>>;

    /// Persist a new product; the store assigns its id and timestamps.
    async fn insert_product(&self, input: ProductInput) -> CatalogResult<Product>;

    /// Overwrite an existing product. `ProductNotFound` if the row is gone.
    async fn save_product(&self, product: Product) -> CatalogResult<Product>;

    async fn delete_product_by_id(&self, id: ProductId) -> CatalogResult<()>;

    async fn exists_product_by_id(&self, id: ProductId) -> CatalogResult<bool>;

    /// Products whose name contains `keyword`, ignoring case. Ordered by id.
    async fn find_products_by_name_containing_ignore_case(
        &self,
        keyword: &str,
    ) -> CatalogResult<Vec<Product>>;

    /// Every product, ordered by id.
    async fn find_all_products(&self) -> CatalogResult<Vec<Product>>;

    /// Atomic read-modify-write of one product's stock.
    ///
    /// The current stock is read and `rule` applied while the record is locked
    /// against other writers; the value it returns is persisted and returned.
    /// If `rule` fails nothing is written and its error is returned as-is.
    /// `ProductNotFound` if the product does not exist (nothing is written).
    async fn modify_stock(&self, id: ProductId, rule: StockRule<'_>) -> CatalogResult<i64>;

    async fn find_category_by_id(&self, id: CategoryId) -> CatalogResult<Option<Category>>;

    /// Persist a new category. A duplicate name is `InvalidInput`.
    async fn insert_category(&self, category: NewCategory) -> CatalogResult<Category>;

    /// Every category, ordered by id.
    async fn find_all_categories(&self) -> CatalogResult<Vec<Category>>;
}

#[async_trait]
impl<S> CatalogStore for Arc<S>
where
    S: CatalogStore + ?Sized,
{
    async fn find_product_by_id(&self, id: ProductId) -> CatalogResult<Option<Product>> {
        (**self).find_product_by_id(id).await
    }

    async fn insert_product(&self, input: ProductInput) -> CatalogResult<Product> {
        (**self).insert_product(input).await
    }

    async fn save_product(&self, product: Product) -> CatalogResult<Product> {
        (**self).save_product(product).await
    }

    async fn delete_product_by_id(&self, id: ProductId) -> CatalogResult<()> {
        (**self).delete_product_by_id(id).await
    }

    async fn exists_product_by_id(&self, id: ProductId) -> CatalogResult<bool> {
        (**self).exists_product_by_id(id).await
    }

    async fn find_products_by_name_containing_ignore_case(
        &self,
        keyword: &str,
    ) -> CatalogResult<Vec<Product>> {
        (**self).find_products_by_name_containing_ignore_case(keyword).await
    }

    async fn find_all_products(&self) -> CatalogResult<Vec<Product>> {
        (**self).find_all_products().await
    }

    async fn modify_stock(&self, id: ProductId, rule: StockRule<'_>) -> CatalogResult<i64> {
        (**self).modify_stock(id, rule).await
    }

    async fn find_category_by_id(&self, id: CategoryId) -> CatalogResult<Option<Category>> {
        (**self).find_category_by_id(id).await
    }

    async fn insert_category(&self, category: NewCategory) -> CatalogResult<Category> {
        (**self).insert_category(category).await
    }

    async fn find_all_categories(&self) -> CatalogResult<Vec<Category>> {
        (**self).find_all_categories().await
    }
}
