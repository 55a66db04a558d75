//! Test store that records which products were read and how many writes happened.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use catalog_core::{CatalogResult, CategoryId, ProductId};
use catalog_products::{Category, NewCategory, Product, ProductInput};

use super::{CatalogStore, InMemoryCatalogStore, StockRule};

#[derive(Debug, Default)]
pub(crate) struct RecordingStore {
    inner: InMemoryCatalogStore,
    product_reads: Mutex<Vec<ProductId>>,
    writes: AtomicUsize,
}

impl RecordingStore {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Product ids looked up by id, in call order.
    pub(crate) fn product_reads(&self) -> Vec<ProductId> {
        self.product_reads.lock().unwrap().clone()
    }

    /// Successful product/stock/category writes.
    pub(crate) fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Forget the reads and writes made while seeding a test.
    pub(crate) fn reset(&self) {
        self.product_reads.lock().unwrap().clear();
        self.writes.store(0, Ordering::SeqCst);
    }

    fn wrote<T>(&self, result: CatalogResult<T>) -> CatalogResult<T> {
        if result.is_ok() {
            self.writes.fetch_add(1, Ordering::SeqCst);
        }
        result
    }
}

#[async_trait]
impl CatalogStore for RecordingStore {
    async fn find_product_by_id(&self, id: ProductId) -> CatalogResult<Option<Product>> {
        self.product_reads.lock().unwrap().push(id);
        self.inner.find_product_by_id(id).await
    }

    async fn insert_product(&self, input: ProductInput) -> CatalogResult<Product> {
        let result = self.inner.insert_product(input).await;
        self.wrote(result)
    }

    async fn save_product(&self, product: Product) -> CatalogResult<Product> {
        let result = self.inner.save_product(product).await;
        self.wrote(result)
    }

    async fn delete_product_by_id(&self, id: ProductId) -> CatalogResult<()> {
        let result = self.inner.delete_product_by_id(id).await;
        self.wrote(result)
    }

    async fn exists_product_by_id(&self, id: ProductId) -> CatalogResult<bool> {
        self.inner.exists_product_by_id(id).await
    }

    async fn find_products_by_name_containing_ignore_case(
        &self,
        keyword: &str,
    ) -> CatalogResult<Vec<Product>> {
        self.inner
            .find_products_by_name_containing_ignore_case(keyword)
            .await
    }

    async fn find_all_products(&self) -> CatalogResult<Vec<Product>> {
        self.inner.find_all_products().await
    }

    async fn modify_stock(&self, id: ProductId, rule: StockRule<'_>) -> CatalogResult<i64> {
        let result = self.inner.modify_stock(id, rule).await;
        self.wrote(result)
    }

    async fn find_category_by_id(&self, id: CategoryId) -> CatalogResult<Option<Category>> {
        self.inner.find_category_by_id(id).await
    }

    async fn insert_category(&self, category: NewCategory) -> CatalogResult<Category> {
        let result = self.inner.insert_category(category).await;
        self.wrote(result)
    }

    async fn find_all_categories(&self) -> CatalogResult<Vec<Category>> {
        self.inner.find_all_categories().await
    }
}
