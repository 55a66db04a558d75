//! Catalog service: product CRUD, search, categories, and the stock entry points.

use chrono::Utc;

use catalog_core::{CatalogError, CatalogResult, CategoryId, ProductId};
use catalog_products::{
    Category, NewCategory, OrderItem, Product, ProductInput, search_keyword,
};

use crate::stock::StockGateway;
use crate::store::CatalogStore;

#[derive(Debug, Clone)]
pub struct CatalogService<S> {
    store: S,
    stock: StockGateway<S>,
}

impl<S> CatalogService<S>
where
    S: CatalogStore + Clone,
{
    pub fn new(store: S) -> Self {
        Self {
            stock: StockGateway::new(store.clone()),
            store,
        }
    }

    pub async fn create_product(&self, input: ProductInput) -> CatalogResult<Product> {
        input.validate()?;
        self.ensure_category(input.category_id).await?;

        let product = self.store.insert_product(input).await?;
        tracing::info!(product_id = %product.id, name = %product.name, "product created");
        Ok(product)
    }

    /// Replace every field of an existing product, stock included.
    pub async fn update_product(
        &self,
        id: ProductId,
        input: ProductInput,
    ) -> CatalogResult<Product> {
        input.validate()?;
        let mut product = self.get_product(id).await?;
        self.ensure_category(input.category_id).await?;

        product.replace_with(input, Utc::now());
        let product = self.store.save_product(product).await?;
        tracing::info!(product_id = %product.id, "product updated");
        Ok(product)
    }

    pub async fn delete_product(&self, id: ProductId) -> CatalogResult<()> {
        if !self.store.exists_product_by_id(id).await? {
            return Err(CatalogError::ProductNotFound(id));
        }
        self.store.delete_product_by_id(id).await?;
        tracing::info!(product_id = %id, "product deleted");
        Ok(())
    }

    pub async fn get_product(&self, id: ProductId) -> CatalogResult<Product> {
        self.store
            .find_product_by_id(id)
            .await?
            .ok_or(CatalogError::ProductNotFound(id))
    }

    /// Products whose name contains `keyword`, ignoring case. A missing or
    /// blank keyword returns every product.
    pub async fn search_products(&self, keyword: Option<&str>) -> CatalogResult<Vec<Product>> {
        match search_keyword(keyword) {
            Some(keyword) => {
                self.store
                    .find_products_by_name_containing_ignore_case(keyword)
                    .await
            }
            None => self.store.find_all_products().await,
        }
    }

    pub async fn get_all_products(&self) -> CatalogResult<Vec<Product>> {
        self.store.find_all_products().await
    }

    pub async fn adjust_stock(&self, id: ProductId, quantity: i64) -> CatalogResult<()> {
        self.stock.adjust(id, quantity).await
    }

    pub async fn validate_stock(&self, items: &[OrderItem]) -> CatalogResult<()> {
        self.stock.validate_batch(items).await
    }

    pub async fn create_category(&self, category: NewCategory) -> CatalogResult<Category> {
        category.validate()?;
        let category = self.store.insert_category(category).await?;
        tracing::info!(category_id = %category.id, name = %category.name, "category created");
        Ok(category)
    }

    pub async fn list_categories(&self) -> CatalogResult<Vec<Category>> {
        self.store.find_all_categories().await
    }

    async fn ensure_category(&self, id: Option<CategoryId>) -> CatalogResult<()> {
        let Some(id) = id else {
            return Ok(());
        };
        match self.store.find_category_by_id(id).await? {
            Some(_) => Ok(()),
            None => Err(CatalogError::CategoryNotFound(id)),
        }
    }
}
