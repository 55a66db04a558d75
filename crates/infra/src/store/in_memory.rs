use std::collections::BTreeMap;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::Utc;

use catalog_core::{CatalogError, CatalogResult, CategoryId, Entity, ProductId};
use catalog_products::{Category, NewCategory, Product, ProductInput};

use super::{CatalogStore, StockRule};

/// Rows of one entity type keyed by id, plus the id counter.
#[derive(Debug)]
struct Table<E: Entity> {
    rows: BTreeMap<E::Id, E>,
    last_id: i64,
}

impl<E: Entity> Default for Table<E> {
    fn default() -> Self {
        Self {
            rows: BTreeMap::new(),
            last_id: 0,
        }
    }
}

impl<E> Table<E>
where
    E: Entity + Clone,
{
    fn get(&self, id: E::Id) -> Option<E> {
        self.rows.get(&id).cloned()
    }

    /// Assign the next id and store the row `build` makes from it.
    fn insert_with(&mut self, build: impl FnOnce(i64) -> E) -> E {
        self.last_id += 1;
        let row = build(self.last_id);
        self.rows.insert(row.id(), row.clone());
        row
    }

    fn list(&self) -> Vec<E> {
        self.rows.values().cloned().collect()
    }
}

/// In-memory catalog store for tests/dev.
///
/// Stock writes hold the products write lock across read, rule and write, so
/// concurrent `modify_stock` calls on one product are serialized.
#[derive(Debug, Default)]
pub struct InMemoryCatalogStore {
    products: RwLock<Table<Product>>,
    categories: RwLock<Table<Category>>,
}

impl InMemoryCatalogStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned() -> CatalogError {
    CatalogError::unexpected("lock poisoned")
}

#[async_trait]
impl CatalogStore for InMemoryCatalogStore {
    async fn find_product_by_id(&self, id: ProductId) -> CatalogResult<Option<Product>> {
        let table = self.products.read().map_err(|_| poisoned())?;
        Ok(table.get(id))
    }

    async fn insert_product(&self, input: ProductInput) -> CatalogResult<Product> {
        let mut table = self.products.write().map_err(|_| poisoned())?;
        let now = Utc::now();
        Ok(table.insert_with(|id| Product::from_input(ProductId::new(id), input, now)))
    }

    async fn save_product(&self, product: Product) -> CatalogResult<Product> {
        let mut table = self.products.write().map_err(|_| poisoned())?;
        match table.rows.get_mut(&product.id) {
            Some(row) => {
                *row = product.clone();
                Ok(product)
            }
            None => Err(CatalogError::ProductNotFound(product.id)),
        }
    }

    async fn delete_product_by_id(&self, id: ProductId) -> CatalogResult<()> {
        let mut table = self.products.write().map_err(|_| poisoned())?;
        table.rows.remove(&id);
        Ok(())
    }

    async fn exists_product_by_id(&self, id: ProductId) -> CatalogResult<bool> {
        let table = self.products.read().map_err(|_| poisoned())?;
        Ok(table.rows.contains_key(&id))
    }

    async fn find_products_by_name_containing_ignore_case(
        &self,
        keyword: &str,
    ) -> CatalogResult<Vec<Product>> {
        let table = self.products.read().map_err(|_| poisoned())?;
        Ok(table
            .rows
            .values()
            .filter(|p| p.name_contains(keyword))
            .cloned()
            .collect())
    }

    async fn find_all_products(&self) -> CatalogResult<Vec<Product>> {
        let table = self.products.read().map_err(|_| poisoned())?;
        Ok(table.list())
    }

    async fn modify_stock(&self, id: ProductId, rule: StockRule<'_>) -> CatalogResult<i64> {
        let mut table = self.products.write().map_err(|_| poisoned())?;
        let row = table
            .rows
            .get_mut(&id)
            .ok_or(CatalogError::ProductNotFound(id))?;

        let new_stock = rule(row.stock)?;
        row.stock = new_stock;
        row.updated_at = Utc::now();
        Ok(new_stock)
    }

    async fn find_category_by_id(&self, id: CategoryId) -> CatalogResult<Option<Category>> {
        let table = self.categories.read().map_err(|_| poisoned())?;
        Ok(table.get(id))
    }

    async fn insert_category(&self, category: NewCategory) -> CatalogResult<Category> {
        let mut table = self.categories.write().map_err(|_| poisoned())?;
        if table.rows.values().any(|c| c.name == category.name) {
            return Err(CatalogError::invalid_input("category name already exists"));
        }
        Ok(table.insert_with(|id| Category {
            id: CategoryId::new(id),
            name: category.name,
        }))
    }

    async fn find_all_categories(&self) -> CatalogResult<Vec<Category>> {
        let table = self.categories.read().map_err(|_| poisoned())?;
        Ok(table.list())
    }
}
