//! Postgres-backed catalog store.
//!
//! ## Error Mapping
//!
//! SQLx errors are mapped to `CatalogError` as follows:
//!
//! | SQLx Error | PostgreSQL Error Code | CatalogError | Scenario |
//! |------------|----------------------|--------------|----------|
//! | Database (unique violation) | `23505` | `InvalidInput` | Duplicate category name |
//! | Database (foreign key violation) | `23503` | `InvalidInput` | Product references a missing category |
//! | Database (check constraint violation) | `23514` | `InvalidInput` | Negative stock reached the table |
//! | Database (other) | Any other | `Unexpected` | |
//! | Other | N/A | `Unexpected` | Pool closed, network errors, decode failures |
//!
//! ## Stock writes
//!
//! `modify_stock` runs inside a transaction and takes a row lock with
//! `SELECT ... FOR UPDATE`, so concurrent stock writes on one product queue up
//! behind each other and each sees the stock the previous one committed.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row};
use tracing::{Span, instrument};

use catalog_core::{CatalogError, CatalogResult, CategoryId, ProductId};
use catalog_products::{Category, NewCategory, Product, ProductInput};

use super::{CatalogStore, StockRule};

const SCHEMA: &str = include_str!("../../migrations/0001_catalog.sql");

const PRODUCT_COLUMNS: &str =
    "id, name, description, price, stock, image_url, category_id, created_at, updated_at";

/// Postgres-backed catalog store.
///
/// Uses the SQLx connection pool, which is `Send + Sync`; clones share the pool.
#[derive(Clone)]
pub struct PostgresCatalogStore {
    pool: Arc<PgPool>,
}

impl PostgresCatalogStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }

    /// Create the catalog tables and indexes if they do not exist yet.
    #[instrument(skip(self), err)]
    pub async fn ensure_schema(&self) -> CatalogResult<()> {
        sqlx::raw_sql(SCHEMA)
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("ensure_schema", e))?;
        Ok(())
    }
}

#[async_trait]
impl CatalogStore for PostgresCatalogStore {
    #[instrument(skip(self), fields(product_id = %id), err)]
    async fn find_product_by_id(&self, id: ProductId) -> CatalogResult<Option<Product>> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1");
        let row: Option<ProductRow> = sqlx::query_as(&sql)
            .bind(id.get())
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("find_product_by_id", e))?;
        Ok(row.map(Product::from))
    }

    #[instrument(
        skip(self, input),
        fields(name = %input.name, product_id = tracing::field::Empty),
        err
    )]
    async fn insert_product(&self, input: ProductInput) -> CatalogResult<Product> {
        let sql = format!(
            r#"
            INSERT INTO products (name, description, price, stock, image_url, category_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {PRODUCT_COLUMNS}
            "#
        );
        let row: ProductRow = sqlx::query_as(&sql)
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.price)
            .bind(input.stock)
            .bind(&input.image_url)
            .bind(input.category_id.map(CategoryId::get))
            .fetch_one(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("insert_product", e))?;

        let product = Product::from(row);
        Span::current().record("product_id", product.id.get());
        Ok(product)
    }

    #[instrument(skip(self, product), fields(product_id = %product.id), err)]
    async fn save_product(&self, product: Product) -> CatalogResult<Product> {
        let sql = format!(
            r#"
            UPDATE products
            SET name = $2,
                description = $3,
                price = $4,
                stock = $5,
                image_url = $6,
                category_id = $7,
                updated_at = $8
            WHERE id = $1
            RETURNING {PRODUCT_COLUMNS}
            "#
        );
        let row: Option<ProductRow> = sqlx::query_as(&sql)
            .bind(product.id.get())
            .bind(&product.name)
            .bind(&product.description)
            .bind(product.price)
            .bind(product.stock)
            .bind(&product.image_url)
            .bind(product.category_id.map(CategoryId::get))
            .bind(product.updated_at)
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("save_product", e))?;

        row.map(Product::from)
            .ok_or(CatalogError::ProductNotFound(product.id))
    }

    #[instrument(skip(self), fields(product_id = %id), err)]
    async fn delete_product_by_id(&self, id: ProductId) -> CatalogResult<()> {
        sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id.get())
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("delete_product_by_id", e))?;
        Ok(())
    }

    #[instrument(skip(self), fields(product_id = %id), err)]
    async fn exists_product_by_id(&self, id: ProductId) -> CatalogResult<bool> {
        let row = sqlx::query("SELECT EXISTS (SELECT 1 FROM products WHERE id = $1) AS present")
            .bind(id.get())
            .fetch_one(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("exists_product_by_id", e))?;
        row.try_get::<bool, _>("present")
            .map_err(|e| map_sqlx_error("exists_product_by_id", e))
    }

    #[instrument(skip(self), err)]
    async fn find_products_by_name_containing_ignore_case(
        &self,
        keyword: &str,
    ) -> CatalogResult<Vec<Product>> {
        let sql = format!(
            "SELECT {PRODUCT_COLUMNS} FROM products \
             WHERE name ILIKE '%' || $1 || '%' \
             ORDER BY id"
        );
        let rows: Vec<ProductRow> = sqlx::query_as(&sql)
            .bind(escape_like(keyword))
            .fetch_all(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("find_products_by_name", e))?;
        Ok(rows.into_iter().map(Product::from).collect())
    }

    #[instrument(skip(self), err)]
    async fn find_all_products(&self) -> CatalogResult<Vec<Product>> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products ORDER BY id");
        let rows: Vec<ProductRow> = sqlx::query_as(&sql)
            .fetch_all(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("find_all_products", e))?;
        Ok(rows.into_iter().map(Product::from).collect())
    }

    #[instrument(skip(self, rule), fields(product_id = %id), err)]
    async fn modify_stock(&self, id: ProductId, rule: StockRule<'_>) -> CatalogResult<i64> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_sqlx_error("begin_transaction", e))?;

        let current: Option<i64> =
            sqlx::query_scalar("SELECT stock FROM products WHERE id = $1 FOR UPDATE")
                .bind(id.get())
                .fetch_optional(&mut *tx)
                .await
                .map_err(|e| map_sqlx_error("lock_stock", e))?;

        let Some(current) = current else {
            tx.rollback()
                .await
                .map_err(|e| map_sqlx_error("rollback", e))?;
            return Err(CatalogError::ProductNotFound(id));
        };

        let new_stock = match rule(current) {
            Ok(stock) => stock,
            Err(err) => {
                tx.rollback()
                    .await
                    .map_err(|e| map_sqlx_error("rollback", e))?;
                return Err(err);
            }
        };

        sqlx::query("UPDATE products SET stock = $2, updated_at = NOW() WHERE id = $1")
            .bind(id.get())
            .bind(new_stock)
            .execute(&mut *tx)
            .await
            .map_err(|e| map_sqlx_error("update_stock", e))?;

        tx.commit()
            .await
            .map_err(|e| map_sqlx_error("commit_transaction", e))?;
        Ok(new_stock)
    }

    #[instrument(skip(self), fields(category_id = %id), err)]
    async fn find_category_by_id(&self, id: CategoryId) -> CatalogResult<Option<Category>> {
        let row = sqlx::query("SELECT id, name FROM categories WHERE id = $1")
            .bind(id.get())
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("find_category_by_id", e))?;
        row.map(|r| category_from_row(&r))
            .transpose()
            .map_err(|e| map_sqlx_error("find_category_by_id", e))
    }

    #[instrument(skip(self, category), fields(name = %category.name), err)]
    async fn insert_category(&self, category: NewCategory) -> CatalogResult<Category> {
        let row = sqlx::query("INSERT INTO categories (name) VALUES ($1) RETURNING id, name")
            .bind(&category.name)
            .fetch_one(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("insert_category", e))?;
        category_from_row(&row).map_err(|e| map_sqlx_error("insert_category", e))
    }

    #[instrument(skip(self), err)]
    async fn find_all_categories(&self) -> CatalogResult<Vec<Category>> {
        let rows = sqlx::query("SELECT id, name FROM categories ORDER BY id")
            .fetch_all(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("find_all_categories", e))?;
        rows.iter()
            .map(category_from_row)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| map_sqlx_error("find_all_categories", e))
    }
}

/// Escape LIKE wildcards so the keyword matches literally.
fn escape_like(keyword: &str) -> String {
    let mut escaped = String::with_capacity(keyword.len());
    for c in keyword.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

fn map_sqlx_error(operation: &str, err: sqlx::Error) -> CatalogError {
    match err {
        sqlx::Error::Database(db_err) => {
            let msg = format!("database error in {}: {}", operation, db_err.message());
            match db_err.code().as_deref() {
                // Unique violation
                Some("23505") => CatalogError::invalid_input(match db_err.constraint() {
                    Some("categories_name_key") => "category name already exists".to_string(),
                    _ => msg,
                }),
                // Foreign key violation
                Some("23503") => CatalogError::invalid_input(msg),
                // Check constraint violation
                Some("23514") => CatalogError::invalid_input(msg),
                _ => {
                    tracing::error!(operation, error = %msg, "database error");
                    CatalogError::unexpected(msg)
                }
            }
        }
        other => {
            tracing::error!(operation, error = %other, "database error");
            CatalogError::unexpected(format!("database error in {operation}: {other}"))
        }
    }
}

struct ProductRow {
    id: i64,
    name: String,
    description: Option<String>,
    price: Option<f64>,
    stock: i64,
    image_url: Option<String>,
    category_id: Option<i64>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl<'r> sqlx::FromRow<'r, sqlx::postgres::PgRow> for ProductRow {
    fn from_row(row: &'r sqlx::postgres::PgRow) -> Result<Self, sqlx::Error> {
        Ok(ProductRow {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            description: row.try_get("description")?,
            price: row.try_get("price")?,
            stock: row.try_get("stock")?,
            image_url: row.try_get("image_url")?,
            category_id: row.try_get("category_id")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Product {
            id: ProductId::new(row.id),
            name: row.name,
            description: row.description,
            price: row.price,
            stock: row.stock,
            image_url: row.image_url,
            category_id: row.category_id.map(CategoryId::new),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

fn category_from_row(row: &sqlx::postgres::PgRow) -> Result<Category, sqlx::Error> {
    Ok(Category {
        id: CategoryId::new(row.try_get("id")?),
        name: row.try_get("name")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_like_escapes_wildcards() {
        assert_eq!(escape_like("camiseta"), "camiseta");
        assert_eq!(escape_like("50%"), "50\\%");
        assert_eq!(escape_like("a_b"), "a\\_b");
        assert_eq!(escape_like("c:\\x"), "c:\\\\x");
    }

    /// Requires a reachable Postgres at `DATABASE_URL`.
    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    #[ignore]
    async fn concurrent_stock_writes_never_oversell() {
        let Ok(url) = std::env::var("DATABASE_URL") else {
            return;
        };
        let pool = PgPool::connect(&url).await.unwrap();
        let store = PostgresCatalogStore::new(pool);
        store.ensure_schema().await.unwrap();

        let product = store
            .insert_product(ProductInput {
                name: "concurrency probe".to_string(),
                description: None,
                price: None,
                stock: 10,
                image_url: None,
                category_id: None,
            })
            .await
            .unwrap();
        let id = product.id;

        let rule = move |current: i64| catalog_products::consume(id, current, 6);
        let (a, b) = tokio::join!(
            {
                let store = store.clone();
                async move { store.modify_stock(id, &rule).await }
            },
            {
                let store = store.clone();
                async move { store.modify_stock(id, &rule).await }
            }
        );

        let successes = [a.is_ok(), b.is_ok()].iter().filter(|ok| **ok).count();
        assert_eq!(successes, 1);
        let stored = store.find_product_by_id(id).await.unwrap().unwrap();
        assert_eq!(stored.stock, 4);

        store.delete_product_by_id(id).await.unwrap();
    }
}
