//! Store selection and service wiring.

use std::sync::Arc;

use anyhow::Context;
use sqlx::PgPool;

use catalog_infra::{CatalogService, CatalogStore, InMemoryCatalogStore, PostgresCatalogStore};

use crate::config::StoreBackend;

/// Services shared by every handler (via `Extension<Arc<AppServices>>`).
pub struct AppServices {
    pub catalog: CatalogService<Arc<dyn CatalogStore>>,
}

impl AppServices {
    pub fn new(store: Arc<dyn CatalogStore>) -> Self {
        Self {
            catalog: CatalogService::new(store),
        }
    }
}

pub async fn build_services(backend: &StoreBackend) -> anyhow::Result<AppServices> {
    let store: Arc<dyn CatalogStore> = match backend {
        StoreBackend::InMemory => {
            tracing::info!("using in-memory catalog store");
            Arc::new(InMemoryCatalogStore::new())
        }
        StoreBackend::Postgres { database_url } => {
            let pool = PgPool::connect(database_url)
                .await
                .context("failed to connect to Postgres")?;
            let store = PostgresCatalogStore::new(pool);
            store
                .ensure_schema()
                .await
                .context("failed to create catalog schema")?;
            tracing::info!("using Postgres catalog store");
            Arc::new(store)
        }
    };

    Ok(AppServices::new(store))
}
