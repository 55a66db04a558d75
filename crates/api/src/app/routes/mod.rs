use axum::{Router, routing::get};

pub mod categories;
pub mod products;
pub mod system;

/// Router for the `/api` endpoints.
pub fn router() -> Router {
    Router::new()
        .nest("/products", products::router())
        .nest("/categories", categories::router())
}

/// Banner and liveness endpoints.
pub fn system_router() -> Router {
    Router::new()
        .route("/", get(system::banner))
        .route("/Inicio", get(system::status))
        .route("/health", get(system::health))
}
