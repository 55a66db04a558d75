//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `services.rs`: store selection and the catalog service handlers share
//! - `routes/`: HTTP routes + handlers (one file per resource)
//! - `dto.rs`: request DTOs and their mapping to domain input
//! - `errors.rs`: consistent JSON error responses

use std::sync::Arc;

use anyhow::Context;
use axum::{
    Extension, Router,
    http::{HeaderValue, Method, header},
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::ApiConfig;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub async fn build_app(config: &ApiConfig) -> anyhow::Result<Router> {
    let services = Arc::new(services::build_services(&config.store).await?);
    let cors = cors_layer(&config.cors_allowed_origins)?;
    Ok(build_router(services, cors))
}

/// Router over already-built services.
pub fn build_router(services: Arc<AppServices>, cors: CorsLayer) -> Router {
    Router::new()
        .merge(routes::system_router())
        .nest("/api", routes::router())
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors)
                .layer(Extension(services)),
        )
}

pub use services::AppServices;

fn cors_layer(origins: &[String]) -> anyhow::Result<CorsLayer> {
    let origins = origins
        .iter()
        .map(|o| {
            HeaderValue::from_str(o).with_context(|| format!("invalid CORS origin '{o}'"))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    Ok(CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            header::HeaderName::from_static("x-requested-with"),
        ])
        .expose_headers([header::AUTHORIZATION])
        .allow_credentials(true))
}
