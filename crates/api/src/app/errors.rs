use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use catalog_core::CatalogError;

pub fn catalog_error_to_response(err: CatalogError) -> axum::response::Response {
    match &err {
        CatalogError::ProductNotFound(_) | CatalogError::CategoryNotFound(_) => {
            tracing::warn!(error = %err, "lookup failed");
            json_error(StatusCode::NOT_FOUND, "not_found", err.to_string())
        }
        CatalogError::InsufficientStock { .. } => {
            tracing::warn!(error = %err, "stock request rejected");
            json_error(StatusCode::BAD_REQUEST, "insufficient_stock", err.to_string())
        }
        CatalogError::InvalidInput(_) => {
            tracing::warn!(error = %err, "invalid request");
            json_error(StatusCode::BAD_REQUEST, "invalid_input", err.to_string())
        }
        CatalogError::Unexpected(_) => {
            tracing::error!(error = %err, "request failed");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "unexpected", err.to_string())
        }
    }
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

pub fn invalid_id(kind: &str) -> axum::response::Response {
    json_error(StatusCode::BAD_REQUEST, "invalid_id", format!("invalid {kind} id"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog_core::{CategoryId, ProductId};

    #[test]
    fn maps_errors_to_status_codes() {
        let cases = [
            (CatalogError::ProductNotFound(ProductId::new(1)), StatusCode::NOT_FOUND),
            (CatalogError::CategoryNotFound(CategoryId::new(1)), StatusCode::NOT_FOUND),
            (
                CatalogError::insufficient_stock(ProductId::new(1), 5, 100),
                StatusCode::BAD_REQUEST,
            ),
            (CatalogError::invalid_input("bad"), StatusCode::BAD_REQUEST),
            (CatalogError::unexpected("boom"), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, status) in cases {
            assert_eq!(catalog_error_to_response(err).status(), status);
        }
    }
}
