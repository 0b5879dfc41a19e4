pub mod metrics;
pub mod products;

use axum::{extract::State, http::StatusCode, Json};
use serde_json::json;

use crate::AppState;

/// Liveness plus the catalog load outcome. Always 200: a degraded catalog
/// still serves (empty) answers.
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<serde_json::Value>) {
    let status = if state.load_status.is_degraded() {
        "degraded"
    } else {
        "ok"
    };

    (
        StatusCode::OK,
        Json(json!({
            "status": status,
            "service": "product-validator",
            "catalog": {
                "source": state.source.to_string(),
                "records": state.checker.catalog_len(),
                "load": state.load_status.as_ref(),
            },
        })),
    )
}


#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use axum::http::StatusCode;
    use serde_json::json;

    use super::test_support::*;
    use crate::catalog::{Catalog, CatalogSource, LoadStatus};

    #[tokio::test]
    async fn health_reports_loaded_catalog() {
        let (router, _) = static_app();
        let (status, body) = get_json(router, "/health").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({
                "status": "ok",
                "service": "product-validator",
                "catalog": {
                    "source": "static",
                    "records": 5,
                    "load": { "status": "loaded", "count": 5 },
                },
            })
        );
    }

    #[tokio::test]
    async fn health_flags_degraded_catalog_but_stays_up() {
        let (router, _) = app(
            CatalogSource::File(PathBuf::from("/missing/products.json")),
            Catalog::empty(),
            LoadStatus::Unavailable {
                reason: "catalog source not found at /missing/products.json".to_string(),
            },
        );
        let (status, body) = get_json(router, "/health").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "degraded");
        assert_eq!(body["catalog"]["source"], "file:/missing/products.json");
        assert_eq!(body["catalog"]["records"], 0);
        assert_eq!(body["catalog"]["load"]["status"], "unavailable");
    }
}
