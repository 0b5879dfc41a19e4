use std::time::Instant;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use tracing::debug;

use crate::AppState;

/// Body of `POST /api/validate`. `productId` is taken as-is: a missing key,
/// `null` or any non-string value matches nothing and answers `false`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidateProduct {
    #[serde(default)]
    pub product_id: Option<serde_json::Value>,
}

// ── Validate ──────────────────────────────────────────────────────────────────

pub async fn validate_product(
    State(state): State<AppState>,
    Json(payload): Json<ValidateProduct>,
) -> (StatusCode, Json<serde_json::Value>) {
    let product_id = match &payload.product_id {
        Some(serde_json::Value::String(id)) => id.as_str(),
        _ => "",
    };
    let valid = check(&state, product_id).await;

    validation_response(payload.product_id, valid)
}

pub async fn validate_product_by_path(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
) -> (StatusCode, Json<serde_json::Value>) {
    let valid = check(&state, &product_id).await;

    validation_response(Some(serde_json::Value::String(product_id)), valid)
}

fn validation_response(
    product_id: Option<serde_json::Value>,
    valid: bool,
) -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::OK,
        Json(serde_json::json!({
            "productId": product_id,
            "valid": valid,
        })),
    )
}

async fn check(state: &AppState, product_id: &str) -> bool {
    let start = Instant::now();
    let available = state.checker.is_available(product_id);
    let elapsed = start.elapsed();

    state
        .metrics
        .write()
        .await
        .record_validation(elapsed, available);

    available
}

// ── List ──────────────────────────────────────────────────────────────────────

pub async fn list_products(State(state): State<AppState>) -> (StatusCode, Json<serde_json::Value>) {
    let start = Instant::now();
    let products = state.checker.list_records();
    let elapsed = start.elapsed();

    debug!(count = products.len(), "Listed products");

    state
        .metrics
        .write()
        .await
        .record_listing("list_records", elapsed, products.len());

    (
        StatusCode::OK,
        Json(serde_json::json!({
            "count": products.len(),
            "products": products,
        })),
    )
}

pub async fn list_product_ids(
    State(state): State<AppState>,
) -> (StatusCode, Json<serde_json::Value>) {
    let start = Instant::now();
    let ids = state.checker.list_available();
    let elapsed = start.elapsed();

    debug!(count = ids.len(), "Listed product ids");

    state
        .metrics
        .write()
        .await
        .record_listing("list_ids", elapsed, ids.len());

    (
        StatusCode::OK,
        Json(serde_json::json!({
            "count": ids.len(),
            "data": ids,
        })),
    )
}
