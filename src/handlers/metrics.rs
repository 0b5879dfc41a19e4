use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

use crate::{error::AppResult, AppState};

// ── GET /api/metrics ──────────────────────────────────────────────────────────

pub async fn get_metrics(State(state): State<AppState>) -> (StatusCode, Json<serde_json::Value>) {
    let metrics = state.metrics.read().await;

    (
        StatusCode::OK,
        Json(serde_json::json!({
            "total_samples": metrics.entries.len(),
            "capacity": metrics.capacity(),
            "evicted": metrics.evicted,
            "aggregated": metrics.aggregated(),
        })),
    )
}

// ── GET /api/metrics/export/csv ───────────────────────────────────────────────

pub async fn export_csv(State(state): State<AppState>) -> AppResult<Response> {
    let csv = state.metrics.read().await.to_csv()?;

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"validator_metrics.csv\"",
            ),
        ],
        csv,
    )
        .into_response())
}
