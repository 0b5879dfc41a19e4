use std::path::PathBuf;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Why a catalog source could not be turned into records.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("catalog source not found at {}", path.display())]
    SourceUnavailable { path: PathBuf },

    #[error("failed to read catalog source {}: {source}", path.display())]
    SourceUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("catalog source {} is malformed: {reason}", path.display())]
    SourceMalformed { path: PathBuf, reason: String },
}

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::Internal(err) => {
                tracing::error!(error = %err, "Internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error".to_string(),
                )
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unavailable_message_names_the_path() {
        let err = CatalogError::SourceUnavailable {
            path: PathBuf::from("/app/data/products.json"),
        };
        assert_eq!(
            err.to_string(),
            "catalog source not found at /app/data/products.json"
        );
    }

    #[test]
    fn internal_error_maps_to_500() {
        let resp = AppError::from(anyhow::anyhow!("boom")).into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
