use axum::{extract::rejection::JsonRejection, http::StatusCode, response::IntoResponse, Json};
use thiserror::Error;

use crate::types::Stage;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Identifier is required.")]
    MissingIdentifier,

    #[error("Invalid identifier format.")]
    InvalidIdentifier { identifier: String },

    #[error("Missing credentials for {0} service")]
    MissingCredentials(Stage),

    #[error("{stage} upstream unavailable: {detail}")]
    UpstreamUnavailable { stage: Stage, detail: String },

    #[error("No competitors available to aggregate for category '{category}'")]
    EmptyCompetitorSet { category: String },

    #[error("Malformed request body: {0}")]
    RequestBody(#[from] JsonRejection),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, AppError>;

/// Message returned for failures that carry no caller-facing detail.
pub const GENERIC_FAILURE: &str = "Failed to process benchmarking request";

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::MissingIdentifier | AppError::InvalidIdentifier { .. } => {
                StatusCode::BAD_REQUEST
            }
            AppError::EmptyCompetitorSet { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status();
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            GENERIC_FAILURE.to_string()
        } else {
            self.to_string()
        };
        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_errors_are_bad_requests() {
        assert_eq!(AppError::MissingIdentifier.status(), StatusCode::BAD_REQUEST);
        let err = AppError::InvalidIdentifier { identifier: "abc".to_string() };
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "Invalid identifier format.");
    }

    #[test]
    fn upstream_errors_map_to_internal() {
        let err = AppError::UpstreamUnavailable {
            stage: Stage::Product,
            detail: "status 503".to_string(),
        };
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_string(), "product upstream unavailable: status 503");
    }

    #[test]
    fn empty_competitor_set_is_unprocessable() {
        let err = AppError::EmptyCompetitorSet { category: "Electronics".to_string() };
        assert_eq!(err.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert!(err.to_string().contains("Electronics"));
    }
}
