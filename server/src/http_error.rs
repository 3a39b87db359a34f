use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use vellum_core::upload::UploadError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Invalid(String),
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error(transparent)]
    Upload(#[from] UploadError),
    #[error(transparent)]
    Internal(#[from] eyre::Report),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::Invalid(message) => (StatusCode::BAD_REQUEST, message.clone()),
            ApiError::NotFound(what) => (StatusCode::NOT_FOUND, format!("{} not found", what)),
            ApiError::Upload(err @ UploadError::NotAnImage { .. }) => {
                (StatusCode::BAD_REQUEST, err.to_string())
            }
            ApiError::Upload(err) => {
                tracing::error!("upload failed: {}", err);
                (StatusCode::BAD_GATEWAY, "Failed to upload image".to_owned())
            }
            ApiError::Internal(report) => {
                tracing::error!("internal error: {:?}", report);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_owned(),
                )
            }
        };
        let body = Json(json!({
            "success": false,
            "error": message,
        }));
        (status, body).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
