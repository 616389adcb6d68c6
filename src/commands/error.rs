use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;
use tracing::error;
use crate::utils::{ConverterError, SetupError};

/// Message returned for any failure the client cannot act on.
pub const INTERNAL_ERROR_MESSAGE: &str = "An error occurred while processing images.";

/// Error returned by a handler, rendered as a JSON body.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    InvalidRequest(String),

    #[error("{0}")]
    NotFound(String),

    /// The message is logged, never sent to the client
    #[error("{0}")]
    Internal(String),
}

impl From<ConverterError> for ApiError {
    fn from(err: ConverterError) -> Self {
        match err {
            ConverterError::Config(e) => Self::InvalidRequest(e.to_string()),
            ConverterError::Setup(e @ SetupError::NoFiles(_)) => Self::NotFound(e.to_string()),
            ConverterError::Setup(e) => Self::Internal(e.to_string()),
            ConverterError::Codec(e) => Self::Internal(e.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match self {
            Self::InvalidRequest(msg) => (StatusCode::BAD_REQUEST, "INVALID_REQUEST", msg),
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, "NO_FILES", msg),
            Self::Internal(msg) => {
                error!("Error processing images: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    INTERNAL_ERROR_MESSAGE.to_string(),
                )
            }
        };

        let body = serde_json::json!({
            "success": false,
            "error": message,
            "error_code": error_code,
        });

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::{CodecError, ConfigError};
    use std::path::PathBuf;

    #[test]
    fn maps_error_families_to_status() {
        let cases = [
            (
                ConverterError::from(ConfigError::InvalidGroupSize(0)),
                StatusCode::BAD_REQUEST,
            ),
            (
                ConverterError::from(SetupError::NoFiles(PathBuf::from("/in"))),
                StatusCode::NOT_FOUND,
            ),
            (
                ConverterError::from(SetupError::SourceNotFound(PathBuf::from("/in"))),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                ConverterError::from(CodecError::worker("batch task panicked")),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, status) in cases {
            assert_eq!(ApiError::from(err).into_response().status(), status);
        }
    }
}
