use std::time::Duration;

use axum::{
    extract::multipart::{MultipartError, MultipartRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Failure of a request, reported to the client as `{"error": "..."}`.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("No FMU file was uploaded in the 'fmuFile' field")]
    MissingFile,

    #[error("Unreadable multipart form: {0}")]
    Form(String),

    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),

    #[error("Simulation timed out after {}s", .0.as_secs_f64())]
    Timeout(Duration),

    /// Everything that goes wrong while importing or simulating the package.
    #[error("{0:#}")]
    Internal(#[from] anyhow::Error),
}

impl From<MultipartError> for ApiError {
    fn from(err: MultipartError) -> Self {
        Self::Form(err.body_text())
    }
}

impl From<MultipartRejection> for ApiError {
    fn from(rejection: MultipartRejection) -> Self {
        Self::Form(rejection.body_text())
    }
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::MissingFile | ApiError::Form(_) | ApiError::InvalidParameters(_) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::Timeout(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            log::error!("Simulation request failed: {self}");
        } else {
            log::warn!("Rejected simulation request: {self}");
        }
        (
            status,
            Json(ErrorBody {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use anyhow::Context;

    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(ApiError::MissingFile.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiError::InvalidParameters("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::Timeout(Duration::from_secs(1)).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_error_chain() {
        let err: Result<(), _> = Err(std::io::Error::other("disk full"));
        let err = ApiError::from(err.context("Saving upload").unwrap_err());
        assert_eq!(err.to_string(), "Saving upload: disk full");
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
