//! Thin error-to-response mapping for extractor rejections.
//!
//! Full error-body formatting belongs to the application's ingress layer;
//! this only carries enough for the extractor to reject a request with the
//! right status code and a JSON message.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use resource_core::Error;

/// Boundary wrapper rendering core errors as JSON responses.
#[derive(Debug)]
pub struct ApiError(pub Error);

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl ApiError {
    fn status_code(&self) -> StatusCode {
        match &self.0 {
            Error::CursorInvalidToken
            | Error::CursorLengthMismatch { .. }
            | Error::InvalidSortField(_)
            | Error::UnknownField(_)
            | Error::InvalidLimit
            | Error::InvalidParameter(_) => StatusCode::BAD_REQUEST,
            Error::EntityNotFound { .. } => StatusCode::NOT_FOUND,
            Error::EntityAlreadyExists { .. } => StatusCode::CONFLICT,
            Error::Configuration(_) | Error::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self.0, "request binding failed");
        }
        (
            status,
            Json(ErrorBody {
                error: self.0.to_string(),
            }),
        )
            .into_response()
    }
}
