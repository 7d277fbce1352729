//! Errors at the HTTP boundary.
//!
//! Every error leaves the server as
//! `{"success": false, "error": <status>, "message": <text>}`.

use axum::Json;
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::auth::AuthError;
use crate::drinks::StoreError;

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    success: bool,
    error: u16,
    message: &'a str,
}

/// Build the JSON error envelope with `status`.
fn error_response(status: StatusCode, message: &str) -> Response {
    let body = ErrorBody {
        success: false,
        error: status.as_u16(),
        message,
    };
    (status, Json(body)).into_response()
}

/// Error returned by a request handler.
#[derive(Debug)]
pub enum ApiError {
    /// Authentication or authorization failed.
    Auth(AuthError),
    /// The request body is not valid JSON.
    BadRequest,
    /// The path or resource does not exist.
    NotFound,
    /// The route exists but not for this method.
    MethodNotAllowed,
    /// The request is well-formed but its content is rejected.
    Unprocessable(String),
    /// Storage failed.
    Store(StoreError),
}

impl ApiError {
    /// HTTP status the error is reported with.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Auth(e) => e.status(),
            Self::BadRequest => StatusCode::BAD_REQUEST,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message sent to the client.
    #[must_use]
    pub const fn message(&self) -> &'static str {
        match self {
            Self::Auth(e) => e.description(),
            Self::BadRequest => "bad request",
            Self::NotFound => "resource not found",
            Self::MethodNotAllowed => "Method Not Allowed",
            Self::Unprocessable(_) => "unprocessable",
            Self::Store(_) => "internal server error",
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Auth(e) => write!(f, "{e}"),
            Self::Unprocessable(reason) => write!(f, "unprocessable: {reason}"),
            Self::Store(e) => write!(f, "storage error: {e}"),
            Self::BadRequest | Self::NotFound | Self::MethodNotAllowed => {
                write!(f, "{}", self.message())
            }
        }
    }
}

impl std::error::Error for ApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Auth(e) => Some(e),
            Self::Store(e) => Some(e),
            Self::BadRequest | Self::NotFound | Self::MethodNotAllowed | Self::Unprocessable(_) => {
                None
            }
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(e: AuthError) -> Self {
        Self::Auth(e)
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound(_) => Self::NotFound,
            StoreError::DuplicateTitle(_) | StoreError::Invalid(_) => {
                Self::Unprocessable(e.to_string())
            }
            StoreError::IdsExhausted => Self::Store(e),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::JsonDataError(e) => Self::Unprocessable(e.body_text()),
            other => {
                tracing::debug!("rejected request body: {}", other.body_text());
                Self::BadRequest
            }
        }
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        tracing::debug!("rejected path: {}", rejection.body_text());
        Self::NotFound
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            Self::Store(e) => tracing::error!("request failed: {e}"),
            Self::Unprocessable(reason) => tracing::debug!("unprocessable request: {reason}"),
            _ => {}
        }
        error_response(self.status(), self.message())
    }
}
