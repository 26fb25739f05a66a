use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use idm_core::error::CoreError;

use crate::response::Envelope;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce the failure envelope.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `idm_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Malformed path, query or body.
    #[error("{0}")]
    BadRequest(String),

    /// No route matches the request path.
    #[error("no route for {0}")]
    RouteNotFound(String),

    #[error("method {0} not allowed")]
    MethodNotAllowed(String),

    /// The request outlived `REQUEST_TIMEOUT_SECS`.
    #[error("request timed out")]
    Timeout,
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Core(core) => match core {
                CoreError::Validation(_)
                | CoreError::AlreadyExists(_)
                | CoreError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
                CoreError::NotFound { .. } => StatusCode::NOT_FOUND,
                CoreError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
                CoreError::Forbidden(_) => StatusCode::FORBIDDEN,
                CoreError::Store(_) | CoreError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::RouteNotFound(_) => StatusCode::NOT_FOUND,
            AppError::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            AppError::Timeout => StatusCode::REQUEST_TIMEOUT,
        }
    }

    /// The message placed in the envelope's `error` field.
    ///
    /// Underlying error text, store errors included, is passed through to the
    /// client. Tighten it here if that ever needs to change.
    pub fn client_message(&self) -> String {
        self.to_string()
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        (
            self.status(),
            Json(Envelope::<()>::err(self.client_message())),
        )
            .into_response()
    }
}
