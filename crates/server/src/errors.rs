use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use axum_extra::extract::cookie::CookieJar;
use service::auth::errors::AuthError;
use service::ServiceError;
use thiserror::Error;
use tracing::error;

use crate::flash::{self, Flash};

/// JSON error body: `{"error": <kind>, "message": <detail>}`.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub error: &'static str,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, error: &'static str, message: impl Into<String>) -> Self {
        Self { status, error, message: message.into() }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "unauthorized", message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            error!(status = %self.status, message = %self.message, "request failed");
        }
        (self.status, Json(serde_json::json!({"error": self.error, "message": self.message}))).into_response()
    }
}

impl From<AuthError> for ApiError {
    fn from(e: AuthError) -> Self {
        let msg = e.to_string();
        match e {
            AuthError::Validation(_) => ApiError::new(StatusCode::BAD_REQUEST, "validation_error", msg),
            AuthError::Conflict(_) => ApiError::new(StatusCode::CONFLICT, "conflict", msg),
            AuthError::NotFound(_) => ApiError::new(StatusCode::NOT_FOUND, "not_found", msg),
            AuthError::Unauthorized | AuthError::TokenError(_) => ApiError::unauthorized(msg),
            AuthError::Blocked => ApiError::new(StatusCode::FORBIDDEN, "blocked", msg),
            AuthError::HashError(_) | AuthError::Repository(_) => {
                ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "internal_error", msg)
            }
        }
    }
}

impl From<ServiceError> for ApiError {
    fn from(e: ServiceError) -> Self {
        let msg = e.to_string();
        match e {
            ServiceError::Validation(_) => ApiError::new(StatusCode::BAD_REQUEST, "validation_error", msg),
            ServiceError::Unauthorized(_) => ApiError::unauthorized(msg),
            ServiceError::Forbidden(_) => ApiError::new(StatusCode::FORBIDDEN, "forbidden", msg),
            ServiceError::NotFound(_) => ApiError::new(StatusCode::NOT_FOUND, "not_found", msg),
            ServiceError::Conflict(_) => ApiError::new(StatusCode::CONFLICT, "conflict", msg),
            ServiceError::InvalidTransition { .. } => ApiError::new(StatusCode::CONFLICT, "invalid_transition", msg),
            ServiceError::Db(_) => ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "internal_error", msg),
            ServiceError::Auth(inner) => inner.into(),
        }
    }
}

/// Form-route failure: flash the message and send the browser back.
/// Refusals by the role gate go to the login page instead.
pub fn form_failure(jar: CookieJar, back: &str, err: ServiceError) -> Response {
    match err {
        ServiceError::Unauthorized(msg) => flash::redirect(jar, "/login", Flash::danger(msg)),
        ServiceError::Db(msg) => {
            error!(error = %msg, "database error in form route");
            flash::redirect(jar, back, Flash::danger("something went wrong, try again"))
        }
        ServiceError::Auth(AuthError::Repository(msg)) | ServiceError::Auth(AuthError::HashError(msg)) => {
            error!(error = %msg, "auth backend error in form route");
            flash::redirect(jar, back, Flash::danger("something went wrong, try again"))
        }
        other => flash::redirect(jar, back, Flash::danger(other.to_string())),
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("database unavailable: {0}")]
    Database(String),
    #[error(transparent)]
    Any(#[from] anyhow::Error),
}
