use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

/// Authentication errors surfaced to API clients
///
/// Every variant maps to a distinct user-visible condition; none are
/// retried or swallowed here. Recovery (e.g. requesting a fresh OTP after
/// `Expired`) is the caller's responsibility.
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("{0}")]
    Validation(String),

    #[error("User already exists.")]
    Conflict,

    #[error("User not found.")]
    NotFound,

    #[error("Invalid OTP.")]
    InvalidCode,

    #[error("OTP expired.")]
    Expired,

    #[error("Failed to send OTP email.")]
    DeliveryFailed,

    #[error("Google authentication failed.")]
    Unauthorized,

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AuthError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::InvalidCode | Self::Expired => StatusCode::BAD_REQUEST,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Conflict => StatusCode::CONFLICT,
            Self::DeliveryFailed => StatusCode::BAD_GATEWAY,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "Auth request failed");
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
