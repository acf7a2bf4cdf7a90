//! Auth endpoints - the boundary the clients talk to.
//!
//! Request/response shapes mirror what the web and mobile clients send;
//! all flow logic lives in the domain actions.

use axum::{extract::Extension, Json};
use serde::{Deserialize, Serialize};

use crate::common::AuthError;
use crate::domains::auth::actions::{
    google_login, request_otp, verify_otp, AuthSession, GoogleLogin, RequestOtp, VerifyOtp,
};
use crate::server::app::AppState;

#[derive(Debug, Deserialize)]
pub struct RequestOtpRequest {
    pub email: String,
    #[serde(default)]
    pub signup: bool,
    pub name: Option<String>,
    pub dob: Option<String>,
}

#[derive(Serialize)]
pub struct RequestOtpResponse {
    message: String,
}

/// Request an OTP challenge for signup or login.
///
/// POST /api/auth/request-otp
pub async fn request_otp_handler(
    Extension(state): Extension<AppState>,
    Json(req): Json<RequestOtpRequest>,
) -> Result<Json<RequestOtpResponse>, AuthError> {
    request_otp(
        RequestOtp {
            email: req.email,
            signup: req.signup,
            name: req.name,
            dob: req.dob,
        },
        &state.deps,
    )
    .await?;

    Ok(Json(RequestOtpResponse {
        message: "OTP sent to email.".to_string(),
    }))
}

#[derive(Debug, Deserialize)]
pub struct VerifyOtpRequest {
    pub email: String,
    pub otp: String,
    pub name: Option<String>,
    pub dob: Option<String>,
}

/// Verify an OTP code and receive a session token.
///
/// POST /api/auth/verify-otp
pub async fn verify_otp_handler(
    Extension(state): Extension<AppState>,
    Json(req): Json<VerifyOtpRequest>,
) -> Result<Json<AuthSession>, AuthError> {
    let session = verify_otp(
        VerifyOtp {
            email: req.email,
            code: req.otp,
            name: req.name,
            dob: req.dob,
        },
        &state.deps,
    )
    .await?;

    Ok(Json(session))
}

#[derive(Debug, Deserialize)]
pub struct GoogleLoginRequest {
    #[serde(rename = "idToken")]
    pub id_token: String,
}

/// Sign in with a Google ID token.
///
/// POST /api/auth/google
pub async fn google_login_handler(
    Extension(state): Extension<AppState>,
    Json(req): Json<GoogleLoginRequest>,
) -> Result<Json<AuthSession>, AuthError> {
    let session = google_login(
        GoogleLogin {
            id_token: req.id_token,
        },
        &state.deps,
    )
    .await?;

    Ok(Json(session))
}
