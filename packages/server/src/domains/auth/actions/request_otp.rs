//! Request-OTP action

use chrono::Duration;
use tracing::{error, info};

use crate::common::AuthError;
use crate::domains::auth::models::normalize_email;
use crate::domains::auth::otp;
use crate::kernel::ServerDeps;

/// Challenge validity window in minutes.
pub const OTP_TTL_MINUTES: i64 = 5;

/// Input for requesting an OTP challenge.
#[derive(Debug, Clone)]
pub struct RequestOtp {
    pub email: String,
    pub signup: bool,
    pub name: Option<String>,
    pub dob: Option<String>,
}

/// Issue an OTP challenge for an email and deliver it.
///
/// Signup requires the identity to be unregistered and the profile fields
/// present; login requires it to be registered. The stored challenge
/// supersedes any earlier one for the same email, and it stays live even
/// when delivery fails - a retry issues a fresh code on top of it.
pub async fn request_otp(input: RequestOtp, deps: &ServerDeps) -> Result<(), AuthError> {
    if !input.email.contains('@') {
        return Err(AuthError::Validation(
            "A valid email address is required.".to_string(),
        ));
    }
    let email = normalize_email(&input.email);

    if input.signup {
        // Existence is checked first: a registered email is a conflict
        // regardless of what else is wrong with the request.
        if deps.users.exists(&email).await? {
            info!("Signup rejected, email already registered: {}", email);
            return Err(AuthError::Conflict);
        }
        let has_name = input.name.as_deref().is_some_and(|n| !n.trim().is_empty());
        let has_dob = input.dob.as_deref().is_some_and(|d| !d.trim().is_empty());
        if !has_name || !has_dob {
            return Err(AuthError::Validation(
                "Name and date of birth are required for signup.".to_string(),
            ));
        }
    } else if deps.users.find_by_email(&email).await?.is_none() {
        info!("Login rejected, email not registered: {}", email);
        return Err(AuthError::NotFound);
    }

    let code = otp::generate_code();
    let expires_at = deps.clock.now() + Duration::minutes(OTP_TTL_MINUTES);
    deps.otp_store.put(&email, &code, expires_at);

    let body = format!(
        "Your OTP code is: {}. It expires in {} minutes.",
        code, OTP_TTL_MINUTES
    );
    if let Err(e) = deps.mailer.send(&email, "Your OTP Code", &body).await {
        // The store write is not rolled back; the next request supersedes
        // the stored challenge.
        error!("Failed to send OTP email to {}: {}", email, e);
        return Err(AuthError::DeliveryFailed);
    }

    info!("OTP sent to {}", email);
    Ok(())
}
