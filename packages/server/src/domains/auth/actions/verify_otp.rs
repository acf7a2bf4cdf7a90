//! Verify-OTP action

use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::common::AuthError;
use crate::domains::auth::models::{normalize_email, User};
use crate::kernel::ServerDeps;

/// Input for verifying an OTP challenge.
#[derive(Debug, Clone)]
pub struct VerifyOtp {
    pub email: String,
    pub code: String,
    pub name: Option<String>,
    pub dob: Option<String>,
}

/// Minimal user projection returned to clients.
#[derive(Debug, Clone, Serialize)]
pub struct UserProfile {
    pub id: Uuid,
    pub email: String,
    pub name: String,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            name: user.name.clone(),
        }
    }
}

/// Session established by a successful verification or Google login.
#[derive(Debug, Clone, Serialize)]
pub struct AuthSession {
    pub token: String,
    pub user: UserProfile,
}

/// Verify a submitted OTP code and establish a session.
///
/// The challenge is consumed whatever the outcome: a wrong code, a stale
/// code, and a correct code all remove it, so a second attempt against
/// the same challenge can never succeed. Under concurrent attempts
/// exactly one caller observes the challenge at all.
///
/// First successful verification after a signup challenge creates the
/// account (profile fields travel with the verify request).
pub async fn verify_otp(input: VerifyOtp, deps: &ServerDeps) -> Result<AuthSession, AuthError> {
    if !input.email.contains('@') || input.code.trim().is_empty() {
        return Err(AuthError::Validation(
            "Email and OTP code are required.".to_string(),
        ));
    }
    let email = normalize_email(&input.email);

    let challenge = match deps.otp_store.take(&email) {
        Some(challenge) => challenge,
        None => return Err(AuthError::InvalidCode),
    };
    if challenge.is_expired(deps.clock.now()) {
        info!("OTP expired for {}", email);
        return Err(AuthError::Expired);
    }
    if challenge.code != input.code {
        info!("OTP mismatch for {}", email);
        return Err(AuthError::InvalidCode);
    }

    // Resolve the user. Signup challenges carry the profile fields through
    // to this point; their presence plus a missing account means "create".
    let user = match deps.users.find_by_email(&email).await? {
        Some(user) => user,
        None => {
            let name = input.name.as_deref().map(str::trim).unwrap_or_default();
            let has_dob = input.dob.as_deref().is_some_and(|d| !d.trim().is_empty());
            if name.is_empty() || !has_dob {
                // Unreachable when request preconditions held, but a
                // login challenge can outlive its account.
                return Err(AuthError::NotFound);
            }
            let user = deps.users.create(&email, name).await?;
            info!("Created user {} for {}", user.id, email);
            user
        }
    };

    let token = deps.jwt_service.create_token(&user)?;
    info!("OTP verified for user {}", user.id);
    Ok(AuthSession {
        token,
        user: UserProfile::from(&user),
    })
}
