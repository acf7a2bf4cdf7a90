//! Google-login action

use tracing::{info, warn};

use crate::common::AuthError;
use crate::domains::auth::models::normalize_email;
use crate::kernel::ServerDeps;

use super::verify_otp::{AuthSession, UserProfile};

/// Input for a Google sign-in.
#[derive(Debug, Clone)]
pub struct GoogleLogin {
    pub id_token: String,
}

/// Establish a session from a Google ID token.
///
/// Stateless: no challenge is involved. The token is verified by the
/// identity-provider collaborator; the claim must carry an email, a name
/// and a stable subject id. Repeat logins resolve to the same account.
pub async fn google_login(input: GoogleLogin, deps: &ServerDeps) -> Result<AuthSession, AuthError> {
    if input.id_token.trim().is_empty() {
        return Err(AuthError::Validation(
            "Missing Google ID token.".to_string(),
        ));
    }

    let claims = match deps.google.verify(&input.id_token).await {
        Ok(claims) => claims,
        Err(e) => {
            warn!("Google token verification failed: {}", e);
            return Err(AuthError::Unauthorized);
        }
    };

    let (email, name) = match (claims.email, claims.name) {
        (Some(email), Some(name))
            if !email.is_empty() && !name.is_empty() && !claims.subject.is_empty() =>
        {
            (email, name)
        }
        _ => {
            warn!("Google token payload incomplete");
            return Err(AuthError::Unauthorized);
        }
    };

    let email = normalize_email(&email);
    let user = deps
        .users
        .create_or_fetch_google(&email, &name, &claims.subject)
        .await?;

    let token = deps.jwt_service.create_token(&user)?;
    info!("Google login for user {}", user.id);
    Ok(AuthSession {
        token,
        user: UserProfile::from(&user),
    })
}
