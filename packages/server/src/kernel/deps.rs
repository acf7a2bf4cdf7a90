//! Server dependencies for auth actions (using traits for testability)
//!
//! This module provides the central dependency container handed to the
//! domain actions. All external services use trait abstractions to enable
//! testing.

use anyhow::Result;
use async_trait::async_trait;
use google_auth::GoogleAuthService;
use sendgrid::SendGridService;
use sqlx::PgPool;
use std::sync::Arc;

use crate::domains::auth::models::User;
use crate::domains::auth::store::OtpStore;
use crate::domains::auth::JwtService;
use crate::kernel::{BaseClock, BaseGoogleVerifier, BaseMailer, BaseUserStore, GoogleClaims};

// =============================================================================
// SendGridService Adapter (implements BaseMailer trait)
// =============================================================================

/// Wrapper around SendGridService that implements BaseMailer trait
pub struct SendGridAdapter(pub Arc<SendGridService>);

impl SendGridAdapter {
    pub fn new(service: Arc<SendGridService>) -> Self {
        Self(service)
    }
}

#[async_trait]
impl BaseMailer for SendGridAdapter {
    async fn send(&self, recipient: &str, subject: &str, body: &str) -> Result<()> {
        self.0
            .send_email(recipient, subject, body)
            .await
            .map_err(|e| anyhow::anyhow!("{}", e))
    }
}

// =============================================================================
// GoogleAuthService Adapter (implements BaseGoogleVerifier trait)
// =============================================================================

/// Wrapper around GoogleAuthService that implements BaseGoogleVerifier trait
pub struct GoogleAuthAdapter(pub Arc<GoogleAuthService>);

impl GoogleAuthAdapter {
    pub fn new(service: Arc<GoogleAuthService>) -> Self {
        Self(service)
    }
}

#[async_trait]
impl BaseGoogleVerifier for GoogleAuthAdapter {
    async fn verify(&self, id_token: &str) -> Result<GoogleClaims> {
        let payload = self
            .0
            .verify_id_token(id_token)
            .await
            .map_err(|e| anyhow::anyhow!("{}", e))?;

        Ok(GoogleClaims {
            subject: payload.sub,
            email: payload.email,
            name: payload.name,
        })
    }
}

// =============================================================================
// PgUserStore (implements BaseUserStore trait over the users table)
// =============================================================================

/// Postgres-backed user store. Delegates to the query methods on `User`.
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BaseUserStore for PgUserStore {
    async fn exists(&self, email: &str) -> Result<bool> {
        User::exists(email, &self.pool).await
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        User::find_by_email(email, &self.pool).await
    }

    async fn create(&self, email: &str, name: &str) -> Result<User> {
        User::create(email, name, &self.pool).await
    }

    async fn create_or_fetch_google(
        &self,
        email: &str,
        name: &str,
        google_id: &str,
    ) -> Result<User> {
        match User::find_by_email(email, &self.pool).await? {
            Some(user) => {
                // A local account logging in via Google for the first time
                // gets the subject id attached to the existing record.
                if user.google_id.is_none() {
                    return User::attach_google_id(user.id, google_id, &self.pool).await;
                }
                Ok(user)
            }
            None => User::create_with_google_id(email, name, google_id, &self.pool).await,
        }
    }
}

// =============================================================================
// ServerDeps
// =============================================================================

/// Server dependencies accessible to auth actions (using traits for testability)
#[derive(Clone)]
pub struct ServerDeps {
    pub users: Arc<dyn BaseUserStore>,
    pub mailer: Arc<dyn BaseMailer>,
    pub google: Arc<dyn BaseGoogleVerifier>,
    /// JWT service for session token creation
    pub jwt_service: Arc<JwtService>,
    /// In-process store of pending OTP challenges
    pub otp_store: OtpStore,
    pub clock: Arc<dyn BaseClock>,
}

impl ServerDeps {
    /// Create new ServerDeps with the given dependencies
    pub fn new(
        users: Arc<dyn BaseUserStore>,
        mailer: Arc<dyn BaseMailer>,
        google: Arc<dyn BaseGoogleVerifier>,
        jwt_service: Arc<JwtService>,
        otp_store: OtpStore,
        clock: Arc<dyn BaseClock>,
    ) -> Self {
        Self {
            users,
            mailer,
            google,
            jwt_service,
            otp_store,
            clock,
        }
    }
}
