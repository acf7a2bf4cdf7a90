// Trait definitions for dependency injection
//
// These are INFRASTRUCTURE traits only - no business logic.
// Flow rules (signup requires non-existence, login requires existence)
// live in the auth actions, which call through these seams.
//
// Naming convention: Base* for trait names (e.g., BaseMailer, BaseUserStore)

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domains::auth::models::User;

// =============================================================================
// Mailer Trait (Infrastructure - OTP delivery channel)
// =============================================================================

#[async_trait]
pub trait BaseMailer: Send + Sync {
    /// Send a plain-text email to a recipient
    async fn send(&self, recipient: &str, subject: &str, body: &str) -> Result<()>;
}

// =============================================================================
// Google Verifier Trait (Infrastructure - federated identity assertions)
// =============================================================================

/// Claims extracted from a verified Google ID token.
///
/// `email` and `name` are optional at this layer; the google_login action
/// rejects claims that lack either.
#[derive(Debug, Clone)]
pub struct GoogleClaims {
    /// Stable Google account id ("sub").
    pub subject: String,
    pub email: Option<String>,
    pub name: Option<String>,
}

#[async_trait]
pub trait BaseGoogleVerifier: Send + Sync {
    /// Verify an ID token and return its claims; errors on any invalid,
    /// expired, or wrong-audience token
    async fn verify(&self, id_token: &str) -> Result<GoogleClaims>;
}

// =============================================================================
// User Store Trait (Infrastructure - durable accounts keyed by email)
// =============================================================================
//
// Callers pass emails already normalized via `normalize_email`.

#[async_trait]
pub trait BaseUserStore: Send + Sync {
    /// Check if an email is registered
    async fn exists(&self, email: &str) -> Result<bool>;

    /// Fetch a user by email
    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;

    /// Create a user from an OTP signup; errors if the email is taken
    async fn create(&self, email: &str, name: &str) -> Result<User>;

    /// Fetch-or-create for Google logins. Idempotent: an existing account
    /// with the same email is returned (attaching the subject id if the
    /// account has none) rather than duplicated.
    async fn create_or_fetch_google(
        &self,
        email: &str,
        name: &str,
        google_id: &str,
    ) -> Result<User>;
}

// =============================================================================
// Clock Trait (Infrastructure - injectable time source)
// =============================================================================

pub trait BaseClock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time. The only implementation outside tests.
pub struct SystemClock;

impl BaseClock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
