// TestDependencies - mock implementations for testing
//
// Provides mock collaborators that can be injected into ServerDeps for
// tests: no mail leaves the process, no Google round-trips, no database.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use super::{
    BaseClock, BaseGoogleVerifier, BaseMailer, BaseUserStore, GoogleClaims, ServerDeps,
};
use crate::domains::auth::models::User;
use crate::domains::auth::store::OtpStore;
use crate::domains::auth::JwtService;

// =============================================================================
// Mock Mailer
// =============================================================================

/// A sent (or attempted) email captured by the mock.
#[derive(Debug, Clone)]
pub struct SentMail {
    pub recipient: String,
    pub subject: String,
    pub body: String,
}

pub struct MockMailer {
    sent: Arc<Mutex<Vec<SentMail>>>,
    fail: bool,
}

impl MockMailer {
    pub fn new() -> Self {
        Self {
            sent: Arc::new(Mutex::new(Vec::new())),
            fail: false,
        }
    }

    /// A mailer whose sends always fail. Attempts are still recorded, so
    /// tests can read the code that was generated before delivery failed.
    pub fn failing() -> Self {
        Self {
            sent: Arc::new(Mutex::new(Vec::new())),
            fail: true,
        }
    }

    /// Get all mails that were sent (or attempted)
    pub fn sent(&self) -> Vec<SentMail> {
        self.sent.lock().unwrap().clone()
    }

    /// Get the most recent mail body
    pub fn last_body(&self) -> Option<String> {
        self.sent.lock().unwrap().last().map(|m| m.body.clone())
    }

    /// Check if a mail was addressed to the given recipient
    pub fn was_sent_to(&self, recipient: &str) -> bool {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .any(|m| m.recipient == recipient)
    }

    /// Get the number of delivery attempts
    pub fn send_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

#[async_trait]
impl BaseMailer for MockMailer {
    async fn send(&self, recipient: &str, subject: &str, body: &str) -> Result<()> {
        // Record the attempt first - a failed delivery still happened
        self.sent.lock().unwrap().push(SentMail {
            recipient: recipient.to_string(),
            subject: subject.to_string(),
            body: body.to_string(),
        });

        if self.fail {
            anyhow::bail!("mock mailer configured to fail")
        }
        Ok(())
    }
}

impl Default for MockMailer {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Mock Google Verifier
// =============================================================================

pub struct MockGoogleVerifier {
    claims: Arc<Mutex<Option<GoogleClaims>>>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl MockGoogleVerifier {
    /// A verifier that rejects every token (no claims configured).
    pub fn new() -> Self {
        Self {
            claims: Arc::new(Mutex::new(None)),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Return the same claims for every verified token.
    pub fn with_claims(self, claims: GoogleClaims) -> Self {
        *self.claims.lock().unwrap() = Some(claims);
        self
    }

    /// Get all tokens that were presented for verification
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl BaseGoogleVerifier for MockGoogleVerifier {
    async fn verify(&self, id_token: &str) -> Result<GoogleClaims> {
        self.calls.lock().unwrap().push(id_token.to_string());

        match self.claims.lock().unwrap().clone() {
            Some(claims) => Ok(claims),
            None => anyhow::bail!("invalid token"),
        }
    }
}

impl Default for MockGoogleVerifier {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// In-Memory User Store
// =============================================================================

/// HashMap-backed user store, keyed by normalized email.
pub struct InMemoryUserStore {
    users: Arc<Mutex<HashMap<String, User>>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self {
            users: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Seed an existing local account
    pub fn with_user(self, email: &str, name: &str) -> Self {
        let user = User {
            id: Uuid::new_v4(),
            email: email.to_string(),
            name: name.to_string(),
            google_id: None,
            created_at: Utc::now(),
        };
        self.users.lock().unwrap().insert(email.to_string(), user);
        self
    }

    /// Get a stored user by email
    pub fn get(&self, email: &str) -> Option<User> {
        self.users.lock().unwrap().get(email).cloned()
    }

    /// Get the number of stored users
    pub fn count(&self) -> usize {
        self.users.lock().unwrap().len()
    }
}

#[async_trait]
impl BaseUserStore for InMemoryUserStore {
    async fn exists(&self, email: &str) -> Result<bool> {
        Ok(self.users.lock().unwrap().contains_key(email))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        Ok(self.users.lock().unwrap().get(email).cloned())
    }

    async fn create(&self, email: &str, name: &str) -> Result<User> {
        let mut users = self.users.lock().unwrap();
        if users.contains_key(email) {
            anyhow::bail!("duplicate key: users.email");
        }
        let user = User {
            id: Uuid::new_v4(),
            email: email.to_string(),
            name: name.to_string(),
            google_id: None,
            created_at: Utc::now(),
        };
        users.insert(email.to_string(), user.clone());
        Ok(user)
    }

    async fn create_or_fetch_google(
        &self,
        email: &str,
        name: &str,
        google_id: &str,
    ) -> Result<User> {
        let mut users = self.users.lock().unwrap();
        if let Some(user) = users.get_mut(email) {
            if user.google_id.is_none() {
                user.google_id = Some(google_id.to_string());
            }
            return Ok(user.clone());
        }
        let user = User {
            id: Uuid::new_v4(),
            email: email.to_string(),
            name: name.to_string(),
            google_id: Some(google_id.to_string()),
            created_at: Utc::now(),
        };
        users.insert(email.to_string(), user.clone());
        Ok(user)
    }
}

impl Default for InMemoryUserStore {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Fixed Clock
// =============================================================================

/// Settable clock so expiry can be tested without sleeping.
pub struct FixedClock {
    now: Arc<Mutex<DateTime<Utc>>>,
}

impl FixedClock {
    pub fn new() -> Self {
        Self {
            now: Arc::new(Mutex::new(Utc::now())),
        }
    }

    pub fn at(now: DateTime<Utc>) -> Self {
        Self {
            now: Arc::new(Mutex::new(now)),
        }
    }

    /// Move the clock forward
    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap();
        *now = *now + by;
    }
}

impl BaseClock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}

impl Default for FixedClock {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// TestDependencies - Builder for test dependencies
// =============================================================================

#[derive(Clone)]
pub struct TestDependencies {
    pub mailer: Arc<MockMailer>,
    pub google: Arc<MockGoogleVerifier>,
    pub users: Arc<InMemoryUserStore>,
    pub clock: Arc<FixedClock>,
    pub otp_store: OtpStore,
}

impl TestDependencies {
    pub fn new() -> Self {
        Self {
            mailer: Arc::new(MockMailer::new()),
            google: Arc::new(MockGoogleVerifier::new()),
            users: Arc::new(InMemoryUserStore::new()),
            clock: Arc::new(FixedClock::new()),
            otp_store: OtpStore::new(),
        }
    }

    /// Set a mock mailer
    pub fn mock_mailer(mut self, mailer: MockMailer) -> Self {
        self.mailer = Arc::new(mailer);
        self
    }

    /// Set a mock Google verifier
    pub fn mock_google(mut self, google: MockGoogleVerifier) -> Self {
        self.google = Arc::new(google);
        self
    }

    /// Set a user store
    pub fn mock_users(mut self, users: InMemoryUserStore) -> Self {
        self.users = Arc::new(users);
        self
    }

    /// Convert into ServerDeps for driving actions in tests.
    ///
    /// The mock handles stay usable on this TestDependencies (clone it
    /// before converting) for asserting on captured calls.
    pub fn into_deps(self) -> ServerDeps {
        ServerDeps::new(
            self.users,
            self.mailer,
            self.google,
            Arc::new(JwtService::new("test_secret_key", "test_issuer".to_string())),
            self.otp_store,
            self.clock,
        )
    }
}

impl Default for TestDependencies {
    fn default() -> Self {
        Self::new()
    }
}
