//! Pending OTP challenge storage.
//!
//! At most one live challenge per email: issuing a new one overwrites the
//! previous. Entries are reclaimed lazily: `take` removes on any read and
//! the caller judges expiry at verification time. There is no background
//! sweep.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};

/// A pending OTP challenge addressed to one email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Challenge {
    pub email: String,
    pub code: String,
    pub expires_at: DateTime<Utc>,
}

impl Challenge {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }
}

/// Process-wide store of pending challenges, keyed by normalized email.
///
/// Thread-safe, cloneable. The mutex guards map access only and is never
/// held across an await point.
#[derive(Clone, Default)]
pub struct OtpStore {
    entries: Arc<Mutex<HashMap<String, Challenge>>>,
}

impl OtpStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a challenge, replacing any live one for the same email.
    pub fn put(&self, email: &str, code: &str, expires_at: DateTime<Utc>) {
        let challenge = Challenge {
            email: email.to_string(),
            code: code.to_string(),
            expires_at,
        };
        self.entries
            .lock()
            .unwrap()
            .insert(email.to_string(), challenge);
    }

    /// Remove and return the challenge for an email, if one is pending.
    ///
    /// Consumption is single-use: under concurrent callers exactly one
    /// receives the challenge and the rest see `None`.
    pub fn take(&self, email: &str) -> Option<Challenge> {
        self.entries.lock().unwrap().remove(email)
    }
}
