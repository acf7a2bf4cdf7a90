use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// User - an account addressed by its email
///
/// `google_id` is set only for accounts that signed in through Google at
/// least once; OTP-created accounts carry `None` until a Google login for
/// the same email attaches one.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub google_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// SQL Queries - ALL queries must be in models/
// =============================================================================

impl User {
    /// Find a user by normalized email
    pub async fn find_by_email(email: &str, pool: &PgPool) -> Result<Option<Self>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(pool)
            .await?;
        Ok(user)
    }

    /// Check if an email is already registered
    pub async fn exists(email: &str, pool: &PgPool) -> Result<bool> {
        let exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)")
                .bind(email)
                .fetch_one(pool)
                .await?;
        Ok(exists)
    }

    /// Create a user from an OTP signup
    pub async fn create(email: &str, name: &str, pool: &PgPool) -> Result<Self> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, name)
            VALUES ($1, $2)
            RETURNING *
            "#,
        )
        .bind(email)
        .bind(name)
        .fetch_one(pool)
        .await?;
        Ok(user)
    }

    /// Create a user from a first Google login
    pub async fn create_with_google_id(
        email: &str,
        name: &str,
        google_id: &str,
        pool: &PgPool,
    ) -> Result<Self> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, name, google_id)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(email)
        .bind(name)
        .bind(google_id)
        .fetch_one(pool)
        .await?;
        Ok(user)
    }

    /// Attach a Google subject id to an existing account
    pub async fn attach_google_id(id: Uuid, google_id: &str, pool: &PgPool) -> Result<Self> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users SET google_id = $2
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(google_id)
        .fetch_one(pool)
        .await?;
        Ok(user)
    }
}

// =============================================================================
// Utility Functions
// =============================================================================

/// Normalize an email for use as an identity key.
///
/// Identity comparison is case-insensitive; every store and challenge
/// lookup goes through this first.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_ascii_lowercase()
}
