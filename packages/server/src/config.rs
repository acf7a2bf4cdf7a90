use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub jwt_secret: String,
    pub jwt_issuer: String,
    pub sendgrid_api_key: String,
    pub email_from: String,
    pub google_client_id: String,
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// A missing JWT_SECRET (or any other required variable) is a fatal
    /// startup condition; there is no fallback secret.
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Ok(Self {
            database_url: env::var("DATABASE_URL")
                .context("DATABASE_URL must be set")?,
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .context("PORT must be a valid number")?,
            jwt_secret: env::var("JWT_SECRET")
                .context("JWT_SECRET must be set")?,
            jwt_issuer: env::var("JWT_ISSUER")
                .unwrap_or_else(|_| "notes-api".to_string()),
            sendgrid_api_key: env::var("SENDGRID_API_KEY")
                .context("SENDGRID_API_KEY must be set")?,
            email_from: env::var("EMAIL_FROM")
                .context("EMAIL_FROM must be set")?,
            google_client_id: env::var("GOOGLE_CLIENT_ID")
                .context("GOOGLE_CLIENT_ID must be set")?,
        })
    }
}
