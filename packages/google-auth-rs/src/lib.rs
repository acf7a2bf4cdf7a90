// https://developers.google.com/identity/sign-in/web/backend-auth

pub mod models;

use reqwest::Client;

use crate::models::TokenPayload;

#[derive(Debug, Clone)]
pub struct GoogleAuthOptions {
    pub client_id: String,
}

#[derive(Debug, Clone)]
pub struct GoogleAuthService {
    options: GoogleAuthOptions,
}

impl GoogleAuthService {
    pub fn new(options: GoogleAuthOptions) -> Self {
        Self { options }
    }

    /// Verify a Google ID token and return its claims.
    ///
    /// Delegates signature and expiry checks to the tokeninfo endpoint,
    /// then checks the audience against the configured client id.
    pub async fn verify_id_token(&self, id_token: &str) -> Result<TokenPayload, &'static str> {
        let url = "https://oauth2.googleapis.com/tokeninfo";

        let client = Client::new();
        let res = client
            .get(url)
            .query(&[("id_token", id_token)])
            .send()
            .await;

        match res {
            Ok(response) => {
                let status = response.status();
                if !status.is_success() {
                    // Tokeninfo answers 4xx for invalid or expired tokens
                    let error_body = response.text().await.unwrap_or_default();
                    eprintln!("Google tokeninfo error ({}): {}", status, error_body);
                    return Err("Invalid Google token");
                }

                let result = response.json::<TokenPayload>().await;
                match result {
                    Ok(payload) => {
                        if payload.aud != self.options.client_id {
                            eprintln!("Google token audience mismatch: {}", payload.aud);
                            return Err("Google token audience mismatch");
                        }
                        Ok(payload)
                    }
                    Err(e) => {
                        eprintln!("Failed to parse Google tokeninfo response: {}", e);
                        Err("Error parsing Google token payload")
                    }
                }
            }
            Err(e) => {
                eprintln!("Request to Google tokeninfo failed: {}", e);
                Err("Error verifying Google token")
            }
        }
    }
}
