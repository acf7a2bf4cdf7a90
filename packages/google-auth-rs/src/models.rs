use serde::Deserialize;

/// Claims returned by Google's tokeninfo endpoint for a valid ID token.
///
/// All values come back as strings; optional profile claims are absent
/// when the token was minted without the matching scope.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenPayload {
    /// Audience - the client id the token was issued to.
    pub aud: String,
    /// Stable Google account id.
    pub sub: String,
    pub email: Option<String>,
    pub email_verified: Option<String>,
    pub name: Option<String>,
    pub picture: Option<String>,
    /// Expiry as a unix timestamp string.
    pub exp: Option<String>,
}
