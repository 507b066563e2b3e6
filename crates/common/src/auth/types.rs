//! Token types shared by the token endpoint client and the token store
//!
//! Defines the bearer credential pair, the token endpoint's response and
//! error payloads, and the endpoint configuration.

use std::fmt;

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

/// Bearer access token with its refresh material and expiry
///
/// - Optional refresh token (app-level grants don't issue one)
/// - Both expires_in (duration) and expires_at (timestamp)
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenSet {
    /// Bearer token attached to API requests
    pub access_token: String,

    /// Refresh token for obtaining new access tokens
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,

    /// Token type (always "Bearer" for this provider)
    pub token_type: String,

    /// Access token lifetime in seconds as reported by the endpoint
    pub expires_in: i64,

    /// Absolute expiration timestamp (UTC)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

impl TokenSet {
    /// Create a new `TokenSet`, deriving `expires_at` from `expires_in`.
    ///
    /// A non-positive lifetime means the endpoint did not report one; such a
    /// token never expires on its own and is only replaced after a 401. The
    /// same holds for a lifetime too large to represent as a timestamp.
    #[must_use]
    pub fn new(access_token: String, refresh_token: Option<String>, expires_in: i64) -> Self {
        let expires_at = (expires_in > 0)
            .then(|| offset_from_now(expires_in))
            .flatten();

        Self { access_token, refresh_token, token_type: "Bearer".to_string(), expires_in, expires_at }
    }

    /// Token pair supplied through configuration.
    ///
    /// Its real expiry is unknown, so it is stamped as expired right away and
    /// the first use exchanges the refresh token.
    #[must_use]
    pub fn from_stored(access_token: impl Into<String>, refresh_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: Some(refresh_token.into()),
            token_type: "Bearer".to_string(),
            expires_in: 0,
            expires_at: Some(Utc::now()),
        }
    }

    /// Check if the access token is expired or will expire within `leeway_seconds`
    ///
    /// Tokens without an expiry timestamp are never considered expired.
    #[must_use]
    pub fn is_expired(&self, leeway_seconds: i64) -> bool {
        match self.expires_at {
            // An unrepresentable leeway reaches past every expiry when
            // positive and before every expiry when negative.
            Some(expires_at) => offset_from_now(leeway_seconds)
                .map_or(leeway_seconds > 0, |deadline| deadline >= expires_at),
            None => false,
        }
    }

    /// Get seconds until token expiration
    #[must_use]
    pub fn seconds_until_expiry(&self) -> Option<i64> {
        self.expires_at.map(|expires_at| (expires_at - Utc::now()).num_seconds())
    }

    /// Marks the access token unusable while keeping the refresh material.
    pub fn expire_now(&mut self) {
        self.expires_at = Some(Utc::now());
    }

    /// Keeps `previous` as refresh token when the endpoint did not rotate it.
    #[must_use]
    pub fn with_refresh_fallback(mut self, previous: Option<String>) -> Self {
        if self.refresh_token.as_deref().map_or(true, str::is_empty) {
            self.refresh_token = previous;
        }
        self
    }
}

fn offset_from_now(seconds: i64) -> Option<DateTime<Utc>> {
    TimeDelta::try_seconds(seconds).and_then(|delta| Utc::now().checked_add_signed(delta))
}

impl fmt::Debug for TokenSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenSet")
            .field("access_token", &"<redacted>")
            .field("refresh_token", &self.refresh_token.as_ref().map(|_| "<redacted>"))
            .field("token_type", &self.token_type)
            .field("expires_in", &self.expires_in)
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Token endpoint response
///
/// Standard OAuth 2.0 token response format (RFC 6749). The provider omits
/// `token_type` and `expires_in` on some grants, hence the defaults.
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    #[serde(default)]
    pub expires_in: i64,
}

fn default_token_type() -> String {
    "Bearer".to_string()
}

impl From<TokenResponse> for TokenSet {
    fn from(response: TokenResponse) -> Self {
        let mut tokens = Self::new(response.access_token, response.refresh_token, response.expires_in);
        tokens.token_type = response.token_type;
        tokens
    }
}

/// Error payload returned by the token endpoint (RFC 6749 §5.2).
#[derive(Debug, Deserialize)]
pub struct TokenEndpointError {
    pub error: String,
    pub error_description: Option<String>,
}

impl fmt::Display for TokenEndpointError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.error_description {
            Some(desc) => write!(f, "{}: {}", self.error, desc),
            None => write!(f, "{}", self.error),
        }
    }
}

/// Token endpoint location and client credentials.
#[derive(Clone)]
pub struct TokenEndpointConfig {
    pub token_url: String,
    pub client_id: String,
    pub client_secret: String,
}

impl TokenEndpointConfig {
    #[must_use]
    pub fn new(
        token_url: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        Self {
            token_url: token_url.into(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        }
    }
}

impl fmt::Debug for TokenEndpointConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenEndpointConfig")
            .field("token_url", &self.token_url)
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}
