//! Traits for token acquisition
//!
//! Abstracts the token endpoint so the token store can be driven by a mock
//! in tests.

use async_trait::async_trait;

use super::client::AuthClientError;
use super::types::TokenSet;

/// Token endpoint operations
///
/// Two grants are supported: exchanging a refresh token, and app-level login
/// with the client credentials alone.
#[async_trait]
pub trait Authenticator: Send + Sync {
    /// Exchange a refresh token for a new token set
    ///
    /// The response may or may not rotate the refresh token.
    ///
    /// # Errors
    /// Returns error if the request fails or the endpoint rejects the token
    async fn refresh_access_token(&self, refresh_token: &str) -> Result<TokenSet, AuthClientError>;

    /// Obtain a token with the client credentials (app grant)
    ///
    /// # Errors
    /// Returns error if the request fails or the credentials are rejected
    async fn app_login(&self) -> Result<TokenSet, AuthClientError>;
}
