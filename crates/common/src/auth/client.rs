//! Token endpoint client
//!
//! Performs the two grants the provider supports:
//! - Refresh token exchange (form encoded, client credentials in the body)
//! - App login (JSON body with `grant_type: "app"`)

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

use super::traits::Authenticator;
use super::types::{TokenEndpointConfig, TokenEndpointError, TokenResponse, TokenSet};

/// Grant type sent for app-level login.
pub const APP_GRANT_TYPE: &str = "app";

/// Error type for token endpoint operations
#[derive(Debug, Error)]
pub enum AuthClientError {
    /// HTTP request failed
    #[error("token request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// Endpoint answered with a non-success status
    #[error("token endpoint rejected the request ({status}): {detail}")]
    Rejected { status: u16, detail: String },

    /// Failed to parse response
    #[error("failed to parse token response: {0}")]
    ParseError(String),

    /// No refresh token available
    #[error("no refresh token available")]
    NoRefreshToken,
}

#[derive(Serialize)]
struct AppLoginRequest<'a> {
    client_id: &'a str,
    client_secret: &'a str,
    grant_type: &'a str,
}

/// HTTP client for the provider's token endpoint
#[derive(Debug, Clone)]
pub struct TokenClient {
    config: TokenEndpointConfig,
    client: Client,
}

impl TokenClient {
    /// Create a new token client with its own HTTP client
    ///
    /// # Errors
    /// Returns error if the underlying HTTP client cannot be built
    pub fn new(config: TokenEndpointConfig, timeout: Duration) -> Result<Self, AuthClientError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(config, client))
    }

    /// Create a token client that reuses an existing HTTP client
    #[must_use]
    pub fn with_client(config: TokenEndpointConfig, client: Client) -> Self {
        Self { config, client }
    }

    /// Get a reference to the endpoint configuration
    #[must_use]
    pub fn config(&self) -> &TokenEndpointConfig {
        &self.config
    }

    /// Exchange a refresh token for a new access token
    ///
    /// # Errors
    /// Returns error if:
    /// - No refresh token provided
    /// - The request fails
    /// - The endpoint rejects the token
    pub async fn refresh_access_token(
        &self,
        refresh_token: &str,
    ) -> Result<TokenSet, AuthClientError> {
        if refresh_token.is_empty() {
            return Err(AuthClientError::NoRefreshToken);
        }

        let params = [
            ("grant_type", "refresh_token"),
            ("client_id", self.config.client_id.as_str()),
            ("client_secret", self.config.client_secret.as_str()),
            ("refresh_token", refresh_token),
        ];

        debug!(token_url = %self.config.token_url, "exchanging refresh token");
        let response = self.client.post(&self.config.token_url).form(&params).send().await?;

        Self::parse_response(response).await
    }

    /// Log in with the client credentials alone
    ///
    /// # Errors
    /// Returns error if the request fails or the credentials are rejected
    pub async fn app_login(&self) -> Result<TokenSet, AuthClientError> {
        let body = AppLoginRequest {
            client_id: &self.config.client_id,
            client_secret: &self.config.client_secret,
            grant_type: APP_GRANT_TYPE,
        };

        debug!(token_url = %self.config.token_url, "requesting app token");
        let response = self.client.post(&self.config.token_url).json(&body).send().await?;

        Self::parse_response(response).await
    }

    async fn parse_response(response: Response) -> Result<TokenSet, AuthClientError> {
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let detail = serde_json::from_str::<TokenEndpointError>(&body)
                .map(|error| error.to_string())
                .unwrap_or(body);
            warn!(status = status.as_u16(), "token endpoint rejected request");
            return Err(AuthClientError::Rejected { status: status.as_u16(), detail });
        }

        let token_response: TokenResponse =
            serde_json::from_str(&body).map_err(|e| AuthClientError::ParseError(e.to_string()))?;

        if token_response.access_token.is_empty() {
            return Err(AuthClientError::ParseError("empty access token".to_string()));
        }

        Ok(token_response.into())
    }
}

#[async_trait]
impl Authenticator for TokenClient {
    async fn refresh_access_token(&self, refresh_token: &str) -> Result<TokenSet, AuthClientError> {
        self.refresh_access_token(refresh_token).await
    }

    async fn app_login(&self) -> Result<TokenSet, AuthClientError> {
        self.app_login().await
    }
}
