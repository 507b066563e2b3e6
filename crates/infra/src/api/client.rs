//! Authorized API client
//!
//! Every call carries the current bearer token. A 401 answer invalidates that
//! token and the call is repeated exactly once with a freshly acquired one; a
//! second 401 is reported as an authentication failure.

use std::sync::Arc;
use std::time::Duration;

use fleetlink_domain::{ApiSettings, FleetError};
use reqwest::{Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};

use super::auth::AccessTokenProvider;
use super::errors::ApiError;
use crate::http::HttpClient;

/// Configuration for API client
#[derive(Debug, Clone)]
pub struct ApiClientConfig {
    /// Base URL for API (e.g., `https://api.tronity.tech`)
    pub base_url: String,
    /// Timeout for a single request, retries included
    pub timeout: Duration,
}

impl From<&ApiSettings> for ApiClientConfig {
    fn from(settings: &ApiSettings) -> Self {
        Self { base_url: settings.base_url.clone(), timeout: settings.timeout() }
    }
}

impl Default for ApiClientConfig {
    fn default() -> Self {
        Self::from(&ApiSettings::default())
    }
}

/// API client that attaches bearer tokens and renews them on rejection
pub struct ApiClient {
    http_client: Arc<HttpClient>,
    auth: Arc<dyn AccessTokenProvider>,
    config: ApiClientConfig,
}

impl ApiClient {
    /// Create a new API client
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be created
    pub fn new(config: ApiClientConfig, auth: Arc<dyn AccessTokenProvider>) -> Result<Self, ApiError> {
        let http_client = HttpClient::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ApiError::Config(format!("failed to build HttpClient: {e}")))?;

        Ok(Self::with_http_client(config, auth, Arc::new(http_client)))
    }

    /// Create a client around an existing [`HttpClient`]
    pub fn with_http_client(
        config: ApiClientConfig,
        auth: Arc<dyn AccessTokenProvider>,
        http_client: Arc<HttpClient>,
    ) -> Self {
        let base_url = config.base_url.trim_end_matches('/').to_string();
        Self { http_client, auth, config: ApiClientConfig { base_url, ..config } }
    }

    #[must_use]
    pub fn config(&self) -> &ApiClientConfig {
        &self.config
    }

    /// Execute a GET request and decode the JSON body
    ///
    /// # Errors
    ///
    /// Returns error if the request fails, the status is not a success, or
    /// the body cannot be decoded as `T`
    #[instrument(skip(self), fields(path = %path))]
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self.send_authorized(Method::GET, path).await?;
        let url = response.url().to_string();
        let response = Self::ensure_success(response).await?;

        response.json().await.map_err(|e| ApiError::Decode(format!("{url}: {e}")))
    }

    /// Execute a POST without a request body, ignoring the response body
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the status is not a success
    #[instrument(skip(self), fields(path = %path))]
    pub async fn post_action(&self, path: &str) -> Result<(), ApiError> {
        let response = self.send_authorized(Method::POST, path).await?;
        Self::ensure_success(response).await?;
        Ok(())
    }

    /// Send an authorized request, renewing the token once on 401
    ///
    /// Statuses other than 401 are returned as-is for the caller to judge.
    ///
    /// # Errors
    ///
    /// `ApiError::Auth` if no token can be acquired or the renewed token is
    /// rejected too; transport failures as `Network` or `Timeout`
    pub async fn send_authorized(&self, method: Method, path: &str) -> Result<Response, ApiError> {
        let url = format!("{}{}", self.config.base_url, path);
        let mut renewed = false;

        loop {
            let token = self.auth.access_token().await?;
            debug!(%method, url = %url, renewed, "authorized request");

            let request = self
                .http_client
                .request(method.clone(), &url)
                .bearer_auth(&token)
                .header(reqwest::header::ACCEPT, "application/json");

            let response = match tokio::time::timeout(self.config.timeout, self.http_client.send(request)).await
            {
                Ok(Ok(response)) => response,
                Ok(Err(err)) => return Err(Self::map_fleet_error(err)),
                Err(_) => return Err(ApiError::Timeout(self.config.timeout)),
            };

            if response.status() != StatusCode::UNAUTHORIZED {
                return Ok(response);
            }

            if renewed {
                warn!(url = %url, "renewed token rejected");
                return Err(ApiError::Auth(format!("{url} rejected the renewed access token")));
            }

            warn!(url = %url, "access token rejected, renewing");
            self.auth.invalidate(&token).await;
            renewed = true;
        }
    }

    async fn ensure_success(response: Response) -> Result<Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let url = response.url().to_string();
        let body = response.text().await.unwrap_or_default();
        Err(ApiError::from_status(status, &url, body.trim()))
    }

    fn map_fleet_error(err: FleetError) -> ApiError {
        match err {
            FleetError::Config(message) => ApiError::Config(message),
            FleetError::Network(message) => ApiError::Network(message),
            other => ApiError::Network(other.to_string()),
        }
    }
}
