//! Bearer token source for authorized API calls
//!
//! [`ApiAuthService`] adapts the shared [`TokenStore`] to the narrow interface
//! the API client needs: hand out the current access token, and drop it when
//! the remote side rejects it.

use std::sync::Arc;

use async_trait::async_trait;
use fleetlink_common::auth::{Authenticator, TokenStore};
use tracing::debug;

use super::errors::ApiError;

/// Trait for providing access tokens
///
/// This trait allows dependency injection and testing with mock providers.
#[async_trait]
pub trait AccessTokenProvider: Send + Sync {
    /// Get a valid access token, acquiring one if needed
    async fn access_token(&self) -> Result<String, ApiError>;

    /// Mark `rejected` as unusable so the next [`access_token`] call renews.
    ///
    /// Has no effect if another caller already replaced that token.
    ///
    /// [`access_token`]: AccessTokenProvider::access_token
    async fn invalidate(&self, rejected: &str);
}

/// [`AccessTokenProvider`] backed by a [`TokenStore`]
pub struct ApiAuthService<A: Authenticator + 'static> {
    store: Arc<TokenStore<A>>,
}

impl<A: Authenticator + 'static> ApiAuthService<A> {
    pub fn new(store: Arc<TokenStore<A>>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<TokenStore<A>> {
        &self.store
    }
}

#[async_trait]
impl<A: Authenticator + 'static> AccessTokenProvider for ApiAuthService<A> {
    async fn access_token(&self) -> Result<String, ApiError> {
        Ok(self.store.access_token().await?)
    }

    async fn invalidate(&self, rejected: &str) {
        if self.store.invalidate(rejected).await {
            debug!("access token invalidated after rejection");
        }
    }
}

#[cfg(test)]
mod tests {
    use fleetlink_common::auth::TokenSet;
    use fleetlink_common::testing::MockAuthenticator;

    use super::*;

    #[tokio::test]
    async fn test_invalidate_forces_renewal() {
        let store = Arc::new(TokenStore::new(
            MockAuthenticator::new(),
            Some(TokenSet::new("stored".into(), Some("refresh-0".into()), 3600)),
        ));
        let service = ApiAuthService::new(store.clone());

        assert_eq!(service.access_token().await.unwrap(), "stored");

        service.invalidate("stored").await;
        let renewed = service.access_token().await.unwrap();

        assert_ne!(renewed, "stored");
        assert_eq!(store.exchange_count(), 1);
    }

    #[tokio::test]
    async fn test_invalidating_stale_token_is_ignored() {
        let store = Arc::new(TokenStore::new(
            MockAuthenticator::new(),
            Some(TokenSet::new("current".into(), Some("refresh-0".into()), 3600)),
        ));
        let service = ApiAuthService::new(store.clone());

        service.invalidate("something-older").await;

        assert_eq!(service.access_token().await.unwrap(), "current");
        assert_eq!(store.exchange_count(), 0);
    }

    #[tokio::test]
    async fn test_exchange_failure_maps_to_auth_error() {
        let authenticator = MockAuthenticator::new();
        authenticator.set_failure(Some("invalid_client".into()));
        let service = ApiAuthService::new(Arc::new(TokenStore::new(authenticator, None)));

        assert!(matches!(service.access_token().await, Err(ApiError::Auth(_))));
    }
}
