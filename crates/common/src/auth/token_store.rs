//! Token store with serialized acquisition
//!
//! Holds the current bearer token and hands out a usable one on demand:
//! - Refresh flow: a configured token pair, renewed by exchanging the refresh
//!   token once the access token expires
//! - App flow: no usable pair, every acquisition logs in with the client
//!   credentials
//!
//! Acquisition is serialized: concurrent callers that observe an expired
//! token trigger exactly one exchange and all receive its result.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, warn};

use super::client::AuthClientError;
use super::traits::Authenticator;
use super::types::TokenSet;

/// Seconds before nominal expiry at which a token is treated as expired.
pub const DEFAULT_EXPIRY_LEEWAY_SECS: i64 = 10;

/// How the store obtains new tokens. Fixed at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AcquisitionStrategy {
    /// Exchange the refresh token of the current pair
    RefreshFlow,
    /// Log in with client credentials on every acquisition
    AppFlow,
}

/// Error type for token store operations
#[derive(Debug, Error)]
pub enum TokenStoreError {
    /// Token endpoint exchange failed
    #[error("token exchange failed: {0}")]
    Exchange(#[from] AuthClientError),

    /// Refresh flow without refresh material
    #[error("no refresh token available")]
    NoRefreshToken,
}

/// Current bearer credentials plus the means to renew them
pub struct TokenStore<A: Authenticator + 'static> {
    authenticator: Arc<A>,
    strategy: AcquisitionStrategy,
    current: RwLock<Option<TokenSet>>,
    acquire_lock: Mutex<()>,
    leeway_seconds: i64,
    exchanges: AtomicU64,
}

impl<A: Authenticator + 'static> TokenStore<A> {
    /// Create a store, choosing the strategy from the initial tokens
    ///
    /// A token set carrying a non-empty refresh token selects the refresh
    /// flow; anything else selects the app flow.
    #[must_use]
    pub fn new(authenticator: A, initial: Option<TokenSet>) -> Self {
        Self::with_authenticator(Arc::new(authenticator), initial)
    }

    /// Same as [`TokenStore::new`] for an authenticator that is already shared
    #[must_use]
    pub fn with_authenticator(authenticator: Arc<A>, initial: Option<TokenSet>) -> Self {
        let has_refresh = initial
            .as_ref()
            .and_then(|t| t.refresh_token.as_deref())
            .is_some_and(|r| !r.is_empty());

        let (strategy, current) = if has_refresh {
            (AcquisitionStrategy::RefreshFlow, initial)
        } else {
            (AcquisitionStrategy::AppFlow, None)
        };

        debug!(?strategy, "token store created");

        Self {
            authenticator,
            strategy,
            current: RwLock::new(current),
            acquire_lock: Mutex::new(()),
            leeway_seconds: DEFAULT_EXPIRY_LEEWAY_SECS,
            exchanges: AtomicU64::new(0),
        }
    }

    /// Override the expiry leeway
    #[must_use]
    pub fn with_leeway(mut self, leeway_seconds: i64) -> Self {
        self.leeway_seconds = leeway_seconds;
        self
    }

    #[must_use]
    pub const fn strategy(&self) -> AcquisitionStrategy {
        self.strategy
    }

    /// Number of successful token exchanges performed so far
    #[must_use]
    pub fn exchange_count(&self) -> u64 {
        self.exchanges.load(Ordering::Relaxed)
    }

    /// Get a usable token, acquiring one if needed
    ///
    /// # Errors
    /// Returns error if no token can be obtained
    pub async fn current_token(&self) -> Result<TokenSet, TokenStoreError> {
        if let Some(tokens) = self.usable().await {
            return Ok(tokens);
        }

        let _guard = self.acquire_lock.lock().await;

        // Another caller may have finished an exchange while we waited.
        if let Some(tokens) = self.usable().await {
            return Ok(tokens);
        }

        self.acquire().await
    }

    /// Get a usable access token string
    ///
    /// # Errors
    /// Returns error if no token can be obtained
    pub async fn access_token(&self) -> Result<String, TokenStoreError> {
        Ok(self.current_token().await?.access_token)
    }

    /// Replace `stale` with a freshly acquired token
    ///
    /// If another caller already replaced `stale`, the current token is
    /// returned without a second exchange.
    ///
    /// # Errors
    /// Returns error if the exchange fails
    pub async fn refresh(&self, stale: &TokenSet) -> Result<TokenSet, TokenStoreError> {
        let _guard = self.acquire_lock.lock().await;

        if let Some(tokens) = self.usable().await {
            if tokens.access_token != stale.access_token {
                return Ok(tokens);
            }
        }

        self.acquire().await
    }

    /// Replace the current token unconditionally
    pub async fn replace(&self, tokens: TokenSet) {
        *self.current.write().await = Some(tokens);
    }

    /// Mark the current token unusable if it is still `rejected_access_token`
    ///
    /// Returns whether anything was invalidated.
    pub async fn invalidate(&self, rejected_access_token: &str) -> bool {
        let mut current = self.current.write().await;
        match current.as_mut() {
            Some(tokens) if tokens.access_token == rejected_access_token => {
                tokens.expire_now();
                debug!("access token invalidated after rejection");
                true
            }
            _ => false,
        }
    }

    /// Snapshot of the current token without any acquisition
    pub async fn peek(&self) -> Option<TokenSet> {
        self.current.read().await.clone()
    }

    async fn usable(&self) -> Option<TokenSet> {
        let current = self.current.read().await;
        current.as_ref().filter(|t| !t.is_expired(self.leeway_seconds)).cloned()
    }

    /// Runs one exchange. Callers hold `acquire_lock`.
    async fn acquire(&self) -> Result<TokenSet, TokenStoreError> {
        let fresh = match self.strategy {
            AcquisitionStrategy::RefreshFlow => {
                let refresh_token = {
                    let current = self.current.read().await;
                    current
                        .as_ref()
                        .and_then(|t| t.refresh_token.clone())
                        .filter(|r| !r.is_empty())
                        .ok_or(TokenStoreError::NoRefreshToken)?
                };

                match self.authenticator.refresh_access_token(&refresh_token).await {
                    Ok(tokens) => tokens.with_refresh_fallback(Some(refresh_token)),
                    Err(e) => {
                        warn!(error = %e, "refresh token exchange failed");
                        return Err(e.into());
                    }
                }
            }
            AcquisitionStrategy::AppFlow => match self.authenticator.app_login().await {
                Ok(tokens) => tokens,
                Err(e) => {
                    warn!(error = %e, "app login failed");
                    return Err(e.into());
                }
            },
        };

        self.exchanges.fetch_add(1, Ordering::Relaxed);
        *self.current.write().await = Some(fresh.clone());

        info!(strategy = ?self.strategy, expires_in = fresh.expires_in, "acquired access token");

        Ok(fresh)
    }
}
