//! Mock implementations of common traits
//!
//! Provides mock objects for testing purposes.

// Allow missing error/panic docs for test mocks - they are designed to be simple
// and errors are clearly indicated by their return types
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::auth::{AuthClientError, Authenticator, TokenSet};

/// Mock token endpoint
///
/// Issues numbered tokens (`access-1`, `refresh-1`, ...) and counts calls per
/// grant. Can be slowed down to widen race windows, and switched into a
/// failing mode at runtime.
///
/// # Examples
///
/// ```
/// use fleetlink_common::auth::Authenticator;
/// use fleetlink_common::testing::MockAuthenticator;
///
/// # tokio_test::block_on(async {
/// let auth = MockAuthenticator::new();
/// let tokens = auth.app_login().await.unwrap();
/// assert_eq!(tokens.access_token, "access-1");
/// assert_eq!(auth.app_calls(), 1);
/// # });
/// ```
#[derive(Debug)]
pub struct MockAuthenticator {
    refresh_calls: AtomicUsize,
    app_calls: AtomicUsize,
    issued: AtomicUsize,
    last_refresh_token: Mutex<Option<String>>,
    failure: Mutex<Option<String>>,
    delay: Option<Duration>,
    expires_in: i64,
    rotate_refresh_token: bool,
}

impl MockAuthenticator {
    /// Create a mock issuing one-hour tokens
    pub fn new() -> Self {
        Self {
            refresh_calls: AtomicUsize::new(0),
            app_calls: AtomicUsize::new(0),
            issued: AtomicUsize::new(0),
            last_refresh_token: Mutex::new(None),
            failure: Mutex::new(None),
            delay: None,
            expires_in: 3600,
            rotate_refresh_token: true,
        }
    }

    /// Sleep this long inside every exchange
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Lifetime of issued tokens in seconds
    #[must_use]
    pub fn with_expires_in(mut self, expires_in: i64) -> Self {
        self.expires_in = expires_in;
        self
    }

    /// Refresh responses carry no new refresh token
    #[must_use]
    pub fn without_refresh_token(mut self) -> Self {
        self.rotate_refresh_token = false;
        self
    }

    /// Make subsequent exchanges fail with `detail` (or succeed with `None`)
    pub fn set_failure(&self, detail: Option<String>) {
        *self.failure.lock() = detail;
    }

    #[must_use]
    pub fn refresh_calls(&self) -> usize {
        self.refresh_calls.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn app_calls(&self) -> usize {
        self.app_calls.load(Ordering::SeqCst)
    }

    /// Refresh token presented on the most recent refresh exchange
    #[must_use]
    pub fn last_refresh_token(&self) -> Option<String> {
        self.last_refresh_token.lock().clone()
    }

    async fn issue(&self, with_refresh: bool) -> Result<TokenSet, AuthClientError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        if let Some(detail) = self.failure.lock().clone() {
            return Err(AuthClientError::Rejected { status: 401, detail });
        }

        let n = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        let refresh_token = with_refresh.then(|| format!("refresh-{n}"));
        Ok(TokenSet::new(format!("access-{n}"), refresh_token, self.expires_in))
    }
}

impl Default for MockAuthenticator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Authenticator for MockAuthenticator {
    async fn refresh_access_token(&self, refresh_token: &str) -> Result<TokenSet, AuthClientError> {
        self.refresh_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_refresh_token.lock() = Some(refresh_token.to_string());
        self.issue(self.rotate_refresh_token).await
    }

    async fn app_login(&self) -> Result<TokenSet, AuthClientError> {
        self.app_calls.fetch_add(1, Ordering::SeqCst);
        self.issue(false).await
    }
}
