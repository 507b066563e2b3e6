//! Token lifecycle for the fleet provider
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │   TokenStore    │  Current token + serialized acquisition
//! └────────┬────────┘
//!          │
//!          └──► Authenticator (trait)
//!                    │
//!                    └──► TokenClient   (HTTP token endpoint)
//! ```
//!
//! # Usage Example
//!
//! ```no_run
//! use std::time::Duration;
//!
//! use fleetlink_common::auth::{TokenClient, TokenEndpointConfig, TokenSet, TokenStore};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = TokenEndpointConfig::new(
//!     "https://api.tronity.tech/authentication",
//!     "client_id",
//!     "client_secret",
//! );
//! let client = TokenClient::new(config, Duration::from_secs(10))?;
//!
//! // A configured pair selects the refresh flow; `None` selects the app flow.
//! let store = TokenStore::new(client, Some(TokenSet::from_stored("access", "refresh")));
//! let token = store.access_token().await?;
//! # let _ = token;
//! # Ok(())
//! # }
//! ```
//!
//! # Module Organization
//!
//! - **[`types`]**: `TokenSet`, token endpoint payloads and configuration
//! - **[`client`]**: HTTP client for the token endpoint
//! - **[`traits`]**: `Authenticator` seam for mocking
//! - **[`token_store`]**: strategy selection and single-exchange acquisition

pub mod client;
pub mod token_store;
pub mod traits;
pub mod types;

pub use client::{AuthClientError, TokenClient, APP_GRANT_TYPE};
pub use token_store::{
    AcquisitionStrategy, TokenStore, TokenStoreError, DEFAULT_EXPIRY_LEEWAY_SECS,
};
pub use traits::Authenticator;
pub use types::{TokenEndpointConfig, TokenEndpointError, TokenResponse, TokenSet};
