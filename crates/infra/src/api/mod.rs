//! Authorized access to the fleet API
//!
//! # Architecture
//!
//! - [`HttpClient`](crate::http::HttpClient) retries transport failures and 5xx
//! - [`ApiClient`] attaches bearer tokens and renews once on 401
//! - [`ApiAuthService`] sources tokens from the shared token store
//! - [`ApiError`] classifies failures for the fleet adapter

pub mod auth;
pub mod client;
pub mod errors;

pub use auth::{AccessTokenProvider, ApiAuthService};
pub use client::{ApiClient, ApiClientConfig};
pub use errors::{ApiError, ApiErrorCategory};
