//! Fleet API adapter implementing the vehicle ports

pub mod client;

pub use client::FleetApi;
