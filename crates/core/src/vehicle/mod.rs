//! Vehicle resolution, capability composition and cached telemetry

pub mod capabilities;
pub mod catalog;
pub mod handle;
pub mod ports;
pub mod service;
pub mod telemetry;
