//! Logging setup and structured-log helpers

pub mod logging;

pub use logging::{error_label, init, LogFormat};
