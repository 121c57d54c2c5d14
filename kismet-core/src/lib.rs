//! Kismet Core - Foundation types, error handling, configuration, and logging.
//!
//! This crate provides the shared foundation used by the other Kismet client crates:
//! - Client configuration (server URI, credentials, session cache, logging)
//! - Global error type covering transport, decode and encode failures
//! - Structured logging with tracing
//! - Common constants (cookie name, endpoint paths)

pub mod config;
pub mod constants;
pub mod error;
pub mod logging;

// Re-export commonly used items at the crate root
pub use config::KismetConfig;
pub use error::{KisError, KisResult};
pub use logging::{init_logging, init_logging_from_config};
