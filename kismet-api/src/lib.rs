//! Kismet API - HTTP client for the Kismet server REST API.
//!
//! This crate provides a client covering the server's device, data source,
//! GPS and dot11 filter endpoints. It handles basic-auth login with a single
//! retry after a 401, caches the session cookie between runs, and decodes the
//! server's tagged msgpack responses into plain value trees.

pub mod client;
pub mod endpoints;
pub mod session;

// Re-export key types
pub use client::KismetClient;
pub use kismet_models::{FieldSpec, PlainValue, RegexFilter};
pub use session::{FileSessionStore, MemorySessionStore, SessionStore};
