//! Global error types for the Kismet REST client.
//!
//! All error categories are unified into a single `KisError` enum with
//! conversions from underlying library errors, so callers can tell a
//! transport failure from a rejected login or an undecodable response.

use thiserror::Error;

/// Convenience type alias for Results using KisError.
pub type KisResult<T> = Result<T, KisError>;

/// Unified error type covering all error categories in the client.
#[derive(Error, Debug)]
pub enum KisError {
    // -- Configuration errors --
    /// Failed to load or parse client configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// A required configuration value is missing.
    #[error("missing configuration: {0}")]
    MissingConfig(String),

    // -- Network errors --
    /// HTTP request failed before a response was received.
    #[error("http error: {0}")]
    Http(String),

    /// HTTP request timed out.
    #[error("request timeout: {0}")]
    Timeout(String),

    /// Server answered with something other than 200 OK.
    #[error("server error (status {status}): {message}")]
    ServerError {
        /// HTTP status code.
        status: u16,
        /// Response body, if any.
        message: String,
    },

    /// Login was refused or the session could not be validated.
    #[error("authentication failed: {0}")]
    AuthFailed(String),

    // -- Wire format errors --
    /// A response could not be decoded into plain values.
    #[error("decode error: {0}")]
    Decode(String),

    /// A command payload could not be encoded.
    #[error("encode error: {0}")]
    Encode(String),

    // -- File/IO errors --
    /// Reading or writing the session cookie cache failed.
    #[error("session cache error: {0}")]
    SessionCache(String),

    /// File system operation failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(String),

    // -- Generic --
    /// An unexpected internal error.
    #[error("internal error: {0}")]
    Internal(String),

    /// Wrapping anyhow errors for interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl KisError {
    /// HTTP status carried by this error, if it came from a server response.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::ServerError { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether this error means the server rejected our credentials.
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::AuthFailed(_))
    }
}

impl From<serde_json::Error> for KisError {
    fn from(e: serde_json::Error) -> Self {
        KisError::Serialization(e.to_string())
    }
}

impl From<toml::de::Error> for KisError {
    fn from(e: toml::de::Error) -> Self {
        KisError::Config(e.to_string())
    }
}

impl From<rmpv::decode::Error> for KisError {
    fn from(e: rmpv::decode::Error) -> Self {
        KisError::Decode(format!("invalid msgpack: {e}"))
    }
}

impl From<rmp_serde::encode::Error> for KisError {
    fn from(e: rmp_serde::encode::Error) -> Self {
        KisError::Encode(e.to_string())
    }
}
