//! Client configuration management.
//!
//! Handles loading, saving, and accessing client configuration including the
//! server URI, login credentials, session cache location and logging
//! preferences. Configuration is persisted as TOML on disk.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::constants;
use crate::error::{KisError, KisResult};

/// Top-level client configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KismetConfig {
    /// Server connection settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Session cookie cache settings.
    #[serde(default)]
    pub session: SessionConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Server connection configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Kismet server URI including scheme, host and port.
    #[serde(default = "default_address")]
    pub address: String,

    /// Login user, sent with HTTP basic auth when set.
    #[serde(default)]
    pub username: Option<String>,

    /// Login password.
    #[serde(default)]
    pub password: Option<String>,

    /// Request timeout in milliseconds.
    #[serde(default = "default_timeout")]
    pub timeout_ms: u64,

    /// Whether to accept self-signed TLS certificates from the server.
    #[serde(default)]
    pub accept_self_signed_certs: bool,
}

/// Session cookie cache configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Path of the plaintext cookie cache. `~` expands to the home directory.
    #[serde(default = "default_cache_path")]
    pub cache_path: String,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Directory for log files. If empty, uses default location.
    #[serde(default)]
    pub directory: String,

    /// Enable JSON structured logging output.
    #[serde(default)]
    pub json_output: bool,
}

// Default value functions for serde

fn default_address() -> String {
    constants::DEFAULT_HOST_URI.to_string()
}

fn default_timeout() -> u64 {
    constants::DEFAULT_TIMEOUT_MS
}

fn default_cache_path() -> String {
    constants::DEFAULT_SESSION_CACHE.to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: default_address(),
            username: None,
            password: None,
            timeout_ms: default_timeout(),
            accept_self_signed_certs: false,
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cache_path: default_cache_path(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            directory: String::new(),
            json_output: false,
        }
    }
}

impl ServerConfig {
    /// Basic-auth credentials, if both halves are configured.
    pub fn credentials(&self) -> Option<(&str, &str)> {
        match (&self.username, &self.password) {
            (Some(u), Some(p)) => Some((u.as_str(), p.as_str())),
            _ => None,
        }
    }
}

impl KismetConfig {
    /// Load configuration from the default config file path.
    pub fn load_default() -> KisResult<Self> {
        let path = Self::default_config_path()?;
        if path.exists() {
            Self::load_from_file(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific file path.
    pub fn load_from_file(path: &Path) -> KisResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: KismetConfig = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Save configuration to a specific file path.
    pub fn save_to_file(&self, path: &Path) -> KisResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = toml::to_string_pretty(self)
            .map_err(|e| KisError::Config(format!("failed to serialize config: {e}")))?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> KisResult<PathBuf> {
        let base = dirs::config_dir()
            .ok_or_else(|| KisError::Config("could not determine config directory".into()))?;
        Ok(base.join(constants::APP_NAME).join("config.toml"))
    }

    /// Get the session cache path with `~` expanded.
    pub fn effective_cache_path(&self) -> KisResult<PathBuf> {
        expand_home(&self.session.cache_path)
    }

    /// Get the effective log directory, using the configured path or the default.
    pub fn effective_log_dir(&self) -> KisResult<PathBuf> {
        if self.logging.directory.is_empty() {
            let base = dirs::data_dir()
                .ok_or_else(|| KisError::Config("could not determine data directory".into()))?;
            Ok(base.join(constants::APP_NAME).join("logs"))
        } else {
            expand_home(&self.logging.directory)
        }
    }

    /// Sanitize and normalize a server URI.
    ///
    /// Ensures the address has a scheme and strips trailing slashes, so
    /// endpoint paths can be joined with a single `/`.
    pub fn sanitize_host_uri(address: &str) -> String {
        let trimmed = address.trim().trim_matches('"').trim();
        if trimmed.is_empty() {
            return String::new();
        }

        let with_scheme = if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            trimmed.to_string()
        } else {
            format!("http://{trimmed}")
        };

        with_scheme.trim_end_matches('/').to_string()
    }
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_home(path: &str) -> KisResult<PathBuf> {
    if path == "~" || path.starts_with("~/") {
        let home = dirs::home_dir()
            .ok_or_else(|| KisError::Config("could not determine home directory".into()))?;
        let rest = path.trim_start_matches('~').trim_start_matches('/');
        if rest.is_empty() {
            Ok(home)
        } else {
            Ok(home.join(rest))
        }
    } else {
        Ok(PathBuf::from(path))
    }
}
