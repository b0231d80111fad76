//! Configuration module for insightline
//!
//! This module is organized into submodules:
//! - `defaults` - Default constants and values
//! - `args` - CLI argument definitions
//!
//! Configuration is read once at process start. Components receive their
//! dependencies explicitly at construction rather than through process-wide
//! singletons.

mod args;
mod defaults;

pub use args::ServerArgs;
pub use defaults::*;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::{InsightlineError, Result};

/// Complete server configuration for insightline.
///
/// Settings are resolved from CLI arguments and `INSIGHTLINE_*` environment
/// variables (environment takes effect through clap's `env` support).
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address the HTTP API listens on.
    pub http_addr: SocketAddr,
    /// Path to the SQLite database file.
    pub db_path: PathBuf,
    /// Log level used when `RUST_LOG` is not set.
    pub log_level: String,
    /// TTL for cached generated SQL.
    pub cache_ttl: Duration,
    /// Whether to load sample data at startup.
    pub seed: bool,
    /// Gemini API key, if configured.
    pub gemini_api_key: Option<String>,
    /// Secret key for session signing.
    pub secret_key: String,
}

impl ServerConfig {
    /// Build a configuration from parsed CLI arguments.
    pub fn from_args(args: ServerArgs) -> Result<Self> {
        let http_addr: SocketAddr = args.http_addr.parse().map_err(|e| {
            InsightlineError::Config(format!("Invalid HTTP address '{}': {}", args.http_addr, e))
        })?;

        Ok(Self {
            http_addr,
            db_path: args.db_path,
            log_level: args.log_level,
            cache_ttl: Duration::from_secs(args.cache_ttl_secs),
            seed: args.seed,
            gemini_api_key: args.gemini_api_key,
            secret_key: args.secret_key,
        })
    }

    /// Ensure the parent directory of the database file exists.
    pub fn ensure_db_dir(&self) -> Result<()> {
        if let Some(parent) = self.db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        Ok(())
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http_addr: DEFAULT_HTTP_ADDR.parse().unwrap_or_else(|_| {
                SocketAddr::from(([0, 0, 0, 0], 5000))
            }),
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            cache_ttl: Duration::from_secs(DEFAULT_CACHE_TTL_SECS),
            seed: false,
            gemini_api_key: None,
            secret_key: DEFAULT_SECRET_KEY.to_string(),
        }
    }
}
