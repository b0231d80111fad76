//! Default constants for insightline configuration
//!
//! These constants define the default values used throughout the
//! configuration system when no explicit value is provided.

/// Default listen address for the HTTP API
pub const DEFAULT_HTTP_ADDR: &str = "0.0.0.0:5000";

/// Default path to the SQLite database file
pub const DEFAULT_DB_PATH: &str = "data/business.db";

/// Default log level
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Default time-to-live for cached generated SQL, in seconds (1 hour)
pub const DEFAULT_CACHE_TTL_SECS: u64 = 3600;

/// Default secret key for development setups
pub const DEFAULT_SECRET_KEY: &str = "dev-secret-key";

/// Default request timeout for language-model calls, in milliseconds
pub const DEFAULT_LLM_TIMEOUT_MS: u64 = 30_000;

/// Default language model identifier
pub const DEFAULT_LLM_MODEL: &str = "gemini-pro";
