//! Command-line arguments for the insightline server
//!
//! This module defines the CLI arguments structure using clap.

use clap::Parser;
use std::path::PathBuf;

use super::defaults::*;

/// Command-line arguments for the insightline server
#[derive(Parser, Debug, Clone)]
#[command(name = "insightline")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Natural-language analytics backend for the business dashboard")]
pub struct ServerArgs {
    /// Address to listen on for the HTTP API
    #[arg(long, env = "INSIGHTLINE_HTTP_ADDR", default_value = DEFAULT_HTTP_ADDR)]
    pub http_addr: String,

    /// Path to the SQLite database file
    #[arg(long, env = "INSIGHTLINE_DB_PATH", default_value = DEFAULT_DB_PATH)]
    pub db_path: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "INSIGHTLINE_LOG_LEVEL", default_value = DEFAULT_LOG_LEVEL)]
    pub log_level: String,

    /// Time-to-live for cached generated SQL, in seconds
    #[arg(long, env = "INSIGHTLINE_CACHE_TTL_SECS", default_value_t = DEFAULT_CACHE_TTL_SECS)]
    pub cache_ttl_secs: u64,

    /// Load sample business data into the database at startup
    #[arg(long, env = "INSIGHTLINE_SEED")]
    pub seed: bool,

    /// API key for the Gemini language model.
    /// When absent the server still starts; natural-language queries fail
    /// with an LLM error until a key is provided.
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    pub gemini_api_key: Option<String>,

    /// Secret key for session signing
    #[arg(long, env = "INSIGHTLINE_SECRET_KEY", hide_env_values = true, default_value = DEFAULT_SECRET_KEY)]
    pub secret_key: String,
}
