//! HTTP server for the analytics dashboard
//!
//! Wires the components together -- store, cache, translator, analytics --
//! and serves the JSON API plus Prometheus metrics.

pub mod http;

pub use http::{create_api_router, ApiError, ApiState, NlQueryRequest, NlQueryResponse};

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;

use crate::ai::{GeminiProvider, SqlGenerator};
use crate::analytics::AnalyticsEngine;
use crate::cache::SqlCache;
use crate::config::ServerConfig;
use crate::db::Database;
use crate::error::{InsightlineError, Result};
use crate::metrics::init_metrics;
use crate::seed;

/// Start the HTTP server and run until the process is stopped.
pub async fn run_server(config: ServerConfig) -> Result<()> {
    let metrics_handle = init_metrics();

    config.ensure_db_dir()?;
    let db = Arc::new(Database::new(&config.db_path));
    db.init_schema()?;
    info!(path = %config.db_path.display(), "Database ready");

    if config.seed {
        seed::load_sample_data(&db)?;
    }

    let cache = Arc::new(SqlCache::new(config.cache_ttl));
    let provider = Arc::new(GeminiProvider::new(config.gemini_api_key.clone())?);
    let generator = Arc::new(SqlGenerator::new(provider, cache));
    let analytics = Arc::new(AnalyticsEngine::new(db.clone()));

    let state = ApiState {
        db,
        analytics,
        generator,
        metrics_handle,
    };
    let app = create_api_router(state);

    let listener = TcpListener::bind(config.http_addr)
        .await
        .map_err(|e| InsightlineError::Config(format!("Failed to bind {}: {}", config.http_addr, e)))?;

    info!(addr = %config.http_addr, "HTTP API listening");

    axum::serve(listener, app)
        .await
        .map_err(InsightlineError::Io)?;

    Ok(())
}
