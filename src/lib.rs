#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

//! # insightline
//!
//! A thin HTTP backend for an analyst-facing business dashboard. It
//! translates natural-language questions into SQL through a hosted language
//! model (memoized with a TTL cache), executes them against a small SQLite
//! dataset, and exposes precomputed business KPIs and chart aggregates.
//!
//! ## Endpoints
//!
//! - `POST /api/query` - natural-language query → SQL → rows
//! - `GET  /api/kpis` - total revenue/orders/customers + revenue growth
//! - `GET  /api/chart/:kind` - sales_trend | product_performance | customer_analytics
//! - `GET  /metrics` - Prometheus exposition
//! - `GET  /health` - liveness check
//!
//! ## Quick Start
//!
//! ```bash
//! # Run with sample data and defaults (listens on 0.0.0.0:5000)
//! $ GEMINI_API_KEY=... insightline --seed
//!
//! $ curl -s localhost:5000/api/kpis
//! $ curl -s localhost:5000/api/chart/sales_trend
//! $ curl -s localhost:5000/api/query -d '{"query":"top 3 cities by revenue"}' \
//!     -H 'content-type: application/json'
//! ```

pub mod ai;
pub mod analytics;
pub mod cache;
pub mod config;
pub mod db;
pub mod error;
pub mod metrics;
pub mod seed;
pub mod server;

pub use ai::{GeminiProvider, LlmProvider, MockProvider, SqlGenerator};
pub use analytics::{AnalyticsEngine, ChartKind, Kpis};
pub use cache::SqlCache;
pub use config::{ServerArgs, ServerConfig};
pub use db::{Database, QueryResult, SqlValue};
pub use error::{InsightlineError, Result};
pub use server::run_server;
