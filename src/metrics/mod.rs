//! Metrics collection and exposition for insightline
//!
//! Prometheus-compatible metrics for query execution. The executor counts
//! every SQL statement it runs and records its wall-clock duration; the
//! `/metrics` endpoint renders the installed recorder's state as text
//! exposition.

use metrics::{describe_counter, describe_histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::sync::{Arc, OnceLock};

static METRICS_INITIALIZED: OnceLock<Arc<PrometheusHandle>> = OnceLock::new();

/// Initialize metrics and return the Prometheus handle.
///
/// This function can only install the global recorder once per process.
/// In tests, the first call wins; later calls receive a handle that renders
/// an empty registry rather than failing.
pub fn init_metrics() -> PrometheusHandle {
    if let Some(handle) = METRICS_INITIALIZED.get() {
        return (**handle).clone();
    }

    let builder = PrometheusBuilder::new();
    match builder.install_recorder() {
        Ok(handle) => {
            register_metrics();
            let _ = METRICS_INITIALIZED.set(Arc::new(handle.clone()));
            handle
        }
        Err(_) => {
            // A recorder is already installed (e.g. by another test). Build
            // a detached recorder just to obtain a renderable handle.
            if let Some(handle) = METRICS_INITIALIZED.get() {
                return (**handle).clone();
            }
            let recorder = PrometheusBuilder::new().build_recorder();
            let handle = recorder.handle();
            drop(recorder);
            handle
        }
    }
}

/// Register metric descriptions.
fn register_metrics() {
    describe_counter!(
        "insightline_sql_queries_total",
        "Total SQL queries executed"
    );
    describe_histogram!(
        "insightline_query_duration_seconds",
        "Query execution time"
    );
}
