//! Prometheus metrics for the daemon.
//!
//! Recording goes through the `metrics` facade. Without an installed
//! recorder (unit tests, embedded use) every call is a no-op.

use metrics::{counter, gauge};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

pub const OPERATIONS_TOTAL: &str = "dictkv_operations_total";
pub const CONFLICTS_TOTAL: &str = "dictkv_conflicts_total";
pub const CLEANUP_EVICTED_TOTAL: &str = "dictkv_cleanup_evicted_total";
pub const AUTH_FAILURES_TOTAL: &str = "dictkv_auth_failures_total";
pub const RECORDS: &str = "dictkv_records";

/// Installs the global Prometheus recorder.
///
/// # Errors
///
/// Fails if a recorder is already installed for this process.
pub fn install() -> anyhow::Result<PrometheusHandle> {
    PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| anyhow::anyhow!("Failed to install Prometheus recorder: {e}"))
}

/// Count one store operation (`get`, `create`, `append`, `delete`).
pub fn record_operation(op: &'static str) {
    counter!(OPERATIONS_TOTAL, "op" => op).increment(1);
}

/// Count a create-if-absent that hit an existing key.
pub fn record_conflict() {
    counter!(CONFLICTS_TOTAL).increment(1);
}

pub fn record_auth_failure() {
    counter!(AUTH_FAILURES_TOTAL).increment(1);
}

/// Record the outcome of one sweep.
#[allow(clippy::cast_precision_loss)]
pub fn record_cleanup(evicted: usize, remaining: usize) {
    counter!(CLEANUP_EVICTED_TOTAL).increment(evicted as u64);
    gauge!(RECORDS).set(remaining as f64);
}

#[allow(clippy::cast_precision_loss)]
pub fn set_record_count(count: usize) {
    gauge!(RECORDS).set(count as f64);
}
