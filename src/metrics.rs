//! Observability metrics for upload runs
//!
//! Uses the `metrics` crate for low-overhead collection with an optional
//! Prometheus scrape endpoint. Everything degrades gracefully when no
//! exporter is installed: the macros become no-ops.

use metrics::{counter, describe_counter, describe_histogram, histogram, Unit};
use metrics_exporter_prometheus::PrometheusBuilder;
use once_cell::sync::OnceCell;
use std::net::SocketAddr;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

use crate::transfer::{ChunkStatus, TransferOutcome};

static METRICS_INITIALIZED: OnceCell<()> = OnceCell::new();

/// Install the Prometheus exporter and register metric descriptions.
///
/// Idempotent; called once at startup when `--metrics-addr` is given.
pub fn init_metrics(addr: SocketAddr) -> Result<(), String> {
    if METRICS_INITIALIZED.get().is_some() {
        debug!("metrics already initialized, skipping");
        return Ok(());
    }

    info!(addr = %addr, "initializing metrics exporter");

    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|e| format!("failed to install Prometheus exporter: {e}"))?;

    describe_counter!(
        "chunk_requests_total",
        Unit::Count,
        "Total chunk requests sent, labeled by outcome"
    );
    describe_counter!(
        "chunk_retries_total",
        Unit::Count,
        "Total chunk retry attempts"
    );
    describe_counter!(
        "uploads_completed_total",
        Unit::Count,
        "Upload runs where every chunk was accepted"
    );
    describe_counter!(
        "uploads_failed_total",
        Unit::Count,
        "Upload runs that aborted"
    );
    describe_histogram!(
        "chunk_request_duration_seconds",
        Unit::Seconds,
        "Wall time of individual chunk requests"
    );
    describe_histogram!(
        "retry_backoff_duration_seconds",
        Unit::Seconds,
        "Backoff delay before chunk retries"
    );

    let _ = METRICS_INITIALIZED.set(());
    info!("metrics exporter ready");
    Ok(())
}

/// Whether the exporter has been installed.
pub fn is_initialized() -> bool {
    METRICS_INITIALIZED.get().is_some()
}

/// Record the backoff taken before a chunk retry.
pub fn record_retry_backoff(backoff: Duration, retry_count: u32) {
    counter!(
        "chunk_retries_total",
        "attempt" => retry_count.to_string(),
    )
    .increment(1);

    histogram!("retry_backoff_duration_seconds").record(backoff.as_secs_f64());
}

/// Timing handle for a single chunk request.
pub struct ChunkRequestMetrics {
    chunk_index: u64,
    attempt: u32,
    start_time: Instant,
}

impl ChunkRequestMetrics {
    /// Start timing a chunk request. `attempt` is 0 for the initial send.
    pub fn start(chunk_index: u64, attempt: u32) -> Self {
        Self {
            chunk_index,
            attempt,
            start_time: Instant::now(),
        }
    }

    /// Record the classified outcome of the request.
    pub fn record(&self, outcome: &TransferOutcome) {
        let duration = self.start_time.elapsed();
        let status_label = match outcome.status {
            ChunkStatus::Accepted => "accepted",
            ChunkStatus::Rejected => "rejected",
            ChunkStatus::NetworkFailure => "network_failure",
        };

        counter!(
            "chunk_requests_total",
            "status" => status_label,
        )
        .increment(1);

        histogram!("chunk_request_duration_seconds").record(duration.as_secs_f64());

        if outcome.status == ChunkStatus::NetworkFailure {
            warn!(
                chunk = self.chunk_index,
                attempt = self.attempt,
                duration_ms = duration.as_millis() as u64,
                "network failure recorded"
            );
        }
    }
}

/// Per-run metrics handle.
pub struct UploadMetrics {
    url: String,
    start_time: Instant,
}

impl UploadMetrics {
    /// Start tracking an upload run.
    pub fn start(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            start_time: Instant::now(),
        }
    }

    /// Record a fully accepted run.
    pub fn record_success(&self, chunks: u64) {
        counter!("uploads_completed_total").increment(1);

        info!(
            url = %self.url,
            chunks = chunks,
            duration_secs = self.start_time.elapsed().as_secs(),
            "upload completed"
        );
    }

    /// Record an aborted run.
    pub fn record_failure(&self, error: &str) {
        counter!("uploads_failed_total").increment(1);

        error!(
            url = %self.url,
            error = %error,
            duration_secs = self.start_time.elapsed().as_secs(),
            "upload aborted"
        );
    }
}
