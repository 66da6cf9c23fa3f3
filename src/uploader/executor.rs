//! Upload executor: the sequential chunk pipeline with retry and abort policy

use crate::metrics::{record_retry_backoff, ChunkRequestMetrics, UploadMetrics};
use crate::range::{chunk_plan, ChunkDescriptor};
use crate::shutdown::{self, SharedShutdown};
use crate::source::ChunkSource;
use crate::transfer::http::DEFAULT_REQUEST_TIMEOUT;
use crate::transfer::{ChunkStatus, ChunkTransport, HttpTransport, TransferContext, TransferOutcome};
use crate::uploader::config::{calculate_backoff, MAX_RETRIES};
use crate::uploader::progress::ProgressTracker;
use crate::uploader::{JobStatus, UploadError, UploadJob, UploadReport};
use std::time::Duration;
use tracing::{error, info, warn};

/// Orchestrates one upload run across the whole chunk plan.
///
/// Chunks are processed strictly in ascending index order; chunk `i + 1` is
/// never sent before chunk `i` is confirmed accepted, because the endpoint
/// reassembles `Content-Range` segments in offset order. Transient network
/// failures are retried with exponential backoff up to a bounded count; a
/// rejection or a source read failure aborts the run immediately.
pub struct UploadExecutor {
    max_retries: u32,
    request_timeout: Duration,
    progress_tracker: ProgressTracker,
    shutdown: Option<SharedShutdown>,
}

impl UploadExecutor {
    /// Create an executor with default retry and timeout settings.
    pub fn new() -> Self {
        Self {
            max_retries: MAX_RETRIES,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            progress_tracker: ProgressTracker::default(),
            shutdown: shutdown::global(),
        }
    }

    /// Set the maximum number of retries per chunk.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Set the per-chunk request timeout.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Attach a shared shutdown handle for cancellation at chunk boundaries.
    pub fn with_shutdown(mut self, shutdown: SharedShutdown) -> Self {
        self.shutdown = Some(shutdown);
        self
    }

    /// Override progress emission cadence.
    pub fn with_progress_tracker(mut self, tracker: ProgressTracker) -> Self {
        self.progress_tracker = tracker;
        self
    }

    /// Execute an upload job over HTTP.
    ///
    /// Returns `Err` only for pre-flight failures (invalid configuration,
    /// unopenable file, HTTP client construction). Everything after the
    /// first chunk is sent resolves into the returned [`UploadReport`].
    pub async fn execute(&self, job: UploadJob) -> Result<UploadReport, UploadError> {
        let transport = HttpTransport::new(self.request_timeout)
            .map_err(|e| UploadError::Client(e.to_string()))?;
        self.execute_with_transport(job, &transport).await
    }

    /// Execute an upload job over an injected transport.
    ///
    /// Used by [`execute`](Self::execute) and by tests that script transfer
    /// outcomes.
    pub async fn execute_with_transport(
        &self,
        mut job: UploadJob,
        transport: &dyn ChunkTransport,
    ) -> Result<UploadReport, UploadError> {
        let span = tracing::info_span!(
            "execute_upload",
            file = %job.file_path.display(),
            url = %job.url,
            range = %job.range,
            chunk_size = job.chunk_size
        );
        let _enter = span.enter();

        info!("starting chunked upload");
        let upload_metrics = UploadMetrics::start(&job.url);

        job.validate().map_err(UploadError::InvalidConfiguration)?;

        let mut source = ChunkSource::open(&job.file_path)
            .await
            .map_err(|e| UploadError::InvalidConfiguration(e.to_string()))?;
        job.range
            .check_within(source.len())
            .map_err(|e| UploadError::InvalidConfiguration(e.to_string()))?;
        if job.total_len.is_none() {
            job.total_len = Some(source.len());
        }

        let plan = chunk_plan(&job.range, job.chunk_size)
            .map_err(|e| UploadError::InvalidConfiguration(e.to_string()))?;
        job.report.total_chunks = plan.len() as u64;
        info!(total_chunks = plan.len(), bytes = job.range.len(), "chunk plan computed");

        job.status = JobStatus::Running;
        let report = self.run(&mut job, &plan, transport, &mut source).await;

        if job.status == JobStatus::Completed {
            upload_metrics.record_success(report.succeeded_chunks);
        } else {
            upload_metrics.record_failure(report.error.as_deref().unwrap_or("unknown error"));
        }

        info!(
            status = ?job.status,
            succeeded_chunks = report.succeeded_chunks,
            total_chunks = report.total_chunks,
            retries = report.retries,
            "upload run finished"
        );

        Ok(report)
    }

    /// Sequential chunk loop. Advances only after the current chunk is
    /// confirmed accepted.
    async fn run(
        &self,
        job: &mut UploadJob,
        plan: &[ChunkDescriptor],
        transport: &dyn ChunkTransport,
        source: &mut ChunkSource,
    ) -> UploadReport {
        let ctx = TransferContext {
            url: job.url.clone(),
            method: job.method.clone(),
            total_len: job.total_len,
        };
        let mut progress = self
            .progress_tracker
            .create_state(plan.len() as u64, job.range.len());

        for descriptor in plan {
            if self.shutdown_requested() {
                return self.abort_due_to_shutdown(job);
            }

            let body = match source.read_chunk(descriptor).await {
                Ok(body) => body,
                Err(e) => {
                    // The source itself is suspect; not a retriable condition.
                    error!(chunk = descriptor.index, error = %e, "source read failed, aborting");
                    job.status = JobStatus::Aborted;
                    job.report.error = Some(e.to_string());
                    return job.report.clone();
                }
            };

            let mut retry_count = 0u32;
            loop {
                let request_metrics = ChunkRequestMetrics::start(descriptor.index, retry_count);
                let outcome = transport.send_chunk(descriptor, body.clone(), &ctx).await;
                request_metrics.record(&outcome);

                match outcome.status {
                    ChunkStatus::Accepted => {
                        job.report.succeeded_chunks += 1;
                        progress.update(1, descriptor.len);
                        if progress.should_emit_update() {
                            info!("{}", progress.format_progress());
                            progress.mark_emitted();
                        }
                        break;
                    }
                    ChunkStatus::Rejected => {
                        // Semantic refusal from the endpoint; later chunks
                        // would leave non-adjacent accepted ranges, so stop.
                        error!(
                            chunk = descriptor.index,
                            http_status = outcome.http_status,
                            "chunk rejected, aborting"
                        );
                        job.status = JobStatus::Aborted;
                        job.report.error = Some(describe_failure(&outcome));
                        job.report.first_failure = Some(outcome);
                        return job.report.clone();
                    }
                    ChunkStatus::NetworkFailure => {
                        retry_count += 1;
                        if !self.retry_with_backoff(retry_count, job).await {
                            if self.shutdown_requested() {
                                return self.abort_due_to_shutdown(job);
                            }
                            job.status = JobStatus::Aborted;
                            job.report.error = Some(format!(
                                "max retries ({}) exceeded: {}",
                                self.max_retries,
                                describe_failure(&outcome)
                            ));
                            job.report.first_failure = Some(outcome);
                            return job.report.clone();
                        }
                    }
                }
            }
        }

        job.status = JobStatus::Completed;
        job.report.clone()
    }

    /// Wait out the backoff before re-sending the same chunk. Returns false
    /// when the retry budget is spent or shutdown was requested.
    async fn retry_with_backoff(&self, retry_count: u32, job: &mut UploadJob) -> bool {
        if retry_count > self.max_retries {
            error!(
                retry_count,
                max_retries = self.max_retries,
                "max retries exceeded"
            );
            return false;
        }

        job.report.retries += 1;
        let backoff = calculate_backoff(retry_count - 1);
        warn!(
            retry_count,
            max_retries = self.max_retries,
            backoff_ms = backoff.as_millis() as u64,
            "retrying chunk after backoff delay"
        );
        record_retry_backoff(backoff, retry_count);

        if self.shutdown_requested() {
            return false;
        }
        if let Some(shutdown) = &self.shutdown {
            tokio::select! {
                _ = tokio::time::sleep(backoff) => {}
                _ = shutdown.wait() => return false,
            }
        } else {
            tokio::time::sleep(backoff).await;
        }

        true
    }

    fn shutdown_requested(&self) -> bool {
        self.shutdown
            .as_ref()
            .map(|s| s.is_requested())
            .unwrap_or(false)
    }

    fn abort_due_to_shutdown(&self, job: &mut UploadJob) -> UploadReport {
        warn!("shutdown requested - stopping at chunk boundary");
        job.status = JobStatus::Aborted;
        job.report.error = Some("shutdown requested".to_string());
        job.report.clone()
    }
}

impl Default for UploadExecutor {
    fn default() -> Self {
        Self::new()
    }
}

fn describe_failure(outcome: &TransferOutcome) -> String {
    let detail = outcome.message.as_deref().unwrap_or("no response body");
    match outcome.http_status {
        Some(code) => format!("chunk {} got HTTP {code}: {detail}", outcome.chunk_index),
        None => format!("chunk {} transfer failed: {detail}", outcome.chunk_index),
    }
}
