//! Upload job specification and run summary

use crate::range::ByteRange;
use crate::transfer::TransferOutcome;
use reqwest::Method;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Upload job specification.
///
/// Constructed once from caller inputs; the executor mutates only `status`
/// and `report` while the run progresses.
#[derive(Debug, Clone)]
pub struct UploadJob {
    /// Source file path
    pub file_path: PathBuf,
    /// Inclusive byte interval to upload
    pub range: ByteRange,
    /// Chunk size in bytes
    pub chunk_size: u64,
    /// Target URL
    pub url: String,
    /// HTTP method used for every chunk
    pub method: Method,
    /// Total resource length for `Content-Range`; filled from the file size
    /// when the source opens if not set by the caller
    pub total_len: Option<u64>,
    /// Current run state
    pub status: JobStatus,
    /// Running summary, folded into the final [`UploadReport`]
    pub report: UploadReport,
}

impl UploadJob {
    /// Create a new upload job in the `Idle` state.
    pub fn new(
        file_path: PathBuf,
        range: ByteRange,
        chunk_size: u64,
        url: String,
        method: Method,
    ) -> Self {
        Self {
            file_path,
            range,
            chunk_size,
            url,
            method,
            total_len: None,
            status: JobStatus::Idle,
            report: UploadReport::default(),
        }
    }

    /// Set the total resource length reported in `Content-Range` headers.
    pub fn with_total_len(mut self, total_len: u64) -> Self {
        self.total_len = Some(total_len);
        self
    }

    /// Validate job parameters before any chunk is sent.
    pub fn validate(&self) -> Result<(), String> {
        if self.chunk_size == 0 {
            return Err("chunk size must be a positive number of bytes".to_string());
        }
        if self.url.is_empty() {
            return Err("target URL cannot be empty".to_string());
        }
        Ok(())
    }
}

/// Run state machine: `Idle → Running → {Completed, Aborted}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum JobStatus {
    /// No chunk has been sent yet
    #[default]
    Idle,
    /// Iterating the chunk plan
    Running,
    /// Every chunk in the plan was accepted, in order
    Completed,
    /// A chunk failed and the failure policy stopped the run
    Aborted,
}

/// Terminal summary of one upload run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct UploadReport {
    /// Number of chunks in the plan
    pub total_chunks: u64,
    /// Chunks confirmed accepted before the run ended
    pub succeeded_chunks: u64,
    /// Total transport-level retries across the run
    pub retries: u64,
    /// The outcome that aborted the run, if any
    pub first_failure: Option<TransferOutcome>,
    /// Abort reason for failures without a transfer outcome
    /// (source read error, shutdown)
    pub error: Option<String>,
}

impl UploadReport {
    /// Whether every planned chunk was accepted.
    pub fn is_complete(&self) -> bool {
        self.total_chunks > 0 && self.succeeded_chunks == self.total_chunks
    }

    /// Completion percentage over the chunk plan (0.0 to 100.0).
    pub fn percentage(&self) -> f64 {
        if self.total_chunks == 0 {
            return 0.0;
        }
        (self.succeeded_chunks as f64 / self.total_chunks as f64) * 100.0
    }

    /// Absolute offset a resumption range should start at.
    ///
    /// Chunks are accepted strictly in order, so the first
    /// `succeeded_chunks` chunks cover exactly
    /// `succeeded_chunks * chunk_size` bytes from the range start. A caller
    /// resumes by re-invoking the pipeline with the range
    /// `resume_start..=range.end()`; nothing is persisted by the core.
    ///
    /// Returns `None` when the run completed and there is nothing to resume.
    pub fn resume_start(&self, range: &ByteRange, chunk_size: u64) -> Option<u64> {
        if self.is_complete() {
            return None;
        }
        Some(range.start() + self.succeeded_chunks * chunk_size)
    }
}
