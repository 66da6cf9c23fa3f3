//! Upload orchestration
//!
//! The executor walks the chunk plan strictly in order, reads each chunk
//! from the source, hands it to the transport, and applies the failure
//! policy:
//!
//! - network failures are retried on the same chunk with exponential
//!   backoff, up to a bounded count;
//! - a rejection (non-2xx response) aborts the run immediately;
//! - a source read failure aborts the run immediately.
//!
//! Nothing is persisted between runs. An aborted run's
//! [`UploadReport::resume_start`] tells the caller where a narrowed range
//! must begin to resume without re-sending accepted bytes.
//!
//! ```no_run
//! use chunked_uploader::{ByteRange, UploadExecutor, UploadJob};
//! use reqwest::Method;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let job = UploadJob::new(
//!     "./payload.bin".into(),
//!     ByteRange::new(0, 2499)?,
//!     1000,
//!     "http://localhost:8080/upload".to_string(),
//!     Method::PUT,
//! );
//!
//! let report = UploadExecutor::new().execute(job).await?;
//! if !report.is_complete() {
//!     eprintln!("upload stopped after {} chunks", report.succeeded_chunks);
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod executor;
pub mod job;
pub mod progress;

pub use executor::UploadExecutor;
pub use job::{JobStatus, UploadJob, UploadReport};
pub use progress::{ProgressState, ProgressTracker};

use crate::range::ByteRange;
use reqwest::Method;
use std::path::PathBuf;

/// One-call entry point: upload `range` of the file at `file_path` to `url`
/// in `chunk_size`-byte chunks with default retry settings.
pub async fn run_upload(
    file_path: PathBuf,
    range: ByteRange,
    chunk_size: u64,
    url: String,
    method: Method,
) -> Result<UploadReport, UploadError> {
    UploadExecutor::new()
        .execute(UploadJob::new(file_path, range, chunk_size, url, method))
        .await
}

/// Upload errors surfaced before any chunk is sent
#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    /// Non-positive chunk size, malformed or out-of-file range, or a file
    /// that cannot be opened
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// HTTP client construction failure
    #[error("failed to build HTTP client: {0}")]
    Client(String),
}
