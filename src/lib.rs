//! # Chunked Uploader Library
//!
//! Uploads a byte range of a local file to an HTTP endpoint by splitting it
//! into fixed-size chunks and sending each chunk as a separate request with
//! a `Content-Range` header, for endpoints that reassemble the resource from
//! in-order range segments.
//!
//! ## Features
//!
//! - **Deterministic chunk planning**: a byte range plus a chunk size always
//!   produces the same contiguous, gapless chunk sequence
//! - **Strictly ordered transfer**: chunk `i + 1` is never sent before chunk
//!   `i` is confirmed accepted
//! - **Bounded retries**: transient network failures retry the same chunk
//!   with exponential backoff; rejections abort immediately
//! - **Caller-driven resume**: an aborted run reports exactly how many
//!   chunks were accepted, so a narrowed range can resume the upload without
//!   re-sending accepted bytes
//! - **Graceful cancellation**: Ctrl+C takes effect at chunk boundaries,
//!   leaving the accepted-chunk count exact
//!
//! ## Quick Start
//!
//! ```no_run
//! use chunked_uploader::{ByteRange, UploadExecutor, UploadJob};
//! use reqwest::Method;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let job = UploadJob::new(
//!     "./payload.bin".into(),
//!     ByteRange::new(0, 2499)?,
//!     1000, // chunk size in bytes
//!     "http://localhost:8080/upload".to_string(),
//!     Method::PUT,
//! );
//!
//! let report = UploadExecutor::new().execute(job).await?;
//! assert!(report.is_complete());
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - [`range`] - Byte range arithmetic and chunk planning (pure, no I/O)
//! - [`source`] - Exact-length chunk reads from the backing file
//! - [`transfer`] - One HTTP round trip per chunk, outcome classification
//! - [`uploader`] - Run orchestration with the retry/abort policy
//! - [`cli`] - Command-line interface
//! - [`shutdown`] - Cancellation observed at chunk boundaries
//! - [`metrics`] - Optional Prometheus metrics

#![warn(missing_docs)]
#![warn(clippy::all)]

/// CLI command implementations
pub mod cli;

/// Observability metrics
pub mod metrics;

/// Byte range arithmetic and chunk planning
pub mod range;

/// Graceful shutdown coordination shared across modules
pub mod shutdown;

/// Chunk reads from the backing file
pub mod source;

/// Chunk transfer trait and HTTP transport
pub mod transfer;

/// Upload orchestration
pub mod uploader;

// Re-export commonly used types
pub use range::{chunk_plan, ByteRange, ChunkDescriptor, RangeError};
pub use source::{ChunkSource, SourceError};
pub use transfer::{ChunkStatus, ChunkTransport, TransferContext, TransferOutcome};
pub use uploader::{run_upload, JobStatus, UploadError, UploadExecutor, UploadJob, UploadReport};
