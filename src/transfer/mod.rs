//! Chunk transfer trait and outcome types
//!
//! The [`ChunkTransport`] trait is the seam between the upload controller
//! and the wire: one implementation speaks HTTP ([`http::HttpTransport`]),
//! test doubles script outcomes. A transport performs exactly one network
//! round trip per call and never retries; the retry policy belongs to the
//! executor.

use crate::range::ChunkDescriptor;
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Method;
use serde::{Deserialize, Serialize};

pub mod http;

pub use http::HttpTransport;

/// Classification of a single chunk attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChunkStatus {
    /// Endpoint answered with a 2xx status
    Accepted,
    /// Endpoint answered with a non-2xx status; semantic failure, never retried
    Rejected,
    /// Connection failure, timeout, or other transport-level error
    NetworkFailure,
}

/// Result of one chunk attempt.
///
/// Produced once per attempt and folded into the run's
/// [`UploadReport`](crate::uploader::UploadReport); never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransferOutcome {
    /// Index of the chunk this attempt belongs to
    pub chunk_index: u64,
    /// How the attempt ended
    pub status: ChunkStatus,
    /// HTTP status code, when a response was received
    pub http_status: Option<u16>,
    /// Response body or transport error text, truncated for reporting
    pub message: Option<String>,
}

impl TransferOutcome {
    /// A chunk confirmed by the endpoint.
    pub fn accepted(chunk_index: u64, http_status: u16) -> Self {
        Self {
            chunk_index,
            status: ChunkStatus::Accepted,
            http_status: Some(http_status),
            message: None,
        }
    }

    /// A chunk refused by the endpoint.
    pub fn rejected(chunk_index: u64, http_status: u16, message: Option<String>) -> Self {
        Self {
            chunk_index,
            status: ChunkStatus::Rejected,
            http_status: Some(http_status),
            message,
        }
    }

    /// A chunk that never produced an HTTP response.
    pub fn network_failure(chunk_index: u64, message: impl Into<String>) -> Self {
        Self {
            chunk_index,
            status: ChunkStatus::NetworkFailure,
            http_status: None,
            message: Some(message.into()),
        }
    }

    /// Whether the endpoint confirmed the chunk.
    pub fn is_accepted(&self) -> bool {
        self.status == ChunkStatus::Accepted
    }
}

/// Per-run request parameters shared by every chunk.
#[derive(Debug, Clone)]
pub struct TransferContext {
    /// Target URL
    pub url: String,
    /// HTTP method, used uniformly for every chunk
    pub method: Method,
    /// Total resource length for the `Content-Range` header; `None` emits
    /// the unknown-total `*` form
    pub total_len: Option<u64>,
}

/// One network round trip per chunk.
#[async_trait]
pub trait ChunkTransport: Send + Sync {
    /// Transmit `body` as the chunk described by `descriptor` and classify
    /// the result. Implementations must not retry internally.
    async fn send_chunk(
        &self,
        descriptor: &ChunkDescriptor,
        body: Bytes,
        ctx: &TransferContext,
    ) -> TransferOutcome;
}
