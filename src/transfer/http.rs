//! HTTP chunk transport on reqwest
//!
//! One request per chunk with a `Content-Range: bytes start-end/total`
//! header. Responses are classified into [`TransferOutcome`]s; the transport
//! itself never retries.

use crate::range::ChunkDescriptor;
use crate::transfer::{ChunkTransport, TransferContext, TransferOutcome};
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::CONTENT_RANGE;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, warn};

/// Connection establishment timeout.
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default whole-request timeout per chunk. An elapsed timeout is reported
/// as a network failure and follows the executor's normal retry policy.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(300);

/// Upper bound on rejection body text carried in a [`TransferOutcome`].
const MAX_REJECTION_BODY: usize = 512;

/// Format the `Content-Range` value for a chunk: `bytes start-end/total`,
/// with end inclusive and `*` when the total resource length is unknown.
pub fn format_content_range(descriptor: &ChunkDescriptor, total_len: Option<u64>) -> String {
    match total_len {
        Some(total) => format!(
            "bytes {}-{}/{}",
            descriptor.offset,
            descriptor.last_offset(),
            total
        ),
        None => format!("bytes {}-{}/*", descriptor.offset, descriptor.last_offset()),
    }
}

fn truncate_message(text: &str) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    if trimmed.len() <= MAX_REJECTION_BODY {
        return Some(trimmed.to_string());
    }
    let mut cut = MAX_REJECTION_BODY;
    while !trimmed.is_char_boundary(cut) {
        cut -= 1;
    }
    Some(format!("{}...", &trimmed[..cut]))
}

/// HTTP transport owning the reqwest client for the run.
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Build a transport with the given per-request timeout.
    pub fn new(request_timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(request_timeout)
            .build()?;
        Ok(Self { client })
    }

    /// Wrap an already-configured client.
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ChunkTransport for HttpTransport {
    async fn send_chunk(
        &self,
        descriptor: &ChunkDescriptor,
        body: Bytes,
        ctx: &TransferContext,
    ) -> TransferOutcome {
        let content_range = format_content_range(descriptor, ctx.total_len);
        debug!(
            chunk = descriptor.index,
            content_range = %content_range,
            bytes = descriptor.len,
            "sending chunk"
        );

        let result = self
            .client
            .request(ctx.method.clone(), &ctx.url)
            .header(CONTENT_RANGE, content_range)
            .body(body)
            .send()
            .await;

        match result {
            Ok(response) => {
                let status = response.status();
                if status.is_success() {
                    debug!(chunk = descriptor.index, status = status.as_u16(), "chunk accepted");
                    TransferOutcome::accepted(descriptor.index, status.as_u16())
                } else {
                    let text = response.text().await.unwrap_or_else(|_| String::new());
                    warn!(
                        chunk = descriptor.index,
                        status = status.as_u16(),
                        "chunk rejected by endpoint"
                    );
                    TransferOutcome::rejected(
                        descriptor.index,
                        status.as_u16(),
                        truncate_message(&text),
                    )
                }
            }
            Err(err) => {
                warn!(chunk = descriptor.index, error = %err, "chunk transfer failed");
                TransferOutcome::network_failure(descriptor.index, err.to_string())
            }
        }
    }
}
