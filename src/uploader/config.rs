//! Upload retry configuration constants

use std::time::Duration;

/// Maximum number of retries for a chunk that failed at the transport level.
/// 5 retries with exponential backoff rides out transient network issues
/// without looping forever on a dead endpoint (max total wait ~1 minute).
pub const MAX_RETRIES: u32 = 5;

/// Initial backoff delay in milliseconds.
pub const INITIAL_BACKOFF_MS: u64 = 1000; // 1 second

/// Maximum backoff delay in milliseconds.
/// Caps the exponential growth so late retries stay responsive
/// (retry 5 = 32s capped to 30s).
pub const MAX_BACKOFF_MS: u64 = 30_000; // 30 seconds

/// Default chunk size in bytes when the caller does not supply one.
pub const DEFAULT_CHUNK_SIZE: u64 = 5_000_000;

/// Calculate exponential backoff delay for a retry attempt
pub fn calculate_backoff(retry_count: u32) -> Duration {
    let delay_ms = INITIAL_BACKOFF_MS * 2u64.pow(retry_count.min(16));
    Duration::from_millis(delay_ms.min(MAX_BACKOFF_MS))
}
