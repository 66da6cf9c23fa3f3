//! Progress tracking for long-running uploads
//!
//! Periodic user-facing updates surfaced through the executor's tracing
//! output. The chunk plan is always fully known up front, so percentages are
//! exact, and the emission cadence is gated by both elapsed time and
//! percentage jumps to keep logs quiet for small uploads.

use std::time::{Duration, Instant};

const DEFAULT_UPDATE_INTERVAL: Duration = Duration::from_secs(15);
const MIN_RUN_DURATION: Duration = Duration::from_secs(5);

/// Builder controlling progress update cadence.
#[derive(Debug, Clone)]
pub struct ProgressTracker {
    update_interval: Duration,
    min_percentage_step: f64,
}

impl ProgressTracker {
    /// Create a tracker with custom interval and percentage step.
    pub fn new(update_interval: Duration, min_percentage_step: f64) -> Self {
        Self {
            update_interval,
            min_percentage_step,
        }
    }

    /// Build a [`ProgressState`] for a run of known size.
    pub fn create_state(&self, total_chunks: u64, total_bytes: u64) -> ProgressState {
        let mut state = ProgressState::new(total_chunks, total_bytes);
        state.update_interval = self.update_interval;
        state.min_percentage_step = self.min_percentage_step;
        state
    }
}

impl Default for ProgressTracker {
    fn default() -> Self {
        Self::new(DEFAULT_UPDATE_INTERVAL, 10.0)
    }
}

/// Progress state for one upload run.
#[derive(Debug, Clone)]
pub struct ProgressState {
    /// Chunks accepted so far
    pub chunks_sent: u64,
    /// Bytes accepted so far
    pub bytes_sent: u64,
    /// Chunks in the plan
    pub total_chunks: u64,
    /// Bytes in the range
    pub total_bytes: u64,
    start_time: Instant,
    last_update: Instant,
    update_interval: Duration,
    min_percentage_step: f64,
    last_reported_percentage: f64,
}

impl ProgressState {
    /// Create progress state with default cadence.
    pub fn new(total_chunks: u64, total_bytes: u64) -> Self {
        let now = Instant::now();
        Self {
            chunks_sent: 0,
            bytes_sent: 0,
            total_chunks,
            total_bytes,
            start_time: now,
            last_update: now,
            update_interval: DEFAULT_UPDATE_INTERVAL,
            min_percentage_step: 10.0,
            last_reported_percentage: 0.0,
        }
    }

    /// Record an accepted chunk.
    pub fn update(&mut self, chunks: u64, bytes: u64) {
        self.chunks_sent = self.chunks_sent.saturating_add(chunks);
        self.bytes_sent = self.bytes_sent.saturating_add(bytes);
    }

    /// Completion percentage over the chunk plan.
    pub fn percentage(&self) -> f64 {
        if self.total_chunks == 0 {
            return 100.0;
        }
        (self.chunks_sent as f64 / self.total_chunks as f64) * 100.0
    }

    /// Current upload rate in bytes per second.
    pub fn rate_bytes_per_sec(&self) -> f64 {
        let elapsed = self.start_time.elapsed().as_secs_f64();
        if elapsed > 0.0 {
            self.bytes_sent as f64 / elapsed
        } else {
            0.0
        }
    }

    /// Whether a progress update should be emitted now.
    pub fn should_emit_update(&self) -> bool {
        if self.chunks_sent == 0 {
            return false;
        }

        if self.percentage() - self.last_reported_percentage >= self.min_percentage_step {
            return true;
        }

        self.start_time.elapsed() >= MIN_RUN_DURATION
            && self.last_update.elapsed() >= self.update_interval
    }

    /// Call after emitting a progress log to reset the cadence gates.
    pub fn mark_emitted(&mut self) {
        self.last_update = Instant::now();
        self.last_reported_percentage = self.percentage();
    }

    /// Human-readable progress string for logging.
    pub fn format_progress(&self) -> String {
        let mut parts = vec![format!(
            "[PROGRESS] uploaded {}/{} chunks ({:.1}%)",
            self.chunks_sent,
            self.total_chunks,
            self.percentage()
        )];

        let rate = self.rate_bytes_per_sec();
        if rate > 0.0 {
            parts.push(format!("at {}", format_rate(rate)));
        }

        parts.join(" ")
    }
}

fn format_rate(bytes_per_sec: f64) -> String {
    const KIB: f64 = 1024.0;
    const MIB: f64 = 1024.0 * 1024.0;
    if bytes_per_sec >= MIB {
        format!("{:.1} MiB/s", bytes_per_sec / MIB)
    } else if bytes_per_sec >= KIB {
        format!("{:.1} KiB/s", bytes_per_sec / KIB)
    } else {
        format!("{bytes_per_sec:.0} B/s")
    }
}
