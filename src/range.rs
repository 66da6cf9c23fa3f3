//! Byte range arithmetic and chunk planning
//!
//! Everything in this module is pure: a [`ByteRange`] plus a chunk size
//! deterministically produces the same ordered [`ChunkDescriptor`] sequence
//! every time, with no I/O involved. The executor recomputes the plan fresh
//! on every run; descriptors are never cached across runs.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Range and planning errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RangeError {
    /// Chunk size of zero
    #[error("chunk size must be a positive number of bytes")]
    InvalidChunkSize,

    /// Inverted range bounds
    #[error("invalid byte range: end {end} precedes start {start}")]
    InvalidRange {
        /// Requested start offset
        start: u64,
        /// Requested end offset
        end: u64,
    },

    /// Whole-file range requested for a zero-length file
    #[error("cannot derive a byte range from an empty file")]
    EmptyFile,

    /// Unparseable `START-END` argument
    #[error("invalid byte range {0:?}: expected START-END, e.g. 0-999")]
    InvalidSyntax(String),

    /// Range extends past the end of the backing file
    #[error("byte range end {end} exceeds the file's last offset {last}")]
    BeyondFile {
        /// Requested end offset
        end: u64,
        /// Last valid offset in the file
        last: u64,
    },
}

/// An inclusive byte interval over the source file.
///
/// The invariant `start <= end` is enforced at construction, so a `ByteRange`
/// always covers at least one byte.
///
/// # Examples
///
/// ```
/// use chunked_uploader::ByteRange;
///
/// let range: ByteRange = "0-2499".parse().unwrap();
/// assert_eq!(range.start(), 0);
/// assert_eq!(range.end(), 2499);
/// assert_eq!(range.len(), 2500);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ByteRange {
    start: u64,
    end: u64,
}

impl ByteRange {
    /// Create a range from inclusive bounds, rejecting inverted input.
    pub fn new(start: u64, end: u64) -> Result<Self, RangeError> {
        if end < start {
            return Err(RangeError::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// Range covering a whole file of `len` bytes (`0..=len-1`).
    pub fn for_file_len(len: u64) -> Result<Self, RangeError> {
        if len == 0 {
            return Err(RangeError::EmptyFile);
        }
        Self::new(0, len - 1)
    }

    /// First byte offset covered by the range.
    pub fn start(&self) -> u64 {
        self.start
    }

    /// Last byte offset covered by the range (inclusive).
    pub fn end(&self) -> u64 {
        self.end
    }

    /// Number of bytes covered.
    pub fn len(&self) -> u64 {
        self.end - self.start + 1
    }

    /// Always false: an inclusive range covers at least one byte.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Check that the range lies within a file of `file_len` bytes.
    pub fn check_within(&self, file_len: u64) -> Result<(), RangeError> {
        if file_len == 0 {
            return Err(RangeError::EmptyFile);
        }
        let last = file_len - 1;
        if self.end > last {
            return Err(RangeError::BeyondFile {
                end: self.end,
                last,
            });
        }
        Ok(())
    }
}

impl fmt::Display for ByteRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

impl FromStr for ByteRange {
    type Err = RangeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split('-').collect();
        if parts.len() != 2 {
            return Err(RangeError::InvalidSyntax(s.to_string()));
        }
        let start = parts[0]
            .trim()
            .parse::<u64>()
            .map_err(|_| RangeError::InvalidSyntax(s.to_string()))?;
        let end = parts[1]
            .trim()
            .parse::<u64>()
            .map_err(|_| RangeError::InvalidSyntax(s.to_string()))?;
        Self::new(start, end)
    }
}

/// One contiguous slice of the upload range, transmitted as one request.
///
/// Descriptors produced by [`chunk_plan`] are contiguous and gapless:
/// descriptor `i`'s `offset + len` equals descriptor `i + 1`'s `offset`, and
/// the final descriptor ends exactly at the range's last byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkDescriptor {
    /// Zero-based position in the plan
    pub index: u64,
    /// Absolute byte offset in the source file
    pub offset: u64,
    /// Number of bytes in this chunk (always `1..=chunk_size`)
    pub len: u64,
    /// True for exactly one descriptor, the last in the plan
    pub is_last: bool,
}

impl ChunkDescriptor {
    /// Last byte offset covered by this chunk (inclusive).
    pub fn last_offset(&self) -> u64 {
        self.offset + self.len - 1
    }
}

/// Split a byte range into an ordered sequence of chunk descriptors.
///
/// Produces `ceil(range.len() / chunk_size)` chunks. Every chunk except
/// possibly the last has exactly `chunk_size` bytes; the last carries the
/// remainder and is never empty.
///
/// # Errors
///
/// Returns [`RangeError::InvalidChunkSize`] when `chunk_size` is zero.
pub fn chunk_plan(range: &ByteRange, chunk_size: u64) -> Result<Vec<ChunkDescriptor>, RangeError> {
    if chunk_size == 0 {
        return Err(RangeError::InvalidChunkSize);
    }

    let count = range.len().div_ceil(chunk_size);
    let mut plan = Vec::with_capacity(count as usize);
    for index in 0..count {
        let offset = range.start() + index * chunk_size;
        let remaining = range.end() - offset + 1;
        plan.push(ChunkDescriptor {
            index,
            offset,
            len: remaining.min(chunk_size),
            is_last: index + 1 == count,
        });
    }
    Ok(plan)
}
