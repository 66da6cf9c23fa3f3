//! Chunk reads from the backing file
//!
//! [`ChunkSource`] owns the read-only file handle for the duration of one
//! upload run and serves exact-length reads for individual chunk
//! descriptors. There is no caching: every call seeks and reads the file
//! again, so a file that shrinks mid-run surfaces as a short read.

use crate::range::ChunkDescriptor;
use bytes::Bytes;
use std::io::SeekFrom;
use std::path::{Path, PathBuf};
use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncSeekExt};

/// Source read errors
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// File could not be opened or stat-ed
    #[error("failed to open {path}: {source}")]
    Open {
        /// Path that failed to open
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Fewer bytes available than the chunk descriptor declares
    #[error("chunk {chunk} needs {expected} bytes at offset {offset} but the file ended early")]
    ShortRead {
        /// Index of the chunk being read
        chunk: u64,
        /// Offset the read started at
        offset: u64,
        /// Bytes the descriptor declared
        expected: u64,
    },

    /// Seek or read failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Scoped read handle over the source file.
///
/// Acquired once per upload run and dropped when the run ends, success or
/// failure.
#[derive(Debug)]
pub struct ChunkSource {
    file: File,
    len: u64,
}

impl ChunkSource {
    /// Open `path` read-only and record its current length.
    pub async fn open(path: &Path) -> Result<Self, SourceError> {
        let file = File::open(path).await.map_err(|e| SourceError::Open {
            path: path.to_path_buf(),
            source: e,
        })?;
        let len = file
            .metadata()
            .await
            .map_err(|e| SourceError::Open {
                path: path.to_path_buf(),
                source: e,
            })?
            .len();
        Ok(Self { file, len })
    }

    /// File length in bytes, as observed at open time.
    pub fn len(&self) -> u64 {
        self.len
    }

    /// Whether the file was empty at open time.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Read exactly `descriptor.len` bytes starting at `descriptor.offset`.
    ///
    /// A short read (file truncated after the plan was computed) is reported
    /// as [`SourceError::ShortRead`]; the caller treats it as fatal for the
    /// run.
    pub async fn read_chunk(&mut self, descriptor: &ChunkDescriptor) -> Result<Bytes, SourceError> {
        self.file.seek(SeekFrom::Start(descriptor.offset)).await?;

        let mut buf = vec![0u8; descriptor.len as usize];
        self.file.read_exact(&mut buf).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::UnexpectedEof {
                SourceError::ShortRead {
                    chunk: descriptor.index,
                    offset: descriptor.offset,
                    expected: descriptor.len,
                }
            } else {
                SourceError::Io(e)
            }
        })?;

        Ok(Bytes::from(buf))
    }
}
