//! CLI error types and conversions

use crate::range::RangeError;
use crate::source::SourceError;
use crate::uploader::UploadError;

/// CLI errors
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Range error
    #[error("range error: {0}")]
    Range(#[from] RangeError),

    /// Source error
    #[error("source error: {0}")]
    Source(#[from] SourceError),

    /// Upload error
    #[error("upload error: {0}")]
    Upload(#[from] UploadError),

    /// Invalid argument
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Upload run ended in the aborted state
    #[error("upload aborted: {0}")]
    UploadAborted(String),
}
