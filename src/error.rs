//! Error types shared by every processing stage.

use std::path::PathBuf;
use thiserror::Error;

/// Errors returned by buffer construction, the processing stages and the
/// image I/O adapter.
#[derive(Debug, Error)]
pub enum FilterError {
    /// A parameter is outside its accepted domain (even or too small mask
    /// size, mismatched dimensions, unknown noise or filter tag).
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// A buffer with zero width or height was requested.
    #[error("empty image buffer ({width}x{height})")]
    EmptyBuffer {
        /// Requested width in pixels.
        width: usize,
        /// Requested height in pixels.
        height: usize,
    },

    /// The channel tag does not name one of R, G or B.
    #[error("channel out of range: {0}")]
    ChannelOutOfRange(String),

    /// The input image could not be read or decoded.
    #[error("input unavailable: {path}: {source}")]
    InputUnavailable {
        /// Path that was being decoded.
        path: PathBuf,
        /// Underlying codec error.
        source: image::ImageError,
    },

    /// An output image could not be encoded or written.
    #[error("output not written: {path}: {source}")]
    OutputNotWritten {
        /// Path that was being written.
        path: PathBuf,
        /// Underlying codec error.
        source: image::ImageError,
    },

    /// A pipeline configuration file could not be loaded.
    #[error("invalid configuration {path}: {message}")]
    Config {
        /// Configuration file path.
        path: PathBuf,
        /// Reason the file was rejected.
        message: String,
    },
}

/// Result alias used throughout the crate.
pub type FilterResult<T> = Result<T, FilterError>;

impl FilterError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        FilterError::InvalidParameter(message.into())
    }
}
