//! Error types for the image converter.
//!
//! Provides a hierarchy of error types using `thiserror` for ergonomic error handling.
//! The three families map onto when a failure is detected:
//! - [`ConfigError`]: invalid configuration or request parameters, the batch never starts
//! - [`SetupError`]: the batch cannot be prepared (directories), no file work has begun
//! - [`CodecError`]: a single file failed; recorded as an outcome, never propagated

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Invalid format, group size, concurrency cap or quality.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Requested output format is not in the supported set
    #[error("Unsupported format '{requested}'. Supported formats: {}", .supported.join(", "))]
    UnsupportedFormat {
        requested: String,
        supported: Vec<&'static str>,
    },

    /// Group size must be positive
    #[error("Invalid group size: {0}. Must be greater than 0")]
    InvalidGroupSize(usize),

    /// Concurrency cap must be positive
    #[error("Invalid concurrency cap: {0}. Must be greater than 0")]
    InvalidConcurrency(usize),

    /// Compression quality out of range
    #[error("Invalid quality value: {0}. Must be between 1 and 100")]
    InvalidQuality(u8),
}

/// Failures while preparing a batch, before any file is processed.
#[derive(Error, Debug)]
pub enum SetupError {
    /// Source directory does not exist
    #[error("Source directory not found: {0}")]
    SourceNotFound(PathBuf),

    /// Source directory exists but could not be listed
    #[error("Cannot read source directory {path}: {source}")]
    SourceUnreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Source directory contains no regular files
    #[error("No files found in {0}")]
    NoFiles(PathBuf),

    /// Output directory could not be created
    #[error("Cannot create output directory {path}: {source}")]
    OutputDirectory {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Platform default directory could not be determined
    #[error("Cannot resolve default {0} directory")]
    NoDefaultDirectory(&'static str),
}

/// Decode, encode or IO failure for one file.
#[derive(Error, Debug)]
pub enum CodecError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Decode failed: {0}")]
    Decode(String),

    #[error("Encode failed: {0}")]
    Encode(String),

    /// The blocking codec task panicked or was cancelled
    #[error("Worker failed: {0}")]
    Worker(String),
}

/// Main error type for the converter.
///
/// Everything that can fail a whole request is converted into this type before
/// it reaches the HTTP layer. Per-file codec failures stay in their outcome;
/// `Codec` only carries a failure of the batch task itself.
#[derive(Error, Debug)]
pub enum ConverterError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Setup(#[from] SetupError),

    #[error(transparent)]
    Codec(#[from] CodecError),
}

/// Convenience result type for converter operations.
pub type ConverterResult<T> = Result<T, ConverterError>;

// Helper methods for error creation
impl CodecError {
    pub fn decode<T: ToString>(msg: T) -> Self {
        Self::Decode(msg.to_string())
    }

    pub fn encode<T: ToString>(msg: T) -> Self {
        Self::Encode(msg.to_string())
    }

    pub fn worker<T: ToString>(msg: T) -> Self {
        Self::Worker(msg.to_string())
    }
}

impl From<tokio::task::JoinError> for CodecError {
    fn from(err: tokio::task::JoinError) -> Self {
        Self::Worker(format!("Codec task panicked: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsupported_format_lists_supported_set() {
        let err = ConfigError::UnsupportedFormat {
            requested: "bmp".into(),
            supported: vec!["jpeg", "png"],
        };
        assert_eq!(
            err.to_string(),
            "Unsupported format 'bmp'. Supported formats: jpeg, png"
        );
    }

    #[test]
    fn converter_error_is_transparent() {
        let err: ConverterError = SetupError::NoFiles(PathBuf::from("/pics")).into();
        assert_eq!(err.to_string(), "No files found in /pics");
        assert!(matches!(err, ConverterError::Setup(SetupError::NoFiles(_))));
    }

    #[test]
    fn codec_error_wraps_into_converter_error() {
        let err: ConverterError = CodecError::worker("batch task panicked").into();
        assert_eq!(err.to_string(), "Worker failed: batch task panicked");
        assert!(matches!(err, ConverterError::Codec(CodecError::Worker(_))));
    }

    #[test]
    fn io_error_converts_to_codec_error() {
        let io = io::Error::new(io::ErrorKind::NotFound, "gone");
        let err: CodecError = io.into();
        assert!(matches!(err, CodecError::Io(_)));
    }
}
