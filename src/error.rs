//! Error types for vocoder-data
//!
//! Defines module-specific error types using thiserror for clear error propagation.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the dataset pipeline
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid or incomplete configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Manifest file loading or parsing errors
    #[error("Manifest error in {path}: {message}")]
    Manifest { path: PathBuf, message: String },

    /// Audio decoding errors (probe, codec, resample)
    #[error("Audio decode error: {0}")]
    Decode(String),

    /// Audio file unreadable after exhausting all read attempts
    #[error("Failed to read audio {path} after {attempts} attempts")]
    AudioRead { path: PathBuf, attempts: usize },

    /// A feature processor failed while transforming an example
    #[error("Feature processor error: {0}")]
    Processor(String),

    /// Batch collation errors
    #[error("Collation error: {0}")]
    Collation(String),

    /// Requested resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// File I/O errors
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience Result type using vocoder-data Error
pub type Result<T> = std::result::Result<T, Error>;
