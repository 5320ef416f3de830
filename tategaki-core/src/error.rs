//! Error types for Tategaki Core
//!
//! Malformed markup is never an error: the parser degrades it to literal text and
//! records a [`Diagnostic`](crate::types::Diagnostic). What remains here are the I/O
//! boundary and invalid layout metrics.

use thiserror::Error;

/// Result type alias using TategakiError
pub type Result<T> = std::result::Result<T, TategakiError>;

/// Top-level error type for all Tategaki operations
#[derive(Debug, Error)]
pub enum TategakiError {
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("Capacity error: {0}")]
    Capacity(#[from] CapacityError),

    #[error("Settings error: {0}")]
    Settings(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors that occur while turning input bytes into a document
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Failed to read input: {0}")]
    Read(#[from] std::io::Error),

    #[error("Input is not valid UTF-8 (invalid byte at offset {offset})")]
    InvalidUtf8 { offset: usize },
}

/// Errors that occur when deriving a character capacity
#[derive(Debug, Error, PartialEq)]
pub enum CapacityError {
    #[error("Invalid capacity: font size {font_size}px and line height {line_height} must be positive")]
    InvalidCapacity { font_size: f32, line_height: f32 },
}
