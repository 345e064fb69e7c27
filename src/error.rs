//! # Error Types
//!
//! This module defines error types used throughout the credencial library.

use thiserror::Error;

/// Main error type for credencial operations.
///
/// Nothing here is fatal to a hosting process: every failure is localized
/// and reported through the host channel or an HTTP status.
#[derive(Debug, Error)]
pub enum CardError {
    /// Invalid barcode value or symbology mismatch
    #[error("Barcode error: {0}")]
    Barcode(String),

    /// Image decoding or processing error
    #[error("Image error: {0}")]
    Image(String),

    /// Rasterization / snapshot error
    #[error("Render error: {0}")]
    Render(String),

    /// Asset download error
    #[error("HTTP error: {0}")]
    Http(String),

    /// JSON (de)serialization error wrapper
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error wrapper
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
