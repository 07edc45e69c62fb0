//! # Error Types
//!
//! This module defines error types used throughout the cupom library.

use std::time::Duration;

use thiserror::Error;

/// Main error type for cupom operations
#[derive(Debug, Error)]
pub enum CupomError {
    /// Payload could not be decoded or is not a PDF/image
    #[error("Invalid payload: {0}")]
    Payload(String),

    /// Rasterization of the payload failed
    #[error("Render error: {0}")]
    Render(String),

    /// The rendering surface did not become ready within the ceiling
    #[error("Surface not ready after {0:?}")]
    NotReady(Duration),

    /// Transport-level errors (connection, I/O)
    #[error("Transport error: {0}")]
    Transport(String),

    /// System print spooler rejected or failed the job
    #[error("Spooler error: {0}")]
    Spooler(String),

    /// Receipt template cannot be laid out
    #[error("Invalid receipt: {0}")]
    Receipt(String),

    /// PDF generation error
    #[error("PDF error: {0}")]
    Pdf(String),

    /// Image processing error
    #[error("Image error: {0}")]
    Image(String),

    /// I/O error wrapper
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<image::ImageError> for CupomError {
    fn from(e: image::ImageError) -> Self {
        CupomError::Image(e.to_string())
    }
}

impl From<lopdf::Error> for CupomError {
    fn from(e: lopdf::Error) -> Self {
        CupomError::Pdf(e.to_string())
    }
}
