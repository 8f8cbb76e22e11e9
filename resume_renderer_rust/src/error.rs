//! Error types for the resume renderer
//!
//! Only hard failures surface through `RendererError`. Soft failures (avatar
//! fetch, malformed list fields) are absorbed where they happen and never
//! reach the caller.

use thiserror::Error;

/// Custom error type for resume renderer operations
#[derive(Error, Debug)]
pub enum RendererError {
    #[error("Invalid layout: {0}")]
    InvalidLayout(String),

    #[error("Image error: {0}")]
    ImageError(String),

    #[error("Avatar fetch failed: {0}")]
    AvatarFetch(String),

    #[error("JSON parsing error: {0}")]
    JsonError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("PDF generation error: {0}")]
    PdfError(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Result type alias for renderer operations
pub type RendererResult<T> = Result<T, RendererError>;

/// Helper to convert serde_json errors
impl From<serde_json::Error> for RendererError {
    fn from(err: serde_json::Error) -> Self {
        RendererError::JsonError(err.to_string())
    }
}

impl From<image::ImageError> for RendererError {
    fn from(err: image::ImageError) -> Self {
        RendererError::ImageError(err.to_string())
    }
}

impl From<reqwest::Error> for RendererError {
    fn from(err: reqwest::Error) -> Self {
        RendererError::AvatarFetch(err.to_string())
    }
}
