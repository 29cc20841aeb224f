//! Renderer error types.

use thiserror::Error;

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RenderError>;

/// Errors that can occur during rendering.
///
/// Per-element problems (a bad color, an unresolved image, an unshapeable
/// line of text) are logged and skipped, never returned. These variants cover
/// the frame as a whole and asset loading.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The raster surface could not be allocated.
    #[error("Surface error: {0}")]
    Surface(String),

    /// Resource loading failed.
    #[error("Failed to load resource: {0}")]
    Resource(String),

    /// Text could not be laid out.
    #[error("Text layout failed: {0}")]
    Text(String),

    /// Frame encoding failed.
    #[error("Encode failed: {0}")]
    Encode(String),

    /// Filesystem error while reading an image.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
