//! Error types for editor operations.

use thiserror::Error;

/// Result type for editor operations.
pub type EditorResult<T> = Result<T, EditorError>;

/// Errors that can occur in editor operations.
///
/// Scene mutations keyed by an element id never produce these; an unknown id
/// is a silent no-op. Errors are reserved for construction, parsing and I/O.
#[derive(Debug, Error)]
pub enum EditorError {
    /// Element not found in the scene.
    #[error("Element not found: {0}")]
    ElementNotFound(String),

    /// An element with the same id is already in the scene.
    #[error("Duplicate element id: {0}")]
    DuplicateElement(String),

    /// The string is not a valid element id.
    #[error("Invalid element id: {0}")]
    InvalidId(#[from] uuid::Error),

    /// The string is not a recognised color.
    #[error("Invalid color: {0}")]
    InvalidColor(String),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Filesystem error while reading configuration.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration is structurally valid but semantically unusable.
    #[error("Invalid configuration: {0}")]
    Config(String),
}
