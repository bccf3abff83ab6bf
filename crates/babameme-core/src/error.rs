//! Errors reported by the editor's collaborators and shells.
//!
//! Gesture operations never fail; these cover uploads, exports and
//! configuration loading around them.

use thiserror::Error;

/// Editor errors.
#[derive(Debug, Error)]
pub enum EditorError {
    #[error("Background image reference is empty")]
    EmptyBackground,
    #[error("No background image to export")]
    NoBackground,
    #[error("Export failed: {0}")]
    Export(String),
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("Invalid script: {0}")]
    Script(String),
    #[error("IO error: {0}")]
    Io(String),
}

/// Result type for editor operations.
pub type EditorResult<T> = Result<T, EditorError>;

impl From<std::io::Error> for EditorError {
    fn from(err: std::io::Error) -> Self {
        EditorError::Io(err.to_string())
    }
}
