//! Constant generation error types.

use std::path::PathBuf;

/// Errors that can occur while generating constant modules.
#[derive(Debug, thiserror::Error)]
pub enum ConstError {
    /// The target file lacks the markers delimiting the generated section.
    #[error("can't determine __all__ subsection in {}", .path.display())]
    MissingMarkers { path: PathBuf },

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for constant generation.
pub type Result<T> = std::result::Result<T, ConstError>;
