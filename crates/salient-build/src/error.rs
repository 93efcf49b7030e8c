//! Build configuration error types.

use std::path::PathBuf;

/// Errors that can occur while assembling a build plan.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// The build mode variable holds something other than DEBUG or RELEASE.
    #[error("unknown build mode '{value}' (expected DEBUG or RELEASE)")]
    UnknownMode { value: String },

    /// A source glob uses a form other than `dir/*.ext`.
    #[error("unsupported source glob '{pattern}': expected 'dir/*.ext'")]
    UnsupportedGlob { pattern: String },

    /// A source directory could not be listed.
    #[error("failed to read source directory {}: {source}", .path.display())]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for build configuration.
pub type Result<T> = std::result::Result<T, BuildError>;
