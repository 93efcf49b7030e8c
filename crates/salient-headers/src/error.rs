//! Header pipeline error types.

use std::collections::BTreeSet;
use std::path::PathBuf;

/// Errors that can occur while collecting, ordering or emitting headers.
#[derive(Debug, thiserror::Error)]
pub enum HeaderError {
    /// A header file could not be read.
    #[error("failed to read header {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An `#include "..."` directive names a file that does not exist.
    #[error("{}: included file '{include}' could not be resolved: {source}", .header.display())]
    MissingInclude {
        header: PathBuf,
        include: String,
        #[source]
        source: std::io::Error,
    },

    /// The include graph contains a cycle.
    #[error(
        "could not resolve header load order; possible cyclic dependency with the unresolved headers:\n{}",
        format_paths(.unresolved)
    )]
    CyclicDependency { unresolved: BTreeSet<PathBuf> },

    /// The cleaned text of a header is not accepted by the declaration grammar.
    ///
    /// `listing` holds the cleaned text with line numbers.
    #[error("{}: line {line}: {detail}", .path.display())]
    InvalidDeclaration {
        path: PathBuf,
        line: usize,
        detail: String,
        listing: String,
    },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

fn format_paths(paths: &BTreeSet<PathBuf>) -> String {
    paths
        .iter()
        .map(|p| format!("  {}", p.display()))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Result type alias for header operations.
pub type Result<T> = std::result::Result<T, HeaderError>;
