//! A single parsed header.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use crate::error::{HeaderError, Result};
use crate::normalize::Normalizer;

/// One cleaned header plus the headers it includes.
///
/// Immutable once built; owned by the [`HeaderContext`](crate::HeaderContext)
/// of the build that parsed it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderUnit {
    path: PathBuf,
    text: String,
    depends: BTreeSet<PathBuf>,
}

impl HeaderUnit {
    /// Read and normalize the header at `path`.
    ///
    /// The path is canonicalized, so it must exist.
    pub fn load(path: &Path, normalizer: &Normalizer) -> Result<Self> {
        let canonical = path.canonicalize().map_err(|source| HeaderError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let raw = std::fs::read_to_string(&canonical).map_err(|source| HeaderError::Read {
            path: canonical.clone(),
            source,
        })?;
        Self::parse(canonical, &raw, normalizer)
    }

    /// Normalize `raw` as the contents of the header at `path`.
    ///
    /// Quoted includes are resolved against the directory of `path` and must
    /// name existing files.
    pub fn parse(path: PathBuf, raw: &str, normalizer: &Normalizer) -> Result<Self> {
        let normalized = normalizer.normalize(raw);
        let directory = path.parent().map(Path::to_path_buf).unwrap_or_default();

        let mut depends = BTreeSet::new();
        for include in normalized.includes {
            let target = directory
                .join(&include)
                .canonicalize()
                .map_err(|source| HeaderError::MissingInclude {
                    header: path.clone(),
                    include: include.clone(),
                    source,
                })?;
            depends.insert(target);
        }

        Ok(Self {
            path,
            text: normalized.text,
            depends,
        })
    }

    /// Canonical path of the header.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Cleaned declaration text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Canonical paths of every quoted include, loaded or not.
    pub fn depends(&self) -> &BTreeSet<PathBuf> {
        &self.depends
    }

    /// The cleaned text with 3-digit line numbers, for diagnostics.
    pub fn numbered_text(&self) -> String {
        self.text
            .split('\n')
            .enumerate()
            .map(|(i, line)| format!("{:03} {line}", i + 1))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl std::fmt::Display for HeaderUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.path.display())?;
        for dep in &self.depends {
            write!(f, "\n\tdepends on {}", dep.display())?;
        }
        Ok(())
    }
}
