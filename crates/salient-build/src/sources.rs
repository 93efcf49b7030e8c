//! C source discovery.
//!
//! Sources come from three places: every `.c` file below the source
//! directories, explicitly listed files, and single-level `dir/*.ext` globs.
//! Returned paths are relative to the project root, in discovery order, with
//! duplicates removed.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{BuildError, Result};

/// Where to look for C sources.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceSpec {
    pub dirs: Vec<String>,
    pub files: Vec<String>,
    pub globs: Vec<String>,
}

impl SourceSpec {
    /// Collect the sources below `root`.
    pub fn discover(&self, root: &Path) -> Result<Vec<PathBuf>> {
        let mut found = Vec::new();
        for dir in &self.dirs {
            found.extend(walk_sources(root, Path::new(dir))?);
        }
        found.extend(self.files.iter().map(PathBuf::from));
        for pattern in &self.globs {
            found.extend(glob_sources(root, pattern)?);
        }

        let mut seen = BTreeSet::new();
        found.retain(|path| seen.insert(path.clone()));
        tracing::debug!(count = found.len(), "discovered C sources");
        Ok(found)
    }
}

/// Every `.c` file below `root/dir`, sorted, as paths starting with `dir`.
///
/// A missing directory yields nothing.
pub fn walk_sources(root: &Path, dir: &Path) -> Result<Vec<PathBuf>> {
    let full = root.join(dir);
    if !full.is_dir() {
        tracing::warn!(dir = %full.display(), "source directory not found, skipping");
        return Ok(Vec::new());
    }
    let mut out = Vec::new();
    walk_into(&full, dir, &mut out)?;
    Ok(out)
}

fn walk_into(full: &Path, rel: &Path, out: &mut Vec<PathBuf>) -> Result<()> {
    for (name, path) in sorted_entries(full)? {
        if path.is_dir() {
            walk_into(&path, &rel.join(&name), out)?;
        } else if path.extension().is_some_and(|ext| ext == "c") {
            out.push(rel.join(&name));
        }
    }
    Ok(())
}

/// Files matching a `dir/*.ext` pattern, sorted.
pub fn glob_sources(root: &Path, pattern: &str) -> Result<Vec<PathBuf>> {
    let unsupported = || BuildError::UnsupportedGlob {
        pattern: pattern.to_string(),
    };
    let (dir, file) = pattern.rsplit_once('/').unwrap_or(("", pattern));
    let ext = file.strip_prefix("*.").ok_or_else(unsupported)?;
    if dir.contains('*') || ext.is_empty() || ext.contains(['*', '?', '[']) {
        return Err(unsupported());
    }

    let full = root.join(dir);
    if !full.is_dir() {
        return Ok(Vec::new());
    }
    Ok(sorted_entries(&full)?
        .into_iter()
        .filter(|(_, path)| path.is_file() && path.extension().is_some_and(|e| e == ext))
        .map(|(name, _)| Path::new(dir).join(name))
        .collect())
}

fn sorted_entries(dir: &Path) -> Result<Vec<(std::ffi::OsString, PathBuf)>> {
    let read_err = |source| BuildError::ReadDir {
        path: dir.to_path_buf(),
        source,
    };
    let mut entries = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(read_err)? {
        let entry = entry.map_err(read_err)?;
        entries.push((entry.file_name(), entry.path()));
    }
    entries.sort();
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, "").unwrap();
    }

    #[test]
    fn walk_finds_nested_c_files_sorted() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "src/b.c");
        touch(dir.path(), "src/a.c");
        touch(dir.path(), "src/a.h");
        touch(dir.path(), "src/sub/c.c");

        let found = walk_sources(dir.path(), Path::new("src")).unwrap();
        assert_eq!(
            found,
            vec![PathBuf::from("src/a.c"), PathBuf::from("src/b.c"), PathBuf::from("src/sub/c.c")]
        );
    }

    #[test]
    fn missing_source_dir_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        assert!(walk_sources(dir.path(), Path::new("nope")).unwrap().is_empty());
        assert!(glob_sources(dir.path(), "nope/*.c").unwrap().is_empty());
    }

    #[test]
    fn glob_is_single_level() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "zlib/inflate.c");
        touch(dir.path(), "zlib/adler32.c");
        touch(dir.path(), "zlib/zlib.h");
        touch(dir.path(), "zlib/contrib/extra.c");

        let found = glob_sources(dir.path(), "zlib/*.c").unwrap();
        assert_eq!(found, vec![PathBuf::from("zlib/adler32.c"), PathBuf::from("zlib/inflate.c")]);
    }

    #[test]
    fn unsupported_globs() {
        let dir = tempfile::tempdir().unwrap();
        for pattern in ["zlib/**/*.c", "zlib/a*.c", "*/x.c", "zlib/*."] {
            assert!(
                matches!(glob_sources(dir.path(), pattern), Err(BuildError::UnsupportedGlob { .. })),
                "{pattern} should be rejected"
            );
        }
    }

    #[test]
    fn discover_combines_and_dedups() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "src/a.c");
        touch(dir.path(), "vendor/stb.c");
        touch(dir.path(), "vendor/glad.c");

        let spec = SourceSpec {
            dirs: vec!["src".into()],
            files: vec!["vendor/stb.c".into(), "src/a.c".into()],
            globs: vec!["vendor/*.c".into()],
        };
        let found = spec.discover(dir.path()).unwrap();
        assert_eq!(
            found,
            vec![PathBuf::from("src/a.c"), PathBuf::from("vendor/stb.c"), PathBuf::from("vendor/glad.c")]
        );
    }
}
