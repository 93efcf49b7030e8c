//! Per-build header registry.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use crate::error::{HeaderError, Result};
use crate::normalize::Normalizer;
use crate::resolve::resolve_order;
use crate::unit::HeaderUnit;

/// All headers parsed during one build invocation, keyed by canonical path.
#[derive(Debug, Default)]
pub struct HeaderContext {
    normalizer: Normalizer,
    excludes: BTreeSet<String>,
    units: BTreeMap<PathBuf, HeaderUnit>,
}

impl HeaderContext {
    /// Create an empty context using `normalizer` for every header.
    pub fn new(normalizer: Normalizer) -> Self {
        Self {
            normalizer,
            excludes: BTreeSet::new(),
            units: BTreeMap::new(),
        }
    }

    /// Skip files with these names when walking directories.
    pub fn with_excludes<I, S>(mut self, excludes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.excludes.extend(excludes.into_iter().map(Into::into));
        self
    }

    /// Parse one header into the context.
    ///
    /// A path that was already parsed is not read again.
    pub fn add_file(&mut self, path: &Path) -> Result<&HeaderUnit> {
        let canonical = path.canonicalize().map_err(|source| HeaderError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        if !self.units.contains_key(&canonical) {
            let unit = HeaderUnit::load(&canonical, &self.normalizer)?;
            tracing::debug!(
                header = %canonical.display(),
                depends = unit.depends().len(),
                "parsed header"
            );
            self.units.insert(canonical.clone(), unit);
        }
        Ok(&self.units[&canonical])
    }

    /// Insert an already-built unit. The first unit for a path wins.
    pub fn insert(&mut self, unit: HeaderUnit) {
        self.units.entry(unit.path().to_path_buf()).or_insert(unit);
    }

    /// Parse every `.h` file under `directory`, recursively.
    ///
    /// A missing directory yields nothing. Returns the number of headers
    /// visited.
    pub fn walk_dir(&mut self, directory: &Path) -> Result<usize> {
        if !directory.is_dir() {
            tracing::warn!(directory = %directory.display(), "header directory not found, skipping");
            return Ok(0);
        }

        let mut entries: Vec<PathBuf> = std::fs::read_dir(directory)?
            .map(|entry| entry.map(|e| e.path()))
            .collect::<std::io::Result<_>>()?;
        entries.sort();

        let mut count = 0;
        for path in entries {
            if path.is_dir() {
                count += self.walk_dir(&path)?;
                continue;
            }
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            if self.excludes.contains(name) {
                tracing::debug!(header = %path.display(), "excluded");
                continue;
            }
            if path.extension().is_some_and(|ext| ext == "h") {
                self.add_file(&path)?;
                count += 1;
            }
        }
        Ok(count)
    }

    /// Look up a unit by canonical path.
    pub fn get(&self, path: &Path) -> Option<&HeaderUnit> {
        self.units.get(path)
    }

    /// Dependencies of `unit` that were parsed into this context.
    pub fn parsed_depends<'a>(&'a self, unit: &'a HeaderUnit) -> impl Iterator<Item = &'a HeaderUnit> + 'a {
        unit.depends().iter().filter_map(|dep| self.units.get(dep))
    }

    /// Iterate all units in path order.
    pub fn units(&self) -> impl Iterator<Item = &HeaderUnit> {
        self.units.values()
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Order the units so that every header follows the headers it includes.
    pub fn resolve(&self) -> Result<Vec<&HeaderUnit>> {
        let graph: BTreeMap<PathBuf, BTreeSet<PathBuf>> = self
            .units
            .iter()
            .map(|(path, unit)| (path.clone(), unit.depends().clone()))
            .collect();

        let order = resolve_order(&graph).map_err(|unresolved| HeaderError::CyclicDependency {
            unresolved: unresolved.remaining,
        })?;
        Ok(order.iter().map(|path| &self.units[path]).collect())
    }
}
