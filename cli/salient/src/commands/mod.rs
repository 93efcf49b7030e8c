//! CLI command implementations.

pub mod cdef;
pub mod constants;
pub mod enums;
pub mod headers;
pub mod plan;
pub mod release;
pub mod update_all;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use salient_consts::ConstantTable;
use salient_headers::{Cdef, CdefEmitter, HeaderContext, HeaderError};

use crate::manifest::SalientManifest;

/// Parse every header below the configured paths.
pub(crate) fn collect_headers(project_dir: &Path, manifest: &SalientManifest) -> Result<HeaderContext> {
    let headers = &manifest.headers;
    let mut context = HeaderContext::new(headers.normalizer()).with_excludes(headers.excludes.iter().cloned());
    for dir in &headers.paths {
        let dir = project_dir.join(dir);
        let count = context
            .walk_dir(&dir)
            .with_context(|| format!("collecting headers in {}", dir.display()))?;
        tracing::info!(dir = %dir.display(), count, "collected headers");
    }
    Ok(context)
}

/// Order and check the collected headers and emit the definition text.
///
/// A header rejected by the declaration grammar is dumped to stderr with
/// line numbers before the error is returned.
pub(crate) fn emit_cdef(project_dir: &Path, manifest: &SalientManifest, context: &HeaderContext) -> Result<Cdef> {
    let units = context.resolve()?;
    let mut emitter = CdefEmitter::new().trailer(manifest.headers.trailer.iter().cloned());
    for prelude in &manifest.headers.prelude {
        emitter = emitter.prelude_file(&project_dir.join(prelude))?;
    }
    emitter.emit(&units).map_err(|e| {
        if let HeaderError::InvalidDeclaration { path, listing, .. } = &e {
            eprintln!("Error with: {}", path.display());
            eprintln!("{listing}");
        }
        e.into()
    })
}

/// Collect, order, check and gather constants in one go.
pub(crate) fn constant_table(project_dir: &Path, manifest: &SalientManifest) -> Result<ConstantTable> {
    let context = collect_headers(project_dir, manifest)?;
    let cdef = emit_cdef(project_dir, manifest, &context)?;
    Ok(ConstantTable::collect(cdef.headers(), &manifest.constants.rules()))
}

/// Write `text` to `output`, or stdout when no file is given.
pub(crate) fn write_output(output: Option<&Path>, text: &str) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, text).with_context(|| format!("writing {}", path.display()))?;
            eprintln!("Wrote {}", path.display());
        }
        None => print!("{text}"),
    }
    Ok(())
}

/// `path` relative to the project directory when it lies below it.
pub(crate) fn relative_to(project_dir: &Path, path: &Path) -> PathBuf {
    let base = project_dir.canonicalize().unwrap_or_else(|_| project_dir.to_path_buf());
    path.strip_prefix(&base).map(Path::to_path_buf).unwrap_or_else(|_| path.to_path_buf())
}
