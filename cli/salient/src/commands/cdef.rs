//! `salient cdef`: emit the FFI definition text.

use std::path::Path;

use anyhow::Result;

use super::{collect_headers, emit_cdef, write_output};
use crate::manifest::SalientManifest;

pub fn run(project_dir: &Path, manifest: &SalientManifest, output: Option<&Path>) -> Result<()> {
    let context = collect_headers(project_dir, manifest)?;
    let cdef = emit_cdef(project_dir, manifest, &context)?;
    tracing::info!(headers = cdef.headers().len(), digest = %cdef.digest(), "emitted definitions");
    write_output(output, cdef.text())
}
