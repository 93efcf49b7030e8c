//! `salient plan`: assemble the native build plan.

use std::path::Path;

use anyhow::Result;
use salient_build::{BuildPlan, Target};

use super::{collect_headers, emit_cdef, write_output};
use crate::manifest::SalientManifest;

pub fn run(project_dir: &Path, manifest: &SalientManifest, mingw: bool, output: Option<&Path>) -> Result<()> {
    let plan = assemble(project_dir, manifest, Target::host(mingw)?)?;
    write_output(output, &(plan.to_json()? + "\n"))
}

fn assemble(project_dir: &Path, manifest: &SalientManifest, target: Target) -> Result<BuildPlan> {
    let context = collect_headers(project_dir, manifest)?;
    let cdef = emit_cdef(project_dir, manifest, &context)?;
    Ok(BuildPlan::assemble(project_dir, &manifest.build, target, cdef.digest())?)
}
