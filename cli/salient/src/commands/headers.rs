//! `salient headers`: list headers in include order.

use std::path::Path;

use anyhow::Result;

use super::{collect_headers, relative_to};
use crate::manifest::SalientManifest;

pub fn run(project_dir: &Path, manifest: &SalientManifest, deps: bool) -> Result<()> {
    print!("{}", render(project_dir, manifest, deps)?);
    Ok(())
}

pub(crate) fn render(project_dir: &Path, manifest: &SalientManifest, deps: bool) -> Result<String> {
    let context = collect_headers(project_dir, manifest)?;
    let mut out = String::new();
    for unit in context.resolve()? {
        out.push_str(&format!("{}\n", relative_to(project_dir, unit.path()).display()));
        if deps {
            for dep in unit.depends() {
                out.push_str(&format!("    -> {}\n", relative_to(project_dir, dep).display()));
            }
        }
    }
    Ok(out)
}
