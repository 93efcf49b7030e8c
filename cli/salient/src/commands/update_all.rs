//! `salient update-all`: refresh the generated names in a package `__all__`.

use std::path::Path;

use anyhow::{Context, Result};
use salient_consts::update_module_all_file;

use super::constant_table;
use crate::manifest::SalientManifest;

pub fn run(project_dir: &Path, manifest: &SalientManifest, file: &Path) -> Result<()> {
    let table = constant_table(project_dir, manifest)?;
    update_module_all_file(file, table.iter().map(|c| c.name.as_str()))
        .with_context(|| format!("updating {}", file.display()))?;
    println!("Updated {} ({} names)", file.display(), table.len());
    Ok(())
}
