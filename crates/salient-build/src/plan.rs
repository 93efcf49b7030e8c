//! Build configuration and the assembled build plan.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::mode::BuildMode;
use crate::platform::{DefineMacro, PlatformSettings};
use crate::sources::SourceSpec;
use crate::toolchain::{TargetOs, Toolchain};

/// Project-level inputs of the build, as written in the manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    pub module_name: String,
    pub include_dirs: Vec<String>,
    pub library_dirs: Vec<String>,
    pub libraries: Vec<String>,
    pub source_dirs: Vec<String>,
    pub sources: Vec<String>,
    pub source_globs: Vec<String>,
    /// Placed before the toolchain flags.
    pub compile_args: Vec<String>,
    pub link_args: Vec<String>,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            module_name: "salient._libsalient".to_string(),
            include_dirs: owned(&[
                ".",
                "libsalient/src/vendor/",
                "libsalient/src/vendor/utf8proc",
                "libsalient/src/vendor/zlib/",
            ]),
            library_dirs: Vec::new(),
            libraries: Vec::new(),
            source_dirs: owned(&["salient/", "libsalient/src/salient/"]),
            sources: owned(&[
                "libsalient/src/vendor/stb.c",
                "libsalient/src/vendor/glad.c",
                "libsalient/src/vendor/lodepng.c",
                "libsalient/src/vendor/utf8proc/utf8proc.c",
            ]),
            source_globs: owned(&["libsalient/src/vendor/zlib/*.c"]),
            compile_args: Vec::new(),
            link_args: Vec::new(),
        }
    }
}

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl BuildConfig {
    pub fn source_spec(&self) -> SourceSpec {
        SourceSpec {
            dirs: self.source_dirs.clone(),
            files: self.sources.clone(),
            globs: self.source_globs.clone(),
        }
    }
}

/// What the extension is built for and how.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Target {
    pub os: TargetOs,
    pub toolchain: Toolchain,
    pub mode: BuildMode,
}

impl Target {
    pub fn new(os: TargetOs, mode: BuildMode, mingw: bool) -> Self {
        Self {
            os,
            toolchain: Toolchain::select(os, mingw),
            mode,
        }
    }

    /// The host OS with the mode taken from the environment.
    pub fn host(mingw: bool) -> Result<Self> {
        Ok(Self::new(TargetOs::host(), BuildMode::from_env()?, mingw))
    }
}

/// Everything needed to compile and link the extension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildPlan {
    pub module_name: String,
    pub mode: BuildMode,
    pub toolchain: Toolchain,
    pub target_os: TargetOs,
    pub include_dirs: Vec<String>,
    pub library_dirs: Vec<String>,
    pub libraries: Vec<String>,
    pub sources: Vec<PathBuf>,
    pub define_macros: Vec<DefineMacro>,
    pub compile_args: Vec<String>,
    pub link_args: Vec<String>,
    pub py_limited_api: bool,
    /// SHA-256 of the definition text the extension is generated from.
    pub cdef_digest: String,
}

impl BuildPlan {
    /// Assemble the plan for `target`, discovering sources below `root`.
    pub fn assemble(root: &Path, config: &BuildConfig, target: Target, cdef_digest: impl Into<String>) -> Result<Self> {
        let platform = PlatformSettings::for_os(target.os);
        let sources = config.source_spec().discover(root)?;

        let mut include_dirs = config.include_dirs.clone();
        include_dirs.extend(platform.include_dirs);
        let mut libraries = config.libraries.clone();
        libraries.extend(platform.libraries);

        let flags = |extra: &[String], table: &[&str]| -> Vec<String> {
            extra.iter().cloned().chain(table.iter().map(|s| s.to_string())).collect()
        };

        let plan = Self {
            module_name: config.module_name.clone(),
            mode: target.mode,
            toolchain: target.toolchain,
            target_os: target.os,
            include_dirs,
            library_dirs: config.library_dirs.clone(),
            libraries,
            sources,
            define_macros: platform.define_macros,
            compile_args: flags(&config.compile_args, target.toolchain.compile_args(target.mode)),
            link_args: flags(&config.link_args, target.toolchain.link_args(target.mode)),
            py_limited_api: true,
            cdef_digest: cdef_digest.into(),
        };
        tracing::info!(
            module = %plan.module_name,
            mode = %plan.mode,
            toolchain = %plan.toolchain,
            sources = plan.sources.len(),
            "assembled build plan"
        );
        Ok(plan)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
