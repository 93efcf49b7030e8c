//! `salient.toml` manifest parsing and project configuration.
//!
//! Every section is optional. Missing keys fall back to the layout of the
//! salient repository itself.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use salient_build::BuildConfig;
use salient_consts::table::{DEFAULT_EXCLUDED_NAMES, DEFAULT_EXCLUDED_PREFIXES};
use salient_consts::ExclusionRules;
use salient_headers::cdef::DEFAULT_TRAILER;
use salient_headers::normalize::{DEFAULT_CALL_TAGS, DEFAULT_TAGS};
use salient_headers::Normalizer;
use serde::{Deserialize, Serialize};

pub const MANIFEST_NAME: &str = "salient.toml";

/// The top-level manifest of a salient checkout.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SalientManifest {
    pub headers: HeadersConfig,
    pub constants: ConstantsConfig,
    pub build: BuildConfig,
}

/// Where headers come from and what surrounds them in the definition text.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HeadersConfig {
    /// Directories walked for `.h` files, in order.
    pub paths: Vec<String>,
    /// File names skipped during the walk.
    pub excludes: Vec<String>,
    /// Bare annotation macros to strip. `None` keeps the built-in list.
    pub tags: Option<Vec<String>>,
    /// Annotation macros stripped together with their argument list.
    pub call_tags: Option<Vec<String>>,
    /// Definition files emitted before the headers.
    pub prelude: Vec<String>,
    /// Declarations emitted after the headers.
    pub trailer: Vec<String>,
}

impl Default for HeadersConfig {
    fn default() -> Self {
        Self {
            paths: owned(&["salient/", "libsalient/src/salient/"]),
            excludes: owned(&["gl2_ext_.h", "renderer_gl_internal.h", "event.h"]),
            tags: None,
            call_tags: None,
            prelude: Vec::new(),
            trailer: owned(DEFAULT_TRAILER),
        }
    }
}

impl HeadersConfig {
    pub fn normalizer(&self) -> Normalizer {
        if self.tags.is_none() && self.call_tags.is_none() {
            return Normalizer::default();
        }
        let tags = self.tags.clone().unwrap_or_else(|| owned(DEFAULT_TAGS));
        let call_tags = self.call_tags.clone().unwrap_or_else(|| owned(DEFAULT_CALL_TAGS));
        Normalizer::with_tags(&tags, &call_tags)
    }
}

/// Constant filtering and enum grouping.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConstantsConfig {
    pub exclude: Vec<String>,
    pub exclude_prefixes: Vec<String>,
    /// Enum class name to constant prefix.
    pub enum_prefixes: BTreeMap<String, String>,
}

impl Default for ConstantsConfig {
    fn default() -> Self {
        Self {
            exclude: owned(DEFAULT_EXCLUDED_NAMES),
            exclude_prefixes: owned(DEFAULT_EXCLUDED_PREFIXES),
            enum_prefixes: BTreeMap::new(),
        }
    }
}

impl ConstantsConfig {
    pub fn rules(&self) -> ExclusionRules {
        ExclusionRules::new(self.exclude.iter().cloned(), self.exclude_prefixes.iter().cloned())
    }
}

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl SalientManifest {
    /// Search upward from `start_dir` for a `salient.toml` file, parse and
    /// return it along with the directory it was found in.
    pub fn find_and_load(start_dir: &Path) -> Result<Option<(Self, PathBuf)>> {
        let mut dir = start_dir.to_path_buf();
        loop {
            let candidate = dir.join(MANIFEST_NAME);
            if candidate.is_file() {
                let content = std::fs::read_to_string(&candidate)
                    .with_context(|| format!("reading {}", candidate.display()))?;
                let manifest = Self::from_str(&content)
                    .with_context(|| format!("parsing {}", candidate.display()))?;
                tracing::debug!(path = %candidate.display(), "loaded manifest");
                return Ok(Some((manifest, dir)));
            }
            if !dir.pop() {
                break;
            }
        }
        Ok(None)
    }

    /// The manifest above `cwd`, or the defaults rooted at `cwd`.
    pub fn load_or_default(cwd: &Path) -> Result<(Self, PathBuf)> {
        Ok(Self::find_and_load(cwd)?.unwrap_or_else(|| (Self::default(), cwd.to_path_buf())))
    }

    /// Parse a manifest from a TOML string.
    pub fn from_str(s: &str) -> Result<Self> {
        toml::from_str(s).context("parsing salient.toml")
    }
}
