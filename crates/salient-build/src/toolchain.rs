//! Target OS, toolchain and flag tables.

use serde::{Deserialize, Serialize};

use crate::mode::BuildMode;

const MSVC_COMPILE_DEBUG: &[&str] = &["/Od"];
const MSVC_COMPILE_RELEASE: &[&str] = &["/GL", "/O2", "/GS-", "/wd4996"];
const MSVC_LINK_DEBUG: &[&str] = &[];
const MSVC_LINK_RELEASE: &[&str] = &["/LTCG"];
const GCC_DEBUG: &[&str] = &["-std=c99", "-Og", "-g", "-fPIC"];
const GCC_RELEASE: &[&str] = &[
    "-std=c99",
    "-flto",
    "-O3",
    "-g",
    "-fPIC",
    "-Wno-deprecated-declarations",
    // restrict qualifiers dropped by the generated glue
    "-Wno-discarded-qualifiers",
];

/// Operating system the extension is built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetOs {
    Windows,
    MacOs,
    Linux,
    Other,
}

impl TargetOs {
    /// The OS this binary was compiled for.
    pub fn host() -> Self {
        if cfg!(target_os = "windows") {
            Self::Windows
        } else if cfg!(target_os = "macos") {
            Self::MacOs
        } else if cfg!(target_os = "linux") {
            Self::Linux
        } else {
            Self::Other
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "windows" | "win32" => Some(Self::Windows),
            "macos" | "darwin" => Some(Self::MacOs),
            "linux" => Some(Self::Linux),
            "other" => Some(Self::Other),
            _ => None,
        }
    }
}

impl std::fmt::Display for TargetOs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Windows => write!(f, "windows"),
            Self::MacOs => write!(f, "macos"),
            Self::Linux => write!(f, "linux"),
            Self::Other => write!(f, "other"),
        }
    }
}

/// Compiler family driving the build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Toolchain {
    Msvc,
    /// GCC or a compatible driver (clang, MinGW).
    Gcc,
}

impl Toolchain {
    /// MSVC on Windows unless MinGW was requested, GCC-style everywhere else.
    pub fn select(os: TargetOs, mingw: bool) -> Self {
        if os == TargetOs::Windows && !mingw {
            Self::Msvc
        } else {
            Self::Gcc
        }
    }

    pub fn compile_args(self, mode: BuildMode) -> &'static [&'static str] {
        match (self, mode) {
            (Self::Msvc, BuildMode::Debug) => MSVC_COMPILE_DEBUG,
            (Self::Msvc, BuildMode::Release) => MSVC_COMPILE_RELEASE,
            (Self::Gcc, BuildMode::Debug) => GCC_DEBUG,
            (Self::Gcc, BuildMode::Release) => GCC_RELEASE,
        }
    }

    /// GCC links with the same flags it compiles with.
    pub fn link_args(self, mode: BuildMode) -> &'static [&'static str] {
        match (self, mode) {
            (Self::Msvc, BuildMode::Debug) => MSVC_LINK_DEBUG,
            (Self::Msvc, BuildMode::Release) => MSVC_LINK_RELEASE,
            (Self::Gcc, mode) => self.compile_args(mode),
        }
    }
}

impl std::fmt::Display for Toolchain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Msvc => write!(f, "msvc"),
            Self::Gcc => write!(f, "gcc"),
        }
    }
}
