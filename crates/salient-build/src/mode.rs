//! Build mode selection.

use serde::{Deserialize, Serialize};

use crate::error::{BuildError, Result};

/// Environment variable selecting the build mode.
pub const BUILD_MODE_VAR: &str = "TDL_BUILD";

/// Optimization profile of the native extension.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum BuildMode {
    Debug,
    #[default]
    Release,
}

impl BuildMode {
    /// Parse a mode name, ignoring case and surrounding whitespace.
    pub fn parse(s: &str) -> Result<Self> {
        match s.trim().to_uppercase().as_str() {
            "DEBUG" => Ok(Self::Debug),
            "RELEASE" => Ok(Self::Release),
            _ => Err(BuildError::UnknownMode { value: s.to_string() }),
        }
    }

    /// Mode for an optional variable value; unset means release.
    pub fn from_value(value: Option<&str>) -> Result<Self> {
        value.map_or(Ok(Self::default()), Self::parse)
    }

    /// Read the mode from [`BUILD_MODE_VAR`].
    pub fn from_env() -> Result<Self> {
        match std::env::var(BUILD_MODE_VAR) {
            Ok(value) => Self::parse(&value),
            Err(std::env::VarError::NotPresent) => Ok(Self::default()),
            Err(std::env::VarError::NotUnicode(raw)) => Err(BuildError::UnknownMode {
                value: raw.to_string_lossy().into_owned(),
            }),
        }
    }
}

impl std::fmt::Display for BuildMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Debug => write!(f, "DEBUG"),
            Self::Release => write!(f, "RELEASE"),
        }
    }
}
