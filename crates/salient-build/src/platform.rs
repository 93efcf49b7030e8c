//! Per-OS define macros, libraries and include directories.

use serde::{Deserialize, Serialize};

use crate::toolchain::TargetOs;

/// Stable ABI version the extension is compiled against.
pub const PY_LIMITED_API: u32 = 0x0306_0000;

/// zlib headers bundled with the library, needed where the system has none.
pub const BUNDLED_ZLIB_INCLUDE: &str = "libsalient/src/zlib/";

/// A preprocessor macro passed on the command line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefineMacro {
    pub name: String,
    /// `None` defines the bare name; `Some("")` defines it as empty.
    pub value: Option<String>,
}

impl DefineMacro {
    pub fn new(name: impl Into<String>, value: Option<&str>) -> Self {
        Self {
            name: name.into(),
            value: value.map(str::to_string),
        }
    }
}

impl std::fmt::Display for DefineMacro {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.value {
            Some(value) => write!(f, "{}={value}", self.name),
            None => write!(f, "{}", self.name),
        }
    }
}

/// Additions a target OS makes to the build.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlatformSettings {
    pub define_macros: Vec<DefineMacro>,
    pub libraries: Vec<String>,
    pub include_dirs: Vec<String>,
}

impl PlatformSettings {
    pub fn for_os(os: TargetOs) -> Self {
        let mut settings = Self {
            define_macros: vec![DefineMacro::new("Py_LIMITED_API", Some(&format!("{PY_LIMITED_API:#010x}")))],
            ..Self::default()
        };
        if os == TargetOs::Windows {
            settings.libraries.push("User32".to_string());
            settings.define_macros.push(DefineMacro::new("SALIENTLIB_API", Some("")));
            settings.define_macros.push(DefineMacro::new("_CRT_SECURE_NO_WARNINGS", None));
        }
        if matches!(os, TargetOs::Windows | TargetOs::MacOs) {
            settings.include_dirs.push(BUNDLED_ZLIB_INCLUDE.to_string());
        }
        if os == TargetOs::MacOs {
            // zlib calls close() without including unistd.h otherwise
            settings.define_macros.push(DefineMacro::new("HAVE_UNISTD_H", Some("1")));
        }
        settings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn macros(os: TargetOs) -> Vec<String> {
        PlatformSettings::for_os(os).define_macros.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn limited_api_everywhere() {
        for os in [TargetOs::Windows, TargetOs::MacOs, TargetOs::Linux, TargetOs::Other] {
            assert_eq!(macros(os)[0], "Py_LIMITED_API=0x03060000");
        }
    }

    #[test]
    fn windows_settings() {
        let settings = PlatformSettings::for_os(TargetOs::Windows);
        assert_eq!(macros(TargetOs::Windows), ["Py_LIMITED_API=0x03060000", "SALIENTLIB_API=", "_CRT_SECURE_NO_WARNINGS"]);
        assert_eq!(settings.libraries, ["User32"]);
        assert_eq!(settings.include_dirs, [BUNDLED_ZLIB_INCLUDE]);
    }

    #[test]
    fn macos_settings() {
        let settings = PlatformSettings::for_os(TargetOs::MacOs);
        assert_eq!(macros(TargetOs::MacOs), ["Py_LIMITED_API=0x03060000", "HAVE_UNISTD_H=1"]);
        assert!(settings.libraries.is_empty());
        assert_eq!(settings.include_dirs, [BUNDLED_ZLIB_INCLUDE]);
    }

    #[test]
    fn linux_adds_nothing_else() {
        let settings = PlatformSettings::for_os(TargetOs::Linux);
        assert_eq!(settings.define_macros.len(), 1);
        assert!(settings.libraries.is_empty());
        assert!(settings.include_dirs.is_empty());
    }
}
