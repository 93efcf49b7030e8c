//! Package `__all__` maintenance.
//!
//! The package's `__init__.py` keeps the exported constant names between two
//! marker comments. Everything outside the markers is left untouched.

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::{ConstError, Result};

static RE_ALL_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)^(.*# --- From constants\.py ---).*?(# --- End constants\.py ---.*)$")
        .expect("valid __all__ marker regex")
});

/// Replace the names between the constants markers of `text`.
///
/// Returns `None` when the markers are missing.
pub fn update_module_all<I, S>(text: &str, names: I) -> Option<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let caps = RE_ALL_BLOCK.captures(text)?;
    let mut out = String::from(&caps[1]);
    out.push('\n');
    for name in names {
        out.push_str(&format!("    \"{}\",\n", name.as_ref()));
    }
    out.push_str("    ");
    out.push_str(&caps[2]);
    Some(out)
}

/// Rewrite the `__all__` block of the file at `path` in place.
pub fn update_module_all_file<I, S>(path: &Path, names: I) -> Result<()>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let text = std::fs::read_to_string(path)?;
    let updated = update_module_all(&text, names).ok_or_else(|| ConstError::MissingMarkers {
        path: path.to_path_buf(),
    })?;
    if updated != text {
        std::fs::write(path, updated)?;
        tracing::info!(path = %path.display(), "updated __all__");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const INIT: &str = "__all__ = [\n    \"Console\",\n    # --- From constants.py ---\n    \"OLD\",\n    \
                        # --- End constants.py ---\n]\n";

    #[test]
    fn replaces_names_between_markers() {
        let out = update_module_all(INIT, ["SALIENT_A", "SALIENT_B"]).unwrap();
        assert_eq!(
            out,
            "__all__ = [\n    \"Console\",\n    # --- From constants.py ---\n    \"SALIENT_A\",\n    \
             \"SALIENT_B\",\n    # --- End constants.py ---\n]\n"
        );
    }

    #[test]
    fn update_is_idempotent() {
        let once = update_module_all(INIT, ["SALIENT_A"]).unwrap();
        let twice = update_module_all(&once, ["SALIENT_A"]).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn missing_markers() {
        assert!(update_module_all("__all__ = []\n", ["X"]).is_none());
    }

    #[test]
    fn file_update_and_missing_marker_error() {
        let dir = tempfile::tempdir().unwrap();
        let init = dir.path().join("__init__.py");
        std::fs::write(&init, INIT).unwrap();
        update_module_all_file(&init, ["SALIENT_Z"]).unwrap();
        assert!(std::fs::read_to_string(&init).unwrap().contains("\"SALIENT_Z\","));

        let plain = dir.path().join("plain.py");
        std::fs::write(&plain, "x = 1\n").unwrap();
        let err = update_module_all_file(&plain, ["SALIENT_Z"]).unwrap_err();
        assert!(matches!(err, ConstError::MissingMarkers { .. }));
    }
}
