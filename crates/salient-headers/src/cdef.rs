//! FFI definition text emission.
//!
//! Concatenates prelude definitions, the ordered header units and trailer
//! declarations into the text handed to the FFI code generator. Every unit is
//! checked against the declaration grammar first; the first failure aborts
//! the emission.

use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

use crate::decl::{parse_declarations, Located};
use crate::error::{HeaderError, Result};
use crate::unit::HeaderUnit;

/// Declarations appended after the headers unless configured otherwise.
pub const DEFAULT_TRAILER: &[&str] = &["#define SALIENT_COMPILEDVERSION ..."];

/// A header unit that passed the declaration grammar.
#[derive(Debug, Clone)]
pub struct CheckedHeader {
    pub path: PathBuf,
    pub declarations: Vec<Located>,
}

/// The emitted definition text and the checked headers it came from.
#[derive(Debug, Clone)]
pub struct Cdef {
    text: String,
    headers: Vec<CheckedHeader>,
}

impl Cdef {
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Checked headers in emission order.
    pub fn headers(&self) -> &[CheckedHeader] {
        &self.headers
    }

    /// SHA-256 of the definition text, lowercase hex.
    pub fn digest(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.text.as_bytes());
        hasher.finalize().iter().map(|b| format!("{b:02x}")).collect()
    }
}

/// Check one unit against the declaration grammar.
pub fn check_unit(unit: &HeaderUnit) -> Result<CheckedHeader> {
    let declarations = parse_declarations(unit.text()).map_err(|e| HeaderError::InvalidDeclaration {
        path: unit.path().to_path_buf(),
        line: e.line,
        detail: e.detail,
        listing: unit.numbered_text(),
    })?;
    Ok(CheckedHeader {
        path: unit.path().to_path_buf(),
        declarations,
    })
}

/// Builder for the definition text.
#[derive(Debug, Clone)]
pub struct CdefEmitter {
    prelude: Vec<String>,
    trailer: Vec<String>,
}

impl Default for CdefEmitter {
    fn default() -> Self {
        Self {
            prelude: Vec::new(),
            trailer: DEFAULT_TRAILER.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl CdefEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add definition text emitted before the headers, unchecked.
    pub fn prelude(mut self, text: impl Into<String>) -> Self {
        self.prelude.push(text.into());
        self
    }

    /// Read a prelude definition file.
    pub fn prelude_file(self, path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| HeaderError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(self.prelude(text))
    }

    /// Replace the trailer declarations.
    pub fn trailer<I, S>(mut self, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.trailer = lines.into_iter().map(Into::into).collect();
        self
    }

    /// Check and concatenate `units`, which must already be in include order.
    pub fn emit(&self, units: &[&HeaderUnit]) -> Result<Cdef> {
        let mut sections: Vec<&str> = self.prelude.iter().map(|s| s.trim()).collect();
        let mut headers = Vec::with_capacity(units.len());

        for unit in units {
            let checked = check_unit(unit)?;
            tracing::debug!(
                header = %unit.path().display(),
                declarations = checked.declarations.len(),
                "checked header"
            );
            headers.push(checked);
            sections.push(unit.text());
        }

        let trailer = self.trailer.join("\n");
        if !trailer.is_empty() {
            sections.push(&trailer);
        }

        let mut text = sections
            .into_iter()
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join("\n\n");
        text.push('\n');

        Ok(Cdef { text, headers })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::Normalizer;

    fn unit(path: &str, raw: &str) -> HeaderUnit {
        HeaderUnit::parse(PathBuf::from(path), raw, &Normalizer::default()).unwrap()
    }

    #[test]
    fn emits_prelude_units_and_trailer_in_order() {
        let a = unit("/v/a.h", "#define SALIENT_A 1\nstruct a { int x; };");
        let b = unit("/v/b.h", "int b(struct a* p);");

        let cdef = CdefEmitter::new().prelude("typedef int SDL_bool;").emit(&[&a, &b]).unwrap();
        assert_eq!(
            cdef.text(),
            "typedef int SDL_bool;\n\n#define SALIENT_A 1\nstruct a { int x; };\n\nint b(struct a* p);\n\n\
             #define SALIENT_COMPILEDVERSION ...\n"
        );
        assert_eq!(cdef.headers().len(), 2);
        assert_eq!(cdef.headers()[0].declarations.len(), 2);
    }

    #[test]
    fn empty_trailer_and_units() {
        let cdef = CdefEmitter::new().trailer(Vec::<String>::new()).emit(&[]).unwrap();
        assert_eq!(cdef.text(), "\n");
        assert!(cdef.headers().is_empty());
    }

    #[test]
    fn invalid_unit_carries_numbered_listing() {
        let bad = unit("/v/bad.h", "int a;\nint b(int x)");
        let err = CdefEmitter::new().emit(&[&bad]).unwrap_err();
        match err {
            HeaderError::InvalidDeclaration { path, line, listing, .. } => {
                assert_eq!(path, PathBuf::from("/v/bad.h"));
                assert_eq!(line, 2);
                assert_eq!(listing, "001 int a;\n002 int b(int x)");
            }
            other => panic!("unexpected error {other}"),
        }
    }

    #[test]
    fn digest_is_stable_and_content_sensitive() {
        let a = unit("/v/a.h", "int a;");
        let b = unit("/v/b.h", "int b;");
        let emitter = CdefEmitter::new();
        let first = emitter.emit(&[&a]).unwrap().digest();
        assert_eq!(first, emitter.emit(&[&a]).unwrap().digest());
        assert_ne!(first, emitter.emit(&[&b]).unwrap().digest());
        assert_eq!(first.len(), 64);
    }
}
