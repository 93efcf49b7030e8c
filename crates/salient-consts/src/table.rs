//! Constant collection.

use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

use salient_headers::{CheckedHeader, Declaration};
use serde::{Deserialize, Serialize};

/// Names never exported, regardless of prefix.
pub const DEFAULT_EXCLUDED_NAMES: &[&str] = &[
    "SALIENT_MAJOR_VERSION",
    "SALIENT_MINOR_VERSION",
    "SALIENT_PATCHLEVEL",
    "SALIENT_COMPILEDVERSION",
    "SALIENT_PATHFINDER_MAX_DIMENSIONS",
    "SALIENT_KEY_TEXT_SIZE",
    "SALIENT_NOISE_MAX_DIMENSIONS",
    "SALIENT_NOISE_MAX_OCTAVES",
    "SALIENT_FALLBACK_FONT_SIZE",
];

/// Prefixes of internal constant families.
pub const DEFAULT_EXCLUDED_PREFIXES: &[&str] = &[
    "SALIENT_E_",
    "SALIENT_HEAP_",
    "SALIENT_LEX_",
    "SALIENT_CHARMAP_",
    "SALIENT_LOG_",
];

/// An integer constant and the header defining it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Constant {
    pub name: String,
    pub value: i64,
    pub origin: PathBuf,
}

/// Which constants stay out of the generated module.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExclusionRules {
    names: BTreeSet<String>,
    prefixes: Vec<String>,
}

impl ExclusionRules {
    /// Exclude nothing.
    pub fn none() -> Self {
        Self::default()
    }

    /// The version, dimension and internal-family exclusions of the library.
    pub fn salient() -> Self {
        Self::new(DEFAULT_EXCLUDED_NAMES.iter().copied(), DEFAULT_EXCLUDED_PREFIXES.iter().copied())
    }

    pub fn new<N, P>(names: N, prefixes: P) -> Self
    where
        N: IntoIterator,
        N::Item: Into<String>,
        P: IntoIterator,
        P::Item: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
            prefixes: prefixes.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_excluded(&self, name: &str) -> bool {
        self.names.contains(name) || self.prefixes.iter().any(|p| name.starts_with(p.as_str()))
    }
}

/// Unique constants sorted by value, then name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstantTable {
    constants: Vec<Constant>,
}

impl ConstantTable {
    /// Gather the kept defines of `headers`, in emission order.
    ///
    /// The first definition of a name wins; a later one with a different
    /// value is logged and ignored.
    pub fn collect(headers: &[CheckedHeader], rules: &ExclusionRules) -> Self {
        let mut seen: BTreeMap<String, Constant> = BTreeMap::new();
        for header in headers {
            for located in &header.declarations {
                let Declaration::Define { name, value } = &located.decl else {
                    continue;
                };
                if rules.is_excluded(name) {
                    continue;
                }
                match seen.get(name) {
                    Some(existing) if existing.value != *value => {
                        tracing::warn!(
                            constant = %name,
                            kept = existing.value,
                            ignored = *value,
                            header = %header.path.display(),
                            "conflicting redefinition"
                        );
                    }
                    Some(_) => {}
                    None => {
                        seen.insert(
                            name.clone(),
                            Constant {
                                name: name.clone(),
                                value: *value,
                                origin: header.path.clone(),
                            },
                        );
                    }
                }
            }
        }
        Self::from_constants(seen.into_values())
    }

    /// Build a table from arbitrary constants. Later duplicates are dropped.
    pub fn from_constants(constants: impl IntoIterator<Item = Constant>) -> Self {
        let mut names = BTreeSet::new();
        let mut constants: Vec<Constant> = constants
            .into_iter()
            .filter(|c| names.insert(c.name.clone()))
            .collect();
        constants.sort_by(|a, b| a.value.cmp(&b.value).then_with(|| a.name.cmp(&b.name)));
        Self { constants }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Constant> {
        self.constants.iter()
    }

    /// Constants whose names start with `prefix`, still sorted by value.
    pub fn with_prefix<'a>(&'a self, prefix: &'a str) -> impl Iterator<Item = &'a Constant> + 'a {
        self.constants.iter().filter(move |c| c.name.starts_with(prefix))
    }

    pub fn get(&self, name: &str) -> Option<&Constant> {
        self.constants.iter().find(|c| c.name == name)
    }

    pub fn len(&self) -> usize {
        self.constants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.constants.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use salient_headers::decl::Located;

    fn header(path: &str, defines: &[(&str, i64)]) -> CheckedHeader {
        CheckedHeader {
            path: PathBuf::from(path),
            declarations: defines
                .iter()
                .enumerate()
                .map(|(i, (name, value))| Located {
                    line: i + 1,
                    decl: Declaration::Define {
                        name: name.to_string(),
                        value: *value,
                    },
                })
                .collect(),
        }
    }

    #[test]
    fn excludes_listed_names_and_prefixes() {
        let rules = ExclusionRules::salient();
        for name in DEFAULT_EXCLUDED_NAMES {
            assert!(rules.is_excluded(name), "{name} should be excluded");
        }
        assert!(rules.is_excluded("SALIENT_E_ERROR"));
        assert!(rules.is_excluded("SALIENT_LOG_DEBUG"));
        assert!(!rules.is_excluded("SALIENT_KEY_UP"));
        assert!(!rules.is_excluded("SALIENT_EVENT_KEY"));
    }

    #[test]
    fn collect_filters_dedups_and_sorts_by_value() {
        let headers = vec![
            header(
                "/v/a.h",
                &[
                    ("SALIENT_KEY_UP", 72),
                    ("SALIENT_MAJOR_VERSION", 1),
                    ("SALIENT_E_OK", 0),
                    ("SALIENT_KEY_DOWN", 80),
                    ("SALIENT_FOV_BASIC", 0),
                ],
            ),
            header("/v/b.h", &[("SALIENT_KEY_UP", 99), ("SALIENT_BKGND_SET", 1), ("SALIENT_BKGND_ADD", 1)]),
        ];
        let table = ConstantTable::collect(&headers, &ExclusionRules::salient());
        let names: Vec<&str> = table.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["SALIENT_FOV_BASIC", "SALIENT_BKGND_ADD", "SALIENT_BKGND_SET", "SALIENT_KEY_UP", "SALIENT_KEY_DOWN"]
        );
        let up = table.get("SALIENT_KEY_UP").unwrap();
        assert_eq!(up.value, 72);
        assert_eq!(up.origin, PathBuf::from("/v/a.h"));
    }

    #[test]
    fn every_other_constant_appears_exactly_once() {
        let headers = vec![
            header("/v/a.h", &[("SALIENT_A", 3), ("SALIENT_HEAP_MAX", 9), ("SALIENT_B", 1)]),
            header("/v/b.h", &[("SALIENT_A", 3), ("SALIENT_C", 2)]),
        ];
        let table = ConstantTable::collect(&headers, &ExclusionRules::salient());
        for name in ["SALIENT_A", "SALIENT_B", "SALIENT_C"] {
            assert_eq!(table.iter().filter(|c| c.name == name).count(), 1);
        }
        assert!(table.get("SALIENT_HEAP_MAX").is_none());
        let values: Vec<i64> = table.iter().map(|c| c.value).collect();
        assert_eq!(values, vec![1, 2, 3]);
    }

    #[test]
    fn with_prefix_keeps_value_order() {
        let table = ConstantTable::from_constants(
            [("SALIENT_KEY_B", 5), ("SALIENT_FOV_X", 1), ("SALIENT_KEY_A", 7)].map(|(name, value)| Constant {
                name: name.to_string(),
                value,
                origin: PathBuf::new(),
            }),
        );
        let keys: Vec<&str> = table.with_prefix("SALIENT_KEY_").map(|c| c.name.as_str()).collect();
        assert_eq!(keys, vec!["SALIENT_KEY_B", "SALIENT_KEY_A"]);
    }

    #[test]
    fn non_define_declarations_are_ignored() {
        let mut h = header("/v/a.h", &[("SALIENT_A", 1)]);
        h.declarations.push(Located {
            line: 2,
            decl: Declaration::Variable {
                name: "SALIENT_B".to_string(),
            },
        });
        let table = ConstantTable::collect(&[h], &ExclusionRules::none());
        assert_eq!(table.len(), 1);
    }
}
