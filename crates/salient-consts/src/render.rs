//! Module rendering.

use crate::error::Result;
use crate::table::{Constant, ConstantTable};

/// Docstring opening every generated constants module.
pub const CONSTANT_MODULE_HEADER: &str = r#""""Constants from the libsalient C API.

This module is auto-generated by `salient constants`.
"""
"#;

/// Render `table` as a module of `NAME = value` assignments with `__all__`.
pub fn render_module(table: &ConstantTable) -> String {
    let mut out = String::from(CONSTANT_MODULE_HEADER);
    out.push('\n');
    for constant in table.iter() {
        out.push_str(&format!("{} = {}\n", constant.name, constant.value));
    }
    out.push_str("\n__all__ = [\n");
    for constant in table.iter() {
        out.push_str(&format!("    \"{}\",\n", constant.name));
    }
    out.push_str("]\n");
    out
}

/// Attribute name of a constant inside an enum body.
///
/// Everything up to and including the first `_` is dropped; digit-only
/// results get an `N` prefix so they stay valid identifiers.
fn member_name(constant: &Constant) -> String {
    let short = constant
        .name
        .split_once('_')
        .map(|(_, rest)| rest)
        .unwrap_or(&constant.name);
    if !short.is_empty() && short.chars().all(|c| c.is_ascii_digit()) {
        format!("N{short}")
    } else {
        short.to_string()
    }
}

/// Enum member assignments for the constants starting with `prefix`, sorted
/// by value.
pub fn enum_members(table: &ConstantTable, prefix: &str) -> Vec<String> {
    table
        .with_prefix(prefix)
        .map(|constant| {
            let name = member_name(constant);
            // Single-letter names that lint as ambiguous.
            if matches!(name.as_str(), "I" | "O" | "l") {
                format!("{name} = {}  # noqa: E741", constant.value)
            } else {
                format!("{name} = {}", constant.value)
            }
        })
        .collect()
}

/// Render an `IntEnum` class holding the constants starting with `prefix`.
pub fn render_enum_class(table: &ConstantTable, class_name: &str, prefix: &str) -> String {
    let mut out = format!("class {class_name}(enum.IntEnum):\n    \"\"\"{prefix}* constants.\"\"\"\n\n");
    let members = enum_members(table, prefix);
    if members.is_empty() {
        out.push_str("    pass\n");
    }
    for member in members {
        out.push_str("    ");
        out.push_str(&member);
        out.push('\n');
    }
    out
}

/// Render `table` as pretty JSON.
pub fn render_json(table: &ConstantTable) -> Result<String> {
    Ok(serde_json::to_string_pretty(table)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn table(entries: &[(&str, i64)]) -> ConstantTable {
        ConstantTable::from_constants(entries.iter().map(|(name, value)| Constant {
            name: name.to_string(),
            value: *value,
            origin: PathBuf::from("/v/keys.h"),
        }))
    }

    #[test]
    fn module_lists_assignments_and_all() {
        let out = render_module(&table(&[("SALIENT_KEY_DOWN", 80), ("SALIENT_KEY_UP", 72)]));
        assert!(out.starts_with("\"\"\"Constants from the libsalient C API."));
        let body = out.split_once("\"\"\"\n\n").unwrap().1;
        assert_eq!(
            body,
            "SALIENT_KEY_UP = 72\nSALIENT_KEY_DOWN = 80\n\n__all__ = [\n    \"SALIENT_KEY_UP\",\n    \"SALIENT_KEY_DOWN\",\n]\n"
        );
    }

    #[test]
    fn enum_member_names() {
        let t = table(&[
            ("SDLK_a", 97),
            ("SDLK_0", 48),
            ("SDLK_l", 108),
            ("SDL_SCANCODE_A", 4),
            ("SDLK_UNDERSCORE", 95),
        ]);
        assert_eq!(
            enum_members(&t, "SDLK_"),
            vec!["N0 = 48", "UNDERSCORE = 95", "a = 97", "l = 108  # noqa: E741"]
        );
        assert_eq!(enum_members(&t, "SDL_SCANCODE_"), vec!["SCANCODE_A = 4"]);
    }

    #[test]
    fn enum_class_body() {
        let t = table(&[("SALIENT_BKGND_NONE", 0), ("SALIENT_BKGND_SET", 1)]);
        assert_eq!(
            render_enum_class(&t, "BackgroundFlag", "SALIENT_BKGND_"),
            "class BackgroundFlag(enum.IntEnum):\n    \"\"\"SALIENT_BKGND_* constants.\"\"\"\n\n    \
             BKGND_NONE = 0\n    BKGND_SET = 1\n"
        );
        assert!(render_enum_class(&t, "Empty", "NOPE_").ends_with("    pass\n"));
    }

    #[test]
    fn json_round_trips_through_serde() {
        let t = table(&[("SALIENT_A", 1)]);
        let json = render_json(&t).unwrap();
        let back: ConstantTable = serde_json::from_str(&json).unwrap();
        assert_eq!(back, t);
    }
}
