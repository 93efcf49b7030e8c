//! Lexical header normalization.
//!
//! This is a best-effort text preprocessor, not a C parser. It strips the
//! constructs a permissive declaration parser cannot accept and leaves
//! everything else untouched. The passes run in a fixed order: comments must
//! go before directives, otherwise a commented-out `#include` swallows the
//! closing `*/` of its comment.
//!
//! Unsupported constructs:
//! - function-like macros and conditional compilation other than the
//!   `__cplusplus` guard (the directive lines are dropped, their bodies kept)
//! - string or character literals containing `/*` or `//`
//! - inline function bodies whose last line closes a nested block before the
//!   function's own closing brace
//! - integer defines written in hex, octal suffix or expression form (dropped)

use std::sync::LazyLock;

use regex::Regex;

static RE_COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\s*/\*.*?\*/|\s*//[^\n]*").expect("valid comment regex"));

static RE_CPLUSPLUS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?ms)#ifdef __cplusplus.*?#endif.*?$").expect("valid c++ guard regex")
});

static RE_INCLUDE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"#include "([^"]*)""#).expect("valid include regex"));

/// A directive runs to the first line end not escaped by a backslash.
static RE_PREPROCESSOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"#(?:[^\n]*\\\n)*[^\n]*").expect("valid preprocessor regex")
});

static RE_INT_DEFINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^#define[ \t]+\w+[ \t]+\d+[ \t\r]*$").expect("valid define regex")
});

static RE_VAFUNC: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^[^;]*\([^;]*va_list.*\);").expect("valid va_list regex")
});

static RE_INLINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?ms)(^.*?inline.*?\(.*?\))\s*\{.*?\}$").expect("valid inline regex")
});

/// Annotation macros that expand to nothing useful for a declaration parser.
pub const DEFAULT_TAGS: &[&str] = &[
    "SALIENTLIB_API",
    "SALIENTLIB_CAPI",
    "SALIENT_PUBLIC",
    "SALIENT_NODISCARD",
    "SALIENT_DEPRECATED_NOMESSAGE",
    "SALIENT_DEPRECATED_ENUM",
    "__restrict",
];

/// Annotation macros taking an argument list, stripped together with it.
pub const DEFAULT_CALL_TAGS: &[&str] = &["SALIENT_DEPRECATED", "SALIENTLIB_FORMAT"];

/// One normalization step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pass {
    /// Remove block and line comments together with their leading whitespace.
    StripComments,
    /// Remove `#ifdef __cplusplus ... #endif` blocks.
    StripCplusplus,
    /// Record `#include "..."` targets. Leaves the text unchanged.
    CollectIncludes,
    /// Remove directives other than plain integer `#define`s.
    StripPreprocessor,
    /// Remove library annotation tags.
    StripTags,
    /// Remove declarations taking a `va_list`.
    StripVaFunctions,
    /// Replace inline function bodies with `;`.
    StripInlineBodies,
}

/// The pass order every header goes through.
pub const DEFAULT_PASSES: [Pass; 7] = [
    Pass::StripComments,
    Pass::StripCplusplus,
    Pass::CollectIncludes,
    Pass::StripPreprocessor,
    Pass::StripTags,
    Pass::StripVaFunctions,
    Pass::StripInlineBodies,
];

/// Normalized header text plus the quoted includes found on the way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Normalized {
    /// Cleaned declaration text, trimmed.
    pub text: String,
    /// Raw include targets in order of appearance.
    pub includes: Vec<String>,
}

/// Applies the normalization passes with a configurable tag set.
#[derive(Debug, Clone)]
pub struct Normalizer {
    tags: Regex,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::with_tags(DEFAULT_TAGS, DEFAULT_CALL_TAGS)
    }
}

impl Normalizer {
    /// Build a normalizer stripping `tags` verbatim and `call_tags` followed
    /// by a parenthesized argument list.
    pub fn with_tags<S: AsRef<str>>(tags: &[S], call_tags: &[S]) -> Self {
        let mut plain: Vec<&str> = tags.iter().map(AsRef::as_ref).collect();
        // Longest first so a tag never shadows a longer one sharing its prefix.
        plain.sort_by(|a, b| b.len().cmp(&a.len()).then(a.cmp(b)));

        let mut alternatives: Vec<String> = plain.iter().map(|t| regex::escape(t)).collect();
        if !call_tags.is_empty() {
            let calls: Vec<String> = call_tags.iter().map(|t| regex::escape(t.as_ref())).collect();
            alternatives.insert(0, format!(r"(?:{})\([^)]*\)", calls.join("|")));
        }

        let pattern = if alternatives.is_empty() {
            // Never matches.
            r"\b\B".to_string()
        } else {
            alternatives.join("|")
        };
        let tags = Regex::new(&pattern).expect("escaped tag alternatives form a valid regex");
        Self { tags }
    }

    /// Run the default pass order.
    pub fn normalize(&self, raw: &str) -> Normalized {
        self.normalize_with(raw, &DEFAULT_PASSES)
    }

    /// Run an explicit pass sequence.
    pub fn normalize_with(&self, raw: &str, passes: &[Pass]) -> Normalized {
        let mut text = raw.to_string();
        let mut includes = Vec::new();
        for pass in passes {
            text = match pass {
                Pass::StripComments => RE_COMMENT.replace_all(&text, "").into_owned(),
                Pass::StripCplusplus => RE_CPLUSPLUS.replace_all(&text, "").into_owned(),
                Pass::CollectIncludes => {
                    includes.extend(RE_INCLUDE.captures_iter(&text).map(|c| c[1].to_string()));
                    text
                }
                Pass::StripPreprocessor => strip_preprocessor(&text),
                Pass::StripTags => self.tags.replace_all(&text, "").into_owned(),
                Pass::StripVaFunctions => RE_VAFUNC.replace_all(&text, "").into_owned(),
                Pass::StripInlineBodies => RE_INLINE.replace_all(&text, "${1};").into_owned(),
            };
        }
        Normalized {
            text: text.trim().to_string(),
            includes,
        }
    }
}

fn strip_preprocessor(text: &str) -> String {
    RE_PREPROCESSOR
        .replace_all(text, |caps: &regex::Captures<'_>| {
            let directive = &caps[0];
            if RE_INT_DEFINE.is_match(directive) {
                directive.to_string()
            } else {
                String::new()
            }
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clean(raw: &str) -> String {
        Normalizer::default().normalize(raw).text
    }

    #[test]
    fn strips_block_and_line_comments() {
        let raw = "/* header */\nint a; // trailing\n/* multi\n line */\nint b;\n";
        assert_eq!(clean(raw), "int a;\nint b;");
    }

    #[test]
    fn strips_cplusplus_guards() {
        let raw = "#ifdef __cplusplus\nextern \"C\" {\n#endif\nint a;\n#ifdef __cplusplus\n}\n#endif\n";
        assert_eq!(clean(raw), "int a;");
    }

    #[test]
    fn keeps_integer_defines_only() {
        let raw = "#ifndef GUARD_H\n#define GUARD_H\n#define SALIENT_KEY_UP 72\n#define NAME \"x\"\nint a;\n#endif\n";
        assert_eq!(clean(raw), "#define SALIENT_KEY_UP 72\n\nint a;");
    }

    #[test]
    fn strips_continued_directives() {
        let raw = "#define MAX(a, b) \\\n  ((a) > (b) ? (a) : (b))\nint a;";
        assert_eq!(clean(raw), "int a;");
    }

    #[test]
    fn collects_quoted_includes_before_stripping() {
        let n = Normalizer::default().normalize("#include \"color.h\"\n#include <stdint.h>\n#include \"sub/point.h\"\nint a;");
        assert_eq!(n.includes, vec!["color.h".to_string(), "sub/point.h".to_string()]);
        assert_eq!(n.text, "int a;");
    }

    #[test]
    fn strips_tags() {
        let raw = "SALIENTLIB_API SALIENT_NODISCARD int f(int* __restrict out);\n\
                   SALIENT_DEPRECATED(\"use g\") void old(void);\n\
                   SALIENTLIB_CAPI void p(const char* fmt, ...) SALIENTLIB_FORMAT(1, 2);";
        assert_eq!(
            clean(raw),
            "int f(int*  out);\n void old(void);\n void p(const char* fmt, ...) ;"
        );
    }

    #[test]
    fn strips_va_list_functions() {
        let raw = "int a;\nvoid vlog(const char* fmt, va_list args);\nint b;";
        assert_eq!(clean(raw), "int a;\n\nint b;");
    }

    #[test]
    fn rewrites_inline_bodies() {
        let raw = "static inline int twice(int x)\n{\n  return x * 2;\n}\nint b;";
        assert_eq!(clean(raw), "static inline int twice(int x);\nint b;");
    }

    #[test]
    fn idempotent_on_clean_text() {
        let raw = "/* c */\n#define SALIENT_A 1\nstruct p { int x; };\nSALIENT_PUBLIC int f(int a);\n\
                   static inline int g(void) { return 0; }\n";
        let once = clean(raw);
        assert_eq!(clean(&once), once);
    }

    #[test]
    fn order_matters_for_commented_directives() {
        let raw = "/* see #include \"other.h\" for details */\nint a;";
        let normalizer = Normalizer::default();

        let right = normalizer.normalize(raw);
        assert_eq!(right.text, "int a;");
        assert!(right.includes.is_empty());

        let reversed: Vec<Pass> = DEFAULT_PASSES.iter().rev().copied().collect();
        let wrong = normalizer.normalize_with(raw, &reversed);
        assert_ne!(wrong.text, right.text);
        assert!(wrong.text.starts_with("/* see"));
    }

    #[test]
    fn custom_tag_set() {
        let n = Normalizer::with_tags(&["MYLIB_API"], &["MYLIB_ATTR"]);
        let out = n.normalize("MYLIB_API int f(void) MYLIB_ATTR(pure);").text;
        assert_eq!(out, "int f(void) ;");
    }
}
