//! Permissive C declaration grammar.
//!
//! Checks that normalized header text is something an FFI definition parser
//! will accept and classifies each top-level item. Type names are permissive:
//! any identifier that is not a keyword is taken to be a typedef name.
//! Does NOT evaluate initializers, bit-field widths or array sizes beyond
//! integer literals.

use std::sync::LazyLock;

use regex::Regex;

static RE_DEFINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^#define[ \t]+(\w+)[ \t]+(\d+)[ \t\r]*$").expect("valid define regex")
});

/// A grammar violation at a 1-based line of the checked text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclError {
    pub line: usize,
    pub detail: String,
}

impl DeclError {
    fn new(line: usize, detail: impl Into<String>) -> Self {
        Self {
            line,
            detail: detail.into(),
        }
    }
}

impl std::fmt::Display for DeclError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "line {}: {}", self.line, self.detail)
    }
}

/// A C type as far as the grammar cares.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CType {
    Void,
    Char,
    SignedChar,
    UnsignedChar,
    Short,
    UnsignedShort,
    Int,
    UnsignedInt,
    Long,
    UnsignedLong,
    LongLong,
    UnsignedLongLong,
    Float,
    Double,
    LongDouble,
    Bool,
    /// Pointer to another type.
    Pointer(Box<CType>),
    /// Const-qualified type.
    Const(Box<CType>),
    /// Array with an optional literal length.
    Array(Box<CType>, Option<u64>),
    /// `struct NAME`.
    Struct(String),
    /// `union NAME`.
    Union(String),
    /// `enum NAME`.
    Enum(String),
    /// Any other identifier, assumed to be a typedef.
    Named(String),
    /// Function pointer, kept as source text.
    FunctionPointer(String),
}

impl std::fmt::Display for CType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CType::Void => write!(f, "void"),
            CType::Char => write!(f, "char"),
            CType::SignedChar => write!(f, "signed char"),
            CType::UnsignedChar => write!(f, "unsigned char"),
            CType::Short => write!(f, "short"),
            CType::UnsignedShort => write!(f, "unsigned short"),
            CType::Int => write!(f, "int"),
            CType::UnsignedInt => write!(f, "unsigned int"),
            CType::Long => write!(f, "long"),
            CType::UnsignedLong => write!(f, "unsigned long"),
            CType::LongLong => write!(f, "long long"),
            CType::UnsignedLongLong => write!(f, "unsigned long long"),
            CType::Float => write!(f, "float"),
            CType::Double => write!(f, "double"),
            CType::LongDouble => write!(f, "long double"),
            CType::Bool => write!(f, "bool"),
            CType::Pointer(inner) => write!(f, "{inner}*"),
            CType::Const(inner) => write!(f, "const {inner}"),
            CType::Array(inner, Some(n)) => write!(f, "{inner}[{n}]"),
            CType::Array(inner, None) => write!(f, "{inner}[]"),
            CType::Struct(name) => write!(f, "struct {name}"),
            CType::Union(name) => write!(f, "union {name}"),
            CType::Enum(name) => write!(f, "enum {name}"),
            CType::Named(name) => write!(f, "{name}"),
            CType::FunctionPointer(text) => write!(f, "{text}"),
        }
    }
}

/// A parsed function parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CParam {
    /// Parameter type.
    pub param_type: CType,
    /// Parameter name (may be empty if unnamed).
    pub name: String,
}

/// A function prototype.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionDecl {
    pub return_type: CType,
    pub name: String,
    /// Parameters (excluding variadic `...`).
    pub parameters: Vec<CParam>,
    pub is_variadic: bool,
    /// Declared `inline` (body already stripped).
    pub is_inline: bool,
}

/// Which aggregate keyword introduced a definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregateKind {
    Struct,
    Union,
    Enum,
}

/// One top-level item of a cleaned header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Declaration {
    /// A kept `#define NAME <integer>`.
    Define { name: String, value: i64 },
    /// `typedef ... NAME;`
    Typedef { name: String },
    /// `struct`/`union`/`enum` definition or forward declaration.
    Aggregate {
        kind: AggregateKind,
        name: Option<String>,
        has_body: bool,
    },
    /// A function prototype.
    Function(FunctionDecl),
    /// A variable or function-pointer object.
    Variable { name: String },
}

/// A declaration and the line it starts on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Located {
    pub line: usize,
    pub decl: Declaration,
}

/// Split `text` into top-level items and classify each.
pub fn parse_declarations(text: &str) -> Result<Vec<Located>, DeclError> {
    split_items(text)?
        .into_iter()
        .map(|item| {
            let decl = match item.kind {
                ItemKind::Directive => parse_define(&item.text, item.line)?,
                ItemKind::Statement => classify(&item.text, item.line)?,
            };
            Ok(Located {
                line: item.line,
                decl,
            })
        })
        .collect()
}

#[derive(Debug, PartialEq, Eq)]
enum ItemKind {
    Directive,
    Statement,
}

#[derive(Debug)]
struct Item {
    kind: ItemKind,
    line: usize,
    text: String,
}

/// Split on `;` at depth zero. Directive lines form their own items.
fn split_items(text: &str) -> Result<Vec<Item>, DeclError> {
    let mut items = Vec::new();
    let mut current = String::new();
    let mut start_line = 1;
    let mut line = 1;
    // Open brackets with the line they were opened on.
    let mut stack: Vec<(char, usize)> = Vec::new();
    let mut last_significant: Option<char> = None;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if current.trim().is_empty() && stack.is_empty() && c == '#' {
            let mut directive = String::from('#');
            while let Some(&next) = chars.peek() {
                if next == '\n' {
                    break;
                }
                directive.push(next);
                chars.next();
            }
            items.push(Item {
                kind: ItemKind::Directive,
                line,
                text: directive,
            });
            current.clear();
            continue;
        }

        if current.trim().is_empty() && !c.is_whitespace() {
            start_line = line;
        }

        match c {
            '\n' => line += 1,
            '{' => {
                if stack.is_empty() && last_significant == Some(')') {
                    return Err(DeclError::new(line, "function body in declarations"));
                }
                stack.push(('{', line));
            }
            '(' | '[' => stack.push((c, line)),
            '}' | ')' | ']' => {
                let open = match c {
                    '}' => '{',
                    ')' => '(',
                    _ => '[',
                };
                match stack.pop() {
                    Some((o, _)) if o == open => {}
                    Some((o, opened)) => {
                        return Err(DeclError::new(
                            line,
                            format!("'{c}' does not match '{o}' opened on line {opened}"),
                        ));
                    }
                    None => return Err(DeclError::new(line, format!("unexpected '{c}'"))),
                }
            }
            ';' if stack.is_empty() => {
                let statement = current.trim().to_string();
                if !statement.is_empty() {
                    items.push(Item {
                        kind: ItemKind::Statement,
                        line: start_line,
                        text: statement,
                    });
                }
                current.clear();
                last_significant = Some(';');
                continue;
            }
            _ => {}
        }

        if !c.is_whitespace() {
            last_significant = Some(c);
        }
        current.push(c);
    }

    if let Some((open, opened)) = stack.pop() {
        return Err(DeclError::new(opened, format!("unclosed '{open}'")));
    }
    if !current.trim().is_empty() {
        return Err(DeclError::new(start_line, "declaration not terminated by ';'"));
    }
    Ok(items)
}

fn parse_define(text: &str, line: usize) -> Result<Declaration, DeclError> {
    let caps = RE_DEFINE
        .captures(text)
        .ok_or_else(|| DeclError::new(line, format!("unexpected preprocessor directive '{}'", text.trim())))?;
    let value = caps[2]
        .parse::<i64>()
        .map_err(|e| DeclError::new(line, format!("define {} out of range: {e}", &caps[1])))?;
    Ok(Declaration::Define {
        name: caps[1].to_string(),
        value,
    })
}

/// Storage classes and qualifiers that do not change the declared type.
const SKIPPED_QUALIFIERS: &[&str] = &["static", "extern", "inline", "volatile", "restrict", "register"];

fn classify(text: &str, line: usize) -> Result<Declaration, DeclError> {
    let tokens = tokenize(text);
    if tokens.is_empty() {
        return Err(DeclError::new(line, "empty declaration"));
    }

    if tokens[0] == "typedef" {
        let name = declarator_name(text)
            .ok_or_else(|| DeclError::new(line, "typedef without a name"))?;
        return Ok(Declaration::Typedef { name });
    }

    let mut lead = tokens
        .iter()
        .skip_while(|t| SKIPPED_QUALIFIERS.contains(t) || **t == "const");
    if let Some(kind) = lead.next().and_then(|t| aggregate_kind(t)) {
        let name = lead.next().filter(|t| is_identifier(t)).map(|t| t.to_string());
        let has_body = text.contains('{');
        // `struct a { ... } instance` or `struct a *ptr` declare objects.
        let declares_object = if has_body {
            text.rfind('}').is_some_and(|i| !text[i + 1..].trim().is_empty())
        } else {
            tokens.len() > 2 + tokens.iter().take_while(|t| SKIPPED_QUALIFIERS.contains(t) || **t == "const").count()
        };
        if !declares_object {
            if name.is_none() && !has_body {
                return Err(DeclError::new(line, "aggregate declaration without a name"));
            }
            return Ok(Declaration::Aggregate { kind, name, has_body });
        }
    }

    let first_paren = text.find('(');
    let is_function = match first_paren {
        // `int (*fp)(int)` declares a pointer object.
        Some(pos) => !text[pos + 1..].trim_start().starts_with('*') && !text[..pos].contains('{'),
        None => false,
    };

    if is_function {
        let func = FunctionDecl::parse(text).map_err(|detail| DeclError::new(line, detail))?;
        return Ok(Declaration::Function(func));
    }

    let name = declarator_name(text).ok_or_else(|| DeclError::new(line, "declaration without a name"))?;
    Ok(Declaration::Variable { name })
}

fn aggregate_kind(token: &str) -> Option<AggregateKind> {
    match token {
        "struct" => Some(AggregateKind::Struct),
        "union" => Some(AggregateKind::Union),
        "enum" => Some(AggregateKind::Enum),
        _ => None,
    }
}

fn is_identifier(token: &str) -> bool {
    let mut chars = token.chars();
    matches!(chars.next(), Some(c) if c == '_' || c.is_ascii_alphabetic())
        && chars.all(|c| c == '_' || c.is_ascii_alphanumeric())
}

/// The name a declaration introduces: the identifier after `(*` for function
/// pointers, otherwise the last identifier outside braces and brackets and
/// before any parameter list.
fn declarator_name(text: &str) -> Option<String> {
    if let Some(pos) = text.find("(*") {
        let rest = text[pos + 2..].trim_start();
        let name: String = rest.chars().take_while(|c| *c == '_' || c.is_ascii_alphanumeric()).collect();
        return (!name.is_empty()).then_some(name);
    }

    let mut depth = 0usize;
    let mut outside = String::new();
    for c in text.chars() {
        match c {
            '{' | '[' => depth += 1,
            '}' | ']' => depth = depth.saturating_sub(1),
            _ if depth == 0 => outside.push(c),
            _ => {}
        }
    }
    // Drop initializers, then the parameter list of a function type.
    let outside = outside.split('=').next().unwrap_or_default();
    let outside = outside.split('(').next().unwrap_or_default();
    tokenize(outside)
        .into_iter()
        .rev()
        .find(|t| is_identifier(t) && !is_keyword(t))
        .map(str::to_string)
}

fn is_keyword(token: &str) -> bool {
    matches!(
        token,
        "typedef" | "struct" | "union" | "enum" | "const" | "unsigned" | "signed" | "void" | "char" | "short"
            | "int" | "long" | "float" | "double" | "_Bool" | "bool"
    ) || SKIPPED_QUALIFIERS.contains(&token)
}

impl FunctionDecl {
    /// Parse a prototype such as `int f(const char* s, ...)`.
    pub fn parse(input: &str) -> Result<Self, String> {
        let input = input.trim();
        let paren_pos = input.find('(').ok_or("missing '('")?;
        if !input.ends_with(')') {
            return Err("expected ')' at the end of a function declaration".to_string());
        }

        let before_paren = input[..paren_pos].trim();
        let params_str = &input[paren_pos + 1..input.len() - 1];

        let tokens = tokenize(before_paren);
        let is_inline = tokens.contains(&"inline");
        let tokens: Vec<&str> = tokens.into_iter().filter(|t| !SKIPPED_QUALIFIERS.contains(t)).collect();
        let (return_type, name) = parse_type_and_name(&tokens)?;
        if name.is_empty() {
            return Err("missing function name".to_string());
        }
        let (parameters, is_variadic) = parse_params(params_str)?;

        Ok(Self {
            return_type,
            name,
            parameters,
            is_variadic,
            is_inline,
        })
    }
}

impl std::fmt::Display for FunctionDecl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}(", self.return_type, self.name)?;
        for (i, param) in self.parameters.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", param.param_type)?;
            if !param.name.is_empty() {
                write!(f, " {}", param.name)?;
            }
        }
        if self.is_variadic {
            if !self.parameters.is_empty() {
                write!(f, ", ")?;
            }
            write!(f, "...")?;
        }
        write!(f, ")")
    }
}

/// Split on whitespace, keeping `*`, `[`, `]` and `,` as separate tokens.
fn tokenize(s: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    for part in s.split_whitespace() {
        let mut start = 0;
        for (i, c) in part.char_indices() {
            if matches!(c, '*' | '[' | ']' | ',') {
                if i > start {
                    tokens.push(&part[start..i]);
                }
                tokens.push(&part[i..i + 1]);
                start = i + 1;
            }
        }
        if start < part.len() {
            tokens.push(&part[start..]);
        }
    }
    tokens
}

/// Parse a base type from the front of `tokens`, returning it and the number
/// of tokens consumed.
fn parse_base_type(tokens: &[&str]) -> Result<(CType, usize), String> {
    let mut pos = 0;
    let mut is_const = false;
    while pos < tokens.len() && tokens[pos] == "const" {
        is_const = true;
        pos += 1;
    }
    if pos >= tokens.len() {
        return Err("expected type".to_string());
    }

    let ct = match tokens[pos] {
        keyword @ ("struct" | "union" | "enum") => {
            pos += 1;
            let name = tokens
                .get(pos)
                .filter(|t| is_identifier(t))
                .ok_or_else(|| format!("expected {keyword} name"))?
                .to_string();
            pos += 1;
            match keyword {
                "struct" => CType::Struct(name),
                "union" => CType::Union(name),
                _ => CType::Enum(name),
            }
        }
        sign @ ("unsigned" | "signed") => {
            let is_unsigned = sign == "unsigned";
            pos += 1;
            match tokens.get(pos).copied() {
                Some("char") => {
                    pos += 1;
                    if is_unsigned { CType::UnsignedChar } else { CType::SignedChar }
                }
                Some("short") => {
                    pos += 1;
                    if tokens.get(pos) == Some(&"int") {
                        pos += 1;
                    }
                    if is_unsigned { CType::UnsignedShort } else { CType::Short }
                }
                Some("int") => {
                    pos += 1;
                    if is_unsigned { CType::UnsignedInt } else { CType::Int }
                }
                Some("long") => {
                    pos += 1;
                    let long_long = tokens.get(pos) == Some(&"long");
                    if long_long {
                        pos += 1;
                    }
                    if tokens.get(pos) == Some(&"int") {
                        pos += 1;
                    }
                    match (is_unsigned, long_long) {
                        (true, true) => CType::UnsignedLongLong,
                        (true, false) => CType::UnsignedLong,
                        (false, true) => CType::LongLong,
                        (false, false) => CType::Long,
                    }
                }
                // Bare `unsigned` means `unsigned int`.
                _ => {
                    if is_unsigned { CType::UnsignedInt } else { CType::Int }
                }
            }
        }
        "long" => {
            pos += 1;
            match tokens.get(pos).copied() {
                Some("long") => {
                    pos += 1;
                    if tokens.get(pos) == Some(&"int") {
                        pos += 1;
                    }
                    CType::LongLong
                }
                Some("double") => {
                    pos += 1;
                    CType::LongDouble
                }
                Some("int") => {
                    pos += 1;
                    CType::Long
                }
                _ => CType::Long,
            }
        }
        "short" => {
            pos += 1;
            if tokens.get(pos) == Some(&"int") {
                pos += 1;
            }
            CType::Short
        }
        other => {
            pos += 1;
            match other {
                "void" => CType::Void,
                "char" => CType::Char,
                "int" => CType::Int,
                "float" => CType::Float,
                "double" => CType::Double,
                "_Bool" | "bool" => CType::Bool,
                name if is_identifier(name) => CType::Named(name.to_string()),
                name => return Err(format!("unexpected token '{name}' in type")),
            }
        }
    };

    // Trailing `const` as in `char const*`.
    while pos < tokens.len() && tokens[pos] == "const" {
        is_const = true;
        pos += 1;
    }

    let ct = if is_const { CType::Const(Box::new(ct)) } else { ct };
    Ok((ct, pos))
}

/// Parse "type [*...] name [\[N\]]" from a token list. The name may be absent.
fn parse_type_and_name(tokens: &[&str]) -> Result<(CType, String), String> {
    if tokens.is_empty() {
        return Err("empty type".to_string());
    }
    let (mut ty, consumed) = parse_base_type(tokens)?;
    let mut name = String::new();
    let mut rest = tokens[consumed..].iter().copied();

    while let Some(tok) = rest.next() {
        match tok {
            "*" => ty = CType::Pointer(Box::new(ty)),
            // `char* const p`: const applies to the pointer itself.
            "const" => {}
            "[" => {
                let mut len = None;
                for inner in rest.by_ref() {
                    if inner == "]" {
                        break;
                    }
                    len = inner.parse::<u64>().ok();
                }
                ty = CType::Array(Box::new(ty), len);
            }
            t if is_identifier(t) && name.is_empty() => name = t.to_string(),
            t => return Err(format!("unexpected token '{t}'")),
        }
    }
    Ok((ty, name))
}

/// Split a parameter list on top-level commas.
fn split_params(s: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, c) in s.char_indices() {
        match c {
            '(' | '[' => depth += 1,
            ')' | ']' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                parts.push(&s[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&s[start..]);
    parts
}

/// Parse the parameter list between `(` and `)`.
fn parse_params(s: &str) -> Result<(Vec<CParam>, bool), String> {
    let s = s.trim();
    if s.is_empty() || s == "void" {
        return Ok((Vec::new(), false));
    }

    let parts = split_params(s);
    let mut params = Vec::new();
    let mut is_variadic = false;

    for (i, part) in parts.iter().enumerate() {
        let part = part.trim();
        if part == "..." {
            if i != parts.len() - 1 {
                return Err("'...' must be the last parameter".to_string());
            }
            is_variadic = true;
            continue;
        }
        if part.is_empty() {
            return Err("empty parameter".to_string());
        }

        if part.contains('(') {
            params.push(CParam {
                param_type: CType::FunctionPointer(part.to_string()),
                name: declarator_name(part).unwrap_or_default(),
            });
            continue;
        }

        let tokens: Vec<&str> = tokenize(part)
            .into_iter()
            .filter(|t| !SKIPPED_QUALIFIERS.contains(t))
            .collect();
        let (param_type, name) = parse_type_and_name(&tokens)?;
        params.push(CParam { param_type, name });
    }

    Ok((params, is_variadic))
}
