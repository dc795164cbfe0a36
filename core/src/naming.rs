//! # Naming Utilities
//!
//! Pure string transforms that turn contract names (channel paths, schema ids,
//! queue names, operation ids) into identifiers and type names of the
//! generated Java application.
//!
//! Every function is total: empty input yields an empty string.

/// Java keywords and literals that cannot be used as identifiers.
const RESERVED_WORDS: &[&str] = &[
    "abstract",
    "assert",
    "boolean",
    "break",
    "byte",
    "case",
    "catch",
    "char",
    "class",
    "const",
    "continue",
    "default",
    "do",
    "double",
    "else",
    "enum",
    "extends",
    "false",
    "final",
    "finally",
    "float",
    "for",
    "goto",
    "if",
    "implements",
    "import",
    "instanceof",
    "int",
    "interface",
    "long",
    "native",
    "new",
    "null",
    "package",
    "private",
    "protected",
    "public",
    "return",
    "short",
    "static",
    "strictfp",
    "super",
    "switch",
    "synchronized",
    "this",
    "throw",
    "throws",
    "transient",
    "true",
    "try",
    "var",
    "void",
    "volatile",
    "while",
];

/// Prefix prepended to identifiers that collide with a reserved word or start with a digit.
pub const ESCAPE_PREFIX: char = '_';

/// Returns true when `word` is a reserved word of the target language.
pub fn is_reserved_word(word: &str) -> bool {
    RESERVED_WORDS.contains(&word)
}

/// Splits on every non-alphanumeric character (path separators, dots, braces,
/// whitespace, hyphens, underscores). Empty segments are dropped.
fn segments(raw: &str) -> impl Iterator<Item = &str> {
    raw.split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|s| !s.is_empty())
}

/// Uppercases the first character, leaving the rest untouched.
pub fn upper_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Lowercases the first character, leaving the rest untouched.
pub fn lower_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn starts_with_digit(s: &str) -> bool {
    s.chars().next().is_some_and(|c| c.is_ascii_digit())
}

/// Converts any raw name into a PascalCase type name.
///
/// Each separator-delimited segment is re-capitalized; the inner casing of a
/// segment is preserved, so `orderPlaced` becomes `OrderPlaced` and
/// `status-queue` becomes `StatusQueue`.
pub fn to_type_name(raw: &str) -> String {
    let name: String = segments(raw).map(upper_first).collect();
    if starts_with_digit(&name) {
        format!("{}{}", ESCAPE_PREFIX, name)
    } else {
        name
    }
}

/// Converts any raw name into a lowerCamelCase identifier.
///
/// Reserved words and names starting with a digit are escaped with [`ESCAPE_PREFIX`].
pub fn to_identifier(raw: &str) -> String {
    let camel = lower_first(&segments(raw).map(upper_first).collect::<String>());
    escape_identifier(camel)
}

/// Escapes a candidate identifier that is reserved or not a valid identifier start.
pub fn escape_identifier(candidate: String) -> String {
    if is_reserved_word(&candidate) || starts_with_digit(&candidate) {
        format!("{}{}", ESCAPE_PREFIX, candidate)
    } else {
        candidate
    }
}

/// Returns true when `raw` can be used verbatim as a Java identifier.
pub fn is_valid_identifier(raw: &str) -> bool {
    let mut chars = raw.chars();
    let starts_ok = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_' || c == '$');
    starts_ok
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
        && !is_reserved_word(raw)
}

/// Synthesizes a name from a channel path.
///
/// The first segment is lower camel case, subsequent segments upper camel case:
/// `orders/{region}/created` becomes `ordersRegionCreated`.
pub fn synthesize_path_name(channel: &str) -> String {
    let mut parts = channel
        .split('/')
        .map(|seg| seg.trim_matches(|c| c == '{' || c == '}'))
        .filter(|seg| segments(seg).next().is_some());

    let Some(first) = parts.next() else {
        return String::new();
    };

    let mut name = lower_first(&to_type_name(first));
    for part in parts {
        name.push_str(&to_type_name(part));
    }
    escape_identifier(name)
}
