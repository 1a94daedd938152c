//! Turning keys and configuration names into Swift identifiers and literals.

use crate::{infer::TypeTag, types::Value};

const SWIFT_KEYWORDS: &[&str] = &[
    "Any", "Self", "as", "associatedtype", "break", "case", "catch", "class", "continue",
    "default", "defer", "deinit", "do", "else", "enum", "extension", "fallthrough", "false",
    "fileprivate", "for", "func", "guard", "if", "import", "in", "init", "inout", "internal",
    "is", "let", "nil", "open", "operator", "private", "protocol", "public", "repeat",
    "rethrows", "return", "self", "static", "struct", "subscript", "super", "switch", "throw",
    "throws", "true", "try", "typealias", "var", "where", "while",
];

pub fn upper_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub fn lower_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Whether `s` can be used as a Swift identifier (keywords aside).
pub fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) if first.is_alphabetic() || first == '_' => {
            chars.all(|c| c.is_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

/// Wraps reserved words in backticks.
pub fn escape_keyword(name: String) -> String {
    if SWIFT_KEYWORDS.contains(&name.as_str()) {
        format!("`{}`", name)
    } else {
        name
    }
}

/// Property name for `key`.
pub fn property_name(key: &str) -> String {
    escape_keyword(lower_first(key))
}

/// Enum case name for a configuration name.
pub fn case_name(name: &str) -> String {
    escape_keyword(lower_first(name))
}

/// Struct name for a configuration name or nested key.
pub fn type_name(name: &str) -> String {
    upper_first(name)
}

pub fn string_literal(text: &str) -> String {
    let mut literal = String::with_capacity(text.len() + 2);
    literal.push('"');
    for c in text.chars() {
        match c {
            '"' => literal.push_str("\\\""),
            '\\' => literal.push_str("\\\\"),
            '\n' => literal.push_str("\\n"),
            '\r' => literal.push_str("\\r"),
            '\t' => literal.push_str("\\t"),
            '\0' => literal.push_str("\\0"),
            c => literal.push(c),
        }
    }
    literal.push('"');
    literal
}

/// Swift literal for `value`, as stored in a field declared with type `tag`.
///
/// Scalars stored under a `String` field are quoted so the literal matches the declaration.
pub fn literal(tag: &TypeTag, value: &Value) -> String {
    match (tag, value) {
        (TypeTag::Text, Value::Bool(flag)) => string_literal(&flag.to_string()),
        (TypeTag::Text, Value::Integer(number)) => string_literal(&number.to_string()),
        _ => value_literal(value),
    }
}

fn value_literal(value: &Value) -> String {
    match value {
        Value::Text(text) => string_literal(text),
        Value::Bool(flag) => flag.to_string(),
        Value::Integer(number) => number.to_string(),
        Value::List(values) => format!(
            "[{}]",
            values.iter().map(value_literal).collect::<Vec<_>>().join(", ")
        ),
        Value::Record(record) if record.is_empty() => "[:]".to_string(),
        Value::Record(record) => format!(
            "[{}]",
            record
                .iter()
                .map(|(key, value)| format!("{}: {}", string_literal(key), value_literal(value)))
                .collect::<Vec<_>>()
                .join(", ")
        ),
        Value::Unsupported { text, .. } => string_literal(text),
    }
}
