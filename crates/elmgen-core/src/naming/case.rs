//! Identifier casing rules.
//!
//! All functions here are pure and total. [`camel_case`] follows the
//! protobuf Go generator's `CamelCase` so that identifiers match what
//! other protobuf toolchains derive from the same schema names, with any
//! remaining underscores removed.

/// Words Elm reserves; field identifiers that collide get a trailing `_`.
const ELM_RESERVED: &[&str] = &[
    "alias",
    "as",
    "case",
    "command",
    "effect",
    "else",
    "exposing",
    "if",
    "import",
    "in",
    "infix",
    "let",
    "module",
    "of",
    "port",
    "subscription",
    "then",
    "type",
    "where",
];

/// Convert a schema name to UpperCamelCase with underscores removed.
///
/// `foo_bar` becomes `FooBar`, `foo_1` becomes `Foo1` and a leading
/// underscore is replaced with `X`.
pub fn camel_case(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    let mut out = String::with_capacity(s.len());
    let mut i = 0;

    if chars.first() == Some(&'_') {
        out.push('X');
        i += 1;
    }

    while i < chars.len() {
        let c = chars[i];
        if c == '_' && chars.get(i + 1).is_some_and(|n| n.is_ascii_lowercase()) {
            i += 1;
            continue;
        }
        if c.is_ascii_digit() {
            out.push(c);
            i += 1;
            continue;
        }
        out.push(c.to_ascii_uppercase());
        while chars.get(i + 1).is_some_and(|n| n.is_ascii_lowercase()) {
            i += 1;
            out.push(chars[i]);
        }
        i += 1;
    }

    out.replace('_', "")
}

/// Uppercase the first character
pub fn first_upper(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) => c.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Lowercase the first character
pub fn first_lower(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) => c.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Elm type identifier for a single (unflattened) schema type name
pub fn type_name(name: &str) -> String {
    camel_case(name)
}

/// Elm record field identifier for a schema field name
pub fn field_name(name: &str) -> String {
    let ident = first_lower(&camel_case(name));
    if ELM_RESERVED.contains(&ident.as_str()) {
        format!("{ident}_")
    } else {
        ident
    }
}

/// Elm constructor for an enum constant, derived from its lower-cased name
pub fn enum_variant_name(constant: &str) -> String {
    camel_case(&constant.to_lowercase())
}

/// Convert a snake_case name to lowerCamelCase, the way protoc derives
/// `json_name` for fields that do not carry one.
pub fn to_lower_camel_case(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut capitalize_next = false;

    for c in s.chars() {
        if c == '_' {
            capitalize_next = true;
        } else if capitalize_next {
            result.push(c.to_ascii_uppercase());
            capitalize_next = false;
        } else {
            result.push(c);
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camel_case() {
        assert_eq!(camel_case("foo_bar"), "FooBar");
        assert_eq!(camel_case("FooBar"), "FooBar");
        assert_eq!(camel_case("foo_1"), "Foo1");
        assert_eq!(camel_case("foo1bar"), "Foo1Bar");
        assert_eq!(camel_case("_hidden"), "XHidden");
        assert_eq!(camel_case("HTTP_Server"), "HTTPServer");
        assert_eq!(camel_case(""), "");
    }

    #[test]
    fn test_first_upper_lower() {
        assert_eq!(first_upper("foo"), "Foo");
        assert_eq!(first_upper("f"), "F");
        assert_eq!(first_upper(""), "");
        assert_eq!(first_lower("Outer_Inner"), "outer_Inner");
        assert_eq!(first_lower(""), "");
    }

    #[test]
    fn test_field_name() {
        assert_eq!(field_name("user_id"), "userId");
        assert_eq!(field_name("name"), "name");
        assert_eq!(field_name("type"), "type_");
        assert_eq!(field_name("port"), "port_");
        assert_eq!(field_name("ports"), "ports");
    }

    #[test]
    fn test_enum_variant_name() {
        assert_eq!(enum_variant_name("COLOR_RED"), "ColorRed");
        assert_eq!(enum_variant_name("UNKNOWN"), "Unknown");
        assert_eq!(enum_variant_name("LEVEL_2"), "Level2");
    }

    #[test]
    fn test_to_lower_camel_case() {
        assert_eq!(to_lower_camel_case("hello_world"), "helloWorld");
        assert_eq!(to_lower_camel_case("my_field_name"), "myFieldName");
        assert_eq!(to_lower_camel_case("simple"), "simple");
    }
}
