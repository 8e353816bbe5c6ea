//! Identifier helpers shared by the naming rules

use regex::Regex;
use std::sync::LazyLock;

const ENCODE_TABLE: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Number of letters at the end of `ENCODE_TABLE`
const LETTER_COUNT: usize = 52;

/// Reserved words of the target language that generated identifiers must avoid
pub const KEYWORDS: &[&str] = &[
    "abstract", "as", "boolean", "break", "byte", "case", "catch", "char", "class", "continue",
    "const", "debugger", "default", "delete", "do", "double", "else", "enum", "export", "extends",
    "false", "final", "finally", "float", "for", "function", "goto", "if", "implements", "import",
    "in", "instanceof", "int", "interface", "is", "long", "namespace", "native", "new", "null",
    "package", "private", "protected", "public", "return", "short", "static", "super", "switch",
    "synchronized", "this", "throw", "throws", "transient", "true", "try", "typeof", "use", "var",
    "void", "volatile", "while", "with",
];

/// Names static members may not take (own properties of every function object)
pub const RESERVED_STATIC_NAMES: &[&str] = &[
    "__defineGetter__",
    "__defineSetter__",
    "apply",
    "arguments",
    "bind",
    "call",
    "caller",
    "constructor",
    "hasOwnProperty",
    "isPrototypeOf",
    "length",
    "name",
    "propertyIsEnumerable",
    "prototype",
    "toLocaleString",
    "toString",
    "valueOf",
];

/// Names instance members may not take (members of the root prototype)
pub const RESERVED_INSTANCE_NAMES: &[&str] = &[
    "__defineGetter__",
    "__defineSetter__",
    "constructor",
    "hasOwnProperty",
    "isPrototypeOf",
    "propertyIsEnumerable",
    "toLocaleString",
    "toString",
    "valueOf",
];

static IDENTIFIER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_$][A-Za-z0-9_$]*$").expect("valid identifier regex"));

static NESTED_IDENTIFIER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z_$][A-Za-z0-9_$]*(\.[A-Za-z_$][A-Za-z0-9_$]*)*$")
        .expect("valid nested identifier regex")
});

pub fn is_keyword(s: &str) -> bool {
    KEYWORDS.contains(&s)
}

pub fn is_valid_identifier(s: &str) -> bool {
    IDENTIFIER.is_match(s) && !is_keyword(s)
}

/// A dotted sequence of identifiers (`a.b.c`)
pub fn is_valid_nested_identifier(s: &str) -> bool {
    NESTED_IDENTIFIER.is_match(s) && !s.split('.').any(is_keyword)
}

/// Encode `i` with the alphanumeric table.
///
/// With `ensure_valid_identifier` only letters are used, so the result can
/// start an identifier, and keywords are escaped with a leading `_`.
pub fn encode_number(i: usize, ensure_valid_identifier: bool) -> String {
    let (base, offset) = if ensure_valid_identifier {
        (LETTER_COUNT, ENCODE_TABLE.len() - LETTER_COUNT)
    } else {
        (ENCODE_TABLE.len(), 0)
    };

    let digit = |n: usize| ENCODE_TABLE[n % base + offset] as char;
    let mut n = i;
    let mut chars = vec![digit(n)];
    while n >= base {
        n /= base;
        chars.push(digit(n));
    }
    let result: String = chars.into_iter().rev().collect();

    if ensure_valid_identifier && is_keyword(&result) {
        format!("_{}", result)
    } else {
        result
    }
}

/// Lower-case the leading capital run of a declared name.
///
/// `ID` becomes `id`; an all-caps name longer than one character is kept;
/// for `XMLParser` every leading capital except the last is lowered.
pub fn make_camel_case(s: &str) -> String {
    if s.is_empty() {
        return String::new();
    }
    if s == "ID" {
        return "id".to_string();
    }

    let chars: Vec<char> = s.chars().collect();
    let uppercase = chars.iter().take_while(|c| c.is_uppercase()).count();
    let all_uppercase = uppercase == chars.len();

    if (all_uppercase && chars.len() != 1) || uppercase == 0 {
        s.to_string()
    } else if uppercase > 1 {
        let head: String = chars[..uppercase - 1].iter().collect();
        let tail: String = chars[uppercase - 1..].iter().collect();
        head.to_lowercase() + &tail
    } else {
        let tail: String = chars[1..].iter().collect();
        chars[0].to_lowercase().collect::<String>() + &tail
    }
}

/// Split `Ns.Sub.Name` at the first dot into (`Ns`, `Sub.Name`)
pub fn split_namespaced_name(full_name: &str) -> (&str, &str) {
    match full_name.find('.') {
        Some(dot) => (&full_name[..dot], &full_name[dot + 1..]),
        None => ("", full_name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_number_digits_then_letters() {
        for i in 0..10 {
            assert_eq!(encode_number(i, false), i.to_string());
        }
        assert_eq!(encode_number(10, false), "a");
        assert_eq!(encode_number(61, false), "Z");
        assert_eq!(encode_number(62, false), "10");
    }

    #[test]
    fn test_encode_number_valid_identifiers() {
        assert_eq!(encode_number(0, true), "a");
        assert_eq!(encode_number(25, true), "z");
        assert_eq!(encode_number(26, true), "A");
        assert_eq!(encode_number(52, true), "ba");
        // "do" is reached as d=3, o=14: 3 * 52 + 14
        assert_eq!(encode_number(3 * 52 + 14, true), "_do");
    }

    #[test]
    fn test_encode_number_is_injective() {
        let mut seen = std::collections::HashSet::new();
        for i in 0..5000 {
            assert!(seen.insert(encode_number(i, true)), "duplicate code for {}", i);
        }
    }

    #[test]
    fn test_make_camel_case() {
        assert_eq!(make_camel_case("ID"), "id");
        assert_eq!(make_camel_case("Foo"), "foo");
        assert_eq!(make_camel_case("XMLParser"), "xmlParser");
        assert_eq!(make_camel_case("URL"), "URL");
        assert_eq!(make_camel_case("X"), "x");
        assert_eq!(make_camel_case("foo"), "foo");
        assert_eq!(make_camel_case("get_Value"), "get_Value");
        assert_eq!(make_camel_case(""), "");
    }

    #[test]
    fn test_identifier_validation() {
        assert!(is_valid_identifier("$foo_1"));
        assert!(!is_valid_identifier("1foo"));
        assert!(!is_valid_identifier("a.b"));
        assert!(!is_valid_identifier("function"));
        assert!(is_valid_nested_identifier("a.b.$c"));
        assert!(!is_valid_nested_identifier("a..b"));
        assert!(!is_valid_nested_identifier(""));
    }

    #[test]
    fn test_split_namespaced_name() {
        assert_eq!(split_namespaced_name("Ns.Sub.C"), ("Ns", "Sub.C"));
        assert_eq!(split_namespaced_name("C"), ("", "C"));
    }
}
