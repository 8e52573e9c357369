//! Backslash escapes inside values
//!
//! Only `\"` and `\\` are recognised. Anything else after a backslash is
//! left alone.

const ESCAPED_QUOTE: &str = "\\\"";
const ESCAPED_BACKSLASH: &str = "\\\\";

/// True when `raw` uses at least one recognised sequence and every
/// backslash in it belongs to one.
pub fn contains_only_known_escapes(raw: &str) -> bool {
    let mut found = false;
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some('"' | '\\') => found = true,
                _ => return false,
            }
        }
    }
    found
}

/// True when `raw` contains a backslash and at least one recognised sequence.
pub fn contains_known_escape(raw: &str) -> bool {
    raw.contains('\\') && (raw.contains(ESCAPED_QUOTE) || raw.contains(ESCAPED_BACKSLASH))
}

/// Apply `\"` -> `"` then `\\` -> `\`.
pub fn unescape(raw: &str) -> String {
    raw.replace(ESCAPED_QUOTE, "\"")
        .replace(ESCAPED_BACKSLASH, "\\")
}

/// Inverse of [`unescape`] for values written inside double quotes.
pub fn escape(value: &str) -> String {
    value.replace('\\', ESCAPED_BACKSLASH).replace('"', ESCAPED_QUOTE)
}

/// Whether a value must be escaped to survive being written between quotes.
pub fn needs_escaping(value: &str) -> bool {
    value.contains('"') || value.contains('\\')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_escape_disqualifies() {
        assert!(contains_only_known_escapes(r#"a\"b"#));
        assert!(contains_only_known_escapes(r"a\\b"));
        assert!(!contains_only_known_escapes(r#"a\qb\"c"#));
        assert!(!contains_only_known_escapes("plain"));
        assert!(!contains_only_known_escapes(r"trailing\"));
    }

    #[test]
    fn test_any_known_escape() {
        assert!(contains_known_escape(r#"a\qb\"c"#));
        assert!(!contains_known_escape(r"a\qb"));
    }

    #[test]
    fn test_escape_then_unescape_restores_value() {
        for value in [r#"a"b"#, r"C:\dir\file", r#"\""#, r"ends\", r#"mixed \" and \\"#] {
            assert_eq!(unescape(&escape(value)), value, "value {value:?}");
        }
    }
}
