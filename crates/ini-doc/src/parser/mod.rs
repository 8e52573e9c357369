//! Line parsers
//!
//! A [`LineParser`] turns one physical line into a [`ParsedLine`]. The
//! policies differ only in when a value's backslash sequences are
//! unescaped; splitting key, value and comment is shared.

mod best_effort;
pub mod escape;
mod strict;

pub use best_effort::BestEffortParser;
pub use strict::StrictParser;

use serde::{Deserialize, Serialize};

use crate::line::ParsedLine;

/// Default comment delimiter.
pub const DEFAULT_COMMENT_DELIMITER: char = ';';

/// Which [`LineParser`] a document uses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ParsePolicy {
    /// Unescape only when every backslash forms a recognised sequence.
    #[default]
    BestEffort,
    /// Unescape whenever a recognised sequence is present.
    Strict,
}

impl ParsePolicy {
    /// Build the parser for this policy.
    pub fn parser(self, comment_delimiter: char) -> Box<dyn LineParser> {
        match self {
            Self::BestEffort => Box::new(BestEffortParser::with_delimiter(comment_delimiter)),
            Self::Strict => Box::new(StrictParser::with_delimiter(comment_delimiter)),
        }
    }
}

/// Parses single lines of INI text. Never fails.
pub trait LineParser: Send + Sync {
    /// Character that starts a comment.
    fn comment_delimiter(&self) -> char;

    /// Whether `raw` should be treated as carrying escape sequences.
    fn recognizes_escapes(&self, raw: &str) -> bool;

    /// Parse one line.
    ///
    /// `None` yields [`ParsedLine::empty`]. A bracketed line, with or
    /// without a trailing comment, is a section header and is never split
    /// on `=`. Any other line without `=` becomes a bare key with no value.
    fn parse(&self, line: Option<&str>) -> ParsedLine {
        let Some(line) = line else {
            return ParsedLine::empty();
        };
        let delimiter = self.comment_delimiter();
        let trimmed = line.trim();

        if let Some(comment) = trimmed.strip_prefix(delimiter) {
            return ParsedLine::comment_only(comment);
        }

        if is_bracketed(trimmed) {
            return ParsedLine::new(trimmed, None, None, false);
        }
        let (head, comment) = split_unquoted_comment(trimmed, delimiter);
        let head = head.trim();
        if is_bracketed(head) {
            return ParsedLine::new(head, None, comment, false);
        }

        let Some((key, data)) = trimmed.split_once('=') else {
            return ParsedLine::new(head, None, comment, false);
        };

        let data = data.trim();
        let (raw, comment) = if data.starts_with('"') && self.recognizes_escapes(data) {
            split_quoted(data, delimiter)
        } else {
            let (raw, comment) = split_unquoted_comment(data, delimiter);
            (strip_outer_quotes(raw.trim()).to_string(), comment)
        };

        let escaped = self.recognizes_escapes(&raw);
        let value = if escaped { escape::unescape(&raw) } else { raw };
        ParsedLine::new(key.trim(), Some(value), comment, escaped)
    }
}

/// Split at the first delimiter that sits outside a quote pair.
///
/// Quote state is the parity of `"` seen so far, so an escaped quote still
/// counts. Returns the data part untrimmed and the trimmed comment, if any.
pub(crate) fn split_unquoted_comment(data: &str, delimiter: char) -> (&str, Option<String>) {
    let mut quotes = 0usize;
    for (idx, c) in data.char_indices() {
        if c == '"' {
            quotes += 1;
        } else if c == delimiter && quotes % 2 == 0 {
            let comment = data[idx + c.len_utf8()..].trim();
            return (&data[..idx], non_empty(comment));
        }
    }
    (data, None)
}

/// Split a value that opens with a quote and contains escapes.
///
/// The value runs to the first quote not preceded by an odd run of
/// backslashes. Whatever follows the closing quote is comment, minus a
/// leading delimiter. An unterminated value takes the rest of the line.
fn split_quoted(data: &str, delimiter: char) -> (String, Option<String>) {
    let body = &data[1..];
    let mut backslashes = 0usize;

    for (idx, c) in body.char_indices() {
        if c == '"' && backslashes % 2 == 0 {
            let rest = body[idx + 1..].trim();
            let rest = rest.strip_prefix(delimiter).unwrap_or(rest).trim();
            return (body[..idx].to_string(), non_empty(rest));
        }
        backslashes = if c == '\\' { backslashes + 1 } else { 0 };
    }
    (body.to_string(), None)
}

/// Remove one layer of surrounding double quotes.
fn is_bracketed(text: &str) -> bool {
    text.len() >= 2 && text.starts_with('[') && text.ends_with(']')
}

pub(crate) fn strip_outer_quotes(value: &str) -> &str {
    if value.len() >= 2 && value.starts_with('"') && value.ends_with('"') {
        &value[1..value.len() - 1]
    } else {
        value
    }
}

fn non_empty(text: &str) -> Option<String> {
    (!text.is_empty()).then(|| text.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_unquoted_comment_skips_quoted_delimiters() {
        let (data, comment) = split_unquoted_comment(r#""a;b" ; note"#, ';');
        assert_eq!(data, r#""a;b" "#);
        assert_eq!(comment.as_deref(), Some("note"));
    }

    #[test]
    fn test_split_quoted_honours_backslash_parity() {
        let (value, comment) = split_quoted(r#""a\\" ;c"#, ';');
        assert_eq!(value, r"a\\");
        assert_eq!(comment.as_deref(), Some("c"));

        let (value, comment) = split_quoted(r#""a\"b""#, ';');
        assert_eq!(value, r#"a\"b"#);
        assert_eq!(comment, None);
    }

    #[test]
    fn test_split_quoted_unterminated_takes_rest() {
        let (value, comment) = split_quoted(r#""a\"b"#, ';');
        assert_eq!(value, r#"a\"b"#);
        assert_eq!(comment, None);
    }

    #[test]
    fn test_bracketed_line_is_header_before_key_split() {
        let parser = ParsePolicy::BestEffort.parser(';');

        let parsed = parser.parse(Some("[a=b]"));
        assert_eq!(parsed.section_name(), Some("a=b"));
        assert_eq!(parsed.value(), None);

        let parsed = parser.parse(Some("[x=y] ; about"));
        assert_eq!(parsed.section_name(), Some("x=y"));
        assert_eq!(parsed.comment(), Some("about"));

        let parsed = parser.parse(Some("[a;b]"));
        assert_eq!(parsed.section_name(), Some("a;b"));
    }

    #[test]
    fn test_strip_outer_quotes() {
        assert_eq!(strip_outer_quotes(r#""x""#), "x");
        assert_eq!(strip_outer_quotes(r#"""#), r#"""#);
        assert_eq!(strip_outer_quotes(r#""x"#), r#""x"#);
    }

    #[test]
    fn test_policy_builds_matching_parser() {
        let parser = ParsePolicy::Strict.parser('#');
        assert_eq!(parser.comment_delimiter(), '#');
        assert!(parser.recognizes_escapes(r#"a\qb\"c"#));

        let parser = ParsePolicy::BestEffort.parser(';');
        assert!(!parser.recognizes_escapes(r#"a\qb\"c"#));
    }
}
