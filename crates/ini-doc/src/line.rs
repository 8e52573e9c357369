//! Result of parsing a single physical line

/// One parsed line: key, optional value, optional comment.
///
/// `value` is `None` when the line carried no `=` at all; a line such as
/// `key=` yields `Some("")`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedLine {
    key: String,
    value: Option<String>,
    comment: Option<String>,
    escaped: bool,
}

impl ParsedLine {
    /// The line produced for absent input: empty key and value.
    pub fn empty() -> Self {
        Self {
            key: String::new(),
            value: Some(String::new()),
            comment: None,
            escaped: false,
        }
    }

    pub(crate) fn new(
        key: impl Into<String>,
        value: Option<String>,
        comment: Option<String>,
        escaped: bool,
    ) -> Self {
        Self {
            key: key.into(),
            value,
            comment,
            escaped,
        }
    }

    pub(crate) fn comment_only(comment: impl Into<String>) -> Self {
        Self {
            key: String::new(),
            value: None,
            comment: Some(comment.into()),
            escaped: false,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    /// Whether the value contained `\"` or `\\` sequences that were unescaped.
    pub fn contained_escaped_entities(&self) -> bool {
        self.escaped
    }

    /// A line holding nothing but a comment.
    pub fn is_comment(&self) -> bool {
        self.key.is_empty() && self.value.is_none() && self.comment.is_some()
    }

    /// The section name when this line is a `[name]` header.
    pub fn section_name(&self) -> Option<&str> {
        if self.value.is_some() {
            return None;
        }
        self.key
            .strip_prefix('[')
            .and_then(|rest| rest.strip_suffix(']'))
            .map(str::trim)
    }
}
