//! Eager-unescaping parsing policy

use super::{DEFAULT_COMMENT_DELIMITER, LineParser, escape};

/// Unescapes `\"` and `\\` whenever either appears, even if the value
/// also holds backslashes the grammar does not recognise. Those stay as
/// written.
#[derive(Debug, Clone, Copy)]
pub struct StrictParser {
    delimiter: char,
}

impl StrictParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delimiter(delimiter: char) -> Self {
        Self { delimiter }
    }
}

impl Default for StrictParser {
    fn default() -> Self {
        Self::with_delimiter(DEFAULT_COMMENT_DELIMITER)
    }
}

impl LineParser for StrictParser {
    fn comment_delimiter(&self) -> char {
        self.delimiter
    }

    fn recognizes_escapes(&self, raw: &str) -> bool {
        escape::contains_known_escape(raw)
    }
}
