//! Permissive parsing policy

use super::{DEFAULT_COMMENT_DELIMITER, LineParser, escape};

/// Default parser. A value is unescaped only when every backslash in it
/// forms `\"` or `\\`; any other backslash leaves the value verbatim.
#[derive(Debug, Clone, Copy)]
pub struct BestEffortParser {
    delimiter: char,
}

impl BestEffortParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delimiter(delimiter: char) -> Self {
        Self { delimiter }
    }
}

impl Default for BestEffortParser {
    fn default() -> Self {
        Self::with_delimiter(DEFAULT_COMMENT_DELIMITER)
    }
}

impl LineParser for BestEffortParser {
    fn comment_delimiter(&self) -> char {
        self.delimiter
    }

    fn recognizes_escapes(&self, raw: &str) -> bool {
        escape::contains_only_known_escapes(raw)
    }
}
