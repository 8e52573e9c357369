//! Document-level parse and persist settings

use ini_fs::RobustnessConfig;

use crate::parser::{DEFAULT_COMMENT_DELIMITER, LineParser, ParsePolicy};

/// Line written after every section block unless disabled.
pub const DEFAULT_SECTION_TERMINATOR: &str = "-----";

/// Settings shared by parsing and persistence of one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IniOptions {
    /// How values with backslash sequences are unescaped.
    pub policy: ParsePolicy,
    /// Character that starts a comment, on read and on write.
    pub comment_delimiter: char,
    /// Marker line closing each section on write. Lines equal to it are
    /// skipped on read. `None` disables it.
    pub section_terminator: Option<String>,
    /// Lock and fsync behaviour for file writes.
    pub robustness: RobustnessConfig,
}

impl Default for IniOptions {
    fn default() -> Self {
        Self {
            policy: ParsePolicy::default(),
            comment_delimiter: DEFAULT_COMMENT_DELIMITER,
            section_terminator: Some(DEFAULT_SECTION_TERMINATOR.to_string()),
            robustness: RobustnessConfig::default(),
        }
    }
}

impl IniOptions {
    pub fn with_policy(mut self, policy: ParsePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_comment_delimiter(mut self, delimiter: char) -> Self {
        self.comment_delimiter = delimiter;
        self
    }

    pub fn with_section_terminator(mut self, terminator: Option<&str>) -> Self {
        self.section_terminator = terminator.map(str::to_string);
        self
    }

    pub fn with_robustness(mut self, robustness: RobustnessConfig) -> Self {
        self.robustness = robustness;
        self
    }

    pub(crate) fn parser(&self) -> Box<dyn LineParser> {
        self.policy.parser(self.comment_delimiter)
    }
}
