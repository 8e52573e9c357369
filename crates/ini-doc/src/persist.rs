//! Serialising documents back to INI text

use std::fmt;
use std::io::Write;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::document::IniDocument;
use crate::error::{Error, Result};
use crate::parser::escape;
use crate::store::Entry;

/// Whether merge layers contribute to the written output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PersistStrategy {
    /// Only the document's own sections and keys.
    #[default]
    ExcludeMerged,
    /// Every section and key visible through the document, with resolved values.
    IncludeMerged,
}

/// A section as it will be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SectionBlock {
    pub(crate) name: String,
    pub(crate) comment: Option<String>,
    pub(crate) entries: Vec<Entry>,
}

impl IniDocument {
    /// Render to INI text.
    ///
    /// Per section: its comment, the `[name]` header (omitted for the
    /// anonymous section, which is always written first), each key's
    /// comment and `key="value"` line (a bare `key` when value-less), then
    /// the configured terminator line.
    pub fn render(&self, strategy: PersistStrategy) -> String {
        Rendered {
            document: self,
            strategy,
        }
        .to_string()
    }

    /// Write to the path this document was loaded from, local data only.
    pub fn persist(&self) -> Result<()> {
        self.persist_with(PersistStrategy::default())
    }

    /// Write to the path this document was loaded from.
    ///
    /// # Errors
    ///
    /// Returns `NoDestination` if the document was never loaded from a file.
    pub fn persist_with(&self, strategy: PersistStrategy) -> Result<()> {
        let path = self.path().ok_or(Error::NoDestination)?;
        self.persist_to_with(path, strategy)
    }

    /// Write local data to `path`.
    pub fn persist_to(&self, path: impl AsRef<Path>) -> Result<()> {
        self.persist_to_with(path, PersistStrategy::default())
    }

    /// Write to `path`, creating its folder if needed. The file is replaced
    /// atomically. A `<path>.lock` file is left next to it; see
    /// [`ini_fs::io::write_atomic`].
    pub fn persist_to_with(&self, path: impl AsRef<Path>, strategy: PersistStrategy) -> Result<()> {
        let path = path.as_ref();
        ini_fs::ensure_folder_exists_for(path)?;
        tracing::debug!(?path, ?strategy, "Persisting INI document");
        ini_fs::write_text(path, &self.render(strategy), self.options().robustness)?;
        Ok(())
    }

    /// Write local data to a stream.
    pub fn write_to(&self, writer: impl Write) -> Result<()> {
        self.write_to_with(writer, PersistStrategy::default())
    }

    /// Write to a stream and flush it.
    pub fn write_to_with(&self, mut writer: impl Write, strategy: PersistStrategy) -> Result<()> {
        writer.write_all(self.render(strategy).as_bytes())?;
        writer.flush()?;
        Ok(())
    }
}

/// Renders with merge layers included.
impl fmt::Display for IniDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Rendered {
            document: self,
            strategy: PersistStrategy::IncludeMerged,
        }
        .fmt(f)
    }
}

struct Rendered<'a> {
    document: &'a IniDocument,
    strategy: PersistStrategy,
}

impl fmt::Display for Rendered<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let options = self.document.options();
        let delimiter = options.comment_delimiter;

        let mut blocks = self.document.section_blocks(self.strategy);
        if let Some(idx) = blocks.iter().position(|b| b.name.is_empty()) {
            let anonymous = blocks.remove(idx);
            if anonymous.comment.is_some() || !anonymous.entries.is_empty() {
                blocks.insert(0, anonymous);
            }
        }

        for block in &blocks {
            if let Some(comment) = &block.comment {
                writeln!(f, "{delimiter}{comment}")?;
            }
            if !block.name.is_empty() {
                writeln!(f, "[{}]", block.name)?;
            }
            for entry in &block.entries {
                if let Some(comment) = entry.comment() {
                    writeln!(f, "{delimiter}{comment}")?;
                }
                match entry.value() {
                    Some(value) if must_escape(entry, value) => {
                        writeln!(f, "{}=\"{}\"", entry.key(), escape::escape(value))?
                    }
                    Some(value) => writeln!(f, "{}=\"{}\"", entry.key(), value)?,
                    None => writeln!(f, "{}", entry.key())?,
                }
            }
            if let Some(terminator) = &options.section_terminator {
                writeln!(f, "{terminator}")?;
            }
        }
        Ok(())
    }
}

/// Escaped on read, or would not survive a re-read unescaped.
fn must_escape(entry: &Entry, value: &str) -> bool {
    entry.is_escaped() || value.contains('"') || value.ends_with('\\')
}
